use model::{
    feature::{UnitFeature, UnitFeaturePatch},
    WithId,
};
use utility::id::Id;

use crate::{
    database::{Database, UnitRepo},
    RequestError, RequestResult,
};

/// Page size of `Client::list_units_page`.
pub const UNITS_PER_PAGE: usize = 10;

/// Parses a unit id as sent by a caller.
///
/// A malformed id is reported as `NotFound`, the same as an id no unit has.
pub fn parse_unit_id(raw: &str) -> RequestResult<Id<UnitFeature>> {
    Id::parse(raw).ok_or_else(|| RequestError::NotFound(raw.to_owned()))
}

/// Unit operations on top of a store.
#[derive(Debug, Clone)]
pub struct Client<D>
where
    D: Database + Send + Sync + Sized + 'static,
{
    pub database: D,
}

impl<D> Client<D>
where
    D: Database,
{
    pub fn new(database: D) -> Self {
        Self { database }
    }

    pub async fn create_unit(
        &self,
        unit: UnitFeature,
    ) -> RequestResult<WithId<UnitFeature>> {
        let created = self.database.auto().insert(unit).await?;
        log::debug!("created unit {}", created.id);
        Ok(created)
    }

    pub async fn list_units(&self) -> RequestResult<Vec<WithId<UnitFeature>>> {
        Ok(self.database.auto().get_all().await?)
    }

    /// Lists one page of `UNITS_PER_PAGE` units. Pages start at 1; page 0 is
    /// treated as page 1.
    pub async fn list_units_page(
        &self,
        page: usize,
    ) -> RequestResult<Vec<WithId<UnitFeature>>> {
        let offset = page.saturating_sub(1).saturating_mul(UNITS_PER_PAGE);
        Ok(self
            .database
            .auto()
            .get_page(offset, UNITS_PER_PAGE)
            .await?)
    }

    pub async fn get_unit(&self, id: &str) -> RequestResult<WithId<UnitFeature>> {
        let unit_id = parse_unit_id(id)?;
        self.database
            .auto()
            .get(&unit_id)
            .await
            .map_err(|why| RequestError::database(why, id))
    }

    /// Applies the supplied members of `patch`. An empty patch changes
    /// nothing and returns the unit as stored.
    pub async fn update_unit(
        &self,
        id: &str,
        patch: UnitFeaturePatch,
    ) -> RequestResult<WithId<UnitFeature>> {
        let unit_id = parse_unit_id(id)?;
        let mut units = self.database.auto();

        let result = if patch.is_empty() {
            units.get(&unit_id).await
        } else {
            units.update(&unit_id, patch).await
        };

        result.map_err(|why| RequestError::database(why, id))
    }

    pub async fn delete_unit(&self, id: &str) -> RequestResult<()> {
        let unit_id = parse_unit_id(id)?;
        let result = self
            .database
            .auto()
            .delete(&unit_id)
            .await
            .map_err(|why| RequestError::database(why, id))?;

        if result.deleted_count == 1 {
            log::debug!("deleted unit {}", unit_id);
            Ok(())
        } else {
            Err(RequestError::NotFound(id.to_owned()))
        }
    }
}

#[cfg(test)]
mod tests {
    use model::{
        feature::{Geometry, Position, Properties, PropertyValue},
        ExampleData,
    };

    use super::*;
    use crate::memory::MemoryDatabase;

    fn client() -> Client<MemoryDatabase> {
        Client::new(MemoryDatabase::new())
    }

    fn unit(designation: &str) -> UnitFeature {
        let mut properties = Properties::new();
        properties.insert("sidc".to_owned(), "SHGPUCIZ--------".into());
        properties.insert("uniqueDesignation".to_owned(), designation.into());
        UnitFeature::new(Position::new(-116.8, 35.2).unwrap(), properties)
    }

    fn assert_not_found<T: std::fmt::Debug>(result: RequestResult<T>, expected_id: &str) {
        match result {
            Err(RequestError::NotFound(id)) => assert_eq!(id, expected_id),
            other => panic!("expected NotFound({}), got {:?}", expected_id, other),
        }
    }

    #[tokio::test]
    async fn created_unit_is_retrievable() {
        let client = client();
        let created = client.create_unit(UnitFeature::example_data()).await.unwrap();

        let fetched = client.get_unit(&created.id.to_string()).await.unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.content, UnitFeature::example_data());
    }

    #[tokio::test]
    async fn identical_content_gets_distinct_ids() {
        let client = client();
        let first = client.create_unit(unit("A")).await.unwrap();
        let second = client.create_unit(unit("A")).await.unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(client.list_units().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn list_keeps_insertion_order() {
        let client = client();
        for name in ["A", "B", "C"] {
            client.create_unit(unit(name)).await.unwrap();
        }
        let names = client
            .list_units()
            .await
            .unwrap()
            .into_iter()
            .map(|unit| unit.content.unique_designation().unwrap().to_owned())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn pages_hold_at_most_the_page_size() {
        let client = client();
        for i in 0..(UNITS_PER_PAGE + 3) {
            client.create_unit(unit(&format!("U-{}", i))).await.unwrap();
        }
        assert_eq!(client.list_units_page(1).await.unwrap().len(), UNITS_PER_PAGE);
        assert_eq!(client.list_units_page(0).await.unwrap().len(), UNITS_PER_PAGE);
        let second = client.list_units_page(2).await.unwrap();
        assert_eq!(second.len(), 3);
        assert_eq!(
            second[0].content.unique_designation(),
            Some(format!("U-{}", UNITS_PER_PAGE).as_str())
        );
        assert!(client.list_units_page(3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_ids_are_not_found() {
        let client = client();
        client.create_unit(unit("A")).await.unwrap();

        assert_not_found(client.get_unit("not-an-id").await, "not-an-id");
        assert_not_found(
            client.update_unit("123", UnitFeaturePatch::default()).await,
            "123",
        );
        assert_not_found(client.delete_unit("").await, "");
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let client = client();
        let id = "67e55044-10b1-426f-9247-bb680e5fe0c8";

        assert_not_found(client.get_unit(id).await, id);
        assert_not_found(client.update_unit(id, UnitFeaturePatch::default()).await, id);
        let patch = UnitFeaturePatch {
            properties: Some(Properties::new()),
            ..Default::default()
        };
        assert_not_found(client.update_unit(id, patch).await, id);
        assert_not_found(client.delete_unit(id).await, id);
    }

    #[tokio::test]
    async fn empty_update_returns_stored_unit() {
        let client = client();
        let created = client.create_unit(unit("A")).await.unwrap();
        let id = created.id.to_string();

        let updated = client
            .update_unit(&id, UnitFeaturePatch::default())
            .await
            .unwrap();
        assert_eq!(updated, created);
        assert_eq!(client.get_unit(&id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn update_changes_only_supplied_members() {
        let client = client();
        let created = client.create_unit(unit("A")).await.unwrap();
        let id = created.id.to_string();

        let patch = UnitFeaturePatch {
            geometry: Some(Geometry::point(Position::new(10.0, 20.0).unwrap())),
            properties: None,
        };
        let updated = client.update_unit(&id, patch).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.content.position(), Position::new(10.0, 20.0).unwrap());
        assert_eq!(updated.content.properties, created.content.properties);
        assert_eq!(client.get_unit(&id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn update_replaces_properties() {
        let client = client();
        let created = client.create_unit(unit("A")).await.unwrap();
        let id = created.id.to_string();

        let mut properties = Properties::new();
        properties.insert("uniqueDesignation".to_owned(), PropertyValue::from("B"));
        let patch = UnitFeaturePatch {
            geometry: None,
            properties: Some(properties.clone()),
        };
        let updated = client.update_unit(&id, patch).await.unwrap();

        assert_eq!(updated.content.properties, properties);
        assert_eq!(updated.content.geometry, created.content.geometry);
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let client = client();
        let created = client.create_unit(unit("A")).await.unwrap();
        let id = created.id.to_string();

        client.delete_unit(&id).await.unwrap();
        assert_not_found(client.get_unit(&id).await, &id);
        assert_not_found(client.delete_unit(&id).await, &id);
        assert!(client.list_units().await.unwrap().is_empty());
    }

    #[test]
    fn parse_accepts_store_ids() {
        assert!(parse_unit_id("67e55044-10b1-426f-9247-bb680e5fe0c8").is_ok());
    }
}
