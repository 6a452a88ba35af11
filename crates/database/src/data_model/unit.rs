use model::{feature::UnitFeature, WithId};
use sqlx::{prelude::FromRow, types::Json};
use utility::id::Id;
use uuid::Uuid;

use super::DatabaseRow;

#[derive(Debug, Clone, FromRow)]
pub struct UnitRow {
    pub id: Uuid,
    pub document: Json<UnitFeature>,
}

impl DatabaseRow for UnitRow {
    fn to_model(self) -> WithId<UnitFeature> {
        WithId::new(Id::new(self.id), self.document.0)
    }
}
