use model::{feature::UnitFeature, WithId};

pub mod unit;

pub trait DatabaseRow {
    fn to_model(self) -> WithId<UnitFeature>;
}

pub fn with_ids<R: DatabaseRow>(rows: Vec<R>) -> Vec<WithId<UnitFeature>> {
    rows.into_iter().map(|row| row.to_model()).collect::<Vec<_>>()
}
