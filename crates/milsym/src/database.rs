use std::{error, fmt, result};

use async_trait::async_trait;
use model::{
    feature::{UnitFeature, UnitFeaturePatch},
    WithId,
};
use utility::id::Id;

#[derive(Debug)]
pub enum DatabaseError {
    NotFound,
    Other(Box<dyn error::Error + Send + Sync>),
}

impl DatabaseError {
    pub fn other<T: error::Error + Send + Sync + 'static>(why: T) -> Self {
        Self::Other(Box::new(why))
    }
}

impl error::Error for DatabaseError {}

impl fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseError::NotFound => write!(f, "No matching record."),
            DatabaseError::Other(why) => write!(f, "Database error: {}", why),
        }
    }
}

pub type Result<T> = result::Result<T, DatabaseError>;

/// Outcome of a delete, as reported by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteResult {
    pub deleted_count: u64,
}

#[async_trait]
pub trait UnitRepo {
    /// Stores a new unit. The store assigns the id.
    async fn insert(&mut self, unit: UnitFeature) -> Result<WithId<UnitFeature>>;

    /// Fails with `DatabaseError::NotFound` if no unit has this id.
    async fn get(&mut self, id: &Id<UnitFeature>) -> Result<WithId<UnitFeature>>;

    /// All units in store iteration order.
    async fn get_all(&mut self) -> Result<Vec<WithId<UnitFeature>>>;

    /// A window of `get_all`.
    async fn get_page(
        &mut self,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<WithId<UnitFeature>>>;

    /// Applies the supplied members of `patch` and returns the updated unit.
    /// Fails with `DatabaseError::NotFound` if no unit has this id.
    async fn update(
        &mut self,
        id: &Id<UnitFeature>,
        patch: UnitFeaturePatch,
    ) -> Result<WithId<UnitFeature>>;

    async fn delete(&mut self, id: &Id<UnitFeature>) -> Result<DeleteResult>;
}

pub trait DatabaseAutocommit: UnitRepo {}

/// Trait to implement a unit store.
/// Multiple concurrent accesses should be possible by cloning the database object.
#[async_trait]
pub trait Database: Clone + Send + Sync + Sized {
    type Autocommit: DatabaseAutocommit + Send;

    fn auto(&self) -> Self::Autocommit;

    /// Checks that the store is reachable.
    async fn ping(&self) -> Result<()>;

    /// Releases the connection. Operations fail afterwards.
    async fn close(&self);
}
