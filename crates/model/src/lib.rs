use schemars::JsonSchema;
use std::fmt::Debug;

use serde::{Deserialize, Serialize};
pub use serde_with;
use utility::id::{HasId, Id};

pub mod feature;
pub mod sidc;
pub mod unit;

pub trait ExampleData {
    fn example_data() -> Self;
}

/// A stored record: the store-assigned id next to the record body.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(bound(
    serialize = "V: Serialize, V::IdType: Serialize",
    deserialize = "V: Deserialize<'de>, V::IdType: Deserialize<'de>"
))]
pub struct WithId<V>
where
    V: HasId,
    V::IdType: Serialize + Debug + Clone,
{
    pub id: Id<V>,
    #[serde(flatten)]
    pub content: V,
}

impl<V> WithId<V>
where
    V: HasId,
    V::IdType: Serialize + Debug + Clone,
{
    pub fn new(id: Id<V>, content: V) -> Self {
        Self { id, content }
    }
}

impl<V> PartialEq for WithId<V>
where
    V: HasId + PartialEq,
    V::IdType: Serialize + Debug + Clone + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.content == other.content
    }
}
