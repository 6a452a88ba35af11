use std::{error::Error, fmt};

pub mod client;
pub mod database;
pub mod memory;

#[derive(Debug)]
pub enum RequestError {
    /// No unit with the given id exists, or the id is not a valid id at all.
    NotFound(String),
    Other(Box<dyn Error + Send + Sync>),
}

impl RequestError {
    pub fn other<T: Error + Send + Sync + 'static>(why: T) -> Self {
        Self::Other(Box::new(why))
    }

    /// Converts a database error for the unit `id`.
    pub(crate) fn database(why: database::DatabaseError, id: impl fmt::Display) -> Self {
        match why {
            database::DatabaseError::NotFound => Self::NotFound(id.to_string()),
            database::DatabaseError::Other(why) => Self::Other(why),
        }
    }
}

impl Error for RequestError {}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::NotFound(id) => write!(f, "Unit {} not found", id),
            RequestError::Other(why) => write!(f, "{}", why),
        }
    }
}

/// For operations that do not address a single unit, a missing record is an
/// unexpected store failure.
impl From<database::DatabaseError> for RequestError {
    fn from(value: database::DatabaseError) -> Self {
        match value {
            database::DatabaseError::Other(why) => Self::Other(why),
            not_found => Self::other(not_found),
        }
    }
}

pub type RequestResult<O> = Result<O, RequestError>;
