//! Task lists, and a way to build them without depending on a concrete type

pub mod array;
pub mod linked;

use std::convert::TryFrom;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TaskError;
use crate::traits::TaskCollection;
use array::ArrayTaskCollection;
use linked::LinkedTaskCollection;

/// The backing strategies a task list can use
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    /// A contiguous buffer, see [`ArrayTaskCollection`]
    Array,
    /// A chain of nodes, see [`LinkedTaskCollection`]
    Linked,
}

impl Display for CollectionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Array => write!(f, "array"),
            Self::Linked => write!(f, "linked"),
        }
    }
}

impl FromStr for CollectionKind {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "array" => Ok(Self::Array),
            "linked" => Ok(Self::Linked),
            _ => Err(TaskError::UnknownCollectionKind(s.to_string())),
        }
    }
}


/// Create an empty task list of the given kind
pub fn create_collection(kind: CollectionKind) -> Box<dyn TaskCollection> {
    match kind {
        CollectionKind::Array => Box::new(ArrayTaskCollection::new()),
        CollectionKind::Linked => Box::new(LinkedTaskCollection::new()),
    }
}

/// Create an empty task list of the given kind, from a raw size hint.
///
/// The hint is the initial capacity of array lists. Linked lists do not need it, but still refuse a negative one.
pub fn create_collection_with_capacity(kind: CollectionKind, hint: i64) -> Result<Box<dyn TaskCollection>, TaskError> {
    if hint < 0 {
        return Err(TaskError::NegativeCapacity(hint));
    }
    let list: Box<dyn TaskCollection> = match kind {
        CollectionKind::Array => {
            let capacity = usize::try_from(hint).map_err(|_| TaskError::NegativeCapacity(hint))?;
            Box::new(ArrayTaskCollection::with_capacity(capacity))
        },
        CollectionKind::Linked => Box::new(LinkedTaskCollection::new()),
    };
    Ok(list)
}

/// Create an empty task list, of the kind set in [`config::DEFAULT_COLLECTION_KIND`](crate::config::DEFAULT_COLLECTION_KIND)
pub fn create_default_collection() -> Box<dyn TaskCollection> {
    create_collection(crate::config::default_collection_kind())
}
