//! Drug identifier types.
//!
//! A drug is referenced two ways: by the external DrugBank identifier used in
//! the raw dataset, and by its position in the collection that owns it once
//! it has been loaded.

use std::fmt;

/// An external DrugBank identifier.
///
/// Identifiers are unique within one loaded dataset and are the only way
/// records refer to each other in the raw file.
///
/// # Examples
///
/// ```
/// use drugbank_types::DrugId;
///
/// let lepirudin: DrugId = "DB00001".to_string();
/// ```
pub type DrugId = String;

/// Position of a drug inside the collection that owns it.
///
/// Resolved drug-drug interactions are keyed by `DrugIndex`, so a drug links
/// to its interaction partners without owning them.
///
/// # Examples
///
/// ```
/// use drugbank_types::DrugIndex;
///
/// let index = DrugIndex::new(5);
/// assert_eq!(index.get(), 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct DrugIndex(usize);

impl DrugIndex {
    /// Wraps a raw collection position.
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the raw collection position.
    pub const fn get(self) -> usize {
        self.0
    }
}

impl From<usize> for DrugIndex {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl fmt::Display for DrugIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
