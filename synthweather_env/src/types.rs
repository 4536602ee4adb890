//! Common types for the SynthWeather environment abstraction.

use serde::{Deserialize, Serialize};

/// Sequence number of one submitted location search.
///
/// Every timer posted on behalf of a search carries its `SearchId`, so a
/// transition that outlived its search can be recognised and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SearchId(pub u64);

impl SearchId {
    /// The id handed out before any search has been submitted.
    pub const fn first() -> Self {
        Self(1)
    }

    /// Returns the id following this one.
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    /// Returns the raw sequence number.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl Default for SearchId {
    fn default() -> Self {
        Self::first()
    }
}

impl std::fmt::Display for SearchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "search#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_id_sequence() {
        let first = SearchId::first();
        assert_eq!(first.value(), 1);
        assert_eq!(first.next(), SearchId(2));
        assert!(first < first.next());
    }

    #[test]
    fn test_search_id_display() {
        assert_eq!(SearchId(7).to_string(), "search#7");
    }
}
