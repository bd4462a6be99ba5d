use std::cmp::Ordering;
use std::str::FromStr;

use strum::Display;

use crate::error::{SortError, SortResult};

/// Direction of a single sort criterion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display)]
pub enum SortOrdering {
    #[default]
    #[strum(to_string = "asc")]
    Ascending,
    #[strum(to_string = "desc")]
    Descending,
}

impl SortOrdering {
    #[inline]
    pub fn reverse(self) -> Self {
        match self {
            SortOrdering::Ascending => SortOrdering::Descending,
            SortOrdering::Descending => SortOrdering::Ascending,
        }
    }

    /// Maps an ascending comparison result into this direction.
    #[inline]
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrdering::Ascending => ordering,
            SortOrdering::Descending => ordering.reverse(),
        }
    }

    /// Turns the result of comparing two extracted values into a decision.
    ///
    /// Returns `None` when the values are tied, which includes values that are not comparable
    /// with each other (`None` input); the caller then moves on to the next criterion.
    #[inline]
    pub fn decide(self, ordering: Option<Ordering>) -> Option<Ordering> {
        match ordering {
            Some(Ordering::Less) => Some(self.apply(Ordering::Less)),
            Some(Ordering::Greater) => Some(self.apply(Ordering::Greater)),
            Some(Ordering::Equal) | None => None,
        }
    }
}

impl FromStr for SortOrdering {
    type Err = SortError;

    fn from_str(s: &str) -> SortResult<Self> {
        match s {
            "asc" => Ok(SortOrdering::Ascending),
            "desc" => Ok(SortOrdering::Descending),
            _ => Err(SortError::invalid_direction(s)),
        }
    }
}
