//! Contact categories.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Rejected category name.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("category must be one of: personal, work, family, other (got '{0}')")]
pub struct CategoryError(pub String);

/// The fixed set of buckets a contact can be filed under.
///
/// Stored and transmitted as the lowercase variant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactCategory {
    #[default]
    Personal,
    Work,
    Family,
    Other,
}

impl ContactCategory {
    /// Every category, in display order.
    pub const ALL: [Self; 4] = [Self::Personal, Self::Work, Self::Family, Self::Other];

    /// Wire and storage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::Work => "work",
            Self::Family => "family",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ContactCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ContactCategory {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| CategoryError(s.to_owned()))
    }
}
