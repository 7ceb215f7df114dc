//! Opaque identifiers for cards, boards, groups, and columns.

#[cfg(test)]
#[path = "entity_test.rs"]
mod entity_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier carried through the URL, DOM attributes, and request payloads.
///
/// The core never dereferences it; it only parses, compares, and formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub i64);

impl EntityId {
    /// Parse a raw attribute or query value.
    ///
    /// Surrounding whitespace is ignored. Anything that is not a plain integer
    /// (empty, `NaN`, `12abc`, `1e3`) yields `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().parse::<i64>() {
            Ok(value) => Some(Self(value)),
            Err(_) => None,
        }
    }

    #[must_use]
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntityId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Self)
    }
}

impl From<i64> for EntityId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Substitute `{id}` in a URL template.
#[must_use]
pub fn expand_template(template: &str, id: EntityId) -> String {
    template.replace("{id}", &id.to_string())
}
