//! JSON bodies exchanged with the mutation endpoints.

#[cfg(test)]
#[path = "payload_test.rs"]
mod payload_test;

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

/// Body for a card move, from a drop or the dock's move panel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CardMoveBody {
    pub card_id: EntityId,
    pub column_id: EntityId,
    pub position: usize,
}

impl CardMoveBody {
    /// Build from the dock's move form. A missing or unparsable column means
    /// there is nothing to send; a blank position means the top.
    #[must_use]
    pub fn from_form(card_id: EntityId, column: &str, position: &str) -> Option<Self> {
        let column_id = EntityId::parse(column)?;
        let position = match position.trim() {
            "" => 0,
            raw => match raw.parse::<usize>() {
                Ok(position) => position,
                Err(_) => return None,
            },
        };
        Some(Self { card_id, column_id, position })
    }
}

/// Body for adding a board to, or removing it from, a group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GroupMembershipBody {
    pub board_id: EntityId,
}

/// Reply from the favorite endpoint. Servers that answer with an empty body
/// leave the flag unset.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct FavoriteReply {
    #[serde(default)]
    pub favorited: Option<bool>,
}

impl FavoriteReply {
    /// Lenient decode: an unreadable body reports no flag.
    #[must_use]
    pub fn from_body(body: &str) -> Self {
        match serde_json::from_str(body) {
            Ok(reply) => reply,
            Err(err) => {
                log::debug!("favorite: reply body not decoded: {err}");
                Self::default()
            }
        }
    }
}
