//! Wire shapes shared by every scoring API endpoint.
//! Responses arrive as `{ success, data, error: { message } }`; request bodies
//! for the batting-order endpoints are defined here too.

use crate::Id;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ErrorBody>,
    /// Some endpoints put the failure text at the top level instead.
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn failure_message(&self) -> Option<String> {
        self.error
            .as_ref()
            .and_then(|e| e.message.clone())
            .or_else(|| self.message.clone())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    pub message: Option<String>,
}

/// One row of a full batting-order replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionUpdate {
    pub player_id: Id,
    pub batting_position: u8,
}

#[derive(Debug, Serialize)]
pub struct BattingOrderPayload<'a> {
    pub batting_order: &'a [PositionUpdate],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub player_id: Id,
    pub new_batting_position: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRequest {
    pub player1_id: Id,
    pub player2_id: Id,
}
