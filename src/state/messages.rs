use crate::state::directory::{DirectoryKind, DirectoryRow};
use crate::state::network::LoadingState;
use cricket_api::wire::{MoveRequest, PositionUpdate, SwapRequest};
use cricket_api::{BallEvent, BallRecord, BattingOrderEntry, Id, LiveStatus, Match, MatchDetail};
use crossterm::event::KeyEvent;

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    LoadMatches,
    LoadMatchDetail { match_id: Id },
    LoadLiveStatus { innings_id: Id },
    LoadBalls { innings_id: Id },
    LoadBattingOrder { innings_id: Id },
    RecordBall { ball: BallEvent },
    ReplaceBattingOrder { innings_id: Id, order: Vec<PositionUpdate> },
    MoveBatter { innings_id: Id, request: MoveRequest },
    SwapBatters { innings_id: Id, request: SwapRequest },
    Search { kind: DirectoryKind, query: String },
}

/// Which screen a failure belongs to, so it lands in the right place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorOrigin {
    Matches,
    MatchDetail { match_id: Id },
    LiveStatus { innings_id: Id },
    Balls { innings_id: Id },
    BattingOrder { innings_id: Id },
    BattingOrderSave { innings_id: Id },
    RecordBall,
    Directory { kind: DirectoryKind, query: String },
}

impl NetworkRequest {
    pub fn origin(&self) -> ErrorOrigin {
        match self {
            NetworkRequest::LoadMatches => ErrorOrigin::Matches,
            NetworkRequest::LoadMatchDetail { match_id } => {
                ErrorOrigin::MatchDetail { match_id: *match_id }
            }
            NetworkRequest::LoadLiveStatus { innings_id } => {
                ErrorOrigin::LiveStatus { innings_id: *innings_id }
            }
            NetworkRequest::LoadBalls { innings_id } => ErrorOrigin::Balls { innings_id: *innings_id },
            NetworkRequest::LoadBattingOrder { innings_id } => {
                ErrorOrigin::BattingOrder { innings_id: *innings_id }
            }
            NetworkRequest::RecordBall { .. } => ErrorOrigin::RecordBall,
            NetworkRequest::ReplaceBattingOrder { innings_id, .. }
            | NetworkRequest::MoveBatter { innings_id, .. }
            | NetworkRequest::SwapBatters { innings_id, .. } => {
                ErrorOrigin::BattingOrderSave { innings_id: *innings_id }
            }
            NetworkRequest::Search { kind, query } => {
                ErrorOrigin::Directory { kind: *kind, query: query.clone() }
            }
        }
    }
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    MatchesLoaded { matches: Vec<Match> },
    MatchDetailLoaded { detail: MatchDetail },
    LiveStatusLoaded { innings_id: Id, status: LiveStatus },
    BallsLoaded { innings_id: Id, balls: Vec<BallRecord> },
    BattingOrderLoaded { innings_id: Id, entries: Vec<BattingOrderEntry> },
    BallRecorded { record: BallRecord },
    BattingOrderSaved { innings_id: Id, summary: String },
    DirectoryLoaded { kind: DirectoryKind, query: String, rows: Vec<DirectoryRow> },
    Error { origin: ErrorOrigin, message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
    /// Drives the search debounce.
    Tick,
}
