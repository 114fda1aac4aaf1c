use crate::app::MenuItem;
use crate::state::batting_order::{FullReorderEditor, SingleMoveEditor, SwapEditor};
use crate::state::directory::DirectoryState;
use crate::state::live_status::LiveStatusMirror;
use crate::state::scoring::ScoringState;
use cricket_api::{BallRecord, BattingOrderEntry, Id, Innings, Match, MatchDetail};

// ---------------------------------------------------------------------------
// Match list
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MatchesState {
    pub matches: Vec<Match>,
    pub selected: usize,
    pub loading: bool,
    pub error: Option<String>,
}

impl MatchesState {
    pub fn load(&mut self, matches: Vec<Match>) {
        self.loading = false;
        self.error = None;
        self.matches = matches;
        self.selected = self.selected.min(self.matches.len().saturating_sub(1));
    }

    pub fn select_down(&mut self) {
        if self.selected + 1 < self.matches.len() {
            self.selected += 1;
        }
    }

    pub fn select_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn selected_match_id(&self) -> Option<Id> {
        self.matches.get(self.selected).map(|m| m.id)
    }
}

// ---------------------------------------------------------------------------
// Match detail (summary + squads + innings)
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MatchDetailState {
    pub detail: Option<MatchDetail>,
    /// Set while a detail load is in flight; the view shows a loading state.
    pub loading_match: Option<Id>,
    pub selected_innings: usize,
    pub error: Option<String>,
}

impl MatchDetailState {
    pub fn begin(&mut self, match_id: Id) {
        self.loading_match = Some(match_id);
        self.error = None;
    }

    pub fn is_loading(&self) -> bool {
        self.loading_match.is_some()
    }

    /// Store a loaded detail. A detail for a match other than the one last
    /// opened is dropped.
    pub fn on_loaded(&mut self, mut detail: MatchDetail) -> bool {
        if self.loading_match != Some(detail.summary.id) {
            return false;
        }
        detail.innings.sort_by_key(|i| i.innings_number);
        let current = detail.current_innings().map(|i| i.id);
        self.selected_innings = current
            .and_then(|id| detail.innings.iter().position(|i| i.id == id))
            .unwrap_or(0);
        self.loading_match = None;
        self.error = None;
        self.detail = Some(detail);
        true
    }

    pub fn on_error(&mut self, match_id: Id, message: String) {
        if self.loading_match == Some(match_id) {
            self.loading_match = None;
            self.error = Some(message);
        }
    }

    pub fn innings(&self) -> Option<&Innings> {
        self.detail.as_ref()?.innings.get(self.selected_innings)
    }

    pub fn cycle_innings(&mut self) -> Option<&Innings> {
        let count = self.detail.as_ref()?.innings.len();
        if count == 0 {
            return None;
        }
        self.selected_innings = (self.selected_innings + 1) % count;
        self.innings()
    }
}

// ---------------------------------------------------------------------------
// Ball-by-ball history
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct BallByBallState {
    pub innings_id: Option<Id>,
    pub balls: Vec<BallRecord>,
    pub scroll_offset: u16,
    pub loading: bool,
    pub error: Option<String>,
}

impl BallByBallState {
    pub fn watch(&mut self, innings_id: Option<Id>) {
        if self.innings_id != innings_id {
            *self = Self { innings_id, ..Self::default() };
        }
        self.loading = innings_id.is_some();
    }

    pub fn on_loaded(&mut self, innings_id: Id, balls: Vec<BallRecord>) -> bool {
        if self.innings_id != Some(innings_id) {
            return false;
        }
        self.loading = false;
        self.error = None;
        self.balls = balls;
        true
    }

    pub fn on_error(&mut self, innings_id: Id, message: String) {
        if self.innings_id == Some(innings_id) {
            self.loading = false;
            self.error = Some(message);
        }
    }

    pub fn scroll_down(&mut self) {
        let max = self.balls.len().saturating_sub(1) as u16;
        self.scroll_offset = (self.scroll_offset + 1).min(max);
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }
}

// ---------------------------------------------------------------------------
// Batting order
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum BattingOrderDialog {
    Reorder(FullReorderEditor),
    Move(SingleMoveEditor),
    Swap(SwapEditor),
}

impl BattingOrderDialog {
    pub fn title(&self) -> &'static str {
        match self {
            BattingOrderDialog::Reorder(_) => " Reorder batting ",
            BattingOrderDialog::Move(_) => " Move batter ",
            BattingOrderDialog::Swap(_) => " Swap batters ",
        }
    }

    pub fn can_save(&self) -> bool {
        match self {
            BattingOrderDialog::Reorder(editor) => editor.can_save(),
            BattingOrderDialog::Move(editor) => editor.can_save(),
            BattingOrderDialog::Swap(editor) => editor.can_save(),
        }
    }
}

#[derive(Debug, Default)]
pub struct BattingOrderState {
    pub innings_id: Option<Id>,
    pub entries: Vec<BattingOrderEntry>,
    pub selected: usize,
    pub loading: bool,
    pub error: Option<String>,
    pub dialog: Option<BattingOrderDialog>,
    /// A save is in flight for the open dialog.
    pub saving: bool,
}

impl BattingOrderState {
    pub fn watch(&mut self, innings_id: Option<Id>) {
        if self.innings_id != innings_id {
            *self = Self { innings_id, ..Self::default() };
        }
        self.loading = innings_id.is_some();
    }

    pub fn on_loaded(&mut self, innings_id: Id, mut entries: Vec<BattingOrderEntry>) -> bool {
        if self.innings_id != Some(innings_id) {
            return false;
        }
        entries.sort_by_key(|e| (e.batting_position, e.player_id));
        self.loading = false;
        self.error = None;
        self.entries = entries;
        self.selected = self.selected.min(self.entries.len().saturating_sub(1));
        true
    }

    pub fn on_error(&mut self, innings_id: Id, message: String) {
        if self.innings_id == Some(innings_id) {
            self.loading = false;
            self.error = Some(message);
        }
    }

    pub fn open(&mut self, dialog: BattingOrderDialog) {
        if self.innings_id.is_some() && !self.entries.is_empty() {
            self.dialog = Some(dialog);
        }
    }

    pub fn close_dialog(&mut self) {
        self.dialog = None;
        self.saving = false;
    }

    pub fn select_down(&mut self) {
        if self.selected + 1 < self.entries.len() {
            self.selected += 1;
        }
    }

    pub fn select_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    /// Blocking message; dismissed with Enter or Esc.
    pub alert: Option<String>,
    /// One-line status shown under the tabs.
    pub notice: Option<String>,
    pub matches: MatchesState,
    pub match_detail: MatchDetailState,
    pub live: LiveStatusMirror,
    pub live_error: Option<String>,
    pub scoring: ScoringState,
    pub ball_by_ball: BallByBallState,
    pub batting_order: BattingOrderState,
    pub directory: DirectoryState,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            matches: MatchesState { loading: true, ..MatchesState::default() },
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cricket_api::{BattingStatus, InningsStatus};

    fn detail(match_id: Id) -> MatchDetail {
        MatchDetail {
            summary: Match { id: match_id, ..Match::default() },
            squads: vec![],
            innings: vec![
                Innings {
                    id: 21,
                    match_id,
                    innings_number: 2,
                    status: InningsStatus::InProgress,
                    ..Innings::default()
                },
                Innings {
                    id: 20,
                    match_id,
                    innings_number: 1,
                    status: InningsStatus::Completed,
                    ..Innings::default()
                },
            ],
        }
    }

    #[test]
    fn match_detail_stays_loading_until_it_resolves() {
        let mut state = MatchDetailState::default();
        state.begin(3);
        assert!(state.is_loading());

        assert!(!state.on_loaded(detail(4)));
        assert!(state.is_loading());

        assert!(state.on_loaded(detail(3)));
        assert!(!state.is_loading());
        assert_eq!(state.innings().map(|i| i.id), Some(21));
    }

    #[test]
    fn match_detail_failure_ends_loading() {
        let mut state = MatchDetailState::default();
        state.begin(3);
        state.on_error(9, "elsewhere".into());
        assert!(state.is_loading());
        state.on_error(3, "HTTP 500".into());
        assert!(!state.is_loading());
        assert_eq!(state.error.as_deref(), Some("HTTP 500"));
    }

    #[test]
    fn innings_cycle_wraps() {
        let mut state = MatchDetailState::default();
        state.begin(3);
        state.on_loaded(detail(3));
        assert_eq!(state.cycle_innings().map(|i| i.id), Some(20));
        assert_eq!(state.cycle_innings().map(|i| i.id), Some(21));
    }

    #[test]
    fn ball_history_for_another_innings_is_dropped() {
        let mut state = BallByBallState::default();
        state.watch(Some(1));
        state.watch(Some(2));
        assert!(!state.on_loaded(1, vec![BallRecord::default()]));
        assert!(state.balls.is_empty());
        assert!(state.loading);
        assert!(state.on_loaded(2, vec![BallRecord::default()]));
        assert_eq!(state.balls.len(), 1);
    }

    #[test]
    fn batting_order_is_sorted_and_scoped_to_the_innings() {
        let mut state = BattingOrderState::default();
        state.watch(Some(5));
        let entry = |player_id, batting_position| BattingOrderEntry {
            player_id,
            batting_position,
            status: BattingStatus::NotOut,
            ..BattingOrderEntry::default()
        };
        assert!(!state.on_loaded(6, vec![entry(1, 1)]));
        assert!(state.on_loaded(5, vec![entry(2, 4), entry(1, 1)]));
        let positions: Vec<_> = state.entries.iter().map(|e| e.batting_position).collect();
        assert_eq!(positions, vec![1, 4]);

        state.watch(Some(6));
        assert!(state.entries.is_empty());
        assert!(state.dialog.is_none());
    }
}
