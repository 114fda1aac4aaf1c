use crate::state::app_settings::AppSettings;
use crate::state::app_state::{AppState, BattingOrderDialog};
use crate::state::batting_order::{FullReorderEditor, SingleMoveEditor, SwapEditor};
use crate::state::directory::{DirectoryKind, DirectoryRow};
use crate::state::messages::{ErrorOrigin, NetworkRequest};
use crate::state::scoring::ScoringAction;
use crate::state::wicket::Choice;
use cricket_api::{BallRecord, BattingOrderEntry, Id, LiveStatus, Match, MatchDetail};
use log::{info, warn};
use std::time::Instant;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Matches,
    Scoring,
    BallByBall,
    BattingOrder,
    Directory,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new() -> Self {
        let app = Self::with_settings(AppSettings::load());

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app
    }

    pub fn with_settings(settings: AppSettings) -> Self {
        Self { state: AppState::new(), settings }
    }

    pub fn on_started(&mut self) -> NetworkRequest {
        self.state.matches.loading = true;
        NetworkRequest::LoadMatches
    }

    // -----------------------------------------------------------------------
    // Network response handlers, called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_matches_loaded(&mut self, matches: Vec<Match>) {
        info!("loaded {} matches", matches.len());
        self.state.matches.load(matches);
    }

    /// The newest innings of a freshly loaded match becomes the watched one.
    pub fn on_match_detail_loaded(&mut self, detail: MatchDetail) -> Vec<NetworkRequest> {
        if !self.state.match_detail.on_loaded(detail) {
            return Vec::new();
        }
        let innings = self.state.match_detail.innings().map(|i| i.id);
        self.watch_innings(innings)
    }

    pub fn on_live_status_loaded(&mut self, innings_id: Id, status: LiveStatus) {
        if status.innings_id != innings_id {
            warn!("live status for innings {} answered a request for {innings_id}", status.innings_id);
        }
        if self.state.live.apply(status) {
            self.state.live_error = None;
        }
    }

    pub fn on_balls_loaded(&mut self, innings_id: Id, balls: Vec<BallRecord>) {
        self.state.ball_by_ball.on_loaded(innings_id, balls);
    }

    pub fn on_batting_order_loaded(&mut self, innings_id: Id, entries: Vec<BattingOrderEntry>) {
        self.state.batting_order.on_loaded(innings_id, entries);
    }

    /// A committed ball resets the selections; the innings is re-read so the
    /// next draft starts from the server's new state.
    pub fn on_ball_recorded(&mut self, record: BallRecord) -> Vec<NetworkRequest> {
        let ball = &record.event;
        info!("recorded ball {}.{} ({} runs)", ball.over_number, ball.ball_number, ball.total_runs());
        // The scorer has moved on; their new draft belongs to another innings.
        if self.watched_innings() != Some(ball.innings_id) {
            return Vec::new();
        }
        self.state.notice = Some(format!(
            "Recorded {}.{}: {}{}",
            ball.over_number,
            ball.ball_number,
            ball.total_runs(),
            if ball.is_wicket { " + wicket" } else { "" }
        ));
        self.state.scoring.reset();
        self.refresh_innings()
    }

    pub fn on_batting_order_saved(&mut self, innings_id: Id, summary: String) -> Vec<NetworkRequest> {
        if self.watched_innings() != Some(innings_id) {
            self.state.batting_order.saving = false;
            return Vec::new();
        }
        self.state.batting_order.close_dialog();
        self.state.notice = Some(summary);
        self.state.batting_order.loading = true;
        vec![NetworkRequest::LoadBattingOrder { innings_id }]
    }

    pub fn on_directory_loaded(&mut self, kind: DirectoryKind, query: String, rows: Vec<DirectoryRow>) {
        self.state.directory.on_loaded(kind, &query, rows);
    }

    pub fn on_error(&mut self, origin: ErrorOrigin, message: String) {
        match origin {
            ErrorOrigin::Matches => {
                self.state.matches.loading = false;
                self.state.matches.error = Some(message);
            }
            ErrorOrigin::MatchDetail { match_id } => {
                self.state.match_detail.on_error(match_id, message)
            }
            ErrorOrigin::LiveStatus { innings_id } => {
                if self.watched_innings() == Some(innings_id) {
                    self.state.live_error = Some(message);
                }
            }
            ErrorOrigin::Balls { innings_id } => {
                self.state.ball_by_ball.on_error(innings_id, message)
            }
            ErrorOrigin::BattingOrder { innings_id } => {
                self.state.batting_order.on_error(innings_id, message)
            }
            ErrorOrigin::BattingOrderSave { .. } => {
                // The dialog stays open with its staged values.
                self.state.batting_order.saving = false;
                self.state.alert = Some(format!("Batting order not saved: {message}"));
            }
            ErrorOrigin::RecordBall => {
                self.state.scoring.submitting = false;
                self.state.alert = Some(format!("Ball not recorded: {message}"));
            }
            ErrorOrigin::Directory { kind, query } => {
                self.state.directory.on_error(kind, &query, message);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) -> Option<NetworkRequest> {
        if self.state.active_tab == next {
            return None;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
        if next == MenuItem::Directory {
            return self
                .state
                .directory
                .initial_load()
                .map(|(kind, query)| NetworkRequest::Search { kind, query });
        }
        None
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    pub fn dismiss_alert(&mut self) {
        self.state.alert = None;
    }

    // -----------------------------------------------------------------------
    // Matches and the watched innings
    // -----------------------------------------------------------------------

    pub fn refresh_matches(&mut self) -> NetworkRequest {
        self.state.matches.loading = true;
        NetworkRequest::LoadMatches
    }

    pub fn open_selected_match(&mut self) -> Option<NetworkRequest> {
        let match_id = self.state.matches.selected_match_id()?;
        self.state.match_detail.begin(match_id);
        Some(NetworkRequest::LoadMatchDetail { match_id })
    }

    pub fn next_innings(&mut self) -> Vec<NetworkRequest> {
        let innings = self.state.match_detail.cycle_innings().map(|i| i.id);
        if innings.is_none() {
            return Vec::new();
        }
        self.watch_innings(innings)
    }

    pub fn watched_innings(&self) -> Option<Id> {
        self.state.live.innings_id()
    }

    /// Point every innings-scoped view at `innings`. Responses for any other
    /// innings are dropped from here on.
    pub fn watch_innings(&mut self, innings: Option<Id>) -> Vec<NetworkRequest> {
        if self.watched_innings() != innings {
            self.state.scoring.reset();
            self.state.live_error = None;
        }
        self.state.live.watch(innings);
        self.state.ball_by_ball.watch(innings);
        self.state.batting_order.watch(innings);
        self.refresh_innings()
    }

    pub fn refresh_innings(&mut self) -> Vec<NetworkRequest> {
        let Some(innings_id) = self.watched_innings() else {
            return Vec::new();
        };
        self.state.ball_by_ball.loading = true;
        self.state.batting_order.loading = true;
        vec![
            NetworkRequest::LoadLiveStatus { innings_id },
            NetworkRequest::LoadBalls { innings_id },
            NetworkRequest::LoadBattingOrder { innings_id },
        ]
    }

    // -----------------------------------------------------------------------
    // Scoring
    // -----------------------------------------------------------------------

    pub fn scoring_press(&mut self) {
        if self.watched_innings().is_none() {
            return;
        }
        if self.state.scoring.press() == ScoringAction::OpenWicketDialog {
            let (batsmen, fielders) = self.wicket_choices();
            self.state.scoring.open_wicket_dialog(batsmen, fielders);
        }
    }

    /// Dismissal choices are the two batsmen at the crease; fielders come
    /// from the bowling side's squad.
    pub fn wicket_choices(&self) -> (Vec<Choice>, Vec<Choice>) {
        let detail = self.state.match_detail.detail.as_ref();

        let batsmen = self
            .state
            .live
            .batsmen()
            .iter()
            .map(|b| {
                let label = b
                    .name
                    .clone()
                    .or_else(|| detail.and_then(|d| d.player_name(b.player_id)).map(str::to_string))
                    .unwrap_or_else(|| format!("Player {}", b.player_id));
                Choice { id: b.player_id, label }
            })
            .collect();

        let bowling_team = self.watched_innings().and_then(|innings_id| {
            detail?
                .innings
                .iter()
                .find(|i| i.id == innings_id)
                .map(|i| i.bowling_team_id)
        });
        let fielders = bowling_team
            .and_then(|team_id| detail?.squad(team_id))
            .map(|squad| {
                squad
                    .players
                    .iter()
                    .map(|p| Choice { id: p.id, label: p.name.clone() })
                    .collect()
            })
            .unwrap_or_default();

        (batsmen, fielders)
    }

    pub fn commit_ball(&mut self) -> Option<NetworkRequest> {
        self.watched_innings()?;
        if !self.state.scoring.ready_to_commit() {
            return None;
        }
        let ball = self.state.scoring.ball_event(&self.state.live);
        self.state.scoring.submitting = true;
        Some(NetworkRequest::RecordBall { ball })
    }

    // -----------------------------------------------------------------------
    // Batting order dialogs
    // -----------------------------------------------------------------------

    fn at_crease(&self) -> Vec<Id> {
        self.state.live.batsmen().iter().map(|b| b.player_id).collect()
    }

    pub fn open_reorder(&mut self) {
        let editor = FullReorderEditor::new(&self.state.batting_order.entries, &self.at_crease());
        self.state.batting_order.open(BattingOrderDialog::Reorder(editor));
    }

    pub fn open_move(&mut self) {
        let mut editor = SingleMoveEditor::new(&self.state.batting_order.entries, &self.at_crease());
        if let Some(entry) = self.state.batting_order.entries.get(self.state.batting_order.selected) {
            let _ = editor.select_player(entry.player_id);
        }
        self.state.batting_order.open(BattingOrderDialog::Move(editor));
    }

    pub fn open_swap(&mut self) {
        let editor = SwapEditor::new(&self.state.batting_order.entries, &self.at_crease());
        self.state.batting_order.open(BattingOrderDialog::Swap(editor));
    }

    pub fn save_batting_dialog(&mut self) -> Option<NetworkRequest> {
        let innings_id = self.state.batting_order.innings_id?;
        if self.state.batting_order.saving {
            return None;
        }
        if let Some(BattingOrderDialog::Reorder(editor)) = self.state.batting_order.dialog.as_ref()
            && editor.can_save()
            && !editor.is_dirty()
        {
            self.state.batting_order.close_dialog();
            self.state.notice = Some("Batting order unchanged".to_string());
            return None;
        }
        let request = match self.state.batting_order.dialog.as_ref()? {
            BattingOrderDialog::Reorder(editor) => editor.can_save().then(|| {
                NetworkRequest::ReplaceBattingOrder { innings_id, order: editor.submission() }
            })?,
            BattingOrderDialog::Move(editor) => {
                NetworkRequest::MoveBatter { innings_id, request: editor.request()? }
            }
            BattingOrderDialog::Swap(editor) => {
                NetworkRequest::SwapBatters { innings_id, request: editor.request()? }
            }
        };
        self.state.batting_order.saving = true;
        Some(request)
    }

    // -----------------------------------------------------------------------
    // Directory
    // -----------------------------------------------------------------------

    pub fn directory_cycle_kind(&mut self) -> NetworkRequest {
        let (kind, query) = self.state.directory.cycle_kind();
        NetworkRequest::Search { kind, query }
    }

    /// Fires the debounced directory search once typing has paused.
    pub fn on_tick(&mut self, now: Instant) -> Option<NetworkRequest> {
        self.state
            .directory
            .due_search(now)
            .map(|(kind, query)| NetworkRequest::Search { kind, query })
    }
}
