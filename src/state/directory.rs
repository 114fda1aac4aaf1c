use cricket_api::{Id, Resource};
use std::time::{Duration, Instant};

/// Quiet period after the last keystroke before a search goes out.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DirectoryKind {
    #[default]
    Teams,
    Players,
    Officials,
    Weather,
}

impl DirectoryKind {
    pub const ALL: [DirectoryKind; 4] = [
        DirectoryKind::Teams,
        DirectoryKind::Players,
        DirectoryKind::Officials,
        DirectoryKind::Weather,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DirectoryKind::Teams => cricket_api::Team::LABEL,
            DirectoryKind::Players => cricket_api::Player::LABEL,
            DirectoryKind::Officials => cricket_api::Official::LABEL,
            DirectoryKind::Weather => cricket_api::Weather::LABEL,
        }
    }

    pub fn next(self) -> Self {
        match self {
            DirectoryKind::Teams => DirectoryKind::Players,
            DirectoryKind::Players => DirectoryKind::Officials,
            DirectoryKind::Officials => DirectoryKind::Weather,
            DirectoryKind::Weather => DirectoryKind::Teams,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryRow {
    pub id: Id,
    pub label: String,
}

impl DirectoryRow {
    pub fn from_resource<R: Resource>(record: &R) -> Self {
        Self { id: record.id(), label: record.display_name() }
    }
}

#[derive(Debug, Default)]
pub struct DirectoryState {
    pub kind: DirectoryKind,
    pub query: String,
    /// True while keystrokes go to the search box.
    pub editing: bool,
    pub rows: Vec<DirectoryRow>,
    pub selected: usize,
    pub loading: bool,
    pub error: Option<String>,
    pending_since: Option<Instant>,
    loaded_once: bool,
}

impl DirectoryState {
    pub fn push_char(&mut self, c: char, now: Instant) {
        self.query.push(c);
        self.pending_since = Some(now);
    }

    pub fn pop_char(&mut self, now: Instant) {
        if self.query.pop().is_some() {
            self.pending_since = Some(now);
        }
    }

    /// Switch collection; the new one is fetched right away.
    pub fn cycle_kind(&mut self) -> (DirectoryKind, String) {
        self.kind = self.kind.next();
        self.rows.clear();
        self.selected = 0;
        self.pending_since = None;
        self.begin_load()
    }

    /// The first visit to the tab loads the current collection.
    pub fn initial_load(&mut self) -> Option<(DirectoryKind, String)> {
        (!self.loaded_once).then(|| self.begin_load())
    }

    /// Returns the search to issue once the debounce window has passed.
    pub fn due_search(&mut self, now: Instant) -> Option<(DirectoryKind, String)> {
        let since = self.pending_since?;
        if now.saturating_duration_since(since) < SEARCH_DEBOUNCE {
            return None;
        }
        self.pending_since = None;
        Some(self.begin_load())
    }

    fn begin_load(&mut self) -> (DirectoryKind, String) {
        self.loaded_once = true;
        self.loading = true;
        (self.kind, self.query.clone())
    }

    /// Accept results only for the collection and query still on screen.
    pub fn on_loaded(&mut self, kind: DirectoryKind, query: &str, rows: Vec<DirectoryRow>) -> bool {
        if kind != self.kind || query != self.query {
            return false;
        }
        self.loading = false;
        self.error = None;
        self.rows = rows;
        self.selected = self.selected.min(self.rows.len().saturating_sub(1));
        true
    }

    /// Same scoping as `on_loaded`: a failed search for another collection
    /// or query leaves the current one alone.
    pub fn on_error(&mut self, kind: DirectoryKind, query: &str, message: String) -> bool {
        if kind != self.kind || query != self.query {
            return false;
        }
        self.loading = false;
        self.error = Some(message);
        true
    }

    pub fn select_down(&mut self) {
        if self.selected + 1 < self.rows.len() {
            self.selected += 1;
        }
    }

    pub fn select_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_waits_for_the_quiet_period() {
        let mut state = DirectoryState::default();
        let t0 = Instant::now();
        state.push_char('i', t0);
        state.push_char('n', t0 + Duration::from_millis(200));

        assert_eq!(state.due_search(t0 + Duration::from_millis(400)), None);
        let due = state.due_search(t0 + Duration::from_millis(500));
        assert_eq!(due, Some((DirectoryKind::Teams, "in".to_string())));
        assert_eq!(state.due_search(t0 + Duration::from_secs(5)), None);
    }

    #[test]
    fn results_for_an_old_query_are_dropped() {
        let mut state = DirectoryState::default();
        let t0 = Instant::now();
        state.push_char('a', t0);
        state.due_search(t0 + SEARCH_DEBOUNCE);
        state.push_char('b', t0 + SEARCH_DEBOUNCE);

        let rows = vec![DirectoryRow { id: 1, label: "Ali".into() }];
        assert!(!state.on_loaded(DirectoryKind::Teams, "a", rows.clone()));
        assert!(state.rows.is_empty());
        assert!(state.on_loaded(DirectoryKind::Teams, "ab", rows));
        assert_eq!(state.rows.len(), 1);
        assert!(!state.loading);
    }

    #[test]
    fn cycling_kind_reloads_and_ignores_old_kind() {
        let mut state = DirectoryState::default();
        assert!(state.initial_load().is_some());
        assert!(state.initial_load().is_none());

        let (kind, query) = state.cycle_kind();
        assert_eq!(kind, DirectoryKind::Players);
        assert!(query.is_empty());
        assert!(!state.on_loaded(DirectoryKind::Teams, "", vec![]));
    }

    #[test]
    fn errors_for_an_old_collection_are_dropped() {
        let mut state = DirectoryState::default();
        assert!(state.initial_load().is_some());
        state.cycle_kind();
        assert!(state.loading);

        assert!(!state.on_error(DirectoryKind::Teams, "", "HTTP 502".into()));
        assert!(state.loading);
        assert!(state.error.is_none());

        assert!(state.on_error(DirectoryKind::Players, "", "HTTP 502".into()));
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("HTTP 502"));
    }

    #[test]
    fn backspace_on_empty_query_schedules_nothing() {
        let mut state = DirectoryState::default();
        let t0 = Instant::now();
        state.pop_char(t0);
        assert_eq!(state.due_search(t0 + Duration::from_secs(1)), None);
    }
}
