use crate::state::live_status::LiveStatusMirror;
use crate::state::wicket::{Choice, WicketDetail, WicketDialog};
use cricket_api::{BallEvent, BallType};

// ---------------------------------------------------------------------------
// Selection model
// ---------------------------------------------------------------------------

/// The one extras category active for a delivery, with its value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExtrasSelection {
    #[default]
    None,
    Wides(u32),
    Byes(u32),
    LegByes(u32),
    NoBallBye(u32),
    NoBallLegBye(u32),
    NoBallRuns(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtrasKind {
    Wides,
    Byes,
    LegByes,
    NoBallBye,
    NoBallLegBye,
    NoBallRuns,
}

impl ExtrasKind {
    /// Fixed scan order used when reading legacy per-section values.
    #[allow(dead_code)]
    pub const SCAN_ORDER: [ExtrasKind; 6] = [
        ExtrasKind::Wides,
        ExtrasKind::Byes,
        ExtrasKind::LegByes,
        ExtrasKind::NoBallBye,
        ExtrasKind::NoBallLegBye,
        ExtrasKind::NoBallRuns,
    ];

    pub fn with_value(self, value: u32) -> ExtrasSelection {
        match self {
            ExtrasKind::Wides => ExtrasSelection::Wides(value),
            ExtrasKind::Byes => ExtrasSelection::Byes(value),
            ExtrasKind::LegByes => ExtrasSelection::LegByes(value),
            ExtrasKind::NoBallBye => ExtrasSelection::NoBallBye(value),
            ExtrasKind::NoBallLegBye => ExtrasSelection::NoBallLegBye(value),
            ExtrasKind::NoBallRuns => ExtrasSelection::NoBallRuns(value),
        }
    }
}

impl ExtrasSelection {
    /// Build from one optional value per section key, in `SCAN_ORDER`.
    /// The first non-null section wins.
    #[allow(dead_code)]
    pub fn from_sections(values: [Option<u32>; 6]) -> Self {
        ExtrasKind::SCAN_ORDER
            .iter()
            .zip(values)
            .find_map(|(kind, value)| value.map(|v| kind.with_value(v)))
            .unwrap_or_default()
    }

    pub fn kind(&self) -> Option<ExtrasKind> {
        match self {
            ExtrasSelection::None => None,
            ExtrasSelection::Wides(_) => Some(ExtrasKind::Wides),
            ExtrasSelection::Byes(_) => Some(ExtrasKind::Byes),
            ExtrasSelection::LegByes(_) => Some(ExtrasKind::LegByes),
            ExtrasSelection::NoBallBye(_) => Some(ExtrasKind::NoBallBye),
            ExtrasSelection::NoBallLegBye(_) => Some(ExtrasKind::NoBallLegBye),
            ExtrasSelection::NoBallRuns(_) => Some(ExtrasKind::NoBallRuns),
        }
    }

    pub fn value(&self) -> u32 {
        match *self {
            ExtrasSelection::None => 0,
            ExtrasSelection::Wides(v)
            | ExtrasSelection::Byes(v)
            | ExtrasSelection::LegByes(v)
            | ExtrasSelection::NoBallBye(v)
            | ExtrasSelection::NoBallLegBye(v)
            | ExtrasSelection::NoBallRuns(v) => v,
        }
    }

    fn ball_type(&self) -> BallType {
        match self {
            ExtrasSelection::None => BallType::Legal,
            ExtrasSelection::Wides(_) => BallType::Wide,
            ExtrasSelection::Byes(_) => BallType::Bye,
            ExtrasSelection::LegByes(_) => BallType::LegBye,
            ExtrasSelection::NoBallBye(_)
            | ExtrasSelection::NoBallLegBye(_)
            | ExtrasSelection::NoBallRuns(_) => BallType::NoBall,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selections {
    pub runs: Option<u32>,
    pub extras: ExtrasSelection,
    pub wicket: bool,
    pub penalty: Option<u32>,
}

/// Build the ball draft from the current button selections and live state.
pub fn derive_ball_event(selections: &Selections, live: &LiveStatusMirror) -> BallEvent {
    let (over_number, ball_number) = live.next_delivery();
    let ball_type = selections.extras.ball_type();

    BallEvent {
        innings_id: live.innings_id().unwrap_or_default(),
        over_number,
        ball_number,
        legal_ball: !matches!(ball_type, BallType::Wide | BallType::NoBall),
        ball_type,
        runs_scored: selections.runs.unwrap_or(0),
        extras: selections.extras.value(),
        penalty_runs: selections.penalty.unwrap_or(0),
        is_wicket: selections.wicket,
        wicket_type: None,
        dismissed_player_id: None,
        fielder_id: None,
        striker_id: live.striker_id(),
        non_striker_id: live.non_striker_id(),
        bowler_id: live.bowler_id(),
    }
}

// ---------------------------------------------------------------------------
// Scoring panel: sections, buttons, cursor
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScoringSection {
    #[default]
    Runs,
    Extras(ExtrasKind),
    Penalty,
    Wicket,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Button {
    pub label: &'static str,
    pub value: u32,
}

const fn b(label: &'static str, value: u32) -> Button {
    Button { label, value }
}

const RUN_BUTTONS: &[Button] =
    &[b("0", 0), b("1", 1), b("2", 2), b("3", 3), b("4", 4), b("5", 5), b("6", 6)];
const WIDE_BUTTONS: &[Button] = &[b("w", 0), b("1", 1), b("2", 2), b("3", 3), b("4", 4)];
const SHORT_BUTTONS: &[Button] = &[b("1", 1), b("2", 2), b("3", 3), b("4", 4)];
const NO_BALL_RUN_BUTTONS: &[Button] =
    &[b("1", 1), b("2", 2), b("3", 3), b("4", 4), b("5", 5), b("6", 6)];
const PENALTY_BUTTONS: &[Button] = &[b("5", 5)];
const WICKET_BUTTONS: &[Button] = &[b("W", 1)];

impl ScoringSection {
    pub const ALL: [ScoringSection; 9] = [
        ScoringSection::Runs,
        ScoringSection::Extras(ExtrasKind::Wides),
        ScoringSection::Extras(ExtrasKind::Byes),
        ScoringSection::Extras(ExtrasKind::LegByes),
        ScoringSection::Extras(ExtrasKind::NoBallBye),
        ScoringSection::Extras(ExtrasKind::NoBallLegBye),
        ScoringSection::Extras(ExtrasKind::NoBallRuns),
        ScoringSection::Penalty,
        ScoringSection::Wicket,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ScoringSection::Runs => "Runs",
            ScoringSection::Extras(ExtrasKind::Wides) => "Wides",
            ScoringSection::Extras(ExtrasKind::Byes) => "Byes",
            ScoringSection::Extras(ExtrasKind::LegByes) => "Leg byes",
            ScoringSection::Extras(ExtrasKind::NoBallBye) => "No ball (b)",
            ScoringSection::Extras(ExtrasKind::NoBallLegBye) => "No ball (lb)",
            ScoringSection::Extras(ExtrasKind::NoBallRuns) => "No ball (bat)",
            ScoringSection::Penalty => "Penalty",
            ScoringSection::Wicket => "Wicket",
        }
    }

    pub fn buttons(&self) -> &'static [Button] {
        match self {
            ScoringSection::Runs => RUN_BUTTONS,
            ScoringSection::Extras(ExtrasKind::Wides) => WIDE_BUTTONS,
            ScoringSection::Extras(ExtrasKind::NoBallRuns) => NO_BALL_RUN_BUTTONS,
            ScoringSection::Extras(_) => SHORT_BUTTONS,
            ScoringSection::Penalty => PENALTY_BUTTONS,
            ScoringSection::Wicket => WICKET_BUTTONS,
        }
    }

    pub fn accepts_custom(&self) -> bool {
        !matches!(self, ScoringSection::Wicket)
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or(0)
    }
}

/// What the caller has to do after a button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringAction {
    None,
    OpenWicketDialog,
}

#[derive(Debug, Default)]
pub struct ScoringState {
    pub selections: Selections,
    pub section: ScoringSection,
    pub button: usize,
    /// Typing buffer while a custom ("?") value is being entered.
    pub custom_input: Option<String>,
    pub wicket_detail: Option<WicketDetail>,
    pub wicket_dialog: Option<WicketDialog>,
    /// A commit is in flight; further submits are ignored until it returns.
    pub submitting: bool,
}

impl ScoringState {
    pub fn ball_event(&self, live: &LiveStatusMirror) -> BallEvent {
        let mut ball = derive_ball_event(&self.selections, live);
        if let Some(detail) = &self.wicket_detail {
            detail.apply_to(&mut ball);
        }
        ball
    }

    /// `selections.wicket` is only ever set together with `wicket_detail`,
    /// by a submitted wicket form.
    pub fn ready_to_commit(&self) -> bool {
        !self.submitting
    }

    pub fn reset(&mut self) {
        self.selections = Selections::default();
        self.custom_input = None;
        self.wicket_detail = None;
        self.wicket_dialog = None;
        self.submitting = false;
    }

    pub fn section_down(&mut self) {
        let next = (self.section.index() + 1).min(ScoringSection::ALL.len() - 1);
        self.section = ScoringSection::ALL[next];
        self.clamp_button();
    }

    pub fn section_up(&mut self) {
        self.section = ScoringSection::ALL[self.section.index().saturating_sub(1)];
        self.clamp_button();
    }

    pub fn button_right(&mut self) {
        let max = self.section.buttons().len().saturating_sub(1);
        self.button = (self.button + 1).min(max);
    }

    pub fn button_left(&mut self) {
        self.button = self.button.saturating_sub(1);
    }

    fn clamp_button(&mut self) {
        let max = self.section.buttons().len().saturating_sub(1);
        self.button = self.button.min(max);
    }

    /// Press the highlighted button.
    pub fn press(&mut self) -> ScoringAction {
        let Some(button) = self.section.buttons().get(self.button).copied() else {
            return ScoringAction::None;
        };
        self.select(self.section, button.value)
    }

    /// Toggle `value` in `section`. Pressing the active value clears it;
    /// picking an extras value replaces whatever category was active.
    pub fn select(&mut self, section: ScoringSection, value: u32) -> ScoringAction {
        match section {
            ScoringSection::Runs => self.selections.runs = toggle(self.selections.runs, value),
            ScoringSection::Penalty => {
                self.selections.penalty = toggle(self.selections.penalty, value)
            }
            ScoringSection::Extras(kind) => {
                let picked = kind.with_value(value);
                self.selections.extras = if self.selections.extras == picked {
                    ExtrasSelection::None
                } else {
                    picked
                };
            }
            ScoringSection::Wicket => {
                if self.selections.wicket {
                    self.clear_wicket();
                } else {
                    return ScoringAction::OpenWicketDialog;
                }
            }
        }
        ScoringAction::None
    }

    pub fn clear_wicket(&mut self) {
        self.selections.wicket = false;
        self.wicket_detail = None;
        self.wicket_dialog = None;
    }

    pub fn is_selected(&self, section: ScoringSection, value: u32) -> bool {
        match section {
            ScoringSection::Runs => self.selections.runs == Some(value),
            ScoringSection::Penalty => self.selections.penalty == Some(value),
            ScoringSection::Extras(kind) => self.selections.extras == kind.with_value(value),
            ScoringSection::Wicket => self.selections.wicket,
        }
    }

    /// Custom value currently selected in `section`, if it has no button.
    pub fn custom_value(&self, section: ScoringSection) -> Option<u32> {
        let value = match section {
            ScoringSection::Runs => self.selections.runs?,
            ScoringSection::Penalty => self.selections.penalty?,
            ScoringSection::Extras(kind) if self.selections.extras.kind() == Some(kind) => {
                self.selections.extras.value()
            }
            _ => return None,
        };
        (!section.buttons().iter().any(|b| b.value == value)).then_some(value)
    }

    // -- custom value entry --------------------------------------------------

    pub fn start_custom(&mut self) {
        if self.section.accepts_custom() {
            self.custom_input = Some(String::new());
        }
    }

    pub fn push_custom_digit(&mut self, c: char) {
        if let Some(input) = self.custom_input.as_mut()
            && c.is_ascii_digit()
            && input.len() < 4
        {
            input.push(c);
        }
    }

    pub fn pop_custom_digit(&mut self) {
        if let Some(input) = self.custom_input.as_mut() {
            input.pop();
        }
    }

    pub fn cancel_custom(&mut self) {
        self.custom_input = None;
    }

    /// Apply the typed value to the highlighted section. Not capped.
    pub fn commit_custom(&mut self) {
        let Some(input) = self.custom_input.take() else {
            return;
        };
        let Ok(value) = input.parse::<u32>() else {
            return;
        };
        match self.section {
            ScoringSection::Runs => self.selections.runs = Some(value),
            ScoringSection::Penalty => self.selections.penalty = Some(value),
            ScoringSection::Extras(kind) => self.selections.extras = kind.with_value(value),
            ScoringSection::Wicket => {}
        }
    }

    // -- wicket dialog ------------------------------------------------------

    pub fn open_wicket_dialog(&mut self, batsmen: Vec<Choice>, fielders: Vec<Choice>) {
        self.wicket_dialog = Some(WicketDialog::new(
            batsmen,
            fielders,
            self.wicket_detail.as_ref(),
        ));
    }

    /// Patch the draft with the dialog's fields and close it. Stays open
    /// while the form is incomplete.
    pub fn submit_wicket_dialog(&mut self) -> bool {
        let Some(detail) = self.wicket_dialog.as_ref().and_then(WicketDialog::submit) else {
            return false;
        };
        self.selections.wicket = true;
        self.wicket_detail = Some(detail);
        self.wicket_dialog = None;
        true
    }

    pub fn cancel_wicket_dialog(&mut self) {
        self.wicket_dialog = None;
    }
}

fn toggle(current: Option<u32>, value: u32) -> Option<u32> {
    if current == Some(value) { None } else { Some(value) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cricket_api::{CurrentBatsman, CurrentBowler, LastBall, LiveStatus, WicketType};

    fn live() -> LiveStatusMirror {
        let mut mirror = LiveStatusMirror::default();
        mirror.watch(Some(7));
        mirror.apply(LiveStatus {
            innings_id: 7,
            current_batsmen: vec![
                CurrentBatsman { player_id: 1, is_striker: true, ..Default::default() },
                CurrentBatsman { player_id: 2, ..Default::default() },
            ],
            current_bowler: Some(CurrentBowler { player_id: 50, ..Default::default() }),
            last_ball: Some(LastBall { over_number: 3, ball_number: 2, legal_ball: true }),
            ..Default::default()
        });
        mirror
    }

    fn every_extras() -> Vec<ExtrasSelection> {
        let mut all = vec![ExtrasSelection::None];
        for kind in ExtrasKind::SCAN_ORDER {
            for v in [0, 1, 4, 9] {
                all.push(kind.with_value(v));
            }
        }
        all
    }

    #[test]
    fn illegal_exactly_for_wides_and_no_balls() {
        for extras in every_extras() {
            for runs in [None, Some(0), Some(4)] {
                for wicket in [false, true] {
                    let s = Selections { runs, extras, wicket, penalty: None };
                    let ball = derive_ball_event(&s, &live());
                    let wide_or_nb = matches!(ball.ball_type, BallType::Wide | BallType::NoBall);
                    assert_eq!(!ball.legal_ball, wide_or_nb, "{extras:?}");
                }
            }
        }
    }

    #[test]
    fn four_runs_off_the_bat() {
        let s = Selections { runs: Some(4), ..Default::default() };
        let ball = derive_ball_event(&s, &live());
        assert_eq!(ball.runs_scored, 4);
        assert_eq!(ball.extras, 0);
        assert_eq!(ball.ball_type, BallType::Legal);
        assert!(ball.legal_ball);
    }

    #[test]
    fn plain_wide_adds_no_extras_beyond_the_wide() {
        let plain = Selections { extras: ExtrasSelection::Wides(0), ..Default::default() };
        let ball = derive_ball_event(&plain, &live());
        assert_eq!(ball.extras, 0);
        assert_eq!(ball.ball_type, BallType::Wide);
        assert!(!ball.legal_ball);

        let four = Selections { extras: ExtrasSelection::Wides(4), ..Default::default() };
        assert_eq!(derive_ball_event(&four, &live()).extras, 4);
    }

    #[test]
    fn byes_stay_legal() {
        let s = Selections { extras: ExtrasSelection::LegByes(2), ..Default::default() };
        let ball = derive_ball_event(&s, &live());
        assert_eq!(ball.ball_type, BallType::LegBye);
        assert!(ball.legal_ball);
        assert_eq!(ball.extras, 2);
    }

    #[test]
    fn runs_and_extras_are_kept_apart() {
        let s = Selections { runs: Some(2), extras: ExtrasSelection::NoBallRuns(1), ..Default::default() };
        let ball = derive_ball_event(&s, &live());
        assert_eq!((ball.runs_scored, ball.extras), (2, 1));
        assert_eq!(ball.ball_type, BallType::NoBall);
        assert_eq!(ball.total_runs(), 3);
    }

    #[test]
    fn first_section_in_scan_order_wins() {
        let picked = ExtrasSelection::from_sections([None, Some(2), Some(3), None, Some(1), None]);
        assert_eq!(picked, ExtrasSelection::Byes(2));
        assert_eq!(ExtrasSelection::from_sections([None; 6]), ExtrasSelection::None);
    }

    #[test]
    fn identity_fields_mirror_live_status() {
        let ball = derive_ball_event(&Selections::default(), &live());
        assert_eq!(ball.innings_id, 7);
        assert_eq!((ball.over_number, ball.ball_number), (3, 3));
        assert_eq!(ball.striker_id, Some(1));
        assert_eq!(ball.non_striker_id, Some(2));
        assert_eq!(ball.bowler_id, Some(50));
    }

    #[test]
    fn penalty_does_not_touch_legality() {
        let s = Selections { penalty: Some(5), ..Default::default() };
        let ball = derive_ball_event(&s, &live());
        assert_eq!(ball.penalty_runs, 5);
        assert!(ball.legal_ball);
        assert_eq!(ball.ball_type, BallType::Legal);
    }

    #[test]
    fn extras_buttons_are_mutually_exclusive() {
        let mut state = ScoringState::default();
        state.select(ScoringSection::Extras(ExtrasKind::Wides), 2);
        state.select(ScoringSection::Extras(ExtrasKind::Byes), 1);
        assert_eq!(state.selections.extras, ExtrasSelection::Byes(1));
        assert!(!state.is_selected(ScoringSection::Extras(ExtrasKind::Wides), 2));

        state.select(ScoringSection::Extras(ExtrasKind::Byes), 1);
        assert_eq!(state.selections.extras, ExtrasSelection::None);
    }

    #[test]
    fn runs_survive_an_extras_pick() {
        let mut state = ScoringState::default();
        state.select(ScoringSection::Runs, 1);
        state.select(ScoringSection::Extras(ExtrasKind::NoBallBye), 4);
        assert_eq!(state.selections.runs, Some(1));
        state.select(ScoringSection::Runs, 1);
        assert_eq!(state.selections.runs, None);
    }

    #[test]
    fn wicket_press_opens_dialog_and_cancel_leaves_draft() {
        let mut state = ScoringState::default();
        assert_eq!(state.select(ScoringSection::Wicket, 1), ScoringAction::OpenWicketDialog);
        state.open_wicket_dialog(vec![Choice { id: 1, label: "A".into() }], vec![]);
        state.cancel_wicket_dialog();
        assert!(!state.selections.wicket);
        assert!(state.wicket_detail.is_none());
        assert!(!state.ball_event(&live()).is_wicket);
    }

    #[test]
    fn wicket_submit_then_deselect_clears_everything() {
        let mut state = ScoringState::default();
        state.open_wicket_dialog(
            vec![Choice { id: 1, label: "A".into() }, Choice { id: 2, label: "B".into() }],
            vec![Choice { id: 60, label: "F".into() }],
        );
        assert!(!state.submit_wicket_dialog(), "incomplete form must not submit");

        let dialog = state.wicket_dialog.as_mut().unwrap();
        dialog.set_wicket_type(WicketType::Caught);
        dialog.set_dismissed(1);
        dialog.set_fielder(60);
        assert!(state.submit_wicket_dialog());

        let ball = state.ball_event(&live());
        assert!(ball.is_wicket);
        assert_eq!(ball.wicket_type, Some(WicketType::Caught));
        assert_eq!(ball.dismissed_player_id, Some(1));
        assert_eq!(ball.fielder_id, Some(60));

        assert_eq!(state.select(ScoringSection::Wicket, 1), ScoringAction::None);
        let ball = state.ball_event(&live());
        assert!(!ball.is_wicket);
        assert_eq!(ball.wicket_type, None);
        assert_eq!(ball.dismissed_player_id, None);
        assert_eq!(ball.fielder_id, None);
    }

    #[test]
    fn wicket_is_marked_only_by_a_complete_form() {
        let mut state = ScoringState::default();
        assert_eq!(state.select(ScoringSection::Wicket, 1), ScoringAction::OpenWicketDialog);
        assert!(!state.selections.wicket);

        state.open_wicket_dialog(vec![Choice { id: 1, label: "A".into() }], Vec::new());
        assert!(!state.submit_wicket_dialog());
        assert!(!state.selections.wicket);
        assert!(state.wicket_detail.is_none());

        state.cancel_wicket_dialog();
        assert!(!state.selections.wicket);
        assert!(state.ready_to_commit());
    }

    #[test]
    fn custom_value_is_accepted_uncapped() {
        let mut state = ScoringState::default();
        state.section = ScoringSection::Extras(ExtrasKind::Wides);
        state.start_custom();
        for c in "12x".chars() {
            state.push_custom_digit(c);
        }
        state.commit_custom();
        assert_eq!(state.selections.extras, ExtrasSelection::Wides(12));
        assert_eq!(
            state.custom_value(ScoringSection::Extras(ExtrasKind::Wides)),
            Some(12)
        );
        assert_eq!(state.custom_value(ScoringSection::Extras(ExtrasKind::Byes)), None);
    }

    #[test]
    fn cursor_stays_within_section_buttons() {
        let mut state = ScoringState::default();
        for _ in 0..10 {
            state.button_right();
        }
        assert_eq!(state.button, RUN_BUTTONS.len() - 1);
        for _ in 0..7 {
            state.section_down();
        }
        assert_eq!(state.section, ScoringSection::Penalty);
        assert_eq!(state.button, 0);
        state.section_down();
        state.section_down();
        assert_eq!(state.section, ScoringSection::Wicket);
    }

    #[test]
    fn reset_returns_to_a_clean_draft() {
        let mut state = ScoringState::default();
        state.select(ScoringSection::Runs, 6);
        state.selections.wicket = true;
        state.submitting = true;
        state.reset();
        assert_eq!(state.selections, Selections::default());
        assert!(!state.submitting);
    }
}
