use cricket_api::wire::{MoveRequest, PositionUpdate, SwapRequest};
use cricket_api::{BattingOrderEntry, Id, MAX_BATTING_POSITION, MIN_BATTING_POSITION};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditRejected {
    OutOfRange(u8),
    /// Position belongs to a player at the crease.
    HeldByBatter { position: u8, player: String },
    NotEditable(Id),
}

impl fmt::Display for EditRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditRejected::OutOfRange(pos) => write!(
                f,
                "Position {pos} is outside {MIN_BATTING_POSITION}-{MAX_BATTING_POSITION}"
            ),
            EditRejected::HeldByBatter { position, player } => {
                write!(f, "Position {position} is held by {player}, who is batting")
            }
            EditRejected::NotEditable(id) => write!(f, "Player {id} cannot be moved"),
        }
    }
}

fn in_range(position: u8) -> bool {
    (MIN_BATTING_POSITION..=MAX_BATTING_POSITION).contains(&position)
}

fn is_batting(entry: &BattingOrderEntry, at_crease: &[Id]) -> bool {
    entry.currently_batting || at_crease.contains(&entry.player_id)
}

/// NOT_OUT players who are not at the crease, ordered by position. The live
/// mirror's batsmen count as batting even if the order has not caught up.
fn eligible(entries: &[BattingOrderEntry], at_crease: &[Id]) -> Vec<BattingOrderEntry> {
    let mut rows: Vec<_> = entries
        .iter()
        .filter(|e| e.is_editable() && !at_crease.contains(&e.player_id))
        .cloned()
        .collect();
    rows.sort_by_key(|e| (e.batting_position, e.player_id));
    rows
}

// ---------------------------------------------------------------------------
// Full reorder
// ---------------------------------------------------------------------------

/// Stages new positions for every waiting NOT_OUT player and submits the
/// whole order in one batch.
#[derive(Debug, Clone, Default)]
pub struct FullReorderEditor {
    batting: Vec<BattingOrderEntry>,
    editable: Vec<BattingOrderEntry>,
    out: Vec<BattingOrderEntry>,
    staged: BTreeMap<Id, u8>,
    duplicates: BTreeSet<u8>,
    /// Highlighted editable row.
    pub cursor: usize,
    /// Digits typed for the highlighted row.
    pub input: String,
    /// Blocking message from the last rejected edit.
    pub message: Option<String>,
}

impl FullReorderEditor {
    pub fn new(entries: &[BattingOrderEntry], at_crease: &[Id]) -> Self {
        let mut batting: Vec<_> = entries
            .iter()
            .filter(|e| is_batting(e, at_crease))
            .cloned()
            .collect();
        batting.sort_by_key(|e| e.batting_position);
        let mut out: Vec<_> = entries
            .iter()
            .filter(|e| e.status.is_out() && !is_batting(e, at_crease))
            .cloned()
            .collect();
        out.sort_by_key(|e| e.batting_position);
        let editable = eligible(entries, at_crease);
        let staged = editable
            .iter()
            .map(|e| (e.player_id, e.batting_position))
            .collect();

        let mut editor = Self { batting, editable, out, staged, ..Self::default() };
        editor.recount();
        editor
    }

    pub fn batting(&self) -> &[BattingOrderEntry] {
        &self.batting
    }

    pub fn editable(&self) -> &[BattingOrderEntry] {
        &self.editable
    }

    pub fn out(&self) -> &[BattingOrderEntry] {
        &self.out
    }

    pub fn staged_position(&self, player_id: Id) -> Option<u8> {
        self.staged.get(&player_id).copied()
    }

    pub fn duplicates(&self) -> &BTreeSet<u8> {
        &self.duplicates
    }

    pub fn can_save(&self) -> bool {
        self.duplicates.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.editable
            .iter()
            .any(|e| self.staged_position(e.player_id) != Some(e.batting_position))
    }

    /// Stage a new position. Rejected edits leave every staged value as-is.
    pub fn set_position(&mut self, player_id: Id, position: u8) -> Result<(), EditRejected> {
        if !self.staged.contains_key(&player_id) {
            return Err(EditRejected::NotEditable(player_id));
        }
        if !in_range(position) {
            return Err(EditRejected::OutOfRange(position));
        }
        if let Some(holder) = self.batting.iter().find(|e| e.batting_position == position) {
            return Err(EditRejected::HeldByBatter { position, player: holder.label() });
        }
        self.staged.insert(player_id, position);
        self.recount();
        Ok(())
    }

    fn recount(&mut self) {
        let mut counts: BTreeMap<u8, usize> = BTreeMap::new();
        for position in self.staged.values() {
            *counts.entry(*position).or_default() += 1;
        }
        self.duplicates = counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(position, _)| position)
            .collect();
    }

    /// Batting + staged + OUT players, sorted by position.
    pub fn submission(&self) -> Vec<PositionUpdate> {
        let mut order: Vec<PositionUpdate> = self
            .batting
            .iter()
            .chain(self.out.iter())
            .map(|e| PositionUpdate { player_id: e.player_id, batting_position: e.batting_position })
            .chain(
                self.staged
                    .iter()
                    .map(|(&player_id, &batting_position)| PositionUpdate { player_id, batting_position }),
            )
            .collect();
        order.sort_by_key(|u| (u.batting_position, u.player_id));
        order
    }

    // -- cursor / typing ----------------------------------------------------

    pub fn cursor_down(&mut self) {
        if self.cursor + 1 < self.editable.len() {
            self.cursor += 1;
            self.input.clear();
        }
    }

    pub fn cursor_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.input.clear();
        }
    }

    pub fn push_digit(&mut self, c: char) {
        if c.is_ascii_digit() && self.input.len() < 2 {
            self.input.push(c);
        }
    }

    pub fn pop_digit(&mut self) {
        self.input.pop();
    }

    /// Apply the typed digits to the highlighted row.
    pub fn apply_input(&mut self) {
        let Some(player_id) = self.editable.get(self.cursor).map(|e| e.player_id) else {
            return;
        };
        let Ok(position) = self.input.parse::<u8>() else {
            self.input.clear();
            return;
        };
        self.input.clear();
        match self.set_position(player_id, position) {
            Ok(()) => self.message = None,
            Err(e) => self.message = Some(e.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Single-position move
// ---------------------------------------------------------------------------

/// Moves one waiting player to a target slot. Unlike the full reorder this
/// does not check the target against other waiting players.
#[derive(Debug, Clone, Default)]
pub struct SingleMoveEditor {
    eligible: Vec<BattingOrderEntry>,
    pub player: Option<Id>,
    pub target: Option<u8>,
}

impl SingleMoveEditor {
    pub fn new(entries: &[BattingOrderEntry], at_crease: &[Id]) -> Self {
        Self { eligible: eligible(entries, at_crease), ..Self::default() }
    }

    pub fn eligible(&self) -> &[BattingOrderEntry] {
        &self.eligible
    }

    pub fn select_player(&mut self, player_id: Id) -> Result<(), EditRejected> {
        if !self.eligible.iter().any(|e| e.player_id == player_id) {
            return Err(EditRejected::NotEditable(player_id));
        }
        self.player = Some(player_id);
        Ok(())
    }

    pub fn cycle_player(&mut self, forward: bool) {
        if let Some(id) = cycle_id(&self.eligible, self.player, forward) {
            self.player = Some(id);
        }
    }

    pub fn set_target(&mut self, target: Option<u8>) {
        self.target = target;
    }

    pub fn adjust_target(&mut self, forward: bool) {
        self.target = Some(match (self.target, forward) {
            (None, _) => MIN_BATTING_POSITION,
            (Some(t), true) => t.saturating_add(1).min(MAX_BATTING_POSITION),
            (Some(t), false) => t.saturating_sub(1).max(MIN_BATTING_POSITION),
        });
    }

    pub fn can_save(&self) -> bool {
        self.player.is_some() && self.target.is_some_and(in_range)
    }

    pub fn request(&self) -> Option<MoveRequest> {
        if !self.can_save() {
            return None;
        }
        Some(MoveRequest { player_id: self.player?, new_batting_position: self.target? })
    }
}

// ---------------------------------------------------------------------------
// Two-player swap
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SwapSlot {
    #[default]
    First,
    Second,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapPreview {
    pub label: String,
    pub before: u8,
    pub after: u8,
}

#[derive(Debug, Clone, Default)]
pub struct SwapEditor {
    eligible: Vec<BattingOrderEntry>,
    pub first: Option<Id>,
    pub second: Option<Id>,
    pub focus: SwapSlot,
}

impl SwapEditor {
    pub fn new(entries: &[BattingOrderEntry], at_crease: &[Id]) -> Self {
        Self { eligible: eligible(entries, at_crease), ..Self::default() }
    }

    fn choice(&self, slot: SwapSlot) -> Option<Id> {
        match slot {
            SwapSlot::First => self.first,
            SwapSlot::Second => self.second,
        }
    }

    fn other(slot: SwapSlot) -> SwapSlot {
        match slot {
            SwapSlot::First => SwapSlot::Second,
            SwapSlot::Second => SwapSlot::First,
        }
    }

    /// Options for `slot`: every eligible player except the other slot's pick.
    pub fn options(&self, slot: SwapSlot) -> Vec<BattingOrderEntry> {
        let taken = self.choice(Self::other(slot));
        self.eligible
            .iter()
            .filter(|e| Some(e.player_id) != taken)
            .cloned()
            .collect()
    }

    pub fn select(&mut self, slot: SwapSlot, player_id: Id) -> Result<(), EditRejected> {
        if !self.options(slot).iter().any(|e| e.player_id == player_id) {
            return Err(EditRejected::NotEditable(player_id));
        }
        match slot {
            SwapSlot::First => self.first = Some(player_id),
            SwapSlot::Second => self.second = Some(player_id),
        }
        Ok(())
    }

    pub fn toggle_focus(&mut self) {
        self.focus = Self::other(self.focus);
    }

    pub fn cycle(&mut self, forward: bool) {
        let options = self.options(self.focus);
        if let Some(id) = cycle_id(&options, self.choice(self.focus), forward) {
            // `id` comes from the slot's own option list, so this cannot fail.
            let _ = self.select(self.focus, id);
        }
    }

    pub fn can_save(&self) -> bool {
        matches!((self.first, self.second), (Some(a), Some(b)) if a != b)
    }

    /// Before/after positions; each player takes the other's slot.
    pub fn preview(&self) -> Option<[SwapPreview; 2]> {
        let find = |id: Option<Id>| {
            let id = id?;
            self.eligible.iter().find(|e| e.player_id == id)
        };
        let (a, b) = (find(self.first)?, find(self.second)?);
        Some([
            SwapPreview { label: a.label(), before: a.batting_position, after: b.batting_position },
            SwapPreview { label: b.label(), before: b.batting_position, after: a.batting_position },
        ])
    }

    pub fn request(&self) -> Option<SwapRequest> {
        if !self.can_save() {
            return None;
        }
        Some(SwapRequest { player1_id: self.first?, player2_id: self.second? })
    }
}

fn cycle_id(rows: &[BattingOrderEntry], current: Option<Id>, forward: bool) -> Option<Id> {
    if rows.is_empty() {
        return None;
    }
    let len = rows.len();
    let idx = current.and_then(|id| rows.iter().position(|e| e.player_id == id));
    let next = match (idx, forward) {
        (None, _) => 0,
        (Some(i), true) => (i + 1) % len,
        (Some(i), false) => (i + len - 1) % len,
    };
    Some(rows[next].player_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cricket_api::BattingStatus;

    fn entry(player_id: Id, pos: u8, status: BattingStatus, batting: bool) -> BattingOrderEntry {
        BattingOrderEntry {
            player_id,
            player_name: Some(format!("P{player_id}")),
            batting_position: pos,
            status,
            currently_batting: batting,
            is_striker: false,
        }
    }

    /// 1 is out, 2 and 3 are at the crease, 4..=7 are waiting.
    fn order() -> Vec<BattingOrderEntry> {
        vec![
            entry(1, 1, BattingStatus::Bowled, false),
            entry(2, 2, BattingStatus::NotOut, true),
            entry(3, 3, BattingStatus::NotOut, true),
            entry(4, 4, BattingStatus::NotOut, false),
            entry(5, 5, BattingStatus::NotOut, false),
            entry(6, 6, BattingStatus::NotOut, false),
            entry(7, 7, BattingStatus::NotOut, false),
        ]
    }

    #[test]
    fn rows_are_split_by_state() {
        let editor = FullReorderEditor::new(&order(), &[]);
        let ids = |rows: &[BattingOrderEntry]| rows.iter().map(|e| e.player_id).collect::<Vec<_>>();
        assert_eq!(ids(editor.batting()), vec![2, 3]);
        assert_eq!(ids(editor.editable()), vec![4, 5, 6, 7]);
        assert_eq!(ids(editor.out()), vec![1]);
    }

    #[test]
    fn crease_list_marks_batters_read_only() {
        let mut entries = order();
        entries[3].currently_batting = false;
        let editor = FullReorderEditor::new(&entries, &[4]);
        assert!(editor.batting().iter().any(|e| e.player_id == 4));
        assert!(editor.staged_position(4).is_none());
    }

    #[test]
    fn duplicate_position_blocks_save_until_resolved() {
        let mut editor = FullReorderEditor::new(&order(), &[]);
        assert!(editor.can_save());

        editor.set_position(4, 5).unwrap();
        assert!(editor.duplicates().contains(&5));
        assert!(!editor.can_save());

        editor.set_position(5, 4).unwrap();
        assert!(editor.duplicates().is_empty());
        assert!(editor.can_save());
        assert!(editor.is_dirty());
    }

    #[test]
    fn batter_position_is_rejected_without_change() {
        let mut editor = FullReorderEditor::new(&order(), &[]);
        let err = editor.set_position(6, 2).unwrap_err();
        assert_eq!(err, EditRejected::HeldByBatter { position: 2, player: "P2".into() });
        assert_eq!(editor.staged_position(6), Some(6));
        assert!(!editor.is_dirty());
    }

    #[test]
    fn out_of_range_and_locked_players_are_rejected() {
        let mut editor = FullReorderEditor::new(&order(), &[]);
        assert_eq!(editor.set_position(4, 12), Err(EditRejected::OutOfRange(12)));
        assert_eq!(editor.set_position(4, 0), Err(EditRejected::OutOfRange(0)));
        assert_eq!(editor.set_position(2, 9), Err(EditRejected::NotEditable(2)));
        assert_eq!(editor.set_position(1, 9), Err(EditRejected::NotEditable(1)));
    }

    #[test]
    fn submission_rebuilds_the_whole_sorted_order() {
        let mut editor = FullReorderEditor::new(&order(), &[]);
        editor.set_position(7, 4).unwrap();
        editor.set_position(4, 7).unwrap();
        let sub = editor.submission();
        let pairs: Vec<_> = sub.iter().map(|u| (u.batting_position, u.player_id)).collect();
        assert_eq!(pairs, vec![(1, 1), (2, 2), (3, 3), (4, 7), (5, 5), (6, 6), (7, 4)]);
    }

    #[test]
    fn typed_input_goes_through_validation() {
        let mut editor = FullReorderEditor::new(&order(), &[]);
        editor.cursor_down(); // player 5
        editor.push_digit('3');
        editor.apply_input();
        assert!(editor.message.as_deref().unwrap().contains("batting"));
        assert_eq!(editor.staged_position(5), Some(5));

        editor.push_digit('9');
        editor.apply_input();
        assert_eq!(editor.message, None);
        assert_eq!(editor.staged_position(5), Some(9));
        assert!(editor.input.is_empty());
    }

    #[test]
    fn move_needs_player_and_in_range_target() {
        let mut mv = SingleMoveEditor::new(&order(), &[]);
        assert!(!mv.can_save());
        assert!(mv.select_player(2).is_err());
        mv.select_player(6).unwrap();
        assert!(!mv.can_save());
        mv.set_target(Some(12));
        assert!(!mv.can_save());
        mv.set_target(Some(11));
        assert_eq!(mv.request(), Some(MoveRequest { player_id: 6, new_batting_position: 11 }));
    }

    #[test]
    fn move_does_not_check_other_waiting_positions() {
        let mut mv = SingleMoveEditor::new(&order(), &[]);
        mv.select_player(4).unwrap();
        mv.set_target(Some(5));
        assert!(mv.can_save());
    }

    #[test]
    fn move_target_adjusts_within_bounds() {
        let mut mv = SingleMoveEditor::new(&order(), &[]);
        mv.adjust_target(false);
        assert_eq!(mv.target, Some(1));
        mv.adjust_target(false);
        assert_eq!(mv.target, Some(1));
        mv.set_target(Some(11));
        mv.adjust_target(true);
        assert_eq!(mv.target, Some(11));
    }

    #[test]
    fn swap_slot_options_exclude_the_other_pick() {
        let mut swap = SwapEditor::new(&order(), &[]);
        swap.select(SwapSlot::First, 4).unwrap();
        let second: Vec<_> = swap.options(SwapSlot::Second).iter().map(|e| e.player_id).collect();
        assert_eq!(second, vec![5, 6, 7]);
        assert_eq!(swap.select(SwapSlot::Second, 4), Err(EditRejected::NotEditable(4)));
        assert!(!swap.can_save());
    }

    #[test]
    fn swap_preview_exchanges_positions() {
        let mut swap = SwapEditor::new(&order(), &[]);
        swap.select(SwapSlot::First, 4).unwrap();
        swap.select(SwapSlot::Second, 7).unwrap();
        let [a, b] = swap.preview().unwrap();
        assert_eq!((a.before, a.after), (4, 7));
        assert_eq!((b.before, b.after), (7, 4));
        assert_eq!(swap.request(), Some(SwapRequest { player1_id: 4, player2_id: 7 }));
    }

    #[test]
    fn swap_cycle_skips_the_other_slot() {
        let mut swap = SwapEditor::new(&order(), &[]);
        swap.select(SwapSlot::First, 5).unwrap();
        swap.toggle_focus();
        swap.cycle(true);
        assert_eq!(swap.second, Some(4));
        swap.cycle(true);
        assert_eq!(swap.second, Some(6));
    }
}
