use cricket_api::{BallEvent, Id, WicketType};

/// Details collected by the wicket dialog and patched onto the ball draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WicketDetail {
    pub wicket_type: WicketType,
    pub dismissed_player_id: Id,
    pub fielder_id: Option<Id>,
}

impl WicketDetail {
    /// Only applies to a draft already flagged as a wicket.
    pub fn apply_to(&self, ball: &mut BallEvent) {
        if !ball.is_wicket {
            return;
        }
        ball.wicket_type = Some(self.wicket_type);
        ball.dismissed_player_id = Some(self.dismissed_player_id);
        ball.fielder_id = self.fielder_id;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub id: Id,
    pub label: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WicketField {
    #[default]
    Kind,
    Dismissed,
    Fielder,
}

#[derive(Debug, Clone, Default)]
pub struct WicketDialog {
    /// The two batsmen at the crease; the dismissed player must be one of them.
    pub batsmen: Vec<Choice>,
    /// Bowling side, offered when the dismissal names a fielder.
    pub fielders: Vec<Choice>,
    pub wicket_type: Option<WicketType>,
    pub dismissed_player_id: Option<Id>,
    pub fielder_id: Option<Id>,
    pub focus: WicketField,
}

impl WicketDialog {
    pub fn new(batsmen: Vec<Choice>, fielders: Vec<Choice>, existing: Option<&WicketDetail>) -> Self {
        let mut dialog = Self { batsmen, fielders, ..Self::default() };
        if let Some(detail) = existing {
            dialog.set_wicket_type(detail.wicket_type);
            dialog.set_dismissed(detail.dismissed_player_id);
            if let Some(fielder) = detail.fielder_id {
                dialog.set_fielder(fielder);
            }
        }
        dialog
    }

    pub fn needs_fielder(&self) -> bool {
        self.wicket_type.is_some_and(|w| w.requires_fielder())
    }

    pub fn set_wicket_type(&mut self, wicket_type: WicketType) {
        self.wicket_type = Some(wicket_type);
        if !wicket_type.requires_fielder() {
            self.fielder_id = None;
            if self.focus == WicketField::Fielder {
                self.focus = WicketField::Dismissed;
            }
        }
    }

    /// Rejects anyone who is not currently at the crease.
    pub fn set_dismissed(&mut self, player_id: Id) -> bool {
        if self.batsmen.iter().any(|b| b.id == player_id) {
            self.dismissed_player_id = Some(player_id);
            true
        } else {
            false
        }
    }

    pub fn set_fielder(&mut self, player_id: Id) -> bool {
        if self.needs_fielder() && self.fielders.iter().any(|f| f.id == player_id) {
            self.fielder_id = Some(player_id);
            true
        } else {
            false
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            WicketField::Kind => WicketField::Dismissed,
            WicketField::Dismissed if self.needs_fielder() => WicketField::Fielder,
            WicketField::Dismissed | WicketField::Fielder => WicketField::Kind,
        };
    }

    pub fn focus_prev(&mut self) {
        self.focus = match self.focus {
            WicketField::Kind if self.needs_fielder() => WicketField::Fielder,
            WicketField::Kind => WicketField::Dismissed,
            WicketField::Dismissed => WicketField::Kind,
            WicketField::Fielder => WicketField::Dismissed,
        };
    }

    /// Step the focused field through its options.
    pub fn cycle(&mut self, forward: bool) {
        match self.focus {
            WicketField::Kind => {
                let idx = self
                    .wicket_type
                    .and_then(|w| WicketType::ALL.iter().position(|k| *k == w));
                let next = step(idx, WicketType::ALL.len(), forward);
                self.set_wicket_type(WicketType::ALL[next]);
            }
            WicketField::Dismissed => {
                if self.batsmen.is_empty() {
                    return;
                }
                let idx = self
                    .dismissed_player_id
                    .and_then(|id| self.batsmen.iter().position(|b| b.id == id));
                let next = step(idx, self.batsmen.len(), forward);
                self.dismissed_player_id = Some(self.batsmen[next].id);
            }
            WicketField::Fielder => {
                if self.fielders.is_empty() || !self.needs_fielder() {
                    return;
                }
                let idx = self
                    .fielder_id
                    .and_then(|id| self.fielders.iter().position(|f| f.id == id));
                let next = step(idx, self.fielders.len(), forward);
                self.fielder_id = Some(self.fielders[next].id);
            }
        }
    }

    pub fn is_form_valid(&self) -> bool {
        self.wicket_type.is_some()
            && self.dismissed_player_id.is_some()
            && (!self.needs_fielder() || self.fielder_id.is_some())
    }

    pub fn submit(&self) -> Option<WicketDetail> {
        if !self.is_form_valid() {
            return None;
        }
        Some(WicketDetail {
            wicket_type: self.wicket_type?,
            dismissed_player_id: self.dismissed_player_id?,
            fielder_id: self.fielder_id,
        })
    }

    pub fn label_for(choices: &[Choice], id: Option<Id>) -> &str {
        id.and_then(|id| choices.iter().find(|c| c.id == id))
            .map(|c| c.label.as_str())
            .unwrap_or("-")
    }
}

fn step(current: Option<usize>, len: usize, forward: bool) -> usize {
    match (current, forward) {
        (None, true) => 0,
        (None, false) => len - 1,
        (Some(i), true) => (i + 1) % len,
        (Some(i), false) => (i + len - 1) % len,
    }
}
