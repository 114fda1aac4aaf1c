use chrono::{DateTime, Local};
use cricket_api::{BALLS_PER_OVER, CurrentBatsman, CurrentBowler, Id, LiveStatus};

/// Read-only copy of the server's live innings state. Identity fields of the
/// ball draft (batsmen, bowler, delivery position) are always taken from here.
#[derive(Debug, Default)]
pub struct LiveStatusMirror {
    innings_id: Option<Id>,
    status: Option<LiveStatus>,
    updated_at: Option<DateTime<Local>>,
}

impl LiveStatusMirror {
    /// Point the mirror at an innings. Switching innings drops the old snapshot.
    pub fn watch(&mut self, innings_id: Option<Id>) {
        if self.innings_id != innings_id {
            self.innings_id = innings_id;
            self.status = None;
            self.updated_at = None;
        }
    }

    /// Store a fresh snapshot. Returns false, keeping the old one, when the
    /// snapshot belongs to an innings that is no longer watched.
    pub fn apply(&mut self, status: LiveStatus) -> bool {
        if self.innings_id != Some(status.innings_id) {
            return false;
        }
        self.status = Some(status);
        self.updated_at = Some(Local::now());
        true
    }

    pub fn innings_id(&self) -> Option<Id> {
        self.innings_id
    }

    pub fn status(&self) -> Option<&LiveStatus> {
        self.status.as_ref()
    }

    pub fn updated_at(&self) -> Option<DateTime<Local>> {
        self.updated_at
    }

    pub fn batsmen(&self) -> &[CurrentBatsman] {
        self.status
            .as_ref()
            .map(|s| s.current_batsmen.as_slice())
            .unwrap_or(&[])
    }

    pub fn bowler(&self) -> Option<&CurrentBowler> {
        self.status.as_ref()?.current_bowler.as_ref()
    }

    pub fn striker_id(&self) -> Option<Id> {
        self.batsmen()
            .iter()
            .find(|b| b.is_striker)
            .map(|b| b.player_id)
    }

    pub fn non_striker_id(&self) -> Option<Id> {
        let striker = self.striker_id();
        self.batsmen()
            .iter()
            .find(|b| !b.is_striker && Some(b.player_id) != striker)
            .map(|b| b.player_id)
    }

    pub fn bowler_id(&self) -> Option<Id> {
        self.bowler().map(|b| b.player_id)
    }

    /// `(over_number, ball_number)` of the delivery about to be bowled.
    /// Overs count from 0; an illegal delivery is bowled again.
    pub fn next_delivery(&self) -> (u32, u8) {
        let Some(last) = self.status.as_ref().and_then(|s| s.last_ball) else {
            return (0, 1);
        };
        if !last.legal_ball {
            (last.over_number, last.ball_number.max(1))
        } else if last.ball_number >= BALLS_PER_OVER {
            (last.over_number + 1, 1)
        } else {
            (last.over_number, last.ball_number + 1)
        }
    }
}
