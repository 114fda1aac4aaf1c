pub mod client;
pub mod wire;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Server-assigned record id.
pub type Id = i64;

/// Batting positions run 1..=11.
pub const MIN_BATTING_POSITION: u8 = 1;
pub const MAX_BATTING_POSITION: u8 = 11;

/// Legal deliveries in an over.
pub const BALLS_PER_OVER: u8 = 6;

// ---------------------------------------------------------------------------
// CRUD resources
// ---------------------------------------------------------------------------

/// A plain CRUD collection on the scoring API.
pub trait Resource: DeserializeOwned + Clone + Send + 'static {
    /// Path segment under the API base, e.g. `teams`.
    const PATH: &'static str;
    /// Human label used in headers and log lines.
    const LABEL: &'static str;
    /// Form fields staged before POST/PUT.
    type Draft: Serialize + Validate + Sync;

    fn id(&self) -> Id;
    fn display_name(&self) -> String;
}

/// Required-field check run before a draft is sent.
pub trait Validate {
    /// Returns the name of the first missing required field.
    fn validate(&self) -> Result<(), &'static str>;
}

fn require_text(value: &str, field: &'static str) -> Result<(), &'static str> {
    if value.trim().is_empty() { Err(field) } else { Ok(()) }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: Id,
    pub name: String,
    pub short_name: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamDraft {
    pub name: String,
    pub short_name: Option<String>,
    pub country: Option<String>,
}

impl Validate for TeamDraft {
    fn validate(&self) -> Result<(), &'static str> {
        require_text(&self.name, "name")
    }
}

impl Resource for Team {
    const PATH: &'static str = "teams";
    const LABEL: &'static str = "Teams";
    type Draft = TeamDraft;

    fn id(&self) -> Id {
        self.id
    }

    fn display_name(&self) -> String {
        match self.short_name.as_deref() {
            Some(short) if !short.is_empty() => format!("{} ({short})", self.name),
            _ => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: Id,
    pub name: String,
    pub team_id: Option<Id>,
    pub role: Option<String>,
    pub batting_style: Option<String>,
    pub bowling_style: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerDraft {
    pub name: String,
    pub team_id: Option<Id>,
    pub role: Option<String>,
    pub batting_style: Option<String>,
    pub bowling_style: Option<String>,
}

impl Validate for PlayerDraft {
    fn validate(&self) -> Result<(), &'static str> {
        require_text(&self.name, "name")
    }
}

impl Resource for Player {
    const PATH: &'static str = "players";
    const LABEL: &'static str = "Players";
    type Draft = PlayerDraft;

    fn id(&self) -> Id {
        self.id
    }

    fn display_name(&self) -> String {
        match self.role.as_deref() {
            Some(role) if !role.is_empty() => format!("{} - {role}", self.name),
            _ => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Official {
    pub id: Id,
    pub name: String,
    pub role: Option<String>, // "umpire", "third umpire", "referee", ...
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OfficialDraft {
    pub name: String,
    pub role: Option<String>,
    pub country: Option<String>,
}

impl Validate for OfficialDraft {
    fn validate(&self) -> Result<(), &'static str> {
        require_text(&self.name, "name")
    }
}

impl Resource for Official {
    const PATH: &'static str = "matchOfficials";
    const LABEL: &'static str = "Officials";
    type Draft = OfficialDraft;

    fn id(&self) -> Id {
        self.id
    }

    fn display_name(&self) -> String {
        match self.role.as_deref() {
            Some(role) if !role.is_empty() => format!("{} ({role})", self.name),
            _ => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    pub id: Id,
    pub match_id: Option<Id>,
    pub conditions: Option<String>,
    pub temperature: Option<f32>, // celsius
    pub humidity: Option<f32>,    // percent
    pub wind_speed: Option<f32>,  // km/h
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherDraft {
    pub match_id: Option<Id>,
    pub conditions: Option<String>,
    pub temperature: Option<f32>,
    pub humidity: Option<f32>,
    pub wind_speed: Option<f32>,
}

impl Validate for WeatherDraft {
    fn validate(&self) -> Result<(), &'static str> {
        self.match_id.map(|_| ()).ok_or("match_id")
    }
}

impl Resource for Weather {
    const PATH: &'static str = "weather";
    const LABEL: &'static str = "Weather";
    type Draft = WeatherDraft;

    fn id(&self) -> Id {
        self.id
    }

    fn display_name(&self) -> String {
        let conditions = self.conditions.as_deref().unwrap_or("unknown");
        let temperature = self
            .temperature
            .map(|t| format!(" {t:.0}°C"))
            .unwrap_or_default();
        match self.match_id {
            Some(match_id) => format!("match {match_id}: {conditions}{temperature}"),
            None => format!("{conditions}{temperature}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Matches and innings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    #[default]
    Scheduled,
    Live,
    Completed,
    Abandoned,
    #[serde(other)]
    Unknown,
}

impl MatchStatus {
    pub fn label(&self) -> &'static str {
        match self {
            MatchStatus::Scheduled => "SCH",
            MatchStatus::Live => "LIVE",
            MatchStatus::Completed => "FNL",
            MatchStatus::Abandoned => "ABD",
            MatchStatus::Unknown => "---",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: Id,
    pub team1_id: Id,
    pub team2_id: Id,
    pub team1_name: Option<String>,
    pub team2_name: Option<String>,
    pub venue: Option<String>,
    pub match_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: MatchStatus,
    pub overs_per_innings: Option<u8>,
}

impl Match {
    pub fn title(&self) -> String {
        let team1 = self
            .team1_name
            .clone()
            .unwrap_or_else(|| format!("Team {}", self.team1_id));
        let team2 = self
            .team2_name
            .clone()
            .unwrap_or_else(|| format!("Team {}", self.team2_id));
        format!("{team1} vs {team2}")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchDraft {
    pub team1_id: Option<Id>,
    pub team2_id: Option<Id>,
    pub venue: Option<String>,
    pub match_date: Option<DateTime<Utc>>,
    pub overs_per_innings: Option<u8>,
}

impl Validate for MatchDraft {
    fn validate(&self) -> Result<(), &'static str> {
        self.team1_id.ok_or("team1_id")?;
        self.team2_id.ok_or("team2_id")?;
        Ok(())
    }
}

impl Resource for Match {
    const PATH: &'static str = "matches";
    const LABEL: &'static str = "Matches";
    type Draft = MatchDraft;

    fn id(&self) -> Id {
        self.id
    }

    fn display_name(&self) -> String {
        self.title()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Squad {
    pub team_id: Id,
    pub team_name: Option<String>,
    #[serde(default)]
    pub players: Vec<Player>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InningsStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Innings {
    pub id: Id,
    pub match_id: Id,
    pub innings_number: u8,
    pub batting_team_id: Id,
    pub bowling_team_id: Id,
    #[serde(default)]
    pub total_runs: u32,
    #[serde(default)]
    pub wickets: u8,
    #[serde(default)]
    pub status: InningsStatus,
}

/// Everything the match screen needs, fetched as one concurrent batch.
#[derive(Debug, Clone, Default)]
pub struct MatchDetail {
    pub summary: Match,
    pub squads: Vec<Squad>,
    pub innings: Vec<Innings>,
}

impl MatchDetail {
    /// The innings in progress, or failing that the highest-numbered one.
    pub fn current_innings(&self) -> Option<&Innings> {
        self.innings
            .iter()
            .find(|i| i.status == InningsStatus::InProgress)
            .or_else(|| self.innings.iter().max_by_key(|i| i.innings_number))
    }

    pub fn squad(&self, team_id: Id) -> Option<&Squad> {
        self.squads.iter().find(|s| s.team_id == team_id)
    }

    pub fn player_name(&self, player_id: Id) -> Option<&str> {
        self.squads
            .iter()
            .flat_map(|s| s.players.iter())
            .find(|p| p.id == player_id)
            .map(|p| p.name.as_str())
    }
}

// ---------------------------------------------------------------------------
// Ball-by-ball
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BallType {
    #[default]
    Legal,
    Wide,
    Bye,
    LegBye,
    NoBall,
}

impl BallType {
    pub fn label(&self) -> &'static str {
        match self {
            BallType::Legal => "-",
            BallType::Wide => "wd",
            BallType::Bye => "b",
            BallType::LegBye => "lb",
            BallType::NoBall => "nb",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WicketType {
    Bowled,
    Caught,
    Lbw,
    RunOut,
    Stumped,
    HitWicket,
    HandledBall,
    ObstructingField,
    TimedOut,
    HitBallTwice,
    RetiredHurt,
    RetiredOut,
}

impl WicketType {
    pub const ALL: [WicketType; 12] = [
        WicketType::Bowled,
        WicketType::Caught,
        WicketType::Lbw,
        WicketType::RunOut,
        WicketType::Stumped,
        WicketType::HitWicket,
        WicketType::HandledBall,
        WicketType::ObstructingField,
        WicketType::TimedOut,
        WicketType::HitBallTwice,
        WicketType::RetiredHurt,
        WicketType::RetiredOut,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            WicketType::Bowled => "Bowled",
            WicketType::Caught => "Caught",
            WicketType::Lbw => "LBW",
            WicketType::RunOut => "Run out",
            WicketType::Stumped => "Stumped",
            WicketType::HitWicket => "Hit wicket",
            WicketType::HandledBall => "Handled the ball",
            WicketType::ObstructingField => "Obstructing the field",
            WicketType::TimedOut => "Timed out",
            WicketType::HitBallTwice => "Hit the ball twice",
            WicketType::RetiredHurt => "Retired hurt",
            WicketType::RetiredOut => "Retired out",
        }
    }

    /// Only catches and run outs name a fielder.
    pub fn requires_fielder(&self) -> bool {
        matches!(self, WicketType::Caught | WicketType::RunOut)
    }
}

/// Draft of a single delivery, in the shape the API accepts on commit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BallEvent {
    pub innings_id: Id,
    pub over_number: u32,
    pub ball_number: u8,
    pub legal_ball: bool,
    pub ball_type: BallType,
    pub runs_scored: u32,
    pub extras: u32,
    #[serde(default)]
    pub penalty_runs: u32,
    pub is_wicket: bool,
    pub wicket_type: Option<WicketType>,
    pub dismissed_player_id: Option<Id>,
    pub fielder_id: Option<Id>,
    pub striker_id: Option<Id>,
    pub non_striker_id: Option<Id>,
    pub bowler_id: Option<Id>,
}

impl BallEvent {
    pub fn total_runs(&self) -> u32 {
        self.runs_scored + self.extras + self.penalty_runs
    }
}

/// A committed delivery as the server reports it in the innings history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BallRecord {
    pub id: Id,
    #[serde(flatten)]
    pub event: BallEvent,
    pub striker_name: Option<String>,
    pub bowler_name: Option<String>,
}

// ---------------------------------------------------------------------------
// Live status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentBatsman {
    pub player_id: Id,
    pub name: Option<String>,
    #[serde(default)]
    pub is_striker: bool,
    #[serde(default)]
    pub runs: u32,
    #[serde(default)]
    pub balls_faced: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentBowler {
    pub player_id: Id,
    pub name: Option<String>,
    #[serde(default)]
    pub balls_bowled: u32,
    #[serde(default)]
    pub runs_conceded: u32,
    #[serde(default)]
    pub wickets: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastBall {
    pub over_number: u32,
    pub ball_number: u8,
    pub legal_ball: bool,
}

/// Server snapshot of who is in and where the innings stands.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiveStatus {
    pub innings_id: Id,
    #[serde(default)]
    pub current_batsmen: Vec<CurrentBatsman>,
    pub current_bowler: Option<CurrentBowler>,
    pub last_ball: Option<LastBall>,
    #[serde(default)]
    pub total_runs: u32,
    #[serde(default)]
    pub wickets: u8,
}

// ---------------------------------------------------------------------------
// Batting order
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BattingStatus {
    #[default]
    NotOut,
    Caught,
    Bowled,
    Lbw,
    RunOut,
    Stumped,
    /// Any dismissal the server reports beyond the common five.
    #[serde(other)]
    OtherDismissal,
}

impl BattingStatus {
    pub fn is_out(&self) -> bool {
        *self != BattingStatus::NotOut
    }

    pub fn label(&self) -> &'static str {
        match self {
            BattingStatus::NotOut => "not out",
            BattingStatus::Caught => "caught",
            BattingStatus::Bowled => "bowled",
            BattingStatus::Lbw => "lbw",
            BattingStatus::RunOut => "run out",
            BattingStatus::Stumped => "stumped",
            BattingStatus::OtherDismissal => "out",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BattingOrderEntry {
    pub player_id: Id,
    pub player_name: Option<String>,
    pub batting_position: u8,
    #[serde(default)]
    pub status: BattingStatus,
    #[serde(default)]
    pub currently_batting: bool,
    #[serde(default)]
    pub is_striker: bool,
}

impl BattingOrderEntry {
    pub fn label(&self) -> String {
        self.player_name
            .clone()
            .unwrap_or_else(|| format!("Player {}", self.player_id))
    }

    /// NOT_OUT and waiting to bat: the only entries an editor may move.
    pub fn is_editable(&self) -> bool {
        !self.status.is_out() && !self.currently_batting
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_catches_and_run_outs_need_a_fielder() {
        let needing: Vec<_> = WicketType::ALL
            .iter()
            .filter(|w| w.requires_fielder())
            .collect();
        assert_eq!(needing, vec![&WicketType::Caught, &WicketType::RunOut]);
    }

    #[test]
    fn unknown_dismissal_status_is_still_out() {
        let entry: BattingOrderEntry = serde_json::from_str(
            r#"{"player_id": 4, "batting_position": 3, "status": "HIT_WICKET"}"#,
        )
        .unwrap();
        assert_eq!(entry.status, BattingStatus::OtherDismissal);
        assert!(entry.status.is_out());
        assert!(!entry.is_editable());
    }

    #[test]
    fn current_innings_prefers_in_progress() {
        let detail = MatchDetail {
            innings: vec![
                Innings { id: 1, innings_number: 1, status: InningsStatus::InProgress, ..Default::default() },
                Innings { id: 2, innings_number: 2, status: InningsStatus::NotStarted, ..Default::default() },
            ],
            ..Default::default()
        };
        assert_eq!(detail.current_innings().map(|i| i.id), Some(1));
    }

    #[test]
    fn current_innings_falls_back_to_latest() {
        let detail = MatchDetail {
            innings: vec![
                Innings { id: 1, innings_number: 1, status: InningsStatus::Completed, ..Default::default() },
                Innings { id: 2, innings_number: 2, status: InningsStatus::Completed, ..Default::default() },
            ],
            ..Default::default()
        };
        assert_eq!(detail.current_innings().map(|i| i.id), Some(2));
    }

    #[test]
    fn drafts_require_their_key_fields() {
        assert_eq!(TeamDraft::default().validate(), Err("name"));
        assert_eq!(
            TeamDraft { name: "Lions".into(), ..Default::default() }.validate(),
            Ok(())
        );
        assert_eq!(WeatherDraft::default().validate(), Err("match_id"));
        assert_eq!(
            MatchDraft { team1_id: Some(1), ..Default::default() }.validate(),
            Err("team2_id")
        );
    }

    #[test]
    fn ball_record_flattens_event_fields() {
        let record: BallRecord = serde_json::from_str(
            r#"{
                "id": 90, "innings_id": 3, "over_number": 4, "ball_number": 2,
                "legal_ball": false, "ball_type": "WIDE", "runs_scored": 0, "extras": 1,
                "is_wicket": false, "striker_name": "Root"
            }"#,
        )
        .unwrap();
        assert_eq!(record.event.ball_type, BallType::Wide);
        assert_eq!(record.event.extras, 1);
        assert_eq!(record.striker_name.as_deref(), Some("Root"));
    }
}
