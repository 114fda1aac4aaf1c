use crate::wire::{BattingOrderPayload, Envelope, MoveRequest, PositionUpdate, SwapRequest};
use crate::{
    BallEvent, BallRecord, BattingOrderEntry, Id, Innings, LiveStatus, Match, MatchDetail,
    Resource, Squad, Validate,
};
use futures_util::future::try_join3;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

pub const DEFAULT_BASE_URL: &str = "https://cricket-score-board-v4g9.onrender.com/api";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Client for the remote scoring API. The API is the system of record; this
/// type only shuttles JSON and unwraps the `{ success, data }` envelope.
#[derive(Debug, Clone)]
pub struct CricketApi {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl Default for CricketApi {
    fn default() -> Self {
        Self {
            client: Client::builder()
                .user_agent("crease/0.1 (terminal scorer)")
                .build()
                .unwrap_or_default(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Status { status: u16, url: String, message: Option<String> },
    Rejected { url: String, message: String },
    Parsing(serde_json::Error, String),
    /// A draft was missing a required field; nothing was sent.
    Invalid(&'static str),
    Other(String),
}

impl ApiError {
    /// Short text for an alert: the server's own message when it sent one.
    pub fn summary(&self) -> String {
        match self {
            ApiError::Status { message: Some(message), .. } => message.clone(),
            ApiError::Rejected { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Status { status, url, message: Some(message) } => {
                write!(f, "HTTP {status} for {url}: {message}")
            }
            ApiError::Status { status, url, message: None } => write!(f, "HTTP {status} for {url}"),
            ApiError::Rejected { url, message } => write!(f, "Request rejected by {url}: {message}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::Invalid(field) => write!(f, "Missing required field: {field}"),
            ApiError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl CricketApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -----------------------------------------------------------------------
    // Plain CRUD collections
    // -----------------------------------------------------------------------

    pub async fn list<R: Resource>(&self) -> ApiResult<Vec<R>> {
        self.get(self.url(R::PATH)).await
    }

    /// Server-side filtered listing. An empty query is a plain listing.
    pub async fn search<R: Resource>(&self, query: &str) -> ApiResult<Vec<R>> {
        let query = query.trim();
        if query.is_empty() {
            return self.list::<R>().await;
        }
        let url = Url::parse_with_params(&self.url(R::PATH), [("search", query)])
            .map_err(|e| ApiError::Other(format!("invalid search url: {e}")))?;
        self.get(url.to_string()).await
    }

    pub async fn fetch<R: Resource>(&self, id: Id) -> ApiResult<R> {
        self.get(self.url(&format!("{}/{id}", R::PATH))).await
    }

    pub async fn create<R: Resource>(&self, draft: &R::Draft) -> ApiResult<R> {
        draft.validate().map_err(ApiError::Invalid)?;
        self.send(Method::POST, self.url(R::PATH), draft).await
    }

    pub async fn update<R: Resource>(&self, id: Id, draft: &R::Draft) -> ApiResult<R> {
        draft.validate().map_err(ApiError::Invalid)?;
        self.send(Method::PUT, self.url(&format!("{}/{id}", R::PATH)), draft).await
    }

    pub async fn delete<R: Resource>(&self, id: Id) -> ApiResult<()> {
        self.send_unit::<()>(Method::DELETE, self.url(&format!("{}/{id}", R::PATH)), None)
            .await
    }

    // -----------------------------------------------------------------------
    // Match screen
    // -----------------------------------------------------------------------

    pub async fn fetch_match(&self, match_id: Id) -> ApiResult<Match> {
        self.fetch::<Match>(match_id).await
    }

    pub async fn fetch_squads(&self, match_id: Id) -> ApiResult<Vec<Squad>> {
        self.get(self.url(&format!("matches/{match_id}/squads"))).await
    }

    pub async fn fetch_match_innings(&self, match_id: Id) -> ApiResult<Vec<Innings>> {
        self.get(self.url(&format!("innings/match/{match_id}"))).await
    }

    /// Match, squads and innings, requested concurrently. The first failure
    /// fails the whole load.
    pub async fn fetch_match_detail(&self, match_id: Id) -> ApiResult<MatchDetail> {
        let (summary, squads, innings) = try_join3(
            self.fetch_match(match_id),
            self.fetch_squads(match_id),
            self.fetch_match_innings(match_id),
        )
        .await?;
        Ok(MatchDetail { summary, squads, innings })
    }

    // -----------------------------------------------------------------------
    // Ball-by-ball
    // -----------------------------------------------------------------------

    pub async fn fetch_live_status(&self, innings_id: Id) -> ApiResult<LiveStatus> {
        self.get(self.ball_url(innings_id, "live")).await
    }

    pub async fn fetch_balls(&self, innings_id: Id) -> ApiResult<Vec<BallRecord>> {
        self.get(self.ball_url(innings_id, "balls")).await
    }

    pub async fn record_ball(&self, ball: &BallEvent) -> ApiResult<BallRecord> {
        self.send(Method::POST, self.ball_url(ball.innings_id, "balls"), ball)
            .await
    }

    pub async fn fetch_batting_order(&self, innings_id: Id) -> ApiResult<Vec<BattingOrderEntry>> {
        self.get(self.ball_url(innings_id, "batting-order")).await
    }

    /// Replace the whole order in one batch.
    pub async fn replace_batting_order(
        &self,
        innings_id: Id,
        order: &[PositionUpdate],
    ) -> ApiResult<()> {
        let payload = BattingOrderPayload { batting_order: order };
        self.send_unit(Method::PUT, self.ball_url(innings_id, "batting-order"), Some(&payload))
            .await
    }

    pub async fn move_batter(&self, innings_id: Id, request: &MoveRequest) -> ApiResult<()> {
        self.send_unit(
            Method::PATCH,
            self.ball_url(innings_id, "batting-order/move"),
            Some(request),
        )
        .await
    }

    /// The server exchanges both positions atomically.
    pub async fn swap_batters(&self, innings_id: Id, request: &SwapRequest) -> ApiResult<()> {
        self.send_unit(
            Method::PATCH,
            self.ball_url(innings_id, "batting-order/swap"),
            Some(request),
        )
        .await
    }

    // -----------------------------------------------------------------------
    // Transport
    // -----------------------------------------------------------------------

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn ball_url(&self, innings_id: Id, tail: &str) -> String {
        self.url(&format!("ballByBall/innings/{innings_id}/{tail}"))
    }

    async fn get<T: DeserializeOwned>(&self, url: String) -> ApiResult<T> {
        let envelope = self.execute::<T>(self.client.get(&url), &url).await?;
        into_data(envelope, &url)
    }

    async fn send<B, T>(&self, method: Method, url: String, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.client.request(method, &url).json(body);
        let envelope = self.execute::<T>(builder, &url).await?;
        into_data(envelope, &url)
    }

    async fn send_unit<B>(&self, method: Method, url: String, body: Option<&B>) -> ApiResult<()>
    where
        B: Serialize + ?Sized,
    {
        let mut builder = self.client.request(method, &url);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.execute::<serde_json::Value>(builder, &url).await.map(|_| ())
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        url: &str,
    ) -> ApiResult<Envelope<T>> {
        let response = builder
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<Envelope<serde_json::Value>>(&body)
                .ok()
                .and_then(|e| e.failure_message());
            return Err(ApiError::Status { status: status.as_u16(), url: url.to_owned(), message });
        }

        let envelope: Envelope<T> =
            serde_json::from_str(&body).map_err(|e| ApiError::Parsing(e, url.to_owned()))?;
        if !envelope.success {
            return Err(ApiError::Rejected {
                url: url.to_owned(),
                message: envelope
                    .failure_message()
                    .unwrap_or_else(|| "request was not successful".to_string()),
            });
        }
        Ok(envelope)
    }
}

fn into_data<T>(envelope: Envelope<T>, url: &str) -> ApiResult<T> {
    envelope.data.ok_or_else(|| ApiError::Rejected {
        url: url.to_owned(),
        message: "response carried no data".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BallType, Team, TeamDraft, Weather};
    use mockito::Matcher;
    use serde_json::json;

    fn api_for(server: &mockito::ServerGuard) -> CricketApi {
        CricketApi::new().with_base_url(server.url())
    }

    fn ok_body(data: serde_json::Value) -> String {
        json!({ "success": true, "data": data }).to_string()
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let api = CricketApi::new().with_base_url("http://localhost:9000/api/");
        assert_eq!(api.base_url(), "http://localhost:9000/api");
        assert_eq!(api.url("/teams"), "http://localhost:9000/api/teams");
    }

    #[test]
    fn summary_prefers_server_message() {
        let err = ApiError::Status {
            status: 422,
            url: "http://x/balls".into(),
            message: Some("Over already complete".into()),
        };
        assert_eq!(err.summary(), "Over already complete");
        assert_eq!(err.to_string(), "HTTP 422 for http://x/balls: Over already complete");
    }

    #[tokio::test]
    async fn list_unwraps_envelope() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/teams")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(ok_body(json!([
                { "id": 1, "name": "Lions", "short_name": "LIO" },
                { "id": 2, "name": "Tigers" }
            ])))
            .create_async()
            .await;

        let teams = api_for(&server).list::<Team>().await.unwrap();
        mock.assert_async().await;
        assert_eq!(teams.len(), 2);
        assert_eq!(teams[0].display_name(), "Lions (LIO)");
        assert_eq!(teams[1].short_name, None);
    }

    #[tokio::test]
    async fn search_sends_query_parameter() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/weather")
            .match_query(Matcher::UrlEncoded("search".into(), "light rain".into()))
            .with_status(200)
            .with_body(ok_body(json!([{ "id": 5, "match_id": 9, "conditions": "light rain" }])))
            .create_async()
            .await;

        let rows = api_for(&server).search::<Weather>(" light rain ").await.unwrap();
        mock.assert_async().await;
        assert_eq!(rows[0].match_id, Some(9));
    }

    #[tokio::test]
    async fn unsuccessful_envelope_is_rejected_with_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/teams/3")
            .with_status(200)
            .with_body(json!({ "success": false, "error": { "message": "Team not found" } }).to_string())
            .create_async()
            .await;

        let err = api_for(&server).fetch::<Team>(3).await.unwrap_err();
        match err {
            ApiError::Rejected { message, .. } => assert_eq!(message, "Team not found"),
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn http_error_carries_server_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/ballByBall/innings/4/balls")
            .with_status(422)
            .with_body(json!({ "success": false, "message": "Invalid ball number" }).to_string())
            .create_async()
            .await;

        let ball = BallEvent { innings_id: 4, ..Default::default() };
        let err = api_for(&server).record_ball(&ball).await.unwrap_err();
        match err {
            ApiError::Status { status, message, .. } => {
                assert_eq!(status, 422);
                assert_eq!(message.as_deref(), Some("Invalid ball number"));
            }
            other => panic!("expected Status, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn success_without_data_is_rejected() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/ballByBall/innings/8/live")
            .with_status(200)
            .with_body(json!({ "success": true }).to_string())
            .create_async()
            .await;

        let err = api_for(&server).fetch_live_status(8).await.unwrap_err();
        assert!(matches!(err, ApiError::Rejected { .. }));
    }

    #[tokio::test]
    async fn garbage_body_is_a_parse_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/players")
            .with_status(200)
            .with_body("<html>bad gateway</html>")
            .create_async()
            .await;

        let err = api_for(&server).list::<crate::Player>().await.unwrap_err();
        assert!(matches!(err, ApiError::Parsing(..)));
    }

    #[tokio::test]
    async fn invalid_draft_is_never_sent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server.mock("POST", "/teams").expect(0).create_async().await;

        let err = api_for(&server)
            .create::<Team>(&TeamDraft { name: "  ".into(), ..Default::default() })
            .await
            .unwrap_err();
        mock.assert_async().await;
        assert!(matches!(err, ApiError::Invalid("name")));
    }

    #[tokio::test]
    async fn update_and_delete_hit_the_record_path() {
        let mut server = mockito::Server::new_async().await;
        let put = server
            .mock("PUT", "/teams/2")
            .match_body(Matcher::PartialJson(json!({ "name": "Tigers XI" })))
            .with_status(200)
            .with_body(ok_body(json!({ "id": 2, "name": "Tigers XI" })))
            .create_async()
            .await;
        let delete = server
            .mock("DELETE", "/teams/2")
            .with_status(200)
            .with_body(json!({ "success": true }).to_string())
            .create_async()
            .await;

        let api = api_for(&server);
        let team = api
            .update::<Team>(2, &TeamDraft { name: "Tigers XI".into(), ..Default::default() })
            .await
            .unwrap();
        api.delete::<Team>(2).await.unwrap();

        put.assert_async().await;
        delete.assert_async().await;
        assert_eq!(team.name, "Tigers XI");
    }

    #[tokio::test]
    async fn match_detail_issues_exactly_three_fetches() {
        let mut server = mockito::Server::new_async().await;
        let summary = server
            .mock("GET", "/matches/11")
            .expect(1)
            .with_status(200)
            .with_body(ok_body(json!({
                "id": 11, "team1_id": 1, "team2_id": 2,
                "team1_name": "Lions", "team2_name": "Tigers", "status": "LIVE"
            })))
            .create_async()
            .await;
        let squads = server
            .mock("GET", "/matches/11/squads")
            .expect(1)
            .with_status(200)
            .with_body(ok_body(json!([
                { "team_id": 1, "players": [{ "id": 10, "name": "Asha" }] },
                { "team_id": 2, "players": [] }
            ])))
            .create_async()
            .await;
        let innings = server
            .mock("GET", "/innings/match/11")
            .expect(1)
            .with_status(200)
            .with_body(ok_body(json!([{
                "id": 21, "match_id": 11, "innings_number": 1,
                "batting_team_id": 1, "bowling_team_id": 2, "status": "IN_PROGRESS"
            }])))
            .create_async()
            .await;

        let detail = api_for(&server).fetch_match_detail(11).await.unwrap();
        summary.assert_async().await;
        squads.assert_async().await;
        innings.assert_async().await;

        assert_eq!(detail.summary.title(), "Lions vs Tigers");
        assert_eq!(detail.player_name(10), Some("Asha"));
        assert_eq!(detail.current_innings().map(|i| i.id), Some(21));
    }

    #[tokio::test]
    async fn match_detail_fails_when_any_part_fails() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/matches/12")
            .with_status(200)
            .with_body(ok_body(json!({ "id": 12, "team1_id": 1, "team2_id": 2 })))
            .create_async()
            .await;
        server
            .mock("GET", "/matches/12/squads")
            .with_status(500)
            .create_async()
            .await;
        server
            .mock("GET", "/innings/match/12")
            .with_status(200)
            .with_body(ok_body(json!([])))
            .create_async()
            .await;

        let err = api_for(&server).fetch_match_detail(12).await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn record_ball_posts_the_draft() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/ballByBall/innings/4/balls")
            .match_body(Matcher::PartialJson(json!({
                "innings_id": 4, "ball_type": "WIDE", "legal_ball": false, "extras": 2
            })))
            .with_status(201)
            .with_body(ok_body(json!({
                "id": 77, "innings_id": 4, "over_number": 0, "ball_number": 1,
                "legal_ball": false, "ball_type": "WIDE", "runs_scored": 0, "extras": 2,
                "is_wicket": false
            })))
            .create_async()
            .await;

        let ball = BallEvent {
            innings_id: 4,
            ball_number: 1,
            ball_type: BallType::Wide,
            legal_ball: false,
            extras: 2,
            ..Default::default()
        };
        let record = api_for(&server).record_ball(&ball).await.unwrap();
        mock.assert_async().await;
        assert_eq!(record.id, 77);
    }

    #[tokio::test]
    async fn batting_order_edits_use_their_own_endpoints() {
        let mut server = mockito::Server::new_async().await;
        let replace = server
            .mock("PUT", "/ballByBall/innings/6/batting-order")
            .match_body(Matcher::Json(json!({
                "batting_order": [
                    { "player_id": 1, "batting_position": 1 },
                    { "player_id": 2, "batting_position": 2 }
                ]
            })))
            .with_status(200)
            .with_body(json!({ "success": true }).to_string())
            .create_async()
            .await;
        let moved = server
            .mock("PATCH", "/ballByBall/innings/6/batting-order/move")
            .match_body(Matcher::Json(json!({ "player_id": 5, "new_batting_position": 9 })))
            .with_status(200)
            .with_body(json!({ "success": true }).to_string())
            .create_async()
            .await;
        let swapped = server
            .mock("PATCH", "/ballByBall/innings/6/batting-order/swap")
            .match_body(Matcher::Json(json!({ "player1_id": 5, "player2_id": 7 })))
            .with_status(200)
            .with_body(json!({ "success": true }).to_string())
            .create_async()
            .await;

        let api = api_for(&server);
        api.replace_batting_order(
            6,
            &[
                PositionUpdate { player_id: 1, batting_position: 1 },
                PositionUpdate { player_id: 2, batting_position: 2 },
            ],
        )
        .await
        .unwrap();
        api.move_batter(6, &MoveRequest { player_id: 5, new_batting_position: 9 })
            .await
            .unwrap();
        api.swap_batters(6, &SwapRequest { player1_id: 5, player2_id: 7 })
            .await
            .unwrap();

        replace.assert_async().await;
        moved.assert_async().await;
        swapped.assert_async().await;
    }
}
