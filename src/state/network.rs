use crate::state::directory::{DirectoryKind, DirectoryRow};
use crate::state::messages::{NetworkRequest, NetworkResponse};
use cricket_api::client::{ApiError, CricketApi};
use cricket_api::{Official, Player, Resource, Team, Weather};
use log::{debug, error};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

/// Runs API calls one request at a time and reports back to the UI loop.
pub struct NetworkWorker {
    client: CricketApi,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    is_loading: Arc<AtomicBool>,
}

impl NetworkWorker {
    pub fn new(
        client: CricketApi,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self {
            client,
            requests,
            responses,
            is_loading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            self.start_loading_animation().await;

            let origin = request.origin();
            let result = self.handle(request).await;

            debug!("network request complete");
            self.stop_loading_animation(result.is_ok()).await;

            let response = result.unwrap_or_else(|err| {
                error!("{err}");
                NetworkResponse::Error { origin, message: err.summary() }
            });

            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send network response: {e}");
                break;
            }
        }
    }

    async fn handle(&self, request: NetworkRequest) -> Result<NetworkResponse, ApiError> {
        match request {
            NetworkRequest::LoadMatches => {
                debug!("loading matches");
                let matches = self.client.list().await?;
                Ok(NetworkResponse::MatchesLoaded { matches })
            }
            NetworkRequest::LoadMatchDetail { match_id } => {
                debug!("loading match {match_id}: summary, squads, innings");
                let detail = self.client.fetch_match_detail(match_id).await?;
                Ok(NetworkResponse::MatchDetailLoaded { detail })
            }
            NetworkRequest::LoadLiveStatus { innings_id } => {
                debug!("refreshing live status for innings {innings_id}");
                let status = self.client.fetch_live_status(innings_id).await?;
                Ok(NetworkResponse::LiveStatusLoaded { innings_id, status })
            }
            NetworkRequest::LoadBalls { innings_id } => {
                debug!("loading ball history for innings {innings_id}");
                let balls = self.client.fetch_balls(innings_id).await?;
                Ok(NetworkResponse::BallsLoaded { innings_id, balls })
            }
            NetworkRequest::LoadBattingOrder { innings_id } => {
                debug!("loading batting order for innings {innings_id}");
                let entries = self.client.fetch_batting_order(innings_id).await?;
                Ok(NetworkResponse::BattingOrderLoaded { innings_id, entries })
            }
            NetworkRequest::RecordBall { ball } => {
                debug!(
                    "recording ball {}.{} for innings {}",
                    ball.over_number, ball.ball_number, ball.innings_id
                );
                let record = self.client.record_ball(&ball).await?;
                Ok(NetworkResponse::BallRecorded { record })
            }
            NetworkRequest::ReplaceBattingOrder { innings_id, order } => {
                debug!("replacing batting order for innings {innings_id} ({} rows)", order.len());
                self.client.replace_batting_order(innings_id, &order).await?;
                Ok(NetworkResponse::BattingOrderSaved {
                    innings_id,
                    summary: "Batting order saved".to_string(),
                })
            }
            NetworkRequest::MoveBatter { innings_id, request } => {
                debug!("moving player {} in innings {innings_id}", request.player_id);
                self.client.move_batter(innings_id, &request).await?;
                Ok(NetworkResponse::BattingOrderSaved {
                    innings_id,
                    summary: format!("Moved to position {}", request.new_batting_position),
                })
            }
            NetworkRequest::SwapBatters { innings_id, request } => {
                debug!(
                    "swapping players {} and {} in innings {innings_id}",
                    request.player1_id, request.player2_id
                );
                self.client.swap_batters(innings_id, &request).await?;
                Ok(NetworkResponse::BattingOrderSaved {
                    innings_id,
                    summary: "Positions swapped".to_string(),
                })
            }
            NetworkRequest::Search { kind, query } => {
                debug!("searching {} for {query:?}", kind.label());
                let rows = match kind {
                    DirectoryKind::Teams => self.search::<Team>(&query).await?,
                    DirectoryKind::Players => self.search::<Player>(&query).await?,
                    DirectoryKind::Officials => self.search::<Official>(&query).await?,
                    DirectoryKind::Weather => self.search::<Weather>(&query).await?,
                };
                Ok(NetworkResponse::DirectoryLoaded { kind, query, rows })
            }
        }
    }

    async fn search<R: Resource>(&self, query: &str) -> Result<Vec<DirectoryRow>, ApiError> {
        let records = self.client.search::<R>(query).await?;
        Ok(records.iter().map(DirectoryRow::from_resource).collect())
    }

    async fn start_loading_animation(&self) {
        self.is_loading.store(true, Ordering::Relaxed);

        let mut loading_state =
            LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let is_loading = self.is_loading.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(80));
            loop {
                interval.tick().await;
                if !is_loading.load(Ordering::Relaxed) {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(NetworkResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }

    async fn stop_loading_animation(&self, is_ok: bool) {
        self.is_loading.store(false, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(15)).await;

        let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged {
                loading_state: LoadingState { is_loading: false, spinner_char },
            })
            .await;
    }
}
