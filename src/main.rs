mod app;
mod components;
mod draw;
mod keys;
mod state;
mod ui;

use crate::app::App;
use crate::state::messages::{NetworkRequest, NetworkResponse, UiEvent};
use crate::state::network::{LoadingState, NetworkWorker};
use crate::state::refresher::PeriodicRefresher;
use cricket_api::Id;
use cricket_api::client::CricketApi;
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use log::{error, info};
use std::io::Stdout;
use std::sync::Arc;
use std::time::Instant;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc, watch};
use tokio::time::Duration;
use tui::{Terminal, backend::CrosstermBackend};

/// Drives the directory search debounce.
const TICK_INTERVAL: Duration = Duration::from_millis(100);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if handle_cli_args() {
        return Ok(());
    }

    better_panic::install();

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal();

    tui_logger::init_logger(log::LevelFilter::Error)?;
    tui_logger::set_default_level(log::LevelFilter::Error);

    let app = App::new();
    let settings = app.settings.clone();
    let app = Arc::new(Mutex::new(app));
    info!("scoring against {}", settings.api_base_url);

    let client = CricketApi::new()
        .with_base_url(settings.api_base_url.clone())
        .with_timeout(settings.request_timeout);

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (network_req_tx, network_req_rx) = mpsc::channel::<NetworkRequest>(100);
    let (network_resp_tx, network_resp_rx) = mpsc::channel::<NetworkResponse>(100);
    let (watched_tx, watched_rx) = watch::channel::<Option<Id>>(None);

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // Network thread
    let network_worker = NetworkWorker::new(client, network_req_rx, network_resp_tx);
    let network_task = tokio::spawn(network_worker.run());

    // Live status polling for the watched innings
    let periodic_updater =
        PeriodicRefresher::new(network_req_tx.clone(), watched_rx, settings.poll_interval);
    let periodic_task = tokio::spawn(periodic_updater.run());

    let tick_tx = ui_event_tx.clone();
    let tick_task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(TICK_INTERVAL);
        loop {
            interval.tick().await;
            if tick_tx.send(UiEvent::Tick).await.is_err() {
                break;
            }
        }
    });

    // Load the match list on startup
    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    main_ui_loop(
        terminal,
        app,
        ui_event_rx,
        network_req_tx,
        network_resp_rx,
        watched_tx,
    )
    .await;

    input_handler.abort();
    network_task.abort();
    periodic_task.abort();
    tick_task.abort();

    Ok(())
}

fn handle_cli_args() -> bool {
    let mut args = std::env::args().skip(1);
    let Some(arg) = args.next() else {
        return false;
    };

    match arg.as_str() {
        "-h" | "--help" => {
            println!("{}", usage_text());
            true
        }
        "-V" | "--version" => {
            println!("crease {}", env!("CARGO_PKG_VERSION"));
            true
        }
        _ => {
            eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
            std::process::exit(2);
        }
    }
}

fn usage_text() -> &'static str {
    "crease - live cricket scoring in the terminal

Usage:
  crease
  crease --help
  crease --version

Environment:
  CREASE_API_URL       Scoring API base URL
  CREASE_POLL_SECS     Live status refresh period in seconds (default 5)
  CREASE_TIMEOUT_SECS  Per-request timeout in seconds (default 15)
  CREASE_LOG           Log level for the log pane (error, warn, info, debug, trace)"
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    mut ui_events: mpsc::Receiver<UiEvent>,
    network_requests: mpsc::Sender<NetworkRequest>,
    mut network_responses: mpsc::Receiver<NetworkResponse>,
    watched: watch::Sender<Option<Id>>,
) {
    let mut loading = LoadingState::default();

    loop {
        tokio::select! {
            Some(ui_event) = ui_events.recv() => {
                let should_redraw = handle_ui_event(ui_event, &app, &network_requests).await;
                let mut app_guard = app.lock().await;
                sync_watched(&watched, &app_guard);
                if should_redraw && !loading.is_loading {
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            Some(response) = network_responses.recv() => {
                let should_redraw =
                    handle_network_response(response, &app, &network_requests, &mut loading).await;
                let mut app_guard = app.lock().await;
                sync_watched(&watched, &app_guard);
                if should_redraw {
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            else => break,
        }
    }
}

/// Publishes the innings the scorer has open to the live status poller.
fn sync_watched(watched: &watch::Sender<Option<Id>>, app: &App) {
    let current = app.watched_innings();
    watched.send_if_modified(|innings| {
        if *innings == current {
            return false;
        }
        *innings = current;
        true
    });
}

async fn send_all(network_requests: &mpsc::Sender<NetworkRequest>, requests: Vec<NetworkRequest>) {
    for request in requests {
        if network_requests.send(request).await.is_err() {
            error!("network worker has stopped");
            break;
        }
    }
}

async fn handle_ui_event(
    ui_event: UiEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) -> bool {
    match ui_event {
        UiEvent::AppStarted => {
            let request = app.lock().await.on_started();
            send_all(network_requests, vec![request]).await;
            true
        }
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app, network_requests).await;
            true
        }
        UiEvent::Resize => true,
        UiEvent::Tick => {
            let request = app.lock().await.on_tick(Instant::now());
            let fired = request.is_some();
            send_all(network_requests, request.into_iter().collect()).await;
            fired
        }
    }
}

async fn handle_network_response(
    response: NetworkResponse,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
    loading: &mut LoadingState,
) -> bool {
    if let NetworkResponse::LoadingStateChanged { loading_state } = response {
        *loading = loading_state;
        return true;
    }

    let mut guard = app.lock().await;
    let follow_ups = match response {
        NetworkResponse::LoadingStateChanged { .. } => Vec::new(),
        NetworkResponse::MatchesLoaded { matches } => {
            guard.on_matches_loaded(matches);
            Vec::new()
        }
        NetworkResponse::MatchDetailLoaded { detail } => guard.on_match_detail_loaded(detail),
        NetworkResponse::LiveStatusLoaded { innings_id, status } => {
            guard.on_live_status_loaded(innings_id, status);
            Vec::new()
        }
        NetworkResponse::BallsLoaded { innings_id, balls } => {
            guard.on_balls_loaded(innings_id, balls);
            Vec::new()
        }
        NetworkResponse::BattingOrderLoaded { innings_id, entries } => {
            guard.on_batting_order_loaded(innings_id, entries);
            Vec::new()
        }
        NetworkResponse::BallRecorded { record } => guard.on_ball_recorded(record),
        NetworkResponse::BattingOrderSaved { innings_id, summary } => {
            guard.on_batting_order_saved(innings_id, summary)
        }
        NetworkResponse::DirectoryLoaded { kind, query, rows } => {
            guard.on_directory_loaded(kind, query, rows);
            Vec::new()
        }
        NetworkResponse::Error { origin, message } => {
            guard.on_error(origin, message);
            Vec::new()
        }
    };
    drop(guard);

    send_all(network_requests, follow_ups).await;
    !loading.is_loading
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        let event = tokio::task::spawn_blocking(crossterm_event::read).await;
        if let Ok(Ok(event)) = event {
            let ui_event = match event {
                Event::Key(key_event) => Some(UiEvent::KeyPressed(key_event)),
                Event::Resize(_, _) => Some(UiEvent::Resize),
                _ => None,
            };

            if let Some(ui_event) = ui_event
                && ui_events.send(ui_event).await.is_err()
            {
                break;
            }
        }
    }
}

fn setup_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(
        stdout,
        cursor::Hide,
        terminal::EnterAlternateScreen,
        terminal::Clear(terminal::ClearType::All)
    );
    let _ = terminal::enable_raw_mode();
}

pub fn cleanup_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(
        stdout,
        cursor::MoveTo(0, 0),
        terminal::Clear(terminal::ClearType::All),
        terminal::LeaveAlternateScreen,
        cursor::Show
    );
    let _ = terminal::disable_raw_mode();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}
