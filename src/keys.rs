use crate::app::{App, MenuItem};
use crate::state::app_state::BattingOrderDialog;
use crate::state::messages::NetworkRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let mut guard = app.lock().await;
    let requests = dispatch(&mut guard, key_event);
    drop(guard);

    for request in requests {
        let _ = network_requests.send(request).await;
    }
}

fn dispatch(guard: &mut App, key_event: KeyEvent) -> Vec<NetworkRequest> {
    if let (Char('c'), KeyModifiers::CONTROL) = (key_event.code, key_event.modifiers) {
        crate::cleanup_terminal();
        std::process::exit(0);
    }

    // Modal layers take every key until they close.
    if guard.state.alert.is_some() {
        if matches!(key_event.code, KeyCode::Enter | KeyCode::Esc) {
            guard.dismiss_alert();
        }
        return Vec::new();
    }
    if guard.state.scoring.custom_input.is_some() {
        handle_custom_input(guard, key_event);
        return Vec::new();
    }
    if guard.state.scoring.wicket_dialog.is_some() {
        handle_wicket_dialog(guard, key_event);
        return Vec::new();
    }
    if guard.state.batting_order.dialog.is_some() {
        return handle_batting_dialog(guard, key_event).into_iter().collect();
    }
    if guard.state.directory.editing {
        handle_search_input(guard, key_event);
        return Vec::new();
    }

    let mut requests = Vec::new();

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Tab switching
        (_, Char('1'), _) => requests.extend(guard.update_tab(MenuItem::Matches)),
        (_, Char('2'), _) => requests.extend(guard.update_tab(MenuItem::Scoring)),
        (_, Char('3'), _) => requests.extend(guard.update_tab(MenuItem::BallByBall)),
        (_, Char('4'), _) => requests.extend(guard.update_tab(MenuItem::BattingOrder)),
        (_, Char('5'), _) => requests.extend(guard.update_tab(MenuItem::Directory)),
        (_, Char('?'), _) => requests.extend(guard.update_tab(MenuItem::Help)),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),

        // Matches
        (MenuItem::Matches, Char('j') | KeyCode::Down, _) => guard.state.matches.select_down(),
        (MenuItem::Matches, Char('k') | KeyCode::Up, _) => guard.state.matches.select_up(),
        (MenuItem::Matches, KeyCode::Enter, _) => requests.extend(guard.open_selected_match()),
        (MenuItem::Matches, Char('r'), _) => requests.push(guard.refresh_matches()),
        (MenuItem::Matches, Char('n'), _) => requests.extend(guard.next_innings()),

        // Scoring panel
        (MenuItem::Scoring, Char('j') | KeyCode::Down, _) => guard.state.scoring.section_down(),
        (MenuItem::Scoring, Char('k') | KeyCode::Up, _) => guard.state.scoring.section_up(),
        (MenuItem::Scoring, Char('l') | KeyCode::Right, _) => guard.state.scoring.button_right(),
        (MenuItem::Scoring, Char('h') | KeyCode::Left, _) => guard.state.scoring.button_left(),
        (MenuItem::Scoring, KeyCode::Enter | Char(' '), _) => guard.scoring_press(),
        (MenuItem::Scoring, Char('c'), _) => guard.state.scoring.start_custom(),
        (MenuItem::Scoring, Char('x'), _) => guard.state.scoring.reset(),
        (MenuItem::Scoring, Char('s'), _) => requests.extend(guard.commit_ball()),
        (MenuItem::Scoring, Char('n'), _) => requests.extend(guard.next_innings()),
        (MenuItem::Scoring | MenuItem::BallByBall, Char('r'), _) => {
            requests.extend(guard.refresh_innings())
        }

        // Ball-by-ball history
        (MenuItem::BallByBall, Char('j') | KeyCode::Down, _) => guard.state.ball_by_ball.scroll_down(),
        (MenuItem::BallByBall, Char('k') | KeyCode::Up, _) => guard.state.ball_by_ball.scroll_up(),

        // Batting order
        (MenuItem::BattingOrder, Char('j') | KeyCode::Down, _) => {
            guard.state.batting_order.select_down()
        }
        (MenuItem::BattingOrder, Char('k') | KeyCode::Up, _) => guard.state.batting_order.select_up(),
        (MenuItem::BattingOrder, Char('e'), _) => guard.open_reorder(),
        (MenuItem::BattingOrder, Char('m'), _) => guard.open_move(),
        (MenuItem::BattingOrder, Char('w'), _) => guard.open_swap(),
        (MenuItem::BattingOrder, Char('r'), _) => requests.extend(guard.refresh_innings()),

        // Directory
        (MenuItem::Directory, KeyCode::Tab | Char('t'), _) => {
            requests.push(guard.directory_cycle_kind())
        }
        (MenuItem::Directory, Char('/'), _) => guard.state.directory.editing = true,
        (MenuItem::Directory, Char('j') | KeyCode::Down, _) => guard.state.directory.select_down(),
        (MenuItem::Directory, Char('k') | KeyCode::Up, _) => guard.state.directory.select_up(),

        // Global
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),

        _ => {}
    }

    requests
}

fn handle_custom_input(guard: &mut App, key_event: KeyEvent) {
    let scoring = &mut guard.state.scoring;
    match key_event.code {
        Char(c) if c.is_ascii_digit() => scoring.push_custom_digit(c),
        KeyCode::Backspace => scoring.pop_custom_digit(),
        KeyCode::Enter => scoring.commit_custom(),
        KeyCode::Esc => scoring.cancel_custom(),
        _ => {}
    }
}

fn handle_wicket_dialog(guard: &mut App, key_event: KeyEvent) {
    let scoring = &mut guard.state.scoring;
    match key_event.code {
        KeyCode::Esc => scoring.cancel_wicket_dialog(),
        KeyCode::Enter | Char('s') => {
            scoring.submit_wicket_dialog();
        }
        _ => {
            let Some(dialog) = scoring.wicket_dialog.as_mut() else {
                return;
            };
            match key_event.code {
                KeyCode::Tab | Char('j') | KeyCode::Down => dialog.focus_next(),
                KeyCode::BackTab | Char('k') | KeyCode::Up => dialog.focus_prev(),
                Char('l') | KeyCode::Right => dialog.cycle(true),
                Char('h') | KeyCode::Left => dialog.cycle(false),
                _ => {}
            }
        }
    }
}

fn handle_batting_dialog(guard: &mut App, key_event: KeyEvent) -> Option<NetworkRequest> {
    match key_event.code {
        KeyCode::Esc => {
            guard.state.batting_order.close_dialog();
            return None;
        }
        Char('s') => return guard.save_batting_dialog(),
        // Enter edits the highlighted row in the reorder grid and saves elsewhere.
        KeyCode::Enter
            if !matches!(guard.state.batting_order.dialog, Some(BattingOrderDialog::Reorder(_))) =>
        {
            return guard.save_batting_dialog();
        }
        _ => {}
    }

    match guard.state.batting_order.dialog.as_mut()? {
        BattingOrderDialog::Reorder(editor) => match key_event.code {
            Char('j') | KeyCode::Down => editor.cursor_down(),
            Char('k') | KeyCode::Up => editor.cursor_up(),
            Char(c) if c.is_ascii_digit() => editor.push_digit(c),
            KeyCode::Backspace => editor.pop_digit(),
            KeyCode::Enter => editor.apply_input(),
            _ => {}
        },
        BattingOrderDialog::Move(editor) => match key_event.code {
            Char('j') | KeyCode::Down => editor.cycle_player(true),
            Char('k') | KeyCode::Up => editor.cycle_player(false),
            Char('l') | KeyCode::Right => editor.adjust_target(true),
            Char('h') | KeyCode::Left => editor.adjust_target(false),
            KeyCode::Backspace => editor.set_target(None),
            _ => {}
        },
        BattingOrderDialog::Swap(editor) => match key_event.code {
            KeyCode::Tab | KeyCode::BackTab => editor.toggle_focus(),
            Char('j') | KeyCode::Down => editor.cycle(true),
            Char('k') | KeyCode::Up => editor.cycle(false),
            _ => {}
        },
    }
    None
}

fn handle_search_input(guard: &mut App, key_event: KeyEvent) {
    let directory = &mut guard.state.directory;
    let now = Instant::now();
    match key_event.code {
        KeyCode::Esc | KeyCode::Enter => directory.editing = false,
        KeyCode::Backspace => directory.pop_char(now),
        Char(c) => directory.push_char(c, now),
        _ => {}
    }
}
