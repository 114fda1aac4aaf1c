use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs, Wrap};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::components::ball_table::{BallByBallTable, notation};
use crate::components::preview::BallPreview;
use crate::state::app_state::BattingOrderDialog;
use crate::state::batting_order::{FullReorderEditor, SingleMoveEditor, SwapEditor, SwapSlot};
use crate::state::directory::DirectoryKind;
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::state::scoring::{ScoringSection, ScoringState};
use crate::state::wicket::{WicketDialog, WicketField};
use crate::ui::layout::{LayoutAreas, centered};
use cricket_api::BattingOrderEntry;

static TABS: &[&str; 5] = &["Matches", "Scoring", "Ball by ball", "Batting order", "Directory"];

const HELP_TEXT: &str = "\
Global:        q quit   1-5 tabs   ? help   f full screen   \" logs
Matches:       j/k move   Enter open match   n next innings   r reload
Scoring:       j/k section   h/l button   Enter/space toggle   c custom value
               s submit ball   x clear   r refresh live status   n next innings
Wicket form:   Tab/j/k field   h/l choose   Enter submit   Esc cancel
Ball by ball:  j/k scroll   r reload
Batting order: e reorder   m move one   w swap two   r reload   (s save, Esc close)
Directory:     Tab/t collection   / search   j/k move";

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let _ = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
            draw_status_line(f, layout.status, app);
        }

        match app.state.active_tab {
            MenuItem::Matches => draw_matches(f, layout.main, app),
            MenuItem::Scoring => draw_scoring(f, layout.main, app),
            MenuItem::BallByBall => draw_ball_by_ball(f, layout.main, app),
            MenuItem::BattingOrder => draw_batting_order(f, layout.main, app),
            MenuItem::Directory => draw_directory(f, layout.main, app),
            MenuItem::Help => draw_placeholder(f, layout.main, HELP_TEXT),
        }

        if let Some(dialog) = app.state.scoring.wicket_dialog.as_ref() {
            draw_wicket_dialog(f, layout.main, dialog);
        }
        if let Some(input) = app.state.scoring.custom_input.as_deref() {
            draw_custom_input(f, layout.main, app.state.scoring.section, input);
        }
        if let Some(dialog) = app.state.batting_order.dialog.as_ref() {
            draw_batting_dialog(f, layout.main, dialog, app.state.batting_order.saving);
        }
        if let Some(alert) = app.state.alert.as_deref() {
            draw_alert(f, f.area(), alert);
        }
        if let Some(logs) = layout.logs {
            draw_logs(f, logs);
        }

        draw_loading_spinner(f, f.area(), app, loading);
    });
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn dim() -> Style {
    Style::default().fg(Color::DarkGray)
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Matches => 0,
        MenuItem::Scoring => 1,
        MenuItem::BallByBall => 2,
        MenuItem::BattingOrder => 3,
        MenuItem::Directory => 4,
        MenuItem::Help => 0,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

/// Watched innings and score on the left, the latest notice on the right.
fn draw_status_line(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = Vec::new();
    match (app.state.match_detail.detail.as_ref(), app.state.match_detail.innings()) {
        (Some(detail), Some(innings)) if app.watched_innings() == Some(innings.id) => {
            spans.push(Span::styled(
                format!(" {} ", detail.summary.title()),
                Style::default().add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(format!("innings {} ", innings.innings_number), dim()));
        }
        _ => spans.push(Span::styled(" no innings open ", dim())),
    }
    if let Some(status) = app.state.live.status() {
        spans.push(Span::raw(format!("{}/{} ", status.total_runs, status.wickets)));
    }
    if let Some(at) = app.state.live.updated_at() {
        spans.push(Span::styled(format!("(updated {}) ", at.format("%H:%M:%S")), dim()));
    }
    if let Some(err) = app.state.live_error.as_deref() {
        spans.push(Span::styled(format!("live status: {err}"), Style::default().fg(Color::Red)));
    }

    let [left, right] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).areas(area);
    f.render_widget(Paragraph::new(Line::from(spans)), left);
    if let Some(notice) = app.state.notice.as_deref() {
        f.render_widget(
            Paragraph::new(format!("{notice} "))
                .alignment(Alignment::Right)
                .style(Style::default().fg(Color::Cyan)),
            right,
        );
    }
}

// ---------------------------------------------------------------------------
// Matches
// ---------------------------------------------------------------------------

fn draw_matches(f: &mut Frame, area: Rect, app: &App) {
    let [list_area, detail_area] =
        Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)]).areas(area);

    let block = default_border(Color::White).title(" Matches ");
    let inner = block.inner(list_area);
    f.render_widget(block, list_area);

    let matches = &app.state.matches;
    if matches.matches.is_empty() {
        let msg = if let Some(err) = matches.error.as_deref() {
            format!("Could not load matches:\n{err}\n\nr to retry")
        } else if matches.loading {
            "Loading matches...".to_string()
        } else {
            "No matches".to_string()
        };
        f.render_widget(Paragraph::new(msg).style(dim()).alignment(Alignment::Center), inner);
    } else {
        let visible = inner.height as usize;
        let start = matches.selected.saturating_sub(visible.saturating_sub(1));
        let lines: Vec<Line> = matches
            .matches
            .iter()
            .enumerate()
            .skip(start)
            .take(visible)
            .map(|(idx, m)| {
                let marker = if idx == matches.selected { ">" } else { " " };
                let date = m
                    .match_date
                    .map(|d| d.format("%d %b").to_string())
                    .unwrap_or_else(|| "--".to_string());
                let style = if idx == matches.selected {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                };
                Line::from(vec![
                    Span::styled(format!("{marker} {}", m.title()), style),
                    Span::styled(format!("  {date}  {}", m.status.label()), dim()),
                ])
            })
            .collect();
        f.render_widget(Paragraph::new(lines), inner);
    }

    draw_match_detail(f, detail_area, app);
}

fn draw_match_detail(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::DarkGray).title(" Match ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let state = &app.state.match_detail;
    if state.is_loading() {
        f.render_widget(
            Paragraph::new("Loading match…").style(dim()).alignment(Alignment::Center),
            inner,
        );
        return;
    }
    if let Some(err) = state.error.as_deref() {
        f.render_widget(
            Paragraph::new(format!("Match load failed:\n{err}"))
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true }),
            inner,
        );
        return;
    }
    let Some(detail) = state.detail.as_ref() else {
        f.render_widget(
            Paragraph::new("Select a match and press Enter").style(dim()),
            inner,
        );
        return;
    };

    let summary = &detail.summary;
    let mut lines = vec![
        Line::from(Span::styled(summary.title(), Style::default().add_modifier(Modifier::BOLD))),
        Line::from(Span::styled(
            format!(
                "{}  {}  {}",
                summary.venue.as_deref().unwrap_or("venue tbc"),
                summary.status.label(),
                summary
                    .overs_per_innings
                    .map(|o| format!("{o} overs"))
                    .unwrap_or_default()
            ),
            dim(),
        )),
        Line::from(""),
        Line::from(Span::styled("Squads", dim())),
    ];
    for squad in &detail.squads {
        let name = squad
            .team_name
            .clone()
            .unwrap_or_else(|| format!("Team {}", squad.team_id));
        lines.push(Line::from(format!("  {name}: {} players", squad.players.len())));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Innings (n to switch)", dim())));
    if detail.innings.is_empty() {
        lines.push(Line::from(Span::styled("  not started", dim())));
    }
    for (idx, innings) in detail.innings.iter().enumerate() {
        let watched = app.watched_innings() == Some(innings.id);
        let marker = if idx == state.selected_innings { ">" } else { " " };
        let batting = detail
            .squad(innings.batting_team_id)
            .and_then(|s| s.team_name.clone())
            .unwrap_or_else(|| format!("Team {}", innings.batting_team_id));
        let style = if watched { Style::default().fg(Color::Yellow) } else { Style::default() };
        lines.push(Line::from(Span::styled(
            format!(
                "{marker} {}. {batting}  {}/{}",
                innings.innings_number, innings.total_runs, innings.wickets
            ),
            style,
        )));
    }

    f.render_widget(Paragraph::new(lines), inner);
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

fn draw_scoring(f: &mut Frame, area: Rect, app: &App) {
    if app.watched_innings().is_none() {
        draw_placeholder(f, area, "Open a match on the Matches tab to start scoring");
        return;
    }

    let [panel_area, side_area] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(area);
    draw_scoring_panel(f, panel_area, &app.state.scoring);

    let [live_area, preview_area] =
        Layout::vertical([Constraint::Length(7), Constraint::Fill(1)]).areas(side_area);
    draw_live_status(f, live_area, app);

    let ball = app.state.scoring.ball_event(&app.state.live);
    let live = &app.state.live;
    let striker = live
        .batsmen()
        .iter()
        .find(|b| b.is_striker)
        .and_then(|b| b.name.as_deref());
    let bowler = live.bowler().and_then(|b| b.name.as_deref());

    let title = if app.state.scoring.submitting {
        " Ball preview (submitting…) "
    } else {
        " Ball preview "
    };
    let block = default_border(Color::DarkGray).title(title);
    let inner = block.inner(preview_area);
    f.render_widget(block, preview_area);
    f.render_widget(
        BallPreview { ball: &ball, striker, bowler, show_payload: true },
        inner,
    );
}

fn draw_scoring_panel(f: &mut Frame, area: Rect, scoring: &ScoringState) {
    let block = default_border(Color::White).title(" Scoring (s to submit) ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut lines = Vec::with_capacity(ScoringSection::ALL.len() * 2);
    for section in ScoringSection::ALL {
        let active = section == scoring.section;
        let label_style = if active {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let mut spans = vec![Span::styled(format!("{:<14}", section.label()), label_style)];
        for (idx, button) in section.buttons().iter().enumerate() {
            let selected = scoring.is_selected(section, button.value);
            let mut style = if selected {
                Style::default().fg(Color::Black).bg(Color::Green)
            } else {
                Style::default()
            };
            if active && idx == scoring.button {
                style = style.add_modifier(Modifier::REVERSED);
            }
            spans.push(Span::styled(format!(" {} ", button.label), style));
            spans.push(Span::raw(" "));
        }
        if let Some(value) = scoring.custom_value(section) {
            spans.push(Span::styled(
                format!(" {value} "),
                Style::default().fg(Color::Black).bg(Color::Green),
            ));
        } else if section.accepts_custom() {
            spans.push(Span::styled("[c]", dim()));
        }
        lines.push(Line::from(spans));
        lines.push(Line::from(""));
    }

    if let Some(detail) = scoring.wicket_detail.as_ref() {
        lines.push(Line::from(Span::styled(
            format!("Wicket: {}", detail.wicket_type.label()),
            Style::default().fg(Color::Red),
        )));
    }

    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_live_status(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::DarkGray).title(" Live ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let live = &app.state.live;
    let Some(status) = live.status() else {
        f.render_widget(Paragraph::new("Waiting for live status...").style(dim()), inner);
        return;
    };

    let mut lines = Vec::new();
    for batsman in &status.current_batsmen {
        let name = batsman
            .name
            .clone()
            .unwrap_or_else(|| format!("Player {}", batsman.player_id));
        let marker = if batsman.is_striker { "*" } else { " " };
        lines.push(Line::from(format!(
            "{marker} {name}  {} ({})",
            batsman.runs, batsman.balls_faced
        )));
    }
    if let Some(bowler) = live.bowler() {
        let name = bowler
            .name
            .clone()
            .unwrap_or_else(|| format!("Player {}", bowler.player_id));
        lines.push(Line::from(Span::styled(
            format!(
                "  {name}  {}.{}-{}-{}",
                bowler.balls_bowled / 6,
                bowler.balls_bowled % 6,
                bowler.runs_conceded,
                bowler.wickets
            ),
            Style::default().fg(Color::Cyan),
        )));
    }
    let (over, ball) = live.next_delivery();
    lines.push(Line::from(Span::styled(format!("  next ball {over}.{ball}"), dim())));
    f.render_widget(Paragraph::new(lines), inner);
}

// ---------------------------------------------------------------------------
// Ball-by-ball
// ---------------------------------------------------------------------------

fn draw_ball_by_ball(f: &mut Frame, area: Rect, app: &App) {
    let state = &app.state.ball_by_ball;
    let block = default_border(Color::White).title(" Ball by ball ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if state.innings_id.is_none() {
        f.render_widget(Paragraph::new("No innings open").style(dim()), inner);
        return;
    }
    if let Some(err) = state.error.as_deref() {
        f.render_widget(
            Paragraph::new(format!("Could not load balls:\n{err}\n\nr to retry"))
                .style(Style::default().fg(Color::Red)),
            inner,
        );
        return;
    }
    if state.balls.is_empty() {
        let msg = if state.loading { "Loading balls..." } else { "No balls recorded yet" };
        f.render_widget(Paragraph::new(msg).style(dim()), inner);
        return;
    }

    let [strip, table] = Layout::vertical([Constraint::Length(2), Constraint::Fill(1)]).areas(inner);
    let recent: Vec<String> = state.balls.iter().rev().take(12).map(notation).collect();
    f.render_widget(
        Paragraph::new(format!("Recent: {}", recent.join(" "))).style(dim()),
        strip,
    );
    f.render_widget(
        BallByBallTable { balls: &state.balls, scroll_offset: state.scroll_offset },
        table,
    );
}

// ---------------------------------------------------------------------------
// Batting order
// ---------------------------------------------------------------------------

fn entry_line(entry: &BattingOrderEntry, selected: bool) -> Line<'static> {
    let marker = if selected { ">" } else { " " };
    let state = if entry.currently_batting {
        if entry.is_striker { "batting*" } else { "batting" }
    } else {
        entry.status.label()
    };
    let style = if entry.currently_batting {
        Style::default().fg(Color::Green)
    } else if entry.status.is_out() {
        dim()
    } else if selected {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Line::from(Span::styled(
        format!("{marker} {:>2}. {:<24} {state}", entry.batting_position, entry.label()),
        style,
    ))
}

fn draw_batting_order(f: &mut Frame, area: Rect, app: &App) {
    let state = &app.state.batting_order;
    let block = default_border(Color::White).title(" Batting order (e reorder, m move, w swap) ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if state.innings_id.is_none() {
        f.render_widget(Paragraph::new("No innings open").style(dim()), inner);
        return;
    }
    if let Some(err) = state.error.as_deref() {
        f.render_widget(
            Paragraph::new(format!("Could not load batting order:\n{err}"))
                .style(Style::default().fg(Color::Red)),
            inner,
        );
        return;
    }
    if state.entries.is_empty() {
        let msg = if state.loading { "Loading batting order..." } else { "No batting order yet" };
        f.render_widget(Paragraph::new(msg).style(dim()), inner);
        return;
    }

    let lines: Vec<Line> = state
        .entries
        .iter()
        .enumerate()
        .map(|(idx, e)| entry_line(e, idx == state.selected))
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_batting_dialog(f: &mut Frame, area: Rect, dialog: &BattingOrderDialog, saving: bool) {
    let rect = centered(area, 64, 20);
    f.render_widget(Clear, rect);
    let block = default_border(Color::Yellow).title(dialog.title());
    let inner = block.inner(rect);
    f.render_widget(block, rect);

    let [body, footer] = Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(inner);
    let lines = match dialog {
        BattingOrderDialog::Reorder(editor) => reorder_lines(editor),
        BattingOrderDialog::Move(editor) => move_lines(editor),
        BattingOrderDialog::Swap(editor) => swap_lines(editor),
    };
    f.render_widget(Paragraph::new(lines), body);

    let footer_text = if saving {
        Span::styled("Saving…", Style::default().fg(Color::Cyan))
    } else if dialog.can_save() {
        Span::styled("s save   Esc close", Style::default().fg(Color::Green))
    } else {
        Span::styled("save disabled   Esc close", dim())
    };
    f.render_widget(Paragraph::new(Line::from(footer_text)), footer);
}

fn reorder_lines(editor: &FullReorderEditor) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for entry in editor.batting() {
        lines.push(Line::from(Span::styled(
            format!("  {:>2}. {} (batting, locked)", entry.batting_position, entry.label()),
            Style::default().fg(Color::Green),
        )));
    }
    for (idx, entry) in editor.editable().iter().enumerate() {
        let staged = editor.staged_position(entry.player_id).unwrap_or(entry.batting_position);
        let selected = idx == editor.cursor;
        let marker = if selected { ">" } else { " " };
        let typed = if selected && !editor.input.is_empty() {
            format!("  -> {}_", editor.input)
        } else {
            String::new()
        };
        let style = if editor.duplicates().contains(&staged) {
            Style::default().fg(Color::Red)
        } else if selected {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(
            format!("{marker} {staged:>2}. {}{typed}", entry.label()),
            style,
        )));
    }
    for entry in editor.out() {
        lines.push(Line::from(Span::styled(
            format!("  {:>2}. {} ({})", entry.batting_position, entry.label(), entry.status.label()),
            dim(),
        )));
    }
    lines.push(Line::from(""));
    if !editor.duplicates().is_empty() {
        let dupes: Vec<String> = editor.duplicates().iter().map(|p| p.to_string()).collect();
        lines.push(Line::from(Span::styled(
            format!("Duplicate positions: {}", dupes.join(", ")),
            Style::default().fg(Color::Red),
        )));
    }
    if let Some(message) = editor.message.as_deref() {
        lines.push(Line::from(Span::styled(message.to_string(), Style::default().fg(Color::Red))));
    }
    lines.push(Line::from(Span::styled("j/k row   digits + Enter set position", dim())));
    lines
}

fn move_lines(editor: &SingleMoveEditor) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled("Player (j/k)", dim()))];
    if editor.eligible().is_empty() {
        lines.push(Line::from(Span::styled("  nobody is waiting to bat", dim())));
    }
    for entry in editor.eligible() {
        lines.push(entry_line(entry, editor.player == Some(entry.player_id)));
    }
    lines.push(Line::from(""));
    let target = editor
        .target
        .map(|t| t.to_string())
        .unwrap_or_else(|| "-".to_string());
    lines.push(Line::from(vec![
        Span::styled("New position (h/l): ", dim()),
        Span::styled(target, Style::default().fg(Color::Yellow)),
    ]));
    lines
}

fn swap_lines(editor: &SwapEditor) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (slot, title) in [(SwapSlot::First, "First player"), (SwapSlot::Second, "Second player")] {
        let focused = editor.focus == slot;
        let chosen = match slot {
            SwapSlot::First => editor.first,
            SwapSlot::Second => editor.second,
        };
        let label = editor
            .options(slot)
            .iter()
            .find(|e| Some(e.player_id) == chosen)
            .map(|e| format!("{}. {}", e.batting_position, e.label()))
            .unwrap_or_else(|| "-".to_string());
        let style = if focused { Style::default().fg(Color::Yellow) } else { Style::default() };
        lines.push(Line::from(vec![
            Span::styled(format!("{} {title}: ", if focused { ">" } else { " " }), dim()),
            Span::styled(label, style),
        ]));
    }
    lines.push(Line::from(""));
    match editor.preview() {
        Some(preview) => {
            for row in preview {
                lines.push(Line::from(format!("  {}: {} -> {}", row.label, row.before, row.after)));
            }
        }
        None => lines.push(Line::from(Span::styled("  pick two different players", dim()))),
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Tab switch slot   j/k choose", dim())));
    lines
}

// ---------------------------------------------------------------------------
// Directory
// ---------------------------------------------------------------------------

fn draw_directory(f: &mut Frame, area: Rect, app: &App) {
    let state = &app.state.directory;
    let block = default_border(Color::White).title(" Directory ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [kinds, search, rows_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Fill(1),
    ])
    .areas(inner);

    let kind_spans: Vec<Span> = DirectoryKind::ALL
        .iter()
        .map(|kind| {
            let style = if *kind == state.kind {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::UNDERLINED)
            } else {
                dim()
            };
            Span::styled(format!(" {} ", kind.label()), style)
        })
        .collect();
    f.render_widget(Paragraph::new(Line::from(kind_spans)), kinds);

    let (search_text, search_color) = if state.editing {
        (format!("{}_", state.query), Color::Yellow)
    } else if state.query.is_empty() {
        ("/ to search".to_string(), Color::DarkGray)
    } else {
        (state.query.clone(), Color::Gray)
    };
    let search_block = default_border(search_color).title(" Search ");
    let search_inner = search_block.inner(search);
    f.render_widget(search_block, search);
    f.render_widget(
        Paragraph::new(search_text).style(Style::default().fg(search_color)),
        search_inner,
    );

    if let Some(err) = state.error.as_deref() {
        f.render_widget(
            Paragraph::new(format!("Search failed: {err}")).style(Style::default().fg(Color::Red)),
            rows_area,
        );
        return;
    }
    if state.rows.is_empty() {
        let msg = if state.loading { "Loading..." } else { "Nothing found" };
        f.render_widget(Paragraph::new(msg).style(dim()), rows_area);
        return;
    }

    let visible = rows_area.height as usize;
    let start = state.selected.saturating_sub(visible.saturating_sub(1));
    let lines: Vec<Line> = state
        .rows
        .iter()
        .enumerate()
        .skip(start)
        .take(visible)
        .map(|(idx, row)| {
            let selected = idx == state.selected;
            let style = if selected { Style::default().fg(Color::Yellow) } else { Style::default() };
            Line::from(Span::styled(
                format!("{} {:>5}  {}", if selected { ">" } else { " " }, row.id, row.label),
                style,
            ))
        })
        .collect();
    f.render_widget(Paragraph::new(lines), rows_area);
}

// ---------------------------------------------------------------------------
// Dialogs and overlays
// ---------------------------------------------------------------------------

fn draw_wicket_dialog(f: &mut Frame, area: Rect, dialog: &WicketDialog) {
    let rect = centered(area, 56, 11);
    f.render_widget(Clear, rect);
    let block = default_border(Color::Red).title(" Wicket ");
    let inner = block.inner(rect);
    f.render_widget(block, rect);

    let field = |focus: WicketField, title: &str, value: String, enabled: bool| {
        let focused = dialog.focus == focus;
        let marker = if focused { ">" } else { " " };
        let style = if !enabled {
            dim()
        } else if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        Line::from(vec![
            Span::styled(format!("{marker} {title:<12}"), dim()),
            Span::styled(value, style),
        ])
    };

    let kind = dialog
        .wicket_type
        .map(|w| w.label().to_string())
        .unwrap_or_else(|| "-".to_string());
    let dismissed = WicketDialog::label_for(&dialog.batsmen, dialog.dismissed_player_id).to_string();
    let fielder = if dialog.needs_fielder() {
        WicketDialog::label_for(&dialog.fielders, dialog.fielder_id).to_string()
    } else {
        "not needed".to_string()
    };

    let status = if dialog.is_form_valid() {
        Span::styled("Enter submit   Esc cancel", Style::default().fg(Color::Green))
    } else {
        Span::styled("fill every field   Esc cancel", dim())
    };

    let lines = vec![
        field(WicketField::Kind, "How out", kind, true),
        Line::from(""),
        field(WicketField::Dismissed, "Batter", dismissed, true),
        Line::from(""),
        field(WicketField::Fielder, "Fielder", fielder, dialog.needs_fielder()),
        Line::from(""),
        Line::from(Span::styled("Tab/j/k field   h/l choose", dim())),
        Line::from(status),
    ];
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_custom_input(f: &mut Frame, area: Rect, section: ScoringSection, input: &str) {
    let rect = centered(area, 36, 3);
    f.render_widget(Clear, rect);
    let block = default_border(Color::Yellow).title(format!(" {} value ", section.label()));
    let inner = block.inner(rect);
    f.render_widget(block, rect);
    f.render_widget(Paragraph::new(format!("> {input}_")), inner);
}

fn draw_alert(f: &mut Frame, area: Rect, message: &str) {
    let rect = centered(area, 60, 7);
    f.render_widget(Clear, rect);
    let block = default_border(Color::Red).title(" Error ");
    let inner = block.inner(rect);
    f.render_widget(block, rect);
    f.render_widget(
        Paragraph::new(format!("{message}\n\nEnter to dismiss"))
            .wrap(Wrap { trim: true })
            .alignment(Alignment::Center),
        inner,
    );
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let widget = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Gray))
        .style_debug(Style::default().fg(Color::DarkGray));
    f.render_widget(widget, area);
}

fn draw_placeholder(f: &mut Frame, area: Rect, msg: &str) {
    let block = default_border(Color::DarkGray);
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        inner,
    );
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}
