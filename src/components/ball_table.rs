use cricket_api::{BallRecord, BallType};
use tui::buffer::Buffer;
use tui::layout::{Constraint, Rect};
use tui::style::{Color, Modifier, Style};
use tui::widgets::{Cell, Row, Table, Widget};

const COLUMNS: [&str; 7] = ["Ball", "Bowler", "Batter", "Runs", "Extras", "Type", "Wicket"];

/// Innings history, newest delivery first.
pub struct BallByBallTable<'a> {
    pub balls: &'a [BallRecord],
    pub scroll_offset: u16,
}

/// Short scorebook notation for a delivery, e.g. `4`, `1wd`, `W`, `2nb`.
pub fn notation(record: &BallRecord) -> String {
    let ball = &record.event;
    if ball.is_wicket {
        return "W".to_string();
    }
    match ball.ball_type {
        BallType::Legal if ball.runs_scored == 0 => ".".to_string(),
        BallType::Legal => ball.runs_scored.to_string(),
        BallType::Wide => format!("{}wd", ball.extras),
        BallType::Bye => format!("{}b", ball.extras),
        BallType::LegBye => format!("{}lb", ball.extras),
        BallType::NoBall => format!("{}nb", ball.runs_scored + ball.extras),
    }
}

impl Widget for BallByBallTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 2 {
            return;
        }

        let header = Row::new(COLUMNS.iter().map(|c| Cell::from(*c)))
            .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD));

        let rows = self
            .balls
            .iter()
            .rev()
            .skip(self.scroll_offset as usize)
            .take(area.height.saturating_sub(1) as usize)
            .map(|record| {
                let ball = &record.event;
                let style = if ball.is_wicket {
                    Style::default().fg(Color::Red)
                } else if !ball.legal_ball {
                    Style::default().fg(Color::Yellow)
                } else if ball.runs_scored >= 4 {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default()
                };
                let wicket = ball.wicket_type.map(|w| w.label()).unwrap_or("");
                Row::new(vec![
                    Cell::from(format!("{}.{}", ball.over_number, ball.ball_number)),
                    Cell::from(record.bowler_name.clone().unwrap_or_default()),
                    Cell::from(record.striker_name.clone().unwrap_or_default()),
                    Cell::from(ball.runs_scored.to_string()),
                    Cell::from(ball.extras.to_string()),
                    Cell::from(notation(record)),
                    Cell::from(wicket),
                ])
                .style(style)
            });

        Table::new(
            rows,
            [
                Constraint::Length(6),
                Constraint::Fill(1),
                Constraint::Fill(1),
                Constraint::Length(5),
                Constraint::Length(7),
                Constraint::Length(5),
                Constraint::Length(12),
            ],
        )
        .header(header)
        .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cricket_api::{BallEvent, WicketType};

    fn record(ball: BallEvent) -> BallRecord {
        BallRecord { event: ball, ..BallRecord::default() }
    }

    #[test]
    fn notation_follows_the_scorebook() {
        let dot = record(BallEvent { legal_ball: true, ..BallEvent::default() });
        assert_eq!(notation(&dot), ".");

        let wide = record(BallEvent { ball_type: BallType::Wide, extras: 1, ..BallEvent::default() });
        assert_eq!(notation(&wide), "1wd");

        let no_ball = record(BallEvent {
            ball_type: BallType::NoBall,
            runs_scored: 4,
            extras: 1,
            ..BallEvent::default()
        });
        assert_eq!(notation(&no_ball), "5nb");

        let out = record(BallEvent {
            is_wicket: true,
            wicket_type: Some(WicketType::Bowled),
            ..BallEvent::default()
        });
        assert_eq!(notation(&out), "W");
    }

    #[test]
    fn newest_ball_is_listed_first() {
        let balls = vec![
            record(BallEvent { over_number: 0, ball_number: 1, ..BallEvent::default() }),
            record(BallEvent { over_number: 0, ball_number: 2, ..BallEvent::default() }),
        ];
        let area = Rect::new(0, 0, 60, 4);
        let mut buf = Buffer::empty(area);
        BallByBallTable { balls: &balls, scroll_offset: 0 }.render(area, &mut buf);
        let first_row: String = (0..6).map(|x| buf[(x, 1)].symbol()).collect();
        assert!(first_row.starts_with("0.2"));
    }
}
