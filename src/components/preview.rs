use cricket_api::{BallEvent, BallType};
use tui::buffer::Buffer;
use tui::layout::{Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Paragraph, Widget, Wrap};

/// Shows the ball that would be recorded right now: a human summary on top,
/// the exact request body underneath.
pub struct BallPreview<'a> {
    pub ball: &'a BallEvent,
    pub striker: Option<&'a str>,
    pub bowler: Option<&'a str>,
    pub show_payload: bool,
}

impl<'a> BallPreview<'a> {
    fn summary(&self) -> Vec<Line<'a>> {
        let ball = self.ball;
        let dim = Style::default().fg(Color::DarkGray);
        let legality = if ball.legal_ball {
            Span::styled("legal", Style::default().fg(Color::Green))
        } else {
            Span::styled("illegal", Style::default().fg(Color::Red))
        };

        let mut lines = vec![
            Line::from(vec![
                Span::styled(
                    format!("Over {}.{} ", ball.over_number, ball.ball_number),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(ball_type_label(ball.ball_type), Style::default().fg(Color::Yellow)),
                Span::raw(" "),
                legality,
            ]),
            Line::from(vec![
                Span::styled("runs ", dim),
                Span::raw(ball.runs_scored.to_string()),
                Span::styled("  extras ", dim),
                Span::raw(ball.extras.to_string()),
                Span::styled("  penalty ", dim),
                Span::raw(ball.penalty_runs.to_string()),
                Span::styled("  total ", dim),
                Span::styled(
                    ball.total_runs().to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("striker ", dim),
                Span::raw(self.striker.unwrap_or("-").to_string()),
                Span::styled("  bowler ", dim),
                Span::raw(self.bowler.unwrap_or("-").to_string()),
            ]),
        ];

        if ball.is_wicket {
            let kind = ball.wicket_type.map(|w| w.label()).unwrap_or("details pending");
            lines.push(Line::from(vec![Span::styled(
                format!("WICKET: {kind}"),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]));
        }
        lines
    }
}

fn ball_type_label(ball_type: BallType) -> &'static str {
    match ball_type {
        BallType::Legal => "LEGAL",
        BallType::Wide => "WIDE",
        BallType::Bye => "BYE",
        BallType::LegBye => "LEG BYE",
        BallType::NoBall => "NO BALL",
    }
}

impl Widget for BallPreview<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let summary = self.summary();
        let summary_height = summary.len() as u16;

        if !self.show_payload || area.height <= summary_height + 1 {
            Paragraph::new(summary).render(area, buf);
            return;
        }

        let [top, _gap, bottom] = Layout::vertical([
            Constraint::Length(summary_height),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .areas(area);
        Paragraph::new(summary).render(top, buf);

        // The payload never fails to serialise; an empty pane is the fallback.
        let payload = serde_json::to_string_pretty(self.ball).unwrap_or_default();
        Paragraph::new(payload)
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: false })
            .render(bottom, buf);
    }
}
