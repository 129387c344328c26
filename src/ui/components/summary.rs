use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::app::ResultSummary;
use crate::engine::scoring;
use crate::ui::theme::Theme;

/// Result screen body: score, grade estimate, XP, rank movement, freshly
/// unlocked titles, and a performance message.
pub struct Summary<'a> {
    pub summary: &'a ResultSummary,
    pub theme: &'a Theme,
}

impl<'a> Summary<'a> {
    pub fn new(summary: &'a ResultSummary, theme: &'a Theme) -> Self {
        Self { summary, theme }
    }
}

impl Widget for Summary<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let record = &self.summary.record;

        let block = Block::bordered()
            .title(" Quiz Complete ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(2),
            ])
            .split(inner);

        let ratio = if record.total > 0 {
            record.correct as f64 / record.total as f64
        } else {
            0.0
        };
        let message = if record.correct == record.total {
            ("Perfect score. Outstanding!", colors.correct())
        } else if ratio > 0.5 {
            ("Good work. Keep studying!", colors.accent())
        } else {
            ("Needs more practice. Don't give up!", colors.warning())
        };
        let title = Paragraph::new(Line::from(Span::styled(
            message.0,
            Style::default().fg(message.1).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center);
        title.render(layout[0], buf);

        let score_text = format!("{}/{}", record.correct, record.total);
        let score_line = Line::from(vec![
            Span::styled("  Score:       ", Style::default().fg(colors.fg())),
            Span::styled(
                &*score_text,
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  ({:.0}%)", record.accuracy()),
                Style::default().fg(colors.muted()),
            ),
        ]);
        Paragraph::new(score_line).render(layout[1], buf);

        let grade_line = Line::from(vec![
            Span::styled("  Est. grade:  ", Style::default().fg(colors.fg())),
            Span::styled(
                format!("{:.0}", record.estimated_grade()),
                Style::default().fg(colors.fg()),
            ),
            Span::styled("/1000", Style::default().fg(colors.muted())),
        ]);
        Paragraph::new(grade_line).render(layout[2], buf);

        let xp_line = Line::from(vec![
            Span::styled("  XP earned:   ", Style::default().fg(colors.fg())),
            Span::styled(
                format!("+{}", record.xp_earned),
                Style::default()
                    .fg(colors.correct())
                    .add_modifier(Modifier::BOLD),
            ),
        ]);
        Paragraph::new(xp_line).render(layout[3], buf);

        let mut rank_spans = vec![
            Span::styled("  Rank:        ", Style::default().fg(colors.fg())),
            Span::styled(
                self.summary.rank_after.name(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            ),
        ];
        if self.summary.rank_after > self.summary.rank_before {
            rank_spans.push(Span::styled(
                format!("  (up from {}!)", self.summary.rank_before.name()),
                Style::default().fg(colors.correct()),
            ));
        } else if let Some((needed, next)) = scoring::next_rank(self.summary.total_xp) {
            rank_spans.push(Span::styled(
                format!("  ({needed} XP to {next})"),
                Style::default().fg(colors.muted()),
            ));
        }
        Paragraph::new(Line::from(rank_spans)).render(layout[4], buf);

        if !self.summary.new_titles.is_empty() {
            let mut lines = vec![Line::from(Span::styled(
                "  New titles unlocked:",
                Style::default().fg(colors.fg()),
            ))];
            for title in &self.summary.new_titles {
                lines.push(Line::from(Span::styled(
                    format!("    * {title}"),
                    Style::default()
                        .fg(colors.warning())
                        .add_modifier(Modifier::BOLD),
                )));
            }
            Paragraph::new(lines).render(layout[5], buf);
        }

        let help = Paragraph::new(Line::from(vec![
            Span::styled("  [Enter] Menu  ", Style::default().fg(colors.accent())),
            Span::styled("[r] Again  ", Style::default().fg(colors.accent())),
            Span::styled("[f] Flashcards  ", Style::default().fg(colors.accent())),
            Span::styled("[h] History", Style::default().fg(colors.accent())),
        ]));
        help.render(layout[6], buf);
    }
}
