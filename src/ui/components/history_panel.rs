use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::result::{self, ResultRecord};
use crate::ui::theme::Theme;

const VISIBLE_ROWS: usize = 15;

/// Recent results, newest first, with the all-time aggregate underneath.
pub struct HistoryPanel<'a> {
    pub records: &'a [ResultRecord],
    pub theme: &'a Theme,
}

impl<'a> HistoryPanel<'a> {
    pub fn new(records: &'a [ResultRecord], theme: &'a Theme) -> Self {
        Self { records, theme }
    }
}

impl Widget for HistoryPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" History ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(3)])
            .split(inner);

        if self.records.is_empty() {
            let empty = Paragraph::new(Line::from(Span::styled(
                "  No quizzes taken yet.",
                Style::default().fg(colors.muted()),
            )));
            empty.render(layout[0], buf);
            return;
        }

        let mut lines = Vec::new();
        for record in result::recent(self.records, VISIBLE_ROWS) {
            let when = record.timestamp.format("%Y-%m-%d %H:%M");
            let row = format!(
                "  {when}  {:<14} {:>2}/{:<2}  +{} XP",
                record.subject.label(),
                record.correct,
                record.total,
                record.xp_earned,
            );
            let color = if record.correct == record.total {
                colors.correct()
            } else {
                colors.fg()
            };
            lines.push(Line::from(Span::styled(row, Style::default().fg(color))));
        }
        Paragraph::new(lines).render(layout[0], buf);

        let summary = result::summarize(self.records);
        let totals = Line::from(vec![
            Span::styled("  All time: ", Style::default().fg(colors.muted())),
            Span::styled(
                format!("{} attempts", summary.attempts),
                Style::default().fg(colors.fg()),
            ),
            Span::styled("  |  ", Style::default().fg(colors.muted())),
            Span::styled(
                format!("{:.1}% accuracy", summary.accuracy),
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            ),
            Span::styled("  |  ", Style::default().fg(colors.muted())),
            Span::styled(
                format!("{} XP", summary.total_xp),
                Style::default().fg(colors.accent()),
            ),
        ]);
        Paragraph::new(totals).render(layout[1], buf);
    }
}
