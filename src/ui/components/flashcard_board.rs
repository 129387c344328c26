use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::catalog::question::Subject;
use crate::flashcards::FlashcardDeck;
use crate::ui::theme::Theme;

/// Flashcard review screen: outstanding cards on the left, the selected
/// card's answer and explanation on the right.
pub struct FlashcardBoard<'a> {
    pub deck: &'a FlashcardDeck,
    pub selected: usize,
    pub theme: &'a Theme,
}

impl<'a> FlashcardBoard<'a> {
    pub fn new(deck: &'a FlashcardDeck, selected: usize, theme: &'a Theme) -> Self {
        Self {
            deck,
            selected,
            theme,
        }
    }
}

impl Widget for FlashcardBoard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" Flashcards ({}) ", self.deck.len()))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.deck.is_empty() {
            let empty = Paragraph::new(Line::from(Span::styled(
                "  Nothing to review. Missed questions land here.",
                Style::default().fg(colors.muted()),
            )));
            empty.render(inner, buf);
            return;
        }

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(inner);

        let mut rows = Vec::new();
        for (i, card) in self.deck.list().iter().enumerate() {
            let is_selected = i == self.selected;
            let indicator = if is_selected { ">" } else { " " };
            let subject = Subject::from_key(&card.subject)
                .map(Subject::label)
                .unwrap_or("Unknown");
            let mut prompt: String = card.prompt.chars().take(30).collect();
            if prompt.len() < card.prompt.len() {
                prompt.push('…');
            }
            let style = if is_selected {
                Style::default()
                    .fg(colors.selection_fg())
                    .bg(colors.selection_bg())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };
            rows.push(Line::from(Span::styled(
                format!(" {indicator} [{subject}] {prompt}"),
                style,
            )));
        }
        Paragraph::new(rows).render(columns[0], buf);

        if let Some(card) = self.deck.list().get(self.selected) {
            let detail = vec![
                Line::from(Span::styled(
                    card.prompt.as_str(),
                    Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(vec![
                    Span::styled("Answer: ", Style::default().fg(colors.muted())),
                    Span::styled(
                        card.answer.as_str(),
                        Style::default()
                            .fg(colors.correct())
                            .add_modifier(Modifier::BOLD),
                    ),
                ]),
                Line::from(""),
                Line::from(Span::styled(
                    card.explanation.as_str(),
                    Style::default().fg(colors.fg()),
                )),
            ];
            Paragraph::new(detail)
                .wrap(Wrap { trim: true })
                .render(columns[1], buf);
        }
    }
}
