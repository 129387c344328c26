use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::catalog::question::Question;
use crate::session::attempt::AnswerFeedback;
use crate::ui::theme::Theme;

/// The quiz screen body: prompt, lettered choices with a selection cursor,
/// and once the slot is answered, the grading feedback with the professor's
/// explanation.
pub struct QuestionCard<'a> {
    pub question: &'a Question,
    pub selected: usize,
    pub feedback: Option<&'a AnswerFeedback>,
    pub theme: &'a Theme,
}

impl<'a> QuestionCard<'a> {
    pub fn new(
        question: &'a Question,
        selected: usize,
        feedback: Option<&'a AnswerFeedback>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            question,
            selected,
            feedback,
            theme,
        }
    }
}

impl Widget for QuestionCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let title = format!(
            " {} | {} | {} ",
            self.question.subject.label(),
            self.question.topic,
            self.question.difficulty.label()
        );
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let letters = self.question.letters();
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Length(letters.len() as u16 + 1),
                Constraint::Min(0),
            ])
            .split(inner);

        let prompt = Paragraph::new(Line::from(Span::styled(
            self.question.prompt.as_str(),
            Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
        )))
        .wrap(Wrap { trim: true });
        prompt.render(layout[0], buf);

        let mut choice_lines: Vec<Line> = Vec::new();
        for (i, letter) in letters.iter().enumerate() {
            let text = self.question.choice_text(*letter).unwrap_or_default();
            let is_selected = i == self.selected && self.feedback.is_none();

            let style = match self.feedback {
                // After grading, color the correct letter and the chosen one.
                Some(fb) if *letter == fb.correct_letter => {
                    Style::default().fg(colors.correct()).add_modifier(Modifier::BOLD)
                }
                Some(fb) if *letter == fb.chosen && !fb.correct => {
                    Style::default().fg(colors.incorrect())
                }
                Some(_) => Style::default().fg(colors.muted()),
                None if is_selected => Style::default()
                    .fg(colors.selection_fg())
                    .bg(colors.selection_bg())
                    .add_modifier(Modifier::BOLD),
                None => Style::default().fg(colors.fg()),
            };

            let indicator = if is_selected { ">" } else { " " };
            choice_lines.push(Line::from(Span::styled(
                format!(" {indicator} {letter}) {text}"),
                style,
            )));
        }
        Paragraph::new(choice_lines).render(layout[1], buf);

        if let Some(fb) = self.feedback {
            let mut lines = Vec::new();
            if fb.correct {
                lines.push(Line::from(Span::styled(
                    format!(" Correct! +{} XP", fb.xp),
                    Style::default()
                        .fg(colors.correct())
                        .add_modifier(Modifier::BOLD),
                )));
            } else {
                lines.push(Line::from(Span::styled(
                    format!(" Wrong. The answer was {}.", fb.correct_letter),
                    Style::default()
                        .fg(colors.incorrect())
                        .add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::from(Span::styled(
                    " Added to your flashcards.",
                    Style::default().fg(colors.warning()),
                )));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!(" Explanation: {}", fb.explanation),
                Style::default().fg(colors.fg()),
            )));

            Paragraph::new(lines)
                .wrap(Wrap { trim: false })
                .render(layout[2], buf);
        }
    }
}
