mod app;
mod catalog;
mod config;
mod engine;
mod event;
mod flashcards;
mod session;
mod store;
mod ui;

use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use app::{App, AppScreen};
use catalog::question::{Subject, SubjectFilter};
use config::Config;
use engine::scoring;
use event::{AppEvent, EventHandler};
use store::json_store::JsonStore;
use store::schema::ExportData;
use ui::components::flashcard_board::FlashcardBoard;
use ui::components::history_panel::HistoryPanel;
use ui::components::progress_bar::ProgressBar;
use ui::components::question_card::QuestionCard;
use ui::components::summary::Summary;
use ui::layout::AppLayout;

#[derive(Parser)]
#[command(name = "simulado", version, about = "Terminal multiple-choice exam trainer")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Default subject filter (e.g. history, physics)")]
    subject: Option<String>,

    #[arg(short = 'n', long, help = "Questions per quiz")]
    count: Option<usize>,

    #[arg(long, value_name = "FILE", help = "Write a backup of learner data, then exit")]
    export: Option<PathBuf>,

    #[arg(long, value_name = "FILE", help = "Restore a backup written by --export, then exit")]
    import: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = cli.export {
        let config = Config::load().unwrap_or_default();
        let store = JsonStore::new()?;
        let data = store.export_all(&config);
        fs::write(&path, serde_json::to_string_pretty(&data)?)?;
        println!("Exported learner data to {}", path.display());
        return Ok(());
    }
    if let Some(path) = cli.import {
        let content = fs::read_to_string(&path)?;
        let data: ExportData = serde_json::from_str(&content)?;
        let store = JsonStore::new()?;
        store.import_all(&data)?;
        data.config.save()?;
        println!("Imported learner data from {}", path.display());
        return Ok(());
    }

    let mut app = App::new();

    if let Some(count) = cli.count {
        app.config.question_count = count.clamp(1, 20);
    }
    if let Some(subject) = cli.subject {
        if Subject::from_key(&subject).is_some() || subject == "any" {
            app.config.default_subject = subject;
        }
    }
    if let Some(theme_name) = cli.theme {
        if let Some(theme) = ui::theme::Theme::load(&theme_name) {
            let theme: &'static ui::theme::Theme = Box::leak(Box::new(theme));
            app.theme = theme;
            app.menu.theme = theme;
        }
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            // Ticks keep the feedback-lock countdown rendering.
            AppEvent::Tick => {}
            AppEvent::Resize(_, _) => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Home => handle_home_key(app, key),
        AppScreen::SubjectSelect => handle_subject_select_key(app, key),
        AppScreen::Quiz => handle_quiz_key(app, key),
        AppScreen::Result => handle_result_key(app, key),
        AppScreen::History => handle_history_key(app, key),
        AppScreen::Flashcards => handle_flashcards_key(app, key),
        AppScreen::Settings => handle_settings_key(app, key),
    }
}

fn handle_home_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('1') => {
            let filter = app.default_filter();
            app.start_quiz(filter);
        }
        KeyCode::Char('2') => app.go_to_subject_select(),
        KeyCode::Char('f') => app.go_to_flashcards(),
        KeyCode::Char('h') => app.go_to_history(),
        KeyCode::Char('c') => app.go_to_settings(),
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Enter => match app.menu.selected {
            0 => {
                let filter = app.default_filter();
                app.start_quiz(filter);
            }
            1 => app.go_to_subject_select(),
            2 => app.go_to_flashcards(),
            3 => app.go_to_history(),
            4 => app.go_to_settings(),
            _ => {}
        },
        _ => {}
    }
}

fn handle_subject_select_key(app: &mut App, key: KeyEvent) {
    let options = Subject::all().len() + 1;
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_home(),
        KeyCode::Up | KeyCode::Char('k') => {
            app.subject_select_idx = (app.subject_select_idx + options - 1) % options;
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.subject_select_idx = (app.subject_select_idx + 1) % options;
        }
        KeyCode::Enter => {
            let filter = if app.subject_select_idx == 0 {
                SubjectFilter::Any
            } else {
                SubjectFilter::Only(Subject::all()[app.subject_select_idx - 1])
            };
            app.start_quiz(filter);
        }
        _ => {}
    }
}

fn handle_quiz_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Esc {
        app.abort_quiz();
        return;
    }

    if app.feedback.is_some() {
        if matches!(
            key.code,
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('n')
        ) {
            app.advance_question();
        }
        return;
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.select_prev_choice(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_choice(),
        KeyCode::Enter => app.submit_selected(),
        KeyCode::Char(ch) if ch.is_ascii_alphabetic() => {
            app.submit_letter(ch.to_ascii_uppercase());
        }
        _ => {}
    }
}

fn handle_result_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Char('q') | KeyCode::Esc => app.go_to_home(),
        KeyCode::Char('r') => app.retry_quiz(),
        KeyCode::Char('f') => app.go_to_flashcards(),
        KeyCode::Char('h') => app.go_to_history(),
        _ => {}
    }
}

fn handle_history_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_home(),
        _ => {}
    }
}

fn handle_flashcards_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_home(),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev_flashcard(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_flashcard(),
        KeyCode::Enter | KeyCode::Char('m') => app.master_selected_flashcard(),
        _ => {}
    }
}

fn handle_settings_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            let _ = app.config.save();
            app.go_to_home();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            if app.settings_selected > 0 {
                app.settings_selected -= 1;
            }
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if app.settings_selected < 4 {
                app.settings_selected += 1;
            }
        }
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
            app.settings_cycle_forward();
        }
        KeyCode::Left | KeyCode::Char('h') => {
            app.settings_cycle_backward();
        }
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Home => render_home(frame, app),
        AppScreen::SubjectSelect => render_subject_select(frame, app),
        AppScreen::Quiz => render_quiz(frame, app),
        AppScreen::Result => render_result(frame, app),
        AppScreen::History => render_history(frame, app),
        AppScreen::Flashcards => render_flashcards(frame, app),
        AppScreen::Settings => render_settings(frame, app),
    }
}

fn header_line(app: &App) -> String {
    let profile = &app.profile;
    let streak_text = if profile.streak_days > 0 {
        format!(" | {} day streak", profile.streak_days)
    } else {
        String::new()
    };
    format!(
        " {} | {} XP | Daily {}/{}{}",
        app.rank().name(),
        profile.total_xp,
        profile.daily_xp,
        app.config.daily_xp_goal,
        streak_text,
    )
}

fn render_home(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let header_info = header_line(app);
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " simulado ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            &*header_info,
            Style::default().fg(colors.muted()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout[0]);

    let menu_area = ui::layout::centered_rect(50, 80, layout[1]);
    frame.render_widget(&app.menu, menu_area);

    let footer_text = match app.notice {
        Some(ref notice) => format!(" {notice}"),
        None => " [1-2] Quiz  [f] Flashcards  [h] History  [q] Quit ".to_string(),
    };
    let footer_color = if app.notice.is_some() {
        colors.warning()
    } else {
        colors.muted()
    };
    let footer = Paragraph::new(Line::from(Span::styled(
        footer_text,
        Style::default().fg(footer_color),
    )));
    frame.render_widget(footer, layout[2]);
}

fn render_subject_select(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let centered = ui::layout::centered_rect(40, 60, area);
    let block = Block::bordered()
        .title(" Choose a subject ")
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(centered);
    block.render(centered, frame.buffer_mut());

    let mut lines = vec![Line::from("")];
    let mut options: Vec<String> = vec!["All subjects".to_string()];
    options.extend(Subject::all().iter().map(|s| s.label().to_string()));

    for (i, label) in options.iter().enumerate() {
        let is_selected = i == app.subject_select_idx;
        let indicator = if is_selected { ">" } else { " " };
        let style = if is_selected {
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.fg())
        };
        lines.push(Line::from(Span::styled(
            format!("  {indicator} {label}"),
            style,
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  [Enter] Start  [Esc] Back",
        Style::default().fg(colors.muted()),
    )));

    Paragraph::new(lines).render(inner, frame.buffer_mut());
}

fn render_quiz(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let Some(ref attempt) = app.attempt else {
        return;
    };
    let Some(question) = attempt.current() else {
        return;
    };

    let app_layout = AppLayout::new(area);

    let header_text = format!(
        " Question {} of {} | {} | Score {}",
        attempt.cursor() + 1,
        attempt.len(),
        attempt.filter().label(),
        attempt.score(),
    );
    let header = Paragraph::new(Line::from(Span::styled(
        &*header_text,
        Style::default()
            .fg(colors.header_fg())
            .bg(colors.header_bg())
            .add_modifier(Modifier::BOLD),
    )))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, app_layout.header);

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(3)])
        .split(app_layout.main);

    let card = QuestionCard::new(
        question,
        app.selected_choice,
        app.feedback.as_ref(),
        app.theme,
    );
    frame.render_widget(card, main_layout[0]);

    let progress = ProgressBar::new("Progress", attempt.progress(), app.theme);
    frame.render_widget(progress, main_layout[1]);

    let footer_text = if app.feedback.is_some() {
        match app.feedback_lock_remaining_ms() {
            Some(ms) => format!(" ... ({ms}ms)"),
            None => " [Enter] Next question  [Esc] Abort ".to_string(),
        }
    } else {
        " [A-E] Answer  [j/k] Move  [Enter] Submit  [Esc] Abort ".to_string()
    };
    let footer = Paragraph::new(Line::from(Span::styled(
        footer_text,
        Style::default().fg(colors.muted()),
    )));
    frame.render_widget(footer, app_layout.footer);
}

fn render_result(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();

    if let Some(ref summary) = app.last_summary {
        let centered = ui::layout::centered_rect(60, 70, area);
        let widget = Summary::new(summary, app.theme);
        frame.render_widget(widget, centered);
    }
}

fn render_history(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let panel = HistoryPanel::new(&app.results, app.theme);
    frame.render_widget(panel, layout[0]);

    let footer = Paragraph::new(Line::from(Span::styled(
        " [Esc] Back ",
        Style::default().fg(colors.muted()),
    )));
    frame.render_widget(footer, layout[1]);
}

fn render_flashcards(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let board = FlashcardBoard::new(&app.deck, app.flashcard_selected, app.theme);
    frame.render_widget(board, layout[0]);

    let footer = Paragraph::new(Line::from(Span::styled(
        " [j/k] Move  [m/Enter] Mastered  [Esc] Back ",
        Style::default().fg(colors.muted()),
    )));
    frame.render_widget(footer, layout[1]);
}

fn render_settings(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let centered = ui::layout::centered_rect(60, 80, area);

    let block = Block::bordered()
        .title(" Settings ")
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(centered);
    block.render(centered, frame.buffer_mut());

    let policy_label = match app.config.streak_policy {
        engine::StreakPolicy::Strict => "strict (gap resets streak)",
        engine::StreakPolicy::Lenient => "lenient (any day counts)",
    };
    let subject_label = Subject::from_key(&app.config.default_subject)
        .map(Subject::label)
        .unwrap_or("All subjects");

    let fields: Vec<(String, String)> = vec![
        (
            "Questions per quiz".to_string(),
            format!("{}", app.config.question_count),
        ),
        ("Default subject".to_string(), subject_label.to_string()),
        ("Theme".to_string(), app.config.theme.clone()),
        ("Streak policy".to_string(), policy_label.to_string()),
        (
            "Daily XP goal".to_string(),
            format!("{}", app.config.daily_xp_goal),
        ),
    ];

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(fields.len() as u16 * 3),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(inner);

    let header = Paragraph::new(Line::from(Span::styled(
        "  Use arrows to navigate, Enter/Right to change, ESC to save & exit",
        Style::default().fg(colors.muted()),
    )));
    header.render(layout[0], frame.buffer_mut());

    let field_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            fields
                .iter()
                .map(|_| Constraint::Length(3))
                .collect::<Vec<_>>(),
        )
        .split(layout[1]);

    for (i, (label, value)) in fields.iter().enumerate() {
        let is_selected = i == app.settings_selected;
        let indicator = if is_selected { " > " } else { "   " };

        let label_text = format!("{indicator}{label}:");
        let value_text = format!("  < {value} >");

        let label_style = Style::default()
            .fg(if is_selected {
                colors.accent()
            } else {
                colors.fg()
            })
            .add_modifier(if is_selected {
                Modifier::BOLD
            } else {
                Modifier::empty()
            });

        let value_style = Style::default().fg(if is_selected {
            colors.selection_fg()
        } else {
            colors.muted()
        });

        let lines = vec![
            Line::from(Span::styled(label_text, label_style)),
            Line::from(Span::styled(value_text, value_style)),
        ];
        Paragraph::new(lines).render(field_layout[i], frame.buffer_mut());
    }

    let rank = scoring::rank_for(app.profile.total_xp);
    let footer = Paragraph::new(Line::from(Span::styled(
        format!(
            "  [ESC] Save & back  |  Current rank: {} ({} XP)",
            rank.name(),
            app.profile.total_xp
        ),
        Style::default().fg(colors.accent()),
    )));
    footer.render(layout[3], frame.buffer_mut());
}
