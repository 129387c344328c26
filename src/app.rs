use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::catalog::question::{Question, Subject, SubjectFilter};
use crate::catalog::sampler;
use crate::catalog::seed;
use crate::config::Config;
use crate::engine::progression;
use crate::engine::scoring::{self, Rank};
use crate::flashcards::FlashcardDeck;
use crate::session::attempt::{AnswerFeedback, Attempt, Phase};
use crate::session::result::ResultRecord;
use crate::store::json_store::JsonStore;
use crate::store::schema::{FlashcardsData, ProfileData, ResultsData};
use crate::ui::components::menu::Menu;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Home,
    SubjectSelect,
    Quiz,
    Result,
    History,
    Flashcards,
    Settings,
}

/// Data behind the Result screen, frozen at attempt completion.
pub struct ResultSummary {
    pub record: ResultRecord,
    pub rank_before: Rank,
    pub rank_after: Rank,
    pub new_titles: Vec<String>,
    pub total_xp: u64,
}

pub struct App {
    pub screen: AppScreen,
    pub menu: Menu<'static>,
    pub theme: &'static Theme,
    pub config: Config,
    pub store: Option<JsonStore>,
    pub catalog: Vec<Question>,
    pub profile: ProfileData,
    pub results: Vec<ResultRecord>,
    pub deck: FlashcardDeck,
    pub attempt: Option<Attempt>,
    pub feedback: Option<AnswerFeedback>,
    pub last_summary: Option<ResultSummary>,
    /// Banner on the Home screen ("no questions available", import notices).
    pub notice: Option<String>,
    pub selected_choice: usize,
    pub subject_select_idx: usize,
    pub settings_selected: usize,
    pub flashcard_selected: usize,
    pub should_quit: bool,
    last_filter: SubjectFilter,
    xp_this_attempt: u64,
    rank_at_start: Rank,
    titles_at_start: Vec<String>,
    feedback_since: Option<Instant>,
    rng: SmallRng,
}

impl App {
    pub fn new() -> Self {
        let mut config = Config::load().unwrap_or_default();
        let subject_keys: Vec<&str> = Subject::all().iter().map(|s| s.to_key()).collect();
        config.normalize(&subject_keys);

        let loaded_theme = Theme::load(&config.theme).unwrap_or_default();
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));
        let menu = Menu::new(theme);

        let store = JsonStore::new().ok();
        let mut notice = None;

        let (catalog, profile, results, deck) = if let Some(ref s) = store {
            if s.check_interrupted_import() {
                notice = Some("Recovered from an interrupted import; backup files removed.".to_string());
            }

            let catalog = match s.seed_questions_if_empty() {
                Ok(_) => s.load_questions().questions,
                Err(_) => Vec::new(),
            };

            // load_profile returns None if the file exists but can't parse.
            match s.load_profile() {
                Some(pd) if !pd.needs_reset() => {
                    (catalog, pd, s.load_results().results, s.load_flashcards().deck)
                }
                _ => {
                    // Schema mismatch or corruption: full reset of learner data.
                    (
                        catalog,
                        ProfileData::default(),
                        Vec::new(),
                        FlashcardDeck::default(),
                    )
                }
            }
        } else {
            // No writable data dir. Run off the embedded catalog; nothing
            // will persist.
            (
                seed::load_catalog().unwrap_or_default(),
                ProfileData::default(),
                Vec::new(),
                FlashcardDeck::default(),
            )
        };

        if catalog.is_empty() {
            notice = Some("No questions available. Check the data directory.".to_string());
        }

        Self {
            screen: AppScreen::Home,
            menu,
            theme,
            config,
            store,
            catalog,
            profile,
            results,
            deck,
            attempt: None,
            feedback: None,
            last_summary: None,
            notice,
            selected_choice: 0,
            subject_select_idx: 0,
            settings_selected: 0,
            flashcard_selected: 0,
            should_quit: false,
            last_filter: SubjectFilter::Any,
            xp_this_attempt: 0,
            rank_at_start: scoring::rank_for(0),
            titles_at_start: Vec::new(),
            feedback_since: None,
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn rank(&self) -> Rank {
        scoring::rank_for(self.profile.total_xp)
    }

    /// Sample a batch and open the quiz screen. An empty batch stays on Home
    /// with a notice so the caller can broaden the filter.
    pub fn start_quiz(&mut self, filter: SubjectFilter) {
        let batch = sampler::weighted_sample(
            &self.catalog,
            filter,
            self.config.question_count,
            self.rank(),
            &mut self.rng,
        );
        match Attempt::start(batch, filter) {
            Ok(attempt) => {
                self.attempt = Some(attempt);
                self.last_filter = filter;
                self.xp_this_attempt = 0;
                self.rank_at_start = self.rank();
                self.titles_at_start = progression::titles_for(&self.profile);
                self.feedback = None;
                self.feedback_since = None;
                self.selected_choice = 0;
                self.notice = None;
                self.screen = AppScreen::Quiz;
            }
            Err(_) => {
                self.notice = Some(format!(
                    "No questions available for {}. Try another subject.",
                    filter.label()
                ));
                self.screen = AppScreen::Home;
            }
        }
    }

    pub fn retry_quiz(&mut self) {
        self.start_quiz(self.last_filter);
    }

    pub fn select_next_choice(&mut self) {
        if let Some(count) = self.current_choice_count()
            && count > 0
            && self.feedback.is_none()
        {
            self.selected_choice = (self.selected_choice + 1) % count;
        }
    }

    pub fn select_prev_choice(&mut self) {
        if let Some(count) = self.current_choice_count()
            && count > 0
            && self.feedback.is_none()
        {
            self.selected_choice = (self.selected_choice + count - 1) % count;
        }
    }

    fn current_choice_count(&self) -> Option<usize> {
        self.attempt
            .as_ref()
            .and_then(Attempt::current)
            .map(|q| q.choices.len())
    }

    /// Submit the highlighted choice for the current question.
    pub fn submit_selected(&mut self) {
        let Some(letter) = self
            .attempt
            .as_ref()
            .and_then(Attempt::current)
            .and_then(|q| q.letters().get(self.selected_choice).copied())
        else {
            return;
        };
        self.submit_letter(letter);
    }

    /// Submit a specific choice letter. Rejections from the attempt (slot
    /// already answered, unknown letter) are dropped: the keypress simply
    /// does nothing, and no XP can be double-counted.
    pub fn submit_letter(&mut self, letter: char) {
        if self.feedback.is_some() {
            return;
        }
        let Some(attempt) = self.attempt.as_mut() else {
            return;
        };
        let Some(question) = attempt.current().cloned() else {
            return;
        };

        let Ok(feedback) = attempt.answer(letter) else {
            return;
        };

        if let Some(idx) = question.letters().iter().position(|&l| l == feedback.chosen) {
            self.selected_choice = idx;
        }

        let today = chrono::Utc::now().date_naive();
        progression::touch_day(&mut self.profile, today, self.config.streak_policy);
        if feedback.correct {
            progression::apply_xp(&mut self.profile, question.subject, feedback.xp);
            self.xp_this_attempt += feedback.xp;
        } else {
            self.deck.record_miss(&question);
        }

        self.feedback = Some(feedback);
        self.feedback_since = Some(Instant::now());
        self.save_data();
    }

    /// Milliseconds left on the post-answer input lock; None once expired.
    pub fn feedback_lock_remaining_ms(&self) -> Option<u64> {
        let since = self.feedback_since?;
        let delay = self.config.feedback_delay_ms;
        let elapsed = since.elapsed().as_millis() as u64;
        if elapsed < delay { Some(delay - elapsed) } else { None }
    }

    /// Move past the answered question once the feedback lock expires.
    pub fn advance_question(&mut self) {
        if self.feedback.is_none() || self.feedback_lock_remaining_ms().is_some() {
            return;
        }
        let Some(attempt) = self.attempt.as_mut() else {
            return;
        };
        match attempt.advance() {
            Ok(Phase::Completed) => self.finish_quiz(),
            Ok(Phase::InProgress) => {
                self.feedback = None;
                self.feedback_since = None;
                self.selected_choice = 0;
            }
            Err(_) => {}
        }
    }

    fn finish_quiz(&mut self) {
        let Some(attempt) = self.attempt.take() else {
            return;
        };
        let record = ResultRecord::from_attempt(&attempt, self.xp_this_attempt);
        self.results.push(record.clone());
        self.profile.total_attempts += 1;

        let titles_now = progression::titles_for(&self.profile);
        let new_titles: Vec<String> = titles_now
            .into_iter()
            .filter(|t| !self.titles_at_start.contains(t))
            .collect();
        self.last_summary = Some(ResultSummary {
            record,
            rank_before: self.rank_at_start,
            rank_after: self.rank(),
            new_titles,
            total_xp: self.profile.total_xp,
        });

        self.feedback = None;
        self.feedback_since = None;
        self.save_data();
        self.screen = AppScreen::Result;
    }

    /// Esc during a quiz: the attempt is discarded without a result record.
    pub fn abort_quiz(&mut self) {
        self.attempt = None;
        self.feedback = None;
        self.feedback_since = None;
        self.go_to_home();
    }

    fn save_data(&self) {
        if let Some(ref store) = self.store {
            let _ = store.save_profile(&self.profile);
            let _ = store.save_results(&ResultsData {
                schema_version: 1,
                results: self.results.clone(),
            });
            let _ = store.save_flashcards(&FlashcardsData {
                schema_version: 1,
                deck: self.deck.clone(),
            });
        }
    }

    pub fn go_to_home(&mut self) {
        self.screen = AppScreen::Home;
    }

    pub fn go_to_subject_select(&mut self) {
        self.subject_select_idx = 0;
        self.screen = AppScreen::SubjectSelect;
    }

    pub fn go_to_history(&mut self) {
        self.screen = AppScreen::History;
    }

    pub fn go_to_flashcards(&mut self) {
        self.flashcard_selected = 0;
        self.screen = AppScreen::Flashcards;
    }

    pub fn go_to_settings(&mut self) {
        self.settings_selected = 0;
        self.screen = AppScreen::Settings;
    }

    pub fn select_next_flashcard(&mut self) {
        if !self.deck.is_empty() {
            self.flashcard_selected = (self.flashcard_selected + 1).min(self.deck.len() - 1);
        }
    }

    pub fn select_prev_flashcard(&mut self) {
        self.flashcard_selected = self.flashcard_selected.saturating_sub(1);
    }

    /// Mark the highlighted flashcard mastered (deletes it).
    pub fn master_selected_flashcard(&mut self) {
        let Some(id) = self.deck.list().get(self.flashcard_selected).map(|c| c.id) else {
            return;
        };
        self.deck.mark_mastered(id);
        if !self.deck.is_empty() {
            self.flashcard_selected = self.flashcard_selected.min(self.deck.len() - 1);
        } else {
            self.flashcard_selected = 0;
        }
        self.save_data();
    }

    pub fn settings_cycle_forward(&mut self) {
        match self.settings_selected {
            0 => {
                self.config.question_count = (self.config.question_count + 1).min(20);
            }
            1 => self.cycle_subject(1),
            2 => self.cycle_theme(1),
            3 => {
                self.config.streak_policy = match self.config.streak_policy {
                    progression::StreakPolicy::Strict => progression::StreakPolicy::Lenient,
                    progression::StreakPolicy::Lenient => progression::StreakPolicy::Strict,
                };
            }
            4 => {
                self.config.daily_xp_goal = (self.config.daily_xp_goal + 10).min(1000);
            }
            _ => {}
        }
    }

    pub fn settings_cycle_backward(&mut self) {
        match self.settings_selected {
            0 => {
                self.config.question_count = self.config.question_count.saturating_sub(1).max(1);
            }
            1 => self.cycle_subject(-1),
            2 => self.cycle_theme(-1),
            3 => {
                self.config.streak_policy = match self.config.streak_policy {
                    progression::StreakPolicy::Strict => progression::StreakPolicy::Lenient,
                    progression::StreakPolicy::Lenient => progression::StreakPolicy::Strict,
                };
            }
            4 => {
                self.config.daily_xp_goal =
                    self.config.daily_xp_goal.saturating_sub(10).max(10);
            }
            _ => {}
        }
    }

    fn cycle_subject(&mut self, step: i32) {
        let mut keys: Vec<&str> = vec!["any"];
        keys.extend(Subject::all().iter().map(|s| s.to_key()));
        let idx = keys
            .iter()
            .position(|&k| k == self.config.default_subject)
            .unwrap_or(0) as i32;
        let next = (idx + step).rem_euclid(keys.len() as i32) as usize;
        self.config.default_subject = keys[next].to_string();
    }

    fn cycle_theme(&mut self, step: i32) {
        let themes = Theme::available_themes();
        if themes.is_empty() {
            return;
        }
        let idx = themes
            .iter()
            .position(|t| *t == self.config.theme)
            .unwrap_or(0) as i32;
        let next = (idx + step).rem_euclid(themes.len() as i32) as usize;
        self.config.theme = themes[next].clone();
        if let Some(new_theme) = Theme::load(&self.config.theme) {
            let theme: &'static Theme = Box::leak(Box::new(new_theme));
            self.theme = theme;
            self.menu.theme = theme;
        }
    }

    /// The filter the "default subject" config maps to.
    pub fn default_filter(&self) -> SubjectFilter {
        Subject::from_key(&self.config.default_subject)
            .map(SubjectFilter::Only)
            .unwrap_or(SubjectFilter::Any)
    }
}
