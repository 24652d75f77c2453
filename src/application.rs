use std::collections::HashMap;

use chrono::{DateTime, Local, NaiveDate, Utc};
use uuid::Uuid;

use crate::core::habit::{DEFAULT_MONTHLY_TARGET, DayMark, Habit, HabitKind, HabitStats};
use crate::core::note::NoteDraft;
use crate::config::SparkConfig;
use crate::core::theme::Theme;
use crate::message::{AiRequest, HabitKindChoice, Message, ViewMode};
use crate::store::blob::THEME_KEY;
use crate::store::{FileStore, HabitStore, KeyValueStore, NoteStore};
use crate::{Error, Result};

/// Days shown in the flame row of a daily habit card.
pub const RECENT_DAYS: u64 = 7;
pub const MAX_MONTHLY_TARGET: u32 = 31;

/// Buffered state of the "new habit" form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitForm {
    pub title: String,
    pub kind: HabitKindChoice,
    /// Completions per month, 1..=31. Only used for monthly goals.
    pub target: u32,
}

impl Default for HabitForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            kind: HabitKindChoice::Daily,
            target: DEFAULT_MONTHLY_TARGET,
        }
    }
}

impl HabitForm {
    pub fn to_habit(&self) -> Result<Habit> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(Error::EmptyTitle);
        }
        let kind = match self.kind {
            HabitKindChoice::Daily => HabitKind::Daily,
            HabitKindChoice::MonthlyGoal => HabitKind::MonthlyGoal {
                target: self.target,
            },
        };
        Ok(Habit::new(title, kind))
    }
}

/// A destructive action waiting for the user to confirm or cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingDelete {
    Habit(Uuid),
    Note(Uuid),
}

/// Everything a frontend needs to draw one habit card.
#[derive(Debug, Clone, PartialEq)]
pub struct HabitCard<'a> {
    pub habit: &'a Habit,
    pub stats: HabitStats,
    pub done_today: bool,
    /// Oldest first; empty for monthly goals.
    pub recent: Vec<DayMark>,
    pub best_streak: u32,
    pub motivation: Option<&'a str>,
    pub loading_motivation: bool,
}

/// Top-level application state. Owns both collections and writes them back to
/// the blob store after every mutation.
pub struct Spark {
    store: Box<dyn KeyValueStore>,
    habits: HabitStore,
    notes: NoteStore,
    theme: Theme,
    view: ViewMode,

    habit_form: Option<HabitForm>,

    draft: Option<NoteDraft>,
    refine_instruction: String,
    refining: bool,

    pending_delete: Option<PendingDelete>,

    motivations: HashMap<Uuid, String>,
    /// Motivation requests still in flight, per habit.
    motivation_requests: HashMap<Uuid, u32>,
}

impl Spark {
    /// Open the file-backed store in the configured data directory and load from it.
    pub fn open(config: &SparkConfig, system_prefers_dark: bool) -> Result<Self> {
        config.ensure_dirs()?;
        let store = FileStore::new(&config.data_directory);
        log::info!("Opening data directory {}", store.dir().display());
        Ok(Self::load(Box::new(store), system_prefers_dark))
    }

    /// Load persisted state. Unreadable collections start empty.
    pub fn load(store: Box<dyn KeyValueStore>, system_prefers_dark: bool) -> Self {
        let habits = HabitStore::load(&*store).unwrap_or_else(|e| {
            log::warn!("Failed to load habits, starting empty: {}", e);
            HabitStore::new()
        });
        let notes = NoteStore::load(&*store).unwrap_or_else(|e| {
            log::warn!("Failed to load notes, starting empty: {}", e);
            NoteStore::new()
        });
        let stored_theme = store.get(THEME_KEY).unwrap_or_else(|e| {
            log::warn!("Failed to read theme preference: {}", e);
            None
        });
        let theme = Theme::resolve(stored_theme.as_deref(), system_prefers_dark);

        log::info!(
            "Loaded {} habits and {} notes ({} theme)",
            habits.len(),
            notes.len(),
            theme.as_str()
        );

        Self {
            store,
            habits,
            notes,
            theme,
            view: ViewMode::default(),
            habit_form: None,
            draft: None,
            refine_instruction: String::new(),
            refining: false,
            pending_delete: None,
            motivations: HashMap::new(),
            motivation_requests: HashMap::new(),
        }
    }

    pub fn update(&mut self, message: Message) -> Option<AiRequest> {
        self.update_at(message, Local::now())
    }

    /// Apply `message` as of `now`. Returns AI work for the caller to run, if any.
    pub fn update_at(&mut self, message: Message, now: DateTime<Local>) -> Option<AiRequest> {
        let today = now.date_naive();
        match message {
            Message::SetView(view) => {
                if view == ViewMode::Notes {
                    self.close_draft();
                }
                self.view = view;
            }

            Message::ToggleTheme => {
                self.theme = self.theme.toggled();
                if let Err(e) = self.store.set(THEME_KEY, self.theme.as_str()) {
                    log::error!("Failed to save theme: {}", e);
                }
            }

            Message::OpenHabitForm => {
                self.habit_form = Some(HabitForm::default());
            }

            Message::CloseHabitForm => {
                self.habit_form = None;
            }

            Message::HabitTitleChanged(value) => {
                if let Some(form) = self.habit_form.as_mut() {
                    form.title = value;
                }
            }

            Message::HabitKindSelected(kind) => {
                if let Some(form) = self.habit_form.as_mut() {
                    form.kind = kind;
                }
            }

            Message::HabitTargetChanged(target) => {
                if let Some(form) = self.habit_form.as_mut() {
                    form.target = target.clamp(1, MAX_MONTHLY_TARGET);
                }
            }

            Message::SubmitHabit => {
                let Some(form) = self.habit_form.as_ref() else {
                    return None;
                };
                match form.to_habit() {
                    Ok(habit) => {
                        log::info!("Created habit {} ({})", habit.title, habit.id);
                        self.habits.add(habit);
                        self.habit_form = None;
                        self.save_habits();
                    }
                    Err(e) => log::debug!("Habit form rejected: {}", e),
                }
            }

            Message::ToggleHabit(id, date) => {
                if self.habits.toggle(id, date).is_some() {
                    self.save_habits();
                }
            }

            Message::RequestDeleteHabit(id) => {
                if self.habits.get(id).is_some() {
                    self.pending_delete = Some(PendingDelete::Habit(id));
                }
            }

            Message::RequestMotivation(id) => {
                let habit = self.habits.get(id)?;
                let request = AiRequest::Motivation {
                    habit_id: id,
                    title: habit.title.clone(),
                    streak: habit.stats(today).numeric(),
                };
                *self.motivation_requests.entry(id).or_insert(0) += 1;
                return Some(request);
            }

            Message::MotivationReady(id, text) => {
                if let Some(count) = self.motivation_requests.get_mut(&id) {
                    *count = count.saturating_sub(1);
                    if *count == 0 {
                        self.motivation_requests.remove(&id);
                    }
                }
                if self.habits.get(id).is_some() {
                    self.motivations.insert(id, text);
                }
            }

            Message::NewNote => {
                self.view = ViewMode::Notes;
                self.open_draft(NoteDraft::blank());
            }

            Message::OpenNote(id) => {
                if let Some(note) = self.notes.get(id) {
                    let draft = NoteDraft::from_note(note);
                    self.view = ViewMode::Notes;
                    self.open_draft(draft);
                }
            }

            Message::CloseNote => {
                self.close_draft();
            }

            Message::DraftTitleChanged(value) => {
                if let Some(draft) = self.draft.as_mut() {
                    draft.title = value;
                }
            }

            Message::DraftContentChanged(value) => {
                if let Some(draft) = self.draft.as_mut() {
                    draft.content = value;
                }
            }

            Message::SetFontFamily(family) => {
                if let Some(draft) = self.draft.as_mut() {
                    draft.style.font_family = family;
                }
            }

            Message::SetFontSize(size) => {
                if let Some(draft) = self.draft.as_mut() {
                    draft.style.font_size = size;
                }
            }

            Message::SetNoteColor(color) => {
                if let Some(draft) = self.draft.as_mut() {
                    if let Err(e) = draft.style.set_color(&color) {
                        log::warn!("{}", e);
                    }
                }
            }

            Message::RefineInstructionChanged(value) => {
                self.refine_instruction = value;
            }

            Message::RequestRefine => {
                if self.refining || self.refine_instruction.trim().is_empty() {
                    return None;
                }
                let draft = self.draft.as_ref()?;
                let request = AiRequest::Refine {
                    note_id: draft.id,
                    content: draft.content.clone(),
                    instruction: self.refine_instruction.clone(),
                };
                self.refining = true;
                return Some(request);
            }

            Message::RefineReady(id, text) => {
                self.refining = false;
                match self.draft.as_mut() {
                    Some(draft) if draft.id == id => {
                        draft.content = text;
                        self.refine_instruction.clear();
                    }
                    _ => log::debug!("Dropping refined text for closed note {}", id),
                }
            }

            Message::SaveNote => {
                let Some(draft) = self.draft.take() else {
                    return None;
                };
                match draft.clone().into_note(now.with_timezone(&Utc)) {
                    Ok(note) => {
                        self.notes.upsert(note);
                        self.close_draft();
                        self.save_notes();
                    }
                    Err(e) => {
                        log::debug!("Note not saved: {}", e);
                        self.draft = Some(draft);
                    }
                }
            }

            Message::RequestDeleteNote(id) => {
                if self.notes.get(id).is_some() {
                    self.pending_delete = Some(PendingDelete::Note(id));
                }
            }

            Message::ConfirmDelete => match self.pending_delete.take() {
                Some(PendingDelete::Habit(id)) => {
                    if let Some(habit) = self.habits.remove(id) {
                        log::info!("Deleted habit {} ({})", habit.title, id);
                        self.motivations.remove(&id);
                        self.motivation_requests.remove(&id);
                        self.save_habits();
                    }
                }
                Some(PendingDelete::Note(id)) => {
                    if self.notes.remove(id).is_some() {
                        log::info!("Deleted note {}", id);
                        if self.draft.as_ref().is_some_and(|d| d.id == id) {
                            self.close_draft();
                        }
                        self.save_notes();
                    }
                }
                None => {}
            },

            Message::CancelDelete => {
                self.pending_delete = None;
            }
        }
        None
    }

    /// Card projections for the tracker view, recomputed from history on each call.
    pub fn habit_cards(&self, today: NaiveDate) -> Vec<HabitCard<'_>> {
        self.habits
            .iter()
            .map(|habit| HabitCard {
                habit,
                stats: habit.stats(today),
                done_today: habit.is_done(today),
                recent: match habit.kind {
                    HabitKind::Daily => habit.recent_days(today, RECENT_DAYS),
                    HabitKind::MonthlyGoal { .. } => Vec::new(),
                },
                best_streak: habit.best_streak(),
                motivation: self.motivations.get(&habit.id).map(String::as_str),
                loading_motivation: self.motivation_requests.contains_key(&habit.id),
            })
            .collect()
    }

    pub fn habits(&self) -> &HabitStore {
        &self.habits
    }

    pub fn notes(&self) -> &NoteStore {
        &self.notes
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn habit_form(&self) -> Option<&HabitForm> {
        self.habit_form.as_ref()
    }

    pub fn draft(&self) -> Option<&NoteDraft> {
        self.draft.as_ref()
    }

    pub fn refine_instruction(&self) -> &str {
        &self.refine_instruction
    }

    pub fn is_refining(&self) -> bool {
        self.refining
    }

    pub fn pending_delete(&self) -> Option<PendingDelete> {
        self.pending_delete
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        &*self.store
    }

    fn open_draft(&mut self, draft: NoteDraft) {
        self.draft = Some(draft);
        self.refine_instruction.clear();
    }

    fn close_draft(&mut self) {
        self.draft = None;
        self.refine_instruction.clear();
    }

    fn save_habits(&mut self) {
        if let Err(e) = self.habits.save(&mut *self.store) {
            log::error!("Failed to save habits: {}", e);
        }
    }

    fn save_notes(&mut self) {
        if let Err(e) = self.notes.save(&mut *self.store) {
            log::error!("Failed to save notes: {}", e);
        }
    }
}
