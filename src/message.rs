use chrono::NaiveDate;
use uuid::Uuid;

use crate::ai::AiService;
use crate::core::note::{FontFamily, FontSize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Tracker,
    Notes,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HabitKindChoice {
    #[default]
    Daily,
    MonthlyGoal,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    // Navigation
    SetView(ViewMode),
    ToggleTheme,

    // Habit form
    OpenHabitForm,
    CloseHabitForm,
    HabitTitleChanged(String),
    HabitKindSelected(HabitKindChoice),
    HabitTargetChanged(u32),
    SubmitHabit,

    // Habits
    ToggleHabit(Uuid, NaiveDate),
    RequestDeleteHabit(Uuid),
    RequestMotivation(Uuid),
    MotivationReady(Uuid, String),

    // Note editor
    NewNote,
    OpenNote(Uuid),
    CloseNote,
    DraftTitleChanged(String),
    DraftContentChanged(String),
    SetFontFamily(FontFamily),
    SetFontSize(FontSize),
    SetNoteColor(String),
    RefineInstructionChanged(String),
    RequestRefine,
    RefineReady(Uuid, String),
    SaveNote,
    RequestDeleteNote(Uuid),

    // Destructive-action confirmation
    ConfirmDelete,
    CancelDelete,
}

/// Deferred AI work produced by `Spark::update`. The caller runs it and feeds the
/// resulting message back in.
#[derive(Debug, Clone, PartialEq)]
pub enum AiRequest {
    Motivation {
        habit_id: Uuid,
        title: String,
        streak: u32,
    },
    Refine {
        note_id: Uuid,
        content: String,
        instruction: String,
    },
}

impl AiRequest {
    pub async fn run(self, ai: &AiService) -> Message {
        match self {
            Self::Motivation {
                habit_id,
                title,
                streak,
            } => Message::MotivationReady(habit_id, ai.habit_motivation(&title, streak).await),
            Self::Refine {
                note_id,
                content,
                instruction,
            } => Message::RefineReady(note_id, ai.refine_note(&content, &instruction).await),
        }
    }
}
