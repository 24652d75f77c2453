use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

pub const DEFAULT_COLOR: &str = "#000000";

/// Palette offered by the editor toolbar.
pub const PRESET_COLORS: [&str; 9] = [
    "#000000", "#ef4444", "#f97316", "#eab308", "#22c55e", "#3b82f6", "#a855f7", "#ec4899",
    "#64748b",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    #[default]
    Sans,
    Serif,
    Mono,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Sm,
    #[default]
    Base,
    Lg,
    Xl,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteStyle {
    pub font_family: FontFamily,
    pub font_size: FontSize,
    pub color: String,
}

impl Default for NoteStyle {
    fn default() -> Self {
        Self {
            font_family: FontFamily::default(),
            font_size: FontSize::default(),
            color: DEFAULT_COLOR.to_string(),
        }
    }
}

impl NoteStyle {
    pub fn set_color(&mut self, color: &str) -> Result<()> {
        if !is_hex_color(color) {
            return Err(Error::InvalidColor(color.to_string()));
        }
        self.color = color.to_ascii_lowercase();
        Ok(())
    }

    /// Whether the text uses a custom color rather than the theme's default.
    pub fn has_custom_color(&self) -> bool {
        self.color != DEFAULT_COLOR
    }
}

fn is_hex_color(s: &str) -> bool {
    s.strip_prefix('#')
        .is_some_and(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub style: NoteStyle,
    pub updated_at: DateTime<Utc>,
}

/// Editor buffer for a note. Changes stay here until `into_note` commits them.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteDraft {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub style: NoteStyle,
    /// Whether the draft was opened from a stored note.
    pub existing: bool,
}

impl NoteDraft {
    pub fn blank() -> Self {
        Self {
            id: Uuid::new_v4(),
            title: String::new(),
            content: String::new(),
            style: NoteStyle::default(),
            existing: false,
        }
    }

    pub fn from_note(note: &Note) -> Self {
        Self {
            id: note.id,
            title: note.title.clone(),
            content: note.content.clone(),
            style: note.style.clone(),
            existing: true,
        }
    }

    pub fn can_save(&self) -> bool {
        !self.title.trim().is_empty()
    }

    pub fn into_note(self, now: DateTime<Utc>) -> Result<Note> {
        if !self.can_save() {
            return Err(Error::EmptyTitle);
        }
        Ok(Note {
            id: self.id,
            title: self.title,
            content: self.content,
            style: self.style,
            updated_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_title_cannot_be_saved() {
        let mut draft = NoteDraft::blank();
        draft.content = "body".into();
        assert!(matches!(draft.clone().into_note(Utc::now()), Err(Error::EmptyTitle)));

        draft.title = "   ".into();
        assert!(matches!(draft.clone().into_note(Utc::now()), Err(Error::EmptyTitle)));

        draft.title = "Groceries".into();
        let note = draft.clone().into_note(Utc::now()).unwrap();
        assert_eq!(note.id, draft.id);
        assert_eq!(note.content, "body");
    }

    #[test]
    fn draft_keeps_identity_of_existing_note() {
        let note = Note {
            id: Uuid::new_v4(),
            title: "Ideas".into(),
            content: "one".into(),
            style: NoteStyle::default(),
            updated_at: Utc::now(),
        };
        let mut draft = NoteDraft::from_note(&note);
        assert!(draft.existing);
        draft.content = "two".into();
        let saved = draft.into_note(Utc::now()).unwrap();
        assert_eq!(saved.id, note.id);
        assert_eq!(saved.content, "two");
    }

    #[test]
    fn color_must_be_hex() {
        let mut style = NoteStyle::default();
        assert!(!style.has_custom_color());
        style.set_color("#3B82F6").unwrap();
        assert_eq!(style.color, "#3b82f6");
        assert!(style.has_custom_color());

        for bad in ["3b82f6", "#3b82f", "#zzzzzz", "red"] {
            assert!(matches!(style.set_color(bad), Err(Error::InvalidColor(_))));
        }
        assert_eq!(style.color, "#3b82f6");
        assert!(PRESET_COLORS.iter().all(|c| is_hex_color(c)));
    }

    #[test]
    fn json_matches_stored_layout() {
        let json = r##"{
            "id": "0b7e3a3e-2b1f-4a43-8b59-5d0c0a6b2e10",
            "title": "Plan",
            "content": "Write it down",
            "style": {"fontFamily": "serif", "fontSize": "xl", "color": "#ef4444"},
            "updatedAt": "2026-10-18T10:00:00Z"
        }"##;
        let note: Note = serde_json::from_str(json).unwrap();
        assert_eq!(note.style.font_family, FontFamily::Serif);
        assert_eq!(note.style.font_size, FontSize::Xl);

        let value = serde_json::to_value(&note).unwrap();
        assert_eq!(value["style"]["fontFamily"], "serif");
        assert_eq!(value["updatedAt"], "2026-10-18T10:00:00Z");
    }
}
