pub mod habit;
pub mod note;
pub mod theme;
