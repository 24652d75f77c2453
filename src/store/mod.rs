pub mod blob;
pub mod habits;
pub mod notes;

pub use blob::{FileStore, KeyValueStore, MemoryStore};
pub use habits::HabitStore;
pub use notes::NoteStore;
