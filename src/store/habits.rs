use chrono::NaiveDate;
use uuid::Uuid;

use super::blob::{self, HABITS_KEY, KeyValueStore};
use crate::Result;
use crate::core::habit::Habit;

/// Ordered collection of habits, in creation order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HabitStore {
    habits: Vec<Habit>,
}

impl HabitStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(store: &dyn KeyValueStore) -> Result<Self> {
        Ok(Self {
            habits: blob::load_list(store, HABITS_KEY)?,
        })
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<()> {
        blob::save_list(store, HABITS_KEY, &self.habits)
    }

    pub fn add(&mut self, habit: Habit) {
        self.habits.push(habit);
    }

    /// Toggle `date` for the habit `id`. `None` when no such habit exists.
    pub fn toggle(&mut self, id: Uuid, date: NaiveDate) -> Option<bool> {
        self.habits
            .iter_mut()
            .find(|h| h.id == id)
            .map(|h| h.toggle(date))
    }

    pub fn remove(&mut self, id: Uuid) -> Option<Habit> {
        let idx = self.habits.iter().position(|h| h.id == id)?;
        Some(self.habits.remove(idx))
    }

    pub fn get(&self, id: Uuid) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Habit> {
        self.habits.iter()
    }

    pub fn len(&self) -> usize {
        self.habits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }
}
