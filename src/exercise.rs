use crate::errors::StoreError;
use crate::models::{ExerciseSchedule, Weekday, datasets};
use crate::stats::{ExerciseStats, build_exercise_stats};
use crate::storage::Persistence;
use crate::store::{DocumentStore, Mutation};
use crate::validation::Checks;

/// Weekly exercise plan: one bucket of free-text entries per weekday.
pub struct ExercisePlanner {
    store: DocumentStore<ExerciseSchedule>,
}

impl ExercisePlanner {
    pub fn open(persistence: Persistence) -> Self {
        Self::open_or(persistence, ExerciseSchedule::default)
    }

    pub fn open_or(persistence: Persistence, default: impl FnOnce() -> ExerciseSchedule) -> Self {
        Self {
            store: DocumentStore::open_or(persistence, datasets::EXERCISE_SCHEDULE, default),
        }
    }

    pub fn schedule(&self) -> &ExerciseSchedule {
        self.store.get()
    }

    pub fn day(&self, day: Weekday) -> &[String] {
        self.schedule().days.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn stats(&self) -> ExerciseStats {
        build_exercise_stats(self.schedule())
    }

    /// Replaces a whole day; blank entries are dropped.
    pub fn set_day(&mut self, day: Weekday, entries: Vec<String>) -> Mutation<Vec<String>> {
        let entries: Vec<String> = entries
            .into_iter()
            .map(|entry| entry.trim().to_string())
            .filter(|entry| !entry.is_empty())
            .collect();
        self.store.apply(|schedule| {
            schedule.days.insert(day, entries.clone());
            entries
        })
    }

    pub fn add_entry(&mut self, day: Weekday, text: &str) -> Result<Mutation<Vec<String>>, StoreError> {
        Checks::new().required("text", text).finish()?;
        let text = text.trim().to_string();
        self.store.update(|schedule| {
            let entries = schedule.days.entry(day).or_default();
            entries.push(text);
            Ok(entries.clone())
        })
    }

    pub fn remove_entry(&mut self, day: Weekday, index: usize) -> Result<Mutation<String>, StoreError> {
        self.store.update(|schedule| {
            let entries = schedule.days.entry(day).or_default();
            if index >= entries.len() {
                return Err(StoreError::EntryNotFound {
                    bucket: day.to_string(),
                    index,
                });
            }
            Ok(entries.remove(index))
        })
    }
}
