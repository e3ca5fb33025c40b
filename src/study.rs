use crate::calendar::Calendar;
use crate::errors::{PersistenceError, StoreError};
use crate::models::{
    DAYS_PER_WEEK, MAX_DAILY_HOURS, RecordId, ScheduleDocument, Subject, SubjectDraft, datasets,
};
use crate::reset::{self, WeekState};
use crate::stats::{StudyStats, build_study_stats};
use crate::storage::Persistence;
use crate::store::Mutation;
use crate::validation::Checks;
use std::sync::Arc;
use tracing::{debug, info};

/// Weekly study schedule: subjects with per-day hours that reset every week.
pub struct StudyTracker {
    persistence: Persistence,
    calendar: Arc<dyn Calendar>,
    document: ScheduleDocument,
}

impl StudyTracker {
    pub fn open(persistence: Persistence, calendar: Arc<dyn Calendar>) -> Self {
        Self::open_or(persistence, calendar, Vec::new)
    }

    /// `default` supplies first-run subjects; their hours start at zero.
    pub fn open_or(
        persistence: Persistence,
        calendar: Arc<dyn Calendar>,
        default: impl FnOnce() -> Vec<Subject>,
    ) -> Self {
        let mut tracker = match persistence.load::<ScheduleDocument>(datasets::STUDY_SCHEDULE) {
            Some(document) => Self {
                persistence,
                calendar,
                document,
            },
            None => {
                info!("starting a new study schedule");
                let document = reset::fresh_document(calendar.as_ref(), default());
                return Self {
                    persistence,
                    calendar,
                    document,
                };
            }
        };

        let repaired = reset::normalize(&mut tracker.document);
        let rolled = reset::roll_over(&mut tracker.document, tracker.calendar.as_ref());
        if repaired || rolled {
            tracker.save();
        }
        tracker
    }

    /// Applies the weekly reset if the week changed since the last access.
    pub fn refresh(&mut self) -> Mutation<WeekState> {
        if reset::roll_over(&mut self.document, self.calendar.as_ref()) {
            let warning = self.save();
            Mutation {
                value: WeekState::Stale,
                warning,
            }
        } else {
            Mutation {
                value: WeekState::Current,
                warning: None,
            }
        }
    }

    /// Reads go through [`refresh`](Self::refresh) so a new week never
    /// shows last week's hours.
    pub fn document(&mut self) -> &ScheduleDocument {
        self.refresh();
        &self.document
    }

    pub fn subjects(&mut self) -> Vec<Subject> {
        self.document().subjects.records().to_vec()
    }

    pub fn stats(&mut self) -> StudyStats {
        build_study_stats(self.document())
    }

    pub fn add_subject(&mut self, draft: SubjectDraft) -> Result<Mutation<Subject>, StoreError> {
        self.mutate(|document| Ok(document.subjects.insert(draft)?.clone()))
    }

    pub fn update_subject(&mut self, id: RecordId, draft: SubjectDraft) -> Result<Mutation<Subject>, StoreError> {
        self.mutate(|document| Ok(document.subjects.replace(id, draft)?.clone()))
    }

    pub fn remove_subject(&mut self, id: RecordId) -> Result<Mutation<Subject>, StoreError> {
        self.mutate(|document| document.subjects.remove(id))
    }

    /// Sets the hours studied on one day (0 = Saturday) of the current week.
    pub fn log_hours(&mut self, id: RecordId, day: usize, hours: f64) -> Result<Mutation<Subject>, StoreError> {
        self.mutate(|document| {
            let subject = document.subjects.get_mut(id)?;
            Checks::new()
                .range("day", day as f64, 0.0, (DAYS_PER_WEEK - 1) as f64)
                .range("hours", hours, 0.0, MAX_DAILY_HOURS)
                .finish()?;
            subject.weekly_hours[day] = hours;
            Ok(subject.clone())
        })
    }

    /// Brings the week up to date (saving the rollover on its own), then
    /// runs `edit` on a copy and writes the result. A failed edit leaves the
    /// subjects as they were.
    fn mutate<T>(
        &mut self,
        edit: impl FnOnce(&mut ScheduleDocument) -> Result<T, StoreError>,
    ) -> Result<Mutation<T>, StoreError> {
        let rolled = self.refresh();
        let mut next = self.document.clone();
        let value = edit(&mut next)?;
        self.document = next;
        debug!(subjects = self.document.subjects.records().len(), "study schedule changed");
        let warning = self.save().or(rolled.warning);
        Ok(Mutation { value, warning })
    }

    fn save(&self) -> Option<PersistenceError> {
        self.persistence
            .save(datasets::STUDY_SCHEDULE, &self.document)
            .err()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::FixedCalendar;
    use crate::storage::MemoryStore;
    use chrono::NaiveDate;

    fn calendar(y: i32, m: u32, d: u32) -> Arc<dyn Calendar> {
        Arc::new(FixedCalendar::new(NaiveDate::from_ymd_opt(y, m, d).unwrap()))
    }

    fn math() -> SubjectDraft {
        SubjectDraft {
            name: "ریاضی".to_string(),
            grade: 18.0,
            progress: 75.0,
            weekly_hours: None,
        }
    }

    #[test]
    fn first_run_is_current_without_a_write() {
        let memory = MemoryStore::new();
        let mut tracker = StudyTracker::open(Persistence::new(memory.clone()), calendar(2026, 10, 18));
        assert_eq!(tracker.document().current_week, "1405/07/25");
        assert_eq!(tracker.refresh().value, WeekState::Current);
        assert_eq!(memory.write_count(datasets::STUDY_SCHEDULE), 0);
    }

    #[test]
    fn logging_hours_updates_stats() {
        let memory = MemoryStore::new();
        let mut tracker = StudyTracker::open(Persistence::new(memory.clone()), calendar(2026, 10, 18));
        let subject = tracker.add_subject(math()).unwrap().value;
        assert_eq!(subject.weekly_hours, vec![0.0; 7]);

        tracker.log_hours(subject.id, 1, 2.5).unwrap();
        tracker.log_hours(subject.id, 6, 1.0).unwrap();
        assert_eq!(tracker.stats().weekly_total_hours, 3.5);
        assert_eq!(memory.write_count(datasets::STUDY_SCHEDULE), 3);
    }

    #[test]
    fn invalid_hours_are_rejected_without_change() {
        let memory = MemoryStore::new();
        let mut tracker = StudyTracker::open(Persistence::new(memory.clone()), calendar(2026, 10, 18));
        let subject = tracker.add_subject(math()).unwrap().value;

        assert_eq!(tracker.log_hours(subject.id, 7, 1.0).unwrap_err().to_string(), "validation failed: day must be between 0 and 6");
        assert!(tracker.log_hours(subject.id, 0, 25.0).is_err());
        assert_eq!(tracker.log_hours(42, 0, 1.0).unwrap_err(), StoreError::NotFound(42));
        assert_eq!(tracker.subjects()[0].weekly_hours, vec![0.0; 7]);
        assert_eq!(memory.write_count(datasets::STUDY_SCHEDULE), 1);
    }

    #[test]
    fn reopening_in_a_later_week_clears_hours() {
        let memory = MemoryStore::new();
        let subject_id = {
            let mut tracker = StudyTracker::open(Persistence::new(memory.clone()), calendar(2026, 10, 18));
            let id = tracker.add_subject(math()).unwrap().value.id;
            tracker.log_hours(id, 0, 3.0).unwrap();
            id
        };

        let mut tracker = StudyTracker::open(Persistence::new(memory.clone()), calendar(2026, 10, 25));
        assert_eq!(tracker.document().current_week, "1405/08/02");
        let subject = &tracker.subjects()[0];
        assert_eq!(subject.id, subject_id);
        assert_eq!(subject.weekly_hours, vec![0.0; 7]);
        assert_eq!(subject.grade, 18.0);
        assert_eq!(memory.write_count(datasets::STUDY_SCHEDULE), 3);
    }

    #[test]
    fn edit_without_hours_keeps_logged_hours() {
        let mut tracker = StudyTracker::open(Persistence::new(MemoryStore::new()), calendar(2026, 10, 18));
        let id = tracker.add_subject(math()).unwrap().value.id;
        tracker.log_hours(id, 2, 1.5).unwrap();
        let edited = tracker
            .update_subject(
                id,
                SubjectDraft {
                    grade: 19.0,
                    ..math()
                },
            )
            .unwrap()
            .value;
        assert_eq!(edited.grade, 19.0);
        assert_eq!(edited.weekly_hours[2], 1.5);
    }

    fn logged_week(memory: &MemoryStore) -> (Arc<FixedCalendar>, StudyTracker, RecordId) {
        let clock = Arc::new(FixedCalendar::new(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()));
        let mut tracker = StudyTracker::open(Persistence::new(memory.clone()), clock.clone());
        let id = tracker.add_subject(math()).unwrap().value.id;
        tracker.log_hours(id, 0, 3.0).unwrap();
        (clock, tracker, id)
    }

    #[test]
    fn reads_after_week_change_show_cleared_hours() {
        let memory = MemoryStore::new();
        let (clock, mut tracker, _) = logged_week(&memory);
        assert_eq!(tracker.stats().weekly_total_hours, 3.0);

        clock.set_today(NaiveDate::from_ymd_opt(2026, 10, 25).unwrap());
        assert_eq!(tracker.stats().weekly_total_hours, 0.0);
        assert_eq!(tracker.document().current_week, "1405/08/02");
        assert_eq!(memory.write_count(datasets::STUDY_SCHEDULE), 3);
    }

    #[test]
    fn rejected_edit_still_persists_the_rollover() {
        let memory = MemoryStore::new();
        let (clock, mut tracker, id) = logged_week(&memory);

        clock.set_today(NaiveDate::from_ymd_opt(2026, 10, 25).unwrap());
        assert!(tracker.log_hours(id, 0, 99.0).is_err());

        let stored: ScheduleDocument =
            serde_json::from_str(&memory.raw(datasets::STUDY_SCHEDULE).unwrap()).unwrap();
        assert_eq!(stored.current_week, "1405/08/02");
        assert_eq!(stored.subjects.records()[0].weekly_hours, vec![0.0; 7]);
        assert_eq!(memory.write_count(datasets::STUDY_SCHEDULE), 3);
    }
}
