//! Weekly rollover of the study schedule's per-day accumulators.

use crate::calendar::Calendar;
use crate::models::{DAYS_PER_WEEK, ScheduleDocument, Subject};
use crate::store::Collection;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekState {
    /// Stored week matches the calendar's current week.
    Current,
    /// Stored week is older (or otherwise different).
    Stale,
}

pub fn week_state(document: &ScheduleDocument, calendar: &dyn Calendar) -> WeekState {
    if document.current_week == calendar.current_week() {
        WeekState::Current
    } else {
        WeekState::Stale
    }
}

/// First-run document: already `Current`, every accumulator at zero.
pub fn fresh_document(calendar: &dyn Calendar, subjects: Vec<Subject>) -> ScheduleDocument {
    let today = calendar.today();
    let mut document = ScheduleDocument {
        subjects: Collection::from_records(subjects),
        week_dates: calendar.week_dates(today),
        current_week: calendar.week_id(today),
    };
    zero_hours(&mut document);
    document
}

/// Moves a stale document into the current week. Subjects keep their id,
/// name, grade and progress; hours and date labels are reset. Returns
/// whether anything changed, so a second call in the same week is a no-op.
pub fn roll_over(document: &mut ScheduleDocument, calendar: &dyn Calendar) -> bool {
    let today = calendar.today();
    let week = calendar.week_id(today);
    if document.current_week == week {
        return false;
    }

    info!(from = %document.current_week, to = %week, "study week rolled over; clearing hours");
    document.week_dates = calendar.week_dates(today);
    document.current_week = week;
    zero_hours(document);
    true
}

/// Repairs documents whose day arrays drifted from seven entries.
pub fn normalize(document: &mut ScheduleDocument) -> bool {
    let mut changed = false;
    if document.week_dates.len() != DAYS_PER_WEEK {
        document.week_dates.resize(DAYS_PER_WEEK, String::new());
        changed = true;
    }
    for subject in document.subjects.iter_mut() {
        if subject.weekly_hours.len() != DAYS_PER_WEEK {
            subject.weekly_hours.resize(DAYS_PER_WEEK, 0.0);
            changed = true;
        }
    }
    changed
}

fn zero_hours(document: &mut ScheduleDocument) {
    for subject in document.subjects.iter_mut() {
        subject.weekly_hours = vec![0.0; DAYS_PER_WEEK];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct WeekNumber(&'static str);

    impl Calendar for WeekNumber {
        fn today(&self) -> chrono::NaiveDate {
            chrono::NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
        }

        fn week_id(&self, _date: chrono::NaiveDate) -> String {
            self.0.to_string()
        }

        fn week_dates(&self, _date: chrono::NaiveDate) -> Vec<String> {
            (1..=7).map(|day| format!("{}-{day}", self.0)).collect()
        }
    }

    fn stored(week: &str) -> ScheduleDocument {
        ScheduleDocument {
            subjects: Collection::from_records(vec![Subject {
                id: 1,
                name: "ریاضی".to_string(),
                weekly_hours: vec![2.0, 1.5, 2.0, 1.0, 2.0, 0.0, 1.5],
                grade: 18.0,
                progress: 75.0,
            }]),
            week_dates: vec!["old".to_string(); 7],
            current_week: week.to_string(),
        }
    }

    #[test]
    fn stale_week_is_reset() {
        let calendar = WeekNumber("11");
        let mut document = stored("10");
        assert_eq!(week_state(&document, &calendar), WeekState::Stale);

        assert!(roll_over(&mut document, &calendar));
        assert_eq!(week_state(&document, &calendar), WeekState::Current);
        assert_eq!(document.current_week, "11");
        assert_eq!(document.week_dates[0], "11-1");
        let subject = &document.subjects.records()[0];
        assert_eq!(subject.weekly_hours, vec![0.0; 7]);
        assert_eq!(subject.grade, 18.0);
        assert_eq!(subject.progress, 75.0);
        assert_eq!(subject.name, "ریاضی");
    }

    #[test]
    fn rollover_is_idempotent_within_a_week() {
        let calendar = WeekNumber("11");
        let mut document = stored("10");
        roll_over(&mut document, &calendar);
        let after_first = document.clone();
        assert!(!roll_over(&mut document, &calendar));
        assert_eq!(document, after_first);
    }

    #[test]
    fn current_week_keeps_hours() {
        let calendar = WeekNumber("10");
        let mut document = stored("10");
        assert!(!roll_over(&mut document, &calendar));
        assert_eq!(document.subjects.records()[0].total_hours(), 10.0);
    }

    #[test]
    fn fresh_document_starts_current() {
        let calendar = WeekNumber("11");
        let document = fresh_document(&calendar, stored("10").subjects.records().to_vec());
        assert_eq!(week_state(&document, &calendar), WeekState::Current);
        assert_eq!(document.subjects.records()[0].weekly_hours, vec![0.0; 7]);
    }

    #[test]
    fn normalize_pads_short_arrays() {
        let mut document = stored("10");
        document.week_dates.truncate(3);
        document.subjects.iter_mut().for_each(|subject| subject.weekly_hours.truncate(2));
        assert!(normalize(&mut document));
        assert_eq!(document.week_dates.len(), 7);
        assert_eq!(document.subjects.records()[0].weekly_hours, vec![2.0, 1.5, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert!(!normalize(&mut document));
    }
}
