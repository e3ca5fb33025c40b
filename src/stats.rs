use crate::models::{Book, ExerciseSchedule, ScheduleDocument, Shelf, Subject};
use crate::store::Record;
use serde::Serialize;

/// Completion figures for any collection.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionStats {
    pub total: usize,
    pub completed: usize,
    pub completion_rate: f64,
}

impl CollectionStats {
    pub fn from_records<R: Record>(records: &[R]) -> Self {
        let total = records.len();
        let completed = records.iter().filter(|record| record.is_completed()).count();
        let completion_rate = if total == 0 {
            0.0
        } else {
            completed as f64 / total as f64
        };
        Self {
            total,
            completed,
            completion_rate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectHours {
    pub id: u64,
    pub name: String,
    pub total_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyStats {
    pub subject_count: usize,
    pub weekly_total_hours: f64,
    /// Hours per weekday summed across subjects, Saturday first.
    pub daily_totals: Vec<f64>,
    pub average_grade: f64,
    pub per_subject: Vec<SubjectHours>,
}

pub fn build_study_stats(document: &ScheduleDocument) -> StudyStats {
    let subjects = document.subjects.records();
    let mut daily_totals = vec![0.0; document.week_dates.len().max(crate::models::DAYS_PER_WEEK)];
    for subject in subjects {
        for (total, hours) in daily_totals.iter_mut().zip(&subject.weekly_hours) {
            *total += hours;
        }
    }

    let per_subject: Vec<SubjectHours> = subjects
        .iter()
        .map(|subject: &Subject| SubjectHours {
            id: subject.id,
            name: subject.name.clone(),
            total_hours: subject.total_hours(),
        })
        .collect();

    let average_grade = if subjects.is_empty() {
        0.0
    } else {
        subjects.iter().map(|subject| subject.grade).sum::<f64>() / subjects.len() as f64
    };

    StudyStats {
        subject_count: subjects.len(),
        weekly_total_hours: per_subject.iter().map(|subject| subject.total_hours).sum(),
        daily_totals,
        average_grade,
        per_subject,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryStats {
    pub reading: usize,
    pub completed: usize,
    pub to_read: usize,
    /// Mean progress of books on the reading shelf, 0 when none.
    pub average_progress: f64,
}

pub fn build_library_stats(books: &[Book]) -> LibraryStats {
    let on_shelf = |shelf: Shelf| books.iter().filter(|book| book.shelf == shelf).count();
    let progress: Vec<f64> = books
        .iter()
        .filter(|book| book.shelf == Shelf::Reading)
        .map(|book| book.progress.unwrap_or(0.0))
        .collect();
    let average_progress = if progress.is_empty() {
        0.0
    } else {
        progress.iter().sum::<f64>() / progress.len() as f64
    };

    LibraryStats {
        reading: on_shelf(Shelf::Reading),
        completed: on_shelf(Shelf::Completed),
        to_read: on_shelf(Shelf::ToRead),
        average_progress,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseStats {
    pub total_exercises: usize,
    pub training_days: usize,
    pub rest_days: usize,
}

/// A day with no entries, or only the rest marker, counts as rest.
pub fn build_exercise_stats(schedule: &ExerciseSchedule) -> ExerciseStats {
    const REST: &str = "استراحت";

    let mut total_exercises = 0;
    let mut training_days = 0;
    for entries in schedule.days.values() {
        let exercises = entries.iter().filter(|entry| entry.trim() != REST).count();
        total_exercises += exercises;
        if exercises > 0 {
            training_days += 1;
        }
    }

    ExerciseStats {
        total_exercises,
        training_days,
        rest_days: crate::models::DAYS_PER_WEEK.saturating_sub(training_days),
    }
}

/// Headline counts for the dashboard cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub family_tasks: usize,
    pub sports_activities: usize,
    pub reading_hours: f64,
    pub coding_projects: usize,
    pub responsibilities: usize,
    pub academic_tasks: usize,
    pub books_in_progress: usize,
    pub unread_notifications: usize,
}
