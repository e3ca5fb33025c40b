use crate::calendar::Calendar;
use crate::exercise::ExercisePlanner;
use crate::models::{
    Book, Course, FamilyTask, FutureProject, Profile, Project, ResponsibilityTask, Shelf, TodoItem,
    datasets,
};
use crate::notifications::{NotificationCenter, NotificationSource, SourceError};
use crate::samples;
use crate::stats::DashboardSummary;
use crate::storage::Persistence;
use crate::store::{DocumentStore, EntityStore, Record};
use crate::study::StudyTracker;
use std::sync::Arc;
use tokio::sync::{Mutex, watch};

/// Every tracker page's store.
pub struct Trackers {
    pub family_tasks: EntityStore<FamilyTask>,
    pub responsibility_tasks: EntityStore<ResponsibilityTask>,
    pub books: EntityStore<Book>,
    pub library_todos: EntityStore<TodoItem>,
    pub exercise: ExercisePlanner,
    pub exercise_todos: EntityStore<TodoItem>,
    pub courses: EntityStore<Course>,
    pub projects: EntityStore<Project>,
    pub future_projects: EntityStore<FutureProject>,
    pub study: StudyTracker,
    pub notifications: NotificationCenter,
    pub profile: DocumentStore<Profile>,
}

fn first_run<T>(seed: bool, samples: fn() -> T) -> impl FnOnce() -> T
where
    T: Default,
{
    move || if seed { samples() } else { T::default() }
}

impl Trackers {
    pub fn open(persistence: &Persistence, calendar: Arc<dyn Calendar>, seed: bool) -> Self {
        let p = || persistence.clone();
        Self {
            family_tasks: EntityStore::open_or(p(), datasets::FAMILY_TASKS, first_run(seed, samples::family_tasks)),
            responsibility_tasks: EntityStore::open_or(
                p(),
                datasets::RESPONSIBILITY_TASKS,
                first_run(seed, samples::responsibility_tasks),
            ),
            books: EntityStore::open_or(p(), datasets::LIBRARY_BOOKS, first_run(seed, samples::library_books)),
            library_todos: EntityStore::open_or(p(), datasets::LIBRARY_TODOS, first_run(seed, samples::library_todos)),
            exercise: ExercisePlanner::open_or(p(), first_run(seed, samples::exercise_schedule)),
            exercise_todos: EntityStore::open_or(p(), datasets::EXERCISE_TODOS, first_run(seed, samples::exercise_todos)),
            courses: EntityStore::open_or(p(), datasets::PORTFOLIO_COURSES, first_run(seed, samples::courses)),
            projects: EntityStore::open_or(p(), datasets::PORTFOLIO_PROJECTS, first_run(seed, samples::projects)),
            future_projects: EntityStore::open_or(
                p(),
                datasets::PORTFOLIO_FUTURE_PROJECTS,
                first_run(seed, samples::future_projects),
            ),
            study: StudyTracker::open_or(p(), calendar, first_run(seed, samples::subjects)),
            notifications: NotificationCenter::open(p()),
            profile: DocumentStore::open(p(), datasets::PROFILE),
        }
    }

    pub fn dashboard(&mut self) -> DashboardSummary {
        let open = |stats: crate::stats::CollectionStats| stats.total - stats.completed;
        let study = self.study.stats();
        DashboardSummary {
            family_tasks: open(self.family_tasks.stats()),
            sports_activities: self.exercise.stats().total_exercises,
            reading_hours: study.weekly_total_hours,
            coding_projects: self.projects.stats().total,
            responsibilities: open(self.responsibility_tasks.stats()),
            academic_tasks: study.subject_count,
            books_in_progress: self
                .books
                .records()
                .iter()
                .filter(|book| book.shelf == Shelf::Reading)
                .count(),
            unread_notifications: self.notifications.unread_count(),
        }
    }
}

/// Picks one list store out of [`Trackers`], so the CRUD handlers can be
/// shared by every page.
pub trait Slot: Send + Sync + 'static {
    type Record: Record;

    fn store(trackers: &mut Trackers) -> &mut EntityStore<Self::Record>;
}

macro_rules! slots {
    ($($slot:ident => $field:ident: $record:ty;)*) => {
        $(
            pub struct $slot;

            impl Slot for $slot {
                type Record = $record;

                fn store(trackers: &mut Trackers) -> &mut EntityStore<$record> {
                    &mut trackers.$field
                }
            }
        )*
    };
}

slots! {
    FamilyTasks => family_tasks: FamilyTask;
    ResponsibilityTasks => responsibility_tasks: ResponsibilityTask;
    Books => books: Book;
    LibraryTodos => library_todos: TodoItem;
    ExerciseTodos => exercise_todos: TodoItem;
    Courses => courses: Course;
    Projects => projects: Project;
    FutureProjects => future_projects: FutureProject;
}

#[derive(Clone)]
pub struct AppState {
    pub trackers: Arc<Mutex<Trackers>>,
    pub unread: watch::Receiver<usize>,
}

impl AppState {
    pub fn new(trackers: Arc<Mutex<Trackers>>, unread: watch::Receiver<usize>) -> Self {
        Self { trackers, unread }
    }
}

/// Feeds the header badge from the locally stored notifications.
pub struct LocalNotifications(pub Arc<Mutex<Trackers>>);

impl NotificationSource for LocalNotifications {
    async fn unread_count(&self) -> Result<usize, SourceError> {
        Ok(self.0.lock().await.notifications.unread_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::FixedCalendar;
    use crate::storage::MemoryStore;
    use chrono::NaiveDate;

    fn calendar() -> Arc<dyn Calendar> {
        Arc::new(FixedCalendar::new(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()))
    }

    #[test]
    fn seeded_dashboard_counts_samples() {
        let persistence = Persistence::new(MemoryStore::new());
        let mut trackers = Trackers::open(&persistence, calendar(), true);
        let summary = trackers.dashboard();
        assert_eq!(summary.family_tasks, 1);
        assert_eq!(summary.responsibilities, 1);
        assert_eq!(summary.coding_projects, 2);
        assert_eq!(summary.academic_tasks, 3);
        assert_eq!(summary.books_in_progress, 2);
        assert_eq!(summary.sports_activities, 18);
        assert_eq!(summary.reading_hours, 0.0);
    }

    #[test]
    fn unseeded_trackers_start_empty() {
        let persistence = Persistence::new(MemoryStore::new());
        let mut trackers = Trackers::open(&persistence, calendar(), false);
        assert!(FamilyTasks::store(&mut trackers).list().is_empty());
        assert!(trackers.exercise.schedule().days.is_empty());
        assert_eq!(trackers.profile.get(), &Profile::default());
    }

    #[tokio::test]
    async fn local_source_counts_unread() {
        let persistence = Persistence::new(MemoryStore::new());
        let trackers = Arc::new(Mutex::new(Trackers::open(&persistence, calendar(), false)));
        trackers
            .lock()
            .await
            .notifications
            .receive(crate::models::NotificationDraft {
                title: "اعلان".to_string(),
                ..Default::default()
            })
            .unwrap();
        let source = LocalNotifications(Arc::clone(&trackers));
        assert_eq!(source.unread_count().await.unwrap(), 1);
    }

    #[test]
    fn dashboard_reading_hours_reset_with_the_week() {
        let persistence = Persistence::new(MemoryStore::new());
        let clock = Arc::new(FixedCalendar::new(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()));
        let mut trackers = Trackers::open(&persistence, clock.clone(), true);
        let id = trackers.study.subjects()[0].id;
        trackers.study.log_hours(id, 0, 3.0).unwrap();
        assert_eq!(trackers.dashboard().reading_hours, 3.0);

        clock.set_today(NaiveDate::from_ymd_opt(2026, 10, 25).unwrap());
        assert_eq!(trackers.dashboard().reading_hours, 0.0);
        assert_eq!(trackers.dashboard().academic_tasks, 3);
    }
}
