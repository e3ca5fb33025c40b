use crate::handlers;
use crate::state::{
    AppState, Books, Courses, ExerciseTodos, FamilyTasks, FutureProjects, LibraryTodos, Projects,
    ResponsibilityTasks, Slot,
};
use crate::store::Completable;
use axum::{
    Router,
    routing::{delete, get, post, put},
};

/// List, create, update and delete routes for one tracker list.
fn crud<S: Slot>(router: Router<AppState>, path: &str) -> Router<AppState> {
    router
        .route(path, get(handlers::list::<S>).post(handlers::create::<S>))
        .route(
            &format!("{path}/:id"),
            put(handlers::update::<S>).delete(handlers::remove::<S>),
        )
}

fn crud_with_toggle<S>(router: Router<AppState>, path: &str) -> Router<AppState>
where
    S: Slot,
    S::Record: Completable,
{
    crud::<S>(router, path).route(&format!("{path}/:id/toggle"), post(handlers::toggle::<S>))
}

pub fn router(state: AppState) -> Router {
    let router = Router::new()
        .route("/api/dashboard", get(handlers::dashboard))
        .route("/api/library/books/:id/move", post(handlers::move_book))
        .route("/api/library/stats", get(handlers::library_stats))
        .route("/api/exercise/schedule", get(handlers::get_schedule))
        .route("/api/exercise/schedule/:day", put(handlers::set_day).post(handlers::add_entry))
        .route("/api/exercise/schedule/:day/:index", delete(handlers::remove_entry))
        .route("/api/study", get(handlers::get_study))
        .route("/api/study/subjects", post(handlers::add_subject))
        .route(
            "/api/study/subjects/:id",
            put(handlers::update_subject).delete(handlers::remove_subject),
        )
        .route("/api/study/subjects/:id/hours", put(handlers::log_hours))
        .route("/api/profile", get(handlers::get_profile).put(handlers::update_profile))
        .route(
            "/api/notifications",
            get(handlers::list_notifications)
                .post(handlers::receive_notification)
                .put(handlers::replace_notifications),
        )
        .route("/api/notifications/read-all", post(handlers::mark_all_read))
        .route("/api/notifications/unread-count", get(handlers::unread_count))
        .route("/api/notifications/:id", delete(handlers::delete_notification))
        .route("/api/notifications/:id/read", post(handlers::mark_read));

    let router = crud_with_toggle::<FamilyTasks>(router, "/api/family-tasks");
    let router = crud_with_toggle::<ResponsibilityTasks>(router, "/api/responsibility-tasks");
    let router = crud::<Books>(router, "/api/library/books");
    let router = crud_with_toggle::<LibraryTodos>(router, "/api/library/todos");
    let router = crud_with_toggle::<ExerciseTodos>(router, "/api/exercise/todos");
    let router = crud::<Courses>(router, "/api/portfolio/courses");
    let router = crud::<Projects>(router, "/api/portfolio/projects");
    let router = crud::<FutureProjects>(router, "/api/portfolio/future-projects");

    router.with_state(state)
}
