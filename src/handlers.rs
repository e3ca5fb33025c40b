use crate::errors::AppError;
use crate::models::{
    DayPlanDraft, EntryDraft, ExerciseSchedule, HoursDraft, Notification, NotificationDraft, Profile,
    RecordId, ScheduleDocument, Shelf, Subject, SubjectDraft, Weekday,
};
use crate::notifications::NotificationTab;
use crate::state::{AppState, Slot};
use crate::stats::{CollectionStats, DashboardSummary, ExerciseStats, LibraryStats, StudyStats, build_library_stats};
use crate::store::{Completable, Mutation, Record};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub stats: CollectionStats,
}

/// Body of every successful mutation. `warning` is set when the change was
/// applied but could not be written to storage.
#[derive(Debug, Serialize)]
pub struct MutationResponse<T> {
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl<T> From<Mutation<T>> for MutationResponse<T> {
    fn from(mutation: Mutation<T>) -> Self {
        let warning = mutation.warning.map(|err| {
            warn!("change kept in memory only: {err}");
            format!("تغییرات ذخیره نشد: {err}")
        });
        Self {
            data: mutation.value,
            warning,
        }
    }
}

type Mutated<T> = Result<Json<MutationResponse<T>>, AppError>;

fn respond<T>(mutation: Mutation<T>) -> Json<MutationResponse<T>> {
    Json(mutation.into())
}

// Shared list CRUD

pub async fn list<S: Slot>(State(state): State<AppState>) -> Json<ListResponse<S::Record>> {
    let mut trackers = state.trackers.lock().await;
    let store = S::store(&mut trackers);
    Json(ListResponse {
        items: store.list(),
        stats: store.stats(),
    })
}

pub async fn create<S: Slot>(
    State(state): State<AppState>,
    Json(draft): Json<<S::Record as Record>::Draft>,
) -> Mutated<S::Record> {
    let mut trackers = state.trackers.lock().await;
    Ok(respond(S::store(&mut trackers).create(draft)?))
}

pub async fn update<S: Slot>(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    Json(draft): Json<<S::Record as Record>::Draft>,
) -> Mutated<S::Record> {
    let mut trackers = state.trackers.lock().await;
    Ok(respond(S::store(&mut trackers).update(id, draft)?))
}

pub async fn remove<S: Slot>(State(state): State<AppState>, Path(id): Path<RecordId>) -> Mutated<S::Record> {
    let mut trackers = state.trackers.lock().await;
    Ok(respond(S::store(&mut trackers).remove(id)?))
}

pub async fn toggle<S>(State(state): State<AppState>, Path(id): Path<RecordId>) -> Mutated<S::Record>
where
    S: Slot,
    S::Record: Completable,
{
    let mut trackers = state.trackers.lock().await;
    Ok(respond(S::store(&mut trackers).toggle_completed(id)?))
}

// Library

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub shelf: Shelf,
}

pub async fn move_book(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    Json(request): Json<MoveRequest>,
) -> Mutated<crate::models::Book> {
    let mut trackers = state.trackers.lock().await;
    Ok(respond(trackers.books.modify(id, |book| book.shelf = request.shelf)?))
}

pub async fn library_stats(State(state): State<AppState>) -> Json<LibraryStats> {
    let trackers = state.trackers.lock().await;
    Json(build_library_stats(trackers.books.records()))
}

// Exercise schedule

#[derive(Debug, Serialize)]
pub struct ScheduleResponse {
    pub schedule: ExerciseSchedule,
    pub stats: ExerciseStats,
}

fn parse_day(day: &str) -> Result<Weekday, AppError> {
    day.parse::<Weekday>()
        .map_err(|err| AppError::bad_request(err.to_string()))
}

pub async fn get_schedule(State(state): State<AppState>) -> Json<ScheduleResponse> {
    let trackers = state.trackers.lock().await;
    Json(ScheduleResponse {
        schedule: trackers.exercise.schedule().clone(),
        stats: trackers.exercise.stats(),
    })
}

pub async fn set_day(
    State(state): State<AppState>,
    Path(day): Path<String>,
    Json(draft): Json<DayPlanDraft>,
) -> Mutated<Vec<String>> {
    let day = parse_day(&day)?;
    let mut trackers = state.trackers.lock().await;
    Ok(respond(trackers.exercise.set_day(day, draft.exercises)))
}

pub async fn add_entry(
    State(state): State<AppState>,
    Path(day): Path<String>,
    Json(draft): Json<EntryDraft>,
) -> Mutated<Vec<String>> {
    let day = parse_day(&day)?;
    let mut trackers = state.trackers.lock().await;
    Ok(respond(trackers.exercise.add_entry(day, &draft.text)?))
}

pub async fn remove_entry(
    State(state): State<AppState>,
    Path((day, index)): Path<(String, usize)>,
) -> Mutated<String> {
    let day = parse_day(&day)?;
    let mut trackers = state.trackers.lock().await;
    Ok(respond(trackers.exercise.remove_entry(day, index)?))
}

// Study tracker

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyResponse {
    #[serde(flatten)]
    pub document: ScheduleDocument,
    pub stats: StudyStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

pub async fn get_study(State(state): State<AppState>) -> Json<StudyResponse> {
    let mut trackers = state.trackers.lock().await;
    let refreshed = MutationResponse::from(trackers.study.refresh());
    let stats = trackers.study.stats();
    Json(StudyResponse {
        document: trackers.study.document().clone(),
        stats,
        warning: refreshed.warning,
    })
}

pub async fn add_subject(State(state): State<AppState>, Json(draft): Json<SubjectDraft>) -> Mutated<Subject> {
    let mut trackers = state.trackers.lock().await;
    Ok(respond(trackers.study.add_subject(draft)?))
}

pub async fn update_subject(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    Json(draft): Json<SubjectDraft>,
) -> Mutated<Subject> {
    let mut trackers = state.trackers.lock().await;
    Ok(respond(trackers.study.update_subject(id, draft)?))
}

pub async fn remove_subject(State(state): State<AppState>, Path(id): Path<RecordId>) -> Mutated<Subject> {
    let mut trackers = state.trackers.lock().await;
    Ok(respond(trackers.study.remove_subject(id)?))
}

pub async fn log_hours(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    Json(draft): Json<HoursDraft>,
) -> Mutated<Subject> {
    let mut trackers = state.trackers.lock().await;
    Ok(respond(trackers.study.log_hours(id, draft.day, draft.hours)?))
}

// Profile

pub async fn get_profile(State(state): State<AppState>) -> Json<Profile> {
    let trackers = state.trackers.lock().await;
    Json(trackers.profile.get().clone())
}

pub async fn update_profile(State(state): State<AppState>, Json(profile): Json<Profile>) -> Mutated<Profile> {
    let mut trackers = state.trackers.lock().await;
    let mutation = trackers.profile.update(|current| {
        profile.validate()?;
        *current = profile.clone();
        Ok(profile)
    })?;
    Ok(respond(mutation))
}

// Notifications

#[derive(Debug, Default, Deserialize)]
pub struct TabQuery {
    #[serde(default)]
    pub tab: NotificationTab,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UnreadCount {
    pub count: usize,
}

pub async fn list_notifications(
    State(state): State<AppState>,
    Query(query): Query<TabQuery>,
) -> Json<Vec<Notification>> {
    let trackers = state.trackers.lock().await;
    Json(trackers.notifications.list(query.tab))
}

pub async fn receive_notification(
    State(state): State<AppState>,
    Json(draft): Json<NotificationDraft>,
) -> Mutated<Notification> {
    let mut trackers = state.trackers.lock().await;
    Ok(respond(trackers.notifications.receive(draft)?))
}

/// Adopts a whole notification list fetched from elsewhere.
pub async fn replace_notifications(
    State(state): State<AppState>,
    Json(notifications): Json<Vec<Notification>>,
) -> Mutated<usize> {
    let mut trackers = state.trackers.lock().await;
    Ok(respond(trackers.notifications.replace_all(notifications)?))
}

pub async fn mark_read(State(state): State<AppState>, Path(id): Path<RecordId>) -> Mutated<Notification> {
    let mut trackers = state.trackers.lock().await;
    Ok(respond(trackers.notifications.mark_read(id)?))
}

pub async fn mark_all_read(State(state): State<AppState>) -> Json<MutationResponse<usize>> {
    let mut trackers = state.trackers.lock().await;
    respond(trackers.notifications.mark_all_read())
}

pub async fn delete_notification(State(state): State<AppState>, Path(id): Path<RecordId>) -> Mutated<Notification> {
    let mut trackers = state.trackers.lock().await;
    Ok(respond(trackers.notifications.delete(id)?))
}

/// Last value seen by the background poller, not a fresh count.
pub async fn unread_count(State(state): State<AppState>) -> Json<UnreadCount> {
    Json(UnreadCount {
        count: *state.unread.borrow(),
    })
}

// Dashboard

pub async fn dashboard(State(state): State<AppState>) -> Json<DashboardSummary> {
    let mut trackers = state.trackers.lock().await;
    Json(trackers.dashboard())
}
