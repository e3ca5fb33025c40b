use crate::errors::ValidationError;
use crate::store::{Collection, Completable, Record};
use crate::validation::Checks;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub type RecordId = u64;

/// Storage keys, one per tracker document.
pub mod datasets {
    pub const FAMILY_TASKS: &str = "familyTasks";
    pub const RESPONSIBILITY_TASKS: &str = "responsibilityTasks";
    pub const LIBRARY_BOOKS: &str = "libraryBooks";
    pub const LIBRARY_TODOS: &str = "libraryTodos";
    pub const EXERCISE_SCHEDULE: &str = "exerciseSchedule";
    pub const EXERCISE_TODOS: &str = "exerciseTodos";
    pub const PORTFOLIO_COURSES: &str = "portfolioCourses";
    pub const PORTFOLIO_PROJECTS: &str = "portfolioProjects";
    pub const PORTFOLIO_FUTURE_PROJECTS: &str = "portfolioFutureProjects";
    pub const STUDY_SCHEDULE: &str = "studySchedule";
    pub const NOTIFICATIONS: &str = "notifications";
    pub const PROFILE: &str = "profile";
}

// Family tasks

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FamilyCategory {
    Shopping,
    Cleaning,
    Education,
    #[default]
    General,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyTask {
    pub id: RecordId,
    pub title: String,
    pub description: String,
    pub assigned_to: String,
    pub due_date: String,
    pub category: FamilyCategory,
    pub completed: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyTaskDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub assigned_to: String,
    #[serde(default)]
    pub due_date: String,
    #[serde(default)]
    pub category: FamilyCategory,
}

impl Record for FamilyTask {
    type Draft = FamilyTaskDraft;

    fn id(&self) -> RecordId {
        self.id
    }

    fn build(id: RecordId, draft: FamilyTaskDraft) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            assigned_to: draft.assigned_to,
            due_date: draft.due_date,
            category: draft.category,
            completed: false,
        }
    }

    fn apply(&mut self, draft: FamilyTaskDraft) {
        self.title = draft.title;
        self.description = draft.description;
        self.assigned_to = draft.assigned_to;
        self.due_date = draft.due_date;
        self.category = draft.category;
    }

    fn validate(draft: &FamilyTaskDraft) -> Result<(), ValidationError> {
        Checks::new()
            .required("title", &draft.title)
            .required("assignedTo", &draft.assigned_to)
            .finish()
    }

    fn is_completed(&self) -> bool {
        self.completed
    }
}

impl Completable for FamilyTask {
    fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
    }
}

// Responsibility tasks

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsibilityTask {
    pub id: RecordId,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub deadline: String,
    pub start_date: String,
    pub start_time: String,
    pub end_date: String,
    pub end_time: String,
    pub category: String,
    pub completed: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsibilityTaskDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub deadline: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default = "default_responsibility_category")]
    pub category: String,
}

fn default_responsibility_category() -> String {
    "design".to_string()
}

impl Record for ResponsibilityTask {
    type Draft = ResponsibilityTaskDraft;

    fn id(&self) -> RecordId {
        self.id
    }

    fn build(id: RecordId, draft: ResponsibilityTaskDraft) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            priority: draft.priority,
            deadline: draft.deadline,
            start_date: draft.start_date,
            start_time: draft.start_time,
            end_date: draft.end_date,
            end_time: draft.end_time,
            category: draft.category,
            completed: false,
        }
    }

    fn apply(&mut self, draft: ResponsibilityTaskDraft) {
        let completed = self.completed;
        *self = Self::build(self.id, draft);
        self.completed = completed;
    }

    fn validate(draft: &ResponsibilityTaskDraft) -> Result<(), ValidationError> {
        Checks::new()
            .required("title", &draft.title)
            .required("startDate", &draft.start_date)
            .required("startTime", &draft.start_time)
            .required("endDate", &draft.end_date)
            .required("endTime", &draft.end_time)
            .not_before(
                "startDate",
                (draft.start_date.as_str(), draft.start_time.as_str()),
                "endDate",
                (draft.end_date.as_str(), draft.end_time.as_str()),
            )
            .finish()
    }

    fn is_completed(&self) -> bool {
        self.completed
    }
}

impl Completable for ResponsibilityTask {
    fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
    }
}

// Library

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Shelf {
    Reading,
    Completed,
    #[default]
    ToRead,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: RecordId,
    pub title: String,
    pub author: String,
    pub shelf: Shelf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDraft {
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub shelf: Shelf,
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub rating: Option<u8>,
}

impl Record for Book {
    type Draft = BookDraft;

    fn id(&self) -> RecordId {
        self.id
    }

    fn build(id: RecordId, draft: BookDraft) -> Self {
        Self {
            id,
            title: draft.title,
            author: draft.author,
            shelf: draft.shelf,
            progress: draft.progress,
            rating: draft.rating,
        }
    }

    fn apply(&mut self, draft: BookDraft) {
        *self = Self::build(self.id, draft);
    }

    fn validate(draft: &BookDraft) -> Result<(), ValidationError> {
        Checks::new()
            .required("title", &draft.title)
            .optional_range("progress", draft.progress, 0.0, 100.0)
            .optional_range("rating", draft.rating.map(f64::from), 1.0, 5.0)
            .finish()
    }

    fn is_completed(&self) -> bool {
        self.shelf == Shelf::Completed
    }
}

// Checklists shared by the library and exercise pages

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: RecordId,
    pub text: String,
    pub completed: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TodoDraft {
    pub text: String,
}

impl Record for TodoItem {
    type Draft = TodoDraft;

    fn id(&self) -> RecordId {
        self.id
    }

    fn build(id: RecordId, draft: TodoDraft) -> Self {
        Self {
            id,
            text: draft.text,
            completed: false,
        }
    }

    fn apply(&mut self, draft: TodoDraft) {
        self.text = draft.text;
    }

    fn validate(draft: &TodoDraft) -> Result<(), ValidationError> {
        Checks::new().required("text", &draft.text).finish()
    }

    fn is_completed(&self) -> bool {
        self.completed
    }
}

impl Completable for TodoItem {
    fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
    }
}

// Programming portfolio

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: RecordId,
    pub name: String,
    pub platform: String,
    pub progress: f64,
    pub completion_date: String,
    pub certificate: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDraft {
    pub name: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub completion_date: String,
    #[serde(default)]
    pub certificate: bool,
}

impl Record for Course {
    type Draft = CourseDraft;

    fn id(&self) -> RecordId {
        self.id
    }

    fn build(id: RecordId, draft: CourseDraft) -> Self {
        Self {
            id,
            name: draft.name,
            platform: draft.platform,
            progress: draft.progress,
            completion_date: draft.completion_date,
            certificate: draft.certificate,
        }
    }

    fn apply(&mut self, draft: CourseDraft) {
        *self = Self::build(self.id, draft);
    }

    fn validate(draft: &CourseDraft) -> Result<(), ValidationError> {
        Checks::new()
            .required("name", &draft.name)
            .range("progress", draft.progress, 0.0, 100.0)
            .finish()
    }

    fn is_completed(&self) -> bool {
        self.progress >= 100.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    Completed,
    #[default]
    InProgress,
    Planned,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: RecordId,
    pub name: String,
    pub status: ProjectStatus,
    pub technologies: Vec<String>,
    pub description: String,
    pub github: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectDraft {
    pub name: String,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub github: String,
}

impl Record for Project {
    type Draft = ProjectDraft;

    fn id(&self) -> RecordId {
        self.id
    }

    fn build(id: RecordId, draft: ProjectDraft) -> Self {
        Self {
            id,
            name: draft.name,
            status: draft.status,
            technologies: draft.technologies,
            description: draft.description,
            github: draft.github,
        }
    }

    fn apply(&mut self, draft: ProjectDraft) {
        *self = Self::build(self.id, draft);
    }

    fn validate(draft: &ProjectDraft) -> Result<(), ValidationError> {
        Checks::new().required("name", &draft.name).finish()
    }

    fn is_completed(&self) -> bool {
        self.status == ProjectStatus::Completed
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FutureProject {
    pub id: RecordId,
    pub name: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub priority: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FutureProjectDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub priority: String,
}

impl Record for FutureProject {
    type Draft = FutureProjectDraft;

    fn id(&self) -> RecordId {
        self.id
    }

    fn build(id: RecordId, draft: FutureProjectDraft) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            technologies: draft.technologies,
            priority: draft.priority,
        }
    }

    fn apply(&mut self, draft: FutureProjectDraft) {
        *self = Self::build(self.id, draft);
    }

    fn validate(draft: &FutureProjectDraft) -> Result<(), ValidationError> {
        Checks::new().required("name", &draft.name).finish()
    }
}

// Notifications

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Warning,
    Info,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    #[default]
    Unread,
    Read,
    Urgent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: RecordId,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub status: NotificationStatus,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDraft {
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, rename = "type")]
    pub kind: NotificationKind,
    #[serde(default)]
    pub status: NotificationStatus,
    #[serde(default)]
    pub created_at: String,
}

impl Record for Notification {
    type Draft = NotificationDraft;

    fn id(&self) -> RecordId {
        self.id
    }

    fn build(id: RecordId, draft: NotificationDraft) -> Self {
        Self {
            id,
            title: draft.title,
            message: draft.message,
            kind: draft.kind,
            status: draft.status,
            created_at: draft.created_at,
        }
    }

    fn apply(&mut self, draft: NotificationDraft) {
        *self = Self::build(self.id, draft);
    }

    fn validate(draft: &NotificationDraft) -> Result<(), ValidationError> {
        Checks::new().required("title", &draft.title).finish()
    }

    fn is_completed(&self) -> bool {
        self.status == NotificationStatus::Read
    }
}

// Profile

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub department: String,
    pub specialization: String,
    pub personal_code: String,
}

impl Profile {
    pub fn validate(&self) -> Result<(), ValidationError> {
        Checks::new().email("email", &self.email).finish()
    }
}

// Exercise schedule

/// Days of the Persian week, Saturday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    #[serde(rename = "شنبه")]
    Saturday,
    #[serde(rename = "یکشنبه")]
    Sunday,
    #[serde(rename = "دوشنبه")]
    Monday,
    #[serde(rename = "سه\u{200c}شنبه")]
    Tuesday,
    #[serde(rename = "چهارشنبه")]
    Wednesday,
    #[serde(rename = "پنج\u{200c}شنبه")]
    Thursday,
    #[serde(rename = "جمعه")]
    Friday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Saturday,
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    pub fn persian_name(self) -> &'static str {
        match self {
            Weekday::Saturday => "شنبه",
            Weekday::Sunday => "یکشنبه",
            Weekday::Monday => "دوشنبه",
            Weekday::Tuesday => "سه\u{200c}شنبه",
            Weekday::Wednesday => "چهارشنبه",
            Weekday::Thursday => "پنج\u{200c}شنبه",
            Weekday::Friday => "جمعه",
        }
    }

    fn english_name(self) -> &'static str {
        match self {
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.persian_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown weekday '{0}'")]
pub struct UnknownWeekday(pub String);

impl FromStr for Weekday {
    type Err = UnknownWeekday;

    /// Accepts the Persian name (with or without the zero-width non-joiner)
    /// or the English name in any case.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        let compact: String = value.chars().filter(|c| *c != '\u{200c}' && *c != ' ').collect();
        Weekday::ALL
            .into_iter()
            .find(|day| {
                day.english_name().eq_ignore_ascii_case(value)
                    || day.persian_name().replace('\u{200c}', "") == compact
            })
            .ok_or_else(|| UnknownWeekday(value.to_string()))
    }
}

/// Weekday buckets of free-text exercise entries.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExerciseSchedule {
    pub days: BTreeMap<Weekday, Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DayPlanDraft {
    pub exercises: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntryDraft {
    pub text: String,
}

// Study tracker

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: RecordId,
    pub name: String,
    pub weekly_hours: Vec<f64>,
    pub grade: f64,
    pub progress: f64,
}

impl Subject {
    pub fn total_hours(&self) -> f64 {
        self.weekly_hours.iter().sum()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectDraft {
    pub name: String,
    #[serde(default)]
    pub grade: f64,
    #[serde(default)]
    pub progress: f64,
    /// Omitted on create (starts at zero) and on edit (keeps logged hours).
    #[serde(default)]
    pub weekly_hours: Option<Vec<f64>>,
}

pub const DAYS_PER_WEEK: usize = 7;
pub const MAX_GRADE: f64 = 20.0;
pub const MAX_DAILY_HOURS: f64 = 24.0;

impl Record for Subject {
    type Draft = SubjectDraft;

    fn id(&self) -> RecordId {
        self.id
    }

    fn build(id: RecordId, draft: SubjectDraft) -> Self {
        Self {
            id,
            name: draft.name,
            weekly_hours: draft.weekly_hours.unwrap_or_else(|| vec![0.0; DAYS_PER_WEEK]),
            grade: draft.grade,
            progress: draft.progress,
        }
    }

    fn apply(&mut self, draft: SubjectDraft) {
        self.name = draft.name;
        self.grade = draft.grade;
        self.progress = draft.progress;
        if let Some(hours) = draft.weekly_hours {
            self.weekly_hours = hours;
        }
    }

    fn validate(draft: &SubjectDraft) -> Result<(), ValidationError> {
        let hours = draft.weekly_hours.as_deref().unwrap_or(&[]);
        let checks = Checks::new()
            .required("name", &draft.name)
            .range("grade", draft.grade, 0.0, MAX_GRADE)
            .range("progress", draft.progress, 0.0, 100.0);
        match &draft.weekly_hours {
            Some(_) => checks
                .length("weeklyHours", hours, DAYS_PER_WEEK)
                .each_in_range("weeklyHours", hours, 0.0, MAX_DAILY_HOURS)
                .finish(),
            None => checks.finish(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDocument {
    pub subjects: Collection<Subject>,
    pub week_dates: Vec<String>,
    pub current_week: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoursDraft {
    pub day: usize,
    pub hours: f64,
}
