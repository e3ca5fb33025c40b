pub mod app;
pub mod calendar;
pub mod config;
pub mod errors;
pub mod exercise;
pub mod handlers;
pub mod models;
pub mod notifications;
pub mod reset;
pub mod samples;
pub mod state;
pub mod stats;
pub mod storage;
pub mod store;
pub mod study;
pub mod validation;

pub use app::router;
pub use calendar::{Calendar, FixedCalendar, JalaliCalendar};
pub use config::Config;
pub use errors::{AppError, PersistenceError, StoreError, ValidationError};
pub use notifications::{NotificationCenter, NotificationSource, UnreadPoller};
pub use state::{AppState, LocalNotifications, Trackers};
pub use store::{Collection, DocumentStore, EntityStore, Mutation, Record};
