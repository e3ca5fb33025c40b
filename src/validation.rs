//! Pre-commit checks applied to drafts before a store accepts them.
//!
//! Each record type lists its rules with [`Checks`]; the first failing rule
//! is reported and the store leaves its collection untouched.

use crate::errors::{ValidationError, ValidationReason};

/// Ordered rule list evaluated against one draft.
#[derive(Debug, Default)]
#[must_use]
pub struct Checks {
    failure: Option<ValidationError>,
}

impl Checks {
    pub fn new() -> Self {
        Self::default()
    }

    fn check(mut self, field: &'static str, failed: impl FnOnce() -> Option<ValidationReason>) -> Self {
        if self.failure.is_none() {
            if let Some(reason) = failed() {
                self.failure = Some(ValidationError::new(field, reason));
            }
        }
        self
    }

    pub fn required(self, field: &'static str, value: &str) -> Self {
        self.check(field, || value.trim().is_empty().then_some(ValidationReason::Required))
    }

    pub fn range(self, field: &'static str, value: f64, min: f64, max: f64) -> Self {
        self.check(field, || out_of_range(value, min, max))
    }

    pub fn optional_range(self, field: &'static str, value: Option<f64>, min: f64, max: f64) -> Self {
        self.check(field, || value.and_then(|value| out_of_range(value, min, max)))
    }

    pub fn each_in_range(self, field: &'static str, values: &[f64], min: f64, max: f64) -> Self {
        self.check(field, || values.iter().find_map(|&value| out_of_range(value, min, max)))
    }

    pub fn length<T>(self, field: &'static str, values: &[T], expected: usize) -> Self {
        self.check(field, || {
            (values.len() != expected).then_some(ValidationReason::WrongLength {
                expected,
                actual: values.len(),
            })
        })
    }

    /// Empty is allowed; anything else needs a local part and a domain.
    pub fn email(self, field: &'static str, value: &str) -> Self {
        self.check(field, || {
            let value = value.trim();
            if value.is_empty() {
                return None;
            }
            match value.split_once('@') {
                Some((local, domain)) if !local.is_empty() && !domain.is_empty() => None,
                _ => Some(ValidationReason::InvalidFormat),
            }
        })
    }

    /// Fails on `start_field` or `end_field` if either side does not parse,
    /// and on `end_field` when the end precedes the start.
    pub fn not_before(
        self,
        start_field: &'static str,
        start: (&str, &str),
        end_field: &'static str,
        end: (&str, &str),
    ) -> Self {
        let start = DateTime::parse(start.0, start.1);
        let end = DateTime::parse(end.0, end.1);
        self.check(start_field, || start.is_none().then_some(ValidationReason::InvalidDateTime))
            .check(end_field, || match (start, end) {
                (_, None) => Some(ValidationReason::InvalidDateTime),
                (Some(start), Some(end)) if end < start => Some(ValidationReason::EndBeforeStart),
                _ => None,
            })
    }

    pub fn finish(self) -> Result<(), ValidationError> {
        match self.failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn out_of_range(value: f64, min: f64, max: f64) -> Option<ValidationReason> {
    (!value.is_finite() || value < min || value > max).then_some(ValidationReason::OutOfRange { min, max })
}

/// Calendar-agnostic date-time used only for ordering comparisons. The
/// fields are compared positionally, so it works for Solar Hijri dates
/// that are not valid Gregorian dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DateTime {
    year: u32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
}

impl DateTime {
    /// Accepts `YYYY/MM/DD` or `YYYY-MM-DD` with `HH:MM`.
    pub fn parse(date: &str, time: &str) -> Option<Self> {
        let mut date_parts = date.trim().split(['/', '-']).map(|part| part.parse::<u32>().ok());
        let year = date_parts.next()??;
        let month = date_parts.next()??;
        let day = date_parts.next()??;
        if date_parts.next().is_some() {
            return None;
        }

        let (hour, minute) = time.trim().split_once(':')?;
        let hour = hour.parse::<u32>().ok()?;
        let minute = minute.parse::<u32>().ok()?;

        let valid = (1..=12).contains(&month) && (1..=31).contains(&day) && hour < 24 && minute < 60;
        valid.then_some(Self {
            year,
            month,
            day,
            hour,
            minute,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_failure_wins() {
        let err = Checks::new()
            .required("title", "  ")
            .required("assignedTo", "")
            .finish()
            .unwrap_err();
        assert_eq!(err.field, "title");
        assert_eq!(err.reason, ValidationReason::Required);
    }

    #[test]
    fn range_rejects_out_of_bounds_and_nan() {
        assert!(Checks::new().range("progress", 100.0, 0.0, 100.0).finish().is_ok());
        assert!(Checks::new().range("progress", 101.0, 0.0, 100.0).finish().is_err());
        assert!(Checks::new().range("progress", f64::NAN, 0.0, 100.0).finish().is_err());
        assert!(Checks::new().optional_range("rating", None, 1.0, 5.0).finish().is_ok());
    }

    #[test]
    fn end_before_start_is_reported_on_end_field() {
        let err = Checks::new()
            .not_before("startDate", ("1402/09/15", "18:00"), "endDate", ("1402/09/15", "09:00"))
            .finish()
            .unwrap_err();
        assert_eq!(err.field, "endDate");
        assert_eq!(err.reason, ValidationReason::EndBeforeStart);
    }

    #[test]
    fn ordering_compares_values_not_strings() {
        // "1402/9/5" sorts after "1402/10/01" as text.
        assert!(
            Checks::new()
                .not_before("startDate", ("1402/9/5", "9:00"), "endDate", ("1402/10/01", "08:00"))
                .finish()
                .is_ok()
        );
    }

    #[test]
    fn solar_hijri_dates_parse() {
        assert!(DateTime::parse("1402/02/31", "10:30").is_some());
        assert!(DateTime::parse("1402-13-01", "10:30").is_none());
        assert!(DateTime::parse("1402/01/01", "24:00").is_none());
        assert!(DateTime::parse("", "10:00").is_none());
    }

    #[test]
    fn email_shape() {
        assert!(Checks::new().email("email", "").finish().is_ok());
        assert!(Checks::new().email("email", "ali@example.ir").finish().is_ok());
        assert!(Checks::new().email("email", "ali.example.ir").finish().is_err());
    }
}
