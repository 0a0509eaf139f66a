//! Field checks shared by the report and message stores.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::{
    domain::{Message, Report, ReportInput, Site},
    error::{Field, ValidationError},
};

pub const MIN_PERCENT: i64 = 0;
pub const MAX_PERCENT: i64 = 100;

pub fn is_non_empty_trimmed(value: &str) -> bool {
    !value.trim().is_empty()
}

pub fn is_valid_percent(value: i64) -> bool {
    (MIN_PERCENT..=MAX_PERCENT).contains(&value)
}

/// A report input that passed every check, with text already trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedReport {
    pub site: Site,
    pub work_completed: String,
    pub progress_percent: u8,
    pub work_remaining: String,
    pub engineer: Option<String>,
    pub date: Option<NaiveDate>,
    pub notes: Option<String>,
}

pub fn validate_report(input: &ReportInput) -> Result<ValidatedReport, ValidationError> {
    let mut fields = BTreeSet::new();

    let site = input.site.parse::<Site>().ok();
    if site.is_none() {
        fields.insert(Field::Site);
    }
    if !is_non_empty_trimmed(&input.work_completed) {
        fields.insert(Field::WorkCompleted);
    }
    let progress = u8::try_from(input.progress_percent)
        .ok()
        .filter(|_| is_valid_percent(input.progress_percent));
    if progress.is_none() {
        fields.insert(Field::ProgressPercent);
    }
    if !is_non_empty_trimmed(&input.work_remaining) {
        fields.insert(Field::WorkRemaining);
    }

    match (site, progress) {
        (Some(site), Some(progress_percent)) if fields.is_empty() => Ok(ValidatedReport {
            site,
            work_completed: input.work_completed.trim().to_string(),
            progress_percent,
            work_remaining: input.work_remaining.trim().to_string(),
            engineer: normalize_optional_text(input.engineer.as_deref()),
            date: input.date,
            notes: normalize_optional_text(input.notes.as_deref()),
        }),
        _ => Err(ValidationError { fields }),
    }
}

pub fn validate_message_content(content: &str) -> Result<String, ValidationError> {
    if is_non_empty_trimmed(content) {
        Ok(content.trim().to_string())
    } else {
        Err(ValidationError::single(Field::Content))
    }
}

/// Re-checks a record that did not come through `validate_report`, such as
/// one read back from a snapshot.
pub fn validate_stored_report(report: &Report) -> Result<(), ValidationError> {
    let mut fields = BTreeSet::new();
    if !is_non_empty_trimmed(&report.work_completed) {
        fields.insert(Field::WorkCompleted);
    }
    if !is_valid_percent(i64::from(report.progress_percent)) {
        fields.insert(Field::ProgressPercent);
    }
    if !is_non_empty_trimmed(&report.work_remaining) {
        fields.insert(Field::WorkRemaining);
    }
    if fields.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { fields })
    }
}

pub fn validate_stored_message(message: &Message) -> Result<(), ValidationError> {
    validate_message_content(&message.content).map(|_| ())
}

/// Blank optional text (engineer, author, notes) counts as absent.
pub fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
