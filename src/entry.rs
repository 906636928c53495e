//! Form-side validation and the thin entry lifecycle.
//!
//! Validation failures are recoverable by design: they block submission and
//! go back to the form, never past it. The store layer stays permissive
//! (over-capacity sequences are truncated at the boundary, not rejected);
//! everything length- and range-shaped is enforced here.

use serde::Serialize;

use crate::{
    model::{DESCRIPTION_MAX, LOCATION_MAX, REFERENCE_MAX, TAG_MAX, TITLE_MAX},
    size, ArtifactRecord, AppError, AppResult,
};

/// One field-level validation failure, suitable for inline form feedback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationIssue {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn check_len(issues: &mut Vec<ValidationIssue>, field: &str, value: &str, max: usize) {
    if value.chars().count() > max {
        issues.push(ValidationIssue::new(
            field,
            format!("Must be at most {max} characters"),
        ));
    }
}

/// Collect every validation issue for a draft record.
pub fn issues(record: &ArtifactRecord) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if record.title.trim().is_empty() {
        issues.push(ValidationIssue::new("title", "Please provide a title"));
    } else {
        check_len(&mut issues, "title", &record.title, TITLE_MAX);
    }

    if record.description.trim().is_empty() {
        issues.push(ValidationIssue::new(
            "description",
            "Please provide a description",
        ));
    } else {
        check_len(&mut issues, "description", &record.description, DESCRIPTION_MAX);
    }

    for (i, reference) in record.references.iter().enumerate() {
        check_len(
            &mut issues,
            &format!("reference_{}", i + 1),
            reference,
            REFERENCE_MAX,
        );
    }

    if let Some(location) = &record.location {
        check_len(&mut issues, "location", location, LOCATION_MAX);
    }

    for (field, value) in [
        ("length", &record.size.length),
        ("width", &record.size.width),
        ("height", &record.size.height),
    ] {
        if let Some(value) = value {
            if let Err(err) = size::validate_dimension(field, value) {
                issues.push(ValidationIssue::new(field, err.message().to_string()));
            }
        }
    }

    for (i, tag) in record.tags.iter().enumerate() {
        check_len(&mut issues, &format!("tag_{}", i + 1), tag, TAG_MAX);
    }

    issues
}

/// Validate a draft record, aggregating all issues into one error.
pub fn validate(record: &ArtifactRecord) -> AppResult<()> {
    let found = issues(record);
    if found.is_empty() {
        return Ok(());
    }
    let mut err = AppError::new("VALIDATION/FAILED", "Record failed validation");
    for issue in &found {
        err = err.with_context(issue.field.clone(), issue.message.clone());
    }
    Err(err)
}

/// Entry lifecycle. `Rendered` and `Deleted` are terminal; the only way to
/// reach `Saved` is through a successful validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    Drafting,
    Valid,
    Saved,
    Rendered,
    Deleted,
}

impl EntryState {
    /// Submit a draft: `Drafting -> Valid`, or back to `Drafting` with the
    /// validation error for the form to display.
    pub fn submit(self, record: &ArtifactRecord) -> (EntryState, AppResult<()>) {
        match self {
            EntryState::Drafting => match validate(record) {
                Ok(()) => (EntryState::Valid, Ok(())),
                Err(err) => (EntryState::Drafting, Err(err)),
            },
            other => (
                other,
                Err(AppError::new("ENTRY/STATE", "Only a draft can be submitted")),
            ),
        }
    }

    /// Record a successful store save: `Valid -> Saved`.
    pub fn saved(self) -> AppResult<EntryState> {
        match self {
            EntryState::Valid => Ok(EntryState::Saved),
            _ => Err(AppError::new(
                "ENTRY/STATE",
                "Only a validated entry can be saved",
            )),
        }
    }

    /// Record a rendered document: `Saved -> Rendered` (terminal).
    pub fn rendered(self) -> AppResult<EntryState> {
        match self {
            EntryState::Saved => Ok(EntryState::Rendered),
            _ => Err(AppError::new(
                "ENTRY/STATE",
                "Only a saved entry can be rendered",
            )),
        }
    }

    /// Record a confirmed delete: `Saved -> Deleted` (terminal).
    pub fn deleted(self) -> AppResult<EntryState> {
        match self {
            EntryState::Saved => Ok(EntryState::Deleted),
            _ => Err(AppError::new(
                "ENTRY/STATE",
                "Only a saved entry can be deleted",
            )),
        }
    }
}
