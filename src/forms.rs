//! Typed request schemas for the competition forms.
//!
//! Bodies are decoded leniently (every field as text, missing fields empty) so that a bad
//! submission always reaches validation and re-renders the form, instead of being rejected by
//! the extractor.

use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::error::{AppError, AppResult};
use crate::models::{CompetitionUpdate, NewCompetition};

pub const NAME_MIN: u64 = 3;
pub const NAME_MAX: u64 = 50;
pub const DESCRIPTION_MIN: u64 = 3;
pub const DESCRIPTION_MAX: u64 = 1000;

/// Body of `POST /competitions/add`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct AddCompetitionForm {
    #[validate(length(min = NAME_MIN, max = NAME_MAX))]
    pub name: String,

    #[validate(length(min = DESCRIPTION_MIN, max = DESCRIPTION_MAX))]
    pub description: String,

    #[validate(custom(function = "validate_iso_date"))]
    pub apply_till: String,
}

/// Body of `POST /competitions/edit`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct EditCompetitionForm {
    #[validate(custom(function = "validate_positive_id"))]
    pub id: String,

    #[validate(length(min = NAME_MIN, max = NAME_MAX))]
    pub name: String,

    #[validate(length(min = DESCRIPTION_MIN, max = DESCRIPTION_MAX))]
    pub description: String,

    #[validate(custom(function = "validate_iso_date"))]
    pub apply_till: String,
}

/// Body of `POST /competitions/scoreUpdate/{id}`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ScoreForm {
    pub score: String,
    pub competition_id: String,
}

impl AddCompetitionForm {
    /// Validates the submission and converts it into a command. `None` means the form is invalid.
    pub fn into_command(self) -> Option<NewCompetition> {
        self.validate().ok()?;
        Some(NewCompetition {
            apply_till: parse_iso_date(&self.apply_till)?,
            name: self.name,
            description: self.description,
        })
    }
}

impl EditCompetitionForm {
    pub fn into_command(self) -> Option<CompetitionUpdate> {
        self.validate().ok()?;
        Some(CompetitionUpdate {
            id: parse_positive_id(&self.id)?,
            apply_till: parse_iso_date(&self.apply_till)?,
            name: self.name,
            description: self.description,
        })
    }
}

impl ScoreForm {
    /// An empty score clears it. Anything else must be a finite number.
    pub fn score(&self) -> AppResult<Option<f64>> {
        let raw = self.score.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        match raw.parse::<f64>() {
            Ok(score) if score.is_finite() => Ok(Some(score)),
            _ => Err(AppError::InvalidCall),
        }
    }

    pub fn competition_id(&self) -> Option<i64> {
        parse_positive_id(&self.competition_id)
    }
}

/// Accepts a calendar date (`2025-12-01`) or a full RFC 3339 timestamp, keeping only its date.
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// Strictly positive integer, as used for every record id.
pub fn parse_positive_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|id| *id > 0)
}

fn validate_iso_date(value: &str) -> Result<(), ValidationError> {
    match parse_iso_date(value) {
        Some(_) => Ok(()),
        None => Err(ValidationError::new("iso_date")),
    }
}

fn validate_positive_id(value: &str) -> Result<(), ValidationError> {
    match parse_positive_id(value) {
        Some(_) => Ok(()),
        None => Err(ValidationError::new("positive_id")),
    }
}
