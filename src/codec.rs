//! Import and export of progress documents
//!
//! An export document is the progress map and start date wrapped with an
//! export timestamp and a format version. Imports are validated completely
//! before anything is returned, so a rejected document never touches the
//! current state.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::calendar;
use crate::plan::PlanCatalog;
use crate::progress::{DayProgress, ProgressMap, TrackerState};

/// Version written into every export
pub const FORMAT_VERSION: &str = "1.0";

/// Errors that can occur when importing a progress document
#[derive(Debug, Error)]
pub enum ImportError {
    /// The input is not a JSON object
    #[error("Not a valid progress file: {0}")]
    ParseFailure(String),

    /// A required top-level field is absent or null
    #[error("Progress file is missing the `{0}` field")]
    MissingField(&'static str),

    /// A progress entry is malformed or out of range
    #[error("Invalid progress entry `{key}`: {reason}")]
    InvalidEntry {
        /// Progress key as written in the document
        key: String,
        /// What was wrong with it
        reason: String,
    },

    /// The start date is not an ISO-8601 timestamp
    #[error("Invalid start date `{0}`")]
    InvalidStartDate(String),

    /// The document was written by an incompatible format version
    #[error("Unsupported progress file version `{0}`")]
    UnsupportedVersion(String),
}

impl ImportError {
    fn entry(key: &str, reason: impl Into<String>) -> Self {
        ImportError::InvalidEntry { key: key.to_string(), reason: reason.into() }
    }
}

/// The exported JSON document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub progress: ProgressMap,
    pub start_date: Option<DateTime<Utc>>,
    pub export_date: DateTime<Utc>,
    pub version: String,
}

/// Wrap the current state in an export document
pub fn export_document(
    progress: &ProgressMap,
    start_date: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> ExportDocument {
    ExportDocument {
        progress: progress.clone(),
        start_date,
        export_date: now,
        version: FORMAT_VERSION.to_string(),
    }
}

/// Pretty-printed JSON for an export document
pub fn export_json(document: &ExportDocument) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(document)
}

/// Suggested file name for an export made at `now`
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("dsa-progress-{}.json", calendar::civil_date_key(now))
}

/// Validate and decode a progress document against a plan
pub fn import_document(raw: &str, plan: &PlanCatalog) -> Result<TrackerState, ImportError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| ImportError::ParseFailure(e.to_string()))?;
    let Value::Object(document) = value else {
        return Err(ImportError::ParseFailure("expected a JSON object".to_string()));
    };

    let progress = present(&document, "progress")?;
    let start_date = present(&document, "startDate")?;

    if let Some(version) = document.get("version").filter(|v| !v.is_null()) {
        check_version(version)?;
    }

    let Value::Object(entries) = progress else {
        return Err(ImportError::entry("progress", "expected an object of days"));
    };

    // "1", "01" and " 1" name the same day
    let mut days = BTreeMap::new();
    for (key, entry) in entries {
        let day = parse_day_key(key, plan)?;
        let progress = parse_entry(key, entry)?;
        if days.insert(day, progress).is_some() {
            return Err(ImportError::entry(key, format!("day {day} appears more than once")));
        }
    }
    let progress: ProgressMap = days.into_iter().collect();

    let start_date = match start_date {
        Value::String(s) => parse_timestamp(s)
            .ok_or_else(|| ImportError::InvalidStartDate(s.clone()))?,
        other => return Err(ImportError::InvalidStartDate(other.to_string())),
    };

    Ok(TrackerState { progress, start_date: Some(start_date) })
}

fn present<'a>(document: &'a Map<String, Value>, field: &'static str) -> Result<&'a Value, ImportError> {
    document.get(field).filter(|v| !v.is_null()).ok_or(ImportError::MissingField(field))
}

fn check_version(version: &Value) -> Result<(), ImportError> {
    let text = match version {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let major = text.split('.').next().unwrap_or_default().trim();
    if major == "1" { Ok(()) } else { Err(ImportError::UnsupportedVersion(text)) }
}

fn parse_day_key(key: &str, plan: &PlanCatalog) -> Result<u32, ImportError> {
    let day: u32 = key
        .trim()
        .parse()
        .map_err(|_| ImportError::entry(key, "day must be a whole number"))?;
    if plan.contains(day) {
        Ok(day)
    } else {
        Err(ImportError::entry(key, format!("day must be between 1 and {}", plan.total_days())))
    }
}

fn parse_entry(key: &str, entry: &Value) -> Result<DayProgress, ImportError> {
    let Value::Object(fields) = entry else {
        return Err(ImportError::entry(key, "expected an object"));
    };

    let completed = match fields.get("completed") {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(_) => return Err(ImportError::entry(key, "`completed` must be true or false")),
    };

    let completed_at = match fields.get("completedAt") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(
            parse_timestamp(s)
                .ok_or_else(|| ImportError::entry(key, "`completedAt` is not a timestamp"))?,
        ),
        Some(_) => return Err(ImportError::entry(key, "`completedAt` must be a string")),
    };

    let problems_solved = match fields.get("problemsSolved") {
        None | Some(Value::Null) => 0,
        Some(Value::Number(n)) => {
            if n.as_i64().is_some_and(|v| v < 0) || n.as_f64().is_some_and(|v| v < 0.0) {
                return Err(ImportError::entry(key, "`problemsSolved` cannot be negative"));
            }
            n.as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| ImportError::entry(key, "`problemsSolved` must be a whole number"))?
        }
        Some(_) => return Err(ImportError::entry(key, "`problemsSolved` must be a number")),
    };

    Ok(DayProgress { completed, completed_at, problems_solved })
}

fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text.trim()).ok().map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::dsa_35;
    use chrono::{TimeDelta, TimeZone};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 8, 15, 12, 0, 0).unwrap()
    }

    fn sample() -> TrackerState {
        let progress: ProgressMap = [
            (
                1,
                DayProgress {
                    completed: true,
                    completed_at: Some(Utc.with_ymd_and_hms(2024, 8, 1, 14, 0, 0).unwrap()),
                    problems_solved: 13,
                },
            ),
            (2, DayProgress { completed: false, completed_at: None, problems_solved: 4 }),
        ]
        .into_iter()
        .collect();
        TrackerState { progress, start_date: Some(Utc.with_ymd_and_hms(2024, 8, 1, 3, 0, 0).unwrap()) }
    }

    #[test]
    fn export_has_the_documented_fields() {
        let state = sample();
        let document = export_document(&state.progress, state.start_date, now());
        let json: Value = serde_json::from_str(&export_json(&document).unwrap()).unwrap();

        assert_eq!(json["version"], "1.0");
        assert!(json["exportDate"].is_string());
        assert!(json["startDate"].is_string());
        assert_eq!(json["progress"]["1"]["problemsSolved"], 13);
        assert_eq!(json["progress"]["2"]["completedAt"], Value::Null);
    }

    #[test]
    fn export_round_trips() {
        let state = sample();
        let json = export_json(&export_document(&state.progress, state.start_date, now())).unwrap();
        assert_eq!(import_document(&json, dsa_35()).unwrap(), state);
    }

    #[test]
    fn export_file_name_uses_ist_date() {
        // 20:00 UTC on Aug 15 is already Aug 16 in India
        let late = Utc.with_ymd_and_hms(2024, 8, 15, 20, 0, 0).unwrap();
        assert_eq!(export_file_name(late), "dsa-progress-2024-08-16.json");
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(matches!(import_document("{not json", dsa_35()), Err(ImportError::ParseFailure(_))));
        assert!(matches!(import_document("[1, 2]", dsa_35()), Err(ImportError::ParseFailure(_))));
    }

    #[test]
    fn rejects_missing_fields() {
        let err = import_document(r#"{"startDate": "2024-08-01T00:00:00Z"}"#, dsa_35()).unwrap_err();
        assert!(matches!(err, ImportError::MissingField("progress")));

        let err = import_document(r#"{"progress": {}}"#, dsa_35()).unwrap_err();
        assert!(matches!(err, ImportError::MissingField("startDate")));

        let err = import_document(r#"{"progress": {}, "startDate": null}"#, dsa_35()).unwrap_err();
        assert!(matches!(err, ImportError::MissingField("startDate")));
    }

    #[test]
    fn rejects_out_of_range_days() {
        let raw = r#"{"progress": {"36": {"problemsSolved": 3}}, "startDate": "2024-08-01T00:00:00Z"}"#;
        match import_document(raw, dsa_35()) {
            Err(ImportError::InvalidEntry { key, .. }) => assert_eq!(key, "36"),
            other => panic!("expected InvalidEntry, got {other:?}"),
        }

        let raw = r#"{"progress": {"0": {}}, "startDate": "2024-08-01T00:00:00Z"}"#;
        assert!(matches!(import_document(raw, dsa_35()), Err(ImportError::InvalidEntry { .. })));

        let raw = r#"{"progress": {"day1": {}}, "startDate": "2024-08-01T00:00:00Z"}"#;
        assert!(matches!(import_document(raw, dsa_35()), Err(ImportError::InvalidEntry { .. })));
    }

    #[test]
    fn rejects_the_same_day_twice() {
        let raw = r#"{
            "progress": {"1": {"problemsSolved": 13}, "01": {"problemsSolved": 2}},
            "startDate": "2024-08-01T00:00:00Z"
        }"#;
        match import_document(raw, dsa_35()) {
            Err(ImportError::InvalidEntry { reason, .. }) => {
                assert_eq!(reason, "day 1 appears more than once")
            }
            other => panic!("expected InvalidEntry, got {other:?}"),
        }
    }

    #[test]
    fn rejects_negative_or_fractional_counts() {
        let raw = r#"{"progress": {"3": {"problemsSolved": -1}}, "startDate": "2024-08-01T00:00:00Z"}"#;
        assert!(matches!(import_document(raw, dsa_35()), Err(ImportError::InvalidEntry { .. })));

        let raw = r#"{"progress": {"3": {"problemsSolved": 2.5}}, "startDate": "2024-08-01T00:00:00Z"}"#;
        assert!(matches!(import_document(raw, dsa_35()), Err(ImportError::InvalidEntry { .. })));

        let raw = r#"{"progress": {"3": {"problemsSolved": "7"}}, "startDate": "2024-08-01T00:00:00Z"}"#;
        assert!(matches!(import_document(raw, dsa_35()), Err(ImportError::InvalidEntry { .. })));
    }

    #[test]
    fn rejects_mistyped_completion_fields() {
        let raw = r#"{"progress": {"3": {"completed": "yes"}}, "startDate": "2024-08-01T00:00:00Z"}"#;
        assert!(matches!(import_document(raw, dsa_35()), Err(ImportError::InvalidEntry { .. })));

        let raw = r#"{"progress": {"3": {"completedAt": "yesterday"}}, "startDate": "2024-08-01T00:00:00Z"}"#;
        assert!(matches!(import_document(raw, dsa_35()), Err(ImportError::InvalidEntry { .. })));
    }

    #[test]
    fn rejects_bad_start_dates_and_versions() {
        let raw = r#"{"progress": {}, "startDate": "next monday"}"#;
        assert!(matches!(import_document(raw, dsa_35()), Err(ImportError::InvalidStartDate(_))));

        let raw = r#"{"progress": {}, "startDate": "2024-08-01T00:00:00Z", "version": "2.0"}"#;
        assert!(matches!(import_document(raw, dsa_35()), Err(ImportError::UnsupportedVersion(_))));
    }

    #[test]
    fn accepts_browser_exports() {
        let raw = r#"{
            "progress": {
                "1": {"completed": true, "completedAt": "2024-08-01T14:00:00.000Z", "problemsSolved": 13},
                "2": {"problemsSolved": 0}
            },
            "startDate": "2024-08-01T03:00:00.000Z",
            "exportDate": "2024-08-02T10:00:00.000Z",
            "version": "1.0"
        }"#;
        let state = import_document(raw, dsa_35()).unwrap();
        assert_eq!(state.progress.len(), 2);
        assert!(state.progress.day(1).completed);
        assert_eq!(state.start_date, Some(Utc.with_ymd_and_hms(2024, 8, 1, 3, 0, 0).unwrap()));
    }

    #[test]
    fn accepts_documents_without_version() {
        let raw = r#"{"progress": {"5": {"problemsSolved": 2}}, "startDate": "2024-08-01T00:00:00+05:30"}"#;
        let state = import_document(raw, dsa_35()).unwrap();
        assert_eq!(state.progress.day(5).problems_solved, 2);
        assert_eq!(state.start_date, Some(Utc.with_ymd_and_hms(2024, 7, 31, 18, 30, 0).unwrap()));
    }

    fn arb_state() -> impl Strategy<Value = TrackerState> {
        let entry = (any::<bool>(), 0u32..500, 0i64..(400 * 86_400), 0u32..1_000_000_000);
        (prop::collection::btree_map(1u32..=35, entry, 0..20), 0i64..(400 * 86_400)).prop_map(
            |(entries, start_offset)| {
                let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
                let progress = entries
                    .into_iter()
                    .map(|(day, (completed, solved, secs, nanos))| {
                        let at = base + TimeDelta::seconds(secs) + TimeDelta::nanoseconds(i64::from(nanos));
                        let completed_at = completed.then_some(at);
                        (day, DayProgress { completed, completed_at, problems_solved: solved })
                    })
                    .collect();
                TrackerState { progress, start_date: Some(base + TimeDelta::seconds(start_offset)) }
            },
        )
    }

    proptest! {
        #[test]
        fn import_reverses_export(state in arb_state()) {
            let document = export_document(&state.progress, state.start_date, now());
            let json = export_json(&document).unwrap();
            prop_assert_eq!(import_document(&json, dsa_35()).unwrap(), state);
        }
    }
}
