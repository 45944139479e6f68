//! On-disk save format.
//!
//! A snapshot is a JSON object with `unlockedLevels`, `completedLevels` and
//! `wealth`. Decoding is all-or-nothing: the parsed value must pass
//! [`ProgressionState::validate`] or it is rejected as a whole.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::state::{InvalidState, ProgressionState};
use crate::course::{CourseCatalog, LevelId};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot {
    // null and absent both mean "use the default"
    #[serde(default)]
    unlocked_levels: Option<Vec<LevelId>>,
    #[serde(default)]
    completed_levels: Option<Vec<LevelId>>,
    #[serde(default)]
    wealth: Option<u64>,
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("malformed save: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("save is not a JSON object")]
    NotAnObject,

    #[error("inconsistent save: {0}")]
    Invalid(#[from] InvalidState),
}

pub fn encode(state: &ProgressionState) -> Result<String, serde_json::Error> {
    let snapshot = Snapshot {
        unlocked_levels: Some(state.unlocked.iter().copied().collect()),
        completed_levels: Some(state.completed.iter().copied().collect()),
        wealth: Some(state.wealth),
    };
    serde_json::to_string_pretty(&snapshot)
}

pub fn decode(contents: &str, catalog: &CourseCatalog) -> Result<ProgressionState, SnapshotError> {
    let value: serde_json::Value = serde_json::from_str(contents)?;
    if !value.is_object() {
        return Err(SnapshotError::NotAnObject);
    }
    let snapshot: Snapshot = serde_json::from_value(value)?;
    let state = ProgressionState::new(
        snapshot.unlocked_levels.unwrap_or_else(|| vec![1]),
        snapshot.completed_levels.unwrap_or_default(),
        snapshot.wealth.unwrap_or(0),
    );
    state.validate(catalog)?;
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course::catalog::test_support::catalog;

    #[test]
    fn encodes_camel_case_fields() {
        let state = ProgressionState::new([1, 2], [1], 1000);
        let json: serde_json::Value = serde_json::from_str(&encode(&state).unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "unlockedLevels": [1, 2],
                "completedLevels": [1],
                "wealth": 1000
            })
        );
    }

    #[test]
    fn decodes_saved_state() {
        let catalog = catalog(4);
        let state = decode(
            r#"{"unlockedLevels":[2,1,3],"completedLevels":[2,1],"wealth":2000}"#,
            &catalog,
        )
        .unwrap();
        assert_eq!(state, ProgressionState::new([1, 2, 3], [1, 2], 2000));
    }

    #[test]
    fn missing_and_null_fields_take_defaults() {
        let catalog = catalog(4);
        assert_eq!(decode("{}", &catalog).unwrap(), ProgressionState::default());
        assert_eq!(
            decode(r#"{"unlockedLevels":null,"wealth":null}"#, &catalog).unwrap(),
            ProgressionState::default()
        );
    }

    #[test]
    fn duplicates_collapse() {
        let catalog = catalog(4);
        let state = decode(
            r#"{"unlockedLevels":[1,1,2],"completedLevels":[1,1],"wealth":1000}"#,
            &catalog,
        )
        .unwrap();
        assert_eq!(state, ProgressionState::new([1, 2], [1], 1000));
    }

    #[test]
    fn rejects_malformed_payloads() {
        let catalog = catalog(4);
        for bad in [
            "",
            "not json",
            "{\"unlockedLevels\": [1,",
            r#"{"wealth":"lots"}"#,
            r#"{"wealth":-1000}"#,
            r#"{"unlockedLevels":"1"}"#,
            r#"{"completedLevels":[1.5]}"#,
        ] {
            assert!(
                matches!(decode(bad, &catalog), Err(SnapshotError::Malformed(_))),
                "accepted {bad:?}"
            );
        }
        for not_object in ["[]", "[[1], [], 0]", "null", "42"] {
            assert!(matches!(
                decode(not_object, &catalog),
                Err(SnapshotError::NotAnObject)
            ));
        }
    }

    #[test]
    fn rejects_partial_repairs() {
        let catalog = catalog(4);
        // completed level with default wealth would be a hybrid state
        assert!(matches!(
            decode(r#"{"unlockedLevels":[1,2],"completedLevels":[1]}"#, &catalog),
            Err(SnapshotError::Invalid(InvalidState::WealthMismatch { .. }))
        ));
        assert!(matches!(
            decode(
                r#"{"unlockedLevels":[1,2,3,4,5],"completedLevels":[1,2,3,4],"wealth":4000}"#,
                &catalog
            ),
            Err(SnapshotError::Invalid(InvalidState::UnknownLevel(5)))
        ));
        // completed level whose successor was left locked
        assert!(matches!(
            decode(r#"{"completedLevels":[1],"wealth":1000}"#, &catalog),
            Err(SnapshotError::Invalid(InvalidState::SuccessorLocked(1)))
        ));
    }
}
