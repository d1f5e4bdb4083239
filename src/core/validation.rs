// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Rule-based validation of recording trees.

use super::error::{RapError, Result};
use super::recording::Recording;

/// A validation rule applied by [`validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationOption {
    /// When enabled, capture times must be non-decreasing in every collection.
    RequireChronologicalCapture(bool),
}

/// Check a recording tree against the given rules.
///
/// Options are folded in order, so a later option overrides an earlier one.
/// Rules are applied to every node in pre-order and the first violation is
/// returned.
pub fn validate(recording: &Recording, options: &[ValidationOption]) -> Result<()> {
    let chronological = options.iter().fold(false, |_, option| match option {
        ValidationOption::RequireChronologicalCapture(enabled) => *enabled,
    });

    if chronological {
        check_chronological(recording)?;
    }
    Ok(())
}

fn check_chronological(recording: &Recording) -> Result<()> {
    for collection in recording.collections() {
        let times = collection.times();
        if times.windows(2).any(|w| w[1] < w[0]) {
            return Err(RapError::validation(format!(
                "[{}] {}: {} capture collection violates chronological event validator",
                recording.id(),
                recording.name(),
                collection.name()
            )));
        }
    }
    for child in recording.recordings() {
        check_chronological(child)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::capture::PositionCapture;
    use crate::core::collection::Collection;
    use crate::core::error::ErrorKind;

    fn with_times(times: &[f64]) -> Recording {
        let captures = times
            .iter()
            .map(|&t| PositionCapture::new(t, 0.0, 0.0, 0.0))
            .collect();
        Recording::builder("rec")
            .id("abc")
            .collection(Collection::new("path", captures))
            .build()
    }

    #[test]
    fn test_rejects_out_of_order() {
        let rec = with_times(&[1.0, 4.0, 3.0, 7.0]);
        let err = validate(&rec, &[ValidationOption::RequireChronologicalCapture(true)])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(
            err.to_string(),
            "[abc] rec: path capture collection violates chronological event validator"
        );
    }

    #[test]
    fn test_accepts_equal_times() {
        let rec = with_times(&[1.0, 1.0, 2.0]);
        assert!(validate(&rec, &[ValidationOption::RequireChronologicalCapture(true)]).is_ok());
    }

    #[test]
    fn test_disabled_rule() {
        let rec = with_times(&[3.0, 1.0]);
        assert!(validate(&rec, &[ValidationOption::RequireChronologicalCapture(false)]).is_ok());
        assert!(validate(&rec, &[]).is_ok());
    }

    #[test]
    fn test_last_option_wins() {
        use super::ValidationOption::RequireChronologicalCapture as Chronological;
        let rec = with_times(&[3.0, 1.0]);
        assert!(validate(&rec, &[Chronological(true), Chronological(false)]).is_ok());
        assert!(validate(&rec, &[Chronological(false), Chronological(true)]).is_err());
    }

    #[test]
    fn test_checks_children() {
        let child = with_times(&[2.0, 1.0]);
        let root = Recording::builder("root").id("r").child(child).build();
        let err = validate(&root, &[ValidationOption::RequireChronologicalCapture(true)])
            .unwrap_err();
        assert!(err.to_string().starts_with("[abc] rec: path"));
    }
}
