//! Status aggregation: test results and states to requirement statuses
//!
//! Pure functions; the builder feeds them a consistent snapshot taken under
//! its lock.

use crate::requirements::DerivedRequirement;
use crate::types::{ResultStatus, TestResult, TestState, TestStatus};

/// Severity of a single test outcome for a given requirement
///
/// PASS and INFORMATIONAL collapse to INFORMATIONAL only for informational
/// requirements; otherwise to PASS.
pub fn test_status_to_result(status: TestStatus, requirement: &DerivedRequirement) -> ResultStatus {
    match status {
        TestStatus::Fail => ResultStatus::Fail,
        TestStatus::Warning => ResultStatus::Warning,
        TestStatus::Pass | TestStatus::Informational => passing_status(requirement),
    }
}

fn passing_status(requirement: &DerivedRequirement) -> ResultStatus {
    if requirement.is_informational() {
        ResultStatus::Informational
    } else {
        ResultStatus::Pass
    }
}

/// Final status of a derived requirement
pub fn derived_status(
    in_scope: bool,
    requirement: &DerivedRequirement,
    state: TestState,
    results: &[TestResult],
) -> ResultStatus {
    if !in_scope {
        return ResultStatus::NotInScope;
    }

    let from_results = results
        .iter()
        .map(|r| test_status_to_result(r.status(), requirement))
        .reduce(ResultStatus::escalate);

    if let Some(status) = from_results {
        return status;
    }

    match state {
        TestState::NotApplicable => ResultStatus::NotApplicable,
        TestState::Tested => passing_status(requirement),
        TestState::NotTested => ResultStatus::NotTested,
    }
}

/// Final status of a base requirement: the maximum over its derived statuses
pub fn base_status<I>(in_scope: bool, derived_statuses: I) -> ResultStatus
where
    I: IntoIterator<Item = ResultStatus>,
{
    if !in_scope {
        return ResultStatus::NotInScope;
    }

    derived_statuses
        .into_iter()
        .max()
        .unwrap_or(ResultStatus::NotTested)
}
