//! Assertion helpers for lifecycle testing

#![allow(dead_code)]

use tmca_host::MessageLevel;
use tmca_lifecycle::{AbortReason, Failure, Outcome, SkipReason, StepJournal};

use super::mocks::{Call, MockHost};

/// Assert the operation completed and return its journal
pub fn assert_completed(outcome: &Outcome) -> &StepJournal {
    match outcome {
        Outcome::Completed(journal) => journal,
        other => panic!("Expected Completed, got {:?}", other),
    }
}

/// Assert the operation was aborted for `reason` and return its journal
pub fn assert_aborted(outcome: &Outcome, reason: AbortReason) -> &StepJournal {
    match outcome {
        Outcome::Aborted(r, journal) => {
            assert_eq!(*r, reason);
            journal
        }
        other => panic!("Expected Aborted({:?}), got {:?}", reason, other),
    }
}

pub fn assert_skipped(outcome: &Outcome, reason: SkipReason) {
    match outcome {
        Outcome::Skipped(r) => assert_eq!(*r, reason),
        other => panic!("Expected Skipped({:?}), got {:?}", reason, other),
    }
}

pub fn assert_failed(outcome: &Outcome) -> &Failure {
    match outcome {
        Outcome::Failed(failure) => failure,
        other => panic!("Expected Failed, got {:?}", other),
    }
}

/// Nothing on the host was changed and no service was touched
pub fn assert_no_mutation(mock: &MockHost) {
    let mutations = mock.mutations();
    assert!(
        mutations.is_empty(),
        "Expected no mutation, got {:?}",
        mutations
    );
}

/// Units stopped by the interlock are exactly the units started afterwards
pub fn assert_stopped_then_restarted(mock: &MockHost, units: &[&str]) {
    let expected: Vec<String> = units.iter().map(|u| u.to_string()).collect();
    let calls = mock.calls();

    let stop = calls
        .iter()
        .position(|c| *c == Call::Stop(expected.clone()))
        .unwrap_or_else(|| panic!("{:?} were never stopped: {:?}", units, calls));
    let start = calls
        .iter()
        .rposition(|c| *c == Call::Start(expected.clone()))
        .unwrap_or_else(|| panic!("{:?} were never restarted: {:?}", units, calls));

    assert!(stop < start, "Restart happened before stop");
    assert_eq!(
        calls.iter().filter(|c| matches!(c, Call::Start(_))).count(),
        1,
        "Stopped instances must be started exactly once"
    );
}

pub fn assert_message(mock: &MockHost, level: MessageLevel, text: &str) {
    let messages = mock.messages();
    assert!(
        messages
            .iter()
            .any(|(l, m)| *l == level && m.contains(text)),
        "No {:?} message containing '{}' in {:?}",
        level,
        text,
        messages
    );
}

pub fn assert_prompted(mock: &MockHost, fragment: &str) {
    let prompts = mock.prompts();
    assert!(
        prompts.iter().any(|q| q.contains(fragment)),
        "Never asked '{}': {:?}",
        fragment,
        prompts
    );
}
