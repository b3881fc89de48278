//! Catalog Policy Merge - Statement merge engine
//!
//! Pure functions over an in-memory [`PolicyDocument`]. No I/O happens here;
//! the reconciler fetches and writes the document around these calls.
//!
//! Both operations borrow their input and return a new document, so the
//! fetched snapshot stays available for logging after the merge. Uniqueness
//! of `Sid` values is maintained by filter-then-append: every statement
//! carrying the target `Sid` is dropped before the replacement is appended,
//! which also cleans up duplicates left behind by external edits.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

use catalog_policy_types::{PolicyDocument, Statement, StatementId};

/// Add or replace the statement owned by `sid`.
///
/// Any existing statement with the same `Sid` is removed, then `statement`
/// is appended with its `Sid` forced to `sid`. Untouched statements keep
/// their relative order; the version and any other top-level fields are
/// preserved.
pub fn upsert_statement(
    policy: &PolicyDocument,
    sid: &StatementId,
    statement: &Statement,
) -> PolicyDocument {
    let mut statements = retain_others(policy, sid);
    statements.push(statement.with_sid(sid));
    policy.with_statements(statements)
}

/// Remove the statement owned by `sid`.
///
/// Removing an identifier that is not present returns an equal document.
pub fn remove_statement(policy: &PolicyDocument, sid: &StatementId) -> PolicyDocument {
    policy.with_statements(retain_others(policy, sid))
}

/// True when the document holds a statement with this `Sid`.
pub fn contains_statement(policy: &PolicyDocument, sid: &StatementId) -> bool {
    policy.statements.iter().any(|s| s.has_sid(sid))
}

/// `Sid` values that appear more than once, in first-seen order.
pub fn duplicate_sids(policy: &PolicyDocument) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut duplicates = Vec::new();
    for sid in policy.sids() {
        if !seen.insert(sid) && !duplicates.iter().any(|d: &String| d == sid) {
            duplicates.push(sid.to_string());
        }
    }
    duplicates
}

fn retain_others(policy: &PolicyDocument, sid: &StatementId) -> Vec<Statement> {
    policy
        .statements
        .iter()
        .filter(|s| !s.has_sid(sid))
        .cloned()
        .collect()
}
