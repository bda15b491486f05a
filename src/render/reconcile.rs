use serde::{Deserialize, Serialize};

/// Keyed enter/update/exit classification between two renders.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReconcileDiff {
    pub entered: Vec<String>,
    pub updated: Vec<String>,
    pub unchanged: Vec<String>,
    pub exited: Vec<String>,
}

impl ReconcileDiff {
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.entered.is_empty() && self.updated.is_empty() && self.exited.is_empty()
    }
}

/// Compares keyed element sets. Keys present only in `next` entered, keys
/// present only in `previous` exited; shared keys are updated when their
/// payload differs. Output follows `next` order, exits follow `previous`.
#[must_use]
pub fn reconcile<T: PartialEq>(previous: &[(String, T)], next: &[(String, T)]) -> ReconcileDiff {
    let mut diff = ReconcileDiff::default();

    for (key, value) in next {
        match previous.iter().find(|(old_key, _)| old_key == key) {
            None => diff.entered.push(key.clone()),
            Some((_, old)) if old != value => diff.updated.push(key.clone()),
            Some(_) => diff.unchanged.push(key.clone()),
        }
    }
    for (key, _) in previous {
        if !next.iter().any(|(new_key, _)| new_key == key) {
            diff.exited.push(key.clone());
        }
    }
    diff
}

/// Diff that removes everything previously drawn and enters everything new,
/// used when the element vocabulary changes (stack toggle, chart switch).
#[must_use]
pub fn replace_all<T>(previous: &[(String, T)], next: &[(String, T)]) -> ReconcileDiff {
    ReconcileDiff {
        entered: next.iter().map(|(key, _)| key.clone()).collect(),
        updated: Vec::new(),
        unchanged: Vec::new(),
        exited: previous.iter().map(|(key, _)| key.clone()).collect(),
    }
}
