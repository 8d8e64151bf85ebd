use std::collections::HashSet;

/// Tracks which entry identities have already been recorded
///
/// Empty identities are never stored: every entry without an identity is
/// treated as new, so they never collide with each other or with anything else.
#[derive(Debug, Default, Clone)]
pub struct DedupLedger {
    seen: HashSet<String>,
    duplicates: usize,
    anonymous: usize,
}

impl DedupLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observes an identity and reports whether the entry should be kept
    ///
    /// * non-empty and unseen: recorded, returns `true`
    /// * already seen: nothing changes in the seen set, returns `false`
    /// * empty: not recorded, always returns `true`
    pub fn observe(&mut self, id: &str) -> bool {
        if id.is_empty() {
            self.anonymous += 1;
            return true;
        }

        if self.seen.contains(id) {
            self.duplicates += 1;
            return false;
        }

        self.seen.insert(id.to_string());
        true
    }

    /// Returns true if the identity was already recorded
    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    /// Number of distinct non-empty identities recorded
    pub fn distinct(&self) -> usize {
        self.seen.len()
    }

    /// Number of observations rejected as repeats
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    /// Number of entries admitted without an identity
    pub fn anonymous(&self) -> usize {
        self.anonymous
    }

    /// Total number of accepted observations
    pub fn accepted(&self) -> usize {
        self.seen.len() + self.anonymous
    }
}
