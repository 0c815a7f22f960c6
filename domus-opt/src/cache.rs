//! Fine-tuned policies keyed by candidate.
use std::collections::HashMap;

/// Policies fine-tuned during a search, keyed by the candidate they were
/// fine-tuned for.
///
/// The key of a candidate is its `Debug` rendering, e.g. `"[1, 0, 1, 1]"`.
pub struct PolicyCache<P> {
    policies: HashMap<String, P>,
}

impl<P> Default for PolicyCache<P> {
    fn default() -> Self {
        Self {
            policies: HashMap::new(),
        }
    }
}

impl<P> PolicyCache<P> {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Key of a candidate.
    pub fn key(x: &[i64]) -> String {
        format!("{:?}", x)
    }

    /// Removes and returns the policy of a candidate.
    pub fn take(&mut self, x: &[i64]) -> Option<P> {
        self.policies.remove(&Self::key(x))
    }

    /// The policy of a candidate.
    pub fn get(&self, x: &[i64]) -> Option<&P> {
        self.policies.get(&Self::key(x))
    }

    /// Stores the policy of a candidate, replacing any previous one.
    pub fn insert(&mut self, x: &[i64], policy: P) {
        self.policies.insert(Self::key(x), policy);
    }

    /// Returns `true` if the candidate has a policy.
    pub fn contains(&self, x: &[i64]) -> bool {
        self.policies.contains_key(&Self::key(x))
    }

    /// Number of cached policies.
    pub fn len(&self) -> usize {
        self.policies.len()
    }

    /// Returns `true` if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}
