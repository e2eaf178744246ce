//! Ordered, id-stable rule lists.
//!
//! Rules are addressed by id, never by position. `add` appends, `update`
//! touches one field of one rule, `remove` drops one rule. Ordering is
//! significant (the engine evaluates rules in list order) and there is no
//! reordering.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, Ordering};

/// Behaviour shared by status-injection and mock-response rules.
pub trait Rule: Clone {
    /// Short kind name used in messages ("status", "mock").
    const KIND: &'static str;
    /// Single-field edit.
    type Patch;

    /// New rule with kind-specific defaults.
    fn with_id(id: String) -> Self;
    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
    fn apply(&mut self, patch: Self::Patch);
    /// Parse loosely typed input; `None` when `raw` is not a rule object.
    fn from_value(raw: &Value) -> Option<Self>;
}

/// Last id handed out by `next_rule_id`, in unix millis.
static LAST_RULE_ID: AtomicI64 = AtomicI64::new(0);

/// Fresh rule id: the current unix time in milliseconds, bumped so that ids
/// are strictly increasing within the process.
pub fn next_rule_id() -> String {
    let now = chrono::Utc::now().timestamp_millis();
    let mut last = LAST_RULE_ID.load(Ordering::Relaxed);
    loop {
        let candidate = now.max(last.saturating_add(1));
        match LAST_RULE_ID.compare_exchange_weak(last, candidate, Ordering::AcqRel, Ordering::Relaxed)
        {
            Ok(_) => return candidate.to_string(),
            Err(actual) => last = actual,
        }
    }
}

/// Observed ids further than this ahead of the clock do not move the counter.
const MAX_ID_LEAD_MS: i64 = 366 * 24 * 60 * 60 * 1000;

/// Keep `next_rule_id` ahead of numeric ids seen on the wire.
///
/// Ids far in the future are left out so a single huge id cannot pin the
/// counter at `i64::MAX`; lists still check their own ids on insert.
fn observe_rule_id(id: &str) {
    let Ok(n) = id.trim().parse::<i64>() else {
        return;
    };
    let horizon = chrono::Utc::now().timestamp_millis().saturating_add(MAX_ID_LEAD_MS);
    if n <= horizon {
        LAST_RULE_ID.fetch_max(n, Ordering::AcqRel);
    } else {
        tracing::debug!("Rule id {} is too far ahead to seed new ids", n);
    }
}

/// Next id from `next_rule_id` that `taken` does not claim.
fn unused_rule_id(taken: impl Fn(&str) -> bool) -> String {
    loop {
        let id = next_rule_id();
        if !taken(&id) {
            return id;
        }
    }
}

/// Ordered list of rules with unique ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleList<R> {
    rules: Vec<R>,
}

impl<R> Default for RuleList<R> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<R: Rule> RuleList<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt existing rules. Order is kept; a rule whose id is empty or
    /// already taken by an earlier rule gets a fresh id.
    pub fn from_rules(rules: Vec<R>) -> Self {
        let incoming: HashSet<String> = rules.iter().map(|r| r.id().to_string()).collect();
        for id in &incoming {
            observe_rule_id(id);
        }
        let mut list = Self { rules: Vec::with_capacity(rules.len()) };
        for mut rule in rules {
            if rule.id().is_empty() || list.get(rule.id()).is_some() {
                let id = unused_rule_id(|id| incoming.contains(id) || list.get(id).is_some());
                tracing::debug!("Reassigning {} rule id {:?} -> {}", R::KIND, rule.id(), id);
                rule.set_id(id);
            }
            list.rules.push(rule);
        }
        list
    }

    /// Append a rule with a fresh id and default fields.
    pub fn add(&mut self) -> &R {
        let id = unused_rule_id(|id| self.get(id).is_some());
        let index = self.rules.len();
        self.rules.push(R::with_id(id));
        &self.rules[index]
    }

    /// Apply `patch` to the rule with `id`. Returns false if there is none.
    pub fn update(&mut self, id: &str, patch: R::Patch) -> bool {
        match self.rules.iter_mut().find(|r| r.id() == id) {
            Some(rule) => {
                rule.apply(patch);
                true
            },
            None => false,
        }
    }

    /// Remove the rule with `id`. Removing an unknown id is a no-op.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.rules.len();
        self.rules.retain(|r| r.id() != id);
        self.rules.len() != before
    }

    pub fn get(&self, id: &str) -> Option<&R> {
        self.rules.iter().find(|r| r.id() == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.rules.iter()
    }

    pub fn as_slice(&self) -> &[R] {
        &self.rules
    }

    pub fn into_vec(self) -> Vec<R> {
        self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<'a, R: Rule> IntoIterator for &'a RuleList<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
