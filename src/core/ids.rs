use crate::core::error::{FieldError, Result};
use std::collections::HashMap;

/// Hands out human-readable identifiers (`Field_3`, `Form_1`) and remembers
/// which ones are taken.
///
/// The owner recorded for each id is the type tag of the field holding it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierPool {
    claims: HashMap<String, String>,
    counters: HashMap<String, u64>,
}

impl IdentifierPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assigned(&self, id: &str) -> bool {
        self.claims.contains_key(id)
    }

    pub fn owner(&self, id: &str) -> Option<&str> {
        self.claims.get(id).map(String::as_str)
    }

    pub fn claim(&mut self, id: &str, owner: &str) -> Result<()> {
        if self.assigned(id) {
            return Err(FieldError::IdConflict(id.to_string()));
        }

        tracing::trace!("claimed id {} for <{}>", id, owner);
        self.claims.insert(id.to_string(), owner.to_string());
        Ok(())
    }

    pub fn unclaim(&mut self, id: &str) {
        if self.claims.remove(id).is_some() {
            tracing::trace!("released id {}", id);
        }
    }

    /// Claims and returns the next free `{prefix}{n}`.
    ///
    /// Scanning resumes after the last number handed out for this prefix, so bulk
    /// creation stays linear; numbers freed earlier are not revisited.
    pub fn next_prefixed(&mut self, prefix: &str, owner: &str) -> String {
        let counter = self.counters.entry(prefix.to_string()).or_insert(0);

        let id = loop {
            *counter += 1;
            let candidate = format!("{}{}", prefix, counter);
            if !self.claims.contains_key(&candidate) {
                break candidate;
            }
        };

        tracing::trace!("generated id {} for <{}>", id, owner);
        self.claims.insert(id.clone(), owner.to_string());
        id
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    pub fn clear(&mut self) {
        self.claims.clear();
        self.counters.clear();
    }
}
