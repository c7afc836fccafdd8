use crate::core::error::{FieldError, Result};
use crate::core::form_field_registry::FormFieldRegistry;
use crate::models::field::Field;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::ops::Bound;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClaimKind {
    /// Exact binding of a scalar value.
    Keyed,
    /// Prefix reserved by a container for its descendants.
    Pathed,
}

impl ClaimKind {
    pub fn from_keyed(is_keyed: bool) -> Self {
        if is_keyed {
            ClaimKind::Keyed
        } else {
            ClaimKind::Pathed
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathClaim {
    pub kind: ClaimKind,
    /// Id of the claiming field.
    pub owner: String,
}

/// A claim that has been computed but not yet recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingClaim {
    pub path: Vec<String>,
    pub kind: ClaimKind,
    pub owner: String,
}

/// Knobs for resolving a value path against a hypothetical tree.
#[derive(Debug, Clone, Default)]
pub struct ValuePathOptions {
    /// Local segments to use instead of a field's own key/path, by field id.
    pub replacements: HashMap<String, Vec<String>>,
    /// Stop walking upwards once this ancestor id is reached (exclusive).
    pub cutoff: Option<String>,
}

/// Index of claimed binding paths.
///
/// Two claims conflict when one path is a prefix of (or equal to) the other and
/// the upper one is keyed, or when a keyed claim would sit on or above an
/// existing claim. Pathed claims nest and overlap freely. The empty path
/// belongs to the form root alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathRegistry {
    claims: BTreeMap<Vec<String>, Vec<PathClaim>>,
}

impl PathRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full value path of `field`: its ancestors' paths, root first, followed by
    /// its own key or path.
    pub fn get_value_path(&self, field: &Field, fields: &FormFieldRegistry) -> Vec<String> {
        self.get_value_path_with(field, fields, &ValuePathOptions::default())
    }

    pub fn get_value_path_with(
        &self,
        field: &Field,
        fields: &FormFieldRegistry,
        options: &ValuePathOptions,
    ) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current = Some(field);

        while let Some(node) = current {
            let local = match options.replacements.get(&node.id) {
                Some(replacement) => replacement.clone(),
                None => node.local_segments(),
            };
            chunks.push(local);

            current = match node.parent.as_deref() {
                Some(parent) if options.cutoff.as_deref() != Some(parent) => fields.get(parent),
                _ => None,
            };
        }

        chunks.into_iter().rev().flatten().collect()
    }

    pub fn can_claim_path(&self, path: &[String], is_keyed: bool) -> bool {
        !self.conflicts(path, ClaimKind::from_keyed(is_keyed))
    }

    fn conflicts(&self, path: &[String], kind: ClaimKind) -> bool {
        if path.is_empty() {
            return self.claims.contains_key(path);
        }

        // above: only a scalar binding blocks what lies beneath it
        for end in 1..path.len() {
            if let Some(claims) = self.claims.get(&path[..end]) {
                if claims.iter().any(|c| c.kind == ClaimKind::Keyed) {
                    return true;
                }
            }
        }

        // on or below
        let range = (Bound::Included(path), Bound::Unbounded);
        for (claimed, claims) in self.claims.range::<[String], _>(range) {
            if !claimed.starts_with(path) {
                break;
            }
            if kind == ClaimKind::Keyed || claims.iter().any(|c| c.kind == ClaimKind::Keyed) {
                return true;
            }
        }

        false
    }

    /// Records a claim without validating it; callers check `can_claim_path` first.
    pub fn claim_path(&mut self, path: &[String], is_keyed: bool, owner: &str) {
        let kind = ClaimKind::from_keyed(is_keyed);
        tracing::debug!("claiming {:?} path '{}' for {}", kind, path.join("."), owner);

        self.claims.entry(path.to_vec()).or_default().push(PathClaim {
            kind,
            owner: owner.to_string(),
        });
    }

    /// Drops `owner`'s claim on `path`, if any.
    pub fn unclaim_path(&mut self, path: &[String], owner: &str) {
        let Some(claims) = self.claims.get_mut(path) else {
            return;
        };

        claims.retain(|c| c.owner != owner);
        if claims.is_empty() {
            self.claims.remove(path);
        }
        tracing::debug!("released path '{}' of {}", path.join("."), owner);
    }

    /// Drops every claim held by any of `owners`.
    pub fn unclaim_owners(&mut self, owners: &HashSet<String>) {
        self.claims.retain(|_, claims| {
            claims.retain(|c| !owners.contains(&c.owner));
            !claims.is_empty()
        });
    }

    /// Releases all claims of `owners` and records `next` in their place, as one
    /// step: either every new claim fits, or nothing changes.
    ///
    /// Old claims are released before the new ones are checked, so re-claiming
    /// an unchanged path never collides with itself.
    pub fn replace_claims(&mut self, owners: &HashSet<String>, next: &[PendingClaim]) -> Result<()> {
        let mut staged = self.clone();
        staged.unclaim_owners(owners);

        for claim in next {
            if staged.conflicts(&claim.path, claim.kind) {
                tracing::warn!(
                    "rejected {:?} claim '{}' for {}",
                    claim.kind,
                    claim.path.join("."),
                    claim.owner
                );
                return Err(FieldError::path_conflict(&claim.path));
            }
            staged.claim_path(&claim.path, claim.kind == ClaimKind::Keyed, &claim.owner);
        }

        *self = staged;
        Ok(())
    }

    pub(crate) fn rename_owner(&mut self, old: &str, new: &str) {
        for claim in self.claims.values_mut().flatten() {
            if claim.owner == old {
                claim.owner = new.to_string();
            }
        }
    }

    pub fn claims_at(&self, path: &[String]) -> &[PathClaim] {
        self.claims.get(path).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_claimed(&self, path: &[String]) -> bool {
        self.claims.contains_key(path)
    }

    /// All claims of one field.
    pub fn claims_of(&self, owner: &str) -> Vec<(Vec<String>, ClaimKind)> {
        self.claims
            .iter()
            .flat_map(|(path, claims)| {
                claims
                    .iter()
                    .filter(|c| c.owner == owner)
                    .map(move |c| (path.clone(), c.kind))
            })
            .collect()
    }

    /// Every claimed path in lexicographic order.
    pub fn claimed_paths(&self) -> impl Iterator<Item = &[String]> {
        self.claims.keys().map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.claims.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    pub fn clear(&mut self) {
        self.claims.clear();
    }
}
