use crate::core::ids::IdentifierPool;
use crate::models::field::Field;
use indexmap::IndexMap;

/// Canonical index of every instantiated field, in insertion order.
///
/// Does not enforce uniqueness itself; ids are handed out and checked through
/// the [`IdentifierPool`] it carries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormFieldRegistry {
    fields: IndexMap<String, Field>,
    ids: IdentifierPool,
}

impl FormFieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: Field) {
        self.fields.insert(field.id.clone(), field);
    }

    pub fn remove(&mut self, id: &str) -> Option<Field> {
        self.fields.shift_remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&Field> {
        self.fields.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Field> {
        self.fields.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.fields.contains_key(id)
    }

    pub fn get_all(&self) -> Vec<&Field> {
        self.fields.values().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    pub fn for_each(&self, f: impl FnMut(&Field)) {
        self.fields.values().for_each(f);
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Forgets every field and every claimed id.
    pub fn clear(&mut self) {
        self.fields.clear();
        self.ids.clear();
    }

    pub fn ids(&self) -> &IdentifierPool {
        &self.ids
    }

    pub(crate) fn ids_mut(&mut self) -> &mut IdentifierPool {
        &mut self.ids
    }

    /// Re-indexes a field under a new id, keeping its position.
    pub(crate) fn rename(&mut self, old: &str, new: &str) {
        let Some((index, _, mut field)) = self.fields.shift_remove_full(old) else {
            return;
        };

        field.id = new.to_string();
        self.fields.shift_insert(index, new.to_string(), field);
    }

    /// Ids of `id` and all its descendants, parents first.
    pub fn subtree_ids(&self, id: &str) -> Vec<String> {
        let mut out = Vec::new();
        let mut stack = vec![id.to_string()];

        while let Some(current) = stack.pop() {
            if let Some(field) = self.get(&current) {
                stack.extend(field.children().iter().rev().cloned());
                out.push(current);
            }
        }

        out
    }

    /// True when `ancestor` is `id` itself or lies on its parent chain.
    pub fn is_ancestor_or_self(&self, ancestor: &str, id: &str) -> bool {
        let mut current = self.get(id);
        while let Some(field) = current {
            if field.id == ancestor {
                return true;
            }
            current = field.parent.as_deref().and_then(|p| self.get(p));
        }
        false
    }
}
