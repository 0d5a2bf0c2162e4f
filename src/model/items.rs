use crate::error::{fail, ErrorType};
use crate::store::next_id;
use crate::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// The ordered line items of a parent record, e.g. the materials of a delivery note.
///
/// Identifiers are unique within one `Items` only. Every mutation replaces the touched entry with
/// a new value rather than editing it through a shared reference held elsewhere.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
#[serde(bound(deserialize = "I: DeserializeOwned"))]
pub struct Items<I>
where
    I: Debug + Clone + Eq + PartialEq + Serialize + DeserializeOwned + Item,
{
    data: Vec<I>,
}

pub trait Item {
    /// What the item is called in messages, e.g. "material".
    const NAME: &'static str;

    fn id(&self) -> u64;

    /// A new item with the given `id` and every other field empty.
    fn blank(id: u64) -> Self;

    /// Given the field `name` and the `value`, set the appropriate struct field.
    fn set_field(&mut self, name: &str, value: &str) -> Result<()>;
}

impl<I> Items<I>
where
    I: Debug + Clone + Eq + PartialEq + Serialize + DeserializeOwned + Item,
{
    pub fn new(data: Vec<I>) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &[I] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&I> {
        self.data.iter().find(|item| item.id() == id)
    }

    /// Appends a blank item with the next free identifier and returns that identifier.
    pub fn add(&mut self) -> Result<u64> {
        let id = next_id(I::NAME, self.data.iter().map(Item::id))?;
        self.data.push(I::blank(id));
        Ok(id)
    }

    /// Removes the item with `id`. Removal is refused when it would leave fewer than `min` items.
    pub fn remove(&mut self, id: u64, min: usize) -> Result<I> {
        let Some(ix) = self.data.iter().position(|item| item.id() == id) else {
            fail!(ErrorType::NotFound, "{} {id} not found", I::NAME)
        };
        if self.data.len() <= min {
            fail!(
                ErrorType::Form,
                "At least {min} {}{} must remain",
                I::NAME,
                if min == 1 { "" } else { "s" }
            )
        }
        Ok(self.data.remove(ix))
    }

    /// Replaces the item with `id` by a copy that has `field` set to `value`.
    pub fn set(&mut self, id: u64, field: &str, value: &str) -> Result<()> {
        let Some(ix) = self.data.iter().position(|item| item.id() == id) else {
            fail!(ErrorType::NotFound, "{} {id} not found", I::NAME)
        };
        let mut updated = self.data[ix].clone();
        updated.set_field(field, value)?;
        self.data[ix] = updated;
        Ok(())
    }
}

impl<I> FromIterator<I> for Items<I>
where
    I: Debug + Clone + Eq + PartialEq + Serialize + DeserializeOwned + Item,
{
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SjMaterial;

    fn items(ids: &[u64]) -> Items<SjMaterial> {
        ids.iter().map(|id| SjMaterial::blank(*id)).collect()
    }

    #[test]
    fn test_add_to_empty_starts_at_one() {
        let mut items = items(&[]);
        assert_eq!(items.add().unwrap(), 1);
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_add_uses_max_plus_one() {
        let mut items = items(&[3, 1]);
        assert_eq!(items.add().unwrap(), 4);
        let ids: Vec<u64> = items.data().iter().map(Item::id).collect();
        assert_eq!(ids, vec![3, 1, 4]);
    }

    #[test]
    fn test_add_when_ids_are_exhausted() {
        let mut items = items(&[2, u64::MAX]);
        let err = items.add().unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Validation);
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_remove_respects_minimum() {
        let mut items = items(&[1]);
        let err = items.remove(1, 1).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Form);
        assert_eq!(items.len(), 1);

        let removed = items.remove(1, 0).unwrap();
        assert_eq!(removed.id(), 1);
        assert!(items.is_empty());
    }

    #[test]
    fn test_remove_unknown() {
        let mut items = items(&[1, 2]);
        let err = items.remove(9, 0).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::NotFound);
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_set_replaces_only_target() {
        let mut items = items(&[1, 2]);
        items.set(2, "material", "Elbow PVC").unwrap();
        assert_eq!(items.get(2).unwrap().name(), "Elbow PVC");
        assert_eq!(items.get(1).unwrap(), &SjMaterial::blank(1));
    }

    #[test]
    fn test_set_unknown_field_leaves_item() {
        let mut items = items(&[1]);
        let err = items.set(1, "colour", "red").unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Input);
        assert_eq!(items.get(1).unwrap(), &SjMaterial::blank(1));
    }
}
