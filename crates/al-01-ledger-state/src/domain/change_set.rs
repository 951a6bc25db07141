use std::collections::BTreeMap;

use crate::ports::WriteBatch;

/// Frozen writes of one executed block.
///
/// Values are absolute (the final value per key, `None` for a delete), so
/// layering a change set over a store that already contains it reads the
/// same values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    writes: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl ChangeSet {
    pub(crate) fn from_writes(writes: BTreeMap<Vec<u8>, Option<Vec<u8>>>) -> Self {
        Self { writes }
    }

    /// `None` if the key is untouched, `Some(None)` if deleted.
    pub fn get(&self, key: &[u8]) -> Option<Option<&[u8]>> {
        self.writes.get(key).map(|v| v.as_deref())
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Vec<u8>, &Option<Vec<u8>>)> {
        self.writes.iter()
    }

    /// Appends every write to `batch`.
    pub fn write_to(&self, batch: &mut WriteBatch) {
        for (key, value) in &self.writes {
            match value {
                Some(v) => batch.put(key.clone(), v.clone()),
                None => batch.delete(key.clone()),
            }
        }
    }
}
