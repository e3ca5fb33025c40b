//! Local-first stores: an in-memory collection mirrored to persistence after
//! every mutation.

use crate::errors::{PersistenceError, StoreError, ValidationError};
use crate::models::RecordId;
use crate::stats::CollectionStats;
use crate::storage::Persistence;
use chrono::Utc;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::collections::HashSet;
use tracing::{debug, info};

/// One entity shape managed by a tracker page.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// User-editable fields, as submitted by the page's dialog.
    type Draft: DeserializeOwned + Send + 'static;

    fn id(&self) -> RecordId;
    fn build(id: RecordId, draft: Self::Draft) -> Self;
    /// Replaces the domain fields, keeping identity and completion state.
    fn apply(&mut self, draft: Self::Draft);
    fn validate(draft: &Self::Draft) -> Result<(), ValidationError>;

    fn is_completed(&self) -> bool {
        false
    }
}

pub trait Completable: Record {
    fn set_completed(&mut self, completed: bool);
}

/// Result of a committed mutation. A failed mirror write is reported as a
/// warning; the in-memory change stands.
#[derive(Debug)]
pub struct Mutation<T> {
    pub value: T,
    pub warning: Option<PersistenceError>,
}

impl<T> Mutation<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Mutation<U> {
        Mutation {
            value: f(self.value),
            warning: self.warning,
        }
    }
}

/// Ordered records with unique ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection<R> {
    records: Vec<R>,
}

impl<R> Default for Collection<R> {
    fn default() -> Self {
        Self { records: Vec::new() }
    }
}

impl<R: Record> Collection<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<R>) -> Self {
        Self { records }
    }

    /// Like [`from_records`](Self::from_records), but refuses a list that
    /// repeats an id.
    pub fn try_from_records(records: Vec<R>) -> Result<Self, StoreError> {
        let mut seen = HashSet::with_capacity(records.len());
        if let Some(id) = records.iter().map(|record| record.id()).find(|id| !seen.insert(*id)) {
            return Err(StoreError::DuplicateId(id));
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, R> {
        self.records.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn get(&self, id: RecordId) -> Option<&R> {
        self.records.iter().find(|record| record.id() == id)
    }

    pub fn get_mut(&mut self, id: RecordId) -> Result<&mut R, StoreError> {
        self.records
            .iter_mut()
            .find(|record| record.id() == id)
            .ok_or(StoreError::NotFound(id))
    }

    /// Creation timestamp in milliseconds, bumped past every id in use.
    /// When the largest id cannot be bumped, the smallest free id is used.
    pub fn next_id(&self, now_millis: u64) -> RecordId {
        let max_id = self.records.iter().map(|record| record.id()).max();
        match max_id {
            Some(max_id) if max_id >= now_millis => {
                max_id.checked_add(1).unwrap_or_else(|| self.lowest_free_id())
            }
            _ => now_millis,
        }
    }

    fn lowest_free_id(&self) -> RecordId {
        let used: HashSet<RecordId> = self.records.iter().map(|record| record.id()).collect();
        (1..=RecordId::MAX).find(|id| !used.contains(id)).unwrap_or_default()
    }

    pub fn insert(&mut self, draft: R::Draft) -> Result<&R, StoreError> {
        R::validate(&draft)?;
        let id = self.next_id(now_millis());
        self.records.push(R::build(id, draft));
        Ok(&self.records[self.records.len() - 1])
    }

    pub fn replace(&mut self, id: RecordId, draft: R::Draft) -> Result<&R, StoreError> {
        let record = self.get_mut(id)?;
        R::validate(&draft)?;
        record.apply(draft);
        Ok(&*record)
    }

    pub fn remove(&mut self, id: RecordId) -> Result<R, StoreError> {
        let index = self
            .records
            .iter()
            .position(|record| record.id() == id)
            .ok_or(StoreError::NotFound(id))?;
        Ok(self.records.remove(index))
    }
}

fn now_millis() -> u64 {
    u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default()
}

/// CRUD and derived statistics over one persisted collection.
pub struct EntityStore<R: Record> {
    key: &'static str,
    persistence: Persistence,
    records: Collection<R>,
    stats: CollectionStats,
}

impl<R: Record> EntityStore<R> {
    pub fn open(persistence: Persistence, key: &'static str) -> Self {
        Self::open_or(persistence, key, Vec::new)
    }

    /// `default` supplies the page's first-run collection when nothing usable
    /// is stored under `key`.
    pub fn open_or(persistence: Persistence, key: &'static str, default: impl FnOnce() -> Vec<R>) -> Self {
        let records = match persistence.load::<Collection<R>>(key) {
            Some(records) => {
                debug!(key, count = records.len(), "loaded collection");
                records
            }
            None => {
                info!(key, "starting with default collection");
                Collection::from_records(default())
            }
        };
        let stats = CollectionStats::from_records(records.records());
        Self {
            key,
            persistence,
            records,
            stats,
        }
    }

    /// Owned snapshot in insertion order.
    pub fn list(&self) -> Vec<R> {
        self.records.records().to_vec()
    }

    pub fn records(&self) -> &[R] {
        self.records.records()
    }

    pub fn get(&self, id: RecordId) -> Option<&R> {
        self.records.get(id)
    }

    pub fn stats(&self) -> CollectionStats {
        self.stats
    }

    pub fn create(&mut self, draft: R::Draft) -> Result<Mutation<R>, StoreError> {
        let record = self.records.insert(draft)?.clone();
        debug!(key = self.key, id = record.id(), "created record");
        Ok(self.commit(record))
    }

    pub fn update(&mut self, id: RecordId, draft: R::Draft) -> Result<Mutation<R>, StoreError> {
        let record = self.records.replace(id, draft)?.clone();
        debug!(key = self.key, id, "updated record");
        Ok(self.commit(record))
    }

    pub fn remove(&mut self, id: RecordId) -> Result<Mutation<R>, StoreError> {
        let record = self.records.remove(id)?;
        debug!(key = self.key, id, "removed record");
        Ok(self.commit(record))
    }

    /// Applies a non-draft edit (status change, shelf move) to one record.
    pub fn modify(&mut self, id: RecordId, edit: impl FnOnce(&mut R)) -> Result<Mutation<R>, StoreError> {
        let record = self.records.get_mut(id)?;
        edit(record);
        let record = record.clone();
        Ok(self.commit(record))
    }

    /// Applies `edit` to every record and writes once.
    pub fn modify_all(&mut self, mut edit: impl FnMut(&mut R)) -> Mutation<usize> {
        let count = self.records.len();
        self.records.iter_mut().for_each(&mut edit);
        self.commit(count)
    }

    /// Adopts a document fetched from elsewhere as the whole collection.
    /// A list that repeats an id is refused and nothing is written.
    pub fn replace_all(&mut self, records: Vec<R>) -> Result<Mutation<usize>, StoreError> {
        let count = records.len();
        self.records = Collection::try_from_records(records)?;
        info!(key = self.key, count, "replaced collection");
        Ok(self.commit(count))
    }

    fn commit<T>(&mut self, value: T) -> Mutation<T> {
        self.stats = CollectionStats::from_records(self.records.records());
        let warning = self.persistence.save(self.key, &self.records).err();
        Mutation { value, warning }
    }
}

impl<R: Completable> EntityStore<R> {
    pub fn toggle_completed(&mut self, id: RecordId) -> Result<Mutation<R>, StoreError> {
        self.modify(id, |record| {
            let completed = record.is_completed();
            record.set_completed(!completed);
        })
    }
}

/// A page that owns a single document instead of a list.
pub struct DocumentStore<T> {
    key: &'static str,
    persistence: Persistence,
    document: T,
}

impl<T> DocumentStore<T>
where
    T: Clone + Serialize + DeserializeOwned,
{
    pub fn open_or(persistence: Persistence, key: &'static str, default: impl FnOnce() -> T) -> Self {
        let document = persistence.load::<T>(key).unwrap_or_else(|| {
            info!(key, "starting with default document");
            default()
        });
        Self {
            key,
            persistence,
            document,
        }
    }

    pub fn get(&self) -> &T {
        &self.document
    }

    /// Runs `edit` on a copy; the copy replaces the document only on success.
    pub fn update<U>(&mut self, edit: impl FnOnce(&mut T) -> Result<U, StoreError>) -> Result<Mutation<U>, StoreError> {
        let mut next = self.document.clone();
        let value = edit(&mut next)?;
        Ok(self.apply(|document| {
            *document = next;
            value
        }))
    }

    /// Edit that cannot be rejected; always writes.
    pub fn apply<U>(&mut self, edit: impl FnOnce(&mut T) -> U) -> Mutation<U> {
        let value = edit(&mut self.document);
        let warning = self.persistence.save(self.key, &self.document).err();
        Mutation { value, warning }
    }
}

impl<T> DocumentStore<T>
where
    T: Clone + Default + Serialize + DeserializeOwned,
{
    pub fn open(persistence: Persistence, key: &'static str) -> Self {
        Self::open_or(persistence, key, T::default)
    }
}
