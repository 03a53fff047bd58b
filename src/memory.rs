// In-memory record store. Backs the unit and end-to-end tests, and can
// be switched offline to exercise the store-failure paths.

use mongodb::bson::oid::ObjectId;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::record::{Record, RecordFields};
use crate::store::{RecordStore, Result, StoreError};

/// In-memory record store for testing.
///
/// Behaves like the MongoDB store for the four calls the tool makes:
/// ids are fresh ObjectIds, `find_all` returns insertion order.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<Record>>,
    calls: Mutex<usize>,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of store calls made so far, of any kind.
    pub fn call_count(&self) -> usize {
        *lock(&self.calls)
    }

    /// Snapshot of the stored records, without counting as a call.
    pub fn records(&self) -> Vec<Record> {
        lock(&self.records).clone()
    }

    /// While offline every call fails with `StoreError::Unavailable`.
    /// Failed calls are still counted.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn begin_call(&self) -> Result<()> {
        *lock(&self.calls) += 1;
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store is offline".into()));
        }
        Ok(())
    }
}

// A panic while holding the lock can only come from a failing test.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

impl RecordStore for MemoryStore {
    fn insert(&self, fields: &RecordFields) -> Result<ObjectId> {
        self.begin_call()?;
        let id = ObjectId::new();
        let mut record = fields.clone().into_record();
        record.id = Some(id);
        lock(&self.records).push(record);
        Ok(id)
    }

    fn find_all(&self) -> Result<Vec<Record>> {
        self.begin_call()?;
        Ok(self.records())
    }

    fn update(&self, id: ObjectId, fields: &RecordFields) -> Result<Option<Record>> {
        self.begin_call()?;
        let mut records = lock(&self.records);
        Ok(records
            .iter_mut()
            .find(|r| r.id == Some(id))
            .map(|r| {
                r.name = fields.name.clone();
                r.revenue = fields.revenue;
                r.clone()
            }))
    }

    fn delete(&self, id: ObjectId) -> Result<u64> {
        self.begin_call()?;
        let mut records = lock(&self.records);
        match records.iter().position(|r| r.id == Some(id)) {
            Some(pos) => {
                records.remove(pos);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}
