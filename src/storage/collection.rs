//! Generic in-memory record collection backed by one JSON file
//!
//! Records are kept in a `RwLock<HashMap>` keyed by id, loaded once at
//! startup and written back as a whole on `save`.

use std::collections::HashMap;
use std::hash::Hash;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::TrackerError;
use crate::models::{
    Budget, BudgetId, Category, CategoryId, RecurringId, RecurringTransaction, Transaction,
    TransactionId,
};

use super::file_io::{read_json, write_json_atomic};

/// A stored record with a stable id
pub trait Record: Clone + Serialize + DeserializeOwned {
    type Id: Copy + Eq + Hash + Ord;

    fn id(&self) -> Self::Id;

    fn created_at(&self) -> DateTime<Utc>;
}

macro_rules! impl_record {
    ($record:ty, $id:ty) => {
        impl Record for $record {
            type Id = $id;

            fn id(&self) -> Self::Id {
                self.id
            }

            fn created_at(&self) -> DateTime<Utc> {
                self.created_at
            }
        }
    };
}

impl_record!(Category, CategoryId);
impl_record!(Transaction, TransactionId);
impl_record!(Budget, BudgetId);
impl_record!(RecurringTransaction, RecurringId);

pub struct Collection<R: Record> {
    path: PathBuf,
    items: RwLock<HashMap<R::Id, R>>,
}

impl<R: Record> Collection<R> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            items: RwLock::new(HashMap::new()),
        }
    }

    pub(crate) fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<R::Id, R>>, TrackerError> {
        self.items
            .read()
            .map_err(|e| TrackerError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<R::Id, R>>, TrackerError> {
        self.items
            .write()
            .map_err(|e| TrackerError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Replace the in-memory contents with the file on disk
    pub fn load(&self) -> Result<(), TrackerError> {
        let records: Vec<R> = read_json(&self.path)?;
        let mut items = self.write()?;
        items.clear();
        items.extend(records.into_iter().map(|r| (r.id(), r)));
        tracing::debug!(path = %self.path.display(), count = items.len(), "loaded records");
        Ok(())
    }

    /// Write every record to disk, oldest first
    pub fn save(&self) -> Result<(), TrackerError> {
        let items = self.read()?;
        let mut records: Vec<&R> = items.values().collect();
        records.sort_by_key(|r| (r.created_at(), r.id()));
        write_json_atomic(&self.path, &records)
    }

    pub fn get(&self, id: R::Id) -> Result<Option<R>, TrackerError> {
        Ok(self.read()?.get(&id).cloned())
    }

    /// All records, oldest first
    pub fn get_all(&self) -> Result<Vec<R>, TrackerError> {
        self.filter(|_| true)
    }

    /// Records matching `predicate`, oldest first
    pub fn filter<F>(&self, predicate: F) -> Result<Vec<R>, TrackerError>
    where
        F: Fn(&R) -> bool,
    {
        let items = self.read()?;
        let mut list: Vec<R> = items.values().filter(|r| predicate(r)).cloned().collect();
        list.sort_by_key(|r| (r.created_at(), r.id()));
        Ok(list)
    }

    pub fn find<F>(&self, predicate: F) -> Result<Option<R>, TrackerError>
    where
        F: Fn(&R) -> bool,
    {
        Ok(self.filter(predicate)?.into_iter().next())
    }

    pub fn count<F>(&self, predicate: F) -> Result<usize, TrackerError>
    where
        F: Fn(&R) -> bool,
    {
        Ok(self.read()?.values().filter(|r| predicate(r)).count())
    }

    pub fn upsert(&self, record: R) -> Result<(), TrackerError> {
        self.write()?.insert(record.id(), record);
        Ok(())
    }

    pub fn delete(&self, id: R::Id) -> Result<Option<R>, TrackerError> {
        Ok(self.write()?.remove(&id))
    }

    pub fn len(&self) -> Result<usize, TrackerError> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, TrackerError> {
        Ok(self.read()?.is_empty())
    }
}
