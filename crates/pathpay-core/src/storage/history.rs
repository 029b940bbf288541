use log::info;

use crate::error::PathPayError;
use crate::storage::records::LoanRecord;
use crate::storage::{load_list, save_list, KeyValueStore};
use crate::PathPayResult;

pub const HISTORY_KEY: &str = "loan_history";

/// Unbounded, append-only log of saved calculations, oldest first.
#[derive(Debug)]
pub struct HistoryStore<S> {
    store: S,
}

impl<S: KeyValueStore> HistoryStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    pub fn list(&self) -> PathPayResult<Vec<LoanRecord>> {
        load_list(&self.store, HISTORY_KEY)
    }

    pub fn add(&mut self, record: LoanRecord) -> PathPayResult<usize> {
        let mut records = self.list()?;
        records.push(record);
        save_list(&mut self.store, HISTORY_KEY, &records)?;
        info!("history: saved entry #{}", records.len());
        Ok(records.len())
    }

    /// Delete the entry at `index` (0-based) and return it.
    pub fn remove(&mut self, index: usize) -> PathPayResult<LoanRecord> {
        let mut records = self.list()?;
        if index >= records.len() {
            return Err(PathPayError::IndexOutOfRange {
                index,
                len: records.len(),
            });
        }
        let removed = records.remove(index);
        save_list(&mut self.store, HISTORY_KEY, &records)?;
        info!("history: removed entry {index}, {} left", records.len());
        Ok(removed)
    }

    /// Drop every entry; returns how many were removed.
    pub fn clear(&mut self) -> PathPayResult<usize> {
        let count = self.list().map(|r| r.len()).unwrap_or(0);
        self.store.remove(HISTORY_KEY)?;
        info!("history: cleared {count} entries");
        Ok(count)
    }
}
