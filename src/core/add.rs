use crate::errors::AppResult;
use crate::models::{Record, RecordSet};
use crate::store::RecordStore;
use tracing::{debug, info, warn};

/// High-level business logic for the `add` command.
pub struct AddLogic;

impl AddLogic {
    /// Append `record` to the stored set and persist the whole set, then
    /// re-read the medium for the next cycle.
    ///
    /// The append runs inside the store's transaction, so a medium that cannot
    /// be read is never overwritten. Returns the re-read set, or the persisted
    /// one if the re-read fails.
    pub fn apply(store: &dyn RecordStore, record: Record) -> AppResult<RecordSet> {
        info!(
            store = %store.describe(),
            timestamp = %record.timestamp_str(),
            glucose = record.glucose,
            insulin = record.insulin,
            "saving reading"
        );

        let persisted = store.transaction(&mut |set| Ok(set.append(record.clone())))?;
        debug!(records = persisted.len(), "persisted");

        match store.fetch() {
            Ok(current) => Ok(current),
            Err(e) => {
                warn!(error = %e, "re-read after save failed, using the persisted copy");
                Ok(persisted)
            }
        }
    }
}
