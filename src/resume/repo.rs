use std::sync::Arc;

use tracing::warn;

use crate::resume::model::ResumeRecord;
use crate::storage::{BlobStore, RESUME_DATA_KEY};

/// Persistence for the single resume record, serialized wholesale under the
/// `resume_data` key. Read failures fall back to the default record; write
/// failures are logged and non-fatal (the operation still completes in
/// memory, it just is not durable).
pub struct ResumeStore {
    store: Arc<dyn BlobStore>,
}

impl ResumeStore {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self { store }
    }

    pub async fn load(&self) -> ResumeRecord {
        let text = match self.store.get(RESUME_DATA_KEY).await {
            Ok(Some(text)) => text,
            Ok(None) => return ResumeRecord::default(),
            Err(e) => {
                warn!(error = %e, "failed to read resume data; using defaults");
                return ResumeRecord::default();
            }
        };
        match serde_json::from_str(&text) {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "resume data blob is corrupt; using defaults");
                ResumeRecord::default()
            }
        }
    }

    pub async fn save(&self, record: &ResumeRecord) {
        let text = match serde_json::to_string(record) {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "failed to serialize resume record");
                return;
            }
        };
        if let Err(e) = self.store.put(RESUME_DATA_KEY, &text).await {
            warn!(error = %e, "failed to persist resume record; change is not durable");
        }
    }
}
