use crate::clock::Clock;
use crate::logger::Logger;
use crate::storage::error::UploadError;
use crate::storage::ObjectStore;
use crate::types::batch::Batch;
use crate::types::stored_object::{storage_key, StoredObject};
use crate::utils::error_chain;
use std::sync::Arc;

/// Writes a cycle's batch to the object store under a date/time key.
///
/// Each call makes at most one put; failures are journaled and returned, never retried.
pub struct Uploader {
    store: Arc<dyn ObjectStore>,
    clock: Arc<dyn Clock>,
    logger: Logger,
}

impl Uploader {
    pub fn new(store: Arc<dyn ObjectStore>, clock: Arc<dyn Clock>, logger: Logger) -> Self {
        Self {
            store,
            clock,
            logger,
        }
    }

    pub async fn upload(&self, batch: &Batch) -> Result<StoredObject, UploadError> {
        let at = self.clock.now();

        let object = match StoredObject::from_batch(batch, at) {
            Ok(object) => object,
            Err(source) => {
                let key = storage_key(at);
                let err = UploadError::Serialize {
                    key: key.clone(),
                    source,
                };
                self.logger.log(format!(
                    "Failed to upload {} to S3: {}",
                    key,
                    error_chain(&err)
                ));
                return Err(err);
            }
        };

        match self
            .store
            .put_object(&object.key, &object.body, object.content_type)
            .await
        {
            Ok(()) => {
                self.logger.log(format!(
                    "Uploaded {} to bucket {}",
                    object.key,
                    self.store.bucket()
                ));
                Ok(object)
            }
            Err(e) => {
                self.logger.log(format!(
                    "Failed to upload {} to S3: {}",
                    object.key,
                    error_chain(&e)
                ));
                Err(UploadError::Storage(e))
            }
        }
    }
}
