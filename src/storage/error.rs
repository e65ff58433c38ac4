use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to put object '{key}' into bucket '{bucket}': {message}")]
    PutObject {
        bucket: String,
        key: String,
        message: String,
    },
}

/// Why a batch did not make it into storage.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Failed to serialize batch for '{key}'")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}
