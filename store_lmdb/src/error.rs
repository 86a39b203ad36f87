use thiserror::Error;

#[derive(Debug, Error)]
pub enum LmdbError {
    #[error("LMDB error: {0}")]
    Heed(String),

    #[error("key not found: {0}")]
    NotFound(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("unsupported schema version {found} (this build supports up to {supported})")]
    SchemaMismatch { found: u32, supported: u32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<heed::Error> for LmdbError {
    fn from(e: heed::Error) -> Self {
        LmdbError::Heed(e.to_string())
    }
}

impl From<LmdbError> for nftstake_store::StoreError {
    fn from(e: LmdbError) -> Self {
        match e {
            LmdbError::NotFound(key) => nftstake_store::StoreError::NotFound(key),
            LmdbError::Serialization(msg) => nftstake_store::StoreError::Serialization(msg),
            LmdbError::SchemaMismatch { .. } => {
                nftstake_store::StoreError::Corruption(e.to_string())
            }
            other => nftstake_store::StoreError::Backend(other.to_string()),
        }
    }
}
