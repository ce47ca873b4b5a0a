// Durable key-value store for UI preferences

#[derive(Debug, thiserror::Error)]
pub enum PreferenceError {
    #[error("preference store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("preference store is unreadable: {0}")]
    Decode(String),

    #[error("preference could not be encoded: {0}")]
    Encode(String),
}

pub trait PreferenceStore: Send {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError>;
}
