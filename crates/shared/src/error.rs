use thiserror::Error;

/// Failure to turn a feed message or completion response into a snapshot.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed queue envelope: {0}")]
    Envelope(#[source] serde_json::Error),
    #[error("malformed queue entry at position {position}: {source}")]
    Entry {
        position: usize,
        #[source]
        source: serde_json::Error,
    },
}

impl DecodeError {
    /// Position of the offending entry, when the envelope itself was valid.
    pub fn entry_position(&self) -> Option<usize> {
        match self {
            Self::Envelope(_) => None,
            Self::Entry { position, .. } => Some(*position),
        }
    }
}
