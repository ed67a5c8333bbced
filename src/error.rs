use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, RtpError>;

/// Why a header was rejected as malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderDefect {
    /// The version bits did not hold 2.
    Version(u8),
    /// The padding flag was set but the trailing count byte was 0.
    ZeroPadding,
}

/// Errors produced while parsing or mutating an RTP packet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RtpError {
    /// The storage cannot hold the requested number of bytes.
    #[error("buffer too small: need {needed} bytes, have {capacity}")]
    BufferTooSmall { needed: usize, capacity: usize },

    /// A variable-length region runs past the end of the packet.
    #[error("region ends at byte {needed} but packet is {packet_size} bytes")]
    ParseBufferOverflow { needed: usize, packet_size: usize },

    /// The extension block runs past the end of the packet.
    #[error("extension ends at byte {needed} but packet is {packet_size} bytes")]
    ParseExtensionOverflow { needed: usize, packet_size: usize },

    /// The version bits or the padding count are malformed.
    #[error("invalid rtp header: {0:?}")]
    InvalidRtpHeader(HeaderDefect),

    /// More than 15 contributing sources were requested.
    #[error("csrc count {0} exceeds 15")]
    InvalidCsrcCount(u8),
}

/// A failed parse that hands the storage back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected<S> {
    error: RtpError,
    storage: S,
}

impl<S> Rejected<S> {
    pub(crate) fn new(error: RtpError, storage: S) -> Self {
        Rejected { error, storage }
    }

    pub fn error(&self) -> &RtpError {
        &self.error
    }

    /// The storage, untouched by the failed parse.
    pub fn into_inner(self) -> S {
        self.storage
    }
}

impl<S> From<Rejected<S>> for RtpError {
    fn from(rejected: Rejected<S>) -> Self {
        rejected.error
    }
}

impl RtpError {
    pub(crate) fn too_small(needed: usize, capacity: usize) -> Self {
        RtpError::BufferTooSmall { needed, capacity }
    }

    pub(crate) fn overflow(needed: usize, packet_size: usize) -> Self {
        RtpError::ParseBufferOverflow {
            needed,
            packet_size,
        }
    }
}
