//! Error types for the CH341A bridge

use thiserror::Error;

/// Result type for CH341A operations
pub type Result<T> = std::result::Result<T, Ch341aError>;

/// Errors that can occur when driving the CH341A
#[derive(Debug, Error)]
pub enum Ch341aError {
    /// No CH341A on the bus (or not the requested index)
    #[error("CH341A device not found (VID:1a86 PID:5512)")]
    DeviceNotFound,
    /// Enumeration or open failed
    #[error("failed to open CH341A: {0}")]
    OpenFailed(String),
    /// Claiming interface 0 failed
    #[error("failed to claim interface: {0}")]
    ClaimFailed(String),
    /// A bulk transfer failed
    #[error("USB transfer failed: {0}")]
    TransferFailed(String),
    /// The device returned fewer bytes than the packet it acknowledged
    #[error("short response from CH341A")]
    ShortResponse,
}

impl From<Ch341aError> for sflash_core::Error {
    fn from(e: Ch341aError) -> Self {
        sflash_core::Error::Transfer(e.to_string())
    }
}
