use std::{io, path::PathBuf};

/// Errors of the sysfs 1-Wire driver.
#[derive(Debug, thiserror::Error)]
pub enum W1SysfsError {
    /// The transfer frame is shorter than its header or does not start with Match ROM.
    #[error("not a valid device selection")]
    MalformedFrame,

    /// A device directory name could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Opening, reading or writing a sysfs file failed.
    #[error("{}: {source}", .path.display())]
    Io {
        /// File the operation was on.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// Fewer bytes than requested reached a sysfs file.
    #[error("{}: write incomplete ({written} of {expected} bytes)", .path.display())]
    ShortWrite {
        /// File written to.
        path: PathBuf,
        /// Bytes accepted.
        written: usize,
        /// Bytes requested.
        expected: usize,
    },

    /// The bus directory holds no device entries.
    #[error("no onewire device found in sysfs")]
    NoDeviceFound,

    /// No numbered bus master directory exists.
    #[error("no onewire bus found in sysfs")]
    NoBusFound,

    /// The platform has no w1 sysfs interface.
    #[error("sysfs-onewire: is not supported on this platform")]
    UnsupportedPlatform,

    /// The registrar refused a bus.
    #[error("bus registration failed: {0}")]
    Registration(String),
}

impl W1SysfsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failure to decode a `<family>-<serial>` device directory name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The name does not have the 2 + 1 + 12 character layout.
    #[error("device name must be 15 characters, got {0}")]
    Length(usize),

    /// The third character is not `-`.
    #[error("expected '-' after the family code, got {0:?}")]
    Separator(char),

    /// The family code is not two hex digits.
    #[error("sysfs onewire device family decode error")]
    Family,

    /// The serial number is not twelve hex digits.
    #[error("sysfs onewire device address decode error")]
    Serial,
}
