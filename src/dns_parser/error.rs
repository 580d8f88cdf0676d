use std::io;

use thiserror::Error;

/// Error parsing or building a DNS packet
#[derive(Debug, Error)]
pub enum Error {
    #[error("read of {len} bytes at offset {offset} is out of bounds")]
    OutOfBounds { offset: usize, len: usize },
    #[error("packet is truncated")]
    TruncatedMessage,
    #[error("label length byte {0:#04x} has a reserved bit pattern")]
    InvalidLabelLength(u8),
    #[error("label is longer than 63 bytes")]
    LabelTooLong,
    #[error("name is longer than 255 bytes")]
    NameTooLong,
    #[error("label is empty or contains non-ascii characters")]
    InvalidLabel,
    #[error("compression pointer to offset {0} was already followed")]
    CompressionLoop(usize),
    #[error("compression pointer at offset {at} points forward to offset {target}")]
    CompressionPointerForward { at: usize, target: usize },
    #[error("too many entries in a packet section")]
    SectionFull,
    #[error("wrong (too short or too long) size of RDATA")]
    WrongRdataLength,
    #[error("error writing packet: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Reports cursor overruns the way a message reader sees them.
    pub(crate) fn into_truncated(self) -> Error {
        match self {
            Error::OutOfBounds { .. } => Error::TruncatedMessage,
            other => other,
        }
    }
}
