use thiserror::Error;

/// Everything that can be wrong with the bytes of a DNS message, either while reading one off the
/// wire or while encoding one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("truncated message: needed {needed} bytes at offset {offset}, only {available} left")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("label {0:?} is longer than 63 bytes")]
    LabelTooLong(String),

    #[error("domain name {0:?} contains an empty label")]
    EmptyLabel(String),

    #[error("domain name is longer than 255 bytes")]
    NameTooLong,

    #[error("compression pointer at offset {position} targets offset {target}")]
    InvalidPointer { position: usize, target: usize },

    #[error("label at offset {0} uses a reserved label type")]
    ReservedLabelType(usize),

    #[error("domain name {0:?} contains an invalid escape sequence")]
    InvalidEscape(String),

    #[error("resource data of {0} bytes does not fit into a 16 bit length")]
    RdataTooLong(usize),

    #[error("section holds {0} entries, more than a 16 bit count can express")]
    TooManyRecords(usize),
}

#[derive(Error, Debug)]
pub enum DnsError {
    #[error("malformed DNS message: {0}")]
    Format(#[from] FormatError),

    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),

    #[error("upstream sent a query instead of a response (id {0})")]
    UnexpectedReply(u16),
}

pub type Result<T, E = DnsError> = std::result::Result<T, E>;
