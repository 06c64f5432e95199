use thiserror::Error;

/// Errors produced by the codec and the stream framing layer.
#[derive(Debug, Error)]
pub enum Error {
    /// The message does not fit in the data bits of the code.
    #[error("Message {value:#x} does not fit within {data_bits} data bits")]
    InputTooWide { value: u64, data_bits: u32 },

    /// Nonzero syndrome with even overall parity: at least two bits flipped.
    #[error("At least 2 bits flipped in codeword {codeword:#x} (syndrome {syndrome}), unable to decode")]
    Uncorrectable { codeword: u64, syndrome: u32 },

    /// The source or destination could not be opened, read or written.
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    /// A stream frame could not be decoded; earlier frames were already written.
    #[error("Frame {frame} at byte offset {offset} could not be decoded: {source}")]
    Frame {
        frame: u64,
        offset: u64,
        #[source]
        source: Box<Error>,
    },

    /// Invalid parameters or a malformed encoded stream.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for codec operations
pub type Result<T> = std::result::Result<T, Error>;
