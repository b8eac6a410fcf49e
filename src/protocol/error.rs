//! Driveboard protocol error types

use thiserror::Error;

use super::types::StopCode;

/// Violations of the instruction stream framing.
///
/// None of these are recovered locally. The engine converts each one into a
/// [`StopCode`] and raises the global stop through the planner.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    /// Marker byte outside the command and parameter ranges
    #[error("invalid marker: {byte:#04x}")]
    InvalidMarker {
        /// Offending byte
        byte: u8,
    },

    /// Data byte overflowed the buffer, or a parameter arrived with a short payload
    #[error("invalid data: {count} payload bytes buffered")]
    InvalidData {
        /// Payload bytes buffered when the violation was detected
        count: usize,
    },

    /// Parameter marker with no known meaning
    #[error("invalid parameter marker: {marker:?}")]
    InvalidParameter {
        /// Offending marker
        marker: char,
    },

    /// Command marker with no known meaning
    #[error("invalid command marker: {marker:?}")]
    InvalidCommand {
        /// Offending marker
        marker: char,
    },
}

impl ProtocolError {
    /// Stop code reported to the host for this violation.
    #[must_use]
    pub const fn stop_code(self) -> StopCode {
        match self {
            Self::InvalidMarker { .. } => StopCode::InvalidMarker,
            Self::InvalidData { .. } => StopCode::InvalidData,
            Self::InvalidParameter { .. } => StopCode::InvalidParameter,
            Self::InvalidCommand { .. } => StopCode::InvalidCommand,
        }
    }
}

/// Errors raised while parsing a status telegram on the host side.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TelegramError {
    /// Telegram ended before the END byte
    #[error("telegram truncated after {consumed} bytes")]
    Truncated {
        /// Bytes consumed before running out
        consumed: usize,
    },

    /// Flag byte that is neither an info flag nor a stop code
    #[error("unknown flag byte: {byte:#04x}")]
    UnknownFlag {
        /// Offending byte
        byte: u8,
    },

    /// Parameter marker not part of the status vocabulary
    #[error("unknown status field: {marker:?}")]
    UnknownField {
        /// Offending marker
        marker: char,
    },

    /// More than four data bytes before a field marker
    #[error("field payload overflow")]
    PayloadOverflow,

    /// Field marker preceded by fewer than four data bytes
    #[error("field {marker:?} has a short payload of {count} bytes")]
    ShortPayload {
        /// Field marker
        marker: char,
        /// Bytes buffered
        count: usize,
    },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ProtocolError>;
