//! Driveboard protocol core
//!
//! This module provides the byte vocabulary, the fixed-point number codec and
//! the host-side helpers for building instruction streams and reading status
//! telegrams.

mod buffer;
mod codec;
mod error;
pub(crate) mod metrics;
mod program;
mod telegram;
mod types;

pub use buffer::ParameterBuffer;
pub use codec::{VALUE_MAX, VALUE_MIN, decode, encode};
pub use error::{ProtocolError, Result, TelegramError};
pub use metrics::MetricsSnapshot;
pub use program::Program;
pub use telegram::{StatusReport, Superstatus};
pub use types::{Axis, Command, ControlChar, InfoFlag, LimitEnd, Parameter, StatusField, StopCode};

/// Data bytes per encoded number
pub const PAYLOAD_LEN: usize = 4;

/// Offset added to every 7-bit payload group so data bytes stay in `[128, 255]`
pub const DATA_BIAS: u8 = 128;

/// Bias applied to the scaled value so the 28-bit payload is unsigned (2^27)
pub const NUMBER_BIAS: i64 = 1 << 27;

/// Highest byte that is a marker rather than data
pub const MARKER_MAX: u8 = 127;
