//! Fixed-point numeric codec
//!
//! Every number on the wire is a signed fixed-point value with three decimals,
//! carried as a 28-bit biased integer spread over four data bytes.

use super::{DATA_BIAS, NUMBER_BIAS, PAYLOAD_LEN};

/// Largest raw (biased) value that fits in 28 bits.
const RAW_MAX: i64 = (1 << 28) - 1;

/// Smallest encodable value.
pub const VALUE_MIN: f64 = -134_217.728;

/// Largest encodable value.
pub const VALUE_MAX: f64 = 134_217.727;

/// Encode a value into four data bytes
///
/// # Format
///
/// ```text
/// n = round(value * 1000 + 2^27)
/// [n & 0x7f | 0x80] [(n >> 7) & 0x7f | 0x80] [(n >> 14) ...] [(n >> 21) ...]
/// ```
///
/// Values outside [`VALUE_MIN`, `VALUE_MAX`] saturate at the range ends.
#[must_use]
pub fn encode(value: f64) -> [u8; PAYLOAD_LEN] {
    // `as` saturates on overflow and maps NaN to zero, which encodes as 0.0
    #[allow(clippy::cast_possible_truncation)]
    let scaled = (value * 1000.0).round() as i64;
    let raw = scaled.saturating_add(NUMBER_BIAS).clamp(0, RAW_MAX);

    let mut bytes = [0u8; PAYLOAD_LEN];
    for (i, byte) in bytes.iter_mut().enumerate() {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let septet = ((raw >> (7 * i)) & 0x7f) as u8;
        *byte = septet + DATA_BIAS;
    }
    bytes
}

/// Decode four data bytes into a value
///
/// Bytes are expected in `[128, 255]`; byte 0 carries the least-significant
/// seven bits.
#[must_use]
pub fn decode(bytes: &[u8; PAYLOAD_LEN]) -> f64 {
    let raw = bytes
        .iter()
        .rev()
        .fold(0i64, |acc, &b| (acc << 7) | i64::from(b.wrapping_sub(DATA_BIAS) & 0x7f));

    #[allow(clippy::cast_precision_loss)]
    let value = (raw - NUMBER_BIAS) as f64 / 1000.0;
    value
}
