//! Host-side status telegram parser.
//!
//! A telegram is a run of flag bytes and numeric fields terminated by
//! [`ControlChar::StatusEnd`]. Numeric fields use the same inverse framing as
//! the instruction stream: four data bytes, then the field marker.

use super::codec;
use super::error::TelegramError;
use super::types::{ControlChar, InfoFlag, StatusField, StopCode};
use super::PAYLOAD_LEN;

/// Extended fields present only in a superstatus telegram.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Superstatus {
    /// Firmware version number
    pub version: f64,
    /// Raw offset vector
    pub offset: [f64; 3],
    /// Feedrate in mm/min
    pub feedrate: f64,
    /// Intensity, 0-255
    pub intensity: f64,
    /// Dwell duration
    pub duration: f64,
    /// Raster pixel width in mm
    pub pixel_width: f64,
}

/// One decoded status telegram.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusReport {
    /// Board reported itself idle
    pub idle: bool,
    /// Door interlock open
    pub door_open: bool,
    /// Cooling interlock off
    pub chiller_off: bool,
    /// Stop codes in the order received
    pub stops: Vec<StopCode>,
    /// Position in the user frame
    pub position: [f64; 3],
    /// Underrun count, present only when it changed since the last telegram
    pub underruns: Option<u32>,
    /// Never-used stack bytes
    pub stack_clearance: Option<u32>,
    /// Extended fields
    pub superstatus: Option<Superstatus>,
}

impl StatusReport {
    /// Whether a stop condition is active.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        !self.stops.is_empty()
    }

    /// Parse one telegram from the start of `bytes`.
    ///
    /// Returns the report and the number of bytes consumed, END included.
    pub fn parse(bytes: &[u8]) -> Result<(Self, usize), TelegramError> {
        let mut report = Self::default();
        let mut payload = [0u8; PAYLOAD_LEN];
        let mut count = 0usize;

        for (i, &byte) in bytes.iter().enumerate() {
            match byte {
                b if b == ControlChar::StatusEnd.as_u8() => return Ok((report, i + 1)),
                0..=31 => {}
                32..=64 => {
                    let code = StopCode::from_u8(byte).ok_or(TelegramError::UnknownFlag { byte })?;
                    report.stops.push(code);
                }
                65..=90 => {
                    match InfoFlag::from_u8(byte).ok_or(TelegramError::UnknownFlag { byte })? {
                        InfoFlag::Idle => report.idle = true,
                        InfoFlag::DoorOpen => report.door_open = true,
                        InfoFlag::ChillerOff => report.chiller_off = true,
                    }
                    count = 0;
                }
                97..=122 => {
                    let marker = char::from(byte);
                    let field =
                        StatusField::from_u8(byte).ok_or(TelegramError::UnknownField { marker })?;
                    if count != PAYLOAD_LEN {
                        return Err(TelegramError::ShortPayload { marker, count });
                    }
                    report.apply(field, codec::decode(&payload));
                    count = 0;
                }
                128..=255 => {
                    if count >= PAYLOAD_LEN {
                        return Err(TelegramError::PayloadOverflow);
                    }
                    payload[count] = byte;
                    count += 1;
                }
                _ => return Err(TelegramError::UnknownFlag { byte }),
            }
        }

        Err(TelegramError::Truncated {
            consumed: bytes.len(),
        })
    }

    fn apply(&mut self, field: StatusField, value: f64) {
        match field {
            StatusField::PositionX => self.position[0] = value,
            StatusField::PositionY => self.position[1] = value,
            StatusField::PositionZ => self.position[2] = value,
            StatusField::BufferUnderrun => self.underruns = Some(as_count(value)),
            StatusField::StackClearance => self.stack_clearance = Some(as_count(value)),
            StatusField::Version => self.extended().version = value,
            StatusField::OffsetX => self.extended().offset[0] = value,
            StatusField::OffsetY => self.extended().offset[1] = value,
            StatusField::OffsetZ => self.extended().offset[2] = value,
            StatusField::Feedrate => self.extended().feedrate = value,
            StatusField::Intensity => self.extended().intensity = value,
            StatusField::Duration => self.extended().duration = value,
            StatusField::PixelWidth => self.extended().pixel_width = value,
        }
    }

    fn extended(&mut self) -> &mut Superstatus {
        self.superstatus.get_or_insert_with(Superstatus::default)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn as_count(value: f64) -> u32 {
    value.round().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(out: &mut Vec<u8>, field: StatusField, value: f64) {
        out.extend_from_slice(&codec::encode(value));
        out.push(field.as_u8());
    }

    #[test]
    fn parses_basic_status() {
        let mut bytes = vec![b'A'];
        field(&mut bytes, StatusField::PositionX, 2.0);
        field(&mut bytes, StatusField::PositionY, -0.5);
        field(&mut bytes, StatusField::PositionZ, 0.0);
        field(&mut bytes, StatusField::StackClearance, 512.0);
        bytes.push(6);
        bytes.push(b'A'); // start of next telegram

        let (report, used) = StatusReport::parse(&bytes).unwrap();
        assert_eq!(used, bytes.len() - 1);
        assert!(report.idle);
        assert!(!report.is_stopped());
        assert_eq!(report.position, [2.0, -0.5, 0.0]);
        assert_eq!(report.stack_clearance, Some(512));
        assert_eq!(report.underruns, None);
        assert!(report.superstatus.is_none());
    }

    #[test]
    fn parses_stop_codes_and_superstatus() {
        let mut bytes = vec![b'B', b':', b'$'];
        field(&mut bytes, StatusField::Version, 1501.0);
        field(&mut bytes, StatusField::OffsetY, 7.25);
        field(&mut bytes, StatusField::Intensity, 255.0);
        bytes.push(6);

        let (report, _) = StatusReport::parse(&bytes).unwrap();
        assert!(report.door_open);
        assert_eq!(report.stops, vec![StopCode::InvalidData, StopCode::LimitHitX1]);
        let ext = report.superstatus.unwrap();
        assert_eq!(ext.version, 1501.0);
        assert_eq!(ext.offset, [0.0, 7.25, 0.0]);
        assert_eq!(ext.intensity, 255.0);
    }

    #[test]
    fn rejects_malformed_telegrams() {
        assert_eq!(
            StatusReport::parse(b"A"),
            Err(TelegramError::Truncated { consumed: 1 })
        );
        assert_eq!(
            StatusReport::parse(&[200, 200, b'x', 6]),
            Err(TelegramError::ShortPayload {
                marker: 'x',
                count: 2
            })
        );
        assert_eq!(
            StatusReport::parse(&[b'Q', 6]),
            Err(TelegramError::UnknownFlag { byte: b'Q' })
        );
        assert_eq!(
            StatusReport::parse(&[200, 200, 200, 200, b'q', 6]),
            Err(TelegramError::UnknownField { marker: 'q' })
        );
        assert_eq!(
            StatusReport::parse(&[200, 200, 200, 200, 200, 6]),
            Err(TelegramError::PayloadOverflow)
        );
    }
}
