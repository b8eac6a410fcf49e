//! Payload accumulator between markers.

use super::codec;
use super::{PAYLOAD_LEN, ProtocolError, Result};

/// Data bytes collected since the last marker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterBuffer {
    bytes: [u8; PAYLOAD_LEN],
    count: usize,
}

impl ParameterBuffer {
    /// Create an empty buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bytes: [0; PAYLOAD_LEN],
            count: 0,
        }
    }

    /// Append a data byte.
    ///
    /// A fifth byte before any marker is a framing violation.
    pub fn push(&mut self, byte: u8) -> Result<()> {
        if self.count >= PAYLOAD_LEN {
            return Err(ProtocolError::InvalidData { count: self.count });
        }
        self.bytes[self.count] = byte;
        self.count += 1;
        Ok(())
    }

    /// Decode the buffered payload. Requires exactly four bytes.
    pub fn value(&self) -> Result<f64> {
        if self.count != PAYLOAD_LEN {
            return Err(ProtocolError::InvalidData { count: self.count });
        }
        Ok(codec::decode(&self.bytes))
    }

    /// Number of bytes buffered.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.count
    }

    /// Check whether the buffer holds no data.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Discard any buffered bytes.
    pub fn clear(&mut self) {
        self.count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_buffer_decodes() {
        let mut buf = ParameterBuffer::new();
        for b in codec::encode(-42.5) {
            buf.push(b).unwrap();
        }
        assert_eq!(buf.len(), 4);
        assert_eq!(buf.value().unwrap(), -42.5);
    }

    #[test]
    fn fifth_byte_is_rejected() {
        let mut buf = ParameterBuffer::new();
        for _ in 0..4 {
            buf.push(200).unwrap();
        }
        assert_eq!(buf.push(200), Err(ProtocolError::InvalidData { count: 4 }));
        assert_eq!(buf.len(), 4);
    }

    #[test]
    fn short_payload_is_rejected() {
        let mut buf = ParameterBuffer::new();
        buf.push(130).unwrap();
        buf.push(131).unwrap();
        assert_eq!(buf.value(), Err(ProtocolError::InvalidData { count: 2 }));
        assert_eq!(
            ParameterBuffer::new().value(),
            Err(ProtocolError::InvalidData { count: 0 })
        );
    }

    #[test]
    fn clear_resets_count() {
        let mut buf = ParameterBuffer::new();
        buf.push(150).unwrap();
        buf.clear();
        assert!(buf.is_empty());
        assert!(buf.value().is_err());
    }
}
