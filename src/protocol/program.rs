//! Host-side instruction stream builder.
//!
//! Values travel before the marker that consumes them, so a line move is
//! written as `<x>x<y>y<z>zB`.

use bytes::{BufMut, Bytes, BytesMut};

use super::codec;
use super::types::{Command, ControlChar, Parameter};
use super::PAYLOAD_LEN;

/// Accumulates an instruction stream for the driveboard.
#[derive(Debug, Clone, Default)]
pub struct Program {
    buf: BytesMut,
}

impl Program {
    /// Create an empty program.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter: four data bytes followed by its marker.
    #[must_use]
    pub fn param(mut self, param: Parameter, value: f64) -> Self {
        self.buf.reserve(PAYLOAD_LEN + 1);
        self.buf.put_slice(&codec::encode(value));
        self.buf.put_u8(param.as_u8());
        self
    }

    /// Append a command marker.
    #[must_use]
    pub fn command(mut self, command: Command) -> Self {
        self.buf.put_u8(command.as_u8());
        self
    }

    /// Append an out-of-band control character.
    #[must_use]
    pub fn control(mut self, control: ControlChar) -> Self {
        self.buf.put_u8(control.as_u8());
        self
    }

    /// Append raw bytes, bypassing the vocabulary. Useful for fault injection.
    #[must_use]
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.buf.put_slice(bytes);
        self
    }

    /// Append a line move to an absolute or relative target, depending on the
    /// reference mode the board is in.
    #[must_use]
    pub fn line(self, x: f64, y: f64, z: f64) -> Self {
        self.param(Parameter::TargetX, x)
            .param(Parameter::TargetY, y)
            .param(Parameter::TargetZ, z)
            .command(Command::Line)
    }

    /// Number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check whether nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Freeze into an immutable byte buffer.
    #[must_use]
    pub fn finish(self) -> Bytes {
        self.buf.freeze()
    }
}
