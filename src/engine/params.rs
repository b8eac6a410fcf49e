use tracing::{debug, trace};

use crate::hal::{Board, Planner, SerialLink};
use crate::protocol::metrics::Metrics;
use crate::protocol::{Axis, Parameter, ProtocolError, Result};

use super::{Engine, ReferenceMode};

impl<P, L, B> Engine<P, L, B>
where
    P: Planner,
    L: SerialLink,
    B: Board,
{
    /// Apply the buffered value to the parameter named by `marker`.
    ///
    /// The payload is checked before the marker, so an unknown parameter with
    /// a short payload is reported as invalid data.
    pub(crate) fn set_parameter(&mut self, marker: u8) -> Result<()> {
        let value = self.buffer.value()?;
        let param = Parameter::from_u8(marker).ok_or(ProtocolError::InvalidParameter {
            marker: char::from(marker),
        })?;
        Metrics::record_parameter();
        trace!(?param, value, "parameter");

        match param {
            Parameter::TargetX => self.set_target(Axis::X, value),
            Parameter::TargetY => self.set_target(Axis::Y, value),
            Parameter::TargetZ => self.set_target(Axis::Z, value),
            Parameter::Feedrate => self.state.feedrate = value,
            Parameter::Intensity => self.state.intensity = intensity_from(value),
            Parameter::Duration => self.state.duration = value,
            Parameter::PixelWidth => self.state.pixel_width = value,
            Parameter::OffsetX => self.set_offset(Axis::X, value),
            Parameter::OffsetY => self.set_offset(Axis::Y, value),
            Parameter::OffsetZ => self.set_offset(Axis::Z, value),
        }
        Ok(())
    }

    fn set_target(&mut self, axis: Axis, value: f64) {
        let i = axis.index();
        match self.state.reference_mode {
            ReferenceMode::Absolute => {
                self.state.target[i] = value + self.config.origin_offset[i] + self.state.offset[i];
            }
            ReferenceMode::Relative => self.state.target[i] += value,
        }
    }

    fn set_offset(&mut self, axis: Axis, value: f64) {
        let i = axis.index();
        match self.state.reference_mode {
            ReferenceMode::Absolute => self.state.offset[i] = value,
            ReferenceMode::Relative => {
                // anchor to where the head actually is, not the pending target
                if !self.drain_queue() {
                    debug!(?axis, "stop during drain, relative offset dropped");
                    return;
                }
                let actual = self.planner.position();
                self.state.offset[i] = actual[i] - self.config.origin_offset[i] + value;
            }
        }
    }

    /// Wait for the motion queue to empty, servicing the idle handler.
    ///
    /// Returns `false` if a stop was raised before the queue drained.
    pub(crate) fn drain_queue(&mut self) -> bool {
        loop {
            if self.planner.stop_requested() {
                return false;
            }
            if !self.planner.queue_has_pending() {
                return true;
            }
            self.idle();
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn intensity_from(value: f64) -> u8 {
    value.clamp(0.0, 255.0) as u8
}
