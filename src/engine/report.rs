//! Status telegram assembly and the request flags that trigger it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use tracing::{instrument, trace};

use crate::hal::{Board, Planner, SerialLink};
use crate::protocol::metrics::{Metrics, ReportKind};
use crate::protocol::{Axis, ControlChar, InfoFlag, LimitEnd, StatusField, StopCode, encode};

use super::Engine;

/// Report and underrun flags, settable from interrupt context.
///
/// Clones share the same flags. The serial receive path holds one to request
/// telegrams and to record buffer underruns.
#[derive(Clone, Debug)]
pub struct ReportRequests {
    inner: Arc<RequestFlags>,
}

#[derive(Debug)]
struct RequestFlags {
    status: AtomicBool,
    superstatus: AtomicBool,
    underruns: AtomicU32,
    underruns_reported: AtomicBool,
}

impl ReportRequests {
    /// Startup flags: both reports pending, no unreported underrun.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RequestFlags {
                status: AtomicBool::new(true),
                superstatus: AtomicBool::new(true),
                underruns: AtomicU32::new(0),
                underruns_reported: AtomicBool::new(true),
            }),
        }
    }

    /// Ask for a status telegram at the next idle pass.
    pub fn request_status(&self) {
        self.inner.status.store(true, Ordering::Release);
    }

    /// Ask for a superstatus telegram at the next idle pass.
    pub fn request_superstatus(&self) {
        self.inner.superstatus.store(true, Ordering::Release);
    }

    /// Record that the receive buffer ran empty while the engine waited.
    pub fn mark_underrun(&self) {
        self.inner.underruns.fetch_add(1, Ordering::AcqRel);
        self.inner.underruns_reported.store(false, Ordering::Release);
    }

    /// Total underruns recorded.
    #[must_use]
    pub fn underruns(&self) -> u32 {
        self.inner.underruns.load(Ordering::Acquire)
    }

    /// Whether any telegram is pending.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.inner.status.load(Ordering::Acquire) || self.inner.superstatus.load(Ordering::Acquire)
    }

    /// Clear both flags, returning whether superstatus was requested.
    fn take(&self) -> bool {
        self.inner.status.store(false, Ordering::Release);
        self.inner.superstatus.swap(false, Ordering::AcqRel)
    }

    /// Underrun count if it has not been reported yet. Marks it reported.
    fn take_unreported_underruns(&self) -> Option<u32> {
        if self.inner.underruns_reported.swap(true, Ordering::AcqRel) {
            None
        } else {
            Some(self.underruns())
        }
    }
}

impl Default for ReportRequests {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, L, B> Engine<P, L, B>
where
    P: Planner,
    L: SerialLink,
    B: Board,
{
    /// Write one telegram. Both request flags are cleared up front.
    #[instrument(level = "trace", skip(self))]
    pub(crate) fn emit_report(&mut self) {
        let superstatus = self.requests.take();

        let idle = !self.planner.queue_has_pending()
            && !self.link.bytes_available()
            && !self.planner.stop_requested();
        if idle {
            self.write(InfoFlag::Idle.as_u8());
            self.board.sleep();
        }

        if self.board.door_open() {
            self.write(InfoFlag::DoorOpen.as_u8());
        }
        if self.board.cooling_off() {
            self.write(InfoFlag::ChillerOff.as_u8());
        }

        let stop_code = self.planner.stop_code();
        if let Some(code) = stop_code {
            self.write(code.as_u8());
        }
        if self.config.interlocks {
            self.write_limits(stop_code);
        }

        // positions in the user frame
        let actual = self.planner.position();
        for axis in Axis::ALL {
            let i = axis.index();
            let pos = actual[i] - self.config.origin_offset[i] - self.state.offset[i];
            self.write_field(StatusField::position(axis), pos);
        }

        if let Some(count) = self.requests.take_unreported_underruns() {
            self.write_field(StatusField::BufferUnderrun, f64::from(count));
        }
        let clearance = self.board.stack_clearance();
        self.write_field(StatusField::StackClearance, f64::from(clearance));

        if superstatus {
            self.write_field(StatusField::Version, self.config.version);
            for axis in Axis::ALL {
                self.write_field(StatusField::offset(axis), self.state.offset[axis.index()]);
            }
            self.write_field(StatusField::Feedrate, self.state.feedrate);
            self.write_field(StatusField::Intensity, f64::from(self.state.intensity));
            self.write_field(StatusField::Duration, self.state.duration);
            self.write_field(StatusField::PixelWidth, self.state.pixel_width);
        }

        self.write(ControlChar::StatusEnd.as_u8());
        Metrics::record_report(if superstatus {
            ReportKind::Superstatus
        } else {
            ReportKind::Status
        });
        trace!(idle, superstatus, "telegram sent");
    }

    /// Report every tripped limit switch not already named by the stop code.
    fn write_limits(&mut self, stop_code: Option<StopCode>) {
        let axes: &[Axis] = if self.config.three_axes {
            &Axis::ALL
        } else {
            &[Axis::X, Axis::Y]
        };
        for &axis in axes {
            for end in [LimitEnd::Min, LimitEnd::Max] {
                let code = StopCode::limit(axis, end);
                if self.board.limit_hit(axis, end) && stop_code != Some(code) {
                    self.write(code.as_u8());
                }
            }
        }
    }

    fn write_field(&mut self, field: StatusField, value: f64) {
        for byte in encode(value) {
            self.write(byte);
        }
        self.write(field.as_u8());
    }

    /// Blocking write. While the transmit buffer is full only the safety and
    /// stop-recovery steps run, never reporting.
    fn write(&mut self, byte: u8) {
        while !self.link.write_space_available() {
            self.service_safety();
        }
        self.link.write_byte(byte);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startup_requests_are_pending() {
        let requests = ReportRequests::new();
        assert!(requests.is_pending());
        assert!(requests.take());
        assert!(!requests.is_pending());
        assert_eq!(requests.take_unreported_underruns(), None);
    }

    #[test]
    fn underrun_is_reported_once() {
        let requests = ReportRequests::new();
        let isr = requests.clone();
        isr.mark_underrun();
        isr.mark_underrun();
        assert_eq!(requests.take_unreported_underruns(), Some(2));
        assert_eq!(requests.take_unreported_underruns(), None);
        isr.mark_underrun();
        assert_eq!(requests.take_unreported_underruns(), Some(3));
    }

    #[test]
    fn status_request_is_not_superstatus() {
        let requests = ReportRequests::new();
        requests.take();
        requests.request_status();
        assert!(requests.is_pending());
        assert!(!requests.take());
    }
}
