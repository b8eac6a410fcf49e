//! Collaborator seams
//!
//! The engine never touches planner, stepper or UART internals. It reaches
//! them through these traits:
//! - [`Planner`]: motion queue, executor position and the global stop flag
//! - [`SerialLink`]: byte-level transport
//! - [`Board`]: sensors, interlocks and low-level diagnostics
//!
//! Implementations backed by interrupts must make every query here safe to
//! call from the protocol context at any time.

use crate::protocol::{Axis, LimitEnd, StopCode};

/// Motion planner and step executor.
pub trait Planner {
    /// Queue a linear move to an absolute machine-frame target.
    fn submit_line(
        &mut self,
        target: [f64; 3],
        feedrate: f64,
        intensity: u8,
        pixel_width: f64,
    );

    /// Queue a stationary pulse.
    fn submit_dwell(&mut self, duration: f64, intensity: u8);

    /// Switch air assist.
    fn set_air_assist(&mut self, enabled: bool);

    /// Switch the auxiliary assist device.
    fn set_aux_assist(&mut self, enabled: bool);

    /// Run the homing cycle. Returns once the machine sits at its home switches.
    fn run_homing_cycle(&mut self);

    /// Drop every queued block.
    fn reset_queue(&mut self);

    /// Overwrite the planner's notion of where the head is.
    fn set_position(&mut self, position: [f64; 3]);

    /// Physical position reported by the executor.
    fn position(&self) -> [f64; 3];

    /// Whether any block is queued or executing.
    fn queue_has_pending(&self) -> bool;

    /// Whether the global stop is raised.
    fn stop_requested(&self) -> bool;

    /// Code of the active stop, if any.
    fn stop_code(&self) -> Option<StopCode>;

    /// Raise the global stop. The first code raised wins until cleared.
    fn request_stop(&mut self, code: StopCode);

    /// Clear the global stop.
    fn clear_stop(&mut self);
}

/// Byte transport to the host.
///
/// Flow control and transmission error detection belong to the implementor.
/// Reads and writes never block: the engine waits on the availability
/// queries so it can keep servicing stops in between.
pub trait SerialLink {
    /// Whether a received byte is waiting.
    fn bytes_available(&self) -> bool;

    /// Take the next received byte, if any.
    fn read_byte(&mut self) -> Option<u8>;

    /// Whether the transmit buffer can take another byte.
    fn write_space_available(&self) -> bool;

    /// Queue a byte for transmission. Only called when space is available.
    fn write_byte(&mut self, byte: u8);
}

/// Board-level sensors and services.
pub trait Board {
    /// Door interlock open.
    fn door_open(&self) -> bool;

    /// Cooling interlock reports no flow.
    fn cooling_off(&self) -> bool;

    /// Limit switch state.
    fn limit_hit(&self, axis: Axis, end: LimitEnd) -> bool;

    /// Drive the laser output to zero immediately, bypassing the planner.
    fn force_laser_off(&mut self);

    /// Bytes of stack that have never been touched.
    fn stack_clearance(&self) -> u32;

    /// Enter a short low-power wait.
    fn sleep(&mut self) {}
}
