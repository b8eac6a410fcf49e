//! In-memory collaborators for host-side runs and tests.
//!
//! [`SimPlanner`] executes queued blocks one per poll, [`SimLink`] plays the
//! role of the serial interrupt (including control character handling), and
//! [`SimBoard`] exposes settable sensors.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use tracing::trace;

use crate::engine::ReportRequests;
use crate::hal::{Board, Planner, SerialLink};
use crate::protocol::{Axis, ControlChar, LimitEnd, StopCode};

/// Interrupt-safe global stop flag.
///
/// Holds the active [`StopCode`], or nothing. The first code raised wins until
/// the flag is cleared.
#[derive(Clone, Debug, Default)]
pub struct StopSignal {
    code: Arc<AtomicU8>,
}

impl StopSignal {
    /// Create a cleared signal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise a stop unless one is already active.
    pub fn raise(&self, code: StopCode) {
        let _ = self
            .code
            .compare_exchange(0, code.as_u8(), Ordering::AcqRel, Ordering::Acquire);
    }

    /// Clear the stop.
    pub fn clear(&self) {
        self.code.store(0, Ordering::Release);
    }

    /// Active stop code.
    #[must_use]
    pub fn code(&self) -> Option<StopCode> {
        StopCode::from_u8(self.code.load(Ordering::Acquire))
    }

    /// Whether a stop is active.
    #[must_use]
    pub fn is_raised(&self) -> bool {
        self.code.load(Ordering::Acquire) != 0
    }
}

/// A block handed to the planner.
#[derive(Debug, Clone, PartialEq)]
pub enum Motion {
    /// Linear move
    Line {
        /// Machine-frame target
        target: [f64; 3],
        /// Feedrate in mm/min
        feedrate: f64,
        /// Laser intensity
        intensity: u8,
        /// Raster pixel width, zero for vector moves
        pixel_width: f64,
    },
    /// Stationary pulse
    Dwell {
        /// Pulse duration
        duration: f64,
        /// Laser intensity
        intensity: u8,
    },
}

/// Planner that executes one queued block per [`Planner::queue_has_pending`] poll.
#[derive(Debug)]
pub struct SimPlanner {
    stop: StopSignal,
    home: [f64; 3],
    position: Cell<[f64; 3]>,
    planned: [f64; 3],
    queue: RefCell<VecDeque<Motion>>,
    stalled: bool,
    fault_after: Cell<Option<(u32, StopCode)>>,
    submitted: Vec<Motion>,
    air: bool,
    aux: bool,
    homing_cycles: u32,
    queue_resets: u32,
}

impl SimPlanner {
    /// Create a planner with the head parked at `home`.
    #[must_use]
    pub fn new(home: [f64; 3]) -> Self {
        Self {
            stop: StopSignal::new(),
            home,
            position: Cell::new(home),
            planned: home,
            queue: RefCell::new(VecDeque::new()),
            stalled: false,
            fault_after: Cell::new(None),
            submitted: Vec::new(),
            air: false,
            aux: false,
            homing_cycles: 0,
            queue_resets: 0,
        }
    }

    /// Shared handle to the stop flag.
    #[must_use]
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// Freeze or resume the executor. A stalled executor never drains.
    pub fn set_stalled(&mut self, stalled: bool) {
        self.stalled = stalled;
    }

    /// Raise `code` from the executor after `polls` more queue polls.
    pub fn fault_after(&self, polls: u32, code: StopCode) {
        self.fault_after.set(Some((polls, code)));
    }

    /// Move the physical head without going through the queue.
    pub fn jog_to(&self, position: [f64; 3]) {
        self.position.set(position);
    }

    /// Position the planner believes the head will reach.
    #[must_use]
    pub fn planned_position(&self) -> [f64; 3] {
        self.planned
    }

    /// Every block submitted so far, in order.
    #[must_use]
    pub fn submitted(&self) -> &[Motion] {
        &self.submitted
    }

    /// Blocks still waiting for the executor.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Air assist state.
    #[must_use]
    pub fn air_assist(&self) -> bool {
        self.air
    }

    /// Aux assist state.
    #[must_use]
    pub fn aux_assist(&self) -> bool {
        self.aux
    }

    /// Number of homing cycles run.
    #[must_use]
    pub fn homing_cycles(&self) -> u32 {
        self.homing_cycles
    }

    /// Number of queue resets.
    #[must_use]
    pub fn queue_resets(&self) -> u32 {
        self.queue_resets
    }

    fn enqueue(&mut self, motion: Motion) {
        if let Motion::Line { target, .. } = motion {
            self.planned = target;
        }
        self.submitted.push(motion.clone());
        self.queue.borrow_mut().push_back(motion);
    }

    fn tick(&self) {
        if let Some((polls, code)) = self.fault_after.get() {
            if polls == 0 {
                self.fault_after.set(None);
                self.stop.raise(code);
            } else {
                self.fault_after.set(Some((polls - 1, code)));
            }
        }
        if self.stalled || self.stop.is_raised() {
            return;
        }
        if let Some(Motion::Line { target, .. }) = self.queue.borrow_mut().pop_front() {
            self.position.set(target);
        }
    }
}

impl Planner for SimPlanner {
    fn submit_line(&mut self, target: [f64; 3], feedrate: f64, intensity: u8, pixel_width: f64) {
        self.enqueue(Motion::Line {
            target,
            feedrate,
            intensity,
            pixel_width,
        });
    }

    fn submit_dwell(&mut self, duration: f64, intensity: u8) {
        self.enqueue(Motion::Dwell {
            duration,
            intensity,
        });
    }

    fn set_air_assist(&mut self, enabled: bool) {
        self.air = enabled;
    }

    fn set_aux_assist(&mut self, enabled: bool) {
        self.aux = enabled;
    }

    fn run_homing_cycle(&mut self) {
        self.homing_cycles += 1;
        self.queue.borrow_mut().clear();
        self.position.set(self.home);
        self.planned = self.home;
    }

    fn reset_queue(&mut self) {
        self.queue_resets += 1;
        self.queue.borrow_mut().clear();
    }

    fn set_position(&mut self, position: [f64; 3]) {
        self.planned = position;
    }

    fn position(&self) -> [f64; 3] {
        self.position.get()
    }

    fn queue_has_pending(&self) -> bool {
        self.tick();
        !self.queue.borrow().is_empty()
    }

    fn stop_requested(&self) -> bool {
        self.stop.is_raised()
    }

    fn stop_code(&self) -> Option<StopCode> {
        self.stop.code()
    }

    fn request_stop(&mut self, code: StopCode) {
        self.stop.raise(code);
    }

    fn clear_stop(&mut self) {
        self.stop.clear();
    }
}

/// Serial link backed by in-memory queues.
///
/// Received control characters are handled here, the way the receive
/// interrupt does on the board, once [`SimLink::attach`] has wired up the
/// engine's flags. Transmitted bytes sit in a bounded FIFO; each poll that
/// finds it full shifts one byte out onto the wire.
#[derive(Debug)]
pub struct SimLink {
    rx: VecDeque<u8>,
    tx_fifo: RefCell<VecDeque<u8>>,
    wire: RefCell<Vec<u8>>,
    tx_capacity: usize,
    stalls: Cell<u64>,
    requests: Option<ReportRequests>,
    stop: Option<StopSignal>,
}

impl SimLink {
    /// Create a link whose transmit FIFO holds `tx_capacity` bytes.
    #[must_use]
    pub fn new(tx_capacity: usize) -> Self {
        assert!(tx_capacity > 0, "tx_capacity must be positive");
        Self {
            rx: VecDeque::new(),
            tx_fifo: RefCell::new(VecDeque::with_capacity(tx_capacity)),
            wire: RefCell::new(Vec::new()),
            tx_capacity,
            stalls: Cell::new(0),
            requests: None,
            stop: None,
        }
    }

    /// Route received control characters to the engine's flags.
    pub fn attach(&mut self, requests: ReportRequests, stop: StopSignal) {
        self.requests = Some(requests);
        self.stop = Some(stop);
    }

    /// Deliver bytes from the host.
    pub fn receive(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            if !self.intercept(byte) {
                self.rx.push_back(byte);
            }
        }
    }

    fn intercept(&self, byte: u8) -> bool {
        let (Some(requests), Some(stop)) = (&self.requests, &self.stop) else {
            return false;
        };
        match ControlChar::from_u8(byte) {
            Some(ControlChar::Stop) => stop.raise(StopCode::SerialStopRequest),
            Some(ControlChar::Resume) => stop.clear(),
            Some(ControlChar::Status) => requests.request_status(),
            Some(ControlChar::Superstatus) => requests.request_superstatus(),
            _ => return false,
        }
        trace!(byte, "control character handled by link");
        true
    }

    /// Bytes still waiting to be read by the engine.
    #[must_use]
    pub fn pending_input(&self) -> usize {
        self.rx.len()
    }

    /// Everything transmitted so far, in order. Empties the link.
    pub fn take_output(&mut self) -> Vec<u8> {
        let mut out = std::mem::take(self.wire.get_mut());
        out.extend(self.tx_fifo.get_mut().drain(..));
        out
    }

    /// Number of polls that found the transmit FIFO full.
    #[must_use]
    pub fn tx_stalls(&self) -> u64 {
        self.stalls.get()
    }
}

impl SerialLink for SimLink {
    fn bytes_available(&self) -> bool {
        !self.rx.is_empty()
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }

    fn write_space_available(&self) -> bool {
        let mut fifo = self.tx_fifo.borrow_mut();
        if fifo.len() < self.tx_capacity {
            return true;
        }
        self.stalls.set(self.stalls.get() + 1);
        if let Some(byte) = fifo.pop_front() {
            self.wire.borrow_mut().push(byte);
        }
        false
    }

    fn write_byte(&mut self, byte: u8) {
        self.tx_fifo.get_mut().push_back(byte);
    }
}

/// Board with settable sensors.
#[derive(Debug, Clone)]
pub struct SimBoard {
    /// Door interlock open
    pub door_open: bool,
    /// Cooling interlock off
    pub cooling_off: bool,
    /// Tripped limit switches, indexed by axis then `[min, max]`
    pub limits: [[bool; 2]; 3],
    /// Reported stack clearance
    pub stack_clearance: u32,
    laser_cutoffs: u32,
    sleeps: u32,
}

impl SimBoard {
    /// Create a board with all interlocks closed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            door_open: false,
            cooling_off: false,
            limits: [[false; 2]; 3],
            stack_clearance: 1024,
            laser_cutoffs: 0,
            sleeps: 0,
        }
    }

    /// Trip or release a limit switch.
    pub fn set_limit(&mut self, axis: Axis, end: LimitEnd, hit: bool) {
        self.limits[axis.index()][end_index(end)] = hit;
    }

    /// Times the laser was forced off.
    #[must_use]
    pub fn laser_cutoffs(&self) -> u32 {
        self.laser_cutoffs
    }

    /// Times the engine entered the low-power wait.
    #[must_use]
    pub fn sleeps(&self) -> u32 {
        self.sleeps
    }
}

impl Default for SimBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl Board for SimBoard {
    fn door_open(&self) -> bool {
        self.door_open
    }

    fn cooling_off(&self) -> bool {
        self.cooling_off
    }

    fn limit_hit(&self, axis: Axis, end: LimitEnd) -> bool {
        self.limits[axis.index()][end_index(end)]
    }

    fn force_laser_off(&mut self) {
        self.laser_cutoffs += 1;
    }

    fn stack_clearance(&self) -> u32 {
        self.stack_clearance
    }

    fn sleep(&mut self) {
        self.sleeps += 1;
    }
}

const fn end_index(end: LimitEnd) -> usize {
    match end {
        LimitEnd::Min => 0,
        LimitEnd::Max => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_stop_code_wins() {
        let signal = StopSignal::new();
        signal.raise(StopCode::LimitHitX1);
        signal.raise(StopCode::InvalidData);
        assert_eq!(signal.code(), Some(StopCode::LimitHitX1));
        signal.clear();
        assert!(!signal.is_raised());
        assert_eq!(signal.code(), None);
    }

    #[test]
    fn planner_executes_one_block_per_poll() {
        let mut planner = SimPlanner::new([0.0; 3]);
        planner.submit_line([1.0, 0.0, 0.0], 100.0, 0, 0.0);
        planner.submit_line([2.0, 0.0, 0.0], 100.0, 0, 0.0);
        assert_eq!(planner.queued(), 2);
        assert!(planner.queue_has_pending());
        assert_eq!(planner.position(), [1.0, 0.0, 0.0]);
        assert!(!planner.queue_has_pending());
        assert_eq!(planner.position(), [2.0, 0.0, 0.0]);
        assert_eq!(planner.planned_position(), [2.0, 0.0, 0.0]);
    }

    #[test]
    fn stalled_planner_faults_on_schedule() {
        let mut planner = SimPlanner::new([0.0; 3]);
        planner.set_stalled(true);
        planner.submit_dwell(0.5, 10);
        planner.fault_after(1, StopCode::LimitHitY2);
        assert!(planner.queue_has_pending());
        assert!(!planner.stop_requested());
        assert!(planner.queue_has_pending());
        assert_eq!(planner.stop_code(), Some(StopCode::LimitHitY2));
    }

    #[test]
    fn link_handles_control_characters() {
        let mut link = SimLink::new(8);
        let requests = ReportRequests::new();
        let stop = StopSignal::new();
        link.attach(requests.clone(), stop.clone());

        link.receive(&[ControlChar::Stop.as_u8(), b'A', ControlChar::Resume.as_u8()]);
        assert_eq!(link.pending_input(), 1);
        assert!(!stop.is_raised());

        link.receive(&[ControlChar::Stop.as_u8()]);
        assert_eq!(stop.code(), Some(StopCode::SerialStopRequest));
    }

    #[test]
    fn full_fifo_shifts_onto_the_wire() {
        let mut link = SimLink::new(2);
        link.write_byte(1);
        link.write_byte(2);
        assert!(!link.write_space_available());
        assert!(link.write_space_available());
        link.write_byte(3);
        assert_eq!(link.tx_stalls(), 1);
        assert_eq!(link.take_output(), vec![1, 2, 3]);
    }
}
