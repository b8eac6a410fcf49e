//! Driveboard protocol engine for CNC and laser motion controllers
//!
//! The host streams an interleaved ASCII/binary instruction stream: numbers
//! travel as four data bytes in `[128, 255]`, followed by the lowercase
//! parameter marker that consumes them; uppercase command markers act on the
//! accumulated parameters. The engine keeps the session state, hands motions
//! to a planner, halts on malformed input or hardware faults, and answers
//! with status telegrams.
//!
//! # Quick Start
//!
//! ```rust
//! use driveboard::engine::{Config, Engine};
//! use driveboard::sim::{SimBoard, SimLink, SimPlanner};
//! use driveboard::{Command, Program, StatusReport};
//!
//! let config = Config::default();
//! let planner = SimPlanner::new(config.origin_offset);
//! let mut engine = Engine::new(config, planner, SimLink::new(64), SimBoard::new());
//!
//! // startup superstatus
//! engine.idle();
//! let boot = engine.link_mut().take_output();
//! let (report, _) = StatusReport::parse(&boot)?;
//! assert!(report.superstatus.is_some());
//!
//! // move to (10, 20) in the user frame
//! let job = Program::new().line(10.0, 20.0, 0.0).command(Command::None).finish();
//! engine.link_mut().receive(&job);
//! while engine.poll() {}
//!
//! assert_eq!(engine.state().target, [15.0, 25.0, 0.0]);
//! # Ok::<(), driveboard::TelegramError>(())
//! ```
//!
//! # Layout
//!
//! - [`protocol`]: marker vocabulary, number codec, telegram parser
//! - [`engine`]: the byte loop, parameter setter, dispatcher and idle handler
//! - [`hal`]: the planner, serial link and board seams
//! - [`sim`]: in-memory collaborators

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod engine;
pub mod hal;
pub mod protocol;
pub mod sim;

pub use engine::{Config, Engine, MachineState, ReferenceMode, ReportRequests};
pub use protocol::{
    Axis, Command, LimitEnd, Parameter, Program, ProtocolError, Result, StatusReport, StopCode,
    TelegramError,
};

/// Snapshot of the process-wide engine counters.
#[must_use]
pub fn metrics() -> protocol::MetricsSnapshot {
    protocol::metrics::Metrics::totals()
}
