//! Protocol engine: byte classification, dispatch, stop recovery and reporting.
//!
//! The engine runs in a single cooperative context. Every byte is followed by
//! a pass of the idle handler, which is also what runs while the engine waits
//! for input, for transmit space, or for the motion queue to drain.

mod config;
mod dispatch;
mod idle;
mod params;
mod report;
mod state;

pub use config::{Config, FIRMWARE_VERSION};
pub use report::ReportRequests;
pub use state::{MachineState, ReferenceMode};

use tracing::{info, trace, warn};

use crate::hal::{Board, Planner, SerialLink};
use crate::protocol::metrics::Metrics;
use crate::protocol::{MARKER_MAX, ParameterBuffer, ProtocolError, Result};

/// The driveboard protocol engine.
///
/// Owns the session state and the three collaborators. Nothing here is
/// shared: interrupt-side signals arrive through the planner's stop flag and
/// through [`ReportRequests`].
#[derive(Debug)]
pub struct Engine<P, L, B> {
    config: Config,
    state: MachineState,
    buffer: ParameterBuffer,
    requests: ReportRequests,
    planner: P,
    link: L,
    board: B,
    stop_seen: bool,
}

impl<P, L, B> Engine<P, L, B>
where
    P: Planner,
    L: SerialLink,
    B: Board,
{
    /// Create an engine in its startup state. A superstatus report is pending.
    pub fn new(config: Config, planner: P, link: L, board: B) -> Self {
        let state = MachineState::new(&config);
        Self {
            config,
            state,
            buffer: ParameterBuffer::new(),
            requests: ReportRequests::new(),
            planner,
            link,
            board,
            stop_seen: false,
        }
    }

    /// Serve the link forever.
    pub fn run(&mut self) -> ! {
        loop {
            let byte = self.next_byte();
            self.process(byte);
        }
    }

    /// Process one byte if one is waiting, otherwise run one idle pass.
    ///
    /// Returns whether a byte was consumed.
    pub fn poll(&mut self) -> bool {
        let byte = if self.link.bytes_available() {
            self.link.read_byte()
        } else {
            None
        };
        match byte {
            Some(byte) => {
                self.process(byte);
                true
            }
            None => {
                self.idle();
                false
            }
        }
    }

    /// Feed one byte through classification, then run the idle handler.
    ///
    /// While a stop is active the byte is discarded unclassified.
    pub fn process(&mut self, byte: u8) {
        Metrics::record_byte();
        if self.planner.stop_requested() {
            Metrics::record_ignored_byte();
            trace!(byte, "stop active, byte ignored");
        } else if let Err(err) = self.classify(byte) {
            self.raise(err);
        }
        self.idle();
    }

    fn classify(&mut self, byte: u8) -> Result<()> {
        if byte > MARKER_MAX {
            trace!(byte, len = self.buffer.len(), "data byte");
            return self.buffer.push(byte);
        }

        let result = match byte {
            b'A'..=b'Z' => self.dispatch(byte),
            b'a'..=b'z' => self.set_parameter(byte),
            _ => Err(ProtocolError::InvalidMarker { byte }),
        };
        self.buffer.clear();
        result
    }

    /// Clear the global stop on behalf of the host.
    ///
    /// For links that forward the resume character instead of handling it in
    /// the receive path. Input is accepted again from the next byte on.
    pub fn resume(&mut self) {
        if let Some(code) = self.planner.stop_code() {
            info!(%code, "host cleared stop");
        }
        self.planner.clear_stop();
    }

    fn raise(&mut self, err: ProtocolError) {
        warn!(error = %err, code = %err.stop_code(), "protocol violation, raising stop");
        Metrics::record_error();
        self.planner.request_stop(err.stop_code());
    }

    fn next_byte(&mut self) -> u8 {
        loop {
            if self.link.bytes_available() {
                if let Some(byte) = self.link.read_byte() {
                    return byte;
                }
            }
            self.idle();
        }
    }

    /// Handle for requesting reports and recording underruns from other contexts.
    #[must_use]
    pub fn requests(&self) -> ReportRequests {
        self.requests.clone()
    }

    /// Current session state.
    #[must_use]
    pub fn state(&self) -> &MachineState {
        &self.state
    }

    /// Payload bytes buffered since the last marker.
    #[must_use]
    pub fn buffer(&self) -> &ParameterBuffer {
        &self.buffer
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Planner collaborator.
    #[must_use]
    pub fn planner(&self) -> &P {
        &self.planner
    }

    /// Mutable planner collaborator.
    pub fn planner_mut(&mut self) -> &mut P {
        &mut self.planner
    }

    /// Serial link collaborator.
    #[must_use]
    pub fn link(&self) -> &L {
        &self.link
    }

    /// Mutable serial link collaborator.
    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    /// Board collaborator.
    #[must_use]
    pub fn board(&self) -> &B {
        &self.board
    }

    /// Mutable board collaborator.
    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }

    /// Tear down the engine and hand back its collaborators.
    pub fn into_parts(self) -> (P, L, B) {
        (self.planner, self.link, self.board)
    }
}
