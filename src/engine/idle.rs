use tracing::info;

use crate::hal::{Board, Planner, SerialLink};
use crate::protocol::metrics::Metrics;

use super::Engine;

impl<P, L, B> Engine<P, L, B>
where
    P: Planner,
    L: SerialLink,
    B: Board,
{
    /// Cooperative idle pass.
    ///
    /// Runs after every byte and at every wait. Safe to call any number of
    /// times in a row; it never calls itself.
    pub fn idle(&mut self) {
        self.service_safety();
        if self.requests.is_pending() {
            self.emit_report();
        }
    }

    /// Interlock cut-off and stop recovery, without reporting.
    pub(crate) fn service_safety(&mut self) {
        if self.config.interlocks && (self.board.door_open() || self.board.cooling_off()) {
            self.board.force_laser_off();
        }

        if self.planner.stop_requested() {
            self.recover_from_stop();
        } else if self.stop_seen {
            info!("stop cleared, accepting input");
            self.stop_seen = false;
        }
    }

    /// Resynchronize planner and target with the physical head.
    ///
    /// Repeats on every pass while the stop holds.
    fn recover_from_stop(&mut self) {
        if !self.stop_seen {
            let code = self.planner.stop_code();
            info!(?code, "stop active, discarding queue and input");
            Metrics::record_stop_recovery();
            self.stop_seen = true;
        }

        self.planner.reset_queue();
        let actual = self.planner.position();
        self.planner.set_position(actual);
        self.state.target = actual;
        self.buffer.clear();
    }
}
