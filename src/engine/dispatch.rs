use tracing::{debug, info, instrument};

use crate::hal::{Board, Planner, SerialLink};
use crate::protocol::metrics::Metrics;
use crate::protocol::{Command, ProtocolError, Result};

use super::{Engine, ReferenceMode};

impl<P, L, B> Engine<P, L, B>
where
    P: Planner,
    L: SerialLink,
    B: Board,
{
    /// Execute the command named by `marker`.
    pub(crate) fn dispatch(&mut self, marker: u8) -> Result<()> {
        let command = Command::from_u8(marker).ok_or(ProtocolError::InvalidCommand {
            marker: char::from(marker),
        })?;
        Metrics::record_command(command);
        debug!(%command, "dispatch");

        let st = &mut self.state;
        match command {
            Command::None => {}
            Command::Line => {
                self.planner
                    .submit_line(st.target, st.feedrate, st.intensity, 0.0);
            }
            Command::Raster => {
                self.planner
                    .submit_line(st.target, st.feedrate, st.intensity, st.pixel_width);
            }
            Command::Dwell => self.planner.submit_dwell(st.duration, st.intensity),
            Command::RefRelative => st.reference_mode = ReferenceMode::Relative,
            Command::RefAbsolute => st.reference_mode = ReferenceMode::Absolute,
            // single slot: a second store overwrites the first
            Command::RefStore => st.reference_mode_saved = st.reference_mode,
            Command::RefRestore => st.reference_mode = st.reference_mode_saved,
            Command::Homing => self.home(),
            Command::OffsetStore => st.offset_saved = st.offset,
            Command::OffsetRestore => st.offset = st.offset_saved,
            Command::AirEnable => self.planner.set_air_assist(true),
            Command::AirDisable => self.planner.set_air_assist(false),
            Command::AuxEnable => self.planner.set_aux_assist(true),
            Command::AuxDisable => self.planner.set_aux_assist(false),
        }
        Ok(())
    }

    /// Home, drop the user offset, and move to the origin so the pending
    /// target matches the freshly homed head.
    #[instrument(level = "debug", skip(self))]
    fn home(&mut self) {
        info!("running homing cycle");
        self.planner.run_homing_cycle();
        self.state.offset = [0.0; 3];
        self.state.target = self.config.origin_offset;
        self.planner
            .submit_line(self.state.target, self.state.feedrate, 0, 0.0);
    }
}
