//! Session state carried between bytes.

use crate::protocol::Axis;

use super::Config;

/// How incoming target parameters are interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReferenceMode {
    /// Values accumulate onto the pending target
    Relative,
    /// Values are positions in the user frame
    #[default]
    Absolute,
}

/// Mutable session state owned by the engine.
///
/// `target` is always an absolute machine-frame position. It takes effect only
/// when a motion command is dispatched.
#[derive(Debug, Clone, PartialEq)]
pub struct MachineState {
    /// Current reference mode
    pub reference_mode: ReferenceMode,
    /// Single save slot for the reference mode
    pub reference_mode_saved: ReferenceMode,
    /// Feedrate in mm/min
    pub feedrate: f64,
    /// Laser intensity
    pub intensity: u8,
    /// Dwell duration
    pub duration: f64,
    /// Raster pixel width in mm
    pub pixel_width: f64,
    /// Pending destination, machine frame
    pub target: [f64; 3],
    /// User offset on top of the origin offset
    pub offset: [f64; 3],
    /// Single save slot for the offset
    pub offset_saved: [f64; 3],
}

impl MachineState {
    /// Startup state: absolute mode, target at the origin, no user offset.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            reference_mode: ReferenceMode::Absolute,
            reference_mode_saved: ReferenceMode::Absolute,
            feedrate: config.default_feedrate,
            intensity: 0,
            duration: 0.0,
            pixel_width: 0.0,
            target: config.origin_offset,
            offset: [0.0; 3],
            offset_saved: [0.0; 3],
        }
    }

    /// Pending target on one axis.
    #[must_use]
    pub fn target(&self, axis: Axis) -> f64 {
        self.target[axis.index()]
    }

    /// User offset on one axis.
    #[must_use]
    pub fn offset(&self, axis: Axis) -> f64 {
        self.offset[axis.index()]
    }

    /// Whether parameters accumulate onto the pending target.
    #[must_use]
    pub fn is_relative(&self) -> bool {
        self.reference_mode == ReferenceMode::Relative
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startup_state_follows_config() {
        let config = Config {
            origin_offset: [1.0, 2.0, 3.0],
            default_feedrate: 1200.0,
            ..Config::default()
        };
        let state = MachineState::new(&config);
        assert_eq!(state.reference_mode, ReferenceMode::Absolute);
        assert_eq!(state.target, [1.0, 2.0, 3.0]);
        assert_eq!(state.offset, [0.0; 3]);
        assert_eq!(state.feedrate, 1200.0);
        assert_eq!(state.intensity, 0);
        assert!(!state.is_relative());
        assert_eq!(state.target(Axis::Z), 3.0);
    }
}
