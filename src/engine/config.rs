//! Engine configuration.

/// Firmware version number reported in superstatus telegrams.
pub const FIRMWARE_VERSION: f64 = 1501.0;

/// Build-time machine settings consumed by the engine.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Machine-frame position of the user origin (table offset).
    pub origin_offset: [f64; 3],
    /// Feedrate in effect until the host sends one, mm/min.
    pub default_feedrate: f64,
    /// Version number reported to the host.
    pub version: f64,
    /// Door/chiller laser cut-off and limit switch reporting.
    pub interlocks: bool,
    /// Report Z limit switches.
    pub three_axes: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            origin_offset: [5.0, 5.0, 0.0],
            default_feedrate: 8000.0,
            version: FIRMWARE_VERSION,
            interlocks: true,
            three_axes: false,
        }
    }
}
