//! Driveboard marker vocabulary: commands, parameters, status fields and stop codes

use std::fmt;

/// Command markers, `A`..`O`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Command {
    /// No-op
    None = b'A',
    /// Move to the pending target
    Line = b'B',
    /// Stationary pulse
    Dwell = b'C',
    /// Move to the pending target with raster pixel width
    Raster = b'D',

    /// Parameters accumulate onto the pending target
    RefRelative = b'E',
    /// Parameters are absolute in the user frame
    RefAbsolute = b'F',
    /// Save the reference mode into the single slot
    RefStore = b'G',
    /// Restore the reference mode from the single slot
    RefRestore = b'H',

    /// Run the homing cycle
    Homing = b'I',
    /// Save the offset into the single slot
    OffsetStore = b'J',
    /// Restore the offset from the single slot
    OffsetRestore = b'K',

    /// Air assist on
    AirEnable = b'L',
    /// Air assist off
    AirDisable = b'M',
    /// Aux assist on
    AuxEnable = b'N',
    /// Aux assist off
    AuxDisable = b'O',
}

impl Command {
    /// Convert from byte
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            b'A' => Some(Self::None),
            b'B' => Some(Self::Line),
            b'C' => Some(Self::Dwell),
            b'D' => Some(Self::Raster),
            b'E' => Some(Self::RefRelative),
            b'F' => Some(Self::RefAbsolute),
            b'G' => Some(Self::RefStore),
            b'H' => Some(Self::RefRestore),
            b'I' => Some(Self::Homing),
            b'J' => Some(Self::OffsetStore),
            b'K' => Some(Self::OffsetRestore),
            b'L' => Some(Self::AirEnable),
            b'M' => Some(Self::AirDisable),
            b'N' => Some(Self::AuxEnable),
            b'O' => Some(Self::AuxDisable),
            _ => None,
        }
    }

    /// Convert to byte
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Check if this command hands a motion to the planner
    #[must_use]
    pub const fn is_motion(self) -> bool {
        matches!(self, Self::Line | Self::Raster | Self::Dwell | Self::Homing)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "NONE",
            Self::Line => "LINE",
            Self::Dwell => "DWELL",
            Self::Raster => "RASTER",
            Self::RefRelative => "REF_RELATIVE",
            Self::RefAbsolute => "REF_ABSOLUTE",
            Self::RefStore => "REF_STORE",
            Self::RefRestore => "REF_RESTORE",
            Self::Homing => "HOMING",
            Self::OffsetStore => "OFFSET_STORE",
            Self::OffsetRestore => "OFFSET_RESTORE",
            Self::AirEnable => "AIR_ENABLE",
            Self::AirDisable => "AIR_DISABLE",
            Self::AuxEnable => "AUX_ENABLE",
            Self::AuxDisable => "AUX_DISABLE",
        };
        write!(f, "{name}")
    }
}

/// Parameter markers. Each consumes the four buffered data bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Parameter {
    /// Target X
    TargetX = b'x',
    /// Target Y
    TargetY = b'y',
    /// Target Z
    TargetZ = b'z',
    /// Feedrate in mm/min
    Feedrate = b'f',
    /// Laser intensity, 0-255
    Intensity = b's',
    /// Dwell duration
    Duration = b'd',
    /// Raster pixel width in mm
    PixelWidth = b'p',
    /// Offset X
    OffsetX = b'h',
    /// Offset Y
    OffsetY = b'i',
    /// Offset Z
    OffsetZ = b'j',
}

impl Parameter {
    /// Convert from byte
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            b'x' => Some(Self::TargetX),
            b'y' => Some(Self::TargetY),
            b'z' => Some(Self::TargetZ),
            b'f' => Some(Self::Feedrate),
            b's' => Some(Self::Intensity),
            b'd' => Some(Self::Duration),
            b'p' => Some(Self::PixelWidth),
            b'h' => Some(Self::OffsetX),
            b'i' => Some(Self::OffsetY),
            b'j' => Some(Self::OffsetZ),
            _ => None,
        }
    }

    /// Convert to byte
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Machine axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    /// X axis
    X,
    /// Y axis
    Y,
    /// Z axis
    Z,
}

impl Axis {
    /// All axes in index order.
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];

    /// Index into a position vector.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }
}

/// Which end of an axis a limit switch guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LimitEnd {
    /// Switch at the axis origin
    Min,
    /// Switch at the far end
    Max,
}

/// Stop error codes reported as single flag bytes in a status telegram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum StopCode {
    /// Host asked for a stop
    SerialStopRequest = b'!',
    /// Receive buffer overflowed
    RxBufferOverflow = b'"',
    /// Marker outside the known ranges
    InvalidMarker = b'#',
    /// X min limit switch
    LimitHitX1 = b'$',
    /// X max limit switch
    LimitHitX2 = b'%',
    /// Y min limit switch
    LimitHitY1 = b'&',
    /// Y max limit switch
    LimitHitY2 = b'*',
    /// Z min limit switch
    LimitHitZ1 = b'+',
    /// Z max limit switch
    LimitHitZ2 = b'-',
    /// Payload overflow or short payload
    InvalidData = b':',
    /// Unknown command marker
    InvalidCommand = b'<',
    /// Double transmission mismatch detected by the link
    TransmissionError = b'=',
    /// Unknown parameter marker
    InvalidParameter = b'>',
}

impl StopCode {
    /// Convert from byte
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            b'!' => Some(Self::SerialStopRequest),
            b'"' => Some(Self::RxBufferOverflow),
            b'#' => Some(Self::InvalidMarker),
            b'$' => Some(Self::LimitHitX1),
            b'%' => Some(Self::LimitHitX2),
            b'&' => Some(Self::LimitHitY1),
            b'*' => Some(Self::LimitHitY2),
            b'+' => Some(Self::LimitHitZ1),
            b'-' => Some(Self::LimitHitZ2),
            b':' => Some(Self::InvalidData),
            b'<' => Some(Self::InvalidCommand),
            b'=' => Some(Self::TransmissionError),
            b'>' => Some(Self::InvalidParameter),
            _ => None,
        }
    }

    /// Convert to byte
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Stop code for a tripped limit switch.
    #[must_use]
    pub const fn limit(axis: Axis, end: LimitEnd) -> Self {
        match (axis, end) {
            (Axis::X, LimitEnd::Min) => Self::LimitHitX1,
            (Axis::X, LimitEnd::Max) => Self::LimitHitX2,
            (Axis::Y, LimitEnd::Min) => Self::LimitHitY1,
            (Axis::Y, LimitEnd::Max) => Self::LimitHitY2,
            (Axis::Z, LimitEnd::Min) => Self::LimitHitZ1,
            (Axis::Z, LimitEnd::Max) => Self::LimitHitZ2,
        }
    }

    /// Check if this code comes from a limit switch
    #[must_use]
    pub const fn is_limit(self) -> bool {
        matches!(
            self,
            Self::LimitHitX1
                | Self::LimitHitX2
                | Self::LimitHitY1
                | Self::LimitHitY2
                | Self::LimitHitZ1
                | Self::LimitHitZ2
        )
    }
}

impl fmt::Display for StopCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SerialStopRequest => "stop requested",
            Self::RxBufferOverflow => "rx buffer overflow",
            Self::InvalidMarker => "invalid marker",
            Self::LimitHitX1 => "limit hit x1",
            Self::LimitHitX2 => "limit hit x2",
            Self::LimitHitY1 => "limit hit y1",
            Self::LimitHitY2 => "limit hit y2",
            Self::LimitHitZ1 => "limit hit z1",
            Self::LimitHitZ2 => "limit hit z2",
            Self::InvalidData => "invalid data",
            Self::InvalidCommand => "invalid command",
            Self::TransmissionError => "transmission error",
            Self::InvalidParameter => "invalid parameter",
        };
        write!(f, "{name}")
    }
}

/// Info flags emitted in a status telegram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum InfoFlag {
    /// Queue empty, no pending input, no stop
    Idle = b'A',
    /// Door interlock open
    DoorOpen = b'B',
    /// Cooling interlock off
    ChillerOff = b'C',
}

impl InfoFlag {
    /// Convert from byte
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            b'A' => Some(Self::Idle),
            b'B' => Some(Self::DoorOpen),
            b'C' => Some(Self::ChillerOff),
            _ => None,
        }
    }

    /// Convert to byte
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Numeric fields of a status telegram, each written as payload then marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StatusField {
    /// Position X in the user frame
    PositionX = b'x',
    /// Position Y in the user frame
    PositionY = b'y',
    /// Position Z in the user frame
    PositionZ = b'z',
    /// Firmware version
    Version = b'v',
    /// Receive buffer underrun count
    BufferUnderrun = b'w',
    /// Never-used stack bytes
    StackClearance = b'u',
    /// Raw offset X
    OffsetX = b'a',
    /// Raw offset Y
    OffsetY = b'b',
    /// Raw offset Z
    OffsetZ = b'c',
    /// Current feedrate
    Feedrate = b'g',
    /// Current intensity
    Intensity = b'h',
    /// Current dwell duration
    Duration = b'i',
    /// Current raster pixel width
    PixelWidth = b'j',
}

impl StatusField {
    /// Convert from byte
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            b'x' => Some(Self::PositionX),
            b'y' => Some(Self::PositionY),
            b'z' => Some(Self::PositionZ),
            b'v' => Some(Self::Version),
            b'w' => Some(Self::BufferUnderrun),
            b'u' => Some(Self::StackClearance),
            b'a' => Some(Self::OffsetX),
            b'b' => Some(Self::OffsetY),
            b'c' => Some(Self::OffsetZ),
            b'g' => Some(Self::Feedrate),
            b'h' => Some(Self::Intensity),
            b'i' => Some(Self::Duration),
            b'j' => Some(Self::PixelWidth),
            _ => None,
        }
    }

    /// Convert to byte
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Position field for an axis.
    #[must_use]
    pub const fn position(axis: Axis) -> Self {
        match axis {
            Axis::X => Self::PositionX,
            Axis::Y => Self::PositionY,
            Axis::Z => Self::PositionZ,
        }
    }

    /// Raw offset field for an axis.
    #[must_use]
    pub const fn offset(axis: Axis) -> Self {
        match axis {
            Axis::X => Self::OffsetX,
            Axis::Y => Self::OffsetY,
            Axis::Z => Self::OffsetZ,
        }
    }
}

/// Out-of-band control characters. The serial link consumes these before
/// the byte stream reaches the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ControlChar {
    /// Raise a stop
    Stop = 1,
    /// Clear the stop
    Resume = 2,
    /// Request a status telegram
    Status = 3,
    /// Request a superstatus telegram
    Superstatus = 4,
    /// Receive chunk consumed, host may send more
    ChunkProcessed = 5,
    /// Terminates every status telegram
    StatusEnd = 6,
    /// Start of raw raster data
    RasterDataStart = 16,
    /// End of raw raster data
    RasterDataEnd = 17,
}

impl ControlChar {
    /// Convert from byte
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Stop),
            2 => Some(Self::Resume),
            3 => Some(Self::Status),
            4 => Some(Self::Superstatus),
            5 => Some(Self::ChunkProcessed),
            6 => Some(Self::StatusEnd),
            16 => Some(Self::RasterDataStart),
            17 => Some(Self::RasterDataEnd),
            _ => None,
        }
    }

    /// Convert to byte
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}
