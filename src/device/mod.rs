//! Tablet device abstraction
//!
//! Defines the capability/sample data model, the async `Tablet` seam the
//! capture pipeline drives, and the TCP-attached implementation.

pub mod net;
pub mod protocol;

#[cfg(test)]
pub mod mock;

use async_trait::async_trait;
use std::fmt;
use tokio::sync::mpsc;

pub use net::NetTablet;

/// Device capability reported by the tablet, fetched once per session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capability {
    /// Display width in pixels
    pub screen_width: u32,

    /// Display height in pixels
    pub screen_height: u32,

    /// Maximum raw X value produced by the digitizer
    pub tablet_max_x: u32,

    /// Maximum raw Y value produced by the digitizer
    pub tablet_max_y: u32,
}

impl Capability {
    /// Reject capabilities the coordinate mapper cannot divide by
    pub fn validate(&self) -> Result<(), DeviceError> {
        if self.tablet_max_x == 0 || self.tablet_max_y == 0 {
            return Err(DeviceError::BadCapability(
                "tablet input range is zero".to_string(),
            ));
        }
        if self.screen_width == 0 || self.screen_height == 0 {
            return Err(DeviceError::BadCapability(
                "screen dimensions are zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Capability(screen {}x{}, digitizer {}x{})",
            self.screen_width, self.screen_height, self.tablet_max_x, self.tablet_max_y
        )
    }
}

/// One raw pen sample as delivered by the tablet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PenSample {
    /// Raw X in digitizer units
    pub x: u16,

    /// Raw Y in digitizer units
    pub y: u16,

    /// 0 = pen up / out of proximity, nonzero = pen down with pressure
    pub switch_state: u8,
}

impl PenSample {
    pub fn is_down(&self) -> bool {
        self.switch_state != 0
    }
}

/// Errors from the device link
#[derive(Debug)]
pub enum DeviceError {
    /// Underlying transport I/O failure
    Io(std::io::Error),

    /// Connect or command response timed out
    Timeout,

    /// Device closed the link (or the pen stream ended mid-session)
    Closed,

    /// The device sent bytes we do not understand
    Protocol(String),

    /// Capability report unusable (zero ranges)
    BadCapability(String),

    /// The pen-sample stream was already taken by another consumer
    StreamTaken,
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::Io(e) => write!(f, "device I/O error: {}", e),
            DeviceError::Timeout => write!(f, "device timed out"),
            DeviceError::Closed => write!(f, "device link closed"),
            DeviceError::Protocol(msg) => write!(f, "device protocol error: {}", msg),
            DeviceError::BadCapability(msg) => write!(f, "bad device capability: {}", msg),
            DeviceError::StreamTaken => write!(f, "pen sample stream already taken"),
        }
    }
}

impl std::error::Error for DeviceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DeviceError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DeviceError {
    fn from(e: std::io::Error) -> Self {
        DeviceError::Io(e)
    }
}

/// Async seam for a signature tablet.
///
/// The capture service owns exactly one `Tablet` for the lifetime of a
/// session; no two sessions may share a connection.
#[async_trait]
pub trait Tablet: Send {
    /// Query the device capability (screen size and digitizer range)
    async fn capability(&mut self) -> Result<Capability, DeviceError>;

    /// Enable or disable ink capture on the device
    async fn set_inking_mode(&mut self, on: bool) -> Result<(), DeviceError>;

    /// Select which pen data the device reports
    async fn set_pen_data_option_mode(&mut self, mode: u8) -> Result<(), DeviceError>;

    /// Clear the device screen
    async fn clear_screen(&mut self) -> Result<(), DeviceError>;

    /// Transmit a raw pixel buffer to the device display.
    ///
    /// Ink mode must be off before calling this; writing while ink mode
    /// is active is undefined behavior on the device.
    async fn write_image(&mut self, opcode: u8, pixels: &[u8]) -> Result<(), DeviceError>;

    /// Take the pen-sample stream. At most one live receiver per
    /// connection; subsequent calls return `None`.
    fn samples(&mut self) -> Option<mpsc::UnboundedReceiver<PenSample>>;

    /// Tear down the device link
    async fn disconnect(&mut self) -> Result<(), DeviceError>;
}
