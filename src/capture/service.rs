//! Capture session driver
//!
//! Owns one tablet for the duration of one signature capture: fetches
//! the capability, paints the chrome, runs the state machine to its
//! outcome, and renders the final ink image. A device I/O failure
//! anywhere in here is fatal to the session; the device state is
//! unknown afterwards, so nothing is retried.

use crate::capture::geometry::{MIN_SCREEN_HEIGHT, MIN_SCREEN_WIDTH};
use crate::capture::session::{CaptureOutcome, CaptureSession};
use crate::device::protocol::OPCODE_WRITE_IMAGE;
use crate::device::{DeviceError, Tablet};
use crate::render::{
    compose_chrome, compose_ink, encode_device_pixels, ButtonLabels, LabelFont,
    TransferInformation,
};
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder};
use log::{debug, info, warn};
use std::fmt;
use std::time::Duration;

/// Per-capture options derived from configuration
#[derive(Debug, Clone)]
pub struct CaptureOptions {
    /// Delay after ink-mode changes, lets the device settle
    pub settle_delay: Duration,

    /// Pen data option mode sent at session start
    pub pen_data_option_mode: u8,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(200),
            pen_data_option_mode: 1,
        }
    }
}

/// Outcome of one capture call at the service boundary
#[derive(Debug)]
pub enum SignatureResult {
    /// Accepted signature, PNG-encoded
    Completed { png: Vec<u8> },

    /// The signer canceled; there is no image
    Canceled,
}

/// Errors surfaced to the service boundary
#[derive(Debug)]
pub enum CaptureError {
    /// Device not usable before any rendering was attempted
    Precondition(String),

    /// Device I/O failed mid-session
    Device(DeviceError),

    /// The final image could not be encoded
    Encode(String),
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::Precondition(msg) => write!(f, "capture precondition failed: {}", msg),
            CaptureError::Device(e) => write!(f, "device failure: {}", e),
            CaptureError::Encode(msg) => write!(f, "image encoding failed: {}", msg),
        }
    }
}

impl std::error::Error for CaptureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CaptureError::Device(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DeviceError> for CaptureError {
    fn from(e: DeviceError) -> Self {
        CaptureError::Device(e)
    }
}

/// Run one signature capture against `tablet`.
pub async fn run_capture(
    tablet: &mut dyn Tablet,
    options: &CaptureOptions,
    labels: &ButtonLabels,
    font: &LabelFont,
    overlay: Option<&TransferInformation>,
) -> Result<SignatureResult, CaptureError> {
    let capability = tablet.capability().await?;
    capability
        .validate()
        .map_err(|e| CaptureError::Precondition(e.to_string()))?;
    info!("Starting capture session, {}", capability);
    if capability.screen_width < MIN_SCREEN_WIDTH || capability.screen_height < MIN_SCREEN_HEIGHT {
        warn!(
            "Screen {}x{} is below the {}x{} the button layout was designed for",
            capability.screen_width, capability.screen_height, MIN_SCREEN_WIDTH, MIN_SCREEN_HEIGHT
        );
    }

    let session = CaptureSession::new(capability, options.settle_delay)
        .map_err(|e| CaptureError::Precondition(e.to_string()))?;
    let chrome = compose_chrome(
        session.layout(),
        capability.screen_width,
        capability.screen_height,
        overlay,
        labels,
        font,
    );
    let chrome_pixels = encode_device_pixels(&chrome);

    // Paint the UI with ink capture suspended; writing while ink mode
    // is active is undefined behavior on the device.
    tablet
        .set_pen_data_option_mode(options.pen_data_option_mode)
        .await?;
    tablet.set_inking_mode(false).await?;
    tablet.clear_screen().await?;
    tablet.write_image(OPCODE_WRITE_IMAGE, &chrome_pixels).await?;
    tokio::time::sleep(options.settle_delay).await;
    tablet.set_inking_mode(true).await?;
    tokio::time::sleep(options.settle_delay).await;

    let mut samples = tablet
        .samples()
        .ok_or_else(|| CaptureError::Precondition("pen sample stream already taken".to_string()))?;

    let outcome = session.run(tablet, &mut samples, &chrome_pixels).await?;

    tablet.set_inking_mode(false).await?;
    tablet.clear_screen().await?;
    if let Err(e) = tablet.disconnect().await {
        warn!("Disconnect after capture failed: {}", e);
    }

    match outcome {
        CaptureOutcome::Completed(recorder) => {
            debug!("Rendering final ink image: {}", recorder);
            let ink = compose_ink(capability.screen_width, capability.screen_height, &recorder);
            let mut png = Vec::new();
            PngEncoder::new(&mut png)
                .write_image(
                    ink.as_raw(),
                    capability.screen_width,
                    capability.screen_height,
                    ColorType::Rgb8,
                )
                .map_err(|e| CaptureError::Encode(e.to_string()))?;
            Ok(SignatureResult::Completed { png })
        }
        CaptureOutcome::Canceled => Ok(SignatureResult::Canceled),
    }
}
