//! Capture state machine
//!
//! Turns the raw pen-sample stream into strokes and button activations.
//! Samples arrive on an mpsc channel fed by the device reader task; the
//! session task is the only owner of the mutable state and performs a
//! cancellable `recv` instead of polling terminal flags. Completion is
//! communicated by the returned [`CaptureOutcome`]; terminal state is
//! mirrored into [`SessionStatus`] atomics for observability only.

use crate::capture::geometry::{map_to_screen, ButtonId, ButtonLayout};
use crate::capture::strokes::StrokeRecorder;
use crate::device::protocol::OPCODE_WRITE_IMAGE;
use crate::device::{Capability, DeviceError, PenSample, Tablet};
use log::{debug, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// How a capture session ended
#[derive(Debug)]
pub enum CaptureOutcome {
    /// The signer pressed Accept; the recorded strokes are the result
    Completed(StrokeRecorder),

    /// The signer pressed Cancel; there is no image
    Canceled,
}

/// Read-only view of the session's terminal state, shared with the
/// service layer for health reporting
#[derive(Debug, Default)]
pub struct SessionStatus {
    completed: AtomicBool,
    canceled: AtomicBool,
}

impl SessionStatus {
    pub fn completed(&self) -> bool {
        self.completed.load(Ordering::Relaxed)
    }

    pub fn canceled(&self) -> bool {
        self.canceled.load(Ordering::Relaxed)
    }

    pub fn is_terminal(&self) -> bool {
        self.completed() || self.canceled()
    }
}

/// State for one signature capture
pub struct CaptureSession {
    capability: Capability,
    layout: ButtonLayout,
    recorder: StrokeRecorder,
    pen_is_down: bool,
    is_first_stroke_point: bool,
    clear_in_flight: bool,
    completed: bool,
    canceled: bool,
    status: Arc<SessionStatus>,
    settle_delay: Duration,
}

impl CaptureSession {
    /// Create a session for a validated capability. Zero digitizer
    /// ranges are rejected here, before any sample is mapped.
    pub fn new(capability: Capability, settle_delay: Duration) -> Result<Self, DeviceError> {
        capability.validate()?;
        Ok(Self {
            capability,
            layout: ButtonLayout::new(capability.screen_width, capability.screen_height),
            recorder: StrokeRecorder::new(),
            pen_is_down: false,
            is_first_stroke_point: true,
            clear_in_flight: false,
            completed: false,
            canceled: false,
            status: Arc::new(SessionStatus::default()),
            settle_delay,
        })
    }

    pub fn status(&self) -> Arc<SessionStatus> {
        self.status.clone()
    }

    pub fn layout(&self) -> &ButtonLayout {
        &self.layout
    }

    /// Drive the session to completion or cancellation.
    ///
    /// `chrome_pixels` is the encoded blank-UI frame, repainted to the
    /// device whenever the signer presses Clear. The stream ending
    /// before a terminal state means the device link died mid-session.
    pub async fn run<T: Tablet + ?Sized>(
        mut self,
        tablet: &mut T,
        samples: &mut mpsc::UnboundedReceiver<PenSample>,
        chrome_pixels: &[u8],
    ) -> Result<CaptureOutcome, DeviceError> {
        while let Some(sample) = samples.recv().await {
            self.handle_sample(tablet, samples, chrome_pixels, sample)
                .await?;
            if self.completed {
                info!("Capture completed: {}", self.recorder);
                return Ok(CaptureOutcome::Completed(self.recorder));
            }
            if self.canceled {
                info!("Capture canceled by signer");
                return Ok(CaptureOutcome::Canceled);
            }
        }
        Err(DeviceError::Closed)
    }

    /// Apply one pen sample to the state machine
    async fn handle_sample<T: Tablet + ?Sized>(
        &mut self,
        tablet: &mut T,
        samples: &mut mpsc::UnboundedReceiver<PenSample>,
        chrome_pixels: &[u8],
        sample: PenSample,
    ) -> Result<(), DeviceError> {
        // Late samples after a terminal state are dropped, not queued
        if self.completed || self.canceled {
            return Ok(());
        }

        let point = map_to_screen(&sample, &self.capability);

        if !sample.is_down() {
            // Pen lifted: close the stroke. A pen-up never triggers a
            // button and never draws a point.
            self.pen_is_down = false;
            self.is_first_stroke_point = true;
            return Ok(());
        }

        if !self.pen_is_down {
            // Pen-down edge: buttons fire here and only here
            match self.layout.hit(point) {
                Some(ButtonId::Cancel) => {
                    self.canceled = true;
                    self.status.canceled.store(true, Ordering::Relaxed);
                    self.pen_is_down = true;
                    return Ok(());
                }
                Some(ButtonId::Accept) => {
                    self.completed = true;
                    self.status.completed.store(true, Ordering::Relaxed);
                    self.pen_is_down = true;
                    return Ok(());
                }
                Some(ButtonId::Clear) => {
                    self.pen_is_down = true;
                    if self.clear_in_flight {
                        // Duplicate Clear is a no-op
                        return Ok(());
                    }
                    return self.run_clear(tablet, samples, chrome_pixels).await;
                }
                None => {
                    // Start of a drawn stroke; fall through to record
                    // this sample as the first point
                    self.pen_is_down = true;
                }
            }
        }

        // Pen is down and no control action fired this sample
        if self.is_first_stroke_point {
            self.recorder.begin_stroke();
            self.is_first_stroke_point = false;
        }
        self.recorder.push_point(point);
        Ok(())
    }

    /// Clear critical section: empty the stroke buffer and repaint the
    /// blank UI. Runs inline on the session task, so no sample can be
    /// processed while it is in progress; whatever queued up meanwhile
    /// is drained and discarded afterwards.
    async fn run_clear<T: Tablet + ?Sized>(
        &mut self,
        tablet: &mut T,
        samples: &mut mpsc::UnboundedReceiver<PenSample>,
        chrome_pixels: &[u8],
    ) -> Result<(), DeviceError> {
        self.clear_in_flight = true;
        debug!("Clear pressed, repainting chrome");

        self.recorder.clear();

        tablet.set_inking_mode(false).await?;
        tablet.clear_screen().await?;
        tablet.write_image(OPCODE_WRITE_IMAGE, chrome_pixels).await?;
        tokio::time::sleep(self.settle_delay).await;
        tablet.set_inking_mode(true).await?;
        tokio::time::sleep(self.settle_delay).await;

        self.is_first_stroke_point = true;

        let mut dropped = 0usize;
        while samples.try_recv().is_ok() {
            dropped += 1;
        }
        if dropped > 0 {
            debug!("Dropped {} samples queued during clear", dropped);
        }

        self.clear_in_flight = false;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn recorder(&self) -> &StrokeRecorder {
        &self.recorder
    }
}
