//! Signature capture subsystem
//!
//! The pen-event state machine and its supporting pieces: coordinate
//! mapping, button hit testing, stroke recording, and the session
//! driver that ties them to a tablet.

pub mod geometry;
pub mod service;
pub mod session;
pub mod strokes;

pub use geometry::{ButtonId, ButtonLayout, Point};
pub use service::{run_capture, CaptureOptions, SignatureResult};
pub use session::{CaptureOutcome, CaptureSession, SessionStatus};
pub use strokes::StrokeRecorder;
