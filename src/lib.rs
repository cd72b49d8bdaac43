//! sigpad-core - point-of-sale signature pad integration core
//!
//! Captures handwritten signatures from a pen-input tablet, renders the
//! on-device UI onto the tablet's own screen, and returns the signature
//! as an encoded image over a small HTTP boundary.

pub mod args;
pub mod capture;
pub mod config;
pub mod device;
pub mod render;
pub mod web;

// Re-exports
pub use capture::service::{run_capture, CaptureOptions, SignatureResult};
pub use capture::session::{CaptureOutcome, CaptureSession};
pub use config::Config;
pub use device::{Capability, PenSample, Tablet};
