//! Device UI rendering
//!
//! Composes the on-device chrome (buttons, optional transaction
//! summary) and the final ink image, and converts bitmaps into the
//! tablet's native pixel format. Chrome and ink are composed as
//! separate, fresh frames so a control-path redraw can never expose a
//! partially drawn data-path frame.

pub mod canvas;
pub mod encode;
pub mod text;

pub use canvas::{compose_chrome, compose_ink};
pub use encode::encode_device_pixels;
pub use text::LabelFont;

use serde::{Deserialize, Serialize};

/// Free-form transaction summary rendered as a static overlay above
/// the signature area
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransferInformation {
    /// Heading line, drawn slightly larger
    #[serde(default)]
    pub title: Option<String>,

    /// Summary lines, drawn top to bottom
    #[serde(default)]
    pub lines: Vec<String>,
}

/// Localized button captions
#[derive(Debug, Clone)]
pub struct ButtonLabels {
    pub cancel: String,
    pub clear: String,
    pub accept: String,
}

impl ButtonLabels {
    pub fn from_ui_config(ui: &crate::config::UiConfig) -> Self {
        Self {
            cancel: ui.label_cancel.clone(),
            clear: ui.label_clear.clone(),
            accept: ui.label_accept.clone(),
        }
    }
}
