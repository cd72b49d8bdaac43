//! In-memory tablet for tests

use crate::device::{Capability, DeviceError, PenSample, Tablet};
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Scriptable in-memory tablet. Samples are injected through the sender
/// half returned by [`MockTablet::new`]; every command is recorded.
pub struct MockTablet {
    pub capability: Capability,
    pub commands: Vec<MockCommand>,
    sample_rx: Option<mpsc::UnboundedReceiver<PenSample>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCommand {
    InkingMode(bool),
    PenDataOptionMode(u8),
    ClearScreen,
    WriteImage { opcode: u8, len: usize },
    Disconnect,
}

impl MockTablet {
    pub fn new(capability: Capability) -> (Self, mpsc::UnboundedSender<PenSample>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                capability,
                commands: Vec::new(),
                sample_rx: Some(rx),
            },
            tx,
        )
    }

    /// 640x240 screen with an identity digitizer mapping
    pub fn identity() -> (Self, mpsc::UnboundedSender<PenSample>) {
        Self::new(Capability {
            screen_width: 640,
            screen_height: 240,
            tablet_max_x: 640,
            tablet_max_y: 240,
        })
    }

    pub fn image_writes(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, MockCommand::WriteImage { .. }))
            .count()
    }
}

#[async_trait]
impl Tablet for MockTablet {
    async fn capability(&mut self) -> Result<Capability, DeviceError> {
        Ok(self.capability)
    }

    async fn set_inking_mode(&mut self, on: bool) -> Result<(), DeviceError> {
        self.commands.push(MockCommand::InkingMode(on));
        Ok(())
    }

    async fn set_pen_data_option_mode(&mut self, mode: u8) -> Result<(), DeviceError> {
        self.commands.push(MockCommand::PenDataOptionMode(mode));
        Ok(())
    }

    async fn clear_screen(&mut self) -> Result<(), DeviceError> {
        self.commands.push(MockCommand::ClearScreen);
        Ok(())
    }

    async fn write_image(&mut self, opcode: u8, pixels: &[u8]) -> Result<(), DeviceError> {
        self.commands.push(MockCommand::WriteImage {
            opcode,
            len: pixels.len(),
        });
        Ok(())
    }

    fn samples(&mut self) -> Option<mpsc::UnboundedReceiver<PenSample>> {
        self.sample_rx.take()
    }

    async fn disconnect(&mut self) -> Result<(), DeviceError> {
        self.commands.push(MockCommand::Disconnect);
        Ok(())
    }
}
