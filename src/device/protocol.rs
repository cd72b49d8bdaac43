//! Tablet wire protocol
//!
//! Commands go out as `[opcode][len: u32 BE][payload]`; the image
//! payload for WRITE_IMAGE is the raw 3-byte-per-pixel buffer, so the
//! length field has to be wider than the usual 2-byte framing.
//! Inbound reports are fixed-size, tagged packets.

use crate::device::{Capability, PenSample};

/// Query screen size and digitizer range
pub const OPCODE_GET_CAPABILITY: u8 = 0x01;

/// Enable/disable ink capture; payload is one byte, 0 or 1
pub const OPCODE_SET_INKING_MODE: u8 = 0x02;

/// Select which pen data the device reports; payload is one byte
pub const OPCODE_SET_PEN_DATA_OPTION_MODE: u8 = 0x03;

/// Set the display image; payload is `width * height * 3` raw bytes
pub const OPCODE_WRITE_IMAGE: u8 = 0x04;

/// Blank the device screen
pub const OPCODE_CLEAR_SCREEN: u8 = 0x05;

/// Tell the device the session is over
pub const OPCODE_DISCONNECT: u8 = 0x06;

/// Inbound pen sample report tag
pub const REPORT_PEN_SAMPLE: u8 = 0x10;

/// Inbound capability report tag
pub const REPORT_CAPABILITY: u8 = 0x11;

const PEN_SAMPLE_LEN: usize = 6;
const CAPABILITY_LEN: usize = 9;

/// Frame a command for transmission
pub fn encode_command(opcode: u8, payload: &[u8]) -> Vec<u8> {
    let mut framed = Vec::with_capacity(5 + payload.len());
    framed.push(opcode);
    framed.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    framed.extend_from_slice(payload);
    framed
}

/// A decoded inbound report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Report {
    PenSample(PenSample),
    Capability(Capability),
}

/// Stateful decoder for the inbound report stream.
///
/// Handles partial reads across transport segment boundaries.
pub struct ReportDecoder {
    buf: Vec<u8>,
}

impl ReportDecoder {
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(256),
        }
    }

    /// Append received bytes to the internal buffer
    pub fn extend(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    /// Extract the next complete report, if available
    pub fn next_report(&mut self) -> Result<Option<Report>, String> {
        let Some(&tag) = self.buf.first() else {
            return Ok(None);
        };

        let needed = match tag {
            REPORT_PEN_SAMPLE => PEN_SAMPLE_LEN,
            REPORT_CAPABILITY => CAPABILITY_LEN,
            other => return Err(format!("unknown report tag 0x{:02x}", other)),
        };

        if self.buf.len() < needed {
            return Ok(None);
        }

        let report = match tag {
            REPORT_PEN_SAMPLE => Report::PenSample(PenSample {
                x: u16::from_be_bytes([self.buf[1], self.buf[2]]),
                y: u16::from_be_bytes([self.buf[3], self.buf[4]]),
                switch_state: self.buf[5],
            }),
            _ => Report::Capability(Capability {
                screen_width: u16::from_be_bytes([self.buf[1], self.buf[2]]) as u32,
                screen_height: u16::from_be_bytes([self.buf[3], self.buf[4]]) as u32,
                tablet_max_x: u16::from_be_bytes([self.buf[5], self.buf[6]]) as u32,
                tablet_max_y: u16::from_be_bytes([self.buf[7], self.buf[8]]) as u32,
            }),
        };

        self.buf.drain(..needed);
        Ok(Some(report))
    }
}

impl Default for ReportDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode a pen sample report (used by the fake device in tests and by
/// pad simulators)
pub fn encode_pen_sample(sample: &PenSample) -> [u8; PEN_SAMPLE_LEN] {
    let x = sample.x.to_be_bytes();
    let y = sample.y.to_be_bytes();
    [REPORT_PEN_SAMPLE, x[0], x[1], y[0], y[1], sample.switch_state]
}

/// Encode a capability report
pub fn encode_capability(cap: &Capability) -> [u8; CAPABILITY_LEN] {
    let sw = (cap.screen_width as u16).to_be_bytes();
    let sh = (cap.screen_height as u16).to_be_bytes();
    let mx = (cap.tablet_max_x as u16).to_be_bytes();
    let my = (cap.tablet_max_y as u16).to_be_bytes();
    [
        REPORT_CAPABILITY,
        sw[0],
        sw[1],
        sh[0],
        sh[1],
        mx[0],
        mx[1],
        my[0],
        my[1],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_framing() {
        let framed = encode_command(OPCODE_SET_INKING_MODE, &[1]);
        assert_eq!(framed, vec![0x02, 0, 0, 0, 1, 1]);
    }

    #[test]
    fn test_image_command_length_field() {
        let pixels = vec![0xffu8; 320 * 240 * 3];
        let framed = encode_command(OPCODE_WRITE_IMAGE, &pixels);
        assert_eq!(framed[0], 0x04);
        assert_eq!(
            u32::from_be_bytes([framed[1], framed[2], framed[3], framed[4]]),
            (320 * 240 * 3) as u32
        );
        assert_eq!(framed.len(), 5 + 320 * 240 * 3);
    }

    #[test]
    fn test_pen_sample_roundtrip() {
        let sample = PenSample {
            x: 1023,
            y: 77,
            switch_state: 1,
        };
        let mut decoder = ReportDecoder::new();
        decoder.extend(&encode_pen_sample(&sample));
        let report = decoder.next_report().unwrap().unwrap();
        assert_eq!(report, Report::PenSample(sample));
        assert!(decoder.next_report().unwrap().is_none());
    }

    #[test]
    fn test_partial_reads() {
        let cap = Capability {
            screen_width: 640,
            screen_height: 480,
            tablet_max_x: 2047,
            tablet_max_y: 2047,
        };
        let encoded = encode_capability(&cap);

        let mut decoder = ReportDecoder::new();
        // Feed one byte at a time
        for &byte in &encoded {
            decoder.extend(&[byte]);
        }
        let report = decoder.next_report().unwrap().unwrap();
        assert_eq!(report, Report::Capability(cap));
    }

    #[test]
    fn test_multiple_reports() {
        let a = PenSample {
            x: 1,
            y: 2,
            switch_state: 1,
        };
        let b = PenSample {
            x: 3,
            y: 4,
            switch_state: 0,
        };
        let mut decoder = ReportDecoder::new();
        let mut combined = encode_pen_sample(&a).to_vec();
        combined.extend_from_slice(&encode_pen_sample(&b));
        decoder.extend(&combined);

        assert_eq!(decoder.next_report().unwrap().unwrap(), Report::PenSample(a));
        assert_eq!(decoder.next_report().unwrap().unwrap(), Report::PenSample(b));
        assert!(decoder.next_report().unwrap().is_none());
    }

    #[test]
    fn test_unknown_tag_is_an_error() {
        let mut decoder = ReportDecoder::new();
        decoder.extend(&[0x7f, 0, 0]);
        assert!(decoder.next_report().is_err());
    }
}
