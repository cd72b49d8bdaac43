//! TCP-attached tablet
//!
//! Speaks the command/report protocol over a TCP link. A spawned reader
//! task decodes inbound reports and forwards pen samples into an
//! unbounded channel; commands are written directly on the caller's
//! task and block until the transport accepts them.

use crate::device::protocol::{
    self, Report, ReportDecoder, OPCODE_CLEAR_SCREEN, OPCODE_DISCONNECT, OPCODE_GET_CAPABILITY,
    OPCODE_SET_INKING_MODE, OPCODE_SET_PEN_DATA_OPTION_MODE,
};
use crate::device::{Capability, DeviceError, PenSample, Tablet};
use async_trait::async_trait;
use log::{debug, info, warn};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// How long to wait for a capability report after asking for one
const CAPABILITY_TIMEOUT: Duration = Duration::from_secs(2);

/// A tablet reached over TCP
pub struct NetTablet {
    writer: OwnedWriteHalf,
    sample_rx: Option<mpsc::UnboundedReceiver<PenSample>>,
    cap_rx: mpsc::UnboundedReceiver<Capability>,
    reader: JoinHandle<()>,
}

impl NetTablet {
    /// Connect to a tablet at `addr` within `timeout`
    pub async fn connect(addr: &str, timeout: Duration) -> Result<Self, DeviceError> {
        let stream = tokio::time::timeout(timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| DeviceError::Timeout)??;
        let _ = stream.set_nodelay(true);
        info!("Connected to tablet at {}", addr);

        let (read_half, writer) = stream.into_split();
        let (sample_tx, sample_rx) = mpsc::unbounded_channel();
        let (cap_tx, cap_rx) = mpsc::unbounded_channel();
        let reader = tokio::spawn(read_loop(read_half, sample_tx, cap_tx));

        Ok(Self {
            writer,
            sample_rx: Some(sample_rx),
            cap_rx,
            reader,
        })
    }

    async fn send(&mut self, opcode: u8, payload: &[u8]) -> Result<(), DeviceError> {
        let framed = protocol::encode_command(opcode, payload);
        self.writer.write_all(&framed).await?;
        self.writer.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl Tablet for NetTablet {
    async fn capability(&mut self) -> Result<Capability, DeviceError> {
        self.send(OPCODE_GET_CAPABILITY, &[]).await?;
        match tokio::time::timeout(CAPABILITY_TIMEOUT, self.cap_rx.recv()).await {
            Ok(Some(cap)) => {
                debug!("Tablet reported {}", cap);
                Ok(cap)
            }
            Ok(None) => Err(DeviceError::Closed),
            Err(_) => Err(DeviceError::Timeout),
        }
    }

    async fn set_inking_mode(&mut self, on: bool) -> Result<(), DeviceError> {
        self.send(OPCODE_SET_INKING_MODE, &[u8::from(on)]).await
    }

    async fn set_pen_data_option_mode(&mut self, mode: u8) -> Result<(), DeviceError> {
        self.send(OPCODE_SET_PEN_DATA_OPTION_MODE, &[mode]).await
    }

    async fn clear_screen(&mut self) -> Result<(), DeviceError> {
        self.send(OPCODE_CLEAR_SCREEN, &[]).await
    }

    async fn write_image(&mut self, opcode: u8, pixels: &[u8]) -> Result<(), DeviceError> {
        self.send(opcode, pixels).await
    }

    fn samples(&mut self) -> Option<mpsc::UnboundedReceiver<PenSample>> {
        self.sample_rx.take()
    }

    async fn disconnect(&mut self) -> Result<(), DeviceError> {
        let result = self.send(OPCODE_DISCONNECT, &[]).await;
        let _ = self.writer.shutdown().await;
        self.reader.abort();
        result
    }
}

impl Drop for NetTablet {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

async fn read_loop(
    mut half: OwnedReadHalf,
    sample_tx: mpsc::UnboundedSender<PenSample>,
    cap_tx: mpsc::UnboundedSender<Capability>,
) {
    let mut decoder = ReportDecoder::new();
    let mut buf = [0u8; 512];

    loop {
        let n = match half.read(&mut buf).await {
            Ok(0) => {
                debug!("Tablet closed the link");
                return;
            }
            Ok(n) => n,
            Err(e) => {
                debug!("Tablet read error: {}", e);
                return;
            }
        };

        decoder.extend(&buf[..n]);
        loop {
            match decoder.next_report() {
                Ok(Some(Report::PenSample(sample))) => {
                    if sample_tx.send(sample).is_err() {
                        // Session is gone, keep draining so the device
                        // does not block on a full socket buffer.
                        continue;
                    }
                }
                Ok(Some(Report::Capability(cap))) => {
                    let _ = cap_tx.send(cap);
                }
                Ok(None) => break,
                Err(msg) => {
                    warn!("Dropping tablet link: {}", msg);
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::protocol::{encode_capability, encode_pen_sample, OPCODE_WRITE_IMAGE};
    use tokio::net::TcpListener;

    /// Minimal fake pad: answers capability queries and replays a pen
    /// script once ink mode is enabled.
    async fn fake_pad(listener: TcpListener, script: Vec<PenSample>) {
        let (mut stream, _) = listener.accept().await.expect("accept");
        let cap = Capability {
            screen_width: 640,
            screen_height: 240,
            tablet_max_x: 640,
            tablet_max_y: 240,
        };

        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = match stream.read(&mut chunk).await {
                Ok(0) | Err(_) => return,
                Ok(n) => n,
            };
            buf.extend_from_slice(&chunk[..n]);

            // Parse complete command frames
            while buf.len() >= 5 {
                let len = u32::from_be_bytes([buf[1], buf[2], buf[3], buf[4]]) as usize;
                if buf.len() < 5 + len {
                    break;
                }
                let opcode = buf[0];
                let payload = buf[5..5 + len].to_vec();
                buf.drain(..5 + len);

                match opcode {
                    OPCODE_GET_CAPABILITY => {
                        stream
                            .write_all(&encode_capability(&cap))
                            .await
                            .expect("write cap");
                    }
                    OPCODE_SET_INKING_MODE if payload == [1] => {
                        for sample in &script {
                            stream
                                .write_all(&encode_pen_sample(sample))
                                .await
                                .expect("write sample");
                        }
                    }
                    OPCODE_DISCONNECT => return,
                    _ => {}
                }
            }
        }
    }

    #[tokio::test]
    async fn capability_and_samples_over_tcp() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr").to_string();
        let script = vec![
            PenSample {
                x: 10,
                y: 20,
                switch_state: 1,
            },
            PenSample {
                x: 11,
                y: 21,
                switch_state: 0,
            },
        ];
        let pad = tokio::spawn(fake_pad(listener, script.clone()));

        let mut tablet = NetTablet::connect(&addr, Duration::from_secs(1))
            .await
            .expect("connect");
        let cap = tablet.capability().await.expect("capability");
        assert_eq!(cap.screen_width, 640);

        let mut samples = tablet.samples().expect("stream");
        assert!(tablet.samples().is_none(), "stream can only be taken once");

        tablet.set_inking_mode(true).await.expect("ink on");
        assert_eq!(samples.recv().await, Some(script[0]));
        assert_eq!(samples.recv().await, Some(script[1]));

        tablet.disconnect().await.expect("disconnect");
        pad.await.expect("pad task");
    }

    #[tokio::test]
    async fn write_image_is_framed() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr").to_string();

        let pad = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.expect("accept");
            let mut header = [0u8; 5];
            stream.read_exact(&mut header).await.expect("header");
            let len = u32::from_be_bytes([header[1], header[2], header[3], header[4]]) as usize;
            let mut payload = vec![0u8; len];
            stream.read_exact(&mut payload).await.expect("payload");
            (header[0], payload)
        });

        let mut tablet = NetTablet::connect(&addr, Duration::from_secs(1))
            .await
            .expect("connect");
        let pixels = vec![0xabu8; 4 * 2 * 3];
        tablet
            .write_image(OPCODE_WRITE_IMAGE, &pixels)
            .await
            .expect("write image");

        let (opcode, payload) = pad.await.expect("pad task");
        assert_eq!(opcode, OPCODE_WRITE_IMAGE);
        assert_eq!(payload, pixels);
    }
}
