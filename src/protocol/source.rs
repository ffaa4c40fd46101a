//! # Byte Sources
//!
//! Live and simulated inputs for the stream decoder. A source hands out raw
//! chunks in arrival order; the decoder does not care whether they came from a
//! serial port or from a replayed capture.
//!
//! - [`SerialSource`] reads the pump link through `tokio-serial` (8N1, no parity).
//! - [`ReplaySource`] replays the `DATA:` lines of a capture with a fixed delay.
//! - [`ReaderSource`] wraps any `AsyncRead`, which is what the other two build on
//!   and what tests use with an in-memory stream.

use crate::constants::{DEFAULT_BAUDRATE, DEFAULT_READ_SIZE, DEFAULT_READ_TIMEOUT_MS};
use crate::error::MepsanError;
use crate::util::hex::parse_data_line;
use async_trait::async_trait;
use log::{debug, info};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio_serial::SerialPortBuilderExt;

/// A producer of raw byte chunks.
#[async_trait]
pub trait ByteSource: Send {
    /// Next chunk of bytes.
    ///
    /// `Ok(Some(empty))` means nothing arrived in time; `Ok(None)` means the
    /// source is exhausted.
    async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, MepsanError>;
}

/// Configuration for the serial connection.
#[derive(Debug, Clone)]
pub struct SerialConfig {
    pub baudrate: u32,
    pub timeout: Duration,
    /// Maximum bytes requested per read.
    pub read_size: usize,
}

impl Default for SerialConfig {
    fn default() -> Self {
        SerialConfig {
            baudrate: DEFAULT_BAUDRATE,
            timeout: Duration::from_millis(DEFAULT_READ_TIMEOUT_MS),
            read_size: DEFAULT_READ_SIZE,
        }
    }
}

/// Reads chunks from any async reader with a per-read timeout.
pub struct ReaderSource<R> {
    reader: R,
    timeout: Duration,
    read_size: usize,
}

impl<R: AsyncRead + Unpin + Send> ReaderSource<R> {
    pub fn new(reader: R, timeout: Duration, read_size: usize) -> Self {
        ReaderSource {
            reader,
            timeout,
            read_size: read_size.max(1),
        }
    }
}

#[async_trait]
impl<R: AsyncRead + Unpin + Send> ByteSource for ReaderSource<R> {
    async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, MepsanError> {
        let mut buf = vec![0u8; self.read_size];
        match tokio::time::timeout(self.timeout, self.reader.read(&mut buf)).await {
            // Timed out: no traffic, keep going.
            Err(_) => Ok(Some(Vec::new())),
            Ok(Ok(0)) => Ok(None),
            Ok(Ok(n)) => {
                buf.truncate(n);
                Ok(Some(buf))
            }
            Ok(Err(e)) => Err(MepsanError::SerialPortError(e.to_string())),
        }
    }
}

/// Live pump link.
pub struct SerialSource {
    inner: ReaderSource<tokio_serial::SerialStream>,
}

impl SerialSource {
    /// Opens the port with 8 data bits, no parity, one stop bit.
    pub fn open(port_name: &str, config: &SerialConfig) -> Result<Self, MepsanError> {
        let port = tokio_serial::new(port_name, config.baudrate)
            .data_bits(tokio_serial::DataBits::Eight)
            .stop_bits(tokio_serial::StopBits::One)
            .parity(tokio_serial::Parity::None)
            .timeout(config.timeout)
            .open_native_async()?;

        info!("opened {port_name} at {} baud", config.baudrate);
        Ok(SerialSource {
            inner: ReaderSource::new(port, config.timeout, config.read_size),
        })
    }
}

#[async_trait]
impl ByteSource for SerialSource {
    async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, MepsanError> {
        self.inner.next_chunk().await
    }
}

/// Replays a capture one `DATA:` line at a time.
pub struct ReplaySource {
    lines: std::vec::IntoIter<(usize, String)>,
    delay: Duration,
}

impl ReplaySource {
    pub fn new(capture: &str, delay: Duration) -> Self {
        let lines: Vec<(usize, String)> = capture
            .lines()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line.to_string()))
            .collect();
        ReplaySource {
            lines: lines.into_iter(),
            delay,
        }
    }
}

#[async_trait]
impl ByteSource for ReplaySource {
    async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, MepsanError> {
        for (line_no, line) in self.lines.by_ref() {
            let Some(parsed) = parse_data_line(&line, line_no) else {
                continue;
            };
            let bytes = parsed?;
            if bytes.is_empty() {
                continue;
            }
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            debug!("replaying line {line_no} ({} bytes)", bytes.len());
            return Ok(Some(bytes));
        }
        Ok(None)
    }
}
