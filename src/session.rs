//! Connect session: one TCP stream, one outstanding request at a time.
//!
//! Every command is a single line terminated by `\n` and is answered by a
//! 3-byte `ACK` or a 4-byte `NACK`. Commands that return data are followed by
//! length-framed messages:
//!
//! ```text
//! +---------------------------------------+------------------+
//! | 40-byte header, NUL padded            | payload          |
//! | "<CommandName> <DecimalByteLength>"   | (length bytes)   |
//! +---------------------------------------+------------------+
//! ```
//!
//! A multi message is a frame whose payload is a decimal count `N`, followed
//! by `N` single frames and one terminator frame.

use core::cell::RefCell;
use core::fmt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::net::TcpStream;
use tracing::{debug, info, warn};

use crate::command::Command;
use crate::config::SessionConfig;
use crate::error::{ConnectError, Result};

pub const HEADER_LENGTH: usize = 40;
pub const UNITS_COMMAND: &str = "Units_Get * Connect Abbreviation";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Acknowledgement {
    Ack,
    Nack,
}

impl Acknowledgement {
    pub const fn as_str(self) -> &'static str {
        match self {
            Acknowledgement::Ack => "ACK",
            Acknowledgement::Nack => "NACK",
        }
    }
}

impl fmt::Display for Acknowledgement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub command: String,
    pub response: Acknowledgement,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleMessage {
    pub command_name: String,
    pub data_length: usize,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiMessage {
    pub command_name: String,
    pub count: usize,
    pub messages: Vec<SingleMessage>,
}

impl MultiMessage {
    pub fn into_data(self) -> Vec<String> {
        self.messages.into_iter().map(|message| message.data).collect()
    }
}

/// A Connect client session.
///
/// Methods take `&self` so that remote objects can share one session; the
/// session is `!Sync`, so sharing it across threads requires the caller to
/// wrap it in a lock.
#[derive(Debug)]
pub struct Session<S = TcpStream> {
    config: SessionConfig,
    stream: RefCell<Option<S>>,
    history: RefCell<Option<Vec<HistoryEntry>>>,
    units: RefCell<BTreeMap<String, String>>,
}

impl Session<TcpStream> {
    /// Create a disconnected session.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            stream: RefCell::new(None),
            history: RefCell::new(None),
            units: RefCell::new(BTreeMap::new()),
        }
    }

    /// Open the TCP stream. Connecting again replaces the previous stream.
    pub fn connect(&self) -> Result<()> {
        let addr = self.config.address();
        let stream = TcpStream::connect(&addr).map_err(|source| ConnectError::Connection {
            addr: addr.clone(),
            source,
        })?;
        stream.set_nodelay(true)?;

        info!(%addr, "connected to Connect server");
        self.attach(stream);
        Ok(())
    }
}

impl Default for Session<TcpStream> {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl<S: Read + Write> Session<S> {
    /// Wrap an already-open stream. The session starts connected.
    pub fn from_stream(stream: S, config: SessionConfig) -> Self {
        let session = Self {
            config,
            stream: RefCell::new(None),
            history: RefCell::new(None),
            units: RefCell::new(BTreeMap::new()),
        };
        session.attach(stream);
        session
    }

    fn attach(&self, stream: S) {
        *self.stream.borrow_mut() = Some(stream);
        *self.history.borrow_mut() = Some(Vec::new());
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn is_connected(&self) -> bool {
        self.stream.borrow().is_some()
    }

    /// Drop the stream and the history.
    pub fn close(&self) -> Result<()> {
        let stream = self.stream.borrow_mut().take();
        let Some(mut stream) = stream else {
            return Err(ConnectError::NotConnected);
        };
        *self.history.borrow_mut() = None;

        let flushed = stream.flush();
        drop(stream);
        info!(addr = %self.config.address(), "session closed");
        flushed.map_err(ConnectError::from)
    }

    fn with_stream<T>(&self, f: impl FnOnce(&mut S) -> Result<T>) -> Result<T> {
        let mut guard = self.stream.borrow_mut();
        let stream = guard.as_mut().ok_or(ConnectError::NotConnected)?;
        f(stream)
    }

    /// Send one command line and wait for its acknowledgement.
    pub fn send(&self, command: &str) -> Result<()> {
        let command = command.trim_end();

        let response = self.with_stream(|stream| {
            let mut line = Vec::with_capacity(command.len() + 1);
            line.extend_from_slice(command.as_bytes());
            line.push(b'\n');
            stream.write_all(&line)?;
            stream.flush()?;
            debug!(command, "sent");

            read_acknowledgement(stream)
        })?;

        if self.config.record_history {
            if let Some(history) = self.history.borrow_mut().as_mut() {
                history.push(HistoryEntry {
                    command: command.to_string(),
                    response,
                });
            }
        }

        match response {
            Acknowledgement::Ack => Ok(()),
            Acknowledgement::Nack => {
                warn!(command, "command rejected");
                Err(ConnectError::CommandRejected {
                    command: command.to_string(),
                    response: response.as_str().to_string(),
                })
            }
        }
    }

    pub fn send_command(&self, command: &Command) -> Result<()> {
        self.send(&command.to_line())
    }

    pub fn get_single_message(&self) -> Result<SingleMessage> {
        self.with_stream(|stream| read_frame(stream))
    }

    pub fn get_multi_message(&self) -> Result<MultiMessage> {
        self.with_stream(|stream| {
            let head = read_frame(stream)?;
            let count = head.data.trim().parse::<usize>().map_err(|_| {
                ConnectError::UnexpectedResponse(format!(
                    "multi message count is not a number: {:?}",
                    head.data
                ))
            })?;

            let messages = (0..count)
                .map(|_| read_frame(stream))
                .collect::<Result<Vec<_>>>()?;

            let terminator = read_frame(stream)?;
            debug!(command_name = %head.command_name, count, terminator = %terminator.command_name, "multi message");

            Ok(MultiMessage {
                command_name: head.command_name,
                count,
                messages,
            })
        })
    }

    /// Payload texts of one multi message, in order.
    pub fn get_report(&self) -> Result<Vec<String>> {
        Ok(self.get_multi_message()?.into_data())
    }

    /// Recorded history, empty when recording is off or the session is closed.
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.history.borrow().clone().unwrap_or_default()
    }

    /// Query the remote unit abbreviations without caching them.
    pub fn get_units(&self) -> Result<BTreeMap<String, String>> {
        self.send(UNITS_COMMAND)?;
        let message = self.get_single_message()?;
        parse_units(&message.data)
    }

    /// Query the remote unit abbreviations and cache them on the session.
    pub fn update_units(&self) -> Result<()> {
        let units = self.get_units()?;
        *self.units.borrow_mut() = units;
        Ok(())
    }

    pub fn units(&self) -> BTreeMap<String, String> {
        self.units.borrow().clone()
    }

    pub fn unit(&self, dimension: &str) -> Option<String> {
        self.units.borrow().get(&dimension.to_lowercase()).cloned()
    }
}

impl<S> fmt::Display for Session<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Session(host=\"{}\", port={})", self.config.host, self.config.port)
    }
}

fn read_acknowledgement<R: Read>(stream: &mut R) -> Result<Acknowledgement> {
    let mut head = [0u8; 3];
    stream.read_exact(&mut head)?;

    match &head {
        b"ACK" => Ok(Acknowledgement::Ack),
        b"NAC" => {
            let mut tail = [0u8; 1];
            stream.read_exact(&mut tail)?;
            if tail[0] == b'K' {
                Ok(Acknowledgement::Nack)
            } else {
                Err(unexpected_handshake(&[head[0], head[1], head[2], tail[0]]))
            }
        }
        _ => Err(unexpected_handshake(&head)),
    }
}

fn unexpected_handshake(bytes: &[u8]) -> ConnectError {
    let text = String::from_utf8_lossy(bytes);
    warn!(response = %text, "no ACK or NACK");
    ConnectError::UnexpectedResponse(format!("did not receive ACK or NACK, got {text:?}"))
}

fn read_frame<R: Read>(stream: &mut R) -> Result<SingleMessage> {
    let mut header = [0u8; HEADER_LENGTH];
    stream.read_exact(&mut header)?;
    let (command_name, data_length) = parse_header(&header)?;

    // Buffer grows with the bytes received, never to the declared length up front.
    let mut data = Vec::new();
    let limit = u64::try_from(data_length).unwrap_or(u64::MAX);
    stream.by_ref().take(limit).read_to_end(&mut data)?;
    if data.len() < data_length {
        return Err(ConnectError::Io(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            format!(
                "{command_name} frame declared {data_length} bytes, stream ended after {}",
                data.len()
            ),
        )));
    }
    debug!(%command_name, data_length, "frame");

    Ok(SingleMessage {
        command_name,
        data_length,
        data: String::from_utf8_lossy(&data).into_owned(),
    })
}

/// Split a frame header into command name and payload length.
pub fn parse_header(header: &[u8]) -> Result<(String, usize)> {
    let end = header.iter().position(|&b| b == 0).unwrap_or(header.len());
    let text = core::str::from_utf8(&header[..end])
        .map_err(|_| ConnectError::UnexpectedResponse("frame header is not text".to_string()))?;

    let mut parts = text.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(name), Some(length), None) => {
            let length = length.parse::<usize>().map_err(|_| {
                ConnectError::UnexpectedResponse(format!("bad frame length in header {text:?}"))
            })?;
            Ok((name.to_string(), length))
        }
        _ => Err(ConnectError::UnexpectedResponse(format!(
            "malformed frame header {text:?}"
        ))),
    }
}

/// Build one frame: NUL padded header followed by `data`.
pub fn encode_frame(command_name: &str, data: &str) -> Result<Vec<u8>> {
    let header = format!("{} {}", command_name, data.len());
    if header.len() > HEADER_LENGTH || command_name.split_whitespace().count() != 1 {
        return Err(ConnectError::InvalidArgument(format!(
            "cannot frame command name {command_name:?}"
        )));
    }

    let mut frame = Vec::with_capacity(HEADER_LENGTH + data.len());
    frame.extend_from_slice(header.as_bytes());
    frame.resize(HEADER_LENGTH, 0);
    frame.extend_from_slice(data.as_bytes());
    Ok(frame)
}

/// Build a multi message: count frame, one frame per item, terminator frame.
pub fn encode_multi_frame(command_name: &str, items: &[&str]) -> Result<Vec<u8>> {
    let mut bytes = encode_frame(command_name, &items.len().to_string())?;
    for item in items {
        bytes.extend(encode_frame(command_name, item)?);
    }
    bytes.extend(encode_frame(command_name, "")?);
    Ok(bytes)
}

/// Parse `Dimension Unit` pairs separated by `;` and/or newlines.
pub fn parse_units(data: &str) -> Result<BTreeMap<String, String>> {
    data.split(|c| c == ';' || c == '\n')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let mut parts = entry.split_whitespace();
            match (parts.next(), parts.next(), parts.next()) {
                (Some(dimension), Some(unit), None) => {
                    Ok((dimension.to_lowercase(), unit.to_string()))
                }
                _ => Err(ConnectError::UnexpectedResponse(format!(
                    "malformed units entry {entry:?}"
                ))),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_without_padding_uses_all_bytes() {
        let (name, length) = parse_header(b"REPORT 7").unwrap();
        assert_eq!(name, "REPORT");
        assert_eq!(length, 7);
    }

    #[test]
    fn header_with_extra_fields_is_rejected() {
        assert!(parse_header(b"A 1 2\0").is_err());
    }

    #[test]
    fn frame_pads_header_to_forty_bytes() {
        let frame = encode_frame("UNITS_GET", "0123456789").unwrap();
        assert_eq!(frame.len(), HEADER_LENGTH + 10);
        assert_eq!(&frame[..12], b"UNITS_GET 10");
        assert!(frame[12..HEADER_LENGTH].iter().all(|&b| b == 0));
    }

    #[test]
    fn units_accept_semicolons_and_newlines() {
        let units = parse_units("Distance Meters;\nTime Seconds;\r\nAngle Degrees").unwrap();
        assert_eq!(units.get("distance").map(String::as_str), Some("Meters"));
        assert_eq!(units.get("time").map(String::as_str), Some("Seconds"));
        assert_eq!(units.get("angle").map(String::as_str), Some("Degrees"));
    }
}
