//! Scripted in-memory stream for exercising a [`Session`](crate::Session)
//! without a running server.
//!
//! Clones share the same buffers, so a test can keep one handle to script
//! responses and inspect what the session wrote.
//!
//! ```rust
//! use stk_connect::mock::MockStream;
//! use stk_connect::{Session, SessionConfig};
//!
//! let stream = MockStream::new();
//! stream.push_ack();
//! let session = Session::from_stream(stream.clone(), SessionConfig::default());
//! session.send("New / */Satellite ERS1").unwrap();
//! assert_eq!(stream.last_line().as_deref(), Some("New / */Satellite ERS1"));
//! ```

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::rc::Rc;

use crate::session::{encode_frame, encode_multi_frame};

#[derive(Debug, Default)]
struct MockState {
    incoming: VecDeque<u8>,
    written: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct MockStream {
    state: Rc<RefCell<MockState>>,
}

impl MockStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_bytes(&self, bytes: &[u8]) {
        self.state.borrow_mut().incoming.extend(bytes.iter().copied());
    }

    pub fn push_ack(&self) {
        self.push_bytes(b"ACK");
    }

    pub fn push_nack(&self) {
        self.push_bytes(b"NACK");
    }

    /// Queue one framed message.
    ///
    /// # Panics
    /// If `command_name` does not fit a frame header.
    pub fn push_message(&self, command_name: &str, data: &str) {
        let frame = encode_frame(command_name, data).expect("command name fits a frame header");
        self.push_bytes(&frame);
    }

    /// Queue a multi message with its terminator frame.
    ///
    /// # Panics
    /// If `command_name` does not fit a frame header.
    pub fn push_multi_message(&self, command_name: &str, items: &[&str]) {
        let bytes = encode_multi_frame(command_name, items).expect("command name fits a frame header");
        self.push_bytes(&bytes);
    }

    /// Bytes queued but not yet read by the session.
    pub fn remaining(&self) -> usize {
        self.state.borrow().incoming.len()
    }

    pub fn written(&self) -> Vec<u8> {
        self.state.borrow().written.clone()
    }

    /// Written bytes split into command lines.
    pub fn sent_lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.state.borrow().written)
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub fn last_line(&self) -> Option<String> {
        self.sent_lines().pop()
    }

    pub fn clear_written(&self) {
        self.state.borrow_mut().written.clear();
    }
}

impl Read for MockStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut state = self.state.borrow_mut();
        let n = buf.len().min(state.incoming.len());
        for (slot, byte) in buf.iter_mut().zip(state.incoming.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }
}

impl Write for MockStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.state.borrow_mut().written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
