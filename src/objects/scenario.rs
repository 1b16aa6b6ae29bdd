use core::fmt;
use std::io::{Read, Write};
use std::net::TcpStream;

use super::{ConnectObject, ObjectClass, RemoteObject};
use crate::session::Session;

/// Root of the object tree. Only one scenario is loaded at a time.
pub struct Scenario<'s, S = TcpStream> {
    object: RemoteObject<'s, S>,
}

impl<'s, S: Read + Write> Scenario<'s, S> {
    pub fn new(session: &'s Session<S>, path: impl Into<String>) -> Self {
        Self {
            object: RemoteObject::new(session, ObjectClass::Scenario, path),
        }
    }

    /// Handle for `/Scenario/<name>`.
    pub fn named(session: &'s Session<S>, name: &str) -> Self {
        Self::new(session, format!("/Scenario/{name}"))
    }
}

impl<'s, S: Read + Write + 's> ConnectObject<'s, S> for Scenario<'s, S> {
    fn object(&self) -> &RemoteObject<'s, S> {
        &self.object
    }

    fn object_mut(&mut self) -> &mut RemoteObject<'s, S> {
        &mut self.object
    }
}

impl<S> fmt::Display for Scenario<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.object, f)
    }
}

impl<S> fmt::Debug for Scenario<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scenario").field("object", &self.object).finish()
    }
}
