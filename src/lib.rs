//! # STK Connect Client
//!
//! A client for the Connect remote-control protocol of Systems Tool Kit,
//! with a typed object model that validates parameters before any command
//! reaches the wire.
//!
//! ## Features
//!
//! - **Session transport**: line-oriented commands with ACK/NACK handshakes
//!   and length-framed single and multi-part responses
//! - **Command serialization**: nested argument lists, quoted timestamps
//! - **Object model**: scenarios, vehicles, locations and sensors addressed by path
//! - **Validated builders**: orbit states, access constraints and sensor shapes
//!   checked against per-type capability tables
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use stk_connect::{Propagation, Session, SessionConfig};
//!
//! let session = Session::new(SessionConfig::default());
//! session.connect()?;
//!
//! let scenario = session.new_scenario("Demo")?;
//! let satellite = session.new_satellite("ERS1")?;
//! let epoch = chrono::NaiveDate::from_ymd_opt(2000, 11, 1)
//!     .and_then(|day| day.and_hms_opt(0, 0, 0))
//!     .ok_or(stk_connect::ConnectError::InvalidArgument("epoch".into()))?;
//! satellite.set_state_classical(
//!     epoch,
//!     [7_163_000.0, 0.001, 98.5, 90.0, 0.0, 0.0],
//!     &Propagation::new("J2Perturbation", "J2000"),
//! )?;
//!
//! println!("{scenario} {satellite}");
//! session.close()?;
//! # Ok::<(), stk_connect::ConnectError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`session`] - transport, handshake and framing
//! - [`command`] - argument serialization
//! - [`objects`] - remote object handles and capability builders
//! - [`validators`] - identifier, range and choice checks
//! - [`config`] - session configuration
//! - [`mock`] - scripted in-memory stream for tests

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]

pub mod command;
pub mod config;
pub mod error;
pub mod mock;
pub mod objects;
pub mod session;
pub mod validators;

// Re-export main public types for convenience
pub use command::{format_timestamp, make_command, quoted, Arg, Command};
pub use config::SessionConfig;
pub use error::{ConnectError, Result};
pub use objects::{
    Capabilities, ConnectObject, ConstraintBounds, Constraints, Location, LocationKind,
    ObjectClass, Propagation, RemoteObject, Scenario, Sensor, SensorKind, SensorShape, StateKind,
    SurfaceConstraints, Vehicle, VehicleKind,
};
pub use session::{Acknowledgement, HistoryEntry, MultiMessage, Session, SingleMessage};
