//! `SetState` builders for vehicles.
//!
//! Every builder checks the vehicle's capability table before building a
//! command, so an unsupported propagator or coordinate system never reaches
//! the remote side.

use chrono::NaiveDateTime;
use std::io::{Read, Write};

use super::{ConnectObject, StateKind, Vehicle};
use crate::command::{quoted, Arg, Command, USE_SCENARIO_INTERVAL};
use crate::error::{ConnectError, Result};
use crate::validators::{validate_choice, validate_finite, validate_range};

pub const DEFAULT_STEP_SIZE: f64 = 60.0;

pub const EQUINOCTIAL_DIRECTIONS: [&str; 2] = ["Posigrade", "Retrograde"];

/// Propagator, coordinate system, interval and step size of an orbit state.
#[derive(Debug, Clone, PartialEq)]
pub struct Propagation {
    pub propagator: String,
    pub coordinate_system: String,
    /// `None` propagates over the scenario interval.
    pub interval: Option<(NaiveDateTime, NaiveDateTime)>,
    pub step_size: f64,
}

impl Propagation {
    pub fn new(propagator: impl Into<String>, coordinate_system: impl Into<String>) -> Self {
        Self {
            propagator: propagator.into(),
            coordinate_system: coordinate_system.into(),
            interval: None,
            step_size: DEFAULT_STEP_SIZE,
        }
    }

    #[must_use]
    pub fn with_interval(mut self, start: NaiveDateTime, stop: NaiveDateTime) -> Self {
        self.interval = Some((start, stop));
        self
    }

    #[must_use]
    pub fn with_step_size(mut self, step_size: f64) -> Self {
        self.step_size = step_size;
        self
    }
}

/// Interval and step size arguments shared by the propagated state kinds.
fn timing_args(
    interval: Option<(NaiveDateTime, NaiveDateTime)>,
    step_size: f64,
) -> Result<(Arg, Arg)> {
    validate_range(Some(step_size), Some(0.0), None)?;

    let interval = match interval {
        Some((start, stop)) if start > stop => {
            return Err(ConnectError::InvalidArgument(format!(
                "interval start {start} is after stop {stop}"
            )))
        }
        Some(pair) => Arg::from(pair),
        None => Arg::from(USE_SCENARIO_INTERVAL),
    };

    Ok((interval, Arg::from(step_size)))
}

impl<'s, S: Read + Write> Vehicle<'s, S> {
    fn propagated_state(
        &self,
        kind: StateKind,
        epoch: NaiveDateTime,
        state: [f64; 6],
        propagation: &Propagation,
    ) -> Result<Command> {
        self.check_state(kind)?;
        validate_finite(&state)?;
        let capabilities = self.capabilities();
        let propagator = validate_choice(&propagation.propagator, capabilities.propagators, "propagator")?;
        let coordinate_system = validate_choice(
            &propagation.coordinate_system,
            capabilities.coordinate_systems,
            "coordinate system",
        )?;
        let (interval, step_size) = timing_args(propagation.interval, propagation.step_size)?;

        Ok(Command::new("SetState")
            .arg(self.path())
            .arg(kind.keyword())
            .arg(propagator)
            .arg(interval)
            .arg(step_size)
            .arg(coordinate_system)
            .arg(epoch)
            .arg(state))
    }

    /// Position and velocity `[x, y, z, vx, vy, vz]` at `epoch`.
    pub fn set_state_cartesian(
        &self,
        epoch: NaiveDateTime,
        state: [f64; 6],
        propagation: &Propagation,
    ) -> Result<()> {
        let command = self.propagated_state(StateKind::Cartesian, epoch, state, propagation)?;
        self.object().send(&command)
    }

    /// Classical elements `[a, e, i, argp, raan, anomaly]` at `epoch`.
    pub fn set_state_classical(
        &self,
        epoch: NaiveDateTime,
        state: [f64; 6],
        propagation: &Propagation,
    ) -> Result<()> {
        let command = self.propagated_state(StateKind::Classical, epoch, state, propagation)?;
        self.object().send(&command)
    }

    /// Equinoctial elements at `epoch`; `direction` is `Posigrade` or `Retrograde`.
    pub fn set_state_equinoctial(
        &self,
        epoch: NaiveDateTime,
        state: [f64; 6],
        direction: &str,
        propagation: &Propagation,
    ) -> Result<()> {
        let command = self.propagated_state(StateKind::Equinoctial, epoch, state, propagation)?;
        let direction = validate_choice(direction, &EQUINOCTIAL_DIRECTIONS, "orbit direction")?;
        self.object().send(&command.arg(direction))
    }

    /// Load the trajectory from an ephemeris file, optionally re-epoched.
    pub fn set_state_from_file(&self, file: &str, start_time: Option<NaiveDateTime>) -> Result<()> {
        self.check_state(StateKind::FromFile)?;
        let command = Command::new("SetState")
            .arg(self.path())
            .arg(StateKind::FromFile.keyword())
            .arg(quoted(file))
            .opt_arg(start_time.map(|time| Arg::Sequence(vec![Arg::from("StartTime"), Arg::from(time)])));
        self.object().send(&command)
    }

    /// SGP4 propagation of catalog object `ssc` using the TLEs in `tle_file`.
    pub fn set_state_sgp4(
        &self,
        ssc: u32,
        tle_file: &str,
        interval: Option<(NaiveDateTime, NaiveDateTime)>,
        step_size: f64,
    ) -> Result<()> {
        self.check_state(StateKind::Sgp4)?;
        let (interval, step_size) = timing_args(interval, step_size)?;

        let command = Command::new("SetState")
            .arg(self.path())
            .arg(StateKind::Sgp4.keyword())
            .arg(interval)
            .arg(step_size)
            .arg(ssc)
            .arg(["TLESource", "Automatic", "Source", "File"])
            .arg(quoted(tle_file))
            .arg(["UseTLE", "All", "SwitchMethod", "TCA"]);
        self.object().send(&command)
    }
}
