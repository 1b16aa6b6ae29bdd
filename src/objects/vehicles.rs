use core::fmt;
use std::io::{Read, Write};
use std::net::TcpStream;

use super::{ConnectObject, ObjectClass, RemoteObject, Sensor};
use crate::error::{ConnectError, Result};
use crate::session::Session;

/// Ways of specifying a vehicle's trajectory with `SetState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKind {
    Cartesian,
    Classical,
    Equinoctial,
    FromFile,
    Sgp4,
    Spherical,
    Gps,
    Sp3,
    Spice,
    SimpleAscent,
}

impl StateKind {
    pub const fn keyword(self) -> &'static str {
        match self {
            StateKind::Cartesian => "Cartesian",
            StateKind::Classical => "Classical",
            StateKind::Equinoctial => "Equi",
            StateKind::FromFile => "FromFile",
            StateKind::Sgp4 => "SGP4",
            StateKind::Spherical => "Spherical",
            StateKind::Gps => "GPS",
            StateKind::Sp3 => "SP3",
            StateKind::Spice => "SPICE",
            StateKind::SimpleAscent => "SimpleAscent",
        }
    }

    /// Whether this client can build the command for this kind.
    pub const fn is_implemented(self) -> bool {
        matches!(
            self,
            StateKind::Cartesian
                | StateKind::Classical
                | StateKind::Equinoctial
                | StateKind::FromFile
                | StateKind::Sgp4
        )
    }
}

/// What a vehicle type accepts in `SetState` commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub states: &'static [StateKind],
    pub propagators: &'static [&'static str],
    pub coordinate_systems: &'static [&'static str],
}

pub static SATELLITE: Capabilities = Capabilities {
    states: &[
        StateKind::Cartesian,
        StateKind::Classical,
        StateKind::Equinoctial,
        StateKind::FromFile,
        StateKind::Sgp4,
        StateKind::Spherical,
        StateKind::Gps,
        StateKind::Sp3,
        StateKind::Spice,
    ],
    propagators: &["TwoBody", "J2Perturbation", "J4Perturbation", "HPOP", "LOP"],
    coordinate_systems: &[
        "ICRF",
        "J2000",
        "MeanOfDate",
        "TrueOfDate",
        "B1950",
        "TEMEOfDate",
        "TEMEOfEpoch",
        "AlignmentAtEpoch",
    ],
};

pub static MISSILE: Capabilities = Capabilities {
    states: &[
        StateKind::Cartesian,
        StateKind::Classical,
        StateKind::FromFile,
        StateKind::Spherical,
    ],
    propagators: &["TwoBody", "J2Perturbation", "J4Perturbation"],
    coordinate_systems: &["Fixed", "ICRF", "J2000", "MeanOfDate", "TrueOfDate"],
};

pub static LAUNCH_VEHICLE: Capabilities = Capabilities {
    states: &[
        StateKind::Cartesian,
        StateKind::FromFile,
        StateKind::SimpleAscent,
    ],
    propagators: &["TwoBody", "J2Perturbation", "J4Perturbation"],
    coordinate_systems: &["Fixed", "ICRF", "J2000"],
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VehicleKind {
    Satellite,
    Missile,
    LaunchVehicle,
}

impl VehicleKind {
    pub const fn class(self) -> ObjectClass {
        match self {
            VehicleKind::Satellite => ObjectClass::Satellite,
            VehicleKind::Missile => ObjectClass::Missile,
            VehicleKind::LaunchVehicle => ObjectClass::LaunchVehicle,
        }
    }

    pub fn capabilities(self) -> &'static Capabilities {
        match self {
            VehicleKind::Satellite => &SATELLITE,
            VehicleKind::Missile => &MISSILE,
            VehicleKind::LaunchVehicle => &LAUNCH_VEHICLE,
        }
    }
}

/// A satellite, missile or launch vehicle.
pub struct Vehicle<'s, S = TcpStream> {
    object: RemoteObject<'s, S>,
    kind: VehicleKind,
    capabilities: &'static Capabilities,
}

impl<'s, S: Read + Write> Vehicle<'s, S> {
    pub fn new(session: &'s Session<S>, kind: VehicleKind, path: impl Into<String>) -> Self {
        Self::with_capabilities(session, kind, path, kind.capabilities())
    }

    /// Vehicle whose accepted states, propagators and coordinate systems
    /// differ from the defaults for its kind.
    pub fn with_capabilities(
        session: &'s Session<S>,
        kind: VehicleKind,
        path: impl Into<String>,
        capabilities: &'static Capabilities,
    ) -> Self {
        Self {
            object: RemoteObject::new(session, kind.class(), path),
            kind,
            capabilities,
        }
    }

    pub fn satellite(session: &'s Session<S>, path: impl Into<String>) -> Self {
        Self::new(session, VehicleKind::Satellite, path)
    }

    pub fn missile(session: &'s Session<S>, path: impl Into<String>) -> Self {
        Self::new(session, VehicleKind::Missile, path)
    }

    pub fn launch_vehicle(session: &'s Session<S>, path: impl Into<String>) -> Self {
        Self::new(session, VehicleKind::LaunchVehicle, path)
    }

    pub fn kind(&self) -> VehicleKind {
        self.kind
    }

    pub fn capabilities(&self) -> &'static Capabilities {
        self.capabilities
    }

    /// Fail with `NotSupported` unless this vehicle accepts `kind` and the
    /// client can build it.
    pub fn check_state(&self, kind: StateKind) -> Result<()> {
        if self.capabilities.states.contains(&kind) && kind.is_implemented() {
            Ok(())
        } else {
            Err(ConnectError::NotSupported {
                operation: kind.keyword(),
                class: self.kind.class().as_str(),
            })
        }
    }

    /// Create a sensor attached to this vehicle.
    pub fn new_sensor(&self, name: &str) -> Result<Sensor<'s, S>> {
        let sensor = Sensor::from_object(self.object.child(ObjectClass::Sensor, name)?);
        sensor.create()?;
        Ok(sensor)
    }
}

impl<'s, S: Read + Write + 's> ConnectObject<'s, S> for Vehicle<'s, S> {
    fn object(&self) -> &RemoteObject<'s, S> {
        &self.object
    }

    fn object_mut(&mut self) -> &mut RemoteObject<'s, S> {
        &mut self.object
    }
}

impl<S> fmt::Display for Vehicle<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.object, f)
    }
}

impl<S> fmt::Debug for Vehicle<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vehicle")
            .field("kind", &self.kind)
            .field("object", &self.object)
            .finish()
    }
}
