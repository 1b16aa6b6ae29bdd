use core::fmt;
use std::io::{Read, Write};
use std::net::TcpStream;

use super::{ConnectObject, ObjectClass, RemoteObject, Sensor};
use crate::command::Command;
use crate::error::Result;
use crate::session::Session;
use crate::validators::{validate_finite, validate_range};

const LATITUDE_LIMIT: f64 = 90.0;
const LONGITUDE_LIMIT: f64 = 360.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationKind {
    Facility,
    Target,
    Place,
}

impl LocationKind {
    pub const fn class(self) -> ObjectClass {
        match self {
            LocationKind::Facility => ObjectClass::Facility,
            LocationKind::Target => ObjectClass::Target,
            LocationKind::Place => ObjectClass::Place,
        }
    }
}

/// A facility, target or place fixed to the central body.
pub struct Location<'s, S = TcpStream> {
    object: RemoteObject<'s, S>,
    kind: LocationKind,
}

impl<'s, S: Read + Write> Location<'s, S> {
    pub fn new(session: &'s Session<S>, kind: LocationKind, path: impl Into<String>) -> Self {
        Self {
            object: RemoteObject::new(session, kind.class(), path),
            kind,
        }
    }

    pub fn facility(session: &'s Session<S>, path: impl Into<String>) -> Self {
        Self::new(session, LocationKind::Facility, path)
    }

    pub fn target(session: &'s Session<S>, path: impl Into<String>) -> Self {
        Self::new(session, LocationKind::Target, path)
    }

    pub fn place(session: &'s Session<S>, path: impl Into<String>) -> Self {
        Self::new(session, LocationKind::Place, path)
    }

    pub fn kind(&self) -> LocationKind {
        self.kind
    }

    pub fn set_position_cartesian(&self, x: f64, y: f64, z: f64) -> Result<()> {
        validate_finite(&[x, y, z])?;
        self.object.send(
            &Command::new("SetPosition")
                .arg(self.object.path())
                .arg("Cartesian")
                .arg([x, y, z]),
        )
    }

    /// Latitude and longitude in degrees; `msl` measures `altitude` from mean sea level.
    pub fn set_position_geodetic(
        &self,
        latitude: f64,
        longitude: f64,
        altitude: f64,
        msl: bool,
    ) -> Result<()> {
        self.set_position_spherical("Geodetic", latitude, longitude, altitude, msl)
    }

    pub fn set_position_geocentric(
        &self,
        latitude: f64,
        longitude: f64,
        altitude: f64,
        msl: bool,
    ) -> Result<()> {
        self.set_position_spherical("Geocentric", latitude, longitude, altitude, msl)
    }

    fn set_position_spherical(
        &self,
        form: &str,
        latitude: f64,
        longitude: f64,
        altitude: f64,
        msl: bool,
    ) -> Result<()> {
        validate_range(Some(latitude), Some(-LATITUDE_LIMIT), Some(LATITUDE_LIMIT))?;
        validate_range(Some(longitude), Some(-LONGITUDE_LIMIT), Some(LONGITUDE_LIMIT))?;
        validate_finite(&[altitude])?;

        let command = Command::new("SetPosition")
            .arg(self.object.path())
            .arg(form)
            .arg([latitude, longitude, altitude])
            .opt_arg(msl.then_some("MSL"));
        self.object.send(&command)
    }

    pub fn set_height_above_ground(&self, height: f64) -> Result<()> {
        validate_finite(&[height])?;
        self.object.send(
            &Command::new("SetHeightAboveGround")
                .arg(self.object.path())
                .arg(height),
        )
    }

    /// Create a sensor attached to this location.
    pub fn new_sensor(&self, name: &str) -> Result<Sensor<'s, S>> {
        let sensor = Sensor::from_object(self.object.child(ObjectClass::Sensor, name)?);
        sensor.create()?;
        Ok(sensor)
    }
}

impl<'s, S: Read + Write + 's> ConnectObject<'s, S> for Location<'s, S> {
    fn object(&self) -> &RemoteObject<'s, S> {
        &self.object
    }

    fn object_mut(&mut self) -> &mut RemoteObject<'s, S> {
        &mut self.object
    }
}

impl<S> fmt::Display for Location<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.object, f)
    }
}

impl<S> fmt::Debug for Location<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Location")
            .field("kind", &self.kind)
            .field("object", &self.object)
            .finish()
    }
}
