//! Addressable objects in the remote application's object tree.
//!
//! Objects are identified by slash-delimited paths such as
//! `*/Satellite/ERS1/Sensor/FOV`, where `*` stands for the current scenario.
//! Handles borrow the [`Session`] and cache nothing: every accessor that needs
//! remote data issues a command.

pub mod constraints;
pub mod locations;
pub mod scenario;
pub mod sensor;
pub mod states;
pub mod vehicles;

pub use constraints::{ConstraintBounds, Constraints, SurfaceConstraints, LIGHTING_CONDITIONS};
pub use locations::{Location, LocationKind};
pub use scenario::Scenario;
pub use sensor::{Sensor, SensorKind, SensorShape};
pub use states::{Propagation, EQUINOCTIAL_DIRECTIONS};
pub use vehicles::{Capabilities, StateKind, Vehicle, VehicleKind};

use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::net::TcpStream;

use crate::command::Command;
use crate::error::{ConnectError, Result};
use crate::session::Session;
use crate::validators::{validate_choice, validate_name};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectClass {
    Scenario,
    Satellite,
    Missile,
    LaunchVehicle,
    Facility,
    Target,
    Place,
    Sensor,
}

impl ObjectClass {
    pub const ALL: [ObjectClass; 8] = [
        ObjectClass::Scenario,
        ObjectClass::Satellite,
        ObjectClass::Missile,
        ObjectClass::LaunchVehicle,
        ObjectClass::Facility,
        ObjectClass::Target,
        ObjectClass::Place,
        ObjectClass::Sensor,
    ];

    const NAMES: [&'static str; 8] = [
        "Scenario",
        "Satellite",
        "Missile",
        "LaunchVehicle",
        "Facility",
        "Target",
        "Place",
        "Sensor",
    ];

    pub const fn as_str(self) -> &'static str {
        Self::NAMES[self as usize]
    }
}

impl fmt::Display for ObjectClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectClass {
    type Err = ConnectError;

    fn from_str(s: &str) -> Result<Self> {
        let name = validate_choice(s, &Self::NAMES, "object class")?;
        Self::ALL
            .into_iter()
            .find(|class| class.as_str() == name)
            .ok_or_else(|| ConnectError::InvalidArgument(format!("unknown object class {s:?}")))
    }
}

/// Path plus session reference shared by every object type.
pub struct RemoteObject<'s, S = TcpStream> {
    session: &'s Session<S>,
    class: ObjectClass,
    path: String,
}

impl<S> Clone for RemoteObject<'_, S> {
    fn clone(&self) -> Self {
        Self {
            session: self.session,
            class: self.class,
            path: self.path.clone(),
        }
    }
}

impl<S> fmt::Debug for RemoteObject<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteObject")
            .field("class", &self.class)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl<S> fmt::Display for RemoteObject<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(path=\"{}\")", self.class, self.path)
    }
}

impl<'s, S: Read + Write> RemoteObject<'s, S> {
    pub fn new(session: &'s Session<S>, class: ObjectClass, path: impl Into<String>) -> Self {
        Self {
            session,
            class,
            path: path.into(),
        }
    }

    pub fn session(&self) -> &'s Session<S> {
        self.session
    }

    pub fn class(&self) -> ObjectClass {
        self.class
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Last path segment.
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Path with the trailing `Class/Name` pair removed.
    pub fn parent(&self) -> String {
        let segments: Vec<&str> = self.path.split('/').collect();
        let keep = segments.len().saturating_sub(2);
        segments[..keep].join("/")
    }

    pub fn send(&self, command: &Command) -> Result<()> {
        self.session.send_command(command)
    }

    pub fn create(&self) -> Result<()> {
        let command = match self.class {
            ObjectClass::Scenario => Command::new("New").arg("/").arg("Scenario"),
            class => Command::new("New")
                .arg("/")
                .arg(format!("{}/{}", self.parent(), class)),
        };
        self.send(&command.arg(self.name()))
    }

    pub fn unload(&self) -> Result<()> {
        self.send(&Command::new("Unload").arg("/").arg(self.path()))
    }

    /// Rename the remote object. The local path changes only once the remote
    /// side has acknowledged.
    pub fn rename(&mut self, new_name: &str) -> Result<()> {
        validate_name(new_name)?;
        let new_path = format!("{}/{}/{}", self.parent(), self.class, new_name);

        self.send(&Command::new("Rename").arg(self.path()).arg(new_name))?;
        self.path = new_path;
        Ok(())
    }

    /// Handle for a child object `<path>/<Class>/<name>`.
    pub fn child(&self, class: ObjectClass, name: &str) -> Result<RemoteObject<'s, S>> {
        validate_name(name)?;
        Ok(RemoteObject::new(
            self.session,
            class,
            format!("{}/{}/{}", self.path, class, name),
        ))
    }
}

/// Shared behaviour of every typed object handle.
pub trait ConnectObject<'s, S: Read + Write + 's> {
    fn object(&self) -> &RemoteObject<'s, S>;

    fn object_mut(&mut self) -> &mut RemoteObject<'s, S>;

    fn session(&self) -> &'s Session<S> {
        self.object().session()
    }

    fn class(&self) -> ObjectClass {
        self.object().class()
    }

    fn path<'a>(&'a self) -> &'a str
    where
        's: 'a,
    {
        self.object().path()
    }

    fn name<'a>(&'a self) -> &'a str
    where
        's: 'a,
    {
        self.object().name()
    }

    fn parent(&self) -> String {
        self.object().parent()
    }

    fn create(&self) -> Result<()> {
        self.object().create()
    }

    fn unload(&self) -> Result<()> {
        self.object().unload()
    }

    fn rename(&mut self, new_name: &str) -> Result<()> {
        self.object_mut().rename(new_name)
    }
}

impl<'s, S: Read + Write + 's> ConnectObject<'s, S> for RemoteObject<'s, S> {
    fn object(&self) -> &RemoteObject<'s, S> {
        self
    }

    fn object_mut(&mut self) -> &mut RemoteObject<'s, S> {
        self
    }
}

/// Session-level factories and listings.
impl<S: Read + Write> Session<S> {
    /// Unload every object, including the scenario.
    pub fn unload_all(&self) -> Result<()> {
        self.send_command(&Command::new("Unload").arg("/").arg("*"))
    }

    /// Paths of every loaded object of `class`.
    pub fn show_names(&self, class: ObjectClass) -> Result<Vec<String>> {
        self.send_command(
            &Command::new("ShowNames")
                .arg("*")
                .arg("Class")
                .arg(class.as_str()),
        )?;
        let message = self.get_single_message()?;
        Ok(message.data.split_whitespace().map(str::to_string).collect())
    }

    pub fn scenario(&self) -> Result<Option<Scenario<'_, S>>> {
        let paths = self.show_names(ObjectClass::Scenario)?;
        Ok(paths.into_iter().next().map(|path| Scenario::new(self, path)))
    }

    pub fn satellites(&self) -> Result<Vec<Vehicle<'_, S>>> {
        self.vehicles(VehicleKind::Satellite)
    }

    pub fn missiles(&self) -> Result<Vec<Vehicle<'_, S>>> {
        self.vehicles(VehicleKind::Missile)
    }

    pub fn launch_vehicles(&self) -> Result<Vec<Vehicle<'_, S>>> {
        self.vehicles(VehicleKind::LaunchVehicle)
    }

    pub fn vehicles(&self, kind: VehicleKind) -> Result<Vec<Vehicle<'_, S>>> {
        let paths = self.show_names(kind.class())?;
        Ok(paths
            .into_iter()
            .map(|path| Vehicle::new(self, kind, path))
            .collect())
    }

    pub fn facilities(&self) -> Result<Vec<Location<'_, S>>> {
        self.locations_of(LocationKind::Facility)
    }

    pub fn targets(&self) -> Result<Vec<Location<'_, S>>> {
        self.locations_of(LocationKind::Target)
    }

    pub fn places(&self) -> Result<Vec<Location<'_, S>>> {
        self.locations_of(LocationKind::Place)
    }

    pub fn locations_of(&self, kind: LocationKind) -> Result<Vec<Location<'_, S>>> {
        let paths = self.show_names(kind.class())?;
        Ok(paths
            .into_iter()
            .map(|path| Location::new(self, kind, path))
            .collect())
    }

    /// Facilities, then targets, then places.
    pub fn locations(&self) -> Result<Vec<Location<'_, S>>> {
        let mut locations = self.facilities()?;
        locations.extend(self.targets()?);
        locations.extend(self.places()?);
        Ok(locations)
    }

    /// Unload everything and create a fresh scenario.
    pub fn new_scenario(&self, name: &str) -> Result<Scenario<'_, S>> {
        validate_name(name)?;
        self.unload_all()?;
        let scenario = Scenario::named(self, name);
        scenario.create()?;
        Ok(scenario)
    }

    pub fn new_satellite(&self, name: &str) -> Result<Vehicle<'_, S>> {
        self.new_vehicle(VehicleKind::Satellite, name)
    }

    pub fn new_missile(&self, name: &str) -> Result<Vehicle<'_, S>> {
        self.new_vehicle(VehicleKind::Missile, name)
    }

    pub fn new_launch_vehicle(&self, name: &str) -> Result<Vehicle<'_, S>> {
        self.new_vehicle(VehicleKind::LaunchVehicle, name)
    }

    pub fn new_vehicle(&self, kind: VehicleKind, name: &str) -> Result<Vehicle<'_, S>> {
        validate_name(name)?;
        let vehicle = Vehicle::new(self, kind, format!("*/{}/{}", kind.class(), name));
        vehicle.create()?;
        Ok(vehicle)
    }

    pub fn new_facility(&self, name: &str) -> Result<Location<'_, S>> {
        self.new_location(LocationKind::Facility, name)
    }

    pub fn new_target(&self, name: &str) -> Result<Location<'_, S>> {
        self.new_location(LocationKind::Target, name)
    }

    pub fn new_place(&self, name: &str) -> Result<Location<'_, S>> {
        self.new_location(LocationKind::Place, name)
    }

    pub fn new_location(&self, kind: LocationKind, name: &str) -> Result<Location<'_, S>> {
        validate_name(name)?;
        let location = Location::new(self, kind, format!("*/{}/{}", kind.class(), name));
        location.create()?;
        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockStream;
    use crate::SessionConfig;

    #[test]
    fn parent_of_short_paths_is_empty() {
        let session = Session::from_stream(MockStream::new(), SessionConfig::default());
        let object = RemoteObject::new(&session, ObjectClass::Satellite, "ERS1");
        assert_eq!(object.name(), "ERS1");
        assert_eq!(object.parent(), "");
    }

    #[test]
    fn class_names_parse_ignoring_case() {
        assert_eq!("launchvehicle".parse::<ObjectClass>().unwrap(), ObjectClass::LaunchVehicle);
        assert!("Planet".parse::<ObjectClass>().is_err());
    }
}
