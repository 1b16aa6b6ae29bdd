//! Access constraints (`SetConstraint`).
//!
//! Each constraint has a remote name and the range its values must fall in.
//! Passing `None` for a bound disables that side of the constraint, which
//! the remote grammar spells `Off`.

use std::io::{Read, Write};

use super::{ConnectObject, Location, Vehicle};
use crate::command::Command;
use crate::error::{ConnectError, Result};
use crate::validators::{validate_choice, validate_range};

/// Accepted spellings of the lighting condition constraint.
pub const LIGHTING_CONDITIONS: [&str; 7] = [
    "Off",
    "DirectSun",
    "PenumbraDirectSun",
    "PenumbraUmbra",
    "Penumbra",
    "UmbraDirectSun",
    "Umbra",
];

/// Remote name and valid range of one constraint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstraintBounds {
    pub name: &'static str,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Both bounds must be given together or not at all.
    pub paired: bool,
    /// `min > max` describes an interval wrapping through the upper bound.
    pub wraps: bool,
}

impl ConstraintBounds {
    const fn new(name: &'static str, min: Option<f64>, max: Option<f64>) -> Self {
        Self {
            name,
            min,
            max,
            paired: false,
            wraps: false,
        }
    }

    const fn paired(self) -> Self {
        Self {
            paired: true,
            ..self
        }
    }

    const fn wrapping(self) -> Self {
        Self {
            wraps: true,
            ..self
        }
    }

    pub const AZIMUTH_ANGLE: Self = Self::new("AzimuthAngle", Some(0.0), Some(360.0))
        .paired()
        .wrapping();
    pub const ELEVATION_ANGLE: Self = Self::new("ElevationAngle", Some(0.0), Some(90.0));
    pub const RANGE: Self = Self::new("Range", Some(0.0), None);
    pub const RANGE_RATE: Self = Self::new("RangeRate", None, None);
    pub const ANGULAR_RATE: Self = Self::new("AngularRate", Some(0.0), None);
    pub const ALTITUDE: Self = Self::new("Altitude", None, None);
    pub const PROPAGATION_DELAY: Self = Self::new("PropagationDelay", Some(0.0), None);
    pub const SUN_ELEVATION_ANGLE: Self = Self::new("SunElevationAngle", Some(-90.0), Some(90.0));
    pub const LUNAR_ELEVATION_ANGLE: Self =
        Self::new("LunarElevationAngle", Some(-90.0), Some(90.0));
    pub const LOS_SUN_ILLUMINATION_ANGLE: Self =
        Self::new("LOSSunIlluminationAngle", Some(0.0), Some(180.0)).paired();
    pub const LOS_SUN_EXCLUSION: Self = Self::new("LOSSunExclusion", Some(0.0), Some(180.0));
    pub const LOS_LUNAR_EXCLUSION: Self = Self::new("LOSLunarExclusion", Some(0.0), Some(180.0));
    pub const SUN_SPECULAR_EXCLUSION: Self =
        Self::new("SunSpecularExclusion", Some(0.0), Some(180.0));
    pub const AZIMUTH_RATE: Self = Self::new("AzimuthRate", Some(0.0), None);
    pub const ELEVATION_RATE: Self = Self::new("ElevationRate", Some(0.0), None);

    /// Validate a min/max pair against this constraint.
    pub fn check_pair(&self, min: Option<f64>, max: Option<f64>) -> Result<()> {
        if self.paired && min.is_some() != max.is_some() {
            return Err(ConnectError::UnpairedBounds {
                constraint: self.name,
            });
        }

        validate_range(min, self.min, self.max)?;
        validate_range(max, self.min, self.max)?;

        match (min, max) {
            (Some(lo), Some(hi)) if lo > hi && !self.wraps => Err(ConnectError::OutOfRange {
                value: lo,
                min: self.min,
                max: Some(hi),
            }),
            _ => Ok(()),
        }
    }
}

/// Constraints shared by vehicles and locations.
pub trait Constraints<'s, S: Read + Write + 's>: ConnectObject<'s, S> {
    /// `SetConstraint <path> <Name> Min <m|Off> Max <M|Off>`
    fn set_constraint_min_max(
        &self,
        bounds: &ConstraintBounds,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Result<()> {
        bounds.check_pair(min, max)?;
        self.object().send(
            &Command::new("SetConstraint")
                .arg(self.path())
                .arg(bounds.name)
                .arg("Min")
                .arg(min)
                .arg("Max")
                .arg(max),
        )
    }

    /// `SetConstraint <path> <Name> <value|Off>`
    fn set_constraint_value(&self, bounds: &ConstraintBounds, value: Option<f64>) -> Result<()> {
        validate_range(value, bounds.min, bounds.max)?;
        self.object().send(
            &Command::new("SetConstraint")
                .arg(self.path())
                .arg(bounds.name)
                .arg(value),
        )
    }

    fn set_constraint_azimuth(&self, min: Option<f64>, max: Option<f64>) -> Result<()> {
        self.set_constraint_min_max(&ConstraintBounds::AZIMUTH_ANGLE, min, max)
    }

    fn set_constraint_elevation(&self, min: Option<f64>, max: Option<f64>) -> Result<()> {
        self.set_constraint_min_max(&ConstraintBounds::ELEVATION_ANGLE, min, max)
    }

    fn set_constraint_range(&self, min: Option<f64>, max: Option<f64>) -> Result<()> {
        self.set_constraint_min_max(&ConstraintBounds::RANGE, min, max)
    }

    fn set_constraint_range_rate(&self, min: Option<f64>, max: Option<f64>) -> Result<()> {
        self.set_constraint_min_max(&ConstraintBounds::RANGE_RATE, min, max)
    }

    fn set_constraint_angular_rate(&self, min: Option<f64>, max: Option<f64>) -> Result<()> {
        self.set_constraint_min_max(&ConstraintBounds::ANGULAR_RATE, min, max)
    }

    fn set_constraint_altitude(&self, min: Option<f64>, max: Option<f64>) -> Result<()> {
        self.set_constraint_min_max(&ConstraintBounds::ALTITUDE, min, max)
    }

    fn set_constraint_propagation_delay(&self, min: Option<f64>, max: Option<f64>) -> Result<()> {
        self.set_constraint_min_max(&ConstraintBounds::PROPAGATION_DELAY, min, max)
    }

    fn set_constraint_sun_elevation_angle(&self, min: Option<f64>, max: Option<f64>) -> Result<()> {
        self.set_constraint_min_max(&ConstraintBounds::SUN_ELEVATION_ANGLE, min, max)
    }

    fn set_constraint_lunar_elevation_angle(
        &self,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Result<()> {
        self.set_constraint_min_max(&ConstraintBounds::LUNAR_ELEVATION_ANGLE, min, max)
    }

    /// Line-of-sight sun illumination angle.
    fn set_constraint_los_sun_illumination_angle(
        &self,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Result<()> {
        self.set_constraint_min_max(&ConstraintBounds::LOS_SUN_ILLUMINATION_ANGLE, min, max)
    }

    fn set_constraint_los_sun_exclusion(&self, value: Option<f64>) -> Result<()> {
        self.set_constraint_value(&ConstraintBounds::LOS_SUN_EXCLUSION, value)
    }

    fn set_constraint_los_lunar_exclusion(&self, value: Option<f64>) -> Result<()> {
        self.set_constraint_value(&ConstraintBounds::LOS_LUNAR_EXCLUSION, value)
    }

    fn set_constraint_sun_specular_exclusion(&self, value: Option<f64>) -> Result<()> {
        self.set_constraint_value(&ConstraintBounds::SUN_SPECULAR_EXCLUSION, value)
    }

    /// Lighting condition, one of [`LIGHTING_CONDITIONS`]. `None` turns it off.
    fn set_constraint_lighting(&self, condition: Option<&str>) -> Result<()> {
        let condition = match condition {
            Some(condition) => validate_choice(condition, &LIGHTING_CONDITIONS, "lighting condition")?,
            None => LIGHTING_CONDITIONS[0],
        };
        self.object().send(
            &Command::new("SetConstraint")
                .arg(self.path())
                .arg("Lighting")
                .arg(condition),
        )
    }
}

/// Rate constraints only meaningful for objects fixed to the surface.
pub trait SurfaceConstraints<'s, S: Read + Write + 's>: Constraints<'s, S> {
    fn set_constraint_azimuth_rate(&self, min: Option<f64>, max: Option<f64>) -> Result<()> {
        self.set_constraint_min_max(&ConstraintBounds::AZIMUTH_RATE, min, max)
    }

    fn set_constraint_elevation_rate(&self, min: Option<f64>, max: Option<f64>) -> Result<()> {
        self.set_constraint_min_max(&ConstraintBounds::ELEVATION_RATE, min, max)
    }
}

impl<'s, S: Read + Write + 's> Constraints<'s, S> for Vehicle<'s, S> {}

impl<'s, S: Read + Write + 's> Constraints<'s, S> for Location<'s, S> {}

impl<'s, S: Read + Write + 's> SurfaceConstraints<'s, S> for Location<'s, S> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbounded_constraints_accept_negative_values() {
        assert!(ConstraintBounds::ALTITUDE.check_pair(Some(-100.0), Some(-10.0)).is_ok());
        assert!(ConstraintBounds::RANGE_RATE.check_pair(Some(-5.0), None).is_ok());
    }

    #[test]
    fn inverted_pair_is_out_of_range() {
        let err = ConstraintBounds::ELEVATION_ANGLE
            .check_pair(Some(40.0), Some(10.0))
            .unwrap_err();
        assert!(matches!(err, ConnectError::OutOfRange { value, .. } if value == 40.0));
    }

    #[test]
    fn azimuth_wraps_but_stays_in_range() {
        assert!(ConstraintBounds::AZIMUTH_ANGLE.check_pair(Some(350.0), Some(10.0)).is_ok());
        assert!(ConstraintBounds::AZIMUTH_ANGLE.check_pair(Some(350.0), Some(361.0)).is_err());
    }

    #[test]
    fn paired_constraint_needs_both_bounds() {
        let err = ConstraintBounds::LOS_SUN_ILLUMINATION_ANGLE
            .check_pair(None, Some(20.0))
            .unwrap_err();
        assert!(matches!(
            err,
            ConnectError::UnpairedBounds {
                constraint: "LOSSunIlluminationAngle"
            }
        ));
    }
}
