//! Sensors attached to vehicles and locations, and their field-of-view shapes.

use core::fmt;
use core::str::FromStr;
use std::io::{Read, Write};
use std::net::TcpStream;

use super::{ConnectObject, ObjectClass, RemoteObject};
use crate::command::{quoted, Arg, Command};
use crate::error::{ConnectError, Result};
use crate::session::Session;
use crate::validators::{validate_choice, validate_range};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    Conical,
    HalfPower,
    Rectangular,
    Sar,
    SimpleCone,
    Custom,
}

impl SensorKind {
    pub const ALL: [SensorKind; 6] = [
        SensorKind::Conical,
        SensorKind::HalfPower,
        SensorKind::Rectangular,
        SensorKind::Sar,
        SensorKind::SimpleCone,
        SensorKind::Custom,
    ];

    const KEYWORDS: [&'static str; 6] = [
        "Conical",
        "HalfPower",
        "Rectangular",
        "SAR",
        "SimpleCone",
        "Custom",
    ];

    pub const fn keyword(self) -> &'static str {
        Self::KEYWORDS[self as usize]
    }

    /// Number of mandatory numeric parameters, excluding the optional
    /// angular resolution. `Custom` takes a file path instead.
    const fn arity(self) -> usize {
        match self {
            SensorKind::Conical | SensorKind::Sar => 4,
            SensorKind::HalfPower | SensorKind::Rectangular => 2,
            SensorKind::SimpleCone | SensorKind::Custom => 1,
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for SensorKind {
    type Err = ConnectError;

    fn from_str(s: &str) -> Result<Self> {
        let keyword = validate_choice(s, &Self::KEYWORDS, "sensor type")?;
        Self::ALL
            .into_iter()
            .find(|kind| kind.keyword() == keyword)
            .ok_or_else(|| ConnectError::InvalidArgument(format!("unknown sensor type {s:?}")))
    }
}

/// Field-of-view definition. Angles are in degrees; `resolution` appends
/// `AngularRes <value>` when set.
#[derive(Debug, Clone, PartialEq)]
pub enum SensorShape {
    Conical {
        inner_half_angle: f64,
        outer_half_angle: f64,
        min_clock_angle: f64,
        max_clock_angle: f64,
        resolution: Option<f64>,
    },
    HalfPower {
        frequency: f64,
        diameter: f64,
        resolution: Option<f64>,
    },
    Rectangular {
        vertical_half_angle: f64,
        horizontal_half_angle: f64,
        resolution: Option<f64>,
    },
    Sar {
        min_elevation: f64,
        max_elevation: f64,
        forward_exclusion: f64,
        aft_exclusion: f64,
        resolution: Option<f64>,
    },
    SimpleCone {
        cone_angle: f64,
        resolution: Option<f64>,
    },
    /// Pattern loaded from a sensor definition file.
    Custom { file: String },
}

impl SensorShape {
    pub fn kind(&self) -> SensorKind {
        match self {
            SensorShape::Conical { .. } => SensorKind::Conical,
            SensorShape::HalfPower { .. } => SensorKind::HalfPower,
            SensorShape::Rectangular { .. } => SensorKind::Rectangular,
            SensorShape::Sar { .. } => SensorKind::Sar,
            SensorShape::SimpleCone { .. } => SensorKind::SimpleCone,
            SensorShape::Custom { .. } => SensorKind::Custom,
        }
    }

    /// Build a shape from positional text parameters, in the order the
    /// `Define` command takes them. Numeric shapes accept one extra trailing
    /// value as the angular resolution.
    pub fn from_params(kind: SensorKind, params: &[&str]) -> Result<Self> {
        let arity = kind.arity();
        let accepts_resolution = kind != SensorKind::Custom;
        if params.len() != arity && !(accepts_resolution && params.len() == arity + 1) {
            return Err(wrong_arity(kind, params.len()));
        }

        let values = if accepts_resolution {
            params
                .iter()
                .map(|param| parse_number(param))
                .collect::<Result<Vec<f64>>>()?
        } else {
            Vec::new()
        };
        let resolution = values.get(arity).copied();

        Ok(match kind {
            SensorKind::Conical => SensorShape::Conical {
                inner_half_angle: values[0],
                outer_half_angle: values[1],
                min_clock_angle: values[2],
                max_clock_angle: values[3],
                resolution,
            },
            SensorKind::HalfPower => SensorShape::HalfPower {
                frequency: values[0],
                diameter: values[1],
                resolution,
            },
            SensorKind::Rectangular => SensorShape::Rectangular {
                vertical_half_angle: values[0],
                horizontal_half_angle: values[1],
                resolution,
            },
            SensorKind::Sar => SensorShape::Sar {
                min_elevation: values[0],
                max_elevation: values[1],
                forward_exclusion: values[2],
                aft_exclusion: values[3],
                resolution,
            },
            SensorKind::SimpleCone => SensorShape::SimpleCone {
                cone_angle: values[0],
                resolution,
            },
            SensorKind::Custom => SensorShape::Custom {
                file: params[0].to_string(),
            },
        })
    }

    fn resolution(&self) -> Option<f64> {
        match self {
            SensorShape::Conical { resolution, .. }
            | SensorShape::HalfPower { resolution, .. }
            | SensorShape::Rectangular { resolution, .. }
            | SensorShape::Sar { resolution, .. }
            | SensorShape::SimpleCone { resolution, .. } => *resolution,
            SensorShape::Custom { .. } => None,
        }
    }

    /// Arguments following the kind keyword.
    fn args(&self) -> Result<Arg> {
        validate_range(self.resolution(), Some(0.0), None)?;

        let values: Arg = match self {
            SensorShape::Conical {
                inner_half_angle,
                outer_half_angle,
                min_clock_angle,
                max_clock_angle,
                ..
            } => Arg::from([
                *inner_half_angle,
                *outer_half_angle,
                *min_clock_angle,
                *max_clock_angle,
            ]),
            SensorShape::HalfPower {
                frequency,
                diameter,
                ..
            } => Arg::from([*frequency, *diameter]),
            SensorShape::Rectangular {
                vertical_half_angle,
                horizontal_half_angle,
                ..
            } => Arg::from([*vertical_half_angle, *horizontal_half_angle]),
            SensorShape::Sar {
                min_elevation,
                max_elevation,
                forward_exclusion,
                aft_exclusion,
                ..
            } => Arg::from([*min_elevation, *max_elevation, *forward_exclusion, *aft_exclusion]),
            SensorShape::SimpleCone { cone_angle, .. } => Arg::from(*cone_angle),
            SensorShape::Custom { file } => quoted(file),
        };

        let mut args = vec![values];
        if let Some(resolution) = self.resolution() {
            args.push(Arg::from("AngularRes"));
            args.push(Arg::from(resolution));
        }
        Ok(Arg::Sequence(args))
    }
}

fn wrong_arity(kind: SensorKind, given: usize) -> ConnectError {
    let expected = match kind {
        SensorKind::Custom => "1".to_string(),
        _ => format!("{} or {}", kind.arity(), kind.arity() + 1),
    };
    ConnectError::InvalidArgument(format!(
        "{kind} sensor takes {expected} parameters, got {given}"
    ))
}

fn parse_number(param: &str) -> Result<f64> {
    param
        .trim()
        .parse()
        .map_err(|_| ConnectError::InvalidArgument(format!("{param:?} is not a number")))
}

/// A sensor attached under a vehicle or location.
pub struct Sensor<'s, S = TcpStream> {
    object: RemoteObject<'s, S>,
}

impl<'s, S: Read + Write> Sensor<'s, S> {
    pub fn new(session: &'s Session<S>, path: impl Into<String>) -> Self {
        Self::from_object(RemoteObject::new(session, ObjectClass::Sensor, path))
    }

    pub(crate) fn from_object(object: RemoteObject<'s, S>) -> Self {
        Self { object }
    }

    /// `Define <path> <Kind> <params...> [AngularRes <r>]`
    pub fn define(&self, shape: &SensorShape) -> Result<()> {
        let command = Command::new("Define")
            .arg(self.object.path())
            .arg(shape.kind().keyword())
            .arg(shape.args()?);
        self.object.send(&command)
    }

    /// Define from a case-insensitive kind name and positional parameters,
    /// e.g. `("simplecone", &["10", "2"])`.
    pub fn define_by_type(&self, kind: &str, params: &[&str]) -> Result<()> {
        let kind: SensorKind = kind.parse()?;
        self.define(&SensorShape::from_params(kind, params)?)
    }
}

impl<'s, S: Read + Write + 's> ConnectObject<'s, S> for Sensor<'s, S> {
    fn object(&self) -> &RemoteObject<'s, S> {
        &self.object
    }

    fn object_mut(&mut self) -> &mut RemoteObject<'s, S> {
        &mut self.object
    }
}

impl<S> fmt::Display for Sensor<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.object, f)
    }
}

impl<S> fmt::Debug for Sensor<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sensor").field("object", &self.object).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_ignore_case() {
        assert_eq!("sar".parse::<SensorKind>().unwrap(), SensorKind::Sar);
        assert_eq!("HALFPOWER".parse::<SensorKind>().unwrap(), SensorKind::HalfPower);
        assert!(matches!(
            "Pyramid".parse::<SensorKind>(),
            Err(ConnectError::InvalidChoice { .. })
        ));
    }

    #[test]
    fn trailing_parameter_is_resolution() {
        let shape = SensorShape::from_params(SensorKind::Rectangular, &["4", "10", "0.5"]).unwrap();
        assert_eq!(
            shape,
            SensorShape::Rectangular {
                vertical_half_angle: 4.0,
                horizontal_half_angle: 10.0,
                resolution: Some(0.5),
            }
        );
    }

    #[test]
    fn wrong_parameter_count_is_rejected() {
        assert!(matches!(
            SensorShape::from_params(SensorKind::Conical, &["0", "85"]),
            Err(ConnectError::InvalidArgument(_))
        ));
        assert!(matches!(
            SensorShape::from_params(SensorKind::Custom, &[]),
            Err(ConnectError::InvalidArgument(_))
        ));
    }

    #[test]
    fn non_numeric_parameter_is_rejected() {
        assert!(matches!(
            SensorShape::from_params(SensorKind::SimpleCone, &["wide"]),
            Err(ConnectError::InvalidArgument(_))
        ));
    }
}
