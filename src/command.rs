//! Serialization of command arguments into a single Connect command line.

use chrono::{DateTime, NaiveDateTime, TimeZone};
use core::fmt;

/// Timestamp layout used by the remote application, e.g. `01 Nov 2000 00:00:00.000`.
pub const TIMESTAMP_FORMAT: &str = "%d %b %Y %H:%M:%S%.3f";

/// Interval keyword meaning "use the scenario's analysis interval".
pub const USE_SCENARIO_INTERVAL: &str = "UseScenarioInterval";

/// Keyword for a disabled constraint bound.
pub const OFF: &str = "Off";

/// One token of a command. Sequences are flattened in place when serialized.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Literal(String),
    Integer(i64),
    Float(f64),
    Time(NaiveDateTime),
    Sequence(Vec<Arg>),
}

impl Arg {
    fn write_tokens(&self, out: &mut Vec<String>) {
        match self {
            Arg::Literal(text) => out.push(text.clone()),
            Arg::Integer(value) => out.push(value.to_string()),
            Arg::Float(value) => out.push(value.to_string()),
            Arg::Time(time) => out.push(format!("\"{}\"", format_timestamp(time))),
            Arg::Sequence(items) => {
                for item in items {
                    item.write_tokens(out);
                }
            }
        }
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Arg::Literal(value.to_string())
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Arg::Literal(value)
    }
}

impl From<&String> for Arg {
    fn from(value: &String) -> Self {
        Arg::Literal(value.clone())
    }
}

impl From<f64> for Arg {
    fn from(value: f64) -> Self {
        Arg::Float(value)
    }
}

impl From<i64> for Arg {
    fn from(value: i64) -> Self {
        Arg::Integer(value)
    }
}

impl From<u32> for Arg {
    fn from(value: u32) -> Self {
        Arg::Integer(i64::from(value))
    }
}

impl From<NaiveDateTime> for Arg {
    fn from(value: NaiveDateTime) -> Self {
        Arg::Time(value)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Arg {
    fn from(value: DateTime<Tz>) -> Self {
        Arg::Time(value.naive_utc())
    }
}

impl<T: Into<Arg>> From<Vec<T>> for Arg {
    fn from(items: Vec<T>) -> Self {
        Arg::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Arg>, const N: usize> From<[T; N]> for Arg {
    fn from(items: [T; N]) -> Self {
        Arg::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl<A: Into<Arg>, B: Into<Arg>> From<(A, B)> for Arg {
    fn from((a, b): (A, B)) -> Self {
        Arg::Sequence(vec![a.into(), b.into()])
    }
}

impl<T: Into<Arg>> From<Option<T>> for Arg {
    /// `None` renders as the `Off` keyword.
    fn from(value: Option<T>) -> Self {
        value.map_or_else(|| Arg::Literal(OFF.to_string()), Into::into)
    }
}

/// Wrap text in double quotes, as the remote grammar expects for file paths.
pub fn quoted(text: impl AsRef<str>) -> Arg {
    Arg::Literal(format!("\"{}\"", text.as_ref()))
}

/// Render a timestamp in the fixed remote layout. Sub-millisecond precision is truncated.
pub fn format_timestamp(time: &NaiveDateTime) -> String {
    time.format(TIMESTAMP_FORMAT).to_string()
}

/// Join arguments into one command line, flattening nested sequences.
pub fn make_command(parts: &[Arg]) -> String {
    let mut tokens = Vec::with_capacity(parts.len());
    for part in parts {
        part.write_tokens(&mut tokens);
    }
    tokens.join(" ")
}

/// Ordered argument list for a single Connect command.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Command {
    args: Vec<Arg>,
}

impl Command {
    pub fn new(keyword: &str) -> Self {
        Self {
            args: vec![Arg::from(keyword)],
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<Arg>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append `arg` only when present; nothing is emitted for `None`.
    #[must_use]
    pub fn opt_arg<T: Into<Arg>>(self, arg: Option<T>) -> Self {
        match arg {
            Some(arg) => self.arg(arg),
            None => self,
        }
    }

    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    pub fn to_line(&self) -> String {
        make_command(&self.args)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn empty_sequence_emits_nothing() {
        let empty: Vec<Arg> = Vec::new();
        let line = make_command(&[Arg::from("A"), Arg::from(empty), Arg::from("B")]);
        assert_eq!(line, "A B");
    }

    #[test]
    fn timestamp_truncates_to_milliseconds() {
        let time = NaiveDate::from_ymd_opt(1986, 3, 4)
            .unwrap()
            .and_hms_nano_opt(20, 45, 0, 123_999_999)
            .unwrap();
        assert_eq!(format_timestamp(&time), "04 Mar 1986 20:45:00.123");
    }
}
