//! Picosecond-resolution virtual time

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign};
use core::str::FromStr;

use crate::LogicError;

/// Conversion factors to picoseconds, coarsest unit first.
const UNITS: [(&str, u64); 8] = [
    ("d", 24 * 3600 * 1_000_000_000_000),
    ("h", 3600 * 1_000_000_000_000),
    ("m", 60 * 1_000_000_000_000),
    ("s", 1_000_000_000_000),
    ("ms", 1_000_000_000),
    ("us", 1_000_000),
    ("ns", 1_000),
    ("ps", 1),
];

/// A quantity of virtual time, counted in picoseconds.
///
/// Timestamps parse from literals of the form `<digits><unit>` with an
/// optional space before the unit and `_` permitted as a digit separator:
/// `"200ns"`, `"1_000_000 ps"`, `"3 μs"`. Supported units are `ps`, `ns`,
/// `us`/`μs`, `ms`, `s`, `m`, `h` and `d`.
///
/// Rendering picks the coarsest unit that divides the value evenly, so
/// `Timestamp::from_ps(1_000_000)` displays as `1 us`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timestamp(u64);

impl Timestamp {
    /// The zero timestamp.
    pub const ZERO: Timestamp = Timestamp(0);

    /// A timestamp of `ps` picoseconds.
    pub const fn from_ps(ps: u64) -> Self {
        Self(ps)
    }

    /// The picosecond count of this timestamp.
    pub const fn as_ps(self) -> u64 {
        self.0
    }
}

impl From<u64> for Timestamp {
    fn from(ps: u64) -> Self {
        Self(ps)
    }
}

impl FromStr for Timestamp {
    type Err = LogicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || LogicError::BadValue(s.to_string());

        let digits_end = s
            .find(|c: char| !c.is_ascii_digit() && c != '_')
            .ok_or_else(bad)?;
        let (digits, unit) = s.split_at(digits_end);
        let unit = unit.strip_prefix(' ').unwrap_or(unit);
        let unit = if unit == "\u{3bc}s" { "us" } else { unit };

        if digits.is_empty() {
            return Err(bad());
        }

        let factor = UNITS
            .iter()
            .find(|(name, _)| *name == unit)
            .map(|(_, factor)| *factor)
            .ok_or_else(bad)?;

        let value: u64 = digits
            .chars()
            .filter(|c| *c != '_')
            .collect::<String>()
            .parse()
            .map_err(|_| bad())?;

        value.checked_mul(factor).map(Timestamp).ok_or_else(bad)
    }
}

impl TryFrom<&str> for Timestamp {
    type Error = LogicError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Add for Timestamp {
    type Output = Timestamp;

    fn add(self, rhs: Timestamp) -> Timestamp {
        Timestamp(self.0 + rhs.0)
    }
}

impl Add<u64> for Timestamp {
    type Output = Timestamp;

    fn add(self, rhs: u64) -> Timestamp {
        Timestamp(self.0 + rhs)
    }
}

impl AddAssign for Timestamp {
    fn add_assign(&mut self, rhs: Timestamp) {
        self.0 += rhs.0;
    }
}

impl Sum for Timestamp {
    fn sum<I: Iterator<Item = Timestamp>>(iter: I) -> Timestamp {
        iter.fold(Timestamp::ZERO, Add::add)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return write!(f, "0 ps");
        }

        // Every factor divides the smaller ones, so the first hit is the
        // coarsest unit that renders without a fraction.
        let (unit, factor) = UNITS
            .iter()
            .find(|(_, factor)| self.0 % factor == 0)
            .expect("the picosecond factor divides everything");

        write!(f, "{} {unit}", self.0 / factor)
    }
}
