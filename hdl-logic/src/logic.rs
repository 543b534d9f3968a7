//! The four-valued logic scalar

use core::cmp::Ordering;
use core::fmt;
use core::ops::{BitAnd, BitOr, BitXor, Not};

use crate::{LogicError, Logvec, Span};

/// A single logic signal value.
///
/// Digital signals carry more information than a plain boolean: besides the
/// two driven levels a wire can be left floating ([`Logic::HiZ`]) or be in a
/// state the simulation cannot determine ([`Logic::Unknown`]). The operator
/// impls on this type implement the multi-valued truth tables, propagating
/// uncertainty instead of guessing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Logic {
    /// A logical zero, written `'0'`.
    #[default]
    Zero,
    /// A logical one, written `'1'`.
    One,
    /// A high-impedance (undriven) signal, written `'Z'`.
    HiZ,
    /// An unknown signal, written `'X'`.
    Unknown,
}

impl Logic {
    /// The character rendering of this value.
    pub const fn to_char(self) -> char {
        match self {
            Self::Zero => '0',
            Self::One => '1',
            Self::HiZ => 'Z',
            Self::Unknown => 'X',
        }
    }

    /// Whether this value is [`Logic::One`].
    ///
    /// Only a driven one is true; zero, high-impedance and unknown are all
    /// false.
    pub const fn is_one(self) -> bool {
        matches!(self, Self::One)
    }

    /// Compare against a single pattern character.
    ///
    /// `'-'` matches any value; every other character must parse to a logic
    /// value equal to `self`. Unparseable characters match nothing.
    pub fn matches(self, pattern: char) -> bool {
        pattern == '-' || Self::try_from(pattern) == Ok(self)
    }

    /// Concatenate two scalars into a 2-bit plain vector, `self` on the
    /// most significant side.
    pub fn concat(self, other: Self) -> Logvec {
        [self, other].into_iter().collect()
    }

    /// Position of this value in the conventional `0 < 1 < X < Z` order.
    ///
    /// The order carries no logic semantics; it exists so clients (vector
    /// comparison among them) have a total order over all four values.
    const fn rank(self) -> u8 {
        match self {
            Self::Zero => 0,
            Self::One => 1,
            Self::Unknown => 2,
            Self::HiZ => 3,
        }
    }

    /// The driven value corresponding to a binary digit.
    pub(crate) const fn from_bit(bit: bool) -> Self {
        if bit { Self::One } else { Self::Zero }
    }
}

impl PartialOrd for Logic {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Logic {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl From<bool> for Logic {
    fn from(value: bool) -> Self {
        Self::from_bit(value)
    }
}

impl TryFrom<char> for Logic {
    type Error = LogicError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            '0' => Ok(Self::Zero),
            '1' => Ok(Self::One),
            'Z' => Ok(Self::HiZ),
            'X' => Ok(Self::Unknown),
            _ => Err(LogicError::BadValue(value.to_string())),
        }
    }
}

macro_rules! logic_try_from_int {
    ($($t:ty),* $(,)?) => {
        $(
            impl TryFrom<$t> for Logic {
                type Error = LogicError;

                fn try_from(value: $t) -> Result<Self, Self::Error> {
                    match value {
                        0 => Ok(Self::Zero),
                        1 => Ok(Self::One),
                        _ => Err(LogicError::BadValue(value.to_string())),
                    }
                }
            }
        )*
    };
}

logic_try_from_int!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

impl From<Logic> for Logvec {
    fn from(value: Logic) -> Self {
        Logvec::raw(Span::sized(1), vec![value])
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

impl Not for Logic {
    type Output = Logic;

    /// `!self`
    ///
    /// ```text
    /// self  result
    ///  0      1
    ///  1      0
    ///  Z      X
    ///  X      X
    /// ```
    fn not(self) -> Logic {
        match self {
            Self::Zero => Self::One,
            Self::One => Self::Zero,
            Self::HiZ | Self::Unknown => Self::Unknown,
        }
    }
}

impl BitAnd for Logic {
    type Output = Logic;

    /// `self & other`
    ///
    /// Zero on either side wins; both sides one yields one; everything else
    /// is unknown.
    fn bitand(self, rhs: Logic) -> Logic {
        match (self, rhs) {
            (Self::Zero, _) | (_, Self::Zero) => Self::Zero,
            (Self::One, Self::One) => Self::One,
            _ => Self::Unknown,
        }
    }
}

impl BitOr for Logic {
    type Output = Logic;

    /// `self | other`
    ///
    /// One on either side wins; both sides zero yields zero; everything else
    /// is unknown.
    fn bitor(self, rhs: Logic) -> Logic {
        match (self, rhs) {
            (Self::One, _) | (_, Self::One) => Self::One,
            (Self::Zero, Self::Zero) => Self::Zero,
            _ => Self::Unknown,
        }
    }
}

impl BitXor for Logic {
    type Output = Logic;

    /// `self ^ other`
    ///
    /// Defined only over driven values; any undriven or unknown operand
    /// yields unknown.
    fn bitxor(self, rhs: Logic) -> Logic {
        match (self, rhs) {
            (Self::Zero, Self::Zero) | (Self::One, Self::One) => Self::Zero,
            (Self::Zero, Self::One) | (Self::One, Self::Zero) => Self::One,
            _ => Self::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_round_trip() {
        for c in ['0', '1', 'Z', 'X'] {
            assert_eq!(Logic::try_from(c).unwrap().to_char(), c);
        }
        assert!(Logic::try_from('-').is_err());
        assert!(Logic::try_from('z').is_err());
    }

    #[test]
    fn truthiness() {
        assert!(Logic::One.is_one());
        assert!(!Logic::Zero.is_one());
        assert!(!Logic::HiZ.is_one());
        assert!(!Logic::Unknown.is_one());
    }

    #[test]
    fn ordering() {
        assert!(Logic::Zero < Logic::One);
        assert!(Logic::One < Logic::Unknown);
        assert!(Logic::Unknown < Logic::HiZ);
    }

    #[test]
    fn wildcard_matches_everything() {
        for value in [Logic::Zero, Logic::One, Logic::HiZ, Logic::Unknown] {
            assert!(value.matches('-'));
            assert!(value.matches(value.to_char()));
        }
        assert!(!Logic::Zero.matches('1'));
        assert!(!Logic::Zero.matches('q'));
    }

    #[test]
    fn scalar_concat() {
        let vec = Logic::One.concat(Logic::Zero);
        assert_eq!(vec.len(), 2);
        assert_eq!(vec.to_string(), "10");
    }
}
