//! Textual renderings of logic vectors

use core::fmt;

use itertools::Itertools;

use crate::{Flavor, Logic, Logvec};

impl<F: Flavor> fmt::Display for Logvec<F> {
    /// The binary rendering: one logic character per bit, MSB first. The
    /// empty vector renders as the empty string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.iter().map(Logic::to_char).join(""))
    }
}

impl<F: Flavor> fmt::Debug for Logvec<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<logvec[{}]{} '{self}'>", self.span(), F::SUFFIX)
    }
}

/// Render in base `2^group`, one digit per `group` bits counted from the
/// LSB. A group containing any `Z` or `X` renders as the `unknown` digit.
fn grouped<F: Flavor>(
    vec: &Logvec<F>,
    f: &mut fmt::Formatter<'_>,
    group: usize,
    uppercase: bool,
) -> fmt::Result {
    if vec.is_empty() {
        return write!(f, "0");
    }

    let unknown = if uppercase { 'X' } else { 'x' };
    let pad = (group - vec.len() % group) % group;
    let padded = core::iter::repeat(Logic::Zero).take(pad).chain(vec.iter());

    for chunk in &padded.chunks(group) {
        let mut digit = Some(0u32);
        for bit in chunk {
            digit = match (digit, bit) {
                (Some(digit), Logic::Zero) => Some(digit << 1),
                (Some(digit), Logic::One) => Some(digit << 1 | 1),
                _ => None,
            };
        }

        match digit {
            Some(digit) => {
                let c = char::from_digit(digit, 16).expect("group digits stay below 16");
                write!(f, "{}", if uppercase { c.to_ascii_uppercase() } else { c })?;
            }
            None => write!(f, "{unknown}")?,
        }
    }

    Ok(())
}

impl<F: Flavor> fmt::Octal for Logvec<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        grouped(self, f, 3, false)
    }
}

impl<F: Flavor> fmt::LowerHex for Logvec<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        grouped(self, f, 4, false)
    }
}

impl<F: Flavor> fmt::UpperHex for Logvec<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        grouped(self, f, 4, true)
    }
}
