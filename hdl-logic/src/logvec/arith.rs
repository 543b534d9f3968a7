//! Integer views and arithmetic over logic vectors
//!
//! Arithmetic works directly on the four-valued bits: a ripple carry chain
//! propagates uncertainty bit by bit, so an operand containing `Z` or `X`
//! poisons exactly the output bits its carries can reach.

use core::cmp::Ordering;

use crate::{Flavor, Logic, LogicError, Logvec, Signed, Span, Unsigned};

/// Ripple-carry sum of two equally wide vectors.
pub(crate) fn ripple_add<F: Flavor>(a: &Logvec<F>, b: &Logvec<F>, mut carry: Logic) -> Logvec<F> {
    debug_assert_eq!(a.len(), b.len());

    let (abits, bbits) = (a.bits(), b.bits());
    let mut bits = vec![Logic::Zero; a.len()];
    for i in (0..a.len()).rev() {
        let (l, r) = (abits[i], bbits[i]);
        bits[i] = l ^ r ^ carry;
        carry = (carry & l) | (carry & r) | (l & r);
    }

    Logvec::raw(a.span(), bits)
}

/// `a + b` after alignment.
pub(crate) fn add<F: Flavor>(a: &Logvec<F>, b: &Logvec<F>) -> Logvec<F> {
    let (a, b) = Logvec::aligned(a, b);
    ripple_add(&a, &b, Logic::Zero)
}

/// `a - b` after alignment, as `a + !b + 1`.
pub(crate) fn sub<F: Flavor>(a: &Logvec<F>, b: &Logvec<F>) -> Logvec<F> {
    let (a, b) = Logvec::aligned(a, b);
    ripple_add(&a, &!b, Logic::One)
}

/// Widen `v` to `width` bits over a `[width - 1 : 0]` span.
fn pad_to<F: Flavor>(v: &Logvec<F>, width: usize) -> Logvec<F> {
    let fill = F::fill(v.msb().unwrap_or(Logic::Zero));
    let mut bits = vec![fill; width - v.len()];
    bits.extend_from_slice(v.bits());
    Logvec::raw(Span::sized(width), bits)
}

/// Shift-and-add product; the result is as wide as both operands together.
///
/// Any `Z` or `X` bit in the left operand (the multiplier) poisons the
/// whole result to unknown.
pub(crate) fn mul<F: Flavor>(a: &Logvec<F>, b: &Logvec<F>) -> Logvec<F> {
    let span = Span::sized(a.len() + b.len());
    let mut result = Logvec::filled(span, Logic::Zero);
    let mut addend = pad_to(b, span.len());

    for bit in a.iter().rev() {
        match bit {
            Logic::One => result = ripple_add(&result, &addend, Logic::Zero),
            Logic::Zero => {}
            Logic::HiZ | Logic::Unknown => return Logvec::filled(span, Logic::Unknown),
        }
        addend = addend.shift_left(1);
    }

    result
}

/// Restoring long division after alignment.
///
/// Quotient and remainder are as wide as the aligned dividend. An all-zero
/// divisor fails with [`LogicError::DivisionByZero`].
pub(crate) fn divmod(
    a: &Logvec<Unsigned>,
    b: &Logvec<Unsigned>,
) -> Result<(Logvec<Unsigned>, Logvec<Unsigned>), LogicError> {
    if b.iter().all(|bit| bit == Logic::Zero) {
        return Err(LogicError::DivisionByZero);
    }

    let (num, den) = Logvec::aligned(a, b);
    let width = num.len();
    let zeros = Logvec::<Unsigned>::filled(Span::sized(width), Logic::Zero);

    // Work in a double-width register pair: the running remainder starts as
    // the dividend, the divisor starts shifted all the way up.
    let mut rem = zeros.concat(&num);
    let mut den = den.concat(&zeros);
    let mut quot = vec![Logic::Zero; width];

    for i in (0..width).rev() {
        den = den.shift_right(1);
        if bit_cmp(rem.bits(), den.bits()) != Ordering::Less {
            rem = ripple_add(&rem, &!&den, Logic::One);
            quot[width - 1 - i] = Logic::One;
        }
    }

    let quot = Logvec::raw(num.span(), quot);
    let rem = Logvec::raw(num.span(), rem.bits()[width..].to_vec());
    Ok((quot, rem))
}

/// MSB-first lexicographic comparison over the `0 < 1 < X < Z` bit order.
pub(crate) fn bit_cmp(a: &[Logic], b: &[Logic]) -> Ordering {
    debug_assert_eq!(a.len(), b.len());

    a.cmp(b)
}

impl Logvec<Unsigned> {
    /// Quotient and remainder of unsigned division.
    ///
    /// Fails with [`LogicError::DivisionByZero`] when every divisor bit is
    /// zero. Both results are as wide as the aligned dividend.
    pub fn divmod(&self, rhs: &Self) -> Result<(Self, Self), LogicError> {
        divmod(self, rhs)
    }

    /// The unsigned integer value of this vector.
    ///
    /// Fails with [`LogicError::UnknownBits`] when any bit is `Z` or `X`,
    /// and with [`LogicError::LengthMismatch`] when the value needs more
    /// than 128 bits.
    pub fn to_u128(&self) -> Result<u128, LogicError> {
        let first = self
            .bits()
            .iter()
            .position(|bit| *bit != Logic::Zero)
            .unwrap_or(self.len());
        let bits = &self.bits()[first..];

        if bits.len() > 128 {
            return Err(LogicError::LengthMismatch {
                expected: 128,
                actual: bits.len(),
            });
        }

        let mut value: u128 = 0;
        for bit in bits {
            value <<= 1;
            match bit {
                Logic::Zero => {}
                Logic::One => value |= 1,
                Logic::HiZ | Logic::Unknown => return Err(LogicError::UnknownBits),
            }
        }

        Ok(value)
    }
}

impl Logvec<Signed> {
    /// Quotient and remainder of signed division.
    ///
    /// Magnitudes divide unsigned; the quotient is negative exactly when
    /// the operand signs differ and the remainder takes the dividend's
    /// sign.
    pub fn divmod(&self, rhs: &Self) -> Result<(Self, Self), LogicError> {
        let negate = (self.sign() ^ rhs.sign()).is_one();
        let (quot, rem) = divmod(&self.abs().unsigned(), &rhs.abs().unsigned())?;
        let (mut quot, mut rem) = (quot.signed(), rem.signed());

        if negate {
            quot = -quot;
        }
        if self.sign().is_one() {
            rem = -rem;
        }

        Ok((quot, rem))
    }

    /// The absolute value, in the same width.
    pub fn abs(&self) -> Self {
        if self.sign().is_one() {
            -self.clone()
        } else {
            self.clone()
        }
    }

    /// The two's-complement integer value of this vector.
    ///
    /// Fails with [`LogicError::UnknownBits`] when any bit is `Z` or `X`,
    /// and with [`LogicError::LengthMismatch`] when the value needs more
    /// than 128 bits.
    pub fn to_i128(&self) -> Result<i128, LogicError> {
        if self.is_empty() {
            return Ok(0);
        }

        // Canonical form: redundant copies of the sign bit carry no value.
        let mut bits = self.bits();
        while bits.len() > 1 && bits[0] == bits[1] {
            bits = &bits[1..];
        }

        if bits.len() > 128 {
            return Err(LogicError::LengthMismatch {
                expected: 128,
                actual: bits.len(),
            });
        }

        let mut value: u128 = 0;
        for bit in bits {
            value <<= 1;
            match bit {
                Logic::Zero => {}
                Logic::One => value |= 1,
                Logic::HiZ | Logic::Unknown => return Err(LogicError::UnknownBits),
            }
        }

        if bits[0] == Logic::One {
            let extended = if bits.len() == 128 {
                value
            } else {
                value | (u128::MAX << bits.len())
            };
            Ok(extended as i128)
        } else {
            Ok(value as i128)
        }
    }

    /// The sign bit, zero for the empty vector.
    pub(crate) fn sign(&self) -> Logic {
        self.msb().unwrap_or(Logic::Zero)
    }
}
