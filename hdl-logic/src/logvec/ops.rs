//! Operator impls for logic vectors
//!
//! Binary operators align their operands first: the shorter side widens
//! with its flavor's fill. Plain vectors promote to the flavored side for
//! bitwise operators; unsigned and signed never mix, so those operator
//! combinations simply do not exist.

use core::cmp::Ordering;
use core::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Neg, Not, Rem, Shl, Shr, Sub};

use super::arith;
use crate::{Flavor, Logic, Logvec, Plain, Signed, Unsigned};

/// Bit-for-bit combination after alignment.
fn apply<F: Flavor>(a: &Logvec<F>, b: &Logvec<F>, op: fn(Logic, Logic) -> Logic) -> Logvec<F> {
    let (a, b) = Logvec::aligned(a, b);
    let bits = a.iter().zip(b.iter()).map(|(l, r)| op(l, r)).collect();
    Logvec::raw(a.span(), bits)
}

impl<F: Flavor> PartialEq for Logvec<F> {
    /// Equality over the aligned bits; the spans' index positions do not
    /// take part.
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = Logvec::aligned(self, other);
        a.bits() == b.bits()
    }
}

impl<F: Flavor> PartialEq<&str> for Logvec<F> {
    /// Equality against a logic-character string. Strings that do not
    /// parse (wildcards included; see [`Logvec::matches`]) are unequal.
    fn eq(&self, other: &&str) -> bool {
        other.parse::<Self>().map_or(false, |parsed| *self == parsed)
    }
}

impl<F: Flavor> PartialEq<Logvec<F>> for &str {
    fn eq(&self, other: &Logvec<F>) -> bool {
        other == self
    }
}

macro_rules! logvec_eq_promoting {
    ($($flavored:ty, $view:ident);* $(;)?) => {
        $(
            impl PartialEq<Logvec<Plain>> for Logvec<$flavored> {
                fn eq(&self, other: &Logvec<Plain>) -> bool {
                    *self == other.clone().$view()
                }
            }

            impl PartialEq<Logvec<$flavored>> for Logvec<Plain> {
                fn eq(&self, other: &Logvec<$flavored>) -> bool {
                    self.clone().$view() == *other
                }
            }
        )*
    };
}

logvec_eq_promoting!(Unsigned, unsigned; Signed, signed);

impl PartialOrd for Logvec<Unsigned> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Logvec<Unsigned> {
    /// MSB-first lexicographic order over the aligned bits.
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b) = Logvec::aligned(self, other);
        arith::bit_cmp(a.bits(), b.bits())
    }
}

impl PartialOrd for Logvec<Signed> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Logvec<Signed> {
    /// Two's-complement order: a negative sign loses outright; otherwise
    /// MSB-first lexicographic, reversed when both operands are negative.
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b) = Logvec::aligned(self, other);

        match (a.sign().is_one(), b.sign().is_one()) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (true, true) => arith::bit_cmp(a.bits(), b.bits()).reverse(),
            (false, false) => arith::bit_cmp(a.bits(), b.bits()),
        }
    }
}

impl<F: Flavor> Not for Logvec<F> {
    type Output = Logvec<F>;

    fn not(self) -> Logvec<F> {
        let span = self.span();
        Logvec::raw(span, self.iter().map(Not::not).collect())
    }
}

impl<F: Flavor> Not for &Logvec<F> {
    type Output = Logvec<F>;

    fn not(self) -> Logvec<F> {
        Logvec::raw(self.span(), self.iter().map(Not::not).collect())
    }
}

macro_rules! logvec_bitwise {
    ($($trait:ident, $method:ident, $op:path);* $(;)?) => {
        $(
            impl<F: Flavor> $trait for Logvec<F> {
                type Output = Logvec<F>;

                fn $method(self, rhs: Logvec<F>) -> Logvec<F> {
                    apply(&self, &rhs, $op)
                }
            }

            impl $trait<Logvec<Plain>> for Logvec<Unsigned> {
                type Output = Logvec<Unsigned>;

                fn $method(self, rhs: Logvec<Plain>) -> Logvec<Unsigned> {
                    apply(&self, &rhs.unsigned(), $op)
                }
            }

            impl $trait<Logvec<Unsigned>> for Logvec<Plain> {
                type Output = Logvec<Unsigned>;

                fn $method(self, rhs: Logvec<Unsigned>) -> Logvec<Unsigned> {
                    apply(&self.unsigned(), &rhs, $op)
                }
            }

            impl $trait<Logvec<Plain>> for Logvec<Signed> {
                type Output = Logvec<Signed>;

                fn $method(self, rhs: Logvec<Plain>) -> Logvec<Signed> {
                    apply(&self, &rhs.signed(), $op)
                }
            }

            impl $trait<Logvec<Signed>> for Logvec<Plain> {
                type Output = Logvec<Signed>;

                fn $method(self, rhs: Logvec<Signed>) -> Logvec<Signed> {
                    apply(&self.signed(), &rhs, $op)
                }
            }
        )*
    };
}

logvec_bitwise! {
    BitAnd, bitand, Logic::bitand;
    BitOr, bitor, Logic::bitor;
    BitXor, bitxor, Logic::bitxor;
}

macro_rules! logvec_arith {
    ($($flavor:ty),* $(,)?) => {
        $(
            impl Add for Logvec<$flavor> {
                type Output = Logvec<$flavor>;

                fn add(self, rhs: Logvec<$flavor>) -> Logvec<$flavor> {
                    arith::add(&self, &rhs)
                }
            }

            impl Sub for Logvec<$flavor> {
                type Output = Logvec<$flavor>;

                fn sub(self, rhs: Logvec<$flavor>) -> Logvec<$flavor> {
                    arith::sub(&self, &rhs)
                }
            }

            impl Div for Logvec<$flavor> {
                type Output = Logvec<$flavor>;

                /// # Panics
                ///
                /// Panics on an all-zero divisor; use
                /// [`divmod`](Logvec::divmod) to handle that case.
                fn div(self, rhs: Logvec<$flavor>) -> Logvec<$flavor> {
                    match self.divmod(&rhs) {
                        Ok((quot, _)) => quot,
                        Err(err) => panic!("{err}"),
                    }
                }
            }

            impl Rem for Logvec<$flavor> {
                type Output = Logvec<$flavor>;

                /// # Panics
                ///
                /// Panics on an all-zero divisor; use
                /// [`divmod`](Logvec::divmod) to handle that case.
                fn rem(self, rhs: Logvec<$flavor>) -> Logvec<$flavor> {
                    match self.divmod(&rhs) {
                        Ok((_, rem)) => rem,
                        Err(err) => panic!("{err}"),
                    }
                }
            }
        )*
    };
}

logvec_arith!(Unsigned, Signed);

impl Mul for Logvec<Unsigned> {
    type Output = Logvec<Unsigned>;

    fn mul(self, rhs: Logvec<Unsigned>) -> Logvec<Unsigned> {
        arith::mul(&self, &rhs)
    }
}

impl Mul for Logvec<Signed> {
    type Output = Logvec<Signed>;

    /// Signed product via unsigned magnitudes, negated when the operand
    /// signs differ. The result is as wide as both operands together.
    fn mul(self, rhs: Logvec<Signed>) -> Logvec<Signed> {
        let negate = (self.sign() ^ rhs.sign()).is_one();
        let product = arith::mul(&self.abs().unsigned(), &rhs.abs().unsigned()).signed();

        if negate {
            -product
        } else {
            product
        }
    }
}

impl Neg for Logvec<Signed> {
    type Output = Logvec<Signed>;

    /// Two's-complement negation, `!self + 1`, in the same width.
    fn neg(self) -> Logvec<Signed> {
        let zero = Logvec::filled(self.span(), Logic::Zero);
        arith::ripple_add(&!self, &zero, Logic::One)
    }
}

impl<F: Flavor> Shl<usize> for Logvec<F> {
    type Output = Logvec<F>;

    fn shl(self, amount: usize) -> Logvec<F> {
        self.shift_left(amount)
    }
}

impl<F: Flavor> Shr<usize> for Logvec<F> {
    type Output = Logvec<F>;

    fn shr(self, amount: usize) -> Logvec<F> {
        self.shift_right(amount)
    }
}
