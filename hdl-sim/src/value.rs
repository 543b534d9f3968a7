//! Signal values and declared signal kinds

use core::fmt;

use hdl_logic::{Logic, LogicError, Logvec, Plain, Signed, Span, Unsigned};

use crate::part::{InstanceId, PartTypeId};
use crate::SimError;

/// A value held by (or assignable to) a signal.
///
/// Stored slot values are always normalized to the signal's declared kind;
/// the [`Value::Int`] and [`Value::Str`] variants exist only as assignment
/// sources and are coerced away before storage, the way the part model
/// coerces every attribute write.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A logic scalar.
    Logic(Logic),
    /// A plain (bitwise only) vector.
    Plain(Logvec<Plain>),
    /// An unsigned vector.
    Unsigned(Logvec<Unsigned>),
    /// A signed vector.
    Signed(Logvec<Signed>),
    /// A child part instance.
    Part(InstanceId),
    /// An integer assignment source.
    Int(i128),
    /// A string assignment source, in logic characters.
    Str(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Logic(value) => write!(f, "{value}"),
            Self::Plain(value) => write!(f, "{value}"),
            Self::Unsigned(value) => write!(f, "{value}"),
            Self::Signed(value) => write!(f, "{value}"),
            Self::Part(id) => write!(f, "<part #{}>", id.index()),
            Self::Int(value) => write!(f, "{value}"),
            Self::Str(value) => write!(f, "{value}"),
        }
    }
}

impl From<Logic> for Value {
    fn from(value: Logic) -> Self {
        Self::Logic(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Logic(value.into())
    }
}

impl From<Logvec<Plain>> for Value {
    fn from(value: Logvec<Plain>) -> Self {
        Self::Plain(value)
    }
}

impl From<Logvec<Unsigned>> for Value {
    fn from(value: Logvec<Unsigned>) -> Self {
        Self::Unsigned(value)
    }
}

impl From<Logvec<Signed>> for Value {
    fn from(value: Logvec<Signed>) -> Self {
        Self::Signed(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

macro_rules! value_from_int {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Self::Int(value as i128)
                }
            }
        )*
    };
}

value_from_int!(u8, u16, u32, u64, usize, i8, i16, i32, i64, i128, isize);

/// The declared type of a signal slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    /// A logic scalar, defaulting to zero.
    Logic,
    /// A plain vector over the given span, defaulting to all-unknown.
    Plain(Span),
    /// An unsigned vector over the given span, defaulting to all-unknown.
    Unsigned(Span),
    /// A signed vector over the given span, defaulting to all-unknown.
    Signed(Span),
    /// A child part of the given type.
    Part(PartTypeId),
}

impl SignalKind {
    /// The kind a concrete (non-source) value belongs to, if any.
    pub(crate) fn of(value: &Value) -> Option<SignalKind> {
        match value {
            Value::Logic(_) => Some(Self::Logic),
            Value::Plain(vec) => Some(Self::Plain(vec.span())),
            Value::Unsigned(vec) => Some(Self::Unsigned(vec.span())),
            Value::Signed(vec) => Some(Self::Signed(vec.span())),
            Value::Part(_) | Value::Int(_) | Value::Str(_) => None,
        }
    }

    /// Coerce an assignment source into this kind.
    ///
    /// Scalars accept scalars, 0/1 integers and single logic characters;
    /// vector kinds accept vectors of any flavor (reinterpreted bit for
    /// bit), scalars, integers and logic strings, widened to the declared
    /// span. Anything else is a [`LogicError::TypeMismatch`].
    pub(crate) fn coerce(&self, value: Value) -> Result<Value, SimError> {
        let coerced = match (self, value) {
            (Self::Logic, Value::Logic(v)) => Value::Logic(v),
            (Self::Logic, Value::Int(v)) => Value::Logic(Logic::try_from(v)?),
            (Self::Logic, Value::Str(v)) => {
                let mut chars = v.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Value::Logic(Logic::try_from(c)?),
                    _ => return Err(LogicError::BadValue(v).into()),
                }
            }
            (Self::Plain(span), value) => Value::Plain(vector(*span, value)?),
            (Self::Unsigned(span), value) => Value::Unsigned(vector::<Unsigned>(*span, value)?),
            (Self::Signed(span), value) => Value::Signed(vector::<Signed>(*span, value)?),
            (Self::Part(_), value @ Value::Part(_)) => value,
            _ => return Err(LogicError::TypeMismatch.into()),
        };

        Ok(coerced)
    }

    /// The default construction of this kind: zero for scalars,
    /// all-unknown for vectors.
    ///
    /// Part kinds have no standalone default; instantiation creates the
    /// child instance instead.
    pub(crate) fn default_value(&self) -> Value {
        match self {
            Self::Logic => Value::Logic(Logic::Zero),
            Self::Plain(span) => Value::Plain(Logvec::new(*span)),
            Self::Unsigned(span) => Value::Unsigned(Logvec::new(*span)),
            Self::Signed(span) => Value::Signed(Logvec::new(*span)),
            Self::Part(_) => Value::Part(InstanceId::PLACEHOLDER),
        }
    }
}

/// Coerce any assignment source into a vector of flavor `F` over `span`.
fn vector<F: hdl_logic::Flavor>(span: Span, value: Value) -> Result<Logvec<F>, SimError> {
    let vec = match value {
        Value::Logic(v) => Logvec::from_bits(span, [v])?,
        Value::Plain(v) => rebuild(span, &v)?,
        Value::Unsigned(v) => rebuild(span, &v)?,
        Value::Signed(v) => rebuild(span, &v)?,
        Value::Int(v) => Logvec::from_int(span, v)?,
        Value::Str(v) => Logvec::parse(span, &v)?,
        Value::Part(_) => return Err(LogicError::TypeMismatch.into()),
    };

    Ok(vec)
}

/// Reinterpret the bits of a vector of any flavor over a new span and
/// flavor.
fn rebuild<F: hdl_logic::Flavor, G: hdl_logic::Flavor>(
    span: Span,
    value: &Logvec<G>,
) -> Result<Logvec<F>, LogicError> {
    Logvec::from_bits(span, value.iter())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn byte() -> Span {
        Span::new(7, 0).unwrap()
    }

    #[test]
    fn scalar_coercions() {
        let kind = SignalKind::Logic;
        assert_eq!(kind.coerce(1i32.into()).unwrap(), Value::Logic(Logic::One));
        assert_eq!(kind.coerce("Z".into()).unwrap(), Value::Logic(Logic::HiZ));
        assert_eq!(kind.coerce(true.into()).unwrap(), Value::Logic(Logic::One));
        assert!(kind.coerce(2i32.into()).is_err());
        assert!(kind.coerce("01".into()).is_err());
    }

    #[test]
    fn vector_coercions_widen() {
        let kind = SignalKind::Unsigned(byte());
        let coerced = kind.coerce(42i32.into()).unwrap();
        assert_eq!(
            coerced,
            Value::Unsigned(Logvec::from_int(byte(), 42).unwrap())
        );

        let coerced = kind.coerce("1010".into()).unwrap();
        assert_eq!(
            coerced,
            Value::Unsigned(Logvec::from_int(byte(), 10).unwrap())
        );

        assert!(kind.coerce("101010101".into()).is_err());
    }

    #[test]
    fn flavors_reinterpret_bit_for_bit() {
        let kind = SignalKind::Signed(byte());
        let source: Logvec<Unsigned> = "11110011".parse().unwrap();
        let coerced = kind.coerce(source.into()).unwrap();
        match coerced {
            Value::Signed(vec) => assert_eq!(vec.to_i128().unwrap(), -13),
            other => panic!("wrong kind: {other}"),
        }
    }

    #[test]
    fn defaults() {
        assert_eq!(SignalKind::Logic.default_value(), Value::Logic(Logic::Zero));
        match SignalKind::Plain(byte()).default_value() {
            Value::Plain(vec) => assert_eq!(vec.to_string(), "XXXXXXXX"),
            other => panic!("wrong kind: {other}"),
        }
    }
}
