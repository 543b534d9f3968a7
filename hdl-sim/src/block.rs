//! Block descriptors and block bodies

use dyn_clone::DynClone;
use hdl_logic::{LogicError, Timestamp};

use crate::sim::Frame;
use crate::wait::Wait;
use crate::SimError;

/// Outcome of resuming a block body one step.
#[derive(Debug, Clone)]
pub enum Step {
    /// The body suspended; resume it when the wait is ready.
    Wait(Wait),
    /// The body finished its pass.
    Done,
}

/// A block body driven by the simulator.
///
/// Bodies are resumable state machines: each resumption either runs the
/// body to the end of a pass ([`Step::Done`]) or suspends on a [`Wait`].
/// Any closure `FnMut(&mut Frame) -> Result<Step, SimError>` is a body;
/// closures that carry state across suspensions keep it in their captures.
///
/// The declaration holds a prototype which is cloned once per part
/// instance, so captured state is per task.
pub trait BlockBody: DynClone {
    /// Run the body until it suspends or completes a pass.
    fn resume(&mut self, frame: &mut Frame<'_>) -> Result<Step, SimError>;
}

dyn_clone::clone_trait_object!(BlockBody);

impl<T> BlockBody for T
where
    T: FnMut(&mut Frame<'_>) -> Result<Step, SimError> + Clone + 'static,
{
    fn resume(&mut self, frame: &mut Frame<'_>) -> Result<Step, SimError> {
        self(frame)
    }
}

/// The trigger condition of a `when` block.
///
/// Signal name lists and the delay compose as a logical OR: the block runs
/// when any named signal changes (or rises, or falls), or when the delay
/// has elapsed since the block last ran.
///
/// Names are validated when the part is built; anything that is not an
/// identifier fails with [`SimError::BadCondition`].
#[derive(Debug, Clone, Default)]
pub struct Condition {
    pub(crate) change: Vec<String>,
    pub(crate) rising: Vec<String>,
    pub(crate) falling: Vec<String>,
    pub(crate) delay: Option<Timestamp>,
    delay_err: Option<LogicError>,
}

impl Condition {
    /// An empty condition; a block guarded by it never triggers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Trigger when any of the named signals changes value.
    pub fn change<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.change.extend(names.into_iter().map(Into::into));
        self
    }

    /// Trigger when any of the named signals is written to one.
    pub fn rising<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rising.extend(names.into_iter().map(Into::into));
        self
    }

    /// Trigger when any of the named signals is written to zero.
    pub fn falling<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.falling.extend(names.into_iter().map(Into::into));
        self
    }

    /// Trigger once the delay has elapsed since the block's last run.
    ///
    /// Accepts a [`Timestamp`], a picosecond count or a literal such as
    /// `"200 ns"`. Parse failures surface when the part is built.
    pub fn delay<T: IntoDelay>(mut self, delay: T) -> Self {
        match delay.into_delay() {
            Ok(delay) => self.delay = Some(delay),
            Err(err) => self.delay_err = Some(err),
        }
        self
    }

    pub(crate) fn validate(&self) -> Result<(), SimError> {
        let lists = [
            ("change", &self.change),
            ("rising", &self.rising),
            ("falling", &self.falling),
        ];
        for (condition, names) in lists {
            for name in names {
                if !is_identifier(name) {
                    return Err(SimError::BadCondition {
                        condition,
                        name: name.clone(),
                    });
                }
            }
        }

        if let Some(err) = &self.delay_err {
            return Err(err.clone().into());
        }

        Ok(())
    }
}

/// The delay coercion: a timestamp as-is, a picosecond count, or a
/// timestamp literal.
pub trait IntoDelay {
    /// Convert into a timestamp.
    fn into_delay(self) -> Result<Timestamp, LogicError>;
}

impl IntoDelay for Timestamp {
    fn into_delay(self) -> Result<Timestamp, LogicError> {
        Ok(self)
    }
}

impl IntoDelay for u64 {
    fn into_delay(self) -> Result<Timestamp, LogicError> {
        Ok(Timestamp::from_ps(self))
    }
}

impl IntoDelay for &str {
    fn into_delay(self) -> Result<Timestamp, LogicError> {
        self.parse()
    }
}

/// How a block is (re)armed.
pub(crate) enum Trigger {
    /// A single pass at simulation start.
    Once,
    /// A pass at start, re-armed on any signal the previous pass read.
    Always,
    /// Armed by the user-declared condition.
    When(Condition),
}

/// One block of a part type: trigger, diagnostic name, body prototype.
pub(crate) struct BlockDecl {
    pub name: String,
    pub trigger: Trigger,
    pub body: Box<dyn BlockBody>,
}

/// ASCII identifier: a letter or underscore, then letters, digits or
/// underscores.
pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();

    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("foo")]
    #[case("_bar")]
    #[case("_123")]
    fn identifiers(#[case] name: &str) {
        assert!(is_identifier(name));
    }

    #[rstest]
    #[case("")]
    #[case("123")]
    #[case("()")]
    #[case("a b")]
    fn non_identifiers(#[case] name: &str) {
        assert!(!is_identifier(name));
    }

    #[test]
    fn condition_validation() {
        assert!(Condition::new().validate().is_ok());
        assert!(Condition::new().rising(["foo", "bar"]).validate().is_ok());
        assert!(Condition::new().delay("123us").validate().is_ok());

        let err = Condition::new().change(["123"]).validate().unwrap_err();
        assert!(matches!(err, SimError::BadCondition { condition: "change", .. }));

        assert!(Condition::new().delay("123").validate().is_err());
        assert!(Condition::new().delay("()").validate().is_err());
    }
}
