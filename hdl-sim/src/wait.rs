//! Composable readiness predicates for suspended tasks

use hdl_logic::Timestamp;

use crate::part::SignalRef;

/// When a suspended task becomes eligible to resume.
///
/// Waits are immutable values; composites build with [`Wait::any`] and
/// [`Wait::all`]. Whether a wait is *ready* is judged by the simulator
/// against its change log and clock; a wait only knows how to report the
/// earliest time it could possibly become ready.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Wait {
    /// Always ready.
    Nowait,
    /// Ready when any child is ready. Never ready when empty.
    Any(Vec<Wait>),
    /// Ready when all children are ready.
    All(Vec<Wait>),
    /// Ready when any of the signals was written since the task last ran.
    Change(Vec<SignalRef>),
    /// Ready when any of the signals was written to one since the task
    /// last ran and still holds it.
    Rising(Vec<SignalRef>),
    /// Ready when any of the signals was written to zero since the task
    /// last ran and still holds it.
    Falling(Vec<SignalRef>),
    /// Ready once the delay has elapsed since the task last ran.
    Delay(Timestamp),
}

impl Wait {
    /// Ready when any of `waits` is; a single wait collapses to itself.
    pub fn any(waits: impl IntoIterator<Item = Wait>) -> Wait {
        let mut waits: Vec<Wait> = waits.into_iter().collect();
        if waits.len() == 1 {
            waits.remove(0)
        } else {
            Wait::Any(waits)
        }
    }

    /// Ready when all of `waits` are; a single wait collapses to itself.
    pub fn all(waits: impl IntoIterator<Item = Wait>) -> Wait {
        let mut waits: Vec<Wait> = waits.into_iter().collect();
        if waits.len() == 1 {
            waits.remove(0)
        } else {
            Wait::All(waits)
        }
    }

    /// Ready when any of the signals changes.
    pub fn change(signals: impl IntoIterator<Item = SignalRef>) -> Wait {
        Wait::Change(signals.into_iter().collect())
    }

    /// Ready when any of the signals rises to one.
    pub fn rising(signals: impl IntoIterator<Item = SignalRef>) -> Wait {
        Wait::Rising(signals.into_iter().collect())
    }

    /// Ready when any of the signals falls to zero.
    pub fn falling(signals: impl IntoIterator<Item = SignalRef>) -> Wait {
        Wait::Falling(signals.into_iter().collect())
    }

    /// Ready once `delay` has elapsed since the task last ran.
    pub fn delay(delay: impl Into<Timestamp>) -> Wait {
        Wait::Delay(delay.into())
    }

    /// The earliest absolute time this wait could possibly become ready,
    /// given the owning task last ran at `last`.
    ///
    /// Only delays can promise a time; composites answer the minimum over
    /// their children, and signal waits answer nothing.
    pub(crate) fn until(&self, last: Timestamp) -> Option<Timestamp> {
        match self {
            Wait::Delay(delay) => Some(last + *delay),
            Wait::Any(inner) | Wait::All(inner) => {
                inner.iter().filter_map(|wait| wait.until(last)).min()
            }
            Wait::Nowait | Wait::Change(_) | Wait::Rising(_) | Wait::Falling(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_child_collapses() {
        let delay = Wait::delay(Timestamp::from_ps(5));
        assert_eq!(Wait::any([delay.clone()]), delay);
        assert_eq!(Wait::all([delay.clone()]), delay);
        assert_eq!(Wait::any([]), Wait::Any(Vec::new()));
    }

    #[test]
    fn until_aggregates_by_minimum() {
        let wait = Wait::any([
            Wait::delay(Timestamp::from_ps(500)),
            Wait::Change(Vec::new()),
            Wait::delay(Timestamp::from_ps(200)),
        ]);
        let last = Timestamp::from_ps(1_000);
        assert_eq!(wait.until(last), Some(Timestamp::from_ps(1_200)));

        assert_eq!(Wait::Nowait.until(last), None);
        assert_eq!(Wait::Change(Vec::new()).until(last), None);
    }
}
