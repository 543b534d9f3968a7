//! Per-block cooperative tasks

use std::collections::BTreeSet;

use crate::block::BlockBody;
use crate::part::{InstanceId, SignalRef};
use crate::sim::{Seq, StepTrace};
use crate::wait::Wait;

/// The cooperative task driving one block of one part instance.
///
/// A task owns its clone of the block body, the wait it is currently
/// suspended on (`None` once terminated) and the sequence at which it last
/// resumed. `last_run` is `None` until the first resumption, which sorts
/// before every stamp in the change log so writes made in the very first
/// round are still detected.
pub(crate) struct Task {
    pub instance: InstanceId,
    /// `part.block`, for diagnostics.
    pub name: String,
    pub body: Box<dyn BlockBody>,
    pub wait: Option<Wait>,
    pub last_run: Option<Seq>,
    pub kind: TaskKind,
}

pub(crate) enum TaskKind {
    /// One pass, then terminal.
    Once,
    /// Re-armed after each pass on the signals the pass read, minus the
    /// ones it wrote itself, so a block does not trigger on its own
    /// outputs.
    Always {
        observed: BTreeSet<SignalRef>,
        written: BTreeSet<SignalRef>,
        pass_done: bool,
    },
    /// Re-armed after each pass on the user-declared condition.
    When { condition: Wait },
}

impl Task {
    pub fn new(instance: InstanceId, name: String, body: Box<dyn BlockBody>, kind: TaskKind) -> Self {
        let wait = match &kind {
            TaskKind::Once | TaskKind::Always { .. } => Wait::Nowait,
            TaskKind::When { condition } => condition.clone(),
        };

        Self {
            instance,
            name,
            body,
            wait: Some(wait),
            last_run: None,
            kind,
        }
    }

    /// Reset per-pass bookkeeping when a new pass is about to begin.
    pub fn begin_pass(&mut self) {
        if let TaskKind::Always {
            observed,
            written,
            pass_done,
        } = &mut self.kind
        {
            if *pass_done {
                observed.clear();
                written.clear();
                *pass_done = false;
            }
        }
    }

    /// Fold one step's reads and writes into the task state.
    pub fn absorb(&mut self, trace: &StepTrace) {
        if let TaskKind::Always {
            observed, written, ..
        } = &mut self.kind
        {
            observed.extend(trace.reads.iter().copied());
            written.extend(trace.writes.iter().copied());
        }
    }

    /// The pass completed; arm the next wait (or terminate).
    pub fn complete(&mut self) {
        self.wait = match &mut self.kind {
            TaskKind::Once => None,
            TaskKind::Always {
                observed,
                written,
                pass_done,
            } => {
                *pass_done = true;
                let signals: Vec<SignalRef> = observed.difference(written).copied().collect();
                Some(Wait::Change(signals))
            }
            TaskKind::When { condition } => Some(condition.clone()),
        };
    }

    /// The earliest absolute time this task could become ready, if any.
    pub fn until(&self) -> Option<hdl_logic::Timestamp> {
        let last = self
            .last_run
            .map_or(hdl_logic::Timestamp::ZERO, |seq| seq.time);
        self.wait.as_ref().and_then(|wait| wait.until(last))
    }
}
