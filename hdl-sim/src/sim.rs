//! The event-driven scheduler

use std::collections::{BTreeSet, HashMap};

use hdl_logic::{Logic, LogicError, Logvec, Plain, Signed, Timestamp, Unsigned};

use crate::block::{Condition, Step, Trigger};
use crate::part::{Design, InstanceId, SignalRef};
use crate::task::{Task, TaskKind};
use crate::value::Value;
use crate::wait::Wait;
use crate::SimError;

/// The simulator clock: virtual time plus a micro-tick within it.
///
/// Time advances in picoseconds between rounds; the tick advances by one
/// per task step within a round. The tick exists only so change detection
/// can tell "since this round started" from "since earlier in this round";
/// it never reorders tasks.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct Seq {
    pub time: Timestamp,
    pub tick: u64,
}

/// The reads and writes observed during a single task step.
#[derive(Debug, Default)]
pub(crate) struct StepTrace {
    pub reads: Vec<SignalRef>,
    pub writes: Vec<SignalRef>,
}

/// A block body's window onto its part instance during one step.
///
/// Every read and write goes through the frame, which is how the simulator
/// observes them: reads are recorded for the current task, writes are
/// type-coerced against the signal's declared kind and, when the value
/// actually differs, stamped into the change log before being stored. The
/// observation scope is the frame borrow itself, so it cannot outlive the
/// step.
pub struct Frame<'a> {
    design: &'a mut Design,
    changes: &'a mut HashMap<SignalRef, Seq>,
    trace: &'a mut StepTrace,
    now: Seq,
    instance: InstanceId,
}

impl Frame<'_> {
    /// The part instance this frame is based on.
    pub fn instance(&self) -> InstanceId {
        self.instance
    }

    /// The current virtual time.
    pub fn now(&self) -> Timestamp {
        self.now.time
    }

    /// Read a signal, recording the read for the current task.
    pub fn get(&mut self, name: &str) -> Result<Value, SimError> {
        let sig = self.design.signal_ref(self.instance, name)?;
        self.trace.reads.push(sig);
        Ok(self.design.slot(sig).clone())
    }

    /// Read a scalar signal.
    pub fn logic(&mut self, name: &str) -> Result<Logic, SimError> {
        match self.get(name)? {
            Value::Logic(value) => Ok(value),
            _ => Err(LogicError::TypeMismatch.into()),
        }
    }

    /// Read a plain vector signal.
    pub fn plain(&mut self, name: &str) -> Result<Logvec<Plain>, SimError> {
        match self.get(name)? {
            Value::Plain(value) => Ok(value),
            _ => Err(LogicError::TypeMismatch.into()),
        }
    }

    /// Read an unsigned vector signal.
    pub fn unsigned(&mut self, name: &str) -> Result<Logvec<Unsigned>, SimError> {
        match self.get(name)? {
            Value::Unsigned(value) => Ok(value),
            _ => Err(LogicError::TypeMismatch.into()),
        }
    }

    /// Read a signed vector signal.
    pub fn signed(&mut self, name: &str) -> Result<Logvec<Signed>, SimError> {
        match self.get(name)? {
            Value::Signed(value) => Ok(value),
            _ => Err(LogicError::TypeMismatch.into()),
        }
    }

    /// Write a signal.
    ///
    /// The value is coerced to the signal's declared kind; when it differs
    /// from the stored value the write is recorded for the current task,
    /// stamped into the change log and stored. Writing an equal value is
    /// not a change and leaves no trace.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), SimError> {
        let sig = self.design.signal_ref(self.instance, name)?;
        let decl = self.design.signal_decl(sig);
        if decl.constant {
            return Err(SimError::ImmutableSignal {
                part: self.design.part_name(self.instance).to_string(),
                name: name.to_string(),
            });
        }

        let value = decl.kind.coerce(value.into())?;
        if value != *self.design.slot(sig) {
            tracing::trace!(signal = name, value = %value, "write");
            self.trace.writes.push(sig);
            self.changes.insert(sig, self.now);
            *self.design.slot_mut(sig) = value;
        }

        Ok(())
    }

    /// A frame rebased onto the child part held by the named signal.
    pub fn child(&mut self, name: &str) -> Result<Frame<'_>, SimError> {
        let sig = self.design.signal_ref(self.instance, name)?;
        self.trace.reads.push(sig);
        let child = match self.design.slot(sig) {
            Value::Part(id) => *id,
            _ => return Err(SimError::NotAPart(name.to_string())),
        };

        Ok(Frame {
            design: &mut *self.design,
            changes: &mut *self.changes,
            trace: &mut *self.trace,
            now: self.now,
            instance: child,
        })
    }

    /// Resolve a signal name for use in a [`Wait`]; no read is recorded.
    pub fn signal(&self, name: &str) -> Result<SignalRef, SimError> {
        self.design.signal_ref(self.instance, name)
    }

    /// Resolve several signal names for use in a [`Wait`].
    pub fn signals<'n>(
        &self,
        names: impl IntoIterator<Item = &'n str>,
    ) -> Result<Vec<SignalRef>, SimError> {
        names.into_iter().map(|name| self.signal(name)).collect()
    }
}

/// The simulator.
///
/// Owns the design, the clock, the change log and one task per block of
/// every part in the tree under the root instance. [`Sim::run`] drives the
/// tasks until quiescence: no task ready, no delay outstanding.
pub struct Sim {
    design: Design,
    root: InstanceId,
    now: Seq,
    changes: HashMap<SignalRef, Seq>,
    tasks: Vec<Task>,
}

impl Sim {
    /// Build a simulator over the part tree rooted at `root`.
    ///
    /// Walks the instance tree in preorder and creates one task per block
    /// in declaration order; `when` conditions resolve their signal names
    /// against the owning instance here, so a misspelled name fails before
    /// the simulation starts.
    pub fn new(design: Design, root: InstanceId) -> Result<Self, SimError> {
        let mut tasks = Vec::new();

        for instance in design.all_parts(root) {
            let ty = design.type_of(instance)?;
            let part_name = design.part_type(ty)?.name().to_string();

            for decl in &design.part_type(ty)?.blocks {
                let kind = match &decl.trigger {
                    Trigger::Once => TaskKind::Once,
                    Trigger::Always => TaskKind::Always {
                        observed: BTreeSet::new(),
                        written: BTreeSet::new(),
                        pass_done: false,
                    },
                    Trigger::When(condition) => TaskKind::When {
                        condition: resolve_condition(&design, instance, condition)?,
                    },
                };

                tasks.push(Task::new(
                    instance,
                    format!("{part_name}.{}", decl.name),
                    dyn_clone::clone_box(&*decl.body),
                    kind,
                ));
            }
        }

        Ok(Self {
            design,
            root,
            now: Seq::default(),
            changes: HashMap::new(),
            tasks,
        })
    }

    /// The design under simulation.
    pub fn design(&self) -> &Design {
        &self.design
    }

    /// Consume the simulator and hand the design back.
    pub fn into_design(self) -> Design {
        self.design
    }

    /// The current virtual time.
    pub fn now(&self) -> Timestamp {
        self.now.time
    }

    /// Read a signal of any instance, without observer involvement.
    pub fn get(&self, instance: InstanceId, name: &str) -> Result<&Value, SimError> {
        self.design.get(instance, name)
    }

    /// Drive the simulation to quiescence.
    ///
    /// Each round runs the snapshot of ready tasks in declaration order,
    /// one step each. When no task is ready the clock jumps to the
    /// earliest deadline any task can name; when there is none the
    /// simulation terminates. Errors from block bodies abort the run.
    pub fn run(&mut self) -> Result<(), SimError> {
        tracing::debug!(
            root = self.design.part_name(self.root),
            tasks = self.tasks.len(),
            "simulation start"
        );

        loop {
            let ready: Vec<usize> = (0..self.tasks.len())
                .filter(|index| self.task_ready(*index))
                .collect();

            if ready.is_empty() {
                let next = self.tasks.iter().filter_map(Task::until).min();
                match next {
                    Some(time) => {
                        tracing::debug!(%time, "advancing clock");
                        self.now = Seq { time, tick: 0 };
                    }
                    None => break,
                }
            } else {
                for index in ready {
                    self.step(index)?;
                    self.now.tick += 1;
                }
            }
        }

        tracing::debug!(time = %self.now.time, "quiescent");
        Ok(())
    }

    /// Resume one task one step, observing its reads and writes.
    fn step(&mut self, index: usize) -> Result<(), SimError> {
        let now = self.now;
        let Self {
            design,
            changes,
            tasks,
            ..
        } = self;
        let task = &mut tasks[index];

        tracing::trace!(task = %task.name, "resume");
        task.begin_pass();

        let mut trace = StepTrace::default();
        let step = {
            let mut frame = Frame {
                design,
                changes,
                trace: &mut trace,
                now,
                instance: task.instance,
            };
            task.body.resume(&mut frame)?
        };

        task.absorb(&trace);
        match step {
            Step::Wait(wait) => task.wait = Some(wait),
            Step::Done => task.complete(),
        }
        task.last_run = Some(now);

        Ok(())
    }

    fn task_ready(&self, index: usize) -> bool {
        let task = &self.tasks[index];
        task.wait
            .as_ref()
            .map_or(false, |wait| self.wait_ready(wait, task.last_run))
    }

    fn wait_ready(&self, wait: &Wait, since: Option<Seq>) -> bool {
        match wait {
            Wait::Nowait => true,
            Wait::Any(inner) => inner.iter().any(|wait| self.wait_ready(wait, since)),
            Wait::All(inner) => inner.iter().all(|wait| self.wait_ready(wait, since)),
            Wait::Change(signals) => signals
                .iter()
                .any(|sig| self.is_changed(since, *sig, None)),
            Wait::Rising(signals) => signals
                .iter()
                .any(|sig| self.is_changed(since, *sig, Some(Logic::One))),
            Wait::Falling(signals) => signals
                .iter()
                .any(|sig| self.is_changed(since, *sig, Some(Logic::Zero))),
            Wait::Delay(delay) => {
                let last = since.map_or(Timestamp::ZERO, |seq| seq.time);
                self.is_elapsed(last + *delay)
            }
        }
    }

    /// Whether the signal was written after `since` (and, when given,
    /// currently holds `value`). A task that never ran sees every write.
    fn is_changed(&self, since: Option<Seq>, sig: SignalRef, value: Option<Logic>) -> bool {
        match self.changes.get(&sig) {
            Some(stamp) if since.map_or(true, |since| *stamp > since) => {
                value.map_or(true, |value| self.holds(sig, value))
            }
            _ => false,
        }
    }

    fn is_elapsed(&self, deadline: Timestamp) -> bool {
        self.now.time >= deadline
    }

    /// Whether the signal currently equals `value` under its own kind's
    /// coercion.
    fn holds(&self, sig: SignalRef, value: Logic) -> bool {
        let kind = self.design.signal_decl(sig).kind;
        kind.coerce(Value::Logic(value))
            .map_or(false, |value| value == *self.design.slot(sig))
    }
}

fn resolve_condition(
    design: &Design,
    instance: InstanceId,
    condition: &Condition,
) -> Result<Wait, SimError> {
    let resolve = |names: &[String]| -> Result<Vec<SignalRef>, SimError> {
        names
            .iter()
            .map(|name| design.signal_ref(instance, name))
            .collect()
    };

    let mut waits = Vec::new();
    if !condition.change.is_empty() {
        waits.push(Wait::Change(resolve(&condition.change)?));
    }
    if !condition.rising.is_empty() {
        waits.push(Wait::Rising(resolve(&condition.rising)?));
    }
    if !condition.falling.is_empty() {
        waits.push(Wait::Falling(resolve(&condition.falling)?));
    }
    if let Some(delay) = condition.delay {
        waits.push(Wait::Delay(delay));
    }

    Ok(Wait::any(waits))
}
