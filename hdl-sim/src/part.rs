//! Part descriptors, the design registry and part instances

use core::fmt;

use crate::block::{is_identifier, BlockBody, BlockDecl, Trigger};
use crate::value::{SignalKind, Value};
use crate::SimError;
use hdl_logic::LogicError;

/// Identifier of a registered part type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartTypeId(pub(crate) usize);

/// Identifier of a part instance inside a [`Design`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(pub(crate) usize);

impl InstanceId {
    /// Stand-in used before a child instance exists; never observable.
    pub(crate) const PLACEHOLDER: InstanceId = InstanceId(usize::MAX);

    /// The arena index of this instance.
    pub(crate) const fn index(self) -> usize {
        self.0
    }
}

/// One signal of one part instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SignalRef {
    pub(crate) instance: InstanceId,
    pub(crate) slot: usize,
}

/// A signal of a part type: name, declared kind, optional explicit
/// default, constness.
#[derive(Debug, Clone)]
pub(crate) struct SignalDecl {
    pub name: String,
    pub kind: SignalKind,
    pub default: Option<Value>,
    pub constant: bool,
}

/// The canonical descriptor of a part type: its signals and its blocks in
/// declaration order.
///
/// Descriptors are immutable once registered; the simulator reads them
/// without further synchronization.
pub struct PartType {
    name: String,
    pub(crate) signals: Vec<SignalDecl>,
    pub(crate) blocks: Vec<BlockDecl>,
}

impl PartType {
    /// The declared name of this part type.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The names of the declared signals, in declaration order.
    pub fn signal_names(&self) -> impl Iterator<Item = &str> {
        self.signals.iter().map(|decl| decl.name.as_str())
    }

    pub(crate) fn slot(&self, name: &str) -> Option<usize> {
        self.signals.iter().position(|decl| decl.name == name)
    }
}

impl fmt::Debug for PartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartType")
            .field("name", &self.name)
            .field("signals", &self.signals)
            .field("blocks", &self.blocks.len())
            .finish()
    }
}

/// A part instance: one value slot per declared signal.
#[derive(Debug)]
pub(crate) struct Instance {
    pub ty: PartTypeId,
    pub slots: Vec<Value>,
}

/// The registry of part types and the arena of their instances.
///
/// Part types are declared through [`Design::part`] and instantiated with
/// [`Design::instantiate`]; instantiating a part recursively instantiates
/// its child parts. The design owns every slot value; reads through
/// [`Design::get`] are plain inspection without observer involvement.
#[derive(Debug, Default)]
pub struct Design {
    pub(crate) types: Vec<PartType>,
    pub(crate) instances: Vec<Instance>,
}

impl Design {
    /// An empty design.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start declaring a part type under the given name.
    pub fn part(&mut self, name: impl Into<String>) -> PartBuilder<'_> {
        PartBuilder {
            design: self,
            name: name.into(),
            signals: Vec::new(),
            blocks: Vec::new(),
        }
    }

    /// The descriptor of a registered part type.
    pub fn part_type(&self, ty: PartTypeId) -> Result<&PartType, SimError> {
        self.types
            .get(ty.0)
            .ok_or_else(|| SimError::NotAPart(format!("type #{}", ty.0)))
    }

    /// Create an instance of a part type, recursively instantiating child
    /// parts and applying every signal's default.
    pub fn instantiate(&mut self, ty: PartTypeId) -> Result<InstanceId, SimError> {
        let slot_count = self.part_type(ty)?.signals.len();

        let id = InstanceId(self.instances.len());
        self.instances.push(Instance {
            ty,
            slots: Vec::with_capacity(slot_count),
        });

        for slot in 0..slot_count {
            let kind = self.types[ty.0].signals[slot].kind;
            let value = match kind {
                SignalKind::Part(child) => Value::Part(self.instantiate(child)?),
                _ => match &self.types[ty.0].signals[slot].default {
                    Some(default) => default.clone(),
                    None => kind.default_value(),
                },
            };
            self.instances[id.0].slots.push(value);
        }

        Ok(id)
    }

    /// The type of an instance.
    pub fn type_of(&self, instance: InstanceId) -> Result<PartTypeId, SimError> {
        Ok(self.instance(instance)?.ty)
    }

    /// Read a signal by name, without observer involvement.
    pub fn get(&self, instance: InstanceId, name: &str) -> Result<&Value, SimError> {
        let sig = self.signal_ref(instance, name)?;
        Ok(self.slot(sig))
    }

    /// The child part instance held by the named signal.
    pub fn child(&self, instance: InstanceId, name: &str) -> Result<InstanceId, SimError> {
        match self.get(instance, name)? {
            Value::Part(child) => Ok(*child),
            _ => Err(SimError::NotAPart(name.to_string())),
        }
    }

    /// Resolve a signal name on an instance.
    pub fn signal_ref(&self, instance: InstanceId, name: &str) -> Result<SignalRef, SimError> {
        let ty = self.instance(instance)?.ty;
        let part = &self.types[ty.0];
        let slot = part.slot(name).ok_or_else(|| SimError::UnknownSignal {
            part: part.name.clone(),
            name: name.to_string(),
        })?;

        Ok(SignalRef { instance, slot })
    }

    /// The instance followed by every descendant, preorder.
    pub fn all_parts(&self, root: InstanceId) -> Vec<InstanceId> {
        let mut parts = Vec::new();
        self.collect_parts(root, &mut parts);
        parts
    }

    fn collect_parts(&self, instance: InstanceId, out: &mut Vec<InstanceId>) {
        out.push(instance);
        for slot in &self.instances[instance.0].slots {
            if let Value::Part(child) = slot {
                self.collect_parts(*child, out);
            }
        }
    }

    fn instance(&self, id: InstanceId) -> Result<&Instance, SimError> {
        self.instances
            .get(id.0)
            .ok_or_else(|| SimError::NotAPart(format!("instance #{}", id.0)))
    }

    pub(crate) fn slot(&self, sig: SignalRef) -> &Value {
        &self.instances[sig.instance.0].slots[sig.slot]
    }

    pub(crate) fn slot_mut(&mut self, sig: SignalRef) -> &mut Value {
        &mut self.instances[sig.instance.0].slots[sig.slot]
    }

    pub(crate) fn signal_decl(&self, sig: SignalRef) -> &SignalDecl {
        let ty = self.instances[sig.instance.0].ty;
        &self.types[ty.0].signals[sig.slot]
    }

    pub(crate) fn part_name(&self, instance: InstanceId) -> &str {
        &self.types[self.instances[instance.0].ty.0].name
    }
}

/// A signal gathered by the builder before kinds and defaults are
/// resolved.
struct PendingSignal {
    name: String,
    kind: Option<SignalKind>,
    default: Option<Value>,
    constant: bool,
}

/// Declares the signals and blocks of one part type.
///
/// The builder is the declarative counterpart of a part class body:
/// signals and blocks are recorded in declaration order and frozen into a
/// [`PartType`] by [`PartBuilder::build`], which is also where every
/// validation error surfaces.
#[must_use]
pub struct PartBuilder<'a> {
    design: &'a mut Design,
    name: String,
    signals: Vec<PendingSignal>,
    blocks: Vec<BlockDecl>,
}

impl PartBuilder<'_> {
    /// Declare a signal with its kind's default construction.
    pub fn signal(mut self, name: impl Into<String>, kind: SignalKind) -> Self {
        self.signals.push(PendingSignal {
            name: name.into(),
            kind: Some(kind),
            default: None,
            constant: false,
        });
        self
    }

    /// Declare a signal with an explicit default, coerced to the kind when
    /// the part is built.
    pub fn signal_with(
        mut self,
        name: impl Into<String>,
        kind: SignalKind,
        default: impl Into<Value>,
    ) -> Self {
        self.signals.push(PendingSignal {
            name: name.into(),
            kind: Some(kind),
            default: Some(default.into()),
            constant: false,
        });
        self
    }

    /// Declare an immutable signal whose kind is inferred from its value.
    ///
    /// Constants are the builder counterpart of part parameters: a
    /// part-building function pins its arguments here, and any write fails
    /// with [`SimError::ImmutableSignal`].
    pub fn constant(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.signals.push(PendingSignal {
            name: name.into(),
            kind: None,
            default: Some(value.into()),
            constant: true,
        });
        self
    }

    /// Declare a child part signal.
    pub fn child(mut self, name: impl Into<String>, ty: PartTypeId) -> Self {
        self.signals.push(PendingSignal {
            name: name.into(),
            kind: Some(SignalKind::Part(ty)),
            default: None,
            constant: false,
        });
        self
    }

    /// Declare a block that runs a single pass at simulation start.
    pub fn once(self, name: impl Into<String>, body: impl BlockBody + 'static) -> Self {
        self.block(name, Trigger::Once, body)
    }

    /// Declare a block that runs at start and re-runs whenever any signal
    /// it read during its previous pass changes.
    pub fn always(self, name: impl Into<String>, body: impl BlockBody + 'static) -> Self {
        self.block(name, Trigger::Always, body)
    }

    /// Declare a block armed by the given condition.
    pub fn when(
        self,
        name: impl Into<String>,
        condition: crate::Condition,
        body: impl BlockBody + 'static,
    ) -> Self {
        self.block(name, Trigger::When(condition), body)
    }

    fn block(mut self, name: impl Into<String>, trigger: Trigger, body: impl BlockBody + 'static) -> Self {
        self.blocks.push(BlockDecl {
            name: name.into(),
            trigger,
            body: Box::new(body),
        });
        self
    }

    /// Validate the declarations and register the part type.
    pub fn build(self) -> Result<PartTypeId, SimError> {
        let mut signals: Vec<SignalDecl> = Vec::with_capacity(self.signals.len());

        for pending in self.signals {
            if !is_identifier(&pending.name) {
                return Err(LogicError::BadValue(pending.name).into());
            }
            if signals.iter().any(|decl| decl.name == pending.name) {
                return Err(LogicError::BadValue(pending.name).into());
            }

            let kind = match pending.kind {
                Some(kind) => kind,
                None => pending
                    .default
                    .as_ref()
                    .and_then(SignalKind::of)
                    .ok_or_else(|| LogicError::BadValue(pending.name.clone()))?,
            };
            let default = pending.default.map(|value| kind.coerce(value)).transpose()?;

            signals.push(SignalDecl {
                name: pending.name,
                kind,
                default,
                constant: pending.constant,
            });
        }

        for block in &self.blocks {
            if let Trigger::When(condition) = &block.trigger {
                condition.validate()?;
            }
        }

        let id = PartTypeId(self.design.types.len());
        self.design.types.push(PartType {
            name: self.name,
            signals,
            blocks: self.blocks,
        });
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Condition, Step};
    use hdl_logic::{Logic, Span};

    fn kind_byte() -> SignalKind {
        SignalKind::Unsigned(Span::new(7, 0).unwrap())
    }

    #[test]
    fn builds_and_instantiates() {
        let mut design = Design::new();
        let ty = design
            .part("adder")
            .signal("a", kind_byte())
            .signal_with("b", kind_byte(), 42)
            .signal("carry", SignalKind::Logic)
            .build()
            .unwrap();

        let inst = design.instantiate(ty).unwrap();
        assert_eq!(design.get(inst, "b").unwrap().to_string(), "00101010");
        assert_eq!(design.get(inst, "a").unwrap().to_string(), "XXXXXXXX");
        assert_eq!(design.get(inst, "carry").unwrap(), &Value::Logic(Logic::Zero));
        assert!(design.get(inst, "missing").is_err());
    }

    #[test]
    fn rejects_bad_signal_declarations() {
        let mut design = Design::new();
        assert!(design.part("p").signal("123", kind_byte()).build().is_err());

        let mut design = Design::new();
        assert!(design
            .part("p")
            .signal("a", kind_byte())
            .signal("a", SignalKind::Logic)
            .build()
            .is_err());

        let mut design = Design::new();
        assert!(design.part("p").constant("c", 5).build().is_err());
    }

    #[test]
    fn rejects_bad_conditions() {
        let mut design = Design::new();
        let result = design
            .part("p")
            .signal("clk", SignalKind::Logic)
            .when(
                "w",
                Condition::new().rising(["not an identifier"]),
                |_: &mut crate::Frame<'_>| -> Result<Step, SimError> { Ok(Step::Done) },
            )
            .build();
        assert!(matches!(result, Err(SimError::BadCondition { .. })));
    }

    #[test]
    fn child_parts_instantiate_transitively() {
        let mut design = Design::new();
        let leaf = design
            .part("leaf")
            .signal("s", SignalKind::Logic)
            .build()
            .unwrap();
        let mid = design.part("mid").child("leaf", leaf).build().unwrap();
        let root = design
            .part("root")
            .child("left", mid)
            .child("right", leaf)
            .build()
            .unwrap();

        let root_inst = design.instantiate(root).unwrap();
        let parts = design.all_parts(root_inst);
        assert_eq!(parts.len(), 4);
        assert_eq!(parts[0], root_inst);

        let left = design.child(root_inst, "left").unwrap();
        let leaf_inst = design.child(left, "leaf").unwrap();
        assert_eq!(
            design.get(leaf_inst, "s").unwrap(),
            &Value::Logic(Logic::Zero)
        );
    }

    #[test]
    fn constants_hold_their_value() {
        let mut design = Design::new();
        let ty = design
            .part("p")
            .constant("width", Logic::One)
            .build()
            .unwrap();
        let inst = design.instantiate(ty).unwrap();
        assert_eq!(design.get(inst, "width").unwrap(), &Value::Logic(Logic::One));
    }
}
