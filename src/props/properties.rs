//! The configuration payload handed to a backend at realization.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use super::kind::WidgetKind;
use super::value::{Domain, FieldValue, Reaction, SlotValue, TypedSlot, Value};
use crate::error::Result;
use crate::widget::node::{NodeCore, WidgetNode};

/// Shared handle to a properties payload, as held by builders and nodes.
pub type PropertiesHandle = Rc<RefCell<StartupProperties>>;

// ---------------------------------------------------------------------------
// ChildLink
// ---------------------------------------------------------------------------

/// One entry of a container's child list.
#[derive(Clone)]
pub(crate) enum ChildLink {
    /// The container owns the child.
    Shared(Rc<NodeCore>),
    /// The child lives in the declaring scope next to its container.
    Static(Weak<NodeCore>),
}

impl ChildLink {
    pub(crate) fn upgrade(&self) -> Option<Rc<NodeCore>> {
        match self {
            ChildLink::Shared(core) => Some(core.clone()),
            ChildLink::Static(weak) => weak.upgrade(),
        }
    }

    fn points_to(&self, core: &Rc<NodeCore>) -> bool {
        match self {
            ChildLink::Shared(owned) => Rc::ptr_eq(owned, core),
            ChildLink::Static(weak) => Weak::ptr_eq(weak, &Rc::downgrade(core)),
        }
    }
}

// ---------------------------------------------------------------------------
// StartupProperties
// ---------------------------------------------------------------------------

/// Everything a backend needs to materialize one node.
///
/// Exactly one typed slot is meaningful for a given kind; the others stay
/// empty unless application code filled them.
#[derive(Default)]
pub struct StartupProperties {
    pub kind: WidgetKind,
    pub title: String,
    pub placeholder_text: String,
    pub text: TypedSlot<String>,
    pub integer: TypedSlot<i64>,
    pub float: TypedSlot<f64>,
    pub on_action: Option<Reaction>,
    pub border: bool,
    /// Set on the root by `run`: the node is a top-level window.
    pub windowed: bool,
    children: Vec<ChildLink>,
}

impl StartupProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh payload wrapped in a shared handle.
    pub fn handle() -> PropertiesHandle {
        Rc::new(RefCell::new(Self::new()))
    }

    /// The default value of the slot for `T`, if set and in range for `T`.
    pub fn default_value<T: FieldValue>(&self) -> Option<T> {
        <T::Slot as SlotValue>::slot(self)
            .default
            .as_ref()
            .and_then(T::narrow)
    }

    /// Fail unless this payload's kind is set and accepts every callback it
    /// carries.
    pub fn check_capabilities(&self) -> Result<()> {
        self.kind.ensure_set()?;
        if self.text.on_change.is_some() {
            self.kind.ensure_value_reaction(Domain::Text)?;
        }
        if self.integer.on_change.is_some() {
            self.kind.ensure_value_reaction(Domain::Integer)?;
        }
        if self.float.on_change.is_some() {
            self.kind.ensure_value_reaction(Domain::Float)?;
        }
        if self.on_action.is_some() {
            self.kind.ensure_action()?;
        }
        Ok(())
    }

    /// The initial value an element of this kind should display: the slot
    /// default of the kind's domain, or that domain's zero.
    pub fn initial_value(&self) -> Option<Value> {
        let domain = self.kind.domain()?;
        let value = match domain {
            Domain::Text => self.text.default.clone().map(Value::Text),
            Domain::Integer => self.integer.default.map(Value::Integer),
            Domain::Float => self.float.default.map(Value::Float),
        };
        Some(value.unwrap_or_else(|| Value::zero(domain)))
    }

    /// Children in declaration order.
    ///
    /// Static children whose declaring scope already dropped them are skipped.
    pub fn children(&self) -> Vec<WidgetNode> {
        self.children
            .iter()
            .filter_map(|link| match link.upgrade() {
                Some(core) => Some(WidgetNode::from_core(core)),
                None => {
                    log::warn!("skipping a static child dropped before realization");
                    None
                }
            })
            .collect()
    }

    /// Number of child links, including dangling static ones.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub(crate) fn links(&self) -> Vec<ChildLink> {
        self.children.clone()
    }

    pub(crate) fn push_static(&mut self, core: &Rc<NodeCore>) {
        self.children.push(ChildLink::Static(Rc::downgrade(core)));
    }

    /// Replace the link to `core` with an owning one. Returns whether found.
    pub(crate) fn promote_to_shared(&mut self, core: &Rc<NodeCore>) -> bool {
        match self.children.iter_mut().find(|link| link.points_to(core)) {
            Some(link) => {
                *link = ChildLink::Shared(core.clone());
                true
            }
            None => false,
        }
    }

    /// Whether the child at `index` is owned by this payload.
    pub fn is_shared_child(&self, index: usize) -> bool {
        matches!(self.children.get(index), Some(ChildLink::Shared(_)))
    }
}

impl fmt::Debug for StartupProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StartupProperties")
            .field("kind", &self.kind)
            .field("title", &self.title)
            .field("placeholder_text", &self.placeholder_text)
            .field("text", &self.text)
            .field("integer", &self.integer)
            .field("float", &self.float)
            .field("on_action", &self.on_action.is_some())
            .field("border", &self.border)
            .field("windowed", &self.windowed)
            .field("children", &self.children.len())
            .finish()
    }
}
