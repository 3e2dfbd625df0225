//! PropertyBuilder: fluent accumulation of a node's pending configuration.
//!
//! Every method consumes the builder, mutates the shared payload in place and
//! hands the builder back, so a chain accumulates configuration instead of
//! replacing it. Callbacks compose: a second callback on the same slot runs
//! after the first.

use std::fmt;
use std::rc::{Rc, Weak};

use super::properties::{PropertiesHandle, StartupProperties};
use super::value::{compose_reaction, slot_reaction, FieldValue, SlotValue};
use crate::widget::node::{NodeCore, WidgetNode};

/// A pending configuration plus the node it will be declared under.
///
/// Not `Clone`: two widgets built from one payload would alias each other.
///
/// # Examples
///
/// ```
/// use dugui::props::PropertyBuilder;
///
/// let builder = PropertyBuilder::new()
///     .title("Age")
///     .placeholder_text("years")
///     .default_value(42_i64)
///     .on_change(|age: &i64| println!("age is now {age}"));
/// assert_eq!(builder.properties().borrow().title, "Age");
/// ```
pub struct PropertyBuilder {
    properties: PropertiesHandle,
    parent: Option<Weak<NodeCore>>,
}

impl PropertyBuilder {
    /// Start a chain with no parent: the widget built from it is a root.
    pub fn new() -> Self {
        Self {
            properties: StartupProperties::handle(),
            parent: None,
        }
    }

    /// Start a fresh chain whose widget will be a child of `parent`.
    pub fn with_parent(parent: &WidgetNode) -> Self {
        Self {
            properties: StartupProperties::handle(),
            parent: Some(Rc::downgrade(parent.core())),
        }
    }

    /// The shared payload this builder mutates.
    pub fn properties(&self) -> &PropertiesHandle {
        &self.properties
    }

    /// The intended parent, if it is still alive.
    pub fn parent(&self) -> Option<WidgetNode> {
        self.parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(WidgetNode::from_core)
    }

    /// Whether this chain was started under a parent (alive or not).
    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    pub(crate) fn into_parts(self) -> (PropertiesHandle, Option<Weak<NodeCore>>) {
        (self.properties, self.parent)
    }

    // -- plain properties ------------------------------------------------

    /// Set the display title (label, button caption, window title).
    pub fn title(self, text: impl Into<String>) -> Self {
        self.properties.borrow_mut().title = text.into();
        self
    }

    /// Set the hint shown while a field is empty.
    pub fn placeholder_text(self, text: impl Into<String>) -> Self {
        self.properties.borrow_mut().placeholder_text = text.into();
        self
    }

    /// Set the initial value of the domain selected by `T`.
    ///
    /// A later call for the same domain replaces the earlier value.
    pub fn default_value<T: FieldValue>(self, value: T) -> Self {
        <T::Slot as SlotValue>::slot_mut(&mut self.properties.borrow_mut()).default =
            Some(value.widen());
        self
    }

    pub fn default_text(self, value: impl Into<String>) -> Self {
        self.default_value(value.into())
    }

    pub fn default_integer(self, value: i64) -> Self {
        self.default_value(value)
    }

    pub fn default_float(self, value: f64) -> Self {
        self.default_value(value)
    }

    pub fn no_border(self) -> Self {
        self.properties.borrow_mut().border = false;
        self
    }

    pub fn standard_border(self) -> Self {
        self.properties.borrow_mut().border = true;
        self
    }

    // -- callbacks -------------------------------------------------------

    /// Chain a no-argument action (click, toggle).
    pub fn on_action(self, reaction: impl Fn() + 'static) -> Self {
        compose_reaction(&mut self.properties.borrow_mut().on_action, Rc::new(reaction));
        self
    }

    /// Chain a value-changed callback on the domain selected by `T`.
    pub fn on_change<T: FieldValue>(self, reaction: impl Fn(&T) + 'static) -> Self {
        <T::Slot as SlotValue>::slot_mut(&mut self.properties.borrow_mut())
            .compose(slot_reaction(reaction));
        self
    }

    pub fn on_text_change(self, reaction: impl Fn(&String) + 'static) -> Self {
        self.on_change::<String>(reaction)
    }

    pub fn on_integer_change(self, reaction: impl Fn(&i64) + 'static) -> Self {
        self.on_change::<i64>(reaction)
    }

    pub fn on_float_change(self, reaction: impl Fn(&f64) + 'static) -> Self {
        self.on_change::<f64>(reaction)
    }
}

impl Default for PropertyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PropertyBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyBuilder")
            .field("properties", &self.properties.borrow())
            .field("has_parent", &self.has_parent())
            .finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
