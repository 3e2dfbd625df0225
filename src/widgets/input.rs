//! Input widget: a field bound to a typed in-memory value.
//!
//! `Input<String>` realizes as a text field, integer inputs (`Input<i64>`,
//! `Input<u16>`, ...) as an integer field and `Input<f64>` / `Input<f32>` as
//! a floating-point field. The widget keeps the last value the backend
//! reported; reading it never queries the backend. A reported value that does
//! not fit `T` leaves the stored value unchanged.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::props::{slot_reaction, FieldValue, PropertyBuilder, SlotValue, WidgetKind};
use crate::widget::{Widget, WidgetNode};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A typed input field.
///
/// Cloning yields another handle to the same field and value.
///
/// # Examples
///
/// ```
/// use dugui::widgets::{Container, Input};
///
/// let form = Container::form();
/// let age: Input<i64> = Input::new(form.title("Age").default_value(30_i64));
/// assert_eq!(age.get(), 30);
/// age.set(31).unwrap();
/// assert_eq!(age.get(), 31);
/// ```
pub struct Input<T: FieldValue> {
    node: WidgetNode,
    contents: Rc<RefCell<T>>,
}

impl<T: FieldValue> Input<T> {
    /// Declare an input from a builder chain.
    pub fn new(builder: PropertyBuilder) -> Self {
        Self::with_kind(builder, <T::Slot as SlotValue>::INPUT_KIND)
    }

    /// Declare an input of `T`'s domain that realizes as `kind`.
    pub(crate) fn with_kind(builder: PropertyBuilder, kind: WidgetKind) -> Self {
        let seed = builder
            .properties()
            .borrow()
            .default_value::<T>()
            .unwrap_or_default();
        let contents = Rc::new(RefCell::new(seed));
        let sink = Rc::clone(&contents);
        let builder = builder.on_change(move |value: &T| {
            *sink.borrow_mut() = value.clone();
        });

        Self {
            node: WidgetNode::new(builder, kind),
            contents,
        }
    }

    /// The last known value.
    pub fn get(&self) -> T {
        self.contents.borrow().clone()
    }

    /// Borrow the last known value without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.contents.borrow())
    }

    /// Assign a value.
    ///
    /// Before realization the value becomes the field's initial value; once
    /// realized it is pushed to the backend right away.
    pub fn set(&self, value: T) -> Result<()> {
        *self.contents.borrow_mut() = value.clone();
        if let Some(pending) = self.node.properties() {
            <T::Slot as SlotValue>::slot_mut(&mut pending.borrow_mut()).default =
                Some(value.clone().widen());
        }
        if let Some(backend) = self.node.backend() {
            if self.node.is_realized() {
                backend.set_value(value.widen().into_value())?;
            }
        }
        Ok(())
    }

    /// Attach another value-changed callback.
    ///
    /// Chained into the pending payload before realization, registered live
    /// with the backend afterwards.
    pub fn on_change(&self, reaction: impl Fn(&T) + 'static) -> Result<()> {
        if let Some(pending) = self.node.properties() {
            <T::Slot as SlotValue>::slot_mut(&mut pending.borrow_mut())
                .compose(slot_reaction(reaction));
            return Ok(());
        }
        match self.node.backend() {
            Some(backend) => backend
                .add_value_changed_reaction(<T::Slot as SlotValue>::reaction(slot_reaction(reaction))),
            None => Err(Error::invalid("attaching a callback to a field with no backend")),
        }
    }
}

impl<T: FieldValue> Clone for Input<T> {
    fn clone(&self) -> Self {
        Self {
            node: self.node.clone(),
            contents: Rc::clone(&self.contents),
        }
    }
}

impl<T: FieldValue> Widget for Input<T> {
    fn node(&self) -> &WidgetNode {
        &self.node
    }
}

impl<T: FieldValue> fmt::Debug for Input<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Input")
            .field("node", &self.node)
            .field("value", &self.contents.borrow())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// SpinBox
// ---------------------------------------------------------------------------

/// An integer input shown as a spin box.
#[derive(Debug, Clone)]
pub struct SpinBox {
    input: Input<i64>,
}

impl SpinBox {
    pub fn new(builder: PropertyBuilder) -> Self {
        Self {
            input: Input::with_kind(builder, WidgetKind::SpinBox),
        }
    }

    pub fn get(&self) -> i64 {
        self.input.get()
    }

    pub fn set(&self, value: i64) -> Result<()> {
        self.input.set(value)
    }

    pub fn on_change(&self, reaction: impl Fn(&i64) + 'static) -> Result<()> {
        self.input.on_change(reaction)
    }
}

impl Widget for SpinBox {
    fn node(&self) -> &WidgetNode {
        self.input.node()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
