//! Value domains, typed values and typed callbacks.
//!
//! The engine knows three value domains: text, integer and floating point.
//! Application code picks a domain through the Rust type it passes
//! (`String`, any integer that fits an `i64`, `f32`/`f64`), resolved at
//! compile time by the sealed [`FieldValue`] trait and stored as the
//! [`SlotValue`] of its domain. Backends receive the same information as tagged
//! variants ([`Value`], [`ValueReaction`]) so the contract stays object safe.

use std::fmt;
use std::rc::Rc;

use super::kind::WidgetKind;
use super::properties::StartupProperties;

// ---------------------------------------------------------------------------
// Callbacks
// ---------------------------------------------------------------------------

/// A no-argument action callback (button click, check box toggle).
pub type Reaction = Rc<dyn Fn()>;

/// A value-changed callback for one domain.
pub type ChangeReaction<T> = Rc<dyn Fn(&T)>;

/// Chain `next` after whatever `slot` already holds.
///
/// The previous callback (with its own chain) runs first, then `next`.
pub fn compose_reaction(slot: &mut Option<Reaction>, next: Reaction) {
    *slot = Some(match slot.take() {
        Some(previous) => Rc::new(move || {
            previous();
            next();
        }),
        None => next,
    });
}

// ---------------------------------------------------------------------------
// Domain / Value
// ---------------------------------------------------------------------------

/// One of the three value domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    Text,
    Integer,
    Float,
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Domain::Text => "text",
            Domain::Integer => "integer",
            Domain::Float => "floating point",
        })
    }
}

/// A single value of one domain, as exchanged with a backend.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl Value {
    /// The domain this value belongs to.
    pub fn domain(&self) -> Domain {
        match self {
            Value::Text(_) => Domain::Text,
            Value::Integer(_) => Domain::Integer,
            Value::Float(_) => Domain::Float,
        }
    }

    /// The zero value of a domain: empty text, `0`, `0.0`.
    pub fn zero(domain: Domain) -> Self {
        match domain {
            Domain::Text => Value::Text(String::new()),
            Domain::Integer => Value::Integer(0),
            Domain::Float => Value::Float(0.0),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(text) => f.write_str(text),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
        }
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

// ---------------------------------------------------------------------------
// ValueReaction
// ---------------------------------------------------------------------------

/// A value-changed callback tagged with its domain.
#[derive(Clone)]
pub enum ValueReaction {
    Text(ChangeReaction<String>),
    Integer(ChangeReaction<i64>),
    Float(ChangeReaction<f64>),
}

impl ValueReaction {
    /// The domain of values this callback expects.
    pub fn domain(&self) -> Domain {
        match self {
            ValueReaction::Text(_) => Domain::Text,
            ValueReaction::Integer(_) => Domain::Integer,
            ValueReaction::Float(_) => Domain::Float,
        }
    }

    /// Invoke the callback if `value` is of its domain.
    ///
    /// Returns whether the callback ran.
    pub fn call(&self, value: &Value) -> bool {
        match (self, value) {
            (ValueReaction::Text(f), Value::Text(text)) => f(text),
            (ValueReaction::Integer(f), Value::Integer(n)) => f(n),
            (ValueReaction::Float(f), Value::Float(x)) => f(x),
            _ => return false,
        }
        true
    }
}

impl fmt::Debug for ValueReaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ValueReaction").field(&self.domain()).finish()
    }
}

// ---------------------------------------------------------------------------
// TypedSlot
// ---------------------------------------------------------------------------

/// Pending default value and value-changed callback for one domain.
pub struct TypedSlot<T> {
    /// Initial value shown once realized. Last write wins.
    pub default: Option<T>,
    /// Composed value-changed callback.
    pub on_change: Option<ChangeReaction<T>>,
}

impl<T: 'static> TypedSlot<T> {
    /// Chain `next` after the callback already in this slot, if any.
    pub fn compose(&mut self, next: ChangeReaction<T>) {
        self.on_change = Some(match self.on_change.take() {
            Some(previous) => Rc::new(move |value: &T| {
                previous(value);
                next(value);
            }),
            None => next,
        });
    }
}

impl<T> Default for TypedSlot<T> {
    fn default() -> Self {
        Self {
            default: None,
            on_change: None,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for TypedSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedSlot")
            .field("default", &self.default)
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// SlotValue / FieldValue
// ---------------------------------------------------------------------------

mod sealed {
    pub trait Sealed {}
    impl Sealed for String {}
    impl Sealed for i64 {}
    impl Sealed for f64 {}
}

/// The storage type of one value domain: `String`, `i64` or `f64`.
///
/// Payload slots, backend values and live callbacks all use these types.
pub trait SlotValue: sealed::Sealed + Clone + Default + fmt::Debug + 'static {
    /// The domain this type belongs to.
    const DOMAIN: Domain;

    /// The kind an `Input` of this domain realizes as.
    const INPUT_KIND: WidgetKind;

    /// The slot of this domain inside a properties payload.
    fn slot(properties: &StartupProperties) -> &TypedSlot<Self>;

    /// Mutable access to the slot of this domain.
    fn slot_mut(properties: &mut StartupProperties) -> &mut TypedSlot<Self>;

    /// Wrap into the tagged variant.
    fn into_value(self) -> Value;

    /// Extract from the tagged variant, if the domains match.
    fn from_value(value: &Value) -> Option<Self>;

    /// Tag a callback of this domain.
    fn reaction(reaction: ChangeReaction<Self>) -> ValueReaction;
}

impl SlotValue for String {
    const DOMAIN: Domain = Domain::Text;
    const INPUT_KIND: WidgetKind = WidgetKind::TextField;

    fn slot(properties: &StartupProperties) -> &TypedSlot<Self> {
        &properties.text
    }

    fn slot_mut(properties: &mut StartupProperties) -> &mut TypedSlot<Self> {
        &mut properties.text
    }

    fn into_value(self) -> Value {
        Value::Text(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_text().map(str::to_owned)
    }

    fn reaction(reaction: ChangeReaction<Self>) -> ValueReaction {
        ValueReaction::Text(reaction)
    }
}

impl SlotValue for i64 {
    const DOMAIN: Domain = Domain::Integer;
    const INPUT_KIND: WidgetKind = WidgetKind::IntegerField;

    fn slot(properties: &StartupProperties) -> &TypedSlot<Self> {
        &properties.integer
    }

    fn slot_mut(properties: &mut StartupProperties) -> &mut TypedSlot<Self> {
        &mut properties.integer
    }

    fn into_value(self) -> Value {
        Value::Integer(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_integer()
    }

    fn reaction(reaction: ChangeReaction<Self>) -> ValueReaction {
        ValueReaction::Integer(reaction)
    }
}

impl SlotValue for f64 {
    const DOMAIN: Domain = Domain::Float;
    const INPUT_KIND: WidgetKind = WidgetKind::FloatField;

    fn slot(properties: &StartupProperties) -> &TypedSlot<Self> {
        &properties.float
    }

    fn slot_mut(properties: &mut StartupProperties) -> &mut TypedSlot<Self> {
        &mut properties.float
    }

    fn into_value(self) -> Value {
        Value::Float(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_float()
    }

    fn reaction(reaction: ChangeReaction<Self>) -> ValueReaction {
        ValueReaction::Float(reaction)
    }
}

/// A Rust type an input can be bound to.
///
/// `String` binds to the text domain. Every integer type whose values all fit
/// in an `i64` binds to the integer domain, `f32` and `f64` to the floating
/// point domain. Values widen losslessly into their slot type; a reported
/// value that does not fit back into the narrower type is dropped.
/// Any other type does not compile.
pub trait FieldValue: sealed::Sealed + Clone + Default + fmt::Debug + 'static {
    /// The storage type of this type's domain.
    type Slot: SlotValue;

    /// Convert into the slot type.
    fn widen(self) -> Self::Slot;

    /// Convert back from the slot type, if the value fits.
    fn narrow(value: &Self::Slot) -> Option<Self>;
}

macro_rules! slot_field {
    ($($t:ty),*) => {$(
        impl FieldValue for $t {
            type Slot = $t;

            fn widen(self) -> $t {
                self
            }

            fn narrow(value: &$t) -> Option<Self> {
                Some(value.clone())
            }
        }
    )*};
}

slot_field!(String, i64, f64);

macro_rules! integer_field {
    ($($t:ty),*) => {$(
        impl sealed::Sealed for $t {}

        impl FieldValue for $t {
            type Slot = i64;

            fn widen(self) -> i64 {
                i64::from(self)
            }

            fn narrow(value: &i64) -> Option<Self> {
                <$t>::try_from(*value).ok()
            }
        }
    )*};
}

integer_field!(i8, i16, i32, u8, u16, u32);

impl sealed::Sealed for f32 {}

impl FieldValue for f32 {
    type Slot = f64;

    fn widen(self) -> f64 {
        f64::from(self)
    }

    fn narrow(value: &f64) -> Option<Self> {
        // Finite values beyond f32's range come out infinite.
        let narrowed = *value as f32;
        (narrowed.is_finite() || !value.is_finite()).then_some(narrowed)
    }
}

/// Adapt a callback on `T` to the slot type of its domain.
///
/// Reported values that do not fit `T` skip the callback with a warning.
pub fn slot_reaction<T: FieldValue>(reaction: impl Fn(&T) + 'static) -> ChangeReaction<T::Slot> {
    Rc::new(move |value: &T::Slot| match T::narrow(value) {
        Some(narrowed) => reaction(&narrowed),
        None => log::warn!(
            "dropping {value:?}: out of range for {}",
            std::any::type_name::<T>()
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn value_domains() {
        assert_eq!(Value::from("a").domain(), Domain::Text);
        assert_eq!(Value::from(3_i64).domain(), Domain::Integer);
        assert_eq!(Value::from(0.5).domain(), Domain::Float);
        assert_eq!(Value::zero(Domain::Text), Value::Text(String::new()));
    }

    #[test]
    fn value_display() {
        assert_eq!(Value::from("Ada").to_string(), "Ada");
        assert_eq!(Value::Integer(-4).to_string(), "-4");
        assert_eq!(Value::Float(1.5).to_string(), "1.5");
    }

    #[test]
    fn reaction_ignores_other_domains() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let reaction = ValueReaction::Integer(Rc::new(move |n: &i64| sink.borrow_mut().push(*n)));

        assert!(!reaction.call(&Value::from("7")));
        assert!(reaction.call(&Value::Integer(7)));
        assert_eq!(*seen.borrow(), vec![7]);
    }

    #[test]
    fn slot_compose_runs_in_attachment_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut slot: TypedSlot<String> = TypedSlot::default();
        for tag in 0..4 {
            let order = order.clone();
            slot.compose(Rc::new(move |_: &String| order.borrow_mut().push(tag)));
        }
        let callback = slot.on_change.clone().unwrap();
        callback(&"x".to_owned());
        assert_eq!(*order.borrow(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn compose_reaction_chains() {
        let count = Rc::new(RefCell::new(String::new()));
        let mut slot: Option<Reaction> = None;
        let a = count.clone();
        compose_reaction(&mut slot, Rc::new(move || a.borrow_mut().push('a')));
        let b = count.clone();
        compose_reaction(&mut slot, Rc::new(move || b.borrow_mut().push('b')));
        slot.unwrap()();
        assert_eq!(*count.borrow(), "ab");
    }

    #[test]
    fn field_value_round_trip_through_value() {
        assert_eq!(String::from_value(&"x".to_owned().into_value()), Some("x".to_owned()));
        assert_eq!(i64::from_value(&Value::Float(1.0)), None);
        assert_eq!(<f64 as SlotValue>::INPUT_KIND, WidgetKind::FloatField);
    }

    #[test]
    fn narrow_integers_widen_and_check_on_the_way_back() {
        assert_eq!(7_u8.widen(), 7_i64);
        assert_eq!(<<i32 as FieldValue>::Slot as SlotValue>::DOMAIN, Domain::Integer);
        assert_eq!(i32::narrow(&-12), Some(-12));
        assert_eq!(u16::narrow(&-1), None);
        assert_eq!(i8::narrow(&300), None);
    }

    #[test]
    fn f32_narrowing_rejects_overflow() {
        assert_eq!(1.5_f32.widen(), 1.5_f64);
        assert_eq!(f32::narrow(&0.25), Some(0.25));
        assert_eq!(f32::narrow(&1e300), None);
        assert_eq!(f32::narrow(&f64::INFINITY), Some(f32::INFINITY));
    }

    #[test]
    fn slot_reaction_skips_values_that_do_not_fit() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let reaction = slot_reaction(move |n: &u8| sink.borrow_mut().push(*n));
        reaction(&200);
        reaction(&-3);
        reaction(&256);
        assert_eq!(*seen.borrow(), vec![200_u8]);
    }
}
