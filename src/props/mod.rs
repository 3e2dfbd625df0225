//! Declaration-phase data: widget kinds, typed values, the properties payload
//! and the fluent builder that fills it.

pub mod builder;
pub mod kind;
pub mod properties;
pub mod value;

pub use builder::PropertyBuilder;
pub use kind::WidgetKind;
pub use properties::{PropertiesHandle, StartupProperties};
pub use value::{
    compose_reaction, slot_reaction, ChangeReaction, Domain, FieldValue, Reaction, SlotValue,
    TypedSlot, Value, ValueReaction,
};
