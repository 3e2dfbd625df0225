//! The backend contract: what a rendering toolkit must provide.
//!
//! The engine never draws anything. At realization it asks a backend to mint
//! one counterpart per node ([`Backend::create_another_element`]), then hands
//! each counterpart the node's [`StartupProperties`] through
//! [`Backend::create`]. After that, live updates flow through the typed
//! operations, and the backend calls back into the engine through the
//! callbacks it was given.
//!
//! Handles are `Rc<dyn Backend>` with `&self` receivers: a counterpart is
//! shared by its node and by the container that lays it out, and backends keep
//! their mutable state behind interior mutability. Implementations must not
//! hold an internal borrow while running an application callback, since the
//! callback may call straight back into the same counterpart.
//!
//! Typed operations check the node's kind with the helpers on
//! [`WidgetKind`](crate::props::WidgetKind) and fail with
//! [`Error::InvalidOperation`](crate::Error::InvalidOperation) on mismatch.

use std::any::Any;
use std::rc::Rc;

use crate::error::Result;
use crate::props::{Reaction, StartupProperties, Value, ValueReaction};

#[cfg(feature = "terminal")]
pub mod terminal;

// ---------------------------------------------------------------------------
// Backend trait
// ---------------------------------------------------------------------------

/// A toolkit-side counterpart of one declared node.
pub trait Backend {
    /// Materialize this node from its full properties.
    ///
    /// Containers realize their children with
    /// [`WidgetNode::realize`](crate::widget::WidgetNode::realize), in
    /// declaration order. When `properties.windowed` is set the call may block
    /// until the window is closed.
    fn create(&self, properties: &StartupProperties) -> Result<()>;

    /// Update the display title after creation.
    fn set_title(&self, title: &str) -> Result<()>;

    /// Register an additional live value-changed callback.
    fn add_value_changed_reaction(&self, reaction: ValueReaction) -> Result<()>;

    /// Register an additional live action callback.
    fn add_reaction(&self, reaction: Reaction) -> Result<()>;

    /// Push a value into the live element.
    fn set_value(&self, value: Value) -> Result<()>;

    /// Dismiss a top-level window. Fails if this element is not a window.
    fn close(&self) -> Result<()>;

    /// Mint a fresh, unattached counterpart for a not-yet-realized node.
    fn create_another_element(&self) -> Rc<dyn Backend>;

    /// Downcast to the concrete backend type.
    fn as_any(&self) -> &dyn Any;
}

/// Wire every callback carried by `properties` through `backend`.
///
/// Shared by backends so that a callback in a slot the kind does not accept
/// fails at creation, the same way a live registration would.
pub fn wire_reactions(backend: &dyn Backend, properties: &StartupProperties) -> Result<()> {
    if let Some(reaction) = &properties.text.on_change {
        backend.add_value_changed_reaction(ValueReaction::Text(reaction.clone()))?;
    }
    if let Some(reaction) = &properties.integer.on_change {
        backend.add_value_changed_reaction(ValueReaction::Integer(reaction.clone()))?;
    }
    if let Some(reaction) = &properties.float.on_change {
        backend.add_value_changed_reaction(ValueReaction::Float(reaction.clone()))?;
    }
    if let Some(reaction) = &properties.on_action {
        backend.add_reaction(reaction.clone())?;
    }
    Ok(())
}
