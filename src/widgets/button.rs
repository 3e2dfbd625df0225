//! Button widget: a titled element that triggers actions.

use std::rc::Rc;

use crate::error::{Error, Result};
use crate::props::{compose_reaction, PropertyBuilder, WidgetKind};
use crate::widget::{Widget, WidgetNode};

// ---------------------------------------------------------------------------
// Button
// ---------------------------------------------------------------------------

/// A push button. Its title is its caption.
///
/// # Examples
///
/// ```
/// use dugui::widgets::{Button, Container};
///
/// let form = Container::form();
/// let submit = Button::new(form.title("Submit"));
/// submit.on_click(|| println!("submitted")).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct Button {
    node: WidgetNode,
}

impl Button {
    pub fn new(builder: PropertyBuilder) -> Self {
        Self {
            node: WidgetNode::new(builder, WidgetKind::Button),
        }
    }

    /// Attach a click action.
    ///
    /// Chained after earlier actions before realization, registered live
    /// with the backend afterwards.
    pub fn on_click(&self, reaction: impl Fn() + 'static) -> Result<()> {
        attach_action(&self.node, Rc::new(reaction))
    }
}

impl Widget for Button {
    fn node(&self) -> &WidgetNode {
        &self.node
    }
}

/// Compose into the pending action slot, or register with the backend.
pub(crate) fn attach_action(node: &WidgetNode, reaction: Rc<dyn Fn()>) -> Result<()> {
    if let Some(pending) = node.properties() {
        compose_reaction(&mut pending.borrow_mut().on_action, reaction);
        return Ok(());
    }
    match node.backend() {
        Some(backend) => backend.add_reaction(reaction),
        None => Err(Error::invalid(format!(
            "attaching an action to a {} with no backend",
            node.kind()
        ))),
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use crate::testing::{HeadlessBackend, HeadlessElement};
    use crate::widgets::Container;

    #[test]
    fn kind_is_button() {
        let form = Container::form();
        let button = Button::new(form.title("OK"));
        assert_eq!(button.kind(), WidgetKind::Button);
    }

    #[test]
    fn builder_action_and_on_click_both_fire() {
        let headless = HeadlessBackend::new();
        let clicks = Rc::new(Cell::new(0));
        let form = Container::form();

        let from_builder = clicks.clone();
        let button = Button::new(
            form.title("OK")
                .on_action(move || from_builder.set(from_builder.get() + 1)),
        );
        let declared = clicks.clone();
        button.on_click(move || declared.set(declared.get() + 10)).unwrap();
        form.run(&headless).unwrap();

        let live = clicks.clone();
        button.on_click(move || live.set(live.get() + 100)).unwrap();
        HeadlessElement::of(&button).unwrap().click().unwrap();
        assert_eq!(clicks.get(), 111);
    }

    #[test]
    fn text_callback_on_button_fails_at_realization() {
        let headless = HeadlessBackend::new();
        let button = Button::new(PropertyBuilder::new().on_text_change(|_| {}));
        let err = button.run(&headless).unwrap_err();
        assert!(err.is_invalid_operation());
    }
}
