//! CheckBox widget: a titled toggle.
//!
//! The checked state travels over the integer channel (non-zero is checked),
//! so the widget keeps it in memory the same way an integer input does.
//! Toggle actions travel over the action channel, like button clicks.

use std::cell::Cell;
use std::rc::Rc;

use crate::error::Result;
use crate::props::{PropertyBuilder, Value, WidgetKind};
use crate::widget::{Widget, WidgetNode};

use super::button::attach_action;

/// A check box with an in-memory checked flag.
#[derive(Debug, Clone)]
pub struct CheckBox {
    node: WidgetNode,
    checked: Rc<Cell<bool>>,
}

impl CheckBox {
    pub fn new(builder: PropertyBuilder) -> Self {
        let initial = builder.properties().borrow().integer.default.unwrap_or(0) != 0;
        let checked = Rc::new(Cell::new(initial));
        let sink = Rc::clone(&checked);
        let builder = builder.on_integer_change(move |state| sink.set(*state != 0));
        Self {
            node: WidgetNode::new(builder, WidgetKind::CheckBox),
            checked,
        }
    }

    /// The last known checked state.
    pub fn is_checked(&self) -> bool {
        self.checked.get()
    }

    /// Check or uncheck: the initial state before realization, live after.
    pub fn set_checked(&self, checked: bool) -> Result<()> {
        self.checked.set(checked);
        let state = i64::from(checked);
        if let Some(pending) = self.node.properties() {
            pending.borrow_mut().integer.default = Some(state);
        } else if let Some(backend) = self.node.backend() {
            backend.set_value(Value::Integer(state))?;
        }
        Ok(())
    }

    /// Attach an action run on every toggle.
    pub fn on_toggle(&self, reaction: impl Fn() + 'static) -> Result<()> {
        attach_action(&self.node, Rc::new(reaction))
    }
}

impl Widget for CheckBox {
    fn node(&self) -> &WidgetNode {
        &self.node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{HeadlessBackend, HeadlessElement};
    use crate::widgets::Container;

    #[test]
    fn initial_state_from_default() {
        let form = Container::form();
        let off = CheckBox::new(form.title("Off"));
        let on = CheckBox::new(form.title("On").default_integer(1));
        assert!(!off.is_checked());
        assert!(on.is_checked());
        assert_eq!(on.kind(), WidgetKind::CheckBox);
    }

    #[test]
    fn click_toggles_and_fires_actions() {
        let headless = HeadlessBackend::new();
        let form = Container::form();
        let newsletter = CheckBox::new(form.title("Newsletter"));
        let toggles = Rc::new(Cell::new(0));
        let count = toggles.clone();
        newsletter.on_toggle(move || count.set(count.get() + 1)).unwrap();
        form.run(&headless).unwrap();

        let element = HeadlessElement::of(&newsletter).unwrap();
        element.click().unwrap();
        assert!(newsletter.is_checked());
        element.click().unwrap();
        assert!(!newsletter.is_checked());
        assert_eq!(toggles.get(), 2);
    }

    #[test]
    fn set_checked_live() {
        let headless = HeadlessBackend::new();
        let form = Container::form();
        let flag = CheckBox::new(form.title("Flag"));
        flag.set_checked(true).unwrap();
        form.run(&headless).unwrap();

        let element = HeadlessElement::of(&flag).unwrap();
        assert_eq!(element.value(), Some(Value::Integer(1)));
        flag.set_checked(false).unwrap();
        assert_eq!(element.value(), Some(Value::Integer(0)));
    }
}
