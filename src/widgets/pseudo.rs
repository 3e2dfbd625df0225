//! Pseudo-widgets: declarative helpers that configure their parent.
//!
//! [`Title`] and [`Border`] read like widgets at the declaration site but add
//! no node to the tree and never reach a backend. Building one applies a
//! single setting from the builder to the builder's parent, then nothing of
//! it remains but a zero-sized value.

use crate::error::{Error, Result};
use crate::props::PropertyBuilder;
use crate::widget::WidgetNode;

fn parent_of(builder: &PropertyBuilder, helper: &str) -> Result<WidgetNode> {
    builder
        .parent()
        .ok_or_else(|| Error::invalid(format!("{helper} needs a living parent to apply to")))
}

/// Applies the builder's title to its parent.
///
/// # Examples
///
/// ```
/// use dugui::widgets::{Container, Title};
/// use dugui::widget::Widget;
///
/// let window = Container::vertical();
/// let _title = Title::new(window.title("Set address")).unwrap();
/// assert_eq!(window.node().properties().unwrap().borrow().title, "Set address");
/// assert!(window.children().is_empty());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Title;

impl Title {
    pub fn new(builder: PropertyBuilder) -> Result<Self> {
        let parent = parent_of(&builder, "Title")?;
        let title = builder.properties().borrow().title.clone();
        parent.set_title(&title)?;
        Ok(Title)
    }
}

/// Applies the builder's border flag to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Border;

impl Border {
    pub fn new(builder: PropertyBuilder) -> Result<Self> {
        let parent = parent_of(&builder, "Border")?;
        let border = builder.properties().borrow().border;
        parent.set_border(border)?;
        Ok(Border)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props::Value;
    use crate::testing::{HeadlessBackend, HeadlessElement};
    use crate::widget::Widget;
    use crate::widgets::Container;

    #[test]
    fn title_sets_parent_title_without_child() {
        let form = Container::form();
        let _title = Title::new(form.title("Address")).unwrap();
        let pending = form.node().properties().unwrap();
        assert_eq!(pending.borrow().title, "Address");
        assert_eq!(pending.borrow().child_count(), 0);
    }

    #[test]
    fn border_sets_parent_flag() {
        let form = Container::form();
        let _border = Border::new(form.standard_border()).unwrap();
        assert!(form.node().properties().unwrap().borrow().border);
        let _border = Border::new(form.no_border()).unwrap();
        assert!(!form.node().properties().unwrap().borrow().border);
    }

    #[test]
    fn root_builder_is_rejected() {
        assert!(Title::new(PropertyBuilder::new().title("x")).is_err());
        assert!(Border::new(PropertyBuilder::new()).is_err());
    }

    #[test]
    fn title_after_realization_goes_live() {
        let headless = HeadlessBackend::new();
        let form = Container::form();
        form.run(&headless).unwrap();
        let _title = Title::new(form.title("Renamed")).unwrap();
        let element = HeadlessElement::of(&form).unwrap();
        assert_eq!(element.title(), "Renamed");
        assert_eq!(element.value(), None::<Value>);
    }

    #[test]
    fn border_after_realization_fails() {
        let headless = HeadlessBackend::new();
        let form = Container::form();
        form.run(&headless).unwrap();
        assert!(Border::new(form.standard_border()).unwrap_err().is_invalid_operation());
    }

    #[test]
    fn pseudo_widgets_are_zero_sized() {
        assert_eq!(std::mem::size_of::<Title>(), 0);
        assert_eq!(std::mem::size_of::<Border>(), 0);
    }
}
