//! Container widget: a node that holds and lays out children.
//!
//! Children are declared through the container's own builder factories
//! ([`Container::title`], [`Container::builder`], ...). Each factory starts a
//! fresh payload parented to the container, so a child never inherits the
//! container's own pending configuration. How children are arranged is up to
//! the backend; the container only records the layout intent.

use crate::error::{Error, Result};
use crate::props::{FieldValue, PropertyBuilder, WidgetKind};
use crate::widget::{Widget, WidgetNode};

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// How a container asks the backend to arrange its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    /// One labelled row per child.
    Form,
    /// Left to right.
    Horizontal,
    /// Top to bottom.
    Vertical,
}

impl Layout {
    pub fn kind(self) -> WidgetKind {
        match self {
            Layout::Form => WidgetKind::Form,
            Layout::Horizontal => WidgetKind::HorizontalBox,
            Layout::Vertical => WidgetKind::VerticalBox,
        }
    }

    /// The layout of a container kind, if it is one.
    pub fn from_kind(kind: WidgetKind) -> Option<Self> {
        match kind {
            WidgetKind::Form => Some(Layout::Form),
            WidgetKind::HorizontalBox => Some(Layout::Horizontal),
            WidgetKind::VerticalBox => Some(Layout::Vertical),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Container
// ---------------------------------------------------------------------------

/// A layout container.
///
/// # Examples
///
/// ```
/// use dugui::widgets::{Button, Container, Input};
///
/// let form = Container::form();
/// let name: Input<String> = Input::new(form.title("Name").placeholder_text("Ada"));
/// let submit = Button::new(form.title("Submit"));
/// assert_eq!(form.children().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Container {
    node: WidgetNode,
}

impl Container {
    /// Declare a root container.
    pub fn new(layout: Layout) -> Self {
        Self {
            node: WidgetNode::root(layout.kind()),
        }
    }

    pub fn form() -> Self {
        Self::new(Layout::Form)
    }

    pub fn horizontal() -> Self {
        Self::new(Layout::Horizontal)
    }

    pub fn vertical() -> Self {
        Self::new(Layout::Vertical)
    }

    /// Declare a container from a builder, nested under the builder's parent.
    pub fn nested(builder: PropertyBuilder, layout: Layout) -> Self {
        Self {
            node: WidgetNode::new(builder, layout.kind()),
        }
    }

    pub fn layout(&self) -> Option<Layout> {
        Layout::from_kind(self.node.kind())
    }

    /// Children in declaration order.
    pub fn children(&self) -> Vec<WidgetNode> {
        self.node.children()
    }

    /// Take ownership of a child declared under this container.
    ///
    /// The child keeps its position; from now on it lives as long as the
    /// container, whatever happens to the handle the caller held.
    pub fn adopt<W: Widget>(&self, widget: W) -> Result<()> {
        let child = widget.node();
        let is_ours = child
            .parent()
            .is_some_and(|parent| parent.ptr_eq(&self.node));
        if !is_ours {
            return Err(Error::invalid(format!(
                "cannot adopt a {} declared under another parent",
                child.kind()
            )));
        }
        let pending = self.node.properties().ok_or_else(|| {
            Error::invalid(format!("adopting into a {} that was already realized", self.node.kind()))
        })?;
        if pending.borrow_mut().promote_to_shared(child.core()) {
            Ok(())
        } else {
            Err(Error::invalid(format!(
                "{} is not among this container's children",
                child.kind()
            )))
        }
    }

    // -- child builder factories ----------------------------------------

    /// A blank builder for a child of this container.
    pub fn builder(&self) -> PropertyBuilder {
        PropertyBuilder::with_parent(&self.node)
    }

    pub fn title(&self, text: impl Into<String>) -> PropertyBuilder {
        self.builder().title(text)
    }

    pub fn placeholder_text(&self, text: impl Into<String>) -> PropertyBuilder {
        self.builder().placeholder_text(text)
    }

    pub fn default_value<T: FieldValue>(&self, value: T) -> PropertyBuilder {
        self.builder().default_value(value)
    }

    pub fn no_border(&self) -> PropertyBuilder {
        self.builder().no_border()
    }

    pub fn standard_border(&self) -> PropertyBuilder {
        self.builder().standard_border()
    }

    pub fn on_action(&self, reaction: impl Fn() + 'static) -> PropertyBuilder {
        self.builder().on_action(reaction)
    }

    pub fn on_change<T: FieldValue>(&self, reaction: impl Fn(&T) + 'static) -> PropertyBuilder {
        self.builder().on_change(reaction)
    }
}

impl Widget for Container {
    fn node(&self) -> &WidgetNode {
        &self.node
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::{Button, Input};

    #[test]
    fn layouts_map_to_kinds() {
        assert_eq!(Container::form().kind(), WidgetKind::Form);
        assert_eq!(Container::horizontal().kind(), WidgetKind::HorizontalBox);
        assert_eq!(Container::vertical().kind(), WidgetKind::VerticalBox);
        assert_eq!(Container::vertical().layout(), Some(Layout::Vertical));
        assert_eq!(Layout::from_kind(WidgetKind::Button), None);
    }

    #[test]
    fn factory_children_keep_declaration_order() {
        let form = Container::form();
        let first = Button::new(form.title("a"));
        let second = Button::new(form.title("b"));
        let third = Button::new(form.title("c"));

        let children = form.children();
        assert_eq!(children.len(), 3);
        for (child, expected) in children.iter().zip([&first, &second, &third]) {
            assert!(child.ptr_eq(expected.node()));
            assert!(child.parent().unwrap().ptr_eq(form.node()));
        }
    }

    #[test]
    fn factory_starts_from_clean_slate() {
        let form = Container::form();
        form.node().set_title("Form title").unwrap();
        let builder = form.placeholder_text("hint");
        let props = builder.properties().borrow();
        assert!(props.title.is_empty());
        assert_eq!(props.placeholder_text, "hint");
    }

    #[test]
    fn nested_containers() {
        let outer = Container::vertical();
        let row = Container::nested(outer.no_border(), Layout::Horizontal);
        let _ok = Button::new(row.title("OK"));
        assert_eq!(outer.children().len(), 1);
        assert_eq!(row.children().len(), 1);
        assert!(row.parent().unwrap().ptr_eq(outer.node()));
    }

    #[test]
    fn adopt_keeps_child_alive_and_in_place() {
        let form = Container::form();
        let _before = Button::new(form.title("before"));
        let adopted: Input<String> = Input::new(form.title("adopted"));
        let _after = Button::new(form.title("after"));

        form.adopt(adopted).unwrap();
        let children = form.children();
        assert_eq!(children.len(), 3);
        assert_eq!(children[1].kind(), WidgetKind::TextField);
        let props = form.node().properties().unwrap();
        assert!(props.borrow().is_shared_child(1));
        assert!(!props.borrow().is_shared_child(0));
    }

    #[test]
    fn adopt_foreign_child_fails() {
        let left = Container::vertical();
        let right = Container::vertical();
        let button = Button::new(left.title("x"));
        let err = right.adopt(button).unwrap_err();
        assert!(err.is_invalid_operation());
    }
}
