//! WidgetNode: one element of the declared tree.
//!
//! A node starts out *declared*: it holds a pending [`StartupProperties`]
//! payload and no backend. `run` on the root mints backend counterparts for
//! the whole tree (parent first), then realizes the root; container backends
//! realize their children in turn. Realization hands the payload to the
//! backend exactly once and drops the node's handle to it, after which only
//! backend operations remain.
//!
//! Nodes link to their parent weakly and never change parent. Children are
//! linked from the parent's payload: statically (the declaring scope owns the
//! child) or shared (the container owns it, see
//! [`Container::adopt`](crate::widgets::Container::adopt)).

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::backend::Backend;
use crate::error::{Error, Result};
use crate::props::properties::ChildLink;
use crate::props::{PropertiesHandle, PropertyBuilder, WidgetKind};

use super::lifecycle::Lifecycle;

// ---------------------------------------------------------------------------
// NodeCore
// ---------------------------------------------------------------------------

/// Shared state behind a [`WidgetNode`] handle.
pub(crate) struct NodeCore {
    /// Pending configuration. `None` once realized.
    properties: RefCell<Option<PropertiesHandle>>,
    parent: Option<Weak<NodeCore>>,
    backend: RefCell<Option<Rc<dyn Backend>>>,
    /// Kind as of realization, kept after the payload is released.
    kind: Cell<WidgetKind>,
    /// Child links carried over from the released payload.
    realized_children: RefCell<Vec<ChildLink>>,
}

// ---------------------------------------------------------------------------
// WidgetNode
// ---------------------------------------------------------------------------

/// Handle to a declared (and possibly realized) element.
///
/// Cloning the handle does not clone the element.
#[derive(Clone)]
pub struct WidgetNode {
    core: Rc<NodeCore>,
}

impl WidgetNode {
    /// Declare a node of `kind` from a builder chain.
    ///
    /// If the builder names a parent, the node is appended to the parent's
    /// children as a static child. A parent that was already realized (or
    /// dropped) takes no new children: the node is still returned, logged
    /// with a warning, and will never be realized.
    pub fn new(builder: PropertyBuilder, kind: WidgetKind) -> Self {
        let (properties, parent) = builder.into_parts();
        properties.borrow_mut().kind = kind;
        let core = Rc::new(NodeCore {
            properties: RefCell::new(Some(properties)),
            parent,
            backend: RefCell::new(None),
            kind: Cell::new(kind),
            realized_children: RefCell::new(Vec::new()),
        });

        if let Some(weak) = &core.parent {
            match weak.upgrade() {
                Some(parent) => match parent.properties.borrow().as_ref() {
                    Some(pending) => pending.borrow_mut().push_static(&core),
                    None => log::warn!(
                        "{kind} declared under an already realized parent; it will never be realized"
                    ),
                },
                None => log::warn!("{kind} declared under a parent that no longer exists"),
            }
        }

        Self { core }
    }

    /// Declare a parentless node of `kind`.
    pub fn root(kind: WidgetKind) -> Self {
        Self::new(PropertyBuilder::new(), kind)
    }

    pub(crate) fn from_core(core: Rc<NodeCore>) -> Self {
        Self { core }
    }

    pub(crate) fn core(&self) -> &Rc<NodeCore> {
        &self.core
    }

    // -- queries ---------------------------------------------------------

    pub fn kind(&self) -> WidgetKind {
        match self.properties() {
            Some(pending) => pending.borrow().kind,
            None => self.core.kind.get(),
        }
    }

    /// The pending payload, or `None` once realized.
    pub fn properties(&self) -> Option<PropertiesHandle> {
        self.core.properties.borrow().clone()
    }

    /// The backend counterpart, once minted.
    pub fn backend(&self) -> Option<Rc<dyn Backend>> {
        self.core.backend.borrow().clone()
    }

    pub fn parent(&self) -> Option<WidgetNode> {
        self.core
            .parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(Self::from_core)
    }

    /// Whether this node was declared without a parent.
    pub fn is_root(&self) -> bool {
        self.core.parent.is_none()
    }

    /// Walk parent links up to the top of the tree.
    pub fn root_node(&self) -> WidgetNode {
        let mut current = self.clone();
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    pub fn lifecycle(&self) -> Lifecycle {
        Lifecycle::from_parts(
            self.core.backend.borrow().is_some(),
            self.core.properties.borrow().is_some(),
        )
    }

    /// Whether the payload was already handed to a backend.
    pub fn is_realized(&self) -> bool {
        self.core.properties.borrow().is_none()
    }

    /// Children in declaration order, before or after realization.
    pub fn children(&self) -> Vec<WidgetNode> {
        match self.properties() {
            Some(pending) => pending.borrow().children(),
            None => self
                .core
                .realized_children
                .borrow()
                .iter()
                .filter_map(ChildLink::upgrade)
                .map(Self::from_core)
                .collect(),
        }
    }

    /// Whether both handles refer to the same element.
    pub fn ptr_eq(&self, other: &WidgetNode) -> bool {
        Rc::ptr_eq(&self.core, &other.core)
    }

    // -- declaration-phase mutation ---------------------------------------

    fn pending(&self, operation: &str) -> Result<PropertiesHandle> {
        self.properties().ok_or_else(|| {
            Error::invalid(format!(
                "{operation} on a {} that was already realized",
                self.kind()
            ))
        })
    }

    /// Change the kind before realization.
    pub fn set_kind(&self, kind: WidgetKind) -> Result<()> {
        self.pending("setting the kind")?.borrow_mut().kind = kind;
        self.core.kind.set(kind);
        Ok(())
    }

    /// Update the title: pending before realization, live afterwards.
    pub fn set_title(&self, title: &str) -> Result<()> {
        if let Some(pending) = self.properties() {
            pending.borrow_mut().title = title.to_owned();
            return Ok(());
        }
        match self.backend() {
            Some(backend) => backend.set_title(title),
            None => Err(Error::invalid("setting the title of a node with no backend")),
        }
    }

    /// Set the border flag. Only possible before realization.
    pub fn set_border(&self, border: bool) -> Result<()> {
        self.pending("changing the border")?.borrow_mut().border = border;
        Ok(())
    }

    // -- realization -----------------------------------------------------

    /// Realize this root as a top-level window against `parent_backend`.
    ///
    /// Mints backend counterparts for the whole declared tree, then creates
    /// the root. May block while the backend runs the window.
    pub fn run(&self, parent_backend: &dyn Backend) -> Result<()> {
        if !self.is_root() {
            return Err(Error::invalid(format!(
                "run called on a {} that has a parent",
                self.kind()
            )));
        }
        let pending = self.pending("run")?;
        self.check_declared()?;
        pending.borrow_mut().windowed = true;
        log::debug!("running {} as a top-level window", self.kind());
        self.propagate_backends(parent_backend);
        self.realize()
    }

    /// Check every payload in the declared subtree against the capability
    /// table, so a bad node fails `run` before anything is realized.
    fn check_declared(&self) -> Result<()> {
        let pending = self.pending("realize")?;
        let children = {
            let pending = pending.borrow();
            pending.check_capabilities()?;
            pending.children()
        };
        children.iter().try_for_each(WidgetNode::check_declared)
    }

    /// Give this node and its declared subtree a backend counterpart,
    /// parent before children.
    pub(crate) fn propagate_backends(&self, parent_backend: &dyn Backend) {
        let backend = self
            .core
            .backend
            .borrow_mut()
            .get_or_insert_with(|| parent_backend.create_another_element())
            .clone();
        log::trace!("backend ready for {}", self.kind());

        let children = match self.properties() {
            Some(pending) => pending.borrow().children(),
            None => Vec::new(),
        };
        for child in children {
            child.propagate_backends(backend.as_ref());
        }
    }

    /// Hand the pending payload to this node's backend.
    ///
    /// Container backends call this for each child during their own
    /// `create`. Fails if the node has no backend yet, was already realized,
    /// or never had its kind set.
    ///
    /// The payload is released before `create` runs and is not given back if
    /// `create` fails: the node stays realized and cannot be run again.
    pub fn realize(&self) -> Result<()> {
        let backend = self.backend().ok_or_else(|| {
            Error::invalid(format!(
                "realizing a {} before its backend exists",
                self.kind()
            ))
        })?;
        let pending = self.pending("realize")?;
        let kind = pending.borrow().kind;
        kind.ensure_set()?;

        self.core.kind.set(kind);
        *self.core.realized_children.borrow_mut() = pending.borrow().links();
        *self.core.properties.borrow_mut() = None;
        log::debug!("realizing {kind}");

        let created = backend.create(&pending.borrow());
        if let Err(err) = &created {
            log::warn!("creating {kind} failed: {err}");
        }
        created
    }

    /// Dismiss this node's window.
    pub fn close(&self) -> Result<()> {
        match self.backend() {
            Some(backend) => backend.close(),
            None => Err(Error::invalid("closing a window before it is open")),
        }
    }
}

impl fmt::Debug for WidgetNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetNode")
            .field("kind", &self.kind())
            .field("lifecycle", &self.lifecycle())
            .finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::HeadlessBackend;

    #[test]
    fn root_has_no_parent() {
        let root = WidgetNode::root(WidgetKind::VerticalBox);
        assert!(root.is_root());
        assert_eq!(root.lifecycle(), Lifecycle::Declared);
        assert!(root.parent().is_none());
        assert!(!root.is_realized());
        assert!(root.backend().is_none());
    }

    #[test]
    fn declaring_under_parent_registers_static_child() {
        let root = WidgetNode::root(WidgetKind::Form);
        let a = WidgetNode::new(PropertyBuilder::with_parent(&root), WidgetKind::TextField);
        let b = WidgetNode::new(PropertyBuilder::with_parent(&root), WidgetKind::Button);

        let children = root.children();
        assert_eq!(children.len(), 2);
        assert!(children[0].ptr_eq(&a));
        assert!(children[1].ptr_eq(&b));
        assert!(a.parent().unwrap().ptr_eq(&root));
        assert!(!root.properties().unwrap().borrow().is_shared_child(0));
    }

    #[test]
    fn dropped_static_child_is_skipped() {
        let root = WidgetNode::root(WidgetKind::VerticalBox);
        let kept = WidgetNode::new(PropertyBuilder::with_parent(&root), WidgetKind::Button);
        drop(WidgetNode::new(
            PropertyBuilder::with_parent(&root),
            WidgetKind::Button,
        ));
        let children = root.children();
        assert_eq!(children.len(), 1);
        assert!(children[0].ptr_eq(&kept));
        assert_eq!(root.properties().unwrap().borrow().child_count(), 2);
    }

    #[test]
    fn root_node_walks_up() {
        let root = WidgetNode::root(WidgetKind::VerticalBox);
        let middle = WidgetNode::new(
            PropertyBuilder::with_parent(&root),
            WidgetKind::HorizontalBox,
        );
        let leaf = WidgetNode::new(PropertyBuilder::with_parent(&middle), WidgetKind::Button);
        assert!(leaf.root_node().ptr_eq(&root));
        assert!(root.root_node().ptr_eq(&root));
    }

    #[test]
    fn run_unset_fails() {
        let headless = HeadlessBackend::new();
        let node = WidgetNode::root(WidgetKind::Unset);
        let err = node.run(&headless).unwrap_err();
        assert!(err.is_invalid_operation());
        assert!(!node.is_realized());
        assert_eq!(node.lifecycle(), Lifecycle::Declared);
    }

    #[test]
    fn unset_descendant_fails_run_before_anything_is_realized() {
        let headless = HeadlessBackend::new();
        let root = WidgetNode::root(WidgetKind::VerticalBox);
        let ok = WidgetNode::new(PropertyBuilder::with_parent(&root).title("OK"), WidgetKind::Button);
        let row = WidgetNode::new(PropertyBuilder::with_parent(&root), WidgetKind::HorizontalBox);
        let broken = WidgetNode::new(PropertyBuilder::with_parent(&row), WidgetKind::Unset);

        let err = root.run(&headless).unwrap_err();
        assert!(err.is_invalid_operation());
        for node in [&root, &ok, &row, &broken] {
            assert_eq!(node.lifecycle(), Lifecycle::Declared);
        }
        assert_eq!(headless.element_count(), 0);

        broken.set_kind(WidgetKind::Button).unwrap();
        root.run(&headless).unwrap();
        assert!(ok.is_realized());
        assert!(broken.is_realized());
    }

    #[test]
    fn declaring_under_realized_parent_is_not_linked() {
        let headless = HeadlessBackend::new();
        let root = WidgetNode::root(WidgetKind::VerticalBox);
        root.run(&headless).unwrap();

        let late = WidgetNode::new(PropertyBuilder::with_parent(&root), WidgetKind::Button);
        assert!(root.children().is_empty());
        assert!(late.parent().unwrap().ptr_eq(&root));
        assert_eq!(late.lifecycle(), Lifecycle::Declared);
    }

    #[test]
    fn misplaced_callback_fails_run_before_anything_is_realized() {
        let headless = HeadlessBackend::new();
        let root = WidgetNode::root(WidgetKind::Form);
        let first = WidgetNode::new(PropertyBuilder::with_parent(&root), WidgetKind::TextField);
        let _button = WidgetNode::new(
            PropertyBuilder::with_parent(&root).on_text_change(|_| {}),
            WidgetKind::Button,
        );

        assert!(root.run(&headless).unwrap_err().is_invalid_operation());
        assert_eq!(root.lifecycle(), Lifecycle::Declared);
        assert_eq!(first.lifecycle(), Lifecycle::Declared);
    }

    #[test]
    fn run_realizes_once() {
        let headless = HeadlessBackend::new();
        let node = WidgetNode::new(
            PropertyBuilder::new().title("Name").default_text("X"),
            WidgetKind::TextField,
        );
        node.run(&headless).unwrap();
        assert!(node.is_realized());
        assert!(node.properties().is_none());
        assert!(node.run(&headless).unwrap_err().is_invalid_operation());
        assert!(node.realize().unwrap_err().is_invalid_operation());
    }

    #[test]
    fn run_on_child_fails() {
        let headless = HeadlessBackend::new();
        let root = WidgetNode::root(WidgetKind::VerticalBox);
        let child = WidgetNode::new(PropertyBuilder::with_parent(&root), WidgetKind::Button);
        assert!(child.run(&headless).unwrap_err().is_invalid_operation());
    }

    #[test]
    fn realize_without_backend_fails() {
        let node = WidgetNode::root(WidgetKind::Button);
        assert!(node.realize().unwrap_err().is_invalid_operation());
    }

    #[test]
    fn close_before_open_fails() {
        let node = WidgetNode::root(WidgetKind::Form);
        let err = node.close().unwrap_err();
        assert!(err.is_invalid_operation());
    }

    #[test]
    fn set_kind_and_border_only_before_realization() {
        let headless = HeadlessBackend::new();
        let node = WidgetNode::root(WidgetKind::Unset);
        node.set_kind(WidgetKind::Form).unwrap();
        node.set_border(true).unwrap();
        assert!(node.properties().unwrap().borrow().border);
        node.run(&headless).unwrap();
        assert_eq!(node.kind(), WidgetKind::Form);
        assert!(node.set_border(false).is_err());
        assert!(node.set_kind(WidgetKind::Button).is_err());
    }

    #[test]
    fn children_survive_realization() {
        let headless = HeadlessBackend::new();
        let root = WidgetNode::root(WidgetKind::VerticalBox);
        let child = WidgetNode::new(PropertyBuilder::with_parent(&root), WidgetKind::Button);
        root.run(&headless).unwrap();
        let children = root.children();
        assert_eq!(children.len(), 1);
        assert!(children[0].ptr_eq(&child));
        assert!(child.is_realized());
    }
}
