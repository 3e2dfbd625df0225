//! Widget trait: the lifecycle operations every declared element shares.
//!
//! Concrete widgets wrap a [`WidgetNode`] and add typed state on top. The
//! provided methods forward to the node, so `run` and `close` read the same
//! on a form, an input or a bare node.

use crate::backend::Backend;
use crate::error::Result;
use crate::props::WidgetKind;

use super::lifecycle::Lifecycle;
use super::node::WidgetNode;

// ---------------------------------------------------------------------------
// Widget trait
// ---------------------------------------------------------------------------

/// Implemented by every declared element.
pub trait Widget {
    /// The underlying tree node.
    fn node(&self) -> &WidgetNode;

    fn kind(&self) -> WidgetKind {
        self.node().kind()
    }

    fn parent(&self) -> Option<WidgetNode> {
        self.node().parent()
    }

    fn lifecycle(&self) -> Lifecycle {
        self.node().lifecycle()
    }

    fn is_realized(&self) -> bool {
        self.node().is_realized()
    }

    /// Realize as a top-level window. See [`WidgetNode::run`].
    fn run(&self, backend: &dyn Backend) -> Result<()> {
        self.node().run(backend)
    }

    /// Dismiss the window. See [`WidgetNode::close`].
    fn close(&self) -> Result<()> {
        self.node().close()
    }
}

impl Widget for WidgetNode {
    fn node(&self) -> &WidgetNode {
        self
    }
}

// ===========================================================================
// Tests
// ===========================================================================
