//! Tab order over the interactive elements of a window.

use super::state::ElementId;

/// Ordered list of focusable elements for tab navigation.
///
/// Focus cycles forward (Tab) or backward (Shift+Tab) and wraps around.
#[derive(Debug, Default)]
pub struct FocusChain {
    nodes: Vec<ElementId>,
    current: Option<usize>,
}

impl FocusChain {
    /// Create a chain over `nodes` in tab order, with nothing focused yet.
    pub fn new(nodes: Vec<ElementId>) -> Self {
        Self {
            nodes,
            current: None,
        }
    }

    /// The focused element, if any.
    pub fn current(&self) -> Option<ElementId> {
        self.current.and_then(|idx| self.nodes.get(idx).copied())
    }

    /// Move focus to the next element. Returns the newly focused element.
    pub fn focus_next(&mut self) -> Option<ElementId> {
        if self.nodes.is_empty() {
            return None;
        }
        let next = match self.current {
            Some(idx) => (idx + 1) % self.nodes.len(),
            None => 0,
        };
        self.current = Some(next);
        self.nodes.get(next).copied()
    }

    /// Move focus to the previous element. Returns the newly focused element.
    pub fn focus_previous(&mut self) -> Option<ElementId> {
        if self.nodes.is_empty() {
            return None;
        }
        let prev = match self.current {
            Some(0) | None => self.nodes.len() - 1,
            Some(idx) => idx - 1,
        };
        self.current = Some(prev);
        self.nodes.get(prev).copied()
    }

    /// Number of focusable elements.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the chain has nothing to focus.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
