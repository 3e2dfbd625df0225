//! Widget kinds and the operations each kind accepts.
//!
//! The capability checks here are the part of the backend contract that does
//! not depend on any toolkit: every backend calls them before honoring a typed
//! operation, so a text callback on a button fails the same way everywhere.

use std::fmt;

use super::value::Domain;
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// WidgetKind
// ---------------------------------------------------------------------------

/// The closed set of element kinds a backend knows how to materialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WidgetKind {
    /// Not set yet. Realizing a node of this kind fails.
    #[default]
    Unset,
    /// Two-column container: one label/field row per child.
    Form,
    /// Container laying children out left to right.
    HorizontalBox,
    /// Container laying children out top to bottom.
    VerticalBox,
    TextField,
    IntegerField,
    FloatField,
    CheckBox,
    SpinBox,
    Button,
}

impl WidgetKind {
    /// Human-readable name, used in error messages and logs.
    pub fn name(self) -> &'static str {
        match self {
            WidgetKind::Unset => "Unset",
            WidgetKind::Form => "Form",
            WidgetKind::HorizontalBox => "HorizontalBox",
            WidgetKind::VerticalBox => "VerticalBox",
            WidgetKind::TextField => "TextField",
            WidgetKind::IntegerField => "IntegerField",
            WidgetKind::FloatField => "FloatField",
            WidgetKind::CheckBox => "CheckBox",
            WidgetKind::SpinBox => "SpinBox",
            WidgetKind::Button => "Button",
        }
    }

    /// Whether nodes of this kind hold children.
    pub fn is_container(self) -> bool {
        matches!(
            self,
            WidgetKind::Form | WidgetKind::HorizontalBox | WidgetKind::VerticalBox
        )
    }

    /// The value domain a live element of this kind reports, if any.
    pub fn domain(self) -> Option<Domain> {
        match self {
            WidgetKind::TextField => Some(Domain::Text),
            WidgetKind::IntegerField | WidgetKind::CheckBox | WidgetKind::SpinBox => {
                Some(Domain::Integer)
            }
            WidgetKind::FloatField => Some(Domain::Float),
            _ => None,
        }
    }

    /// Whether a value-changed reaction of `domain` may be attached.
    pub fn accepts_value_reaction(self, domain: Domain) -> bool {
        self.domain() == Some(domain)
    }

    /// Whether a value of `domain` may be pushed into a live element.
    pub fn accepts_value(self, domain: Domain) -> bool {
        self.domain() == Some(domain)
    }

    /// Whether a no-argument action reaction may be attached.
    pub fn accepts_action(self) -> bool {
        matches!(self, WidgetKind::CheckBox | WidgetKind::Button)
    }

    /// Fail unless a value-changed reaction of `domain` fits this kind.
    pub fn ensure_value_reaction(self, domain: Domain) -> Result<()> {
        if self.accepts_value_reaction(domain) {
            Ok(())
        } else {
            Err(Error::invalid(format!(
                "cannot attach a {domain} value callback to a widget of kind {self}"
            )))
        }
    }

    /// Fail unless a value of `domain` may be set on this kind.
    pub fn ensure_value(self, domain: Domain) -> Result<()> {
        if self.accepts_value(domain) {
            Ok(())
        } else {
            Err(Error::invalid(format!(
                "cannot set a {domain} value on a widget of kind {self}"
            )))
        }
    }

    /// Fail unless an action reaction fits this kind.
    pub fn ensure_action(self) -> Result<()> {
        if self.accepts_action() {
            Ok(())
        } else {
            Err(Error::invalid(format!(
                "cannot attach an action callback to a widget of kind {self}"
            )))
        }
    }

    /// Fail for `Unset`; every other kind can display a title.
    pub fn ensure_set(self) -> Result<()> {
        if self == WidgetKind::Unset {
            Err(Error::invalid("widget kind was never set"))
        } else {
            Ok(())
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
