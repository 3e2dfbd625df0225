//! Headless testing framework.
//!
//! Use [`HeadlessBackend`] as the application context to run a declared tree
//! without a terminal. Realized widgets are reached through
//! [`HeadlessElement::of`], which can then play the user: edit fields, click
//! buttons, close windows. The session keeps an ordered [`Call`] log for
//! assertions about what the engine asked of the backend.

pub mod headless;

pub use headless::{Call, ElementId, HeadlessBackend, HeadlessElement};
