//! # dugui
//!
//! Declarative widget composition with a late-bound rendering backend.
//!
//! An application declares a tree of widgets and their properties through
//! fluent builders, without committing to a toolkit. One call to `run` on the
//! root then realizes the whole tree against a [`Backend`](backend::Backend),
//! which shows it and calls back into the application when the user edits a
//! value or triggers an action.
//!
//! ```
//! use dugui::testing::{HeadlessBackend, HeadlessElement};
//! use dugui::widget::Widget;
//! use dugui::widgets::{Button, Container, Input, Title};
//!
//! let window = Container::form();
//! Title::new(window.title("Set name")).unwrap();
//! let first: Input<String> = Input::new(window.title("First name"));
//! let ok = Button::new(window.title("OK"));
//!
//! let headless = HeadlessBackend::new();
//! window.run(&headless).unwrap();
//! HeadlessElement::of(&first).unwrap().edit("Ada").unwrap();
//! assert_eq!(first.get(), "Ada");
//! # let _ = ok;
//! ```
//!
//! ## Core Systems
//!
//! - **[`props`]**: Widget kinds, typed values, the properties payload and its builder
//! - **[`widget`]**: Widget nodes, the `Widget` trait, lifecycle
//! - **[`widgets`]**: Containers, typed inputs, buttons, check boxes, pseudo-widgets
//! - **[`backend`]**: The backend contract, plus the crossterm terminal backend
//! - **[`testing`]**: Headless backend for driving trees in tests

pub mod error;

// Declaration
pub mod props;

// Widget system
pub mod widget;
pub mod widgets;

// Realization
pub mod backend;
pub mod testing;

pub use error::{Error, Result};
