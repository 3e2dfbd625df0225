//! Built-in widgets: Container, Input, SpinBox, Button, CheckBox, and the
//! Title / Border pseudo-widgets.

pub mod button;
pub mod checkbox;
pub mod container;
pub mod input;
pub mod pseudo;

pub use button::Button;
pub use checkbox::CheckBox;
pub use container::{Container, Layout};
pub use input::{Input, SpinBox};
pub use pseudo::{Border, Title};
