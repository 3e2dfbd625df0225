//! Widget system: tree nodes, the widget trait, lifecycle states.

pub mod lifecycle;
pub mod node;
pub mod traits;

pub use lifecycle::Lifecycle;
pub use node::WidgetNode;
pub use traits::Widget;
