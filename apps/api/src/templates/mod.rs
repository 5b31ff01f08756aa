// Template catalogue, base-chain resolution, scoped CSS and per-session selection.

pub mod catalogue;
pub mod css;
pub mod handlers;
pub mod registry;
pub mod selection;

pub use registry::TemplateRegistry;
