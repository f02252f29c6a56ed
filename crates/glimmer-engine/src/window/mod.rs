//! The winit event loop hosting one window and its GPU surface.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
