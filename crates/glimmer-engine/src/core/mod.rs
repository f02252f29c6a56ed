//! The contract between the window runtime and an application.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::FrameCtx;
