//! Contract between the runtime loop and applications.
//!
//! Applications implement [`App`] and receive a [`FrameCtx`] once per frame;
//! runtime internals (event loop, window table) stay out of user code.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
