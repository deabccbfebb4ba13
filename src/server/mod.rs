//! TCP accept loop and task-per-connection dispatch.

pub mod listener;

pub use listener::Listener;
