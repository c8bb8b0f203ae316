//! Handlers 模块

pub mod devices;
pub mod notifications;
pub mod realtime;

pub use devices::*;
pub use notifications::*;
pub use realtime::*;
