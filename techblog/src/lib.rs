mod error;

pub mod config;
#[cfg(feature = "date")]
pub mod date;
#[cfg(feature = "event-bus")]
pub mod event_bus;
pub mod http;
pub mod interceptor;

pub use error::*;
