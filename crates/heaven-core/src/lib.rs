//! Client core for the Heaven Radio listener front-end: the "next tracks"
//! poller, stream resolution with fallback, the play/pause control path and
//! the decorative listener count.

pub mod config;
pub mod error;
pub mod fetch;
pub mod listeners;
pub mod platform;
pub mod protocol;
pub mod schedule;
pub mod stream;
pub mod tracks;

pub use error::{Error, Result};
