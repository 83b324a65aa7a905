//! Type definitions for ocusage

mod error;
mod message;
mod model;
mod session;
mod unknown;
mod usage;

pub use error::*;
pub use message::*;
pub use model::*;
pub use session::*;
pub use unknown::*;
pub use usage::*;
