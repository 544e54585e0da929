//! Process-wide `tracing` setup. The macros are re-exported so the rest of
//! the crate logs through `crate::logger::*`.

mod logger;
pub use logger::*;

pub use tracing::{debug, error, info, trace, warn};
