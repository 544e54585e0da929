mod rate_limiter;
mod server;
mod sweeper;

pub use rate_limiter::*;
pub use server::*;
pub use sweeper::*;
