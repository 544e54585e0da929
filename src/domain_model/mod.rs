mod post;
mod token;
mod username;

pub use post::*;
pub use token::*;
pub use username::*;
