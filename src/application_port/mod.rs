mod authentication_gate;
mod post_service;
mod session_service;
mod token_signer;

pub use authentication_gate::*;
pub use post_service::*;
pub use session_service::*;
pub use token_signer::*;
