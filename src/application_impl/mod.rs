mod authentication_gate_impl;
mod post_service_impl;
mod session_service_impl;
mod token_signer_jwt;

pub use authentication_gate_impl::*;
pub use post_service_impl::*;
pub use session_service_impl::*;
pub use token_signer_jwt::*;
