mod store_error;

pub use store_error::*;

// store

mod refresh_token_store;

pub use refresh_token_store::*;

// repo

mod post_repo;

pub use post_repo::*;
