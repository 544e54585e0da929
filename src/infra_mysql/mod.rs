mod post_repo_mysql;
mod refresh_token_store_mysql;
mod schema;

pub use post_repo_mysql::*;
pub use refresh_token_store_mysql::*;
pub use schema::*;

mod util;
