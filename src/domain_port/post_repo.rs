use super::StoreError;
use crate::domain_model::*;

#[async_trait::async_trait]
pub trait PostRepo: Send + Sync {
    /// Posts written by `author`, newest first.
    async fn posts_by(&self, author: &Username) -> Result<Vec<Post>, StoreError>;
}
