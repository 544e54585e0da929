use crate::domain_model::*;
use crate::domain_port::StoreError;

#[async_trait::async_trait]
pub trait PostService: Send + Sync {
    async fn posts_for(&self, principal: &Username) -> Result<Vec<Post>, StoreError>;
}
