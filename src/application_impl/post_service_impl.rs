use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use std::sync::Arc;

pub struct RealPostService {
    post_repo: Arc<dyn PostRepo>,
}

impl RealPostService {
    pub fn new(post_repo: Arc<dyn PostRepo>) -> Self {
        Self { post_repo }
    }
}

#[async_trait::async_trait]
impl PostService for RealPostService {
    async fn posts_for(&self, principal: &Username) -> Result<Vec<Post>, StoreError> {
        self.post_repo.posts_by(principal).await
    }
}
