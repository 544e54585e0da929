use crate::domain_model::*;
use crate::domain_port::*;

/// Fixed demo content, newest first.
pub struct MemoryPostRepo {
    posts: Vec<Post>,
}

impl MemoryPostRepo {
    pub fn new(posts: Vec<Post>) -> Self {
        Self { posts }
    }

    pub fn seeded() -> Self {
        let seed = [("Tamara", "Post 1"), ("Jim", "Post 2")];
        Self::new(
            seed.iter()
                .filter_map(|(username, title)| {
                    Username::parse(username).ok().map(|username| Post {
                        username,
                        title: title.to_string(),
                    })
                })
                .collect(),
        )
    }
}

#[async_trait::async_trait]
impl PostRepo for MemoryPostRepo {
    async fn posts_by(&self, author: &Username) -> Result<Vec<Post>, StoreError> {
        Ok(self
            .posts
            .iter()
            .filter(|post| &post.username == author)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn only_the_authors_posts_are_returned() {
        let repo = MemoryPostRepo::seeded();
        let tamara = Username::parse("Tamara").unwrap();
        let posts = repo.posts_by(&tamara).await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "Post 1");

        let nobody = Username::parse("Nobody").unwrap();
        assert!(repo.posts_by(&nobody).await.unwrap().is_empty());
    }
}
