use super::util::store_err;
use crate::domain_model::*;
use crate::domain_port::*;
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};

pub struct MySqlPostRepo {
    pool: MySqlPool,
}

impl MySqlPostRepo {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlPostRepo { pool }
    }

    fn row_to_post(row: MySqlRow) -> Result<Post, StoreError> {
        let username: String = row.try_get("username").map_err(store_err)?;
        let title: String = row.try_get("title").map_err(store_err)?;
        let username = Username::parse(&username)
            .map_err(|e| StoreError::Backend(format!("stored username: {}", e)))?;
        Ok(Post { username, title })
    }
}

#[async_trait::async_trait]
impl PostRepo for MySqlPostRepo {
    async fn posts_by(&self, author: &Username) -> Result<Vec<Post>, StoreError> {
        let rows: Vec<MySqlRow> = sqlx::query(
            r#"
SELECT username, title
FROM post
WHERE username = ?
ORDER BY created_at DESC, id DESC
"#,
        )
        .bind(author.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;

        rows.into_iter().map(Self::row_to_post).collect()
    }
}
