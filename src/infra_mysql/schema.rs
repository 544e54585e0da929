use sqlx::MySqlPool;
use tracing::info;

const CREATE_REFRESH_TOKEN: &str = r#"
CREATE TABLE IF NOT EXISTS refresh_token (
    token      VARCHAR(1024) CHARACTER SET ascii COLLATE ascii_bin NOT NULL,
    owner      VARCHAR(30) NOT NULL,
    issued_at  DATETIME(6) NOT NULL,
    expires_at DATETIME(6) NOT NULL,
    revoked    BOOLEAN NOT NULL DEFAULT FALSE,
    PRIMARY KEY (token),
    INDEX idx_refresh_token_owner (owner),
    INDEX idx_refresh_token_expires_at (expires_at)
)
"#;

const CREATE_POST: &str = r#"
CREATE TABLE IF NOT EXISTS post (
    id         BIGINT UNSIGNED NOT NULL AUTO_INCREMENT,
    username   VARCHAR(30) NOT NULL,
    title      TEXT NOT NULL,
    created_at DATETIME(6) NOT NULL DEFAULT CURRENT_TIMESTAMP(6),
    PRIMARY KEY (id),
    INDEX idx_post_username (username)
)
"#;

// Seeds the demo posts only into an empty table.
const SEED_POST: &str = r#"
INSERT INTO post (username, title)
SELECT seed.username, seed.title
FROM (SELECT 'Tamara' AS username, 'Post 1' AS title
      UNION ALL
      SELECT 'Jim', 'Post 2') AS seed
WHERE NOT EXISTS (SELECT 1 FROM post)
"#;

/// Create the tables this service owns if they are missing.
pub async fn ensure_schema(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    sqlx::query(CREATE_REFRESH_TOKEN).execute(pool).await?;
    sqlx::query(CREATE_POST).execute(pool).await?;
    let seeded = sqlx::query(SEED_POST).execute(pool).await?.rows_affected();
    info!(seeded_posts = seeded, "mysql schema ready");
    Ok(())
}
