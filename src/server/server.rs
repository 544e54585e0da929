use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_port::*;
use crate::infra_memory::*;
use crate::infra_mysql::*;
use crate::logger::*;
use crate::server::*;
use crate::settings::{self, Secrets, Settings};
use sqlx::MySqlPool;
use sqlx::mysql::MySqlPoolOptions;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub struct Server {
    pub session_service: Arc<dyn SessionService>,
    pub authentication_gate: Arc<dyn AuthenticationGate>,
    pub post_service: Arc<dyn PostService>,
    pub login_limiter: Arc<RateLimiter>,
    pub request_limiter: Arc<RateLimiter>,
    pub allowed_origins: Vec<String>,
    sweeper: Sweeper,
    cancel: CancellationToken,
    pool: Option<MySqlPool>,
}

/// One pool shared by every MySQL-backed component, opened on first use.
async fn mysql_pool(pool: &mut Option<MySqlPool>, mysql: &settings::MySql) -> anyhow::Result<MySqlPool> {
    if let Some(pool) = pool {
        return Ok(pool.clone());
    }
    let opened = MySqlPoolOptions::new()
        .max_connections(mysql.max_connections)
        .connect(&mysql.dsn)
        .await?;
    ensure_schema(&opened).await?;
    *pool = Some(opened.clone());
    Ok(opened)
}

/// CORS origins must be bare `scheme://host[:port]` values.
fn check_origins(origins: &[String]) -> anyhow::Result<()> {
    for origin in origins {
        let uri: warp::http::Uri = origin
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin {:?}: {}", origin, e))?;
        let bare = uri.scheme().is_some()
            && uri.authority().is_some()
            && uri.path() == "/"
            && uri.query().is_none()
            && !origin.ends_with('/');
        if !bare {
            return Err(anyhow::anyhow!("Invalid CORS origin {:?}", origin));
        }
    }
    Ok(())
}

impl Server {
    pub async fn try_new(settings: &Settings, secrets: &Secrets) -> anyhow::Result<Self> {
        check_origins(&settings.cors.allowed_origins)?;

        let mut pool: Option<MySqlPool> = None;

        let store: Arc<dyn RefreshTokenStore> = match settings.store.backend.as_str() {
            "memory" => Arc::new(MemoryRefreshTokenStore::new()),
            "mysql" => Arc::new(MySqlRefreshTokenStore::new(
                mysql_pool(&mut pool, &settings.mysql).await?,
                settings.store.sweep_batch_size,
            )),
            other => return Err(anyhow::anyhow!("Unknown store backend: {}", other)),
        };

        let post_repo: Arc<dyn PostRepo> = match settings.posts.backend.as_str() {
            "memory" => Arc::new(MemoryPostRepo::seeded()),
            "mysql" => Arc::new(MySqlPostRepo::new(
                mysql_pool(&mut pool, &settings.mysql).await?,
            )),
            other => return Err(anyhow::anyhow!("Unknown posts backend: {}", other)),
        };

        let keys = secrets.token_keys();
        let signer: Arc<dyn TokenSigner> =
            Arc::new(JwtHs256Signer::new(settings.token.issuer.clone()));

        let authentication_gate: Arc<dyn AuthenticationGate> = Arc::new(
            BearerAuthenticationGate::new(signer.clone(), keys.access.clone()),
        );

        let session_service: Arc<dyn SessionService> = Arc::new(RealSessionService::new(
            signer,
            store.clone(),
            keys,
            SessionConfig {
                access_ttl: settings.token.access_ttl(),
                refresh_ttl: settings.token.refresh_ttl(),
            },
        ));

        let post_service: Arc<dyn PostService> = Arc::new(RealPostService::new(post_repo));

        let login_limiter = Arc::new(RateLimiter::new(
            settings.rate_limit.login_max_attempts,
            settings.rate_limit.login_window(),
        ));
        let request_limiter = Arc::new(RateLimiter::new(
            settings.rate_limit.request_max,
            settings.rate_limit.request_window(),
        ));

        // region runtime infra
        let cancel = CancellationToken::new();
        let sweeper = Sweeper::spawn(store, settings.store.sweep_interval(), cancel.child_token());
        // endregion

        info!(
            store = %settings.store.backend,
            posts = %settings.posts.backend,
            "server started"
        );

        Ok(Self {
            session_service,
            authentication_gate,
            post_service,
            login_limiter,
            request_limiter,
            allowed_origins: settings.cors.allowed_origins.clone(),
            sweeper,
            cancel,
            pool,
        })
    }

    pub async fn shutdown(&self) {
        info!("server shutting down...");

        self.cancel.cancel();
        self.sweeper.shutdown().await;

        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}
