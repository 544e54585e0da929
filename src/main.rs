use std::fs;
use std::sync::Arc;
use tokenkeep::api;
use tokenkeep::domain_model::Username;
use tokenkeep::logger::*;
use tokenkeep::server::*;
use tokenkeep::settings::*;
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    let logger = Logger::new_bootstrap();

    let project_settings = parse_settings(cli.settings.as_deref())?;
    info!(?project_settings);
    let logger_config = LogConfig {
        filter: project_settings.log.filter.clone(),
    };
    logger.reload_from_config(&logger_config)?;

    let secrets = Secrets::from_env()?;
    let server = Arc::new(Server::try_new(&project_settings, &secrets).await?);

    let result = match cli.command() {
        Command::Serve => serve(server.clone(), &project_settings).await,
        Command::Sweep => server
            .session_service
            .sweep()
            .await
            .map(|removed| println!("removed {} refresh tokens", removed))
            .map_err(anyhow::Error::from),
        Command::Tokens { username } => list_tokens(&server, &username).await,
    };

    let shutdown_timeout = std::time::Duration::from_secs(100);
    match tokio::time::timeout(shutdown_timeout, server.shutdown()).await {
        Ok(_) => info!("server shutdown successfully"),
        Err(_) => error!("server shutdown timed out"),
    }

    result
}

async fn serve(server: Arc<Server>, settings: &Settings) -> anyhow::Result<()> {
    let address: std::net::SocketAddr = settings.http.address.parse()?;
    let routes = api::service(server);
    let shutdown = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Could not register SIGINT: {}", e);
        }
    };

    match (&settings.http.cert_path, &settings.http.key_path) {
        (Some(cert_path), Some(key_path)) => {
            for (what, path) in [("cert", cert_path), ("key", key_path)] {
                if !fs::metadata(path)?.is_file() {
                    return Err(anyhow::anyhow!(
                        "TLS {} is not a regular file: {:?}",
                        what,
                        path
                    ));
                }
            }
            let (bound, running) = warp::serve(routes)
                .tls()
                .cert_path(cert_path)
                .key_path(key_path)
                .bind_with_graceful_shutdown(address, shutdown);
            info!(%bound, "listening (tls)");
            running.await;
        }
        (None, None) => {
            let (bound, running) =
                warp::serve(routes).try_bind_with_graceful_shutdown(address, shutdown)?;
            info!(%bound, "listening");
            running.await;
        }
        _ => {
            return Err(anyhow::anyhow!(
                "http.cert_path and http.key_path must be set together"
            ));
        }
    }
    Ok(())
}

async fn list_tokens(server: &Server, username: &str) -> anyhow::Result<()> {
    let username = Username::parse(username)?;
    let tokens = server.session_service.tokens_of(&username).await?;
    if tokens.is_empty() {
        println!("no refresh tokens stored for {}", username);
    }
    for token in tokens {
        println!("{}", token.as_str());
    }
    Ok(())
}
