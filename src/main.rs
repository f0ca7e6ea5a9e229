// src/main.rs
use anyhow::Result;
use starlite_blog::application::{
    ports::{
        security::{PasswordHasher, TokenManager},
        time::Clock,
    },
    services::{ApplicationDependencies, ApplicationServices},
};
use starlite_blog::config::AppConfig;
use starlite_blog::domain::slug::SlugGenerator;
use starlite_blog::infrastructure::{
    database,
    repositories::{
        PostgresAnalyticsRepository, PostgresCategoryRepository, PostgresMediaRepository,
        PostgresNewsletterRepository, PostgresPostLinkRepository, PostgresPostReadRepository, PostgresPostWriteRepository,
        PostgresSlugRegistry, PostgresTagRepository, PostgresUserRepository,
    },
    security::{Argon2PasswordHasher, BiscuitTokenManager},
    storage::LocalMediaFiles,
    time::SystemClock,
    util::DefaultSlugGenerator,
};
use starlite_blog::presentation::http::{routes::build_router_with_rate_limiter, state::HttpState};
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    if let Err(err) = bootstrap().await {
        tracing::error!(error = %err, "fatal error");
        eprintln!("fatal error: {err:#}");
        std::process::exit(1);
    }
}

async fn bootstrap() -> Result<()> {
    init_tracing();

    let config = AppConfig::from_env()?;

    let pool = database::init_pool(config.database_url(), config.max_connections()).await?;
    database::run_migrations(&pool).await?;
    tracing::info!("database migrations applied");

    let password_hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2PasswordHasher);
    let token_manager: Arc<dyn TokenManager> = Arc::new(BiscuitTokenManager::new(
        config.biscuit_private_key(),
        config.token_ttl(),
    )?);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let slugger: Arc<dyn SlugGenerator> = Arc::new(DefaultSlugGenerator);

    let services = Arc::new(ApplicationServices::new(ApplicationDependencies {
        users: Arc::new(PostgresUserRepository::new(pool.clone())),
        post_writes: Arc::new(PostgresPostWriteRepository::new(pool.clone())),
        post_reads: Arc::new(PostgresPostReadRepository::new(pool.clone())),
        post_links: Arc::new(PostgresPostLinkRepository::new(pool.clone())),
        categories: Arc::new(PostgresCategoryRepository::new(pool.clone())),
        tags: Arc::new(PostgresTagRepository::new(pool.clone())),
        slug_registry: Arc::new(PostgresSlugRegistry::new(pool.clone())),
        newsletter: Arc::new(PostgresNewsletterRepository::new(pool.clone())),
        analytics: Arc::new(PostgresAnalyticsRepository::new(pool.clone())),
        media: Arc::new(PostgresMediaRepository::new(pool)),
        media_files: Arc::new(LocalMediaFiles::new(config.upload_path())),
        password_hasher,
        token_manager,
        clock,
        slugger,
    }));

    let state = HttpState::new(services);
    let app = build_router_with_rate_limiter(state, config.allowed_origins(), true);

    let listener = tokio::net::TcpListener::bind(config.listen_addr()).await?;
    let address: SocketAddr = listener.local_addr()?;
    tracing::info!("listening on {address}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .ok()
        .unwrap_or_else(|| "info,tower_http=info,sqlx=warn".to_string());

    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(env_filter))
        .with(tracing_subscriber::fmt::layer());

    if subscriber.try_init().is_err() {
        tracing::warn!("tracing subscriber already initialised");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("shutdown signal received");
}
