//! Core application

use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use crate::api::{ApiServer, AuthManager};
use crate::core::cli::{self, Commands};
use crate::core::config::{AppConfig, LogFormat};
use crate::core::constants::{APP_NAME, APP_NAME_LOWER, API_PREFIX, ENV_LOG};
use crate::core::shutdown::ShutdownService;
use crate::data::TransactionalService;

pub struct CoreApp {
    pub shutdown: ShutdownService,
    pub config: AppConfig,
    pub database: Arc<TransactionalService>,
    pub auth: Arc<AuthManager>,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();

        let (cli_config, command) = cli::parse();

        // Config warnings are emitted before the final subscriber exists
        let config = tracing::subscriber::with_default(Self::bootstrap_subscriber(), || {
            AppConfig::load(&cli_config)
        })?;
        Self::init_logging(config.log_format);

        tracing::debug!(command = ?command, "Application starting");

        match command {
            Some(Commands::Token {
                user_id,
                email,
                admin,
                ttl_secs,
            }) => Self::print_token(&config, user_id, email.as_deref(), admin, ttl_secs),
            Some(Commands::Start) | None => {
                let app = Self::init(config).await?;
                Self::start_server(app).await
            }
        }
    }

    async fn init(config: AppConfig) -> Result<Self> {
        let database = Arc::new(TransactionalService::init(&config.database).await?);
        let auth = Arc::new(AuthManager::new(&config.auth));
        if !auth.is_configured() {
            tracing::warn!("No JWT secret configured; authenticated routes will return 503");
        }
        let shutdown = ShutdownService::new(database.clone());

        Ok(Self {
            shutdown,
            config,
            database,
            auth,
        })
    }

    fn print_token(
        config: &AppConfig,
        user_id: uuid::Uuid,
        email: Option<&str>,
        admin: bool,
        ttl_secs: Option<u64>,
    ) -> Result<()> {
        let mut auth_config = config.auth.clone();
        if let Some(ttl) = ttl_secs {
            auth_config.token_ttl_secs = ttl;
        }
        let manager = AuthManager::new(&auth_config);
        let token = manager.issue(&user_id.hyphenated().to_string(), email, admin)?;
        println!("{}", token);
        Ok(())
    }

    fn env_filter() -> EnvFilter {
        let default_filter = format!("info,{}=info", APP_NAME_LOWER);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        EnvFilter::new(filter)
    }

    fn bootstrap_subscriber() -> impl tracing::Subscriber + Send + Sync {
        tracing_subscriber::fmt()
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .with_env_filter(Self::env_filter())
            .finish()
    }

    fn init_logging(format: LogFormat) {
        let builder = tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_env_filter(Self::env_filter());

        match format {
            LogFormat::Compact => builder.with_ansi(true).compact().init(),
            LogFormat::Json => builder.json().init(),
        }
    }

    async fn start_server(app: Self) -> Result<()> {
        // Install signal handlers FIRST (before any blocking calls)
        app.shutdown.install_signal_handlers();

        app.start_background_tasks().await;

        tracing::info!(
            "{} listening on http://{}:{}{}",
            APP_NAME,
            app.config.server.host,
            app.config.server.port,
            API_PREFIX
        );

        let server = ApiServer::new(app);
        let app = server.start().await?;
        app.shutdown.shutdown().await;

        Ok(())
    }

    pub async fn start_background_tasks(&self) {
        self.shutdown
            .register(
                self.database
                    .start_checkpoint_task(self.shutdown.subscribe()),
            )
            .await;

        tracing::debug!("Background tasks started");
    }
}
