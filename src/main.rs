use std::sync::Arc;

use offer_onboarding::cli;
use offer_onboarding::config::PortalConfig;
use offer_onboarding::onboarding::{HttpBackend, SessionController, SessionState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = PortalConfig::from_env()?;

    // Initialize tracing (rolling file when a log dir is configured)
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let log_guard = match config.log_dir {
        Some(ref dir) => {
            let appender = tracing_appender::rolling::daily(dir, "offer-onboarding.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
            None
        }
    };

    // A missing link is handled like a link without a token.
    let activation_link = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("ONBOARDING_ACTIVATION_URL").ok())
        .unwrap_or_default();

    eprintln!("📄 Offer Onboarding v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Backend: {}", config.api_base_url);
    if let Some(ref dir) = config.log_dir {
        eprintln!("   Logs: {}", dir.display());
    }
    eprintln!();

    let backend = Arc::new(HttpBackend::new(&config)?);
    let controller = Arc::new(SessionController::new(backend));

    let state = cli::run(controller, &activation_link).await?;
    tracing::info!(%state, "Onboarding client exiting");

    if matches!(state, SessionState::Invalid | SessionState::Expired) {
        drop(log_guard);
        std::process::exit(2);
    }
    drop(log_guard);
    Ok(())
}
