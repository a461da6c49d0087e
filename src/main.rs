use anyhow::Context;
use cortex_service::{CortexService, config::default_config::config_from_env, telemetry};
use doc_chat::{ChatConfig, CortexPlatform, DocChat};
use tracing::{Level, info};
use tracing_subscriber::{Layer, filter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file when present.
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(e).context("reading .env");
        }
    }

    let env_filter = telemetry::env_filter_with_level("info,doc_chat=info,api=info", Level::INFO);

    // Library events go through the cortex layer, everything else through the plain one.
    tracing_subscriber::registry()
        .with(env_filter)
        .with(telemetry::layer())
        .with(
            fmt::layer()
                .with_target(false)
                .with_filter(filter::filter_fn(|meta| {
                    !meta.target().starts_with(telemetry::TARGET_PREFIX)
                })),
        )
        .try_init()
        .context("installing tracing subscriber")?;

    let cortex_cfg = config_from_env().context("loading Snowflake connection config")?;
    info!(account = %cortex_cfg.account_url, db = %cortex_cfg.database, "platform configured");
    let chat_cfg = ChatConfig::from_env().context("loading chat config")?;

    let svc = CortexService::new(cortex_cfg).context("building platform client")?;
    let platform = CortexPlatform::new(svc, &chat_cfg);
    let chat = DocChat::discover(platform, chat_cfg)
        .await
        .context("discovering search services")?;

    api::start(chat).await.context("serving session API")?;
    Ok(())
}
