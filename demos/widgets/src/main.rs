//! Widgets demo server.
//!
//! ```bash
//! RESTFUL_PORT=3000 cargo run -p widgets
//!
//! curl -i -X POST localhost:3000/widgets/ -d '{"name":"gear","teeth":12}'
//! curl localhost:3000/widgets/
//! curl -X POST localhost:3000/jobs/invoke -d '{"task":"reindex"}'
//! ```

use composable_restful_web::{RestService, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use widgets::AppContext;

fn init_tracing(config: &ServerConfig) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env();
    init_tracing(&config);

    let service = widgets::register_all(RestService::from_config(AppContext::default(), &config))?;
    for route in service.routes() {
        tracing::info!(path = %route.path, kind = %route.kind, "Route registered");
    }

    service.serve(&config).await?;
    Ok(())
}
