//! Run the intake server: `storefront serve`.

use anyhow::Result;
use tracing::warn;

use storefront::config::StorefrontConfig;
use storefront::intake::server::start_server;

pub async fn cmd_serve(config: &StorefrontConfig) -> Result<()> {
    for warning in config.validate() {
        warn!(%warning, "configuration warning");
    }

    start_server(config.server_config()).await
}
