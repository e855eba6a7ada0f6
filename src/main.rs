use std::sync::Arc;

use anyhow::{Error, Result};
use notify_service::{
    api::{AppState, run_api_server},
    clients::{
        notify::{NotifyClientCache, NotifyClientSettings},
        registry::RegistryQueryService,
    },
    config::Config,
    scenarios::{resolver::ScenarioResolver, whitelist::SettingsRegistry},
    utils::EventProcessor,
};
use tokio::signal::unix::{SignalKind, signal};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::load()?;
    let version = config.workflow_version()?;

    let sender = Arc::new(NotifyClientCache::new(NotifyClientSettings::from_config(&config)));
    let query_service = Arc::new(RegistryQueryService::for_version(&config, version)?);
    let resolver = Arc::new(ScenarioResolver::new(version));

    let port = config.server_port;
    let settings = Arc::new(SettingsRegistry::new(config));

    spawn_reload_listener(Arc::clone(&settings), Arc::clone(&sender));

    let processor = EventProcessor::new(settings, resolver, query_service, sender);

    info!(workflow_version = %version, "Configuration validated, starting server");

    run_api_server(Arc::new(AppState { processor }), port).await
}

/// Re-reads `.env` on SIGHUP and swaps in the new settings and provider client.
///
/// The workflow version, registry endpoints and server port stay as they
/// were at startup.
fn spawn_reload_listener(settings: Arc<SettingsRegistry>, sender: Arc<NotifyClientCache>) {
    tokio::spawn(async move {
        let mut hangups = match signal(SignalKind::hangup()) {
            Ok(stream) => stream,
            Err(e) => {
                error!(error = %e, "Cannot listen for reload signals");
                return;
            }
        };

        while hangups.recv().await.is_some() {
            let config = match Config::reload() {
                Ok(config) => config,
                Err(e) => {
                    error!(
                        error = %e,
                        "Reloaded configuration is invalid, keeping the current one"
                    );
                    continue;
                }
            };

            if config.workflow_version != settings.current().config.workflow_version {
                warn!(
                    workflow_version = %config.workflow_version,
                    "Workflow version changed, restart the service to apply it"
                );
            }

            if let Err(e) = sender.reload(NotifyClientSettings::from_config(&config)) {
                error!(error = %e, "Reloading the Notify client failed");
            }
            settings.reload(config);
        }
    });
}
