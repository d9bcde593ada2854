use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Context, Result};
use profile_app::{telemetry, App, Config, ProfileApi, ProfileCache, ProfileQuery, ReqwestTransport};
use profile_core::ProfileClient;
use tracing::info;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let config = Config::parse();
    telemetry::init();

    let transport =
        ReqwestTransport::new(config.timeout()).wrap_err("failed to build HTTP client")?;
    let api = ProfileApi::new(ProfileClient::new(&config.base_url), transport);
    let query = ProfileQuery::new(Arc::new(ProfileCache::new()), api);
    let app = App::new(query).with_options(config.query_options());

    info!(base_url = %config.base_url, "loading profile");
    let mut stdout = std::io::stdout();
    let result = app
        .run(&mut stdout)
        .await
        .wrap_err("failed to write to stdout")?;

    if result.is_error {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
