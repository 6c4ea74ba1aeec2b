use clap::Parser;
use tracing_subscriber::EnvFilter;

use hiringcafe_collector::config::Config;
use hiringcafe_collector::runner;

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("hiringcafe_collector=info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_tracing(config.log_json);

    if let Err(e) = runner::run(&config).await {
        match e.status() {
            Some(status) => tracing::error!(status, "Run failed: {e}"),
            None => tracing::error!("Run failed: {e}"),
        }
        return Err(e.into());
    }

    Ok(())
}
