use anyhow::Context;
use taxform_worker::config::WorkerConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = WorkerConfig::from_env().context("invalid worker configuration")?;
    taxform_worker::run(config).await.context("server failed")?;
    Ok(())
}
