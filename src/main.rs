use hillside::{app::HillsideApp, config::AppConfig};

fn run() -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    log::info!("Starting {} ({}x{})", config.title, config.width, config.height);
    HillsideApp::new(config)?.run()?;
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}
