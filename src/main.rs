use backoffice_views::utils::{logger, validation::Validate};
use backoffice_views::{assets, server, AppState, CliArgs};
use clap::Parser;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let config = match args.load_config() {
        Ok(config) => config,
        Err(e) => {
            logger::init_cli_logger(args.verbose);
            tracing::error!("❌ Failed to load configuration: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    // 初始化日誌
    logger::init_logger(args.verbose, Some(&config.logging.level), config.log_format());

    if let Some(target) = &args.publish_assets {
        let styles = assets::copy_styles(target)?;
        let scripts = assets::copy_static_assets(target)?;
        tracing::info!("✅ Published {} styles and {} scripts", styles, scripts);
        println!("✅ Published {} files to {}", styles + scripts, target.join("backoffice").display());
        return Ok(());
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }
    if args.verbose {
        tracing::debug!("Config: {:?}", config);
    }

    let state = AppState::from_config(&config)?;
    let listener = TcpListener::bind(&config.server.bind).await?;
    tracing::info!("🚀 backoffice-views listening on http://{}", listener.local_addr()?);

    server::serve(listener, state).await?;
    tracing::info!("✅ Server stopped");
    Ok(())
}
