use clap::Parser;
use tracing::error;

use linkboard::cli::{Cli, Commands};
use linkboard::config::StaticConfig;
use linkboard::system::init_logging;

#[actix_web::main]
async fn main() {
    dotenvy::dotenv().ok();

    // clap 负责 --help/--version 以及未知参数的退出码
    let cli = Cli::parse();

    if let Some(Commands::GenerateConfig { output }) = cli.command {
        let sample = StaticConfig::generate_sample_config();
        match output {
            Some(path) => {
                if let Err(e) = std::fs::write(&path, sample) {
                    eprintln!("Failed to write {}: {}", path.display(), e);
                    std::process::exit(1);
                }
                println!("Sample configuration written to {}", path.display());
            }
            None => print!("{}", sample),
        }
        return;
    }

    let config = match StaticConfig::load_from(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            std::process::exit(1);
        }
    };

    let guard = match init_logging(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            std::process::exit(1);
        }
    };

    if let Err(e) = linkboard::runtime::run_server(config).await {
        error!("linkboard exited with error: {:#}", e);
        // process::exit 不会运行析构函数，先刷新日志
        drop(guard);
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}
