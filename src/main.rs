use clap::Parser;

use threadline::cli::{Cli, Commands};
use threadline::config::{StaticConfig, get_config, init_config_from};
use threadline::runtime::modes::run_server;
use threadline::system::logging::init_logging;

#[actix_web::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Some(Commands::Config { output_path, force }) = &cli.command {
        if let Err(e) = write_sample_config(output_path.as_deref(), *force) {
            eprintln!("[ERROR] {}", e);
            std::process::exit(1);
        }
        return;
    }

    init_config_from(cli.config.as_deref());

    // guard 必须活到进程结束，否则文件日志会丢失
    let _log_guard = match init_logging(&get_config().logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("[ERROR] Failed to initialize logging: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run_server().await {
        match e.downcast_ref::<threadline::errors::ThreadlineError>() {
            Some(err) => eprintln!("{}", err.format_colored()),
            None => eprintln!("[ERROR] {:#}", e),
        }
        std::process::exit(1);
    }
}

fn write_sample_config(output_path: Option<&str>, force: bool) -> anyhow::Result<()> {
    let Some(path) = output_path else {
        println!("{}", StaticConfig::generate_sample_config());
        return Ok(());
    };

    if std::path::Path::new(path).exists() && !force {
        anyhow::bail!("{} already exists, pass --force to overwrite", path);
    }

    StaticConfig::default()
        .save_to_file(path)
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", path, e))?;
    println!("Sample configuration written to {}", path);
    Ok(())
}
