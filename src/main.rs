use clap::Parser;
use haplocheck_tools::{cli, commands, config::Config};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = cli::Args::parse();
    let config = Config::load();

    let result = match args.command {
        cli::Commands::Split { vcf_file, chip } => commands::split::run(&config, vcf_file, chip),
        cli::Commands::Summary { vcf_file, chip } => commands::summary::run(&config, vcf_file, chip),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
