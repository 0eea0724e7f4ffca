//! Motion CLI - Single entrypoint for the motion alert relay
//!
//! Serves the upload-event endpoint, or regenerates the log page on demand.

mod commands;

use clap::{Parser, Subcommand};
use commands::{RebuildPageCommand, ServeCommand};
use tracing_subscriber::{layer::SubscriberExt, Layer};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "MOTION_LOG_LEVEL", global = true)]
    log_level: String,

    /// Log format: compact, full
    #[arg(
        long,
        default_value = "compact",
        env = "MOTION_LOG_FORMAT",
        global = true
    )]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server that receives upload events
    Serve(ServeCommand),
    /// Regenerate the log page once and print its URL
    RebuildPage(RebuildPageCommand),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // If RUST_LOG is set, use it directly; otherwise use our default filter
    let filter = if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::EnvFilter::try_from_default_env()?
    } else {
        // motion crates at the requested level, noisy dependencies at warn
        tracing_subscriber::EnvFilter::new(format!(
            "motion={level},\
             motion_cli={level},\
             motion_relay={level},\
             motion_store={level},\
             motion_email={level},\
             tower_http={level},\
             aws_config=warn,\
             aws_smithy_runtime=warn,\
             h2=warn,\
             tower=warn,\
             hyper=warn,\
             rustls=warn",
            level = cli.log_level
        ))
    };

    let fmt_layer = match cli.log_format.as_str() {
        "full" => tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .boxed(),
        _ => tracing_subscriber::fmt::layer() // "compact" or any other value
            .compact()
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .boxed(),
    };

    let subscriber = tracing_subscriber::registry().with(filter).with(fmt_layer);
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Serve(serve_cmd) => serve_cmd.execute(),
        Commands::RebuildPage(rebuild_cmd) => rebuild_cmd.execute(),
    }
}
