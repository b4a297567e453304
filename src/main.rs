use clap::{Parser, Subcommand};
use ferropix_core::ResizerConfig;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "ferropix")]
#[command(about = "A streaming image resize service for CDN origins")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the ferropix server
    Serve {
        /// Server host address
        #[arg(long)]
        host: Option<String>,

        /// Server port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the resolved predefined-size table
    Sizes,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    init_tracing(cli.debug);

    let config = ResizerConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { host, port } => {
            serve_command(config, host, port).await?;
        }
        Commands::Sizes => {
            sizes_command(config);
        }
    }

    Ok(())
}

fn init_tracing(debug: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn serve_command(
    mut config: ResizerConfig,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    // Override config with CLI arguments.
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    info!(
        "Starting ferropix server on {}:{}",
        config.server.host, config.server.port
    );

    let server = ferropix_server::Server::new(config)?;
    server.serve().await?;

    Ok(())
}

fn sizes_command(config: ResizerConfig) {
    let table = config.size_table();
    let mut names: Vec<_> = table.keys().collect();
    names.sort();

    for name in names {
        let spec = &table[name];
        if spec.is_original() {
            println!("{name:<20} (original size, passthrough)");
        } else {
            println!("{name:<20} {}x{}", spec.width, spec.height);
        }
    }
}
