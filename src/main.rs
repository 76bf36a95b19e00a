//! Command line entry point for the static file server.
//!
//! ```bash
//! microserve --root ./public --port 8080
//! MICROSERVE_PORT=3000 MICROSERVE_ROOT=/srv/www microserve
//! microserve --config server.json --port 9000
//! ```

use std::net::IpAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::error;

use microserve_rs::{HttpServer, ServerConfig, ServerError};

/// Serve static files from a directory over HTTP.
#[derive(Debug, Clone, Parser)]
#[command(name = "microserve", version, about)]
struct Cli {
    /// JSON configuration file; flags given on the command line take precedence
    #[arg(short, long, env = "MICROSERVE_CONFIG")]
    config: Option<PathBuf>,

    /// Host/IP to listen on [default: 127.0.0.1]
    #[arg(long, env = "MICROSERVE_HOST")]
    host: Option<IpAddr>,

    /// Port to listen on [default: 8080]
    #[arg(short, long, env = "MICROSERVE_PORT")]
    port: Option<u16>,

    /// Directory to serve files from [default: .]
    #[arg(short, long, env = "MICROSERVE_ROOT")]
    root: Option<PathBuf>,

    /// File served for `/` [default: index.html]
    #[arg(long, env = "MICROSERVE_INDEX")]
    index: Option<String>,

    /// Maximum number of concurrent connections [default: 1024]
    #[arg(long = "max-connections")]
    max_connections: Option<usize>,

    /// Size of the request read buffer in bytes [default: 4096]
    #[arg(long = "buffer-size")]
    buffer_size: Option<usize>,

    /// Read and write timeout in milliseconds [default: 10000]
    #[arg(long = "timeout-ms")]
    timeout_ms: Option<u64>,
}

impl Cli {
    /// Layer the command line over the config file over the defaults.
    fn into_config(self) -> Result<ServerConfig, ServerError> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::from_json_file(path)?,
            None => ServerConfig::default(),
        };

        if let Some(host) = self.host {
            config.addr.set_ip(host);
        }
        if let Some(port) = self.port {
            config.addr.set_port(port);
        }
        if let Some(root) = self.root {
            config.root = root;
        }
        if let Some(index) = self.index {
            config.default_document = index;
        }
        if let Some(max_connections) = self.max_connections {
            config.max_connections = max_connections;
        }
        if let Some(buffer_size) = self.buffer_size {
            config.read_buffer_size = buffer_size;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.read_timeout_ms = timeout_ms;
            config.write_timeout_ms = timeout_ms;
        }

        config.validate()?;
        Ok(config)
    }
}

async fn serve(cli: Cli) -> Result<(), ServerError> {
    let config = cli.into_config()?;
    let server = HttpServer::bind(config).await?;
    server.run_until_ctrl_c().await
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match serve(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
