//! Server configuration.
//!
//! Read once at startup from command-line flags, falling back to environment
//! variables and then to defaults.

use clap::Parser;

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "tapbridge-server")]
#[command(about = "Relays participant taps from WebSocket clients to a UDP sound engine", long_about = None)]
pub struct Config {
    /// Host address to bind the listeners to
    #[arg(short = 'H', long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port number for WebSocket connections
    #[arg(short = 'p', long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Port number for the HTTP health check
    #[arg(long, env = "HEALTH_PORT", default_value_t = 3000)]
    pub health_port: u16,

    /// Host of the downstream sound engine (UDP)
    #[arg(long, env = "MAX_HOST", default_value = "127.0.0.1")]
    pub max_host: String,

    /// Port of the downstream sound engine (UDP)
    #[arg(long, env = "MAX_PORT", default_value_t = 7400)]
    pub max_port: u16,
}

impl Config {
    /// Bind address of the WebSocket listener
    pub fn ws_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Bind address of the health-check listener
    pub fn health_addr(&self) -> String {
        format!("{}:{}", self.host, self.health_port)
    }
}
