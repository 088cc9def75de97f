//! Command-line and environment configuration

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use axum::http::{HeaderValue, Method};
use clap::{Args, Parser, Subcommand};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::error::{RelayError, RelayResult};

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the relay server.
    Serve(ServeArgs),
    /// Join a relay from the terminal.
    Client(ClientArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Interface to bind to.
    #[arg(long, env = "RELAY_HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// Port to listen on. Use 0 for an ephemeral port.
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Restrict cross-origin access to a single origin. Any origin is allowed when unset.
    #[arg(long, env = "RELAY_ALLOWED_ORIGIN")]
    pub allowed_origin: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ClientArgs {
    /// WebSocket URL of the relay.
    #[arg(long, env = "RELAY_URL", default_value = "ws://127.0.0.1:3000/ws")]
    pub url: String,
}

/// Cross-origin policy for the HTTP surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsPolicy {
    AnyOrigin,
    Origin(HeaderValue),
}

impl CorsPolicy {
    pub fn layer(&self) -> CorsLayer {
        let origin = match self {
            Self::AnyOrigin => AllowOrigin::from(Any),
            // Only a matching request origin is echoed back
            Self::Origin(value) => AllowOrigin::list([value.clone()]),
        };
        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any)
    }
}

/// Validated server configuration
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub bind: SocketAddr,
    pub cors: CorsPolicy,
}

impl RelayConfig {
    pub fn from_args(args: &ServeArgs) -> RelayResult<Self> {
        let cors = match args.allowed_origin.as_deref().map(str::trim) {
            None | Some("") | Some("*") => CorsPolicy::AnyOrigin,
            Some(origin) => {
                let value =
                    HeaderValue::from_str(origin).map_err(|e| RelayError::InvalidOrigin {
                        origin: origin.to_string(),
                        reason: e.to_string(),
                    })?;
                CorsPolicy::Origin(value)
            }
        };

        Ok(Self {
            bind: SocketAddr::new(args.host, args.port),
            cors,
        })
    }

    /// Loopback configuration on an ephemeral port
    pub fn local() -> Self {
        Self {
            bind: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0),
            cors: CorsPolicy::AnyOrigin,
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT),
            cors: CorsPolicy::AnyOrigin,
        }
    }
}
