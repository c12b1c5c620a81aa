//! Command-line interface definitions using clap derive macros.
//!
//! Contains the top-level [`Cli`] parser, the [`Commands`] enum for
//! subcommands (run, health), and their associated argument structs.
//! Every `run` flag has an environment variable equivalent for container
//! deployments.

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::proxy::cache::CacheProfile;

#[derive(Parser)]
#[command(
    name = "search-proxy",
    version,
    about = "Tenant-aware reverse proxy for catalog and search APIs",
    propagate_version = true,
    after_help = "\x1b[1mQuick start:\x1b[0m\n  \
        search-proxy run                       Listen on :8080\n  \
        search-proxy run -p 3000 --development  Local dev mode\n  \
        search-proxy health                    Check a running instance"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the proxy server
    Run(Box<RunArgs>),

    /// Check health of a running instance
    Health(HealthArgs),
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        search-proxy run                                  Production defaults\n  \
        search-proxy run --development --pretty           Local dev mode\n  \
        search-proxy run --cache-profile short            60s surrogate TTL")]
pub struct RunArgs {
    /// Listen port
    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Listen address
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Development mode: error messages reach clients
    #[arg(long, env = "DEVELOPMENT")]
    pub development: bool,

    /// Public hostname shown in startup logs (defaults by mode)
    #[arg(long, env = "PUBLIC_HOSTNAME")]
    pub public_hostname: Option<String>,

    // -- Upstream --
    /// Domain that tenant subdomains are prefixed to
    #[arg(
        long,
        env = "UPSTREAM_DOMAIN",
        default_value = "vtexcommercestable.com.br",
        help_heading = "Upstream"
    )]
    pub upstream_domain: String,

    /// Fixed host serving the legacy catalog search API
    #[arg(
        long,
        env = "SEARCH_HOST",
        default_value = "deco.vtexcommercestable.com.br",
        help_heading = "Upstream"
    )]
    pub search_host: String,

    /// Scheme used for upstream URLs
    #[arg(
        long,
        env = "UPSTREAM_SCHEME",
        default_value = "https",
        help_heading = "Upstream"
    )]
    pub upstream_scheme: UpstreamScheme,

    // -- Caching --
    /// Cache policy table applied to proxied responses
    #[arg(
        long,
        env = "CACHE_PROFILE",
        default_value = "revalidate",
        help_heading = "Caching"
    )]
    pub cache_profile: CacheProfile,

    /// Favicon served at /favicon.ico
    #[arg(
        long = "favicon",
        env = "FAVICON_PATH",
        default_value = "public/favicon.ico",
        help_heading = "Caching"
    )]
    pub favicon_path: std::path::PathBuf,

    // -- Logging --
    /// Log level
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Force pretty (human-readable) log output
    #[arg(long)]
    pub pretty: bool,

    /// Force JSON log output (overrides TTY detection)
    #[arg(long, conflicts_with = "pretty")]
    pub json: bool,

    // -- Tuning --
    /// Server-level timeout for producing a response head, in seconds
    #[arg(
        long,
        env = "REQUEST_TIMEOUT_SECS",
        default_value_t = 30,
        help_heading = "Tuning"
    )]
    pub request_timeout: u64,
}

#[derive(Args)]
pub struct HealthArgs {
    /// URL of the running instance
    #[arg(default_value = "http://localhost:8080")]
    pub url: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum UpstreamScheme {
    Https,
    Http,
}

impl UpstreamScheme {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Https => "https",
            Self::Http => "http",
        }
    }
}
