use clap::{command, Parser, ValueEnum};
use reqwest::NoProxy;
use std::{fmt::Debug, path::PathBuf, time::Duration};
use url::Url;

fn validate_host(s: &str) -> Result<Url, anyhow::Error> {
    let mut url = Url::parse(s)?;
    anyhow::ensure!(!url.cannot_be_a_base(), "Must be fully qualified URL");
    anyhow::ensure!(
        matches!(url.scheme(), "http" | "https"),
        "FusionAuth host must use http or https"
    );
    // Relative API paths are joined onto the host, which needs a trailing slash
    // to keep any reverse proxy prefix.
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn parse_humantime(s: &str) -> Result<Duration, anyhow::Error> {
    match s.parse::<humantime::Duration>() {
        Ok(v) => Ok(v.into()),
        Err(e) => Err(e.into()),
    }
}

fn parse_no_proxy(s: &str) -> Result<Option<NoProxy>, anyhow::Error> {
    NoProxy::from_string(s)
        .map(Some)
        .ok_or(anyhow::anyhow!("Could not parse no_proxy"))
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[allow(clippy::large_enum_variant)]
pub enum Args {
    /// Print the provider schema as JSON
    Schema,
    /// Run a single lifecycle operation against one resource or data source instance
    Run(RunArgs),
}

#[derive(clap::Args, Clone)]
pub struct ConnectionArgs {
    /// FusionAuth host
    ///
    /// Base URL of the FusionAuth instance, for example "https://auth.example.com".
    #[arg(long, value_parser = validate_host, env = "FA_DOMAIN")]
    pub host: Url,

    /// FusionAuth API key
    ///
    /// Sent as the Authorization header on every request.
    #[arg(long, env = "FA_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Request timeout
    ///
    /// Maximum time for a single request to FusionAuth.
    #[arg(long, value_parser = parse_humantime, default_value = "30s", env = "FA_TIMEOUT")]
    pub timeout: Duration,

    /// Proxy for requests to FusionAuth
    ///
    /// The address to the proxy server.
    /// For example "http://127.0.0.1:3128"
    #[arg(long, default_value = None, env = "HTTP_PROXY")]
    pub http_proxy: Option<String>,

    /// Exclusions to proxy
    ///
    /// A comma separated list of domains to exclude from the proxy.
    /// For example "localhost,github.com"
    #[arg(long, value_parser = parse_no_proxy, default_value = None, env = "NO_PROXY")]
    pub no_proxy: Option<NoProxy>,
}

// The API key must never end up in logs.
impl Debug for ConnectionArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionArgs")
            .field("host", &self.host.as_str())
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("http_proxy", &self.http_proxy)
            .finish()
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Resource,
    Data,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Validate,
    Create,
    Read,
    Update,
    Delete,
    Import,
    Upgrade,
}

#[derive(clap::Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Whether the type names a resource or a data source
    #[arg(long, value_enum, default_value_t = Kind::Resource)]
    pub kind: Kind,

    /// Terraform type name, for example "fusionauth_lambda"
    #[arg(long = "type")]
    pub type_name: String,

    /// Lifecycle operation to run
    #[arg(long, value_enum)]
    pub op: Operation,

    /// Instance state file
    ///
    /// JSON document of the form {"id": ..., "attributes": {...}}.
    /// Read from stdin when omitted.
    #[arg(long)]
    pub state: Option<PathBuf>,

    /// Schema version the given state was written with
    ///
    /// Only used by the upgrade operation.
    #[arg(long, default_value_t = 0)]
    pub schema_version: i64,

    /// Id of the object to import
    #[arg(long)]
    pub id: Option<String>,
}
