//! Command-line arguments

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::{Map, Value};

/// Run Rye Universal Checkout operations from the command line.
#[derive(Debug, Parser)]
#[command(name = "rye", version, about, propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Flags shared by every command. Set flags override `rye.toml` and `RYE_*`
/// variables.
#[derive(Debug, Clone, Default, Args, Serialize)]
pub struct GlobalArgs {
    /// Config file to read instead of ./rye.toml.
    #[arg(long, short = 'c', global = true, value_name = "FILE")]
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// API base URL.
    #[arg(long, global = true, value_name = "URL")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Per-request timeout in seconds.
    #[arg(long = "timeout", global = true, value_name = "SECONDS")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,

    /// Log filter, e.g. `info` or `rye_resilience=debug`.
    #[arg(long, global = true, value_name = "FILTER")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    /// Log output format.
    #[arg(long, global = true, value_parser = ["compact", "pretty", "json"])]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_format: Option<String>,

    /// Emit `{ "error": ... }` items for failed items instead of stopping.
    #[arg(long, global = true)]
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub continue_on_fail: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a checkout intent.
    Create(CreateArgs),
    /// Get the status of a checkout intent, polling until it settles.
    Status(StatusArgs),
    /// Confirm a checkout intent with a Stripe token.
    Confirm(ConfirmArgs),
    /// Check whether a merchant domain is supported.
    VerifyBrand {
        /// Merchant domain, e.g. `amazon.com`.
        domain: String,
    },
    /// Check that the API accepts the configured credential.
    Health,
    /// Run the node with explicit parameters and input items.
    Run(RunArgs),
    /// Print the node and credential descriptions as JSON.
    Describe,
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Product page URL.
    #[arg(long)]
    pub product_url: String,

    /// Buyer email address.
    #[arg(long)]
    pub buyer_email: String,

    /// Number of items to buy.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub quantity: u32,

    /// Shipping address as a JSON object (`firstName`, `lastName`,
    /// `address1`, `city`, `provinceCode`, `postalCode`, ...).
    #[arg(long, value_name = "JSON", value_parser = parse_json_object)]
    pub address: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum WaitStrategyArg {
    Fixed,
    Exponential,
}

impl WaitStrategyArg {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Exponential => "exponential",
        }
    }
}

#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Checkout intent id.
    pub id: String,

    /// Fetch once instead of polling.
    #[arg(long)]
    pub no_poll: bool,

    /// Maximum number of status checks.
    #[arg(long, value_name = "N")]
    pub max_attempts: Option<u32>,

    /// Wait strategy between checks.
    #[arg(long, value_enum)]
    pub wait_strategy: Option<WaitStrategyArg>,

    /// Fixed wait between checks, in seconds.
    #[arg(long, value_name = "SECONDS")]
    pub interval: Option<f64>,

    /// First exponential wait, in seconds.
    #[arg(long, value_name = "SECONDS")]
    pub initial_interval: Option<f64>,

    /// Longest exponential wait, in seconds.
    #[arg(long, value_name = "SECONDS")]
    pub max_interval: Option<f64>,

    /// Response field holding the checkout state.
    #[arg(long, value_name = "FIELD")]
    pub state_field: Option<String>,

    /// Comma-separated states after which polling stops.
    #[arg(long, value_name = "STATES", value_delimiter = ',')]
    pub terminal_states: Vec<String>,
}

#[derive(Debug, Args)]
pub struct ConfirmArgs {
    /// Checkout intent id.
    pub id: String,

    /// Stripe payment token.
    #[arg(long, env = "RYE_STRIPE_TOKEN", hide_env_values = true)]
    pub stripe_token: String,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Node parameters: a JSON object, or `@path` to read one from a file.
    #[arg(long, value_name = "JSON|@FILE")]
    pub params: String,

    /// File holding a JSON array of input items; `-` reads stdin. Without
    /// it the node runs on a single empty item.
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,
}

pub fn parse_json_object(raw: &str) -> Result<Map<String, Value>, String> {
    match serde_json::from_str(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(format!("expected a JSON object, got {other}")),
        Err(e) => Err(format!("invalid JSON: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn status_flags() {
        let cli = Cli::try_parse_from([
            "rye",
            "status",
            "ci_1",
            "--interval",
            "2",
            "--terminal-states",
            "completed,failed",
            "--continue-on-fail",
        ])
        .unwrap();

        let Command::Status(args) = cli.command else {
            panic!("expected status");
        };
        assert_eq!(args.id, "ci_1");
        assert_eq!(args.interval, Some(2.0));
        assert_eq!(args.terminal_states, vec!["completed", "failed"]);
        assert!(cli.global.continue_on_fail);
    }

    #[test]
    fn address_must_be_an_object() {
        assert!(parse_json_object(r#"{"city":"Springfield"}"#).is_ok());
        assert!(parse_json_object("[1,2]").unwrap_err().contains("JSON object"));
        assert!(parse_json_object("{").unwrap_err().contains("invalid JSON"));
    }
}
