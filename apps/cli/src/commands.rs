//! Command dispatch

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use rye_action::prelude::*;
use rye_action::rye::rye_metadata;
use rye_credential::CredentialDescription;
use serde::Serialize;
use serde_json::{Map, Value, json};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::cli::{Command, CreateArgs, RunArgs, StatusArgs, parse_json_object};
use crate::config::CliConfig;

pub async fn dispatch(command: Command, config: &CliConfig) -> Result<()> {
    match command {
        Command::Describe => print_json(&json!({
            "node": rye_metadata(),
            "credential": CredentialDescription::rye_api(),
        })),
        Command::Health => {
            let client = config.client()?;
            let body = client
                .health()
                .await
                .context("credential test request failed")?;
            print_json(&body)
        }
        command => {
            let input = node_input(command)?;
            let node = RyeNode::new(Arc::new(config.client()?));
            let ctx = ActionContext::new()
                .with_cancellation(cancel_on_ctrl_c())
                .with_continue_on_fail(config.continue_on_fail);

            match node.execute(input, &ctx).await {
                Ok(items) => print_json(&items),
                Err(err) => {
                    if let Some(data) = err.response_data() {
                        error!(response = %data, "request rejected");
                    }
                    Err(err.into())
                }
            }
        }
    }
}

fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let child = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, cancelling");
            child.cancel();
        }
    });
    token
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Node input for the node-backed commands.
pub fn node_input(command: Command) -> Result<NodeInput> {
    let parameters = match command {
        Command::Create(args) => create_parameters(args),
        Command::Status(args) => status_parameters(args),
        Command::Confirm(args) => json!({
            "operation": "confirm",
            "checkoutIntentId": args.id,
            "stripeToken": args.stripe_token,
        }),
        Command::VerifyBrand { domain } => json!({
            "resource": "brand",
            "operation": "verifyBrandSupport",
            "domain": domain,
        }),
        Command::Run(args) => return run_input(&args),
        Command::Health | Command::Describe => bail!("command does not run the node"),
    };
    let Value::Object(parameters) = parameters else {
        bail!("node parameters must be a JSON object");
    };
    Ok(NodeInput::single(parameters))
}

fn create_parameters(args: CreateArgs) -> Value {
    json!({
        "operation": "create",
        "productUrl": args.product_url,
        "itemQuantity": args.quantity,
        "buyerEmail": args.buyer_email,
        "shippingAddress": { "address": args.address },
    })
}

fn status_parameters(args: StatusArgs) -> Value {
    let mut params = Map::new();
    params.insert("operation".into(), json!("getStatus"));
    params.insert("checkoutIntentId".into(), json!(args.id));
    params.insert("enablePolling".into(), json!(!args.no_poll));

    let optional = [
        ("maxAttempts", args.max_attempts.map(Value::from)),
        ("waitStrategy", args.wait_strategy.map(|w| Value::from(w.as_str()))),
        ("intervalSeconds", args.interval.map(Value::from)),
        ("initialIntervalSeconds", args.initial_interval.map(Value::from)),
        ("maxIntervalSeconds", args.max_interval.map(Value::from)),
        ("stateField", args.state_field.map(Value::from)),
    ];
    for (key, value) in optional {
        if let Some(value) = value {
            params.insert(key.into(), value);
        }
    }
    if !args.terminal_states.is_empty() {
        params.insert("terminalStates".into(), json!(args.terminal_states));
    }
    Value::Object(params)
}

fn run_input(args: &RunArgs) -> Result<NodeInput> {
    let parameters = match args.params.strip_prefix('@') {
        Some(path) => parse_json_object(&read_file(Path::new(path))?),
        None => parse_json_object(&args.params),
    }
    .map_err(anyhow::Error::msg)
    .context("invalid --params")?;

    let Some(path) = &args.input else {
        return Ok(NodeInput::single(parameters));
    };
    let raw = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read items from stdin")?;
        buf
    } else {
        read_file(path)?
    };

    let values: Vec<Value> = serde_json::from_str(&raw).context("--input must be a JSON array")?;
    info!(items = values.len(), "loaded input items");
    let items = values.into_iter().map(into_item).collect();
    Ok(NodeInput::new(parameters, items))
}

/// Accept both `{ "json": {...} }` items and bare objects.
fn into_item(value: Value) -> NodeItem {
    match serde_json::from_value::<NodeItem>(value.clone()) {
        Ok(item) if value.get("json").is_some() => item,
        _ => NodeItem::new(value),
    }
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
