//! Agent Schema - command-line entry point
//!
//! Validates agent payloads, prints their JSON Schemas and builds user storage
//! handles from query files.

use agent_schema::config::SchemaToolConfig;
use agent_schema::observability::{init_default_logging, init_from_config};
use agent_schema::payload_span;
use agent_schema::protocol::{
    decode_str, encode_pretty, encode_string, json_schema, AgentQuery, AgentResponse, Embed,
    Message,
};
use agent_schema::storage::user_storage;
use agent_schema::PayloadError;
use clap::{Parser, Subcommand, ValueEnum};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::io::Read;
use std::path::PathBuf;
use std::process;
use tracing::{error, info};

/// Validate and inspect agent message payloads
#[derive(Parser)]
#[command(name = "agent-schema")]
#[command(about = "Validate and inspect agent message payloads")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a payload and print its canonical JSON form
    Validate {
        /// Record type the payload should decode to
        #[arg(short, long, value_enum)]
        kind: PayloadKind,
        /// Payload file, or "-" for stdin
        #[arg(default_value = "-")]
        input: String,
        /// Print compact JSON instead of indented
        #[arg(long)]
        compact: bool,
    },
    /// Print the JSON Schema of a record type
    Schema {
        #[arg(short, long, value_enum)]
        kind: PayloadKind,
    },
    /// Decode a query and print the scope of its user storage handle
    Storage {
        /// Query file, or "-" for stdin
        #[arg(default_value = "-")]
        input: String,
        /// Agent requesting storage (defaults to [agent].id from the config)
        #[arg(long, env = "AGENT_ID")]
        agent_id: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PayloadKind {
    Embed,
    Message,
    Query,
    Response,
}

fn main() {
    let cli = Cli::parse();

    let config = match load_configuration(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            init_default_logging();
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    init_from_config(&config.logging, cli.verbose);

    let result = match cli.command {
        Commands::Validate {
            kind,
            input,
            compact,
        } => handle_validate(kind, &input, compact),
        Commands::Schema { kind } => handle_schema(kind),
        Commands::Storage { input, agent_id } => {
            handle_storage(&config, &input, agent_id.as_deref())
        }
    };

    if let Err(e) = result {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

fn load_configuration(
    config_path: &Option<PathBuf>,
) -> Result<SchemaToolConfig, Box<dyn std::error::Error>> {
    match config_path {
        Some(path) => Ok(SchemaToolConfig::load_from_file(path)?),
        None => {
            let default_paths = ["agent-schema.toml", "config/agent-schema.toml"];

            for path_str in default_paths {
                let path = PathBuf::from(path_str);
                if path.exists() {
                    return Ok(SchemaToolConfig::load_from_file(&path)?);
                }
            }

            Ok(SchemaToolConfig::default())
        }
    }
}

fn read_input(input: &str) -> Result<String, std::io::Error> {
    if input == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(input)
    }
}

fn canonicalize<T>(payload: &str, compact: bool) -> Result<String, PayloadError>
where
    T: DeserializeOwned + JsonSchema + Serialize + 'static,
{
    let record: T = decode_str(payload)?;
    let rendered = if compact {
        encode_string(&record)?
    } else {
        encode_pretty(&record)?
    };
    Ok(rendered)
}

fn handle_validate(
    kind: PayloadKind,
    input: &str,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let _span = payload_span!(command = "validate", kind = ?kind, input = %input).entered();

    let payload = read_input(input)?;
    let result = match kind {
        PayloadKind::Embed => canonicalize::<Embed>(&payload, compact),
        PayloadKind::Message => canonicalize::<Message>(&payload, compact),
        PayloadKind::Query => canonicalize::<AgentQuery>(&payload, compact),
        PayloadKind::Response => canonicalize::<AgentResponse>(&payload, compact),
    };

    match result {
        Ok(rendered) => {
            info!("Payload is a valid {:?}", kind);
            println!("{rendered}");
            Ok(())
        }
        Err(e) => {
            for violation in e.violations() {
                error!(
                    field = %violation.field,
                    expected = %violation.expected,
                    actual = %violation.actual,
                    "Schema violation"
                );
            }
            Err(e.into())
        }
    }
}

fn handle_schema(kind: PayloadKind) -> Result<(), Box<dyn std::error::Error>> {
    let schema = match kind {
        PayloadKind::Embed => json_schema::<Embed>(),
        PayloadKind::Message => json_schema::<Message>(),
        PayloadKind::Query => json_schema::<AgentQuery>(),
        PayloadKind::Response => json_schema::<AgentResponse>(),
    };
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

fn storage_scope(
    config: &SchemaToolConfig,
    payload: &str,
    agent_id: Option<&str>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let agent_id = config.resolve_agent_id(agent_id)?;
    let query: AgentQuery = decode_str(payload)?;

    let storage = user_storage(&query, &agent_id);
    info!(agent_id = %storage.agent_id(), "Resolved user storage scope");

    Ok(json!({
        "agent_id": storage.agent_id(),
        "access_token_present": storage.access_token().is_some(),
    }))
}

fn handle_storage(
    config: &SchemaToolConfig,
    input: &str,
    agent_id: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let _span = payload_span!(command = "storage", input = %input).entered();

    let payload = read_input(input)?;
    let scope = storage_scope(config, &payload, agent_id)?;
    println!("{}", serde_json::to_string_pretty(&scope)?);
    Ok(())
}
