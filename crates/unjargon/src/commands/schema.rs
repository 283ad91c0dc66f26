//! Schema command: JSON Schema for dictionary files.

use clap::Args;
use tracing::instrument;

use unjargon_core::dictionary::source_schema;

/// Arguments for the `schema` subcommand.
#[derive(Args, Debug, Default)]
pub struct SchemaArgs {}

/// Print the dictionary file schema. The output is always JSON.
#[instrument(name = "cmd_schema", skip_all)]
pub fn cmd_schema(_args: SchemaArgs) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&source_schema())?);
    Ok(())
}
