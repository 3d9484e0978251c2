///
/// This module implements the CLI interface for ragflow-kb: argument parsing and the
/// async entrypoint that strings config, lookup, pagination and rendering together.
///
/// All domain logic lives in [`ragflow-kb-core`]; this module is CLI glue only.
///
/// ## How To Use
/// - Command-line users: run the `ragflow-kb` binary with `--help`.
/// - Programmatic/integration use: call [`run`] with a constructed [`Cli`], or
///   [`execute`] with any [`KnowledgeBaseApi`] implementation.
///
/// [`ragflow-kb-core`]: ../../ragflow-kb-core/
use crate::client::RagflowClient;
use crate::load_config::load_config;
use anyhow::Result;
use clap::{ArgGroup, Parser};
use ragflow_kb_core::config::{ConfigLayer, DEFAULT_CONFIG_FILE};
use ragflow_kb_core::contract::KnowledgeBaseApi;
use ragflow_kb_core::format::{
    render_brief, render_documents, render_knowledge_bases, write_output, Destination,
    OutputFormat,
};
use ragflow_kb_core::lister::{list_all_documents, DEFAULT_PAGE_SIZE};
use ragflow_kb_core::resolve::find_knowledge_base;
use ragflow_kb_core::{KbError, KbResult};
use std::path::PathBuf;

/// CLI for ragflow-kb: list knowledge bases and their documents.
#[derive(Parser, Debug)]
#[clap(
    name = "ragflow-kb",
    version,
    about = "List RAGFlow knowledge bases and the documents they contain"
)]
#[clap(group(
    ArgGroup::new("target")
        .required(true)
        .multiple(true)
        .args(["kb_id", "kb_name", "list_kbs"])
))]
pub struct Cli {
    /// Knowledge base ID to list documents from
    #[clap(long)]
    pub kb_id: Option<String>,

    /// Knowledge base name (case-insensitive substring match; first match wins; takes precedence over --kb-id)
    #[clap(long)]
    pub kb_name: Option<String>,

    /// List all knowledge bases instead of documents (takes precedence over --kb-id/--kb-name)
    #[clap(long)]
    pub list_kbs: bool,

    /// Output format: table, json or csv
    #[clap(long, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Print document names only, one per line
    #[clap(long)]
    pub brief: bool,

    /// Write output to this file instead of stdout
    #[clap(long)]
    pub output: Option<PathBuf>,

    /// Path to the JSON config file
    #[clap(long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// API base URL including version prefix, e.g. http://localhost:9380/api/v1
    #[clap(long)]
    pub api_url: Option<String>,

    /// API key sent as a bearer token
    #[clap(long)]
    pub api_key: Option<String>,

    /// Documents requested per page
    #[clap(long, default_value_t = DEFAULT_PAGE_SIZE, value_parser = clap::value_parser!(u32).range(1..))]
    pub page_size: u32,
}

impl Cli {
    fn destination(&self) -> Destination {
        match &self.output {
            Some(path) => Destination::File(path.clone()),
            None => Destination::Stdout,
        }
    }
}

/// Run the requested listing against `api` and write the rendering.
pub async fn execute<A>(cli: &Cli, api: &A) -> KbResult<()>
where
    A: KnowledgeBaseApi + ?Sized,
{
    let destination = cli.destination();

    if cli.list_kbs {
        let kbs = api.list_knowledge_bases().await?;
        if kbs.is_empty() {
            tracing::warn!("No knowledge bases found");
        }
        let rendered = render_knowledge_bases(&kbs, cli.format)?;
        return write_output(&rendered, &destination);
    }

    let kb_id = match (&cli.kb_name, &cli.kb_id) {
        (Some(name), _) => find_knowledge_base(api, name).await?.id,
        (None, Some(id)) => id.clone(),
        (None, None) => {
            return Err(KbError::Config(
                "one of --kb-id, --kb-name or --list-kbs is required".to_string(),
            ))
        }
    };

    let docs = list_all_documents(api, &kb_id, cli.page_size).await?;
    if docs.is_empty() {
        tracing::warn!(kb_id = %kb_id, "Knowledge base has no documents");
    }

    let rendered = if cli.brief {
        render_brief(&docs)
    } else {
        render_documents(&docs, cli.format)?
    };
    write_output(&rendered, &destination)
}

/// Async CLI entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!(format = %cli.format, list_kbs = cli.list_kbs, "ragflow-kb starting");

    let flags = ConfigLayer::new(cli.api_url.clone(), cli.api_key.clone());
    let settings = load_config(&cli.config, flags)?;
    let client = RagflowClient::new(&settings)?;

    match execute(&cli, &client).await {
        Ok(()) => {
            tracing::info!("Listing complete");
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "Listing failed");
            Err(e.into())
        }
    }
}
