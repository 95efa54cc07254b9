use anyhow::{bail, Context};
use clap::Parser;
use odata_sparql::config::{self, StoreTarget};
use odata_sparql::entity_catalog::SchemaConfig;
use odata_sparql::expand_compiler::ExpandTree;
use odata_sparql::filter_compiler::FilterExpr;
use odata_sparql::query_engine::{QueryEngine, ReadRequest};
use odata_sparql::store::{HttpSparqlStore, TripleStore};

/// odata-sparql - read OData-style entity sets from a SPARQL triple store
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// YAML entity schema
    #[arg(long)]
    schema: Option<String>,

    /// Entity set to read
    #[arg(long)]
    entity_set: String,

    /// Navigation path to expand, e.g. `Children/Content` (repeatable)
    #[arg(long)]
    expand: Vec<String>,

    /// Filter expression as JSON
    #[arg(long)]
    filter: Option<String>,

    /// Read a single entity by id
    #[arg(long)]
    id: Option<String>,

    /// SPARQL query endpoint
    #[arg(long)]
    endpoint: Option<String>,

    /// Turtle file loaded into an in-memory store
    #[arg(long, conflicts_with = "endpoint")]
    data: Option<String>,

    /// Store request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Print the generated SPARQL instead of running it
    #[arg(long)]
    sparql_only: bool,
}

impl Cli {
    fn config(&self) -> config::CliConfig {
        config::CliConfig {
            schema_path: self.schema.clone(),
            endpoint_url: self.endpoint.clone(),
            data_path: self.data.clone(),
            request_timeout_secs: self.timeout_secs,
        }
    }

    fn request(&self) -> anyhow::Result<ReadRequest> {
        let mut request = match &self.id {
            Some(id) => ReadRequest::by_id(&self.entity_set, id_literal(id)),
            None => ReadRequest::collection(&self.entity_set),
        };
        request = request.with_expand(ExpandTree::parse(&self.expand));
        if let Some(filter) = &self.filter {
            let filter: FilterExpr =
                serde_json::from_str(filter).context("--filter is not a valid filter expression")?;
            request = request.with_filter(filter);
        }
        Ok(request)
    }
}

/// Numeric ids compare as numbers, anything else as a string.
fn id_literal(id: &str) -> FilterExpr {
    match id.parse::<f64>() {
        Ok(value) if value.is_finite() => FilterExpr::number(value),
        _ => FilterExpr::string(id),
    }
}

async fn open_store(config: &config::ServiceConfig) -> anyhow::Result<Box<dyn TripleStore>> {
    match config.store_target()? {
        StoreTarget::Endpoint(endpoint) => {
            log::info!("Using SPARQL endpoint {}", endpoint);
            Ok(Box::new(HttpSparqlStore::new(endpoint, config.request_timeout())?))
        }
        #[cfg(feature = "embedded")]
        StoreTarget::Data(path) => {
            let turtle = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("failed to read {}", path))?;
            let store = odata_sparql::store::EmbeddedStore::from_turtle(&turtle)?;
            log::info!("Loaded {} triples from {}", store.len()?, path);
            Ok(Box::new(store))
        }
        #[cfg(not(feature = "embedded"))]
        StoreTarget::Data(_) => bail!("--data requires the `embedded` feature"),
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = config::ServiceConfig::from_env()?;
    config.merge(cli.config())?;

    let schema = SchemaConfig::from_yaml_file(&config.schema_path)?.to_entity_schema()?;
    let engine = QueryEngine::new(&schema);
    let request = cli.request()?;

    if cli.sparql_only {
        println!("{}", engine.compile(&request)?.sparql);
        return Ok(());
    }

    let store = open_store(&config).await?;
    let result = engine.execute(store.as_ref(), &request).await?;
    if request.is_by_id() && result.is_null() {
        bail!("{} has no entity with id {:?}", request.entity_set, cli.id);
    }
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

#[tokio::main]
async fn main() {
    // Defaults to INFO level, can be overridden with RUST_LOG env var
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
