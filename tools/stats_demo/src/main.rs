use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use adstats::{parser, CampaignStat, MemoryStore, Registry, StatsRequest, StatsService};

#[derive(Parser)]
#[command(name = "stats-demo")]
#[command(about = "Query campaign statistics: filter, group, sort")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a query over a JSON file of campaign rows and print the records
    Query {
        /// JSON array of campaign rows
        #[arg(long, default_value = "tools/stats_demo/data/sample.json")]
        data: PathBuf,

        #[command(flatten)]
        request: RequestArgs,

        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },
    /// Print the SQL a query would run
    Explain {
        #[command(flatten)]
        request: RequestArgs,
    },
}

#[derive(Args)]
struct RequestArgs {
    /// Registry YAML mapping fields to physical columns
    #[arg(long)]
    registry: Option<PathBuf>,

    /// Inclusive lower date bound, DD-MM-YYYY
    #[arg(long)]
    date_from: Option<String>,

    /// Exclusive upper date bound, DD-MM-YYYY
    #[arg(long)]
    date_to: Option<String>,

    /// Channels to keep (comma separated)
    #[arg(long, value_delimiter = ',')]
    channels: Option<Vec<String>>,

    /// Countries to keep (comma separated)
    #[arg(long, value_delimiter = ',')]
    countries: Option<Vec<String>>,

    /// Operating systems to keep (comma separated)
    #[arg(long, value_delimiter = ',')]
    os: Option<Vec<String>>,

    /// Dimensions to group by (comma separated)
    #[arg(long, value_delimiter = ',')]
    groupby: Option<Vec<String>>,

    /// Sort field; prefix with '-' for descending
    #[arg(long, allow_hyphen_values = true)]
    sort: Option<String>,

    /// asc or desc, for a sort field without '-'
    #[arg(long)]
    ordering: Option<String>,
}

impl RequestArgs {
    fn load_registry(&self) -> Result<Registry> {
        match &self.registry {
            Some(path) => parser::parse_file(path)
                .with_context(|| format!("loading registry {}", path.display())),
            None => Ok(Registry::default()),
        }
    }

    fn to_request(&self) -> StatsRequest {
        StatsRequest {
            date_from: self.date_from.clone(),
            date_to: self.date_to.clone(),
            channels: self.channels.clone(),
            countries: self.countries.clone(),
            os: self.os.clone(),
            groupby: self.groupby.clone(),
            sort: self.sort.clone(),
            ordering: self.ordering.clone(),
        }
    }
}

fn load_stats(path: &Path) -> Result<Vec<CampaignStat>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Query { data, request, pretty } => {
            let registry = request.load_registry()?;
            let stats = load_stats(&data)?;
            info!(rows = stats.len(), path = %data.display(), "loaded campaign rows");

            let store = MemoryStore::from_stats(&registry, &stats);
            let service = StatsService::new(registry, store);
            let records = service.query(&request.to_request())?;

            let out = if pretty {
                serde_json::to_string_pretty(&records)?
            } else {
                serde_json::to_string(&records)?
            };
            println!("{}", out);
        }
        Commands::Explain { request } => {
            let registry = request.load_registry()?;
            let service = StatsService::new(registry, MemoryStore::new("", Vec::new()));
            println!("{}", service.explain(&request.to_request())?);
        }
    }

    Ok(())
}
