use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

use resource_router::routing::{Args, ReverseResolver, SerializedSchema};

#[derive(Parser)]
#[command(name = "resolve-cli")]
#[command(about = "Resolve resource URLs from a served or saved schema", long_about = None)]
struct Cli {
    #[command(flatten)]
    source: Source,

    #[command(subcommand)]
    command: Commands,
}

#[derive(ClapArgs)]
struct Source {
    /// Schema URL of a running server
    #[arg(short, long, default_value = "http://localhost:8080/schema")]
    url: String,

    /// Read the schema from a JSON file instead of the URL
    #[arg(short, long)]
    file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a `resource[:endpoint]` key to a URL
    Resolve {
        key: String,

        /// Positional param values, in declared order
        values: Vec<String>,

        /// Named param as name=value (repeatable); conflicts with positional values
        #[arg(short, long = "param", value_parser = parse_pair, conflicts_with = "values")]
        params: Vec<(String, String)>,
    },
    /// List every key with its template, params and allowed methods
    List,
}

fn parse_pair(input: &str) -> Result<(String, String), String> {
    input
        .split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected name=value, got {input:?}"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let schema = match &cli.source.file {
        Some(path) => SerializedSchema::from_json(&std::fs::read_to_string(path)?)?,
        None => fetch_schema(&cli.source.url).await?,
    };

    match cli.command {
        Commands::Resolve { key, values, params } => {
            let resolver = ReverseResolver::from_schema(&schema)?;
            let args = if params.is_empty() {
                Args::Positional(values)
            } else {
                Args::Named(params.into_iter().collect())
            };
            println!("{}", resolver.reverse(&key, &args)?);
        }
        Commands::List => {
            for (name, resource) in &schema.resources {
                println!("{name}\t{}", display_url(&resource.url));
                for (endpoint_name, endpoint) in &resource.endpoint {
                    println!(
                        "{name}:{endpoint_name}\t{}\tparams=[{}]\tallow=[{}]",
                        display_url(&endpoint.url),
                        endpoint.params.join(", "),
                        endpoint.allow.join(", "),
                    );
                }
            }
        }
    }

    Ok(())
}

async fn fetch_schema(url: &str) -> Result<SerializedSchema, Box<dyn std::error::Error>> {
    let res = reqwest::get(url).await?;
    let status = res.status();
    if !status.is_success() {
        return Err(format!("schema endpoint returned status {status}").into());
    }
    Ok(res.json::<SerializedSchema>().await?)
}

fn display_url(url: &str) -> &str {
    if url.is_empty() {
        "(no url)"
    } else {
        url
    }
}
