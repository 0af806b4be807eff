use std::path::PathBuf;

use clap::{Parser, Subcommand};
use localforge_cli::{ServerClient, DEFAULT_HOST};

#[derive(Parser)]
#[command(name = "localforge", version, about = "Talk to a LocalForge server")]
struct Cli {
    /// Backend URL.
    #[arg(long, global = true, env = "LOCALFORGE_HOST", default_value = DEFAULT_HOST)]
    host: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Index a folder on the server host.
    Index { path: PathBuf },
    /// Show the documents most similar to a query.
    Search {
        query: String,
        #[arg(long, default_value_t = 5)]
        top_k: usize,
    },
    /// Ask a question answered with retrieved context.
    Query { query: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = ServerClient::new(cli.host);

    match cli.command {
        Command::Index { path } => {
            let response = client.index(&path).await?;
            println!("{response}");
        }
        Command::Search { query, top_k } => {
            let response = client.search(&query, top_k).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Query { query } => {
            let answer = client.query(&query).await?;
            println!("Response:\n {}", answer.response);
        }
    }

    Ok(())
}
