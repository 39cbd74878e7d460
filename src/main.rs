//! topicgraph CLI: query and edit a topic hierarchy stored in SQLite.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;

use topicgraph::config::{load_config, TopicGraphConfig};
use topicgraph::error::LookupContext;
use topicgraph::observability::init_logging;
use topicgraph::{
    NewTopic, SqliteTopicStore, Topic, TopicChanges, TopicGraph, TopicVersioning,
};

#[derive(Parser)]
#[command(name = "topicgraph")]
#[command(author, version, about = "Versioned topic hierarchy queries", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// SQLite database file (overrides config and TOPICGRAPH_DB)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// YAML config file (overrides TOPICGRAPH_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Query exact versions instead of redirecting to the latest
    #[arg(long, global = true)]
    all_versions: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the tree rooted at a topic
    Tree { id: String },

    /// Print one tree per root topic
    Forest,

    /// Print the root-first ancestor chain of a topic
    Path { id: String },

    /// Print every topic below a topic
    Descendants { id: String },

    /// Find the shortest connecting path between two topics
    ShortestPath { from: String, to: String },

    /// Create a new topic
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        content: String,
        #[arg(long)]
        description: Option<String>,
        /// Parent topic id
        #[arg(long)]
        parent: Option<String>,
        #[arg(long)]
        created_by: Option<String>,
    },

    /// Create a new version of a topic
    NewVersion {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a topic and all its versions (refused while it has children)
    Delete { id: String },

    /// Import a JSON array of topic records
    Import { file: PathBuf },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    init_logging(&config.logging.filter);

    match run(cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, config: &TopicGraphConfig) -> topicgraph::Result<()> {
    let db_path = cli.db.clone().unwrap_or_else(|| config.db_path());
    let only_latest = config.query.only_latest && !cli.all_versions;
    let store = open_store(&db_path)?;
    let graph = TopicGraph::new(&store);
    let versioning = TopicVersioning::new(&store);

    match cli.command {
        Commands::Tree { id } => print_json(&graph.build_tree(&id, only_latest)?),
        Commands::Forest => print_json(&graph.build_forest(only_latest)?),
        Commands::Path { id } => print_json(&graph.get_path(&id, only_latest)?),
        Commands::Descendants { id } => print_json(&graph.get_descendants(&id, only_latest)?),
        Commands::ShortestPath { from, to } => {
            print_json(&graph.find_shortest_path(&from, &to, only_latest)?)
        }
        Commands::Create {
            name,
            content,
            description,
            parent,
            created_by,
        } => print_json(&versioning.create_topic(NewTopic {
            name,
            content,
            description,
            parent_topic_id: parent,
            created_by,
        })?),
        Commands::NewVersion {
            id,
            name,
            content,
            description,
        } => print_json(&versioning.create_new_version(
            &id,
            TopicChanges {
                name,
                content,
                description: description.map(Some),
            },
        )?),
        Commands::Delete { id } => {
            let deleted = versioning.delete_topic(&id)?;
            print_json(&serde_json::json!({ "id": id, "deletedVersions": deleted }))
        }
        Commands::Import { file } => {
            let text = std::fs::read_to_string(&file)?;
            let topics: Vec<Topic> = serde_json::from_str(&text)?;
            let imported = store.import_topics(&topics).during("import topics")?;
            tracing::info!(imported, file = %file.display(), "imported topics");
            print_json(&serde_json::json!({ "imported": imported }))
        }
    }
}

fn open_store(db_path: &Path) -> topicgraph::Result<SqliteTopicStore> {
    SqliteTopicStore::new(&db_path.to_string_lossy()).during("open database")
}

fn print_json<T: Serialize>(value: &T) -> topicgraph::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
