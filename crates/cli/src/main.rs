mod config_cmd;
mod db_cmd;
mod output;
mod schema_cmd;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use authdb_runtime_config::CONFIG_FILE_NAME;
use authdb_schema::Backend;

#[derive(Parser)]
#[command(name = "authdb", about = "authdb CLI - auth schema rendering and database maintenance")]
struct Cli {
    /// Config file (missing file means defaults)
    #[arg(long, global = true, default_value = CONFIG_FILE_NAME)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the CREATE TABLE / CREATE INDEX statements
    Schema {
        /// SQL dialect (defaults to `schema.backend` from the config)
        #[arg(long)]
        backend: Option<Backend>,
    },

    /// Describe the table catalog
    Describe {
        /// Only this table
        table: Option<String>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Create or upgrade the database schema
    Migrate {
        /// Database file (defaults to `database.path` from the config)
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// Delete expired sessions and verifications
    PurgeExpired {
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// Row counts per table
    Stats {
        #[arg(long)]
        db: Option<PathBuf>,

        #[arg(long)]
        json: bool,
    },

    /// Show or initialize configuration
    Config(config_cmd::ConfigArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Schema { backend } => schema_cmd::run_schema(&cli.config, backend),
        Commands::Describe { table, json } => {
            schema_cmd::run_describe(table.as_deref(), output::OutputFormat::from_flag(json))
        }
        Commands::Migrate { db } => db_cmd::run_migrate(&cli.config, db),
        Commands::PurgeExpired { db } => db_cmd::run_purge(&cli.config, db),
        Commands::Stats { db, json } => {
            db_cmd::run_stats(&cli.config, db, output::OutputFormat::from_flag(json))
        }
        Commands::Config(args) => config_cmd::run(&cli.config, args),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
