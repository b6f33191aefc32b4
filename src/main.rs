use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;

use course_portal::config::ServerConfig;
use course_portal::db::prepare_database;
use course_portal::error::DynError;
use course_portal::seed::seed_sample_course;
use course_portal::serve::serve;

#[derive(Parser, Debug)]
#[command(author, version, about = "Online course platform: catalog, enrollment, progress and grading API")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API server
    Serve {
        /// Path to config file (TOML format)
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Create the database schema and exit
    InitDb {
        /// Path to config file (TOML format)
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Insert the sample course if it is missing
    Seed {
        /// Path to config file (TOML format)
        #[arg(short, long)]
        config: PathBuf,
    },
}

fn main() -> Result<(), DynError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let rt = tokio::runtime::Runtime::new()?;
    match args.command {
        Command::Serve { config } => {
            let config = ServerConfig::load(&config)?;
            rt.block_on(serve(&config))
        }
        Command::InitDb { config } => {
            let config = ServerConfig::load(&config)?;
            rt.block_on(async {
                prepare_database(&config.database_path).await?;
                info!("Database ready at {}", config.database_path.display());
                Ok::<(), DynError>(())
            })
        }
        Command::Seed { config } => {
            let config = ServerConfig::load(&config)?;
            rt.block_on(async {
                let pool = prepare_database(&config.database_path).await?;
                if let Some(course) = seed_sample_course(&pool).await? {
                    info!("Created sample course '{}'", course.course.title);
                }
                Ok::<(), DynError>(())
            })
        }
    }
}
