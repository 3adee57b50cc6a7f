//! Implementation of the `questline init` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tokio::fs;

use crate::adapters::sqlite::initialize_database;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;
use crate::infrastructure::config::CONFIG_DIR;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Force reinitialization even if already initialized
    #[arg(long, short)]
    pub force: bool,

    /// Target directory (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Debug, serde::Serialize)]
pub struct InitOutput {
    pub success: bool,
    pub message: String,
    pub initialized_path: PathBuf,
    pub config_written: bool,
    pub database_path: Option<PathBuf>,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.message.clone()];
        if self.config_written {
            lines.push(format!("Configuration written to {CONFIG_DIR}/config.yaml"));
        }
        if let Some(db) = &self.database_path {
            lines.push(format!("Database initialized at {}", db.display()));
        }
        lines.join("\n")
    }
}

pub async fn execute(args: InitArgs, json_mode: bool) -> Result<()> {
    let target_path = if args.path.is_absolute() {
        args.path.clone()
    } else {
        std::env::current_dir().context("Failed to get current directory")?.join(&args.path)
    };

    let questline_dir = target_path.join(CONFIG_DIR);

    if questline_dir.exists() && !args.force {
        let output_data = InitOutput {
            success: false,
            message: "Project already initialized. Use --force to reinitialize.".to_string(),
            initialized_path: target_path,
            config_written: false,
            database_path: None,
        };
        output(&output_data, json_mode);
        return Ok(());
    }

    if args.force && questline_dir.exists() {
        fs::remove_dir_all(&questline_dir)
            .await
            .with_context(|| format!("Failed to remove existing {CONFIG_DIR} directory"))?;
    }

    fs::create_dir_all(&questline_dir)
        .await
        .with_context(|| format!("Failed to create {}", questline_dir.display()))?;

    let mut config = Config::default();
    let db_path = questline_dir.join("questline.db");
    config.database.path = db_path.display().to_string();

    let yaml = serde_yaml::to_string(&Config::default()).context("Failed to serialize default config")?;
    fs::write(questline_dir.join("config.yaml"), yaml)
        .await
        .context("Failed to write config.yaml")?;

    initialize_database(&config.database)
        .await
        .context("Failed to initialize database")?;

    let output_data = InitOutput {
        success: true,
        message: if args.force {
            "Project reinitialized successfully.".to_string()
        } else {
            "Project initialized successfully.".to_string()
        },
        initialized_path: target_path,
        config_written: true,
        database_path: Some(db_path),
    };

    output(&output_data, json_mode);
    Ok(())
}
