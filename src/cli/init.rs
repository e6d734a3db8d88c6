use crate::models::config::{API_KEY_ENV, SMTP_PASSWORD_ENV};
use crate::models::AppConfig;
use crate::Result;
use colored::Colorize;
use dialoguer::Confirm;
use std::path::{Path, PathBuf};

/// Write a default config file, asking before overwriting an existing one
pub fn run(path: Option<&Path>, force: bool) -> Result<()> {
    let target: PathBuf = match path {
        Some(p) => p.to_path_buf(),
        None => AppConfig::default_path()
            .ok_or_else(|| anyhow::anyhow!("Cannot determine the config directory"))?,
    };

    if target.exists() && !force {
        println!(
            "   {} Config already exists at {}",
            "⚠️".yellow(),
            target.display()
        );

        let overwrite = Confirm::new()
            .with_prompt("Overwrite with defaults?")
            .default(false)
            .interact()?;

        if !overwrite {
            println!("   Keeping existing config");
            return Ok(());
        }
    }

    AppConfig::default().save(&target)?;

    println!("{}", "✅ Config written".green().bold());
    println!("   {}", target.display());
    println!();
    println!("{}", "Next steps:".cyan());
    println!("   1. export {}=<your Tavily key>", API_KEY_ENV);
    println!("   2. export {}=<your SMTP app password>", SMTP_PASSWORD_ENV);
    println!("   3. Adjust [smtp] username/host in the config if you are not using Gmail");

    Ok(())
}
