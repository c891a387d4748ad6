//! Install command

use std::io::Write;
use std::path::Path;

use anyhow::{Context as _, Result};
use crossterm::style::Stylize;
use obt_core::paths::config_path;
use obt_core::{Config, ResolveRequest};
use obt_schema::RepoRef;

use super::build_context;
use crate::ops::{self, Context};
use crate::ui::Output;

/// Arguments of `obt install`
#[derive(Debug, Clone, Default)]
pub struct InstallArgs {
    pub repo: String,
    pub path: Option<std::path::PathBuf>,
    pub binary: Option<String>,
    pub tag: Option<String>,
    pub yes: bool,
}

/// Install one binary from a GitHub release
pub async fn install(history: &Path, args: InstallArgs) -> Result<()> {
    let repo: RepoRef = args.repo.parse()?;
    let config = Config::load(&config_path())?;
    let location = config.install_dir(args.path.as_deref());

    let output = Output::new();
    let ctx = build_context(history, &output)?;
    let request = ResolveRequest {
        repo,
        binary_name: args.binary,
        tag: args.tag,
    };

    let result = run(&ctx, &output, &request, &location, args.yes).await;

    output.wait_async().await;
    ctx.history.shutdown();
    result
}

async fn run(
    ctx: &Context,
    output: &Output,
    request: &ResolveRequest,
    location: &Path,
    yes: bool,
) -> Result<()> {
    let prepared = ops::install::prepare(ctx, request, location)
        .await
        .with_context(|| format!("Failed to install {}", request.repo))?;

    if prepared.dest.exists() && !yes {
        output.wait_async().await;
        if !confirm_overwrite(&prepared.dest)? {
            output.info("Install cancelled.");
            return Ok(());
        }
    }

    ops::install::apply(ctx, prepared)
        .await
        .with_context(|| format!("Failed to install {}", request.repo))?;
    Ok(())
}

fn confirm_overwrite(dest: &Path) -> Result<bool> {
    print!(
        "  {} '{}' already exists. Overwrite? (y/N) ",
        "WARNING:".bold().yellow(),
        dest.display()
    );
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    let answer = input.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}
