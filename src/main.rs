//! sequenceplot - render the bundled example sequence diagrams.
//!
//! # Usage
//!
//! ```bash
//! sequenceplot --list
//! sequenceplot authentication --emit
//! sequenceplot create-destroy --format png --out-dir build
//! ```

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use sequenceplot::config::{
    ConfigFlags, LIBRARY_ENV, LIBRARY_FILE, apply_param_overrides, clear_config_flags,
    global_config_path, load_config_flags, load_param_overrides, local_override_path,
    locate_library, save_config_flags,
};
use sequenceplot::demos;
use sequenceplot::{OutputFormat, Pic2Plot};

/// Render UMLGraph sequence diagrams with pic2plot
#[derive(Parser, Debug)]
#[command(name = "sequenceplot", version, about, long_about = None)]
struct Cli {
    /// Demo diagram to render
    #[arg(value_name = "DEMO")]
    demo: Option<String>,

    /// List available demo diagrams
    #[arg(long)]
    list: bool,

    /// Print the pic source instead of rendering
    #[arg(long)]
    emit: bool,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Directory for rendered files
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    out_dir: PathBuf,

    /// pic2plot executable
    #[arg(long, value_name = "PATH")]
    pic2plot: Option<PathBuf>,

    /// Location of sequence.pic
    #[arg(long, value_name = "PATH")]
    library: Option<PathBuf>,

    /// JSON file of layout parameter overrides
    #[arg(long, value_name = "PATH")]
    params: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

/// `RUST_LOG` as given, or `warn` when it is unset or unparsable.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|spec| EnvFilter::try_new(spec).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(
            std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref(),
        ))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let global_path = global_config_path();
    let cli_flags = ConfigFlags {
        pic2plot: cli.pic2plot.clone(),
        library: cli.library.clone(),
        format: cli.format,
        params: cli.params.clone(),
    };

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_override_path())?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    if cli.list {
        let mut stdout = std::io::stdout().lock();
        for (name, _) in demos::DEMOS {
            writeln!(stdout, "{name}")?;
        }
        return Ok(());
    }

    let Some(name) = cli.demo else {
        if cli.save || cli.clear {
            return Ok(());
        }
        anyhow::bail!("No demo given; use --list to see the available demos");
    };
    let builder = demos::by_name(&name)
        .with_context(|| format!("Unknown demo {name}; use --list to see the available demos"))?;

    let mut diagram = builder().with_context(|| format!("Failed to build demo {name}"))?;
    if let Some(path) = &effective.params {
        let overrides = load_param_overrides(path)?;
        apply_param_overrides(diagram.params_mut(), &overrides)?;
    }
    let document = diagram.finish()?;

    let located = locate_library(effective.library.as_deref());

    if cli.emit {
        let library = located.unwrap_or_else(|| PathBuf::from(LIBRARY_FILE));
        let mut stdout = std::io::stdout().lock();
        document.write_pic(&mut stdout, &library)?;
        return Ok(());
    }

    let library = located.with_context(|| {
        format!("Unable to locate {LIBRARY_FILE}; pass --library or set {LIBRARY_ENV}")
    })?;
    let format = effective.format.unwrap_or_default();
    let program = effective
        .pic2plot
        .unwrap_or_else(|| PathBuf::from("pic2plot"));
    let renderer = Pic2Plot::new(program, library);
    std::fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("Failed to create {}", cli.out_dir.display()))?;
    let output = document
        .render(&renderer, &cli.out_dir.join(&name), format)
        .context("Rendering failed")?;
    println!("{}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn test_log_filter_honours_global_level() {
        assert_eq!(
            log_filter(Some("debug")).max_level_hint(),
            Some(LevelFilter::DEBUG)
        );
        assert_eq!(
            log_filter(Some("sequenceplot=trace")).max_level_hint(),
            Some(LevelFilter::TRACE)
        );
    }

    #[test]
    fn test_log_filter_defaults_to_warn() {
        assert_eq!(log_filter(None).max_level_hint(), Some(LevelFilter::WARN));
        assert_eq!(
            log_filter(Some("sequenceplot=loud")).max_level_hint(),
            Some(LevelFilter::WARN)
        );
    }
}
