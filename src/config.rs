use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use crate::params::{ParamSet, ParamValue};
use crate::render::OutputFormat;

/// File name of the UMLGraph sequence macro library.
pub const LIBRARY_FILE: &str = "sequence.pic";

/// Environment variable pointing at the macro library.
pub const LIBRARY_ENV: &str = "SEQUENCEPLOT_LIBRARY";

/// Where UMLGraph packages usually install `sequence.pic`.
const LIBRARY_DIRS: &[&str] = &[
    "/usr/share/umlgraph",
    "/usr/local/share/umlgraph",
    "/opt/homebrew/share/umlgraph",
    "/usr/share/sequenceplot",
    "/usr/local/share/sequenceplot",
];

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub pic2plot: Option<PathBuf>,
    pub library: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub params: Option<PathBuf>,
}

impl ConfigFlags {
    pub fn union(&self, other: &Self) -> Self {
        Self {
            pic2plot: other.pic2plot.clone().or_else(|| self.pic2plot.clone()),
            library: other.library.clone().or_else(|| self.library.clone()),
            format: other.format.or(self.format),
            params: other.params.clone().or_else(|| self.params.clone()),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("sequenceplot").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("sequenceplot")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("sequenceplot").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("sequenceplot")
                .join("config");
        }
    }

    PathBuf::from(".sequenceplotrc")
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".sequenceplotrc")
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# sequenceplot defaults (saved with --save)".to_string());
    if let Some(program) = &flags.pic2plot {
        lines.push(format!("--pic2plot {}", program.display()));
    }
    if let Some(library) = &flags.library {
        lines.push(format!("--library {}", library.display()));
    }
    if let Some(format) = flags.format {
        lines.push(format!("--format {}", format.extension()));
    }
    if let Some(params) = &flags.params {
        lines.push(format!("--params {}", params.display()));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Extract the recognised flags from `tokens`, ignoring everything else.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        let (key, inline) = match token.split_once('=') {
            Some((key, value)) if key.starts_with("--") => (key, Some(value.to_string())),
            _ => (token, None),
        };
        if matches!(key, "--pic2plot" | "--library" | "--format" | "--params") {
            let value = match inline {
                Some(value) => Some(value),
                None => {
                    let next = tokens.get(i + 1).cloned();
                    if next.is_some() {
                        i += 1;
                    }
                    next
                }
            };
            if let Some(value) = value {
                match key {
                    "--pic2plot" => flags.pic2plot = Some(PathBuf::from(value)),
                    "--library" => flags.library = Some(PathBuf::from(value)),
                    "--format" => flags.format = OutputFormat::parse(&value),
                    _ => flags.params = Some(PathBuf::from(value)),
                }
            }
        }
        i += 1;
    }
    flags
}

/// Find `sequence.pic`: the explicit path if it exists, then
/// `$SEQUENCEPLOT_LIBRARY`, then the usual install locations, then the
/// working directory.
pub fn locate_library(explicit: Option<&Path>) -> Option<PathBuf> {
    let from_env = std::env::var_os(LIBRARY_ENV).map(PathBuf::from);
    let installed = LIBRARY_DIRS
        .iter()
        .map(|dir| Path::new(dir).join(LIBRARY_FILE));
    explicit
        .map(Path::to_path_buf)
        .into_iter()
        .chain(from_env)
        .chain(installed)
        .chain(std::iter::once(PathBuf::from(LIBRARY_FILE)))
        .find(|candidate| candidate.is_file())
}

/// Read a JSON object of parameter overrides, e.g.
/// `{"objectSpacing": 1.75, "underline": false}`.
pub fn load_param_overrides(path: &Path) -> Result<Vec<(String, ParamValue)>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read parameters {}", path.display()))?;
    let map: Map<String, Value> = serde_json::from_str(&content)
        .with_context(|| format!("Parameters in {} must be a JSON object", path.display()))?;
    map.into_iter()
        .map(|(name, value)| {
            let value = serde_json::from_value::<ParamValue>(value)
                .with_context(|| format!("Parameter {name} must be a number or boolean"))?;
            Ok((name, value))
        })
        .collect()
}

/// Apply overrides through [`ParamSet::set`]; stops at the first unknown or
/// mistyped parameter.
pub fn apply_param_overrides(params: &mut ParamSet, overrides: &[(String, ParamValue)]) -> Result<()> {
    for (name, value) in overrides {
        params
            .set(name, *value)
            .with_context(|| format!("Invalid parameter override {name}"))?;
    }
    Ok(())
}
