//! Handing a finished document to the external layout tool.
//!
//! The [`Renderer`] trait is the seam; [`Pic2Plot`] runs GNU plotutils'
//! `pic2plot` on a pic file and stores what it prints to stdout.

use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::{Deserialize, Serialize};

use crate::config::{LIBRARY_FILE, locate_library};
use crate::document::Document;
use crate::error::RenderError;

/// Output formats understood by `pic2plot -T`.
#[derive(
    clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Vector image
    #[default]
    Svg,
    /// Raster image
    Png,
    /// Raster image
    Gif,
    /// PostScript, print-ready
    Ps,
}

impl OutputFormat {
    pub const ALL: [Self; 4] = [Self::Svg, Self::Png, Self::Gif, Self::Ps];

    /// File extension and `-T` type name (they coincide for pic2plot).
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Ps => "ps",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.extension().eq_ignore_ascii_case(s))
    }
}

/// `<prefix>.<ext>`, keeping any dots already in the prefix.
pub fn output_path(prefix: &Path, ext: &str) -> PathBuf {
    let mut name = OsString::from(prefix.as_os_str());
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

/// Something that turns a [`Document`] into an image file.
pub trait Renderer {
    /// Render `document` to `<prefix>.<ext>` and return that path.
    ///
    /// # Errors
    /// Returns a [`RenderError`] if the output cannot be produced.
    fn render(
        &self,
        document: &Document,
        prefix: &Path,
        format: OutputFormat,
    ) -> Result<PathBuf, RenderError>;
}

/// Runs `pic2plot -T<format> <file>` and writes its stdout to the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pic2Plot {
    program: PathBuf,
    args: Vec<String>,
    library: PathBuf,
    keep_source: bool,
}

impl Default for Pic2Plot {
    fn default() -> Self {
        Self::new(
            "pic2plot",
            locate_library(None).unwrap_or_else(|| PathBuf::from(LIBRARY_FILE)),
        )
    }
}

impl Pic2Plot {
    pub fn new(program: impl Into<PathBuf>, library: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            library: library.into(),
            keep_source: false,
        }
    }

    /// Arguments placed before the `-T` flag.
    #[must_use]
    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Write the pic source next to the output as `<prefix>.pic` instead of
    /// a temporary file.
    #[must_use]
    pub const fn keep_source(mut self, keep: bool) -> Self {
        self.keep_source = keep;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn library(&self) -> &Path {
        &self.library
    }

    fn run(&self, source: &Path, format: OutputFormat) -> Result<Vec<u8>, RenderError> {
        tracing::debug!(
            program = %self.program.display(),
            source = %source.display(),
            format = format.extension(),
            "invoking renderer"
        );
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(format!("-T{}", format.extension()))
            .arg(source)
            .output()
            .map_err(|source| RenderError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::warn!(program = %self.program.display(), status = %output.status, %stderr, "renderer failed");
            return Err(RenderError::ToolFailed {
                program: self.program.clone(),
                status: output.status,
                stderr,
            });
        }
        if output.stdout.is_empty() {
            return Err(RenderError::EmptyOutput {
                program: self.program.clone(),
            });
        }
        Ok(output.stdout)
    }
}

impl Renderer for Pic2Plot {
    fn render(
        &self,
        document: &Document,
        prefix: &Path,
        format: OutputFormat,
    ) -> Result<PathBuf, RenderError> {
        let target = output_path(prefix, format.extension());
        let image = if self.keep_source {
            let source = output_path(prefix, "pic");
            fs::write(&source, document.to_pic(&self.library))?;
            self.run(&source, format)?
        } else {
            let mut source = tempfile::Builder::new()
                .prefix("sequenceplot-")
                .suffix(".pic")
                .tempfile()?;
            document.write_pic(source.as_file_mut(), &self.library)?;
            source.as_file_mut().flush()?;
            self.run(source.path(), format)?
        };
        fs::write(&target, image)?;
        tracing::info!(output = %target.display(), "diagram rendered");
        Ok(target)
    }
}
