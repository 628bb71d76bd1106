//! Finished, read-only diagram source.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::params::ParamSet;
use crate::render::{OutputFormat, Pic2Plot, Renderer};
use crate::statement::Statement;

/// Opening and closing markers of a pic picture.
const OPEN_MARKER: &str = ".PS";
const CLOSE_MARKER: &str = ".PE";

/// The frozen output of [`Diagram::finish`](crate::Diagram::finish).
///
/// Rendering borrows the document, so a failed render can be retried with
/// a different [`Renderer`].
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    params: ParamSet,
    statements: Vec<Statement>,
}

impl Document {
    pub(crate) const fn new(params: ParamSet, statements: Vec<Statement>) -> Self {
        Self { params, statements }
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub const fn params(&self) -> &ParamSet {
        &self.params
    }

    /// Serialize as a pic program that pulls in the macro library at
    /// `library`.
    pub fn to_pic(&self, library: &Path) -> String {
        let mut lines = Vec::with_capacity(self.statements.len() + 12);
        lines.push(OPEN_MARKER.to_string());
        lines.push(format!("copy \"{}\";", library.display()));
        lines.extend(self.params.serialize());
        lines.extend(self.statements.iter().map(ToString::to_string));
        lines.push(CLOSE_MARKER.to_string());
        let mut text = lines.join("\n");
        text.push('\n');
        text
    }

    /// # Errors
    /// Returns any error from `writer`.
    pub fn write_pic(&self, writer: &mut impl Write, library: &Path) -> io::Result<()> {
        writer.write_all(self.to_pic(library).as_bytes())
    }

    /// Render through `renderer` to `<prefix>.<ext>`.
    ///
    /// # Errors
    /// Returns [`Error::Render`](crate::Error::Render) when the renderer fails.
    pub fn render(
        &self,
        renderer: &(impl Renderer + ?Sized),
        prefix: &Path,
        format: OutputFormat,
    ) -> Result<PathBuf> {
        Ok(renderer.render(self, prefix, format)?)
    }

    /// Render SVG with the default `pic2plot` setup.
    ///
    /// # Errors
    /// See [`Document::render`].
    pub fn svg(&self, prefix: impl AsRef<Path>) -> Result<PathBuf> {
        self.render(&Pic2Plot::default(), prefix.as_ref(), OutputFormat::Svg)
    }

    /// # Errors
    /// See [`Document::render`].
    pub fn png(&self, prefix: impl AsRef<Path>) -> Result<PathBuf> {
        self.render(&Pic2Plot::default(), prefix.as_ref(), OutputFormat::Png)
    }

    /// # Errors
    /// See [`Document::render`].
    pub fn gif(&self, prefix: impl AsRef<Path>) -> Result<PathBuf> {
        self.render(&Pic2Plot::default(), prefix.as_ref(), OutputFormat::Gif)
    }

    /// # Errors
    /// See [`Document::render`].
    pub fn ps(&self, prefix: impl AsRef<Path>) -> Result<PathBuf> {
        self.render(&Pic2Plot::default(), prefix.as_ref(), OutputFormat::Ps)
    }
}
