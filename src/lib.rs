// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. params::ParamSet)
    clippy::module_name_repetitions
)]

//! # sequenceplot
//!
//! Author UML sequence diagrams as ordinary method calls and render them
//! with UMLGraph's `sequence.pic` macros and GNU plotutils' `pic2plot`.
//!
//! A [`Diagram`] records a flat, ordered log of pic macro invocations.
//! Registering a [`Participant`] declares it; calls through
//! [`Diagram::participant`] draw messages, activations, creations and
//! destructions; [`Diagram::finish`] completes the remaining lifelines and
//! produces a [`Document`] that a [`Renderer`] turns into SVG, PNG, GIF or
//! PostScript.
//!
//! ```
//! use sequenceplot::prelude::*;
//!
//! let (mut diagram, ids) = Diagram::with_participants([
//!     Participant::object("client"),
//!     Participant::object("server"),
//! ]);
//! let frame = diagram.begin_frame(ids[0], "Login", 1).unwrap();
//! diagram
//!     .participant(ids[0])
//!     .call_method(ids[1], Call::new("login(username,password)").response("sessionID"))
//!     .unwrap();
//! diagram.end_frame(ids[1], &frame, 0).unwrap();
//!
//! let pic = diagram.finish().unwrap().to_pic("sequence.pic".as_ref());
//! assert!(pic.starts_with(".PS\n"));
//! ```
//!
//! ## Modules
//!
//! - [`diagram`]: the statement log, mode, frames and comments
//! - [`participant`]: participant declarations and lifeline operations
//! - [`params`]: layout parameters
//! - [`statement`]: the pic statement representation
//! - [`ident`]: generated element names
//! - [`document`]: finished pic source
//! - [`render`]: the renderer seam and `pic2plot` invocation
//! - [`config`]: renderer defaults and parameter overrides
//! - [`demos`]: example diagrams

pub mod config;
pub mod demos;
pub mod diagram;
pub mod document;
pub mod error;
pub mod ident;
pub mod params;
pub mod participant;
pub mod render;
pub mod statement;

pub use diagram::{Comment, Diagram, SyncMode};
pub use document::Document;
pub use error::{Error, RenderError, Result};
pub use params::{Param, ParamSet, ParamValue};
pub use participant::{Call, Lifeline, Participant, ParticipantId, ParticipantKind};
pub use render::{OutputFormat, Pic2Plot, Renderer};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::diagram::{Comment, Diagram, SyncMode};
    pub use crate::document::Document;
    pub use crate::participant::{Call, Participant, ParticipantId};
    pub use crate::render::{OutputFormat, Pic2Plot, Renderer};
}
