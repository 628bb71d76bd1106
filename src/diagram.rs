//! The diagram transaction log.
//!
//! A [`Diagram`] owns the ordered list of emitted statements together with
//! the small amount of state that keeps them consistent: registered
//! participants and their activation depth, the current sync/async mode,
//! open frames and the name generator. Every call appends zero or more
//! statements in call order; [`Diagram::finish`] closes the log and yields a
//! read-only [`Document`].

use std::fmt;

use crate::document::Document;
use crate::error::{Error, Result};
use crate::ident::{IdGenerator, IdKind};
use crate::params::{ParamSet, ParamValue};
use crate::participant::{Lifeline, Participant, ParticipantId, ParticipantKind};
use crate::statement::Statement;

/// Edge style applied to subsequently drawn messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncMode {
    Sync,
    Async,
}

impl SyncMode {
    const fn macro_name(self) -> &'static str {
        match self {
            Self::Sync => "sync",
            Self::Async => "async",
        }
    }
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.macro_name())
    }
}

/// A note box attached to a lifeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    text: String,
    movement: Option<String>,
    size: Option<String>,
}

impl Comment {
    /// Each line of `text` becomes one line in the box.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            movement: None,
            size: None,
        }
    }

    /// Pic movement from the lifeline to the box, e.g. `down 0.5 right`.
    #[must_use]
    pub fn movement(mut self, movement: impl Into<String>) -> Self {
        self.movement = Some(movement.into());
        self
    }

    /// Pic box size, e.g. `wid 1 ht 0.7`.
    #[must_use]
    pub fn size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }
}

impl From<&str> for Comment {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// Per-participant bookkeeping. Records are never removed; destroyed
/// participants stay here with `alive == false` so stale handles can be
/// detected.
#[derive(Debug, Clone)]
pub(crate) struct Record {
    pub(crate) name: String,
    pub(crate) kind: ParticipantKind,
    pub(crate) label: Option<String>,
    pub(crate) depth: usize,
    pub(crate) created: bool,
    pub(crate) alive: bool,
}

#[derive(Debug, Default)]
pub struct Diagram {
    statements: Vec<Statement>,
    participants: Vec<Record>,
    params: ParamSet,
    open_frames: Vec<String>,
    comments: Vec<String>,
    mode: Option<SyncMode>,
    ids: IdGenerator,
}

impl Diagram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a diagram and register `participants` in order.
    pub fn with_participants(
        participants: impl IntoIterator<Item = Participant>,
    ) -> (Self, Vec<ParticipantId>) {
        let mut diagram = Self::new();
        let ids = diagram.add_participants(participants);
        (diagram, ids)
    }

    /// Register a participant and emit its declaration immediately.
    pub fn add_participant(&mut self, participant: Participant) -> ParticipantId {
        let id = ParticipantId(self.participants.len());
        let name = self.ids.next(IdKind::Participant);
        tracing::debug!(%name, kind = ?participant.kind(), "register participant");
        self.emit(participant.declaration(&name));
        let (kind, label) = participant.into_parts();
        self.participants.push(Record {
            name,
            kind,
            label,
            depth: 0,
            created: false,
            alive: true,
        });
        id
    }

    pub fn add_participants(
        &mut self,
        participants: impl IntoIterator<Item = Participant>,
    ) -> Vec<ParticipantId> {
        participants
            .into_iter()
            .map(|p| self.add_participant(p))
            .collect()
    }

    /// Operate on a registered participant's lifeline.
    ///
    /// Handle validity is checked by each operation, not here.
    pub fn participant(&mut self, id: ParticipantId) -> Lifeline<'_> {
        Lifeline::new(self, id)
    }

    // ------------------------------------------------------------------
    // Mode, time and frames
    // ------------------------------------------------------------------

    /// Current message style; `None` until the first mode is set.
    pub const fn mode(&self) -> Option<SyncMode> {
        self.mode
    }

    /// Switch message style. Switching to the current style emits nothing.
    pub fn set_mode(&mut self, mode: SyncMode) {
        if self.mode == Some(mode) {
            tracing::trace!(%mode, "mode unchanged; toggle suppressed");
            return;
        }
        self.mode = Some(mode);
        self.emit(Statement::new(mode.macro_name()));
    }

    pub fn set_sync(&mut self) {
        self.set_mode(SyncMode::Sync);
    }

    pub fn set_async(&mut self) {
        self.set_mode(SyncMode::Async);
    }

    /// Advance time by `n` steps, extending every lifeline.
    pub fn step(&mut self, n: usize) {
        for _ in 0..n {
            self.emit(Statement::new("step"));
        }
    }

    /// Open a frame whose upper-left corner sits on `left`'s column, after
    /// advancing `steps` (conventionally 1). Returns the frame name to pass
    /// back to [`Diagram::end_frame`].
    ///
    /// # Errors
    /// Fails if `left` is not a live participant of this diagram.
    pub fn begin_frame(
        &mut self,
        left: ParticipantId,
        label: &str,
        steps: usize,
    ) -> Result<String> {
        let left = self.live_name(left)?;
        self.step(steps);
        let name = self.ids.next(IdKind::Frame);
        tracing::debug!(frame = %name, label, "begin frame");
        self.emit(
            Statement::new("begin_frame")
                .ident(left)
                .ident(name.clone())
                .quoted(label),
        );
        self.open_frames.push(name.clone());
        Ok(name)
    }

    /// Close the open frame called `name` with its lower-right corner on
    /// `right`'s column, after advancing `steps` (conventionally 0).
    ///
    /// Frames are matched by name, so they need not close in reverse order.
    ///
    /// # Errors
    /// Returns [`Error::UnmatchedFrame`] if no open frame has that name;
    /// nothing is emitted in that case.
    pub fn end_frame(&mut self, right: ParticipantId, name: &str, steps: usize) -> Result<()> {
        let right = self.live_name(right)?;
        let Some(pos) = self.open_frames.iter().position(|open| open == name) else {
            return Err(Error::UnmatchedFrame {
                name: name.to_string(),
            });
        };
        self.step(steps);
        self.open_frames.remove(pos);
        tracing::debug!(frame = name, depth = self.open_frames.len(), "end frame");
        self.emit(Statement::new("end_frame").ident(right).ident(name));
        Ok(())
    }

    pub fn frame_depth(&self) -> usize {
        self.open_frames.len()
    }

    pub fn open_frames(&self) -> &[String] {
        &self.open_frames
    }

    // ------------------------------------------------------------------
    // Annotations
    // ------------------------------------------------------------------

    /// Attach a comment box to `participant`'s lifeline. Returns the comment
    /// name for [`Diagram::connect_to_comment`].
    ///
    /// # Errors
    /// Fails if `participant` is not live.
    pub fn comment(
        &mut self,
        participant: ParticipantId,
        comment: impl Into<Comment>,
    ) -> Result<String> {
        let object = self.live_name(participant)?;
        let comment = comment.into();
        let name = self.ids.next(IdKind::Comment);
        self.emit(
            Statement::new("comment")
                .ident(object)
                .ident(name.clone())
                .raw(comment.movement.unwrap_or_default())
                .lines(comment.size, &comment.text),
        );
        self.comments.push(name.clone());
        Ok(name)
    }

    /// Draw a line from `participant`'s lifeline to an existing comment.
    ///
    /// # Errors
    /// Returns [`Error::UnknownComment`] if `name` was not returned by
    /// [`Diagram::comment`], or fails if `participant` is not live.
    pub fn connect_to_comment(&mut self, participant: ParticipantId, name: &str) -> Result<()> {
        let object = self.live_name(participant)?;
        if !self.comments.iter().any(|c| c == name) {
            return Err(Error::UnknownComment {
                name: name.to_string(),
            });
        }
        self.emit(Statement::new("connect_to_comment").ident(object).ident(name));
        Ok(())
    }

    /// Constraint shown under the most recently declared object.
    pub fn object_constraint(&mut self, text: &str) {
        self.emit(Statement::new("oconstraint").quoted(text));
    }

    // ------------------------------------------------------------------
    // Parameters
    // ------------------------------------------------------------------

    pub const fn params(&self) -> &ParamSet {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut ParamSet {
        &mut self.params
    }

    /// # Errors
    /// See [`ParamSet::set`].
    pub fn set_param(&mut self, name: &str, value: impl Into<ParamValue>) -> Result<()> {
        self.params.set(name, value)
    }

    /// # Errors
    /// See [`ParamSet::get`].
    pub fn param(&self, name: &str) -> Result<ParamValue> {
        self.params.get(name)
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// The statement log rendered one statement per entry.
    pub fn lines(&self) -> Vec<String> {
        self.statements.iter().map(ToString::to_string).collect()
    }

    /// Live participants in registration order.
    pub fn live_participants(&self) -> Vec<ParticipantId> {
        self.participants
            .iter()
            .enumerate()
            .filter(|(_, record)| record.alive)
            .map(|(index, _)| ParticipantId(index))
            .collect()
    }

    pub fn is_live(&self, id: ParticipantId) -> bool {
        self.participants.get(id.0).is_some_and(|r| r.alive)
    }

    /// Generated name of a participant, live or destroyed.
    ///
    /// # Errors
    /// Returns [`Error::UnknownParticipant`] for foreign handles.
    pub fn name_of(&self, id: ParticipantId) -> Result<&str> {
        self.participants
            .get(id.0)
            .map(|r| r.name.as_str())
            .ok_or(Error::UnknownParticipant { index: id.0 })
    }

    /// # Errors
    /// Returns [`Error::UnknownParticipant`] for foreign handles.
    pub fn label_of(&self, id: ParticipantId) -> Result<Option<&str>> {
        self.participants
            .get(id.0)
            .map(|r| r.label.as_deref())
            .ok_or(Error::UnknownParticipant { index: id.0 })
    }

    /// # Errors
    /// Returns [`Error::UnknownParticipant`] for foreign handles.
    pub fn kind_of(&self, id: ParticipantId) -> Result<ParticipantKind> {
        self.participants
            .get(id.0)
            .map(|r| r.kind)
            .ok_or(Error::UnknownParticipant { index: id.0 })
    }

    /// # Errors
    /// Returns [`Error::UnknownParticipant`] for foreign handles.
    pub fn activation_depth(&self, id: ParticipantId) -> Result<usize> {
        self.participants
            .get(id.0)
            .map(|r| r.depth)
            .ok_or(Error::UnknownParticipant { index: id.0 })
    }

    pub const fn ids(&self) -> &IdGenerator {
        &self.ids
    }

    // ------------------------------------------------------------------
    // Finish
    // ------------------------------------------------------------------

    /// Complete every live participant's lifeline in registration order and
    /// freeze the log.
    ///
    /// # Errors
    /// Returns [`Error::UnclosedFrames`] if any frame is still open.
    pub fn finish(mut self) -> Result<Document> {
        if !self.open_frames.is_empty() {
            return Err(Error::UnclosedFrames {
                names: self.open_frames,
            });
        }
        let live = self.live_participants();
        for id in live {
            let name = self.participants[id.0].name.clone();
            self.emit(Statement::new("complete").ident(name));
        }
        tracing::debug!(statements = self.statements.len(), "diagram finished");
        Ok(Document::new(self.params, self.statements))
    }

    // ------------------------------------------------------------------
    // Crate-internal state access used by `Lifeline`
    // ------------------------------------------------------------------

    pub(crate) fn emit(&mut self, statement: Statement) {
        tracing::trace!(%statement, "emit");
        self.statements.push(statement);
    }

    pub(crate) fn record(&self, id: ParticipantId) -> Result<&Record> {
        let record = self
            .participants
            .get(id.0)
            .ok_or(Error::UnknownParticipant { index: id.0 })?;
        if !record.alive {
            return Err(Error::DanglingParticipant {
                name: record.name.clone(),
            });
        }
        Ok(record)
    }

    pub(crate) fn record_mut(&mut self, id: ParticipantId) -> Result<&mut Record> {
        let record = self
            .participants
            .get_mut(id.0)
            .ok_or(Error::UnknownParticipant { index: id.0 })?;
        if !record.alive {
            return Err(Error::DanglingParticipant {
                name: record.name.clone(),
            });
        }
        Ok(record)
    }

    pub(crate) fn live_name(&self, id: ParticipantId) -> Result<String> {
        self.record(id).map(|r| r.name.clone())
    }

    /// Increment depth and emit `active(..)`. Always emits.
    pub(crate) fn activate(&mut self, id: ParticipantId) -> Result<()> {
        let record = self.record_mut(id)?;
        record.depth += 1;
        let name = record.name.clone();
        self.emit(Statement::new("active").ident(name));
        Ok(())
    }

    /// Decrement depth and emit `inactive(..)`; does nothing at depth zero.
    pub(crate) fn deactivate(&mut self, id: ParticipantId) -> Result<()> {
        let record = self.record_mut(id)?;
        if record.depth == 0 {
            tracing::trace!(name = %record.name, "inactive at depth 0 ignored");
            return Ok(());
        }
        record.depth -= 1;
        let name = record.name.clone();
        self.emit(Statement::new("inactive").ident(name));
        Ok(())
    }

    /// Mark a participant destroyed; it will not be completed at finish.
    pub(crate) fn retire(&mut self, id: ParticipantId) -> Result<()> {
        let record = self.record_mut(id)?;
        record.alive = false;
        tracing::debug!(name = %record.name, "participant destroyed");
        Ok(())
    }
}
