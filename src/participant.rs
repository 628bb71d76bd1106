//! Participants and the operations drawn along their lifelines.
//!
//! A [`Participant`] describes what to declare (an object, an external
//! actor or a placeholder to be created later). Registering it with a
//! [`Diagram`] issues its generated name and returns a [`ParticipantId`].
//! Operations are reached through [`Diagram::participant`], which hands out
//! a [`Lifeline`] view borrowing the diagram:
//!
//! ```
//! use sequenceplot::prelude::*;
//!
//! let (mut diagram, ids) = Diagram::with_participants([
//!     Participant::object("c: client"),
//!     Participant::object("s: server"),
//! ]);
//! let (client, server) = (ids[0], ids[1]);
//! diagram
//!     .participant(client)
//!     .call_method(server, Call::new("login()").response("sessionID"))
//!     .unwrap();
//! ```

use crate::diagram::{Diagram, SyncMode};
use crate::error::{Error, Result};
use crate::statement::Statement;

/// Handle to a participant registered with a [`Diagram`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticipantId(pub(crate) usize);

/// Which declaration a participant is registered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticipantKind {
    /// `object(name,"label");`
    Object,
    /// `actor(name,"label");`
    Actor,
    /// `pobject(name);`, labelled later by a create message.
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    kind: ParticipantKind,
    label: Option<String>,
}

impl Participant {
    /// A plain object, typically labelled `name: Class`.
    pub fn object(label: impl Into<String>) -> Self {
        Self {
            kind: ParticipantKind::Object,
            label: Some(label.into()),
        }
    }

    /// An external actor (stick figure).
    pub fn actor(label: impl Into<String>) -> Self {
        Self {
            kind: ParticipantKind::Actor,
            label: Some(label.into()),
        }
    }

    /// An unlabelled placeholder; see [`Lifeline::create_instance`].
    pub const fn placeholder() -> Self {
        Self {
            kind: ParticipantKind::Placeholder,
            label: None,
        }
    }

    pub const fn kind(&self) -> ParticipantKind {
        self.kind
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub(crate) fn declaration(&self, name: &str) -> Statement {
        let label = self.label.as_deref().unwrap_or_default();
        match self.kind {
            ParticipantKind::Object => Statement::new("object").ident(name).quoted(label),
            ParticipantKind::Actor => Statement::new("actor").ident(name).quoted(label),
            ParticipantKind::Placeholder => Statement::new("pobject").ident(name),
        }
    }

    pub(crate) fn into_parts(self) -> (ParticipantKind, Option<String>) {
        (self.kind, self.label)
    }
}

/// A request, with optional reply, drawn by [`Lifeline::call_method`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    request: String,
    response: Option<String>,
    steps: usize,
    request_mode: SyncMode,
    response_mode: SyncMode,
}

impl Call {
    /// A synchronous request with no reply.
    pub fn new(request: impl Into<String>) -> Self {
        Self {
            request: request.into(),
            response: None,
            steps: 0,
            request_mode: SyncMode::Sync,
            response_mode: SyncMode::Async,
        }
    }

    /// Draw a reply (asynchronous by default) and activate the target
    /// between request and reply.
    #[must_use]
    pub fn response(mut self, response: impl Into<String>) -> Self {
        self.response = Some(response.into());
        self
    }

    /// Extra time steps between request and reply.
    #[must_use]
    pub const fn steps(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }

    #[must_use]
    pub const fn request_mode(mut self, mode: SyncMode) -> Self {
        self.request_mode = mode;
        self
    }

    #[must_use]
    pub const fn response_mode(mut self, mode: SyncMode) -> Self {
        self.response_mode = mode;
        self
    }
}

impl From<&str> for Call {
    fn from(request: &str) -> Self {
        Self::new(request)
    }
}

/// Mutable view of one participant inside its diagram.
///
/// Every operation validates the participants it touches before emitting
/// anything, so a failed call leaves the statement log unchanged.
#[derive(Debug)]
pub struct Lifeline<'d> {
    diagram: &'d mut Diagram,
    id: ParticipantId,
}

impl<'d> Lifeline<'d> {
    pub(crate) fn new(diagram: &'d mut Diagram, id: ParticipantId) -> Self {
        Self { diagram, id }
    }

    pub const fn id(&self) -> ParticipantId {
        self.id
    }

    /// # Errors
    /// Fails for destroyed or foreign participants.
    pub fn activation_depth(&self) -> Result<usize> {
        self.diagram.record(self.id).map(|r| r.depth)
    }

    /// Start (or nest) an activation bar.
    ///
    /// # Errors
    /// Fails for destroyed or foreign participants.
    pub fn active(&mut self) -> Result<()> {
        self.diagram.activate(self.id)
    }

    /// End the innermost activation bar. Does nothing when the participant
    /// is not active.
    ///
    /// # Errors
    /// Fails for destroyed or foreign participants.
    pub fn inactive(&mut self) -> Result<()> {
        self.diagram.deactivate(self.id)
    }

    /// Draw a message to `target` (which may be this participant).
    ///
    /// # Errors
    /// Fails if either participant is destroyed or foreign.
    pub fn message(&mut self, target: ParticipantId, text: &str) -> Result<()> {
        let (from, to) = self.endpoints(target)?;
        self.diagram
            .emit(Statement::new("message").ident(from).ident(to).quoted(text));
        Ok(())
    }

    /// Draw a return message to `target`.
    ///
    /// # Errors
    /// Fails if either participant is destroyed or foreign.
    pub fn return_message(&mut self, target: ParticipantId, text: &str) -> Result<()> {
        let (from, to) = self.endpoints(target)?;
        self.diagram
            .emit(Statement::new("rmessage").ident(from).ident(to).quoted(text));
        Ok(())
    }

    /// Create `target` with a `<<create>>` message, giving it `label`.
    ///
    /// With `mode` set, the message is drawn in that style and the previous
    /// style is restored afterwards.
    ///
    /// # Errors
    /// Returns [`Error::AlreadyCreated`] if `target` was created before, or
    /// fails if either participant is destroyed or foreign.
    pub fn create_instance(
        &mut self,
        target: ParticipantId,
        label: &str,
        mode: Option<SyncMode>,
    ) -> Result<()> {
        let (from, to) = self.endpoints(target)?;
        let record = self.diagram.record_mut(target)?;
        if record.created {
            return Err(Error::AlreadyCreated {
                name: record.name.clone(),
                label: record.label.clone().unwrap_or_default(),
            });
        }
        record.created = true;
        record.label = Some(label.to_string());
        self.scoped(mode, |diagram| {
            diagram.emit(Statement::new("cmessage").ident(from).ident(to).quoted(label));
        });
        Ok(())
    }

    /// Destroy `target` with a `<<destroy>>` message. `target` leaves the
    /// diagram and may not be referenced again.
    ///
    /// # Errors
    /// Fails if either participant is destroyed or foreign.
    pub fn destroy_instance(&mut self, target: ParticipantId, mode: Option<SyncMode>) -> Result<()> {
        let (from, to) = self.endpoints(target)?;
        self.scoped(mode, |diagram| {
            diagram.emit(Statement::new("dmessage").ident(from).ident(to));
        });
        self.diagram.retire(target)
    }

    /// The participant deletes itself, ending its lifeline with an X.
    ///
    /// # Errors
    /// Fails for destroyed or foreign participants.
    pub fn delete(&mut self) -> Result<()> {
        let name = self.diagram.live_name(self.id)?;
        self.diagram.emit(Statement::new("delete").ident(name));
        self.diagram.retire(self.id)
    }

    /// Send `request` and leave `target` active until a later
    /// [`Lifeline::pop_method`].
    ///
    /// # Errors
    /// Fails if either participant is destroyed or foreign.
    pub fn push_method(&mut self, target: ParticipantId, request: &str, mode: SyncMode) -> Result<()> {
        self.endpoints(target)?;
        self.diagram.step(1);
        self.diagram.set_mode(mode);
        self.message(target, request)?;
        self.diagram.activate(target)
    }

    /// Draw `target`'s reply to an earlier [`Lifeline::push_method`] and end
    /// its activation.
    ///
    /// # Errors
    /// Fails if either participant is destroyed or foreign.
    pub fn pop_method(&mut self, target: ParticipantId, response: &str, mode: SyncMode) -> Result<()> {
        self.endpoints(target)?;
        self.diagram.set_mode(mode);
        self.diagram.participant(target).return_message(self.id, response)?;
        self.diagram.deactivate(target)?;
        self.diagram.step(1);
        Ok(())
    }

    /// Draw a complete call: `step`, request, and if a response is given,
    /// activation of `target`, optional gap, reply and deactivation, then a
    /// closing `step`.
    ///
    /// # Errors
    /// Fails if either participant is destroyed or foreign.
    pub fn call_method(&mut self, target: ParticipantId, call: impl Into<Call>) -> Result<()> {
        let call = call.into();
        self.endpoints(target)?;
        self.diagram.step(1);
        self.diagram.set_mode(call.request_mode);
        self.message(target, &call.request)?;
        if let Some(response) = call.response.as_deref() {
            self.diagram.activate(target)?;
            self.diagram.step(call.steps);
            self.diagram.set_mode(call.response_mode);
            self.diagram.participant(target).return_message(self.id, response)?;
            self.diagram.deactivate(target)?;
        }
        self.diagram.step(1);
        Ok(())
    }

    /// Constraint text beside the lifeline at the current position, or just
    /// below it when `below` is set.
    ///
    /// # Errors
    /// Fails for destroyed or foreign participants.
    pub fn line_constraint(&mut self, text: &str, below: bool) -> Result<()> {
        let name = self.diagram.live_name(self.id)?;
        let macro_name = if below { "lconstraint_below" } else { "lconstraint" };
        self.diagram
            .emit(Statement::new(macro_name).ident(name).quoted(text));
        Ok(())
    }

    fn endpoints(&self, target: ParticipantId) -> Result<(String, String)> {
        Ok((
            self.diagram.live_name(self.id)?,
            self.diagram.live_name(target)?,
        ))
    }

    fn scoped(&mut self, mode: Option<SyncMode>, draw: impl FnOnce(&mut Diagram)) {
        let ambient = self.diagram.mode();
        if let Some(mode) = mode {
            self.diagram.set_mode(mode);
        }
        draw(&mut *self.diagram);
        if let (Some(_), Some(ambient)) = (mode, ambient) {
            self.diagram.set_mode(ambient);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two() -> (Diagram, ParticipantId, ParticipantId) {
        let (diagram, ids) =
            Diagram::with_participants([Participant::object("client"), Participant::object("server")]);
        (diagram, ids[0], ids[1])
    }

    fn tail(diagram: &Diagram, skip: usize) -> Vec<String> {
        diagram.lines()[skip..].to_vec()
    }

    #[test]
    fn test_declarations_per_kind() {
        let (diagram, _) = Diagram::with_participants([
            Participant::object("c: \"client\""),
            Participant::actor("user"),
            Participant::placeholder(),
        ]);
        assert_eq!(
            diagram.lines(),
            vec![
                r#"object(O_0,"c: \"client\"");"#,
                r#"actor(O_1,"user");"#,
                "pobject(O_2);",
            ]
        );
    }

    #[test]
    fn test_inactive_at_zero_is_a_no_op() {
        let (mut diagram, client, _) = two();
        diagram.participant(client).inactive().unwrap();
        assert_eq!(diagram.statements().len(), 2);
        diagram.participant(client).active().unwrap();
        diagram.participant(client).active().unwrap();
        diagram.participant(client).inactive().unwrap();
        assert_eq!(diagram.activation_depth(client).unwrap(), 1);
        assert_eq!(
            tail(&diagram, 2),
            vec!["active(O_0);", "active(O_0);", "inactive(O_0);"]
        );
    }

    #[test]
    fn test_messages_and_self_messages() {
        let (mut diagram, client, server) = two();
        let mut lifeline = diagram.participant(client);
        lifeline.message(server, "ping").unwrap();
        lifeline.message(client, "think()").unwrap();
        lifeline.return_message(server, "done").unwrap();
        assert_eq!(
            tail(&diagram, 2),
            vec![
                r#"message(O_0,O_1,"ping");"#,
                r#"message(O_0,O_0,"think()");"#,
                r#"rmessage(O_0,O_1,"done");"#,
            ]
        );
    }

    #[test]
    fn test_call_method_without_response() {
        let (mut diagram, client, server) = two();
        diagram.participant(client).call_method(server, "notify()").unwrap();
        assert_eq!(
            tail(&diagram, 2),
            vec!["step();", "sync();", r#"message(O_0,O_1,"notify()");"#, "step();"]
        );
        assert_eq!(diagram.activation_depth(server).unwrap(), 0);
    }

    #[test]
    fn test_call_method_with_response_and_gap() {
        let (mut diagram, client, server) = two();
        diagram
            .participant(client)
            .call_method(server, Call::new("fetch()").response("rows").steps(2))
            .unwrap();
        assert_eq!(
            tail(&diagram, 2),
            vec![
                "step();",
                "sync();",
                r#"message(O_0,O_1,"fetch()");"#,
                "active(O_1);",
                "step();",
                "step();",
                "async();",
                r#"rmessage(O_1,O_0,"rows");"#,
                "inactive(O_1);",
                "step();",
            ]
        );
    }

    #[test]
    fn test_call_method_response_mode_matches_request_mode() {
        let (mut diagram, client, server) = two();
        diagram
            .participant(client)
            .call_method(
                server,
                Call::new("get()")
                    .response("")
                    .response_mode(SyncMode::Sync),
            )
            .unwrap();
        let lines = tail(&diagram, 2);
        assert_eq!(lines.iter().filter(|l| *l == "sync();").count(), 1);
        assert!(!lines.contains(&"async();".to_string()));
    }

    #[test]
    fn test_push_and_pop_method() {
        let (mut diagram, client, server) = two();
        diagram
            .participant(client)
            .push_method(server, "run()", SyncMode::Sync)
            .unwrap();
        assert_eq!(diagram.activation_depth(server).unwrap(), 1);
        diagram.participant(client).message(server, "poke").unwrap();
        diagram
            .participant(client)
            .pop_method(server, "finished", SyncMode::Async)
            .unwrap();
        assert_eq!(diagram.activation_depth(server).unwrap(), 0);
        assert_eq!(
            tail(&diagram, 2),
            vec![
                "step();",
                "sync();",
                r#"message(O_0,O_1,"run()");"#,
                "active(O_1);",
                r#"message(O_0,O_1,"poke");"#,
                "async();",
                r#"rmessage(O_1,O_0,"finished");"#,
                "inactive(O_1);",
                "step();",
            ]
        );
    }

    #[test]
    fn test_create_instance_labels_placeholder() {
        let (mut diagram, ids) =
            Diagram::with_participants([Participant::object("c:Client"), Participant::placeholder()]);
        diagram
            .participant(ids[0])
            .create_instance(ids[1], ":Transaction", None)
            .unwrap();
        assert_eq!(diagram.label_of(ids[1]).unwrap(), Some(":Transaction"));
        assert_eq!(tail(&diagram, 2), vec![r#"cmessage(O_0,O_1,":Transaction");"#]);
    }

    #[test]
    fn test_create_instance_mode_override_is_scoped() {
        let (mut diagram, ids) =
            Diagram::with_participants([Participant::object("c"), Participant::placeholder()]);
        diagram.set_sync();
        diagram
            .participant(ids[0])
            .create_instance(ids[1], "t", Some(SyncMode::Async))
            .unwrap();
        assert_eq!(diagram.mode(), Some(SyncMode::Sync));
        assert_eq!(
            tail(&diagram, 2),
            vec!["sync();", "async();", r#"cmessage(O_0,O_1,"t");"#, "sync();"]
        );
    }

    #[test]
    fn test_destroy_instance_mode_override_is_scoped() {
        let (mut diagram, client, server) = two();
        diagram.set_sync();
        diagram
            .participant(client)
            .destroy_instance(server, Some(SyncMode::Async))
            .unwrap();
        assert_eq!(diagram.mode(), Some(SyncMode::Sync));
        assert_eq!(
            tail(&diagram, 2),
            vec!["sync();", "async();", "dmessage(O_0,O_1);", "sync();"]
        );
    }

    #[test]
    fn test_mode_override_without_ambient_mode_persists() {
        let (mut diagram, ids) = Diagram::with_participants([
            Participant::object("c"),
            Participant::placeholder(),
            Participant::placeholder(),
        ]);
        diagram
            .participant(ids[0])
            .create_instance(ids[1], "t", Some(SyncMode::Async))
            .unwrap();
        assert_eq!(diagram.mode(), Some(SyncMode::Async));
        assert_eq!(tail(&diagram, 3), vec!["async();", r#"cmessage(O_0,O_1,"t");"#]);

        let mut fresh = Diagram::new();
        let owner = fresh.add_participant(Participant::object("c"));
        let doomed = fresh.add_participant(Participant::object("d"));
        fresh
            .participant(owner)
            .destroy_instance(doomed, Some(SyncMode::Sync))
            .unwrap();
        assert_eq!(fresh.mode(), Some(SyncMode::Sync));
        assert_eq!(tail(&fresh, 2), vec!["sync();", "dmessage(O_0,O_1);"]);
    }

    #[test]
    fn test_create_instance_override_matching_ambient_emits_no_toggle() {
        let (mut diagram, ids) =
            Diagram::with_participants([Participant::object("c"), Participant::placeholder()]);
        diagram.set_async();
        diagram
            .participant(ids[0])
            .create_instance(ids[1], "t", Some(SyncMode::Async))
            .unwrap();
        assert_eq!(tail(&diagram, 2), vec!["async();", r#"cmessage(O_0,O_1,"t");"#]);
    }

    #[test]
    fn test_create_instance_twice_fails() {
        let (mut diagram, ids) =
            Diagram::with_participants([Participant::object("c"), Participant::placeholder()]);
        diagram.participant(ids[0]).create_instance(ids[1], "a", None).unwrap();
        let before = diagram.statements().len();
        let err = diagram
            .participant(ids[0])
            .create_instance(ids[1], "b", None)
            .unwrap_err();
        assert!(matches!(err, Error::AlreadyCreated { ref label, .. } if label == "a"));
        assert_eq!(diagram.statements().len(), before);
        assert_eq!(diagram.label_of(ids[1]).unwrap(), Some("a"));
    }

    #[test]
    fn test_destroyed_participant_cannot_be_referenced() {
        let (mut diagram, client, server) = two();
        diagram.participant(client).destroy_instance(server, None).unwrap();
        assert!(!diagram.is_live(server));
        let before = diagram.statements().len();
        let err = diagram.participant(client).message(server, "late").unwrap_err();
        assert!(matches!(err, Error::DanglingParticipant { ref name } if name == "O_1"));
        assert!(diagram.participant(server).active().is_err());
        assert!(diagram.participant(client).call_method(server, "x").is_err());
        assert_eq!(diagram.statements().len(), before, "failed calls emit nothing");
        assert_eq!(diagram.live_participants(), vec![client]);
    }

    #[test]
    fn test_delete_removes_self() {
        let (mut diagram, client, server) = two();
        diagram.participant(server).delete().unwrap();
        assert_eq!(tail(&diagram, 2), vec!["delete(O_1);"]);
        assert_eq!(diagram.live_participants(), vec![client]);
    }

    #[test]
    fn test_foreign_handle_is_rejected() {
        let (mut diagram, client, _) = two();
        let stranger = ParticipantId(42);
        assert!(matches!(
            diagram.participant(client).message(stranger, "?"),
            Err(Error::UnknownParticipant { index: 42 })
        ));
    }

    #[test]
    fn test_line_constraints() {
        let (mut diagram, client, _) = two();
        let mut lifeline = diagram.participant(client);
        lifeline.line_constraint("{t < 30s}", false).unwrap();
        lifeline.line_constraint("connect(s)", true).unwrap();
        assert_eq!(
            tail(&diagram, 2),
            vec![
                r#"lconstraint(O_0,"{t < 30s}");"#,
                r#"lconstraint_below(O_0,"connect(s)");"#,
            ]
        );
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn activation_depth_never_negative(ops in proptest::collection::vec(any::<bool>(), 0..300)) {
                let (mut diagram, client, _) = two();
                let mut expected_statements = 0;
                let mut depth = 0usize;
                for activate in ops {
                    let mut lifeline = diagram.participant(client);
                    if activate {
                        lifeline.active().unwrap();
                        depth += 1;
                        expected_statements += 1;
                    } else {
                        if depth > 0 {
                            depth -= 1;
                            expected_statements += 1;
                        }
                        lifeline.inactive().unwrap();
                    }
                    prop_assert_eq!(diagram.activation_depth(client).unwrap(), depth);
                }
                prop_assert_eq!(diagram.statements().len(), 2 + expected_statements);
            }
        }
    }
}
