//! Canonical example diagrams.
//!
//! Each builder returns an unfinished [`Diagram`] so callers can still
//! adjust parameters before calling [`Diagram::finish`].

use crate::diagram::{Comment, Diagram, SyncMode};
use crate::error::Result;
use crate::participant::{Call, Participant};

pub type DemoBuilder = fn() -> Result<Diagram>;

/// All demos by name, in listing order.
pub const DEMOS: &[(&str, DemoBuilder)] = &[
    ("authentication", authentication),
    ("comment", comment),
    ("create-destroy", create_destroy),
    ("external-actor", external_actor),
    ("lifeline-constraints", lifeline_constraints),
    ("nested-activation", nested_activation),
    ("concurrent-activations", concurrent_activations),
];

pub fn by_name(name: &str) -> Option<DemoBuilder> {
    DEMOS
        .iter()
        .find(|(demo, _)| *demo == name)
        .map(|(_, builder)| *builder)
}

/// A login call wrapped in a frame.
pub fn authentication() -> Result<Diagram> {
    let (mut diagram, ids) = Diagram::with_participants([
        Participant::object("c: client"),
        Participant::object("s: server"),
    ]);
    let (client, server) = (ids[0], ids[1]);
    diagram.set_param("objectSpacing", 1.75)?;

    let frame = diagram.begin_frame(client, "Login", 1)?;
    diagram.participant(client).call_method(
        server,
        Call::new("login(username, password)").response("sessionID, userInfo"),
    )?;
    diagram.end_frame(server, &frame, 0)?;
    Ok(diagram)
}

/// The authentication exchange with a note attached to the server.
pub fn comment() -> Result<Diagram> {
    let (mut diagram, ids) = Diagram::with_participants([
        Participant::object("c: client"),
        Participant::object("s: server"),
    ]);
    let (client, server) = (ids[0], ids[1]);
    diagram.set_param("objectSpacing", 1.75)?;

    let note = diagram.comment(
        server,
        Comment::new("sessions expire\nafter thirty\nminutes idle")
            .movement("down 0.5 right")
            .size("wid 1 ht 0.7"),
    )?;
    let frame = diagram.begin_frame(client, "Login", 1)?;
    diagram.participant(client).call_method(
        server,
        Call::new("login(username, password)").response("sessionID, userInfo"),
    )?;
    diagram.end_frame(server, &frame, 0)?;
    diagram.connect_to_comment(client, &note)?;
    Ok(diagram)
}

/// A transient transaction created, used and destroyed by a client.
pub fn create_destroy() -> Result<Diagram> {
    let (mut diagram, ids) = Diagram::with_participants([
        Participant::object("c:Client"),
        Participant::placeholder(),
        Participant::object("p:ODBCProxy"),
    ]);
    let (client, transaction, proxy) = (ids[0], ids[1], ids[2]);
    diagram.set_param("boxWidth", 1.1)?;
    diagram.set_param("objectSpacing", 0.5)?;

    diagram.step(1);
    diagram.participant(client).active()?;
    diagram
        .participant(client)
        .create_instance(transaction, ":Transaction", Some(SyncMode::Sync))?;
    diagram.object_constraint("{Transient}");

    diagram
        .participant(client)
        .push_method(transaction, "setActions(a,d,o)", SyncMode::Sync)?;
    diagram.set_sync();

    for request in ["setValues(d,3,4)", "setValues(a,\"CO\")"] {
        diagram.participant(transaction).message(proxy, request)?;
        diagram.participant(proxy).active()?;
        diagram.step(1);
        diagram.participant(proxy).inactive()?;
    }

    diagram
        .participant(client)
        .pop_method(transaction, "committed", SyncMode::Async)?;
    diagram
        .participant(client)
        .destroy_instance(transaction, Some(SyncMode::Sync))?;
    diagram.participant(client).inactive()?;
    diagram.step(1);
    Ok(diagram)
}

/// An order flowing from an external actor through two objects and back.
pub fn external_actor() -> Result<Diagram> {
    let (mut diagram, ids) = Diagram::with_participants([
        Participant::actor(":Customer"),
        Participant::object(":OTager"),
        Participant::object(":OFulfill"),
    ]);
    let (customer, tager, fulfill) = (ids[0], ids[1], ids[2]);

    diagram.step(1);
    diagram.participant(customer).message(tager, "submitOrder")?;
    diagram.participant(tager).message(fulfill, "placeOrder")?;
    diagram.participant(fulfill).message(customer, "acknowledgeOrder")?;
    diagram.step(1);
    Ok(diagram)
}

/// A phone call set up through a switch, with timing constraints.
pub fn lifeline_constraints() -> Result<Diagram> {
    let (mut diagram, ids) = Diagram::with_participants([
        Participant::object("s:Caller"),
        Participant::object(":Switch"),
        Participant::placeholder(),
        Participant::object("r:Caller"),
    ]);
    let (caller, switch, conversation, receiver) = (ids[0], ids[1], ids[2], ids[3]);
    diagram.set_param("objectSpacing", 0.5)?;

    diagram.step(1);
    diagram.participant(switch).active()?;
    diagram.set_async();
    diagram.participant(caller).message(switch, "liftReceiver")?;
    diagram.set_sync();
    diagram.participant(switch).message(caller, "setDialTone()")?;
    diagram.set_async();
    diagram.participant(caller).message(switch, "*dialDigit(d)")?;
    diagram
        .participant(switch)
        .line_constraint("{dialing.executionTime < 30s}", false)?;
    diagram.participant(switch).call_method(switch, "routeCalls(s,n)")?;

    diagram
        .participant(switch)
        .create_instance(conversation, "c:Convers", Some(SyncMode::Sync))?;
    diagram.participant(conversation).active()?;
    diagram
        .participant(conversation)
        .push_method(receiver, "ring()", SyncMode::Sync)?;
    diagram.set_async();
    diagram.participant(receiver).message(conversation, "liftReceiver")?;
    diagram.set_sync();
    diagram.participant(conversation).message(switch, "connect(r,s)")?;
    diagram.participant(switch).message(caller, "connect(r)")?;
    diagram.participant(switch).message(receiver, "")?;
    diagram.participant(switch).line_constraint("connect(s)", true)?;

    diagram.step(1);
    Ok(diagram)
}

/// Nested activations across a thread, a toolkit and a short-lived peer.
pub fn nested_activation() -> Result<Diagram> {
    let (mut diagram, ids) = Diagram::with_participants([
        Participant::placeholder(),
        Participant::object("t:thread"),
        Participant::object(":Toolkit"),
        Participant::placeholder(),
    ]);
    let (external, thread, toolkit, peer) = (ids[0], ids[1], ids[2], ids[3]);
    diagram.set_param("objectSpacing", 1.75)?;

    diagram
        .participant(external)
        .push_method(thread, "a1: run(3)", SyncMode::Sync)?;
    diagram
        .participant(thread)
        .push_method(toolkit, "run()", SyncMode::Sync)?;
    diagram.participant(toolkit).call_method(toolkit, "callbackLoop()")?;

    diagram
        .participant(toolkit)
        .create_instance(peer, "p:Peer", Some(SyncMode::Sync))?;
    diagram.participant(toolkit).call_method(
        peer,
        Call::new("handleExpose()")
            .response("")
            .response_mode(SyncMode::Sync),
    )?;
    diagram
        .participant(toolkit)
        .destroy_instance(peer, Some(SyncMode::Sync))?;

    diagram.participant(thread).inactive()?;
    diagram.participant(toolkit).inactive()?;
    diagram.step(2);
    Ok(diagram)
}

/// A transaction coordinator waiting on two concurrent checkers.
pub fn concurrent_activations() -> Result<Diagram> {
    let (mut diagram, ids) = Diagram::with_participants([
        Participant::placeholder(),
        Participant::placeholder(),
        Participant::placeholder(),
        Participant::placeholder(),
        Participant::placeholder(),
    ]);
    let (origin, transaction, coordinator, check1, check2) =
        (ids[0], ids[1], ids[2], ids[3], ids[4]);
    diagram.set_param("boxWidth", 1.3)?;
    let create = Some(SyncMode::Async);

    diagram
        .participant(origin)
        .create_instance(transaction, "a:Transaction", create)?;
    diagram.participant(transaction).active()?;
    diagram
        .participant(transaction)
        .create_instance(coordinator, "a:TransCoord", create)?;
    diagram.participant(transaction).inactive()?;
    diagram.participant(coordinator).active()?;
    diagram
        .participant(coordinator)
        .create_instance(check1, "a1:TransCheck", create)?;
    diagram.participant(check1).active()?;
    diagram
        .participant(coordinator)
        .create_instance(check2, "a2:TransCheck", create)?;
    diagram.participant(check2).active()?;

    for checker in [check1, check2] {
        if checker == check2 {
            diagram.participant(coordinator).active()?;
        }
        diagram.participant(checker).message(coordinator, "ok")?;
        diagram.participant(coordinator).call_method(coordinator, "all done?")?;
        diagram.participant(coordinator).inactive()?;
        diagram.participant(checker).delete()?;
        if checker == check1 {
            diagram.step(1);
        }
    }

    diagram.participant(coordinator).message(transaction, "beValid")?;
    diagram.participant(transaction).active()?;
    diagram.step(1);
    Ok(diagram)
}
