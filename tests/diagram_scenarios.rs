use std::collections::HashSet;
use std::path::Path;

use sequenceplot::prelude::*;
use sequenceplot::{Error, ParamValue};

fn client_server() -> (Diagram, ParticipantId, ParticipantId) {
    let (diagram, ids) = Diagram::with_participants([
        Participant::object("c: client"),
        Participant::object("s: server"),
    ]);
    (diagram, ids[0], ids[1])
}

#[test]
fn test_call_with_response_draws_full_exchange() {
    let (mut diagram, client, server) = client_server();
    diagram
        .participant(client)
        .call_method(
            server,
            Call::new("login(username,password)").response("sessionID,userInfo"),
        )
        .unwrap();

    assert_eq!(
        diagram.lines(),
        vec![
            r#"object(O_0,"c: client");"#,
            r#"object(O_1,"s: server");"#,
            "step();",
            "sync();",
            r#"message(O_0,O_1,"login(username,password)");"#,
            "active(O_1);",
            "async();",
            r#"rmessage(O_1,O_0,"sessionID,userInfo");"#,
            "inactive(O_1);",
            "step();",
        ]
    );
    assert_eq!(diagram.activation_depth(server).unwrap(), 0);
}

#[test]
fn test_repeated_mode_changes_emit_once() {
    let (mut diagram, client, server) = client_server();
    for _ in 0..3 {
        diagram.participant(client).call_method(server, "ping()").unwrap();
    }
    let syncs = diagram
        .statements()
        .iter()
        .filter(|s| s.name() == "sync")
        .count();
    assert_eq!(syncs, 1);
    assert_eq!(diagram.mode(), Some(SyncMode::Sync));
}

#[test]
fn test_generated_names_are_distinct_across_kinds() {
    let (mut diagram, client, server) = client_server();
    let outer = diagram.begin_frame(client, "outer", 1).unwrap();
    let inner = diagram.begin_frame(client, "inner", 1).unwrap();
    let note = diagram.comment(server, "note").unwrap();
    diagram.end_frame(server, &inner, 0).unwrap();
    diagram.end_frame(server, &outer, 0).unwrap();

    let names = [
        diagram.name_of(client).unwrap().to_string(),
        diagram.name_of(server).unwrap().to_string(),
        outer,
        inner,
        note,
    ];
    let distinct: HashSet<_> = names.iter().collect();
    assert_eq!(distinct.len(), names.len());
}

#[test]
fn test_frames_must_be_closed_before_finish() {
    let (mut diagram, client, server) = client_server();
    let frame = diagram.begin_frame(client, "Login", 1).unwrap();

    let err = diagram.end_frame(server, "F_99", 0).unwrap_err();
    assert!(matches!(err, Error::UnmatchedFrame { .. }));
    assert!(err.is_malformed_nesting());

    let err = diagram.finish().unwrap_err();
    match err {
        Error::UnclosedFrames { names } => assert_eq!(names, vec![frame]),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_destroyed_participant_is_not_completed() {
    let (mut diagram, ids) = Diagram::with_participants([
        Participant::object("c:Client"),
        Participant::placeholder(),
    ]);
    let (client, transient) = (ids[0], ids[1]);
    diagram
        .participant(client)
        .create_instance(transient, ":Transaction", None)
        .unwrap();
    diagram
        .participant(client)
        .destroy_instance(transient, None)
        .unwrap();

    let err = diagram
        .participant(client)
        .message(transient, "late")
        .unwrap_err();
    assert!(matches!(err, Error::DanglingParticipant { .. }));

    let document = diagram.finish().unwrap();
    let tail: Vec<String> = document
        .statements()
        .iter()
        .rev()
        .take(2)
        .map(ToString::to_string)
        .collect();
    assert_eq!(tail, vec!["complete(O_0);", "dmessage(O_0,O_1);"]);
}

#[test]
fn test_finished_document_serializes_as_pic_program() {
    let (mut diagram, client, server) = client_server();
    diagram.set_param("boxWidth", 1.25).unwrap();
    diagram.set_param("underline", false).unwrap();
    diagram.participant(client).message(server, "hello").unwrap();

    let pic = diagram
        .finish()
        .unwrap()
        .to_pic(Path::new("/usr/share/umlgraph/sequence.pic"));
    let lines: Vec<&str> = pic.lines().collect();

    assert_eq!(lines[0], ".PS");
    assert_eq!(lines[1], r#"copy "/usr/share/umlgraph/sequence.pic";"#);
    assert!(lines.contains(&"boxwid=1.25;"));
    assert!(lines.contains(&"underline=0;"));
    assert!(lines.contains(&"movewid=0.75;"));
    assert_eq!(
        &lines[lines.len() - 3..],
        &["complete(O_0);", "complete(O_1);", ".PE"]
    );
    assert!(pic.ends_with(".PE\n"));
}

#[test]
fn test_parameter_errors_leave_values_unchanged() {
    let mut diagram = Diagram::new();
    let err = diagram.set_param("boxColour", 1.0).unwrap_err();
    assert_eq!(err.to_string(), "Unknown parameter: boxColour");

    assert!(matches!(
        diagram.set_param("underline", 2.0),
        Err(Error::ParameterType { .. })
    ));
    assert_eq!(diagram.param("underline").unwrap(), ParamValue::Flag(true));
}

#[test]
fn test_every_demo_produces_a_balanced_program() {
    for (name, builder) in sequenceplot::demos::DEMOS {
        let pic = builder()
            .and_then(Diagram::finish)
            .unwrap_or_else(|e| panic!("{name}: {e}"))
            .to_pic(Path::new("sequence.pic"));
        let begins = pic.matches("begin_frame(").count();
        let ends = pic.matches("end_frame(").count();
        assert_eq!(begins, ends, "{name}");
        assert_eq!(pic.matches(".PS\n").count(), 1, "{name}");
    }
}
