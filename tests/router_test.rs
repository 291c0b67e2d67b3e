//! Input routing, notices and redraw behaviour against an in-memory service.

mod common;

use common::{FakeService, fast_polling, next_update};
use std::sync::Arc;
use tokio::sync::mpsc;
use winliam_games::{
    Actor, ChannelNotifier, GameService, InputRouter, Mark, PollApplied, PollUpdate,
    RetainedView, SessionClient, SessionErrorKind, StaticIdentity,
};

struct Harness {
    router: InputRouter<RetainedView>,
    updates: mpsc::UnboundedReceiver<PollUpdate>,
    notices: mpsc::UnboundedReceiver<String>,
}

fn harness(service: &Arc<FakeService>, name: &str) -> Harness {
    let (session, updates) = SessionClient::new(service.clone(), fast_polling());
    let (notifier, notices) = ChannelNotifier::new();
    let router = InputRouter::new(
        session,
        Box::new(StaticIdentity::new(Actor::from_name(name))),
        Box::new(notifier),
        RetainedView::default(),
    );
    Harness {
        router,
        updates,
        notices,
    }
}

fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<String> {
    let mut out = Vec::new();
    while let Ok(notice) = rx.try_recv() {
        out.push(notice);
    }
    out
}

#[tokio::test]
async fn test_create_switches_input_online() {
    let service = Arc::new(FakeService::new());
    let mut h = harness(&service, "alice");

    h.router.create().await.unwrap();
    assert!(drain(&mut h.notices)[0].contains("Session g1 created"));
    assert_eq!(h.router.view().status(), "Session g1: waiting for an opponent");

    h.router.select_cell(4).await.unwrap();
    assert_eq!(FakeService::count(&service.moves), 1);
    assert_eq!(
        service.snapshot("g1").unwrap().board().get(4).and_then(|s| s.mark()),
        Some(Mark::X)
    );
    assert!(h.router.local().state().board().is_empty(4));
}

#[tokio::test]
async fn test_join_announces_side() {
    let service = Arc::new(FakeService::new());
    service.create("alice").await.unwrap();
    let mut h = harness(&service, "bob");

    h.router.join("g1").await.unwrap();
    assert_eq!(drain(&mut h.notices), vec!["Joined session g1 as O".to_string()]);
    assert_eq!(h.router.view().status(), "Waiting for X");
}

#[tokio::test]
async fn test_rejected_online_move_leaves_board_alone() {
    let service = Arc::new(FakeService::new());
    service.create("alice").await.unwrap();
    let mut h = harness(&service, "bob");
    h.router.join("g1").await.unwrap();
    drain(&mut h.notices);
    let renders = h.router.renderer().renders();

    let err = h.router.select_cell(0).await.unwrap_err();
    assert_eq!(err.kind(), &SessionErrorKind::NotYourTurn(Mark::X));
    assert_eq!(drain(&mut h.notices), vec!["Not your turn (X to move)".to_string()]);
    assert_eq!(h.router.renderer().renders(), renders);
    assert_eq!(FakeService::count(&service.moves), 0);
}

#[tokio::test]
async fn test_opponent_move_arrives_by_polling() {
    let service = Arc::new(FakeService::new());
    let mut h = harness(&service, "alice");
    h.router.create().await.unwrap();
    service.join("g1", "bob").await.unwrap();
    h.router.select_cell(0).await.unwrap();
    service.submit_move("g1", "bob", 8).await.unwrap();

    while h.router.view().mark(8).is_none() {
        let update = next_update(&mut h.updates).await;
        h.router.on_poll(update).unwrap();
    }
    let view = h.router.renderer().view().unwrap();
    assert_eq!(view.cells()[8], "O");
    assert_eq!(view.status(), "Your turn (X)");
}

#[tokio::test]
async fn test_terminal_snapshot_renders_once() {
    let service = Arc::new(FakeService::new());
    let mut h = harness(&service, "alice");
    h.router.create().await.unwrap();
    service.join("g1", "bob").await.unwrap();

    for (x_cell, o_cell) in [(0, 3), (1, 4)] {
        h.router.select_cell(x_cell).await.unwrap();
        service.submit_move("g1", "bob", o_cell).await.unwrap();
        let target = service.snapshot("g1").unwrap();
        while h.router.session().state() != &target {
            let update = next_update(&mut h.updates).await;
            h.router.on_poll(update).unwrap();
        }
    }
    h.router.select_cell(2).await.unwrap();
    assert_eq!(h.router.view().status(), "You win!");
    let renders = h.router.renderer().renders();

    let final_state = service.snapshot("g1").unwrap();
    for _ in 0..3 {
        let again = PollUpdate {
            session_id: "g1".into(),
            generation: h.router.session().generation(),
            result: Ok(final_state.clone()),
        };
        assert_eq!(h.router.on_poll(again).unwrap(), PollApplied::Unchanged);
    }
    assert_eq!(h.router.renderer().renders(), renders);
}

#[tokio::test]
async fn test_leave_returns_to_local_board() {
    let service = Arc::new(FakeService::new());
    let mut h = harness(&service, "alice");
    h.router.select_cell(0).await.unwrap();
    h.router.create().await.unwrap();
    drain(&mut h.notices);

    h.router.leave();
    assert_eq!(drain(&mut h.notices), vec!["Left session g1".to_string()]);
    assert!(!h.router.session().is_active());
    assert_eq!(h.router.view().status(), "Local game: X to move");
    assert!(h.router.view().mark(0).is_none());

    h.router.select_cell(4).await.unwrap();
    assert_eq!(FakeService::count(&service.moves), 0);
}

#[tokio::test]
async fn test_vanished_session_is_reported() {
    let service = Arc::new(FakeService::new());
    let mut h = harness(&service, "alice");
    h.router.create().await.unwrap();
    drain(&mut h.notices);
    service.discard("g1");

    let err = loop {
        match h.router.on_poll(next_update(&mut h.updates).await) {
            Ok(_) => continue,
            Err(err) => break err,
        }
    };
    assert!(matches!(err.kind(), SessionErrorKind::SessionNotFound(_)));
    assert_eq!(drain(&mut h.notices), vec!["Session g1 not found".to_string()]);
    assert_eq!(h.router.view().status(), "Local game: X to move");
}
