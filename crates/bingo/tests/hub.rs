//! Integration tests for the session hub and game controller, in process.
//!
//! Each "connection" is just an mpsc receiver, so these tests exercise
//! the locking and broadcast ordering without any sockets.

use std::collections::HashSet;
use std::sync::Arc;

use bingo::prelude::*;
use bingo_game::validate;
use tokio::sync::mpsc;

// =========================================================================
// Helpers
// =========================================================================

fn hub() -> Arc<SessionHub> {
    Arc::new(SessionHub::new(
        HubConfig::default(),
        StaticGameSchedule::default(),
    ))
}

fn player(name: &str) -> Identity {
    Identity::Player(PlayerName::new(name))
}

async fn join(hub: &SessionHub, identity: Identity) -> (ConnectionId, EventReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    let id = hub.connect(identity, tx).await;
    (id, rx)
}

/// Everything queued for a connection so far.
fn drain(rx: &mut EventReceiver) -> Vec<ServerEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn last_presence(events: &[ServerEvent]) -> Option<Vec<String>> {
    events.iter().rev().find_map(|e| match e {
        ServerEvent::Presence { members, .. } => Some(members.clone()),
        _ => None,
    })
}

/// Draws until `card` holds a winning line.
async fn draw_until_win(controller: &GameController, card: &Card) {
    loop {
        let drawn: HashSet<Ball> = controller
            .hub()
            .snapshot()
            .await
            .map(|s| s.drawn.into_iter().collect())
            .unwrap_or_default();
        if validate(card, &drawn) {
            return;
        }
        let outcome = controller.draw_next().await.expect("draw");
        assert_ne!(outcome, DrawOutcome::Exhausted, "all 75 balls always win");
    }
}

// =========================================================================
// Presence
// =========================================================================

#[tokio::test]
async fn test_presence_n_connects_one_disconnect() {
    let hub = hub();
    let (_, mut observer) = join(&hub, player("observer")).await;

    let mut conns = Vec::new();
    for i in 0..5 {
        conns.push(join(&hub, player(&format!("player-{i}"))).await);
    }
    hub.disconnect(conns[2].0).await;

    let members = last_presence(&drain(&mut observer)).unwrap();
    assert_eq!(members.len(), 5, "observer + 5 players - 1");
    assert!(!members.contains(&"player-2".to_string()));
    assert_eq!(hub.members().await, members);
}

#[tokio::test]
async fn test_presence_snapshot_on_every_join() {
    let hub = hub();
    let (_, mut ana_rx) = join(&hub, player("ana")).await;
    let _bea = join(&hub, player("bea")).await;

    let events = drain(&mut ana_rx);
    let rosters: Vec<Vec<String>> = events
        .iter()
        .filter_map(|e| match e {
            ServerEvent::Presence { members, .. } => Some(members.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(
        rosters,
        vec![vec!["ana".to_string()], vec!["ana".to_string(), "bea".to_string()]]
    );
}

#[tokio::test]
async fn test_guests_share_one_roster_entry() {
    let hub = hub();
    let _first = join(&hub, Identity::Guest).await;
    let _second = join(&hub, Identity::Guest).await;
    assert_eq!(hub.members().await, vec!["Guest"]);
    assert_eq!(hub.connection_count().await, 2);
}

// =========================================================================
// Chat
// =========================================================================

#[tokio::test]
async fn test_chat_relayed_to_everyone_with_sender_label() {
    let hub = hub();
    let (ana, mut ana_rx) = join(&hub, player("ana")).await;
    let (_, mut guest_rx) = join(&hub, Identity::Guest).await;
    drain(&mut ana_rx);
    drain(&mut guest_rx);

    hub.handle_message(ana, ClientMessage::ChatMessage { message: "hola".into() })
        .await;

    let expected = ServerEvent::ChatMessage {
        user: "ana".into(),
        message: "hola".into(),
    };
    assert_eq!(drain(&mut ana_rx), vec![expected.clone()]);
    assert_eq!(drain(&mut guest_rx), vec![expected]);
}

#[tokio::test]
async fn test_chat_from_guest_uses_guest_label() {
    let hub = hub();
    let (guest, mut rx) = join(&hub, Identity::Guest).await;
    drain(&mut rx);

    hub.handle_frame(guest, br#"{"type":"chat_message","message":"hi"}"#)
        .await
        .unwrap();

    assert_eq!(
        drain(&mut rx),
        vec![ServerEvent::ChatMessage {
            user: "Guest".into(),
            message: "hi".into(),
        }]
    );
}

// =========================================================================
// Claims
// =========================================================================

#[tokio::test]
async fn test_claim_without_line_broadcasts_system_message() {
    let hub = hub();
    let (ana, mut rx) = join(&hub, player("ana")).await;
    hub.card_for(&PlayerName::new("ana")).await;
    drain(&mut rx);

    hub.handle_message(ana, ClientMessage::BingoClaim).await;

    match drain(&mut rx).as_slice() {
        [ServerEvent::ChatMessage { user, message }] => {
            assert_eq!(user, "SYSTEM");
            assert!(message.contains("ana"));
        }
        other => panic!("expected one system chat, got {other:?}"),
    }
    let snapshot = hub.snapshot().await.unwrap();
    assert_eq!(snapshot.winner, None);
}

#[tokio::test]
async fn test_claim_with_line_ends_game() {
    let hub = hub();
    let controller = GameController::new(Arc::clone(&hub));
    let ana_name = PlayerName::new("ana");
    let (ana, mut rx) = join(&hub, player("ana")).await;

    let card = hub.card_for(&ana_name).await;
    draw_until_win(&controller, &card).await;
    drain(&mut rx);

    hub.handle_message(ana, ClientMessage::BingoClaim).await;

    assert_eq!(
        drain(&mut rx),
        vec![ServerEvent::GameOver {
            winner: "ana".into()
        }]
    );
    let snapshot = hub.snapshot().await.unwrap();
    assert_eq!(snapshot.status, GameStatus::Finished);
    assert_eq!(snapshot.winner, Some(ana_name));
}

#[tokio::test]
async fn test_claim_from_guest_is_dropped() {
    let hub = hub();
    let (guest, mut rx) = join(&hub, Identity::Guest).await;
    drain(&mut rx);

    hub.handle_message(guest, ClientMessage::BingoClaim).await;
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn test_claim_without_card_is_dropped() {
    let hub = hub();
    let controller = GameController::new(Arc::clone(&hub));
    let (ana, mut rx) = join(&hub, player("ana")).await;
    controller.draw_next().await.unwrap();
    drain(&mut rx);

    hub.handle_message(ana, ClientMessage::BingoClaim).await;
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_true_claims_have_one_winner() {
    let hub = hub();
    let controller = GameController::new(Arc::clone(&hub));
    let names = ["ana", "bea", "carlos", "dani"];

    let mut conns = Vec::new();
    for name in names {
        conns.push(join(&hub, player(name)).await);
        hub.card_for(&PlayerName::new(name)).await;
    }
    let (_, mut observer) = join(&hub, Identity::Guest).await;

    // With every ball out, every card has a line.
    for _ in 0..75 {
        controller.draw_next().await.unwrap();
    }
    drain(&mut observer);

    let mut tasks = Vec::new();
    for (id, _) in &conns {
        for _ in 0..3 {
            let hub = Arc::clone(&hub);
            let id = *id;
            tasks.push(tokio::spawn(async move {
                hub.handle_message(id, ClientMessage::BingoClaim).await;
            }));
        }
    }
    for task in tasks {
        task.await.unwrap();
    }

    let winners: Vec<String> = drain(&mut observer)
        .into_iter()
        .filter_map(|e| match e {
            ServerEvent::GameOver { winner } => Some(winner),
            _ => None,
        })
        .collect();
    assert_eq!(winners.len(), 1, "exactly one game_over");

    let snapshot = hub.snapshot().await.unwrap();
    assert_eq!(snapshot.status, GameStatus::Finished);
    assert_eq!(
        snapshot.winner.map(|p| p.to_string()),
        Some(winners[0].clone())
    );
}

// =========================================================================
// Draws and resets
// =========================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_draws_never_duplicate() {
    let hub = hub();
    let controller = GameController::new(Arc::clone(&hub));
    let (_, mut rx) = join(&hub, Identity::Guest).await;
    drain(&mut rx);

    let tasks: Vec<_> = (0..100)
        .map(|_| {
            let controller = controller.clone();
            tokio::spawn(async move { controller.draw_next().await.unwrap() })
        })
        .collect();

    let mut drawn = Vec::new();
    let mut exhausted = 0;
    for task in tasks {
        match task.await.unwrap() {
            DrawOutcome::Drawn(ball) => drawn.push(ball),
            DrawOutcome::Exhausted => exhausted += 1,
            DrawOutcome::GameOver => panic!("unexpected GameOver: no claims were made"),
        }
    }

    let unique: HashSet<Ball> = drawn.iter().copied().collect();
    assert_eq!(drawn.len(), 75);
    assert_eq!(unique.len(), 75);
    assert_eq!(exhausted, 25);

    // The wire order matches the recorded draw order.
    let broadcast: Vec<Ball> = drain(&mut rx)
        .into_iter()
        .filter_map(|e| match e {
            ServerEvent::NewBall { number } => Some(number),
            _ => None,
        })
        .collect();
    assert_eq!(broadcast, hub.snapshot().await.unwrap().drawn);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_members_see_same_event_order() {
    let hub = hub();
    let controller = GameController::new(Arc::clone(&hub));
    let (ana, mut ana_rx) = join(&hub, player("ana")).await;
    let (bea, mut bea_rx) = join(&hub, player("bea")).await;
    drain(&mut ana_rx);
    drain(&mut bea_rx);

    let mut tasks = Vec::new();
    for i in 0..20 {
        let controller = controller.clone();
        tasks.push(tokio::spawn(async move {
            controller.draw_next().await.unwrap();
        }));
        let hub = Arc::clone(&hub);
        let sender = if i % 2 == 0 { ana } else { bea };
        tasks.push(tokio::spawn(async move {
            hub.handle_message(
                sender,
                ClientMessage::ChatMessage {
                    message: format!("msg {i}"),
                },
            )
            .await;
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    let ana_events = drain(&mut ana_rx);
    assert_eq!(ana_events.len(), 40);
    assert_eq!(ana_events, drain(&mut bea_rx));
}

#[tokio::test]
async fn test_reset_broadcasts_and_issues_fresh_cards() {
    let hub = hub();
    let controller = GameController::new(Arc::clone(&hub));
    let ana_name = PlayerName::new("ana");
    let (_, mut rx) = join(&hub, player("ana")).await;

    let old_card = hub.card_for(&ana_name).await;
    let old_id = hub.snapshot().await.unwrap().id;
    for _ in 0..10 {
        controller.draw_next().await.unwrap();
    }
    drain(&mut rx);

    controller.reset_game().await.unwrap();

    assert_eq!(drain(&mut rx), vec![ServerEvent::GameReset]);
    let snapshot = hub.snapshot().await.unwrap();
    assert_ne!(snapshot.id, old_id);
    assert_eq!(snapshot.status, GameStatus::Waiting);
    assert!(snapshot.drawn.is_empty());
    assert_eq!(snapshot.winner, None);

    // Cards from the previous game are gone; a new one is issued.
    assert_ne!(hub.card_for(&ana_name).await, old_card);
}

#[tokio::test]
async fn test_reset_without_game_is_error() {
    let hub = hub();
    let controller = GameController::new(Arc::clone(&hub));
    assert!(matches!(
        controller.reset_game().await,
        Err(BingoError::Game(GameError::NoGameToReset))
    ));
}

#[tokio::test]
async fn test_draw_after_finish_waits_for_reset() {
    let hub = hub();
    let controller = GameController::new(Arc::clone(&hub));
    let ana_name = PlayerName::new("ana");
    let (ana, mut rx) = join(&hub, player("ana")).await;
    let card = hub.card_for(&ana_name).await;
    draw_until_win(&controller, &card).await;
    hub.handle_message(ana, ClientMessage::BingoClaim).await;
    let finished = hub.snapshot().await.unwrap();
    drain(&mut rx);

    assert_eq!(controller.draw_next().await.unwrap(), DrawOutcome::GameOver);
    assert!(drain(&mut rx).is_empty());
    assert_eq!(hub.snapshot().await.unwrap(), finished);

    controller.reset_game().await.unwrap();
    let DrawOutcome::Drawn(ball) = controller.draw_next().await.unwrap() else {
        panic!("fresh game should draw");
    };
    assert_eq!(
        drain(&mut rx),
        vec![ServerEvent::GameReset, ServerEvent::NewBall { number: ball }]
    );
    let snapshot = hub.snapshot().await.unwrap();
    assert_ne!(snapshot.id, finished.id);
    assert_eq!(snapshot.drawn, vec![ball]);
}
