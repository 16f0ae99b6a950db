//! A full round played through the public API: draw until someone wins,
//! then reset and play again.

use bingo_game::{draw_ball, validate, GameError, GameState, GameStatus};
use bingo_protocol::PlayerName;

fn players() -> Vec<PlayerName> {
    ["ana", "bea", "carlos", "dani"]
        .into_iter()
        .map(PlayerName::new)
        .collect()
}

/// Draws until some player's card validates. Returns that player.
fn play_until_winner(state: &mut GameState, players: &[PlayerName]) -> PlayerName {
    loop {
        let drawn = state.game().expect("game exists").drawn_set().clone();
        let ball = draw_ball(&drawn).expect("a card must win before the cage empties");
        state.append_ball(ball.number()).expect("fresh ball");

        for player in players {
            if state.check_claim(player).expect("player holds a card").is_some() {
                return player.clone();
            }
        }
    }
}

// =========================================================================
// Full game
// =========================================================================

#[test]
fn test_full_game_ends_with_single_winner() {
    let mut state = GameState::new();
    let players = players();
    for p in &players {
        state.get_or_create_card(p);
    }

    let winner = play_until_winner(&mut state, &players);
    state.declare_winner(winner.clone()).unwrap();

    let game = state.game().unwrap();
    assert_eq!(game.status(), GameStatus::Finished);
    assert_eq!(game.winner(), Some(&winner));
    assert!(game.drawn().len() >= 4, "a line needs at least four balls");

    // Nobody else can win a finished game.
    for p in players.iter().filter(|p| **p != winner) {
        assert_eq!(state.check_claim(p), Err(GameError::NoActiveGame));
        assert_eq!(state.declare_winner(p.clone()), Err(GameError::NoActiveGame));
    }
}

#[test]
fn test_winning_card_validates_against_drawn_balls() {
    let mut state = GameState::new();
    let players = players();
    for p in &players {
        state.get_or_create_card(p);
    }

    let winner = play_until_winner(&mut state, &players);

    let card = state.card(&winner).unwrap();
    let drawn = state.game().unwrap().drawn_set();
    assert!(validate(card, drawn));
}

#[test]
fn test_reset_after_win_starts_clean_round() {
    let mut state = GameState::new();
    let players = players();
    for p in &players {
        state.get_or_create_card(p);
    }
    let first_id = state.game().unwrap().id();
    let winner = play_until_winner(&mut state, &players);
    state.declare_winner(winner).unwrap();

    let second_id = state.reset().unwrap();
    assert_ne!(first_id, second_id);
    for p in &players {
        assert!(state.card(p).is_none());
        state.get_or_create_card(p);
    }

    let game = state.game().unwrap();
    assert_eq!(game.status(), GameStatus::Waiting);
    assert!(game.drawn().is_empty());

    // The new round is playable.
    let winner = play_until_winner(&mut state, &players);
    state.declare_winner(winner).unwrap();
}

#[test]
fn test_cage_exhausts_after_75_draws() {
    let mut state = GameState::new();
    state.ensure_active_game();

    for _ in 0..75 {
        let drawn = state.game().unwrap().drawn_set().clone();
        let ball = draw_ball(&drawn).unwrap();
        state.append_ball(ball.number()).unwrap();
    }

    let game = state.game().unwrap();
    assert_eq!(game.drawn().len(), 75);
    assert_eq!(draw_ball(game.drawn_set()), None);
}
