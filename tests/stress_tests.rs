//! Concurrency stress tests for the shared game state

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;
use ttt_server::dispatcher::Dispatcher;
use ttt_server::matchmaker::{Matchmaker, PlayOutcome};
use ttt_server::shutdown::ShutdownCoordinator;
use ttt_shared::{Response, EMPTY_CELL};

fn origin() -> SocketAddr {
    "127.0.0.1:50000".parse().unwrap()
}

/// Concurrent REGISTER calls never hand out the same id twice
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_register_ids_are_unique() {
    let dispatcher = Arc::new(Dispatcher::new(ShutdownCoordinator::new()));

    let handles: Vec<_> = (0..1000)
        .map(|_| {
            let dispatcher = Arc::clone(&dispatcher);
            tokio::spawn(async move { dispatcher.dispatch("REGISTER", origin()).await })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        match handle.await.unwrap() {
            Some(Response::Registered(id)) => assert!(ids.insert(id), "duplicate id {}", id),
            other => panic!("unexpected response {:?}", other),
        }
    }

    assert_eq!(ids.len(), 1000);
    assert_eq!(ids.iter().min(), Some(&10000));
    assert_eq!(ids.iter().max(), Some(&10999));
}

/// Every waiter is matched at most once and pairings are symmetric
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_play_pairs_symmetrically() {
    let matchmaker = Arc::new(Matchmaker::new());
    let players: Vec<i32> = (10000..10200).collect();

    let handles: Vec<_> = players
        .iter()
        .map(|&id| {
            let matchmaker = Arc::clone(&matchmaker);
            tokio::spawn(async move { (id, matchmaker.request_play(id).await) })
        })
        .collect();

    let mut matched_waiters = HashSet::new();
    let mut started = 0;
    for handle in handles {
        let (id, outcome) = handle.await.unwrap();
        match outcome {
            PlayOutcome::GameStarted { opponent } => {
                started += 1;
                assert_ne!(opponent, id);
                assert!(matched_waiters.insert(opponent), "waiter {} matched twice", opponent);
            }
            PlayOutcome::Waiting => {}
            PlayOutcome::StillWaiting => panic!("player {} was never waiting", id),
        }
    }

    assert_eq!(started, 100);
    assert_eq!(matchmaker.waiter().await, None);
    assert_eq!(matchmaker.active_games().await, 100);

    for &id in &players {
        let opponent = matchmaker
            .lookup_opponent(id)
            .await
            .expect("every player should be paired");
        assert_eq!(matchmaker.lookup_opponent(opponent).await, Some(id));
        assert_eq!(
            matchmaker.board(id).await.unwrap(),
            matchmaker.board(opponent).await.unwrap()
        );
    }
}

/// Racing moves on distinct cells of one board are all applied
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_moves_never_tear_a_board() {
    let matchmaker = Arc::new(Matchmaker::new());
    matchmaker.request_play(10000).await;
    matchmaker.request_play(10001).await;

    let handles: Vec<_> = (0..9i32)
        .map(|index| {
            let matchmaker = Arc::clone(&matchmaker);
            let (player, mark) = if index % 2 == 0 { (10000, 'X') } else { (10001, 'O') };
            tokio::spawn(async move { matchmaker.apply_move(player, index, mark).await })
        })
        .collect();

    for handle in handles {
        let board = handle.await.unwrap().unwrap();
        assert_eq!(board.cells().len(), 9);
    }

    let board = matchmaker.board(10000).await.unwrap();
    assert_eq!(board.to_string(), "XOXOXOXOX");
    assert!(!board.cells().contains(&EMPTY_CELL));
}

/// Both players ending at once leaves no state behind
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_end_from_both_players() {
    let matchmaker = Arc::new(Matchmaker::new());
    matchmaker.request_play(10000).await;
    matchmaker.request_play(10001).await;

    let ends: Vec<_> = [10000, 10001, 10000, 10001]
        .into_iter()
        .map(|id| {
            let matchmaker = Arc::clone(&matchmaker);
            tokio::spawn(async move { matchmaker.end_game(id).await })
        })
        .collect();

    let mut removed = 0;
    for handle in ends {
        if handle.await.unwrap() {
            removed += 1;
        }
    }

    assert_eq!(removed, 2);
    assert_eq!(matchmaker.active_games().await, 0);
    assert_eq!(matchmaker.lookup_opponent(10000).await, None);
    assert_eq!(matchmaker.lookup_opponent(10001).await, None);
}
