use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use poker_table::{
    entities::{Blinds, Board, Card, Chips, Suit, Username},
    functional::{argmax, eval},
    rules,
};

/// Helper to deal a hand at a table with N players
fn setup_board(n_players: usize) -> Board {
    let names = (0..n_players)
        .map(|i| Username::new(&format!("player{i}")))
        .collect();
    let seated = Board::seat_players(names, 1000, Blinds { small: 10, big: 20 }, 30);
    rules::deal(7, 0, &seated)
}

/// Benchmark hand evaluation with 2 cards (pocket cards)
fn bench_hand_eval_2_cards(c: &mut Criterion) {
    let cards = vec![
        Card(14, Suit::Spade), // Ace
        Card(13, Suit::Spade), // King
    ];

    c.bench_function("hand_eval_2_cards", |b| {
        b.iter(|| eval(&cards));
    });
}

/// Benchmark hand evaluation with 7 cards (full hand + board)
fn bench_hand_eval_7_cards(c: &mut Criterion) {
    let cards = vec![
        Card(14, Suit::Spade),
        Card(13, Suit::Spade),
        Card(12, Suit::Spade),
        Card(11, Suit::Spade),
        Card(10, Suit::Spade),
        Card(2, Suit::Heart),
        Card(3, Suit::Diamond),
    ];

    c.bench_function("hand_eval_7_cards", |b| {
        b.iter(|| eval(&cards));
    });
}

/// Benchmark hand comparison (argmax) across a full table's showdown
fn bench_showdown_comparison(c: &mut Criterion) {
    let board = setup_board(10);
    let hands: Vec<_> = rules::visible_cards(&board)
        .values()
        .map(|cards| eval(cards))
        .collect();

    c.bench_function("hand_comparison_10_hands", |b| {
        b.iter(|| argmax(&hands));
    });
}

/// Benchmark dealing with different player counts
fn bench_deal(c: &mut Criterion) {
    let mut group = c.benchmark_group("deal");

    for n_players in [2, 4, 6, 10] {
        let names = (0..n_players)
            .map(|i| Username::new(&format!("player{i}")))
            .collect();
        let seated = Board::seat_players(names, 1000, Blinds { small: 10, big: 20 }, 30);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{n_players}_players")),
            &seated,
            |b, seated| {
                b.iter(|| rules::deal(42, 0, seated));
            },
        );
    }

    group.finish();
}

/// Benchmark per-viewer hiding, done once per seat for every snapshot
fn bench_hide_for_viewer(c: &mut Criterion) {
    let mut group = c.benchmark_group("hide_for_viewer");

    for n_players in [2, 6, 10] {
        let board = setup_board(n_players);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{n_players}_players")),
            &board,
            |b, board| {
                b.iter(|| {
                    board
                        .players
                        .keys()
                        .map(|id| rules::hide_for_viewer(board, *id))
                        .collect::<Vec<_>>()
                });
            },
        );
    }

    group.finish();
}

/// Benchmark sweeping bets into pots with staggered all-ins
fn bench_build_side_pots(c: &mut Criterion) {
    let mut board = setup_board(10);
    for (id, player) in board.players.iter_mut() {
        let bet = 50 * (*id as Chips + 1);
        player.stack = 0;
        player.bet = bet;
    }

    c.bench_function("build_side_pots_10_all_ins", |b| {
        b.iter(|| rules::build_side_pots(&board));
    });
}

/// Benchmark a full showdown including evaluation and pot settlement
fn bench_showdown(c: &mut Criterion) {
    let board = setup_board(6);

    c.bench_function("showdown_6_players", |b| {
        b.iter(|| rules::showdown(&board, eval));
    });
}

criterion_group!(
    hand_evaluation,
    bench_hand_eval_2_cards,
    bench_hand_eval_7_cards,
    bench_showdown_comparison,
);

criterion_group!(
    table_rules,
    bench_deal,
    bench_hide_for_viewer,
    bench_build_side_pots,
    bench_showdown,
);

criterion_main!(hand_evaluation, table_rules);
