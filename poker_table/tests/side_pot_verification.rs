//! Side pot and chip conservation properties.
//!
//! These tests verify that chips never appear or disappear while a hand is
//! being played, whatever sequence of actions the players send, and that
//! sweeping bets into pots keeps every pot's eligibility nested.

use poker_table::game::{
    apply_action,
    entities::{Blinds, Board, Chips, PlayerAction, SeatId, Username},
    functional, rules,
};
use proptest::prelude::*;

fn seated(stacks: &[Chips]) -> Board {
    let names = (0..stacks.len())
        .map(|i| Username::new(&format!("player{i}")))
        .collect();
    let mut board = Board::seat_players(names, 0, Blinds { small: 5, big: 10 }, 30);
    for (id, stack) in stacks.iter().enumerate() {
        board.player_mut(id).stack = *stack;
    }
    board
}

// Strategy for one player's state at the end of a street: (stack, bet, in_hand)
fn seat_strategy() -> impl Strategy<Value = (Chips, Chips, bool)> {
    (0u32..500, 0u32..500, any::<bool>())
}

fn table_strategy() -> impl Strategy<Value = Vec<(Chips, Chips, bool)>> {
    prop::collection::vec(seat_strategy(), 2..=8).prop_filter(
        "somebody has to be in the hand",
        |seats| seats.iter().any(|(_, _, in_hand)| *in_hand),
    )
}

fn action_strategy() -> impl Strategy<Value = PlayerAction> {
    prop_oneof![
        4 => Just(PlayerAction::Check),
        2 => Just(PlayerAction::Fold),
        1 => Just(PlayerAction::Quit),
        1 => Just(PlayerAction::Ok),
        6 => (0u32..300).prop_map(PlayerAction::Bet),
        1 => Just(PlayerAction::Bet(Chips::MAX)),
    ]
}

/// Call instead of checking when a bet is open so hands keep moving.
fn coerce(board: &Board, action: PlayerAction) -> PlayerAction {
    let Some(id) = board.active_player else {
        return action;
    };
    let to_call = rules::live_max_bet(board) - board.player(id).bet;
    match action {
        PlayerAction::Check if to_call > 0 => PlayerAction::Bet(to_call),
        other => other,
    }
}

/// One game loop iteration. Illegal actions leave the board unchanged.
fn step(board: &Board, dealer: SeatId, action: &PlayerAction) -> Board {
    let Some(id) = board.active_player else {
        return board.clone();
    };
    let Ok(candidate) = apply_action(action, board) else {
        return board.clone();
    };
    let mut next = rules::patch_active_player(&candidate, board);
    next.current_bet = rules::max_bet(&next);
    if rules::round_complete(&next) {
        return next;
    }
    if rules::street_complete(&next) {
        rules::advance_street(&next, dealer)
    } else {
        next.active_player = Some(rules::next_eligible(&next, id));
        next
    }
}

#[test]
fn test_multiple_side_pots_four_players() {
    // Seat 0 all-in 25, seat 1 all-in 75, seat 2 all-in 150, seat 3 calls 150.
    let mut board = seated(&[0, 0, 0, 850]);
    for (id, bet) in [25, 75, 150, 150].into_iter().enumerate() {
        board.player_mut(id).bet = bet;
    }
    let built = rules::build_side_pots(&board);
    let amounts: Vec<Chips> = built.pots.iter().map(|p| p.amount).collect();
    assert_eq!(amounts, vec![150, 150, 100]);
}

#[test]
fn test_folded_big_bettor_funds_the_pot() {
    // Seat 0 bet 300 and then folded to two all-ins for less.
    let mut board = seated(&[700, 0, 0]);
    for (id, bet) in [300, 50, 120].into_iter().enumerate() {
        board.player_mut(id).bet = bet;
    }
    board.player_mut(0).in_hand = false;
    let built = rules::build_side_pots(&board);
    let amounts: Vec<Chips> = built.pots.iter().map(|p| p.amount).collect();
    // 50 x 3 in the main pot. Seat 0's excess lands in seat 2's side pot.
    assert_eq!(amounts, vec![320, 150]);
    assert_eq!(built.total_chips(), board.total_chips());
}

proptest! {
    #[test]
    fn test_side_pot_partition(seats in table_strategy(), carried in 0u32..1000) {
        let stacks: Vec<Chips> = seats.iter().map(|(stack, _, _)| *stack).collect();
        let mut board = seated(&stacks);
        board.pots[0].amount = carried;
        for (id, (_, bet, in_hand)) in seats.iter().enumerate() {
            let player = board.player_mut(id);
            player.bet = *bet;
            player.in_hand = *in_hand;
        }
        let bet_sum: Chips = seats.iter().map(|(_, bet, _)| *bet).sum();

        let built = rules::build_side_pots(&board);

        prop_assert!(built.players.values().all(|p| p.bet == 0));
        let pot_sum: Chips = built.pots.iter().map(|p| p.amount).sum();
        prop_assert_eq!(pot_sum, carried + bet_sum);
        // Newer pots are open to a subset of the players of older ones.
        for pair in built.pots.windows(2) {
            prop_assert!(pair[0].participants.is_subset(&pair[1].participants));
        }
        prop_assert_eq!(built.total_chips(), board.total_chips());
    }

    #[test]
    fn test_chip_conservation_within_a_hand(
        stacks in prop::collection::vec(20u32..2000, 2..=6),
        seed in any::<u64>(),
        actions in prop::collection::vec(action_strategy(), 0..120),
    ) {
        let seats = seated(&stacks);
        let total: Chips = stacks.iter().sum();
        let mut board = rules::deal(seed, 0, &seats);
        prop_assert_eq!(board.total_chips(), total);

        for action in actions {
            if rules::round_complete(&board) {
                break;
            }
            let action = coerce(&board, action);
            board = step(&board, 0, &action);
            prop_assert_eq!(board.total_chips(), total);
            prop_assert!(board.steps_in_round <= board.count_can_act() + 1);
        }

        if rules::round_complete(&board) {
            let settled = rules::showdown(&board, functional::eval);
            let paid = settled.total_chips();
            // Only split remainders may leave the table.
            prop_assert!(paid <= total);
            prop_assert!(total - paid < (stacks.len() * settled.pots.len()) as Chips);
            let after = rules::eliminate(&settled);
            prop_assert!(after.players.values().all(|p| p.stack > 0));
        }
    }
}
