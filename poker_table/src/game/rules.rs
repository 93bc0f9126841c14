//! Pure table rules.
//!
//! Every function here takes a `Board` by reference and returns a new one
//! (or a value derived from it). None of them do I/O, and none of them
//! tolerate malformed input: a seat id that isn't at the table panics.

use rand::{SeedableRng, rngs::StdRng};
use std::collections::BTreeMap;

use super::{
    constants::{FOUR_SEAT_ORDER, NUM_COMMUNITY_CARDS},
    entities::{Board, Card, Chips, Deck, Pot, SeatId, Street},
};

/// Seat that acts after `id` at a table created with `seat_count` seats.
///
/// Four-seat tables follow the fixed seating permutation `0→3→1→2→0`;
/// every other size goes round by seat number.
///
/// # Panics
///
/// Panics if `id` is not a seat of the table.
#[must_use]
pub fn turn_order(seat_count: usize, id: SeatId) -> SeatId {
    assert!(id < seat_count, "seat {id} outside a {seat_count}-seat table");
    if seat_count == FOUR_SEAT_ORDER.len() {
        FOUR_SEAT_ORDER[id]
    } else {
        (id + 1) % seat_count
    }
}

/// Next seat after `id` in turn order that still has a player in it.
fn next_seated(board: &Board, id: SeatId) -> SeatId {
    let mut next = id;
    for _ in 0..board.seat_count {
        next = turn_order(board.seat_count, next);
        if board.players.contains_key(&next) {
            return next;
        }
    }
    panic!("no seated player after seat {id}")
}

/// Next seat after `id` in turn order that may act.
///
/// At showdown any seated player qualifies (this picks the next dealer);
/// otherwise the player must still be in the hand with chips behind.
///
/// # Panics
///
/// Panics if a whole orbit finds nobody.
#[must_use]
pub fn next_eligible(board: &Board, id: SeatId) -> SeatId {
    let mut next = id;
    for _ in 0..board.seat_count {
        next = turn_order(board.seat_count, next);
        if let Some(player) = board.players.get(&next)
            && (board.street == Street::Showdown || player.can_act())
        {
            return next;
        }
    }
    panic!("no eligible seat after seat {id}")
}

/// First seat to act when a street opens: the dealer when it can still
/// act, otherwise the next eligible seat. `None` when nobody can act.
fn street_start(board: &Board, dealer: SeatId) -> Option<SeatId> {
    if board.count_can_act() == 0 {
        return None;
    }
    match board.players.get(&dealer) {
        Some(player) if player.can_act() => Some(dealer),
        _ => Some(next_eligible(board, dealer)),
    }
}

/// Moves up to `amount` from a player's stack into their bet.
fn post_blind(board: &mut Board, id: SeatId, amount: Chips) {
    let player = board.player_mut(id);
    let amount = amount.min(player.stack);
    player.stack -= amount;
    player.bet += amount;
}

/// Deal a new hand on top of `base`.
///
/// `base` is either a freshly seated table or the previous hand's board;
/// names and stacks carry over, everything else is reset. The deck is
/// shuffled from `seed`, the dealer posts the small blind and the next
/// seated player the big blind, and the first player able to act after
/// the big blind gets the action.
///
/// # Panics
///
/// Panics if `dealer` isn't seated or fewer than two players are seated.
#[must_use]
pub fn deal(seed: u64, dealer: SeatId, base: &Board) -> Board {
    assert!(
        base.players.contains_key(&dealer),
        "dealer seat {dealer} is not at the table"
    );
    assert!(base.players.len() >= 2, "need 2+ players to deal");

    let mut deck = Deck::default();
    deck.shuffle(&mut StdRng::seed_from_u64(seed));

    let mut board = base.clone();
    for player in board.players.values_mut() {
        player.hole_cards = [deck.deal_card(), deck.deal_card()];
        player.bet = 0;
        player.in_hand = true;
    }
    board.community_cards = (0..NUM_COMMUNITY_CARDS).map(|_| deck.deal_card()).collect();
    board.street = Street::PreFlop;
    board.player_count = board.players.len();
    board.need_action = false;
    board.need_prompt = false;
    board.steps_in_round = 0;
    board.pots = vec![Pot::new(board.players.keys().copied())];
    board.hand_number += 1;

    let blinds = board.blinds;
    let big_blind_seat = next_seated(&board, dealer);
    post_blind(&mut board, dealer, blinds.small);
    post_blind(&mut board, big_blind_seat, blinds.big);
    board.current_bet = max_bet(&board);
    board.active_player =
        (board.count_can_act() > 0).then(|| next_eligible(&board, big_blind_seat));
    board
}

/// The snapshot `viewer` is allowed to see: only their own hole cards and
/// only the community cards the street has turned over.
#[must_use]
pub fn hide_for_viewer(board: &Board, viewer: SeatId) -> Board {
    let mut view = board.clone();
    view.community_cards.truncate(board.street.community_count());
    for player in view.players.values_mut() {
        if player.id != viewer {
            player.hole_cards = [Card::HIDDEN; 2];
        }
    }
    view.need_action = board.active_player == Some(viewer);
    view.need_prompt = false;
    view
}

/// Unhidden snapshot used for showdowns and the final broadcast.
#[must_use]
pub fn reveal(board: &Board) -> Board {
    let mut view = board.clone();
    view.community_cards.truncate(board.street.community_count());
    view.need_action = false;
    view.need_prompt = true;
    view
}

/// Highest bet at the table.
#[must_use]
pub fn max_bet(board: &Board) -> Chips {
    board.players.values().map(|p| p.bet).max().unwrap_or(0)
}

/// Highest bet among players still in the hand. This is what a player has
/// to match to stay in.
#[must_use]
pub fn live_max_bet(board: &Board) -> Chips {
    board
        .players
        .values()
        .filter(|p| p.in_hand)
        .map(|p| p.bet)
        .max()
        .unwrap_or(0)
}

/// Whether every in-hand player that can still act has acted since the
/// last raise.
#[must_use]
pub fn street_complete(board: &Board) -> bool {
    board.steps_in_round >= board.count_can_act()
}

/// Whether no more betting can happen this hand.
#[must_use]
pub fn round_complete(board: &Board) -> bool {
    if board.street == Street::River && street_complete(board) {
        return true;
    }
    if board.count_in_hand() <= 1 {
        return true;
    }
    let target = live_max_bet(board);
    board.count_can_act() < 2
        && board
            .players
            .values()
            .filter(|p| p.in_hand)
            .all(|p| p.bet == target || p.stack == 0)
}

/// Whether a single player holds every chip left in play.
#[must_use]
pub fn game_over(board: &Board) -> bool {
    board.players.values().filter(|p| p.stack > 0).count() <= 1
}

/// Remove busted players.
#[must_use]
pub fn eliminate(board: &Board) -> Board {
    let mut board = board.clone();
    board.players.retain(|_, p| p.stack > 0);
    for pot in &mut board.pots {
        pot.participants.retain(|id| board.players.contains_key(id));
    }
    if board
        .active_player
        .is_some_and(|id| !board.players.contains_key(&id))
    {
        board.active_player = None;
    }
    board.player_count = board.players.len();
    board
}

/// Award each pot to the strongest participants.
///
/// Pots are settled oldest first and independently of each other. A tied
/// pot is split evenly; the integer-division remainder is not paid out and
/// leaves the table. A pot none of whose participants hold a strength stays
/// where it is.
#[must_use]
pub fn settle_pots<V: Ord>(strengths: &BTreeMap<SeatId, V>, board: &Board) -> Board {
    let mut board = board.clone();
    let Board { pots, players, .. } = &mut board;
    for pot in pots.iter_mut().rev() {
        let contenders: Vec<(&SeatId, &V)> = strengths
            .iter()
            .filter(|(id, _)| pot.participants.contains(*id))
            .collect();
        let Some(best) = contenders.iter().map(|(_, v)| *v).max() else {
            continue;
        };
        let winners: Vec<SeatId> = contenders
            .iter()
            .filter(|(_, v)| *v == best)
            .map(|(id, _)| **id)
            .collect();
        let share = pot.amount / winners.len() as Chips;
        for id in winners {
            players
                .get_mut(&id)
                .unwrap_or_else(|| panic!("seat {id} is not at the table"))
                .stack += share;
        }
        pot.amount = 0;
    }
    board
}

/// Cards each in-hand player can make a hand from: the community cards
/// followed by their hole cards.
#[must_use]
pub fn visible_cards(board: &Board) -> BTreeMap<SeatId, Vec<Card>> {
    board
        .players
        .values()
        .filter(|p| p.in_hand)
        .map(|p| {
            let mut cards = board.community_cards.clone();
            cards.extend_from_slice(&p.hole_cards);
            (p.id, cards)
        })
        .collect()
}

/// Sweep every bet into the pots, opening side pots where in-hand players
/// are all-in for different amounts.
///
/// Each pass takes the smallest bet among in-hand participants of the head
/// pot and moves that much from every bet into it. If in-hand players still
/// have chips bet, a new head pot is opened for the seats with chips left
/// and the pass repeats. Whatever folded players bet above every live bet
/// ends up in the last head pot.
#[must_use]
pub fn build_side_pots(board: &Board) -> Board {
    let mut board = board.clone();
    if board.pots.is_empty() {
        board.pots.push(Pot::new(board.players.keys().copied()));
    }
    let Board { pots, players, .. } = &mut board;

    loop {
        let head = &mut pots[0];
        let Some(level) = players
            .values()
            .filter(|p| p.in_hand && head.participants.contains(&p.id))
            .map(|p| p.bet)
            .min()
        else {
            break;
        };
        for player in players.values_mut() {
            let moved = player.bet.min(level);
            player.bet -= moved;
            head.amount += moved;
        }
        if !players.values().any(|p| p.in_hand && p.bet > 0) {
            break;
        }
        let side = Pot::new(players.values().filter(|p| p.bet > 0).map(|p| p.id));
        pots.insert(0, side);
    }

    let head = &mut pots[0];
    for player in players.values_mut() {
        head.amount += player.bet;
        player.bet = 0;
    }
    board.current_bet = 0;
    board
}

/// Take the acting player's entry and the step counter from `candidate`,
/// everything else from `base`.
///
/// # Panics
///
/// Panics if the acting player is missing from `candidate`.
#[must_use]
pub fn patch_active_player(candidate: &Board, base: &Board) -> Board {
    let mut patched = base.clone();
    patched.steps_in_round = candidate.steps_in_round;
    if let Some(id) = base.active_player {
        patched.players.insert(id, candidate.player(id).clone());
    }
    patched
}

/// Close the current street and open the next one.
#[must_use]
pub fn advance_street(board: &Board, dealer: SeatId) -> Board {
    let mut board = build_side_pots(board);
    board.street = board.street.next();
    board.steps_in_round = 0;
    board.active_player = street_start(&board, dealer);
    board
}

/// Close the hand: sweep the bets, turn every card over, and pay out the
/// pots according to `eval`. Busted players are left seated; see
/// [`eliminate`].
#[must_use]
pub fn showdown<V, F>(board: &Board, eval: F) -> Board
where
    V: Ord,
    F: Fn(&[Card]) -> V,
{
    let mut board = build_side_pots(board);
    board.street = Street::Showdown;
    board.active_player = None;
    board.steps_in_round = 0;
    let strengths: BTreeMap<SeatId, V> = visible_cards(&board)
        .into_iter()
        .map(|(id, cards)| (id, eval(&cards)))
        .collect();
    settle_pots(&strengths, &board)
}

/// The button moves to the next seated player.
#[must_use]
pub fn next_dealer(board: &Board, dealer: SeatId) -> SeatId {
    debug_assert_eq!(board.street, Street::Showdown);
    next_eligible(board, dealer)
}
