//! Hand evaluation.
//!
//! Hands are ranked by exhaustively scoring every five-card subset of the
//! cards a player can see and keeping the best one.

use std::collections::BTreeMap;

use super::entities::{Card, HandValue, Rank, Value};

/// Indices of the best hands. Ties return every tied index, in order.
#[must_use]
pub fn argmax<T: Ord>(values: &[T]) -> Vec<usize> {
    let Some(best) = values.iter().max() else {
        return Vec::new();
    };
    values
        .iter()
        .enumerate()
        .filter_map(|(i, value)| (value == best).then_some(i))
        .collect()
}

/// Evaluate the best five-card hand within `cards`.
///
/// Hidden cards are ignored. Fewer than five cards are scored as-is, which
/// only matters when a hand ends before the river and a single player is
/// left to collect the pot.
#[must_use]
pub fn eval(cards: &[Card]) -> HandValue {
    let cards: Vec<Card> = cards.iter().copied().filter(|c| !c.is_hidden()).collect();
    if cards.len() <= 5 {
        return score(&cards);
    }
    let mut best: Option<HandValue> = None;
    for_each_five(&cards, &mut |hand: &[Card]| {
        let value = score(hand);
        if best.as_ref().is_none_or(|b| value > *b) {
            best = Some(value);
        }
    });
    best.unwrap_or_else(|| score(&[]))
}

fn for_each_five(cards: &[Card], f: &mut impl FnMut(&[Card])) {
    let n = cards.len();
    let mut hand = [cards[0]; 5];
    for a in 0..n {
        for b in a + 1..n {
            for c in b + 1..n {
                for d in c + 1..n {
                    for e in d + 1..n {
                        hand[0] = cards[a];
                        hand[1] = cards[b];
                        hand[2] = cards[c];
                        hand[3] = cards[d];
                        hand[4] = cards[e];
                        f(&hand);
                    }
                }
            }
        }
    }
}

/// Score at most five cards.
fn score(cards: &[Card]) -> HandValue {
    // Group values by how often they occur, largest groups first, then
    // highest value first.
    let mut counts: BTreeMap<Value, usize> = BTreeMap::new();
    for card in cards {
        *counts.entry(card.0).or_default() += 1;
    }
    let mut groups: Vec<(usize, Value)> = counts.into_iter().map(|(v, n)| (n, v)).collect();
    groups.sort_unstable_by(|a, b| b.cmp(a));
    let values: Vec<Value> = groups.iter().map(|(_, v)| *v).collect();

    let is_flush = cards.len() == 5 && cards.iter().all(|c| c.1 == cards[0].1);
    let straight_high = if cards.len() == 5 && groups.len() == 5 {
        straight_high(&values)
    } else {
        None
    };

    let (rank, values) = match (straight_high, is_flush, groups.as_slice()) {
        (Some(high), true, _) => (Rank::StraightFlush, vec![high]),
        (_, _, [(4, _), ..]) => (Rank::FourOfAKind, values),
        (_, _, [(3, _), (2, _)]) => (Rank::FullHouse, values),
        (_, true, _) => (Rank::Flush, values),
        (Some(high), false, _) => (Rank::Straight, vec![high]),
        (_, _, [(3, _), ..]) => (Rank::ThreeOfAKind, values),
        (_, _, [(2, _), (2, _), ..]) => (Rank::TwoPair, values),
        (_, _, [(2, _), ..]) => (Rank::OnePair, values),
        _ => (Rank::HighCard, values),
    };
    HandValue { rank, values }
}

/// High card of a straight given five distinct values sorted descending.
fn straight_high(values: &[Value]) -> Option<Value> {
    if values.windows(2).all(|w| w[0] == w[1] + 1) {
        return Some(values[0]);
    }
    // The wheel: A-2-3-4-5 plays as five high.
    if values == [14, 5, 4, 3, 2] {
        return Some(5);
    }
    None
}
