use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Deserializer, Serialize};
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use super::constants;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Suit {
    Club,
    Spade,
    Diamond,
    Heart,
    // Wild is only used for the hidden card marker.
    Wild,
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Club => "♣",
            Self::Spade => "♠",
            Self::Diamond => "♦",
            Self::Heart => "♥",
            Self::Wild => "?",
        };
        write!(f, "{repr}")
    }
}

/// Placeholder for card values.
pub type Value = u8;

/// A card is a tuple of a uInt8 value (2u8 ... ace=14u8) and a suit.
/// A card a viewer isn't allowed to see is depicted as `Card::HIDDEN`.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Card(pub Value, pub Suit);

impl Card {
    pub const HIDDEN: Self = Self(0, Suit::Wild);

    #[must_use]
    pub fn is_hidden(&self) -> bool {
        *self == Self::HIDDEN
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_hidden() {
            return write!(f, "{:>4}", "??");
        }
        let value = match self.0 {
            14 => "A",
            11 => "J",
            12 => "Q",
            13 => "K",
            v => &v.to_string(),
        };
        let repr = format!("{value}/{}", self.1);
        write!(f, "{repr:>4}")
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Rank {
    HighCard,
    OnePair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::HighCard => "high card",
            Self::OnePair => "one pair",
            Self::TwoPair => "two pair",
            Self::ThreeOfAKind => "three of a kind",
            Self::Straight => "straight",
            Self::Flush => "flush",
            Self::FullHouse => "full house",
            Self::FourOfAKind => "four of a kind",
            Self::StraightFlush => "straight flush",
        };
        write!(f, "{repr}")
    }
}

/// Strength of a five-card hand. Ordered by rank first, then by the
/// tie-break values (highest group first).
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct HandValue {
    pub rank: Rank,
    pub values: Vec<Value>,
}

impl fmt::Display for HandValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rank)
    }
}

#[derive(Debug)]
pub struct Deck {
    cards: [Card; 52],
    pub deck_idx: usize,
}

impl Deck {
    pub fn deal_card(&mut self) -> Card {
        let card = self.cards[self.deck_idx];
        self.deck_idx += 1;
        card
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
        self.deck_idx = 0;
    }
}

impl Default for Deck {
    fn default() -> Self {
        let mut cards: [Card; 52] = [Card::HIDDEN; 52];
        for (i, value) in (2u8..=14u8).enumerate() {
            for (j, suit) in [Suit::Club, Suit::Spade, Suit::Diamond, Suit::Heart]
                .into_iter()
                .enumerate()
            {
                cards[4 * i + j] = Card(value, suit);
            }
        }
        Self { cards, deck_idx: 0 }
    }
}

/// Type alias for whole chips. Stacks, bets, and pots are all whole chips.
pub type Chips = u32;

/// Stable seat identifier, assigned in connection order.
pub type SeatId = usize;

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Username(String);

impl Username {
    pub fn new(s: &str) -> Self {
        let username: String = s
            .chars()
            .filter(|c| !c.is_control())
            .map(|c| if c.is_whitespace() { '_' } else { c })
            .take(constants::MAX_NAME_LENGTH)
            .collect();
        Self(username)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<'de> Deserialize<'de> for Username {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::new(&s))
    }
}

impl From<String> for Username {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl From<&str> for Username {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Betting phases of a hand, in the order they're played.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Street {
    PreFlop,
    Flop,
    Turn,
    River,
    Showdown,
}

impl Street {
    /// Number of community cards a viewer may see on this street.
    #[must_use]
    pub const fn community_count(self) -> usize {
        match self {
            Self::PreFlop => 0,
            Self::Flop => 3,
            Self::Turn => 4,
            Self::River | Self::Showdown => 5,
        }
    }

    /// The following street. Showdown is terminal.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::PreFlop => Self::Flop,
            Self::Flop => Self::Turn,
            Self::Turn => Self::River,
            Self::River | Self::Showdown => Self::Showdown,
        }
    }
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::PreFlop => "pre-flop",
            Self::Flop => "flop",
            Self::Turn => "turn",
            Self::River => "river",
            Self::Showdown => "showdown",
        };
        write!(f, "{repr}")
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Blinds {
    pub small: Chips,
    pub big: Chips,
}

impl fmt::Display for Blinds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = format!("{}/{}", self.small, self.big);
        write!(f, "{repr}")
    }
}

/// A seated player.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Player {
    pub id: SeatId,
    /// Chips committed on the current street.
    pub bet: Chips,
    pub hole_cards: [Card; 2],
    pub stack: Chips,
    pub name: Username,
    /// False once the player folded or quit the current hand.
    pub in_hand: bool,
}

impl Player {
    #[must_use]
    pub fn new(id: SeatId, name: Username, stack: Chips) -> Self {
        Self {
            id,
            bet: 0,
            hole_cards: [Card::HIDDEN; 2],
            stack,
            name,
            in_hand: true,
        }
    }

    /// Whether the player can still make betting decisions this hand.
    #[must_use]
    pub fn can_act(&self) -> bool {
        self.in_hand && self.stack > 0
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (seat {}, stack {}, bet {})",
            self.name, self.id, self.stack, self.bet
        )
    }
}

/// A pot and the seats eligible to win it.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Pot {
    pub amount: Chips,
    pub participants: BTreeSet<SeatId>,
}

impl Pot {
    #[must_use]
    pub fn new<I: IntoIterator<Item = SeatId>>(participants: I) -> Self {
        Self {
            amount: 0,
            participants: participants.into_iter().collect(),
        }
    }
}

impl fmt::Display for Pot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} eligible)", self.amount, self.participants.len())
    }
}

/// The complete table state.
///
/// The game loop owns the one canonical `Board`; clients only ever receive
/// per-viewer copies of it.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Board {
    /// All community cards for the hand. Viewer snapshots are truncated
    /// to `street.community_count()`.
    pub community_cards: Vec<Card>,
    pub street: Street,
    /// Seated, non-busted players.
    pub player_count: usize,
    /// Seats at table creation. Turn order is computed over this.
    pub seat_count: usize,
    pub active_player: Option<SeatId>,
    /// Whether the viewer of this snapshot must act.
    pub need_action: bool,
    /// Whether the viewer should pause on this snapshot and acknowledge it.
    pub need_prompt: bool,
    /// Informational copy of the highest bet on the street.
    pub current_bet: Chips,
    /// Actions taken this street by players still able to act.
    pub steps_in_round: usize,
    /// Most recently opened pot first.
    pub pots: Vec<Pot>,
    /// Advisory countdown for the active player, in seconds.
    pub timer: u32,
    pub players: BTreeMap<SeatId, Player>,
    pub blinds: Blinds,
    pub hand_number: u32,
}

impl Board {
    /// Seat a fresh table. Players get ids in the order of `names` and all
    /// start with the same stack. No cards are dealt yet.
    #[must_use]
    pub fn seat_players(
        names: Vec<Username>,
        starting_stack: Chips,
        blinds: Blinds,
        timer: u32,
    ) -> Self {
        let players: BTreeMap<SeatId, Player> = names
            .into_iter()
            .enumerate()
            .map(|(id, name)| (id, Player::new(id, name, starting_stack)))
            .collect();
        Self {
            community_cards: Vec::with_capacity(constants::NUM_COMMUNITY_CARDS),
            street: Street::PreFlop,
            player_count: players.len(),
            seat_count: players.len(),
            active_player: None,
            need_action: false,
            need_prompt: false,
            current_bet: 0,
            steps_in_round: 0,
            pots: vec![Pot::new(players.keys().copied())],
            timer,
            players,
            blinds,
            hand_number: 0,
        }
    }

    /// Look up a seated player.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not seated; callers only pass ids taken from the
    /// board itself.
    #[must_use]
    pub fn player(&self, id: SeatId) -> &Player {
        self.players
            .get(&id)
            .unwrap_or_else(|| panic!("seat {id} is not at the table"))
    }

    /// Mutable variant of [`Board::player`].
    ///
    /// # Panics
    ///
    /// Panics if `id` is not seated.
    pub fn player_mut(&mut self, id: SeatId) -> &mut Player {
        self.players
            .get_mut(&id)
            .unwrap_or_else(|| panic!("seat {id} is not at the table"))
    }

    /// Sum of every chip on the table.
    #[must_use]
    pub fn total_chips(&self) -> Chips {
        let players: Chips = self.players.values().map(|p| p.stack + p.bet).sum();
        let pots: Chips = self.pots.iter().map(|pot| pot.amount).sum();
        players + pots
    }

    #[must_use]
    pub fn count_in_hand(&self) -> usize {
        self.players.values().filter(|p| p.in_hand).count()
    }

    /// Number of in-hand players that can still make betting decisions.
    #[must_use]
    pub fn count_can_act(&self) -> usize {
        self.players.values().filter(|p| p.can_act()).count()
    }
}

/// A message from a seated client to the table.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum PlayerAction {
    /// Move this many chips from stack to bet. Covers calls and raises.
    Bet(Chips),
    Check,
    Fold,
    /// Acknowledgment of a showdown or game-over snapshot.
    Ok,
    /// Leave the table, forfeiting the remaining stack.
    Quit,
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Bet(amount) => &format!("bets {amount}"),
            Self::Check => "checks",
            Self::Fold => "folds",
            Self::Ok => "acknowledges",
            Self::Quit => "quits",
        };
        write!(f, "{repr}")
    }
}
