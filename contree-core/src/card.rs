/// Represents the four suits of the 32-card contrée deck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Suit {
    Hearts = 0,
    Diamonds = 1,
    Clubs = 2,
    Spades = 3,
}

impl Suit {
    /// All suits in encoding order
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

    /// Convert from numeric index (0-3)
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Suit::Hearts),
            1 => Some(Suit::Diamonds),
            2 => Some(Suit::Clubs),
            3 => Some(Suit::Spades),
            _ => None,
        }
    }

    /// Get the suit as a single character (H, D, C, S)
    pub fn to_char(&self) -> char {
        match self {
            Suit::Hearts => 'H',
            Suit::Diamonds => 'D',
            Suit::Clubs => 'C',
            Suit::Spades => 'S',
        }
    }
}

/// Represents card ranks from 7 to Ace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Rank {
    Seven = 0,
    Eight = 1,
    Nine = 2,
    Ten = 3,
    Jack = 4,
    Queen = 5,
    King = 6,
    Ace = 7,
}

impl Rank {
    /// All ranks in encoding order
    pub const ALL: [Rank; 8] = [
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// Convert from numeric index (0-7)
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Rank::Seven),
            1 => Some(Rank::Eight),
            2 => Some(Rank::Nine),
            3 => Some(Rank::Ten),
            4 => Some(Rank::Jack),
            5 => Some(Rank::Queen),
            6 => Some(Rank::King),
            7 => Some(Rank::Ace),
            _ => None,
        }
    }

    /// Get the rank as a short string (7-9, 10, J, Q, K, A)
    pub fn to_str(&self) -> &'static str {
        match self {
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        }
    }
}

/// Trick-taking strength inside the trump suit, indexed by rank.
/// Order: J > 9 > A > 10 > K > Q > 8 > 7.
const STRENGTH_TRUMP: [i32; 8] = [50, 60, 150, 90, 200, 70, 80, 100];

/// Trick-taking strength outside the trump suit, indexed by rank.
/// Order: A > 10 > K > Q > J > 9 > 8 > 7.
const STRENGTH_PLAIN: [i32; 8] = [0, 0, 10, 100, 20, 30, 40, 110];

/// Card points inside the trump suit (J 20, 9 14, A 11, 10 10, K 4, Q 3).
const POINTS_TRUMP: [i32; 8] = [0, 0, 14, 10, 20, 3, 4, 11];

/// Card points outside the trump suit (A 11, 10 10, K 4, Q 3, J 2).
const POINTS_PLAIN: [i32; 8] = [0, 0, 0, 10, 2, 3, 4, 11];

/// A single playing card, packed as `id = 8 * suit + rank` in `[0, 32)`.
///
/// The packed identifier is canonical: equality, ordering and hashing all
/// go through it, and it is the on-disk encoding of the dataset schemas.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Card(u8);

impl Card {
    /// Number of distinct cards in the deck
    pub const COUNT: u8 = 32;

    /// Create a card from suit and rank
    pub fn new(suit: Suit, rank: Rank) -> Self {
        Card(suit as u8 * 8 + rank as u8)
    }

    /// Create a card from a packed index (0-31)
    pub fn from_index(index: u8) -> Option<Self> {
        if index < Self::COUNT {
            Some(Card(index))
        } else {
            None
        }
    }

    /// Get the packed index (0-31)
    #[inline]
    pub fn index(&self) -> u8 {
        self.0
    }

    #[inline]
    pub fn suit(&self) -> Suit {
        // Packed ids are always in range, so the unwrap cannot fire
        Suit::from_index(self.0 / 8).unwrap()
    }

    #[inline]
    pub fn rank(&self) -> Rank {
        Rank::from_index(self.0 % 8).unwrap()
    }

    /// Trick-taking strength of this card under the given trump suit.
    ///
    /// Only meaningful when comparing two cards of the same comparison
    /// suit; a trump always beats a non-trump regardless of strength.
    #[inline]
    pub fn strength(&self, trump: Suit) -> i32 {
        if self.suit() == trump {
            STRENGTH_TRUMP[(self.0 % 8) as usize]
        } else {
            STRENGTH_PLAIN[(self.0 % 8) as usize]
        }
    }

    /// Point value of this card under the given trump suit.
    #[inline]
    pub fn points(&self, trump: Suit) -> i32 {
        if self.suit() == trump {
            POINTS_TRUMP[(self.0 % 8) as usize]
        } else {
            POINTS_PLAIN[(self.0 % 8) as usize]
        }
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.rank().to_str(), self.suit().to_char())
    }
}

impl std::fmt::Debug for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}
