//! Symbol sequences shared by every enemy type.
//!
//! A sequence is a FIFO queue: only the front symbol may be matched and
//! consumed, one per landed gesture.

use std::collections::VecDeque;
use std::fmt;

use rand::Rng;

use crate::gesture::GestureKind;

/// Glyphs an entity can demand. Each one is produced by exactly one gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Symbol {
    /// "_" (horizontal stroke)
    Underscore,
    /// "|" (vertical stroke)
    Bar,
    /// "V"
    Vee,
    /// "Ʌ"
    Wedge,
}

impl Symbol {
    pub const ALL: [Symbol; 4] = [Symbol::Underscore, Symbol::Bar, Symbol::Vee, Symbol::Wedge];

    pub fn glyph(self) -> char {
        match self {
            Symbol::Underscore => '_',
            Symbol::Bar => '|',
            Symbol::Vee => 'V',
            Symbol::Wedge => 'Ʌ',
        }
    }

    pub fn from_glyph(c: char) -> Option<Symbol> {
        Symbol::ALL.into_iter().find(|s| s.glyph() == c)
    }
}

/// Ordered queue of symbols still required to defeat an entity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sequence(VecDeque<Symbol>);

impl Sequence {
    /// Parse a glyph string such as `"_|V"`. Unknown characters yield `None`.
    pub fn parse(glyphs: &str) -> Option<Self> {
        glyphs.chars().map(Symbol::from_glyph).collect::<Option<VecDeque<_>>>().map(Sequence)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn front(&self) -> Option<Symbol> {
        self.0.front().copied()
    }

    /// Pop the front symbol if it is the one `gesture` produces.
    pub fn consume(&mut self, gesture: GestureKind) -> bool {
        if self.front() == Some(gesture.symbol()) {
            self.0.pop_front();
            true
        } else {
            false
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.0.iter().copied()
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for s in &self.0 {
            write!(f, "{}", s.glyph())?;
        }
        Ok(())
    }
}

/// Draw `length` symbols independently and uniformly from the alphabet.
pub fn generate_sequence<R: Rng>(rng: &mut R, length: usize) -> Sequence {
    Sequence(
        (0..length)
            .map(|_| Symbol::ALL[rng.random_range(0..Symbol::ALL.len())])
            .collect(),
    )
}

/// Anything that can be worn down by matching gestures.
pub trait SequenceTarget {
    fn sequence(&self) -> &Sequence;
    fn sequence_mut(&mut self) -> &mut Sequence;
    fn is_defeated(&self) -> bool;

    /// Consume the front symbol if `gesture` matches it. Mismatches are
    /// ignored; nothing is ever removed from anywhere but the front.
    fn decrement_sequence(&mut self, gesture: GestureKind) -> bool {
        self.sequence_mut().consume(gesture)
    }
}
