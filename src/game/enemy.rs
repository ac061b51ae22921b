// Falling ghosts. Each carries a short sequence and is removed by the session
// as soon as that sequence is empty.
use rand::Rng;

use super::Ruleset;
use super::rules_classic::classic;
use crate::sequence::{Sequence, SequenceTarget, generate_sequence};

#[derive(Clone, Debug)]
pub struct Enemy {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    /// Vertical speed in surface units per tick.
    pub speed: f64,
    pub color: String,
    sequence: Sequence,
}

impl Enemy {
    /// Spawn at the top edge at a random column, with sequence length and
    /// speed rolled from the ruleset.
    pub fn spawn<R: Rng>(rng: &mut R, rules: &Ruleset, width: f64) -> Self {
        let size = rules.enemy_size;
        let x = rng.random::<f64>() * (width - size).max(0.0);
        let (len, speed) = rules.enemy_sequence.roll(rng);
        Self {
            x,
            y: 0.0,
            size,
            speed,
            color: rules.enemy_color.clone(),
            sequence: generate_sequence(rng, len),
        }
    }

    /// Place a ghost with a known sequence, classic size and color.
    pub fn with_sequence(x: f64, y: f64, speed: f64, sequence: Sequence) -> Self {
        let rules = classic();
        Self {
            x,
            y,
            size: rules.enemy_size,
            speed,
            color: rules.enemy_color.clone(),
            sequence,
        }
    }

    /// Move one tick. `retreat` flips the direction (ghosts flee once the boss
    /// is out of lives, if the ruleset asks for it).
    pub fn update(&mut self, retreat: bool) {
        if retreat {
            self.y -= self.speed;
        } else {
            self.y += self.speed;
        }
    }
}

impl SequenceTarget for Enemy {
    fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    fn sequence_mut(&mut self) -> &mut Sequence {
        &mut self.sequence
    }

    fn is_defeated(&self) -> bool {
        self.sequence.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::GestureKind;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn enemy(glyphs: &str) -> Enemy {
        Enemy::with_sequence(10.0, 0.0, 1.0, Sequence::parse(glyphs).unwrap())
    }

    #[test]
    fn test_matching_order_defeats() {
        let mut e = enemy("_|");
        assert!(e.decrement_sequence(GestureKind::Horizontal));
        assert!(!e.is_defeated());
        assert!(e.decrement_sequence(GestureKind::Vertical));
        assert!(e.is_defeated());
    }

    #[test]
    fn test_wrong_first_gesture_is_ignored() {
        let mut e = enemy("_|");
        assert!(!e.decrement_sequence(GestureKind::Vertical));
        assert_eq!(e.sequence().to_string(), "_|");
    }

    #[test]
    fn test_update_direction() {
        let mut e = enemy("V");
        e.update(false);
        assert_eq!(e.y, 1.0);
        e.update(true);
        e.update(true);
        assert_eq!(e.y, -1.0);
    }

    #[test]
    fn test_spawn_within_bounds() {
        let rules = Ruleset::default();
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..200 {
            let e = Enemy::spawn(&mut rng, &rules, 400.0);
            assert!(e.x >= 0.0 && e.x < 400.0 - e.size);
            assert_eq!(e.y, 0.0);
            assert!((1..=5).contains(&e.sequence().len()));
            assert!(e.speed > 0.0);
        }
    }
}
