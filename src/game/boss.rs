// The boss: a large entity with several lives. Clearing its sequence costs a
// life and sends it back to the top, invulnerable, where it comes back faster
// with a fresh sequence.
use rand::Rng;

use super::Ruleset;
use super::rules_classic::classic;
use crate::gesture::GestureKind;
use crate::sequence::{Sequence, SequenceTarget, generate_sequence};

#[derive(Clone, Debug)]
pub struct Boss {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub speed: f64,
    pub lives: u32,
    pub color: String,
    invincible: bool,
    sequence: Sequence,
}

impl Boss {
    /// Spawn at the top, horizontally between 30% and 70% of the width.
    pub fn spawn<R: Rng>(rng: &mut R, rules: &Ruleset, width: f64) -> Self {
        let x = (rng.random::<f64>() * 0.4 + 0.3) * width;
        let lives = rules.boss_lives;
        let len = rules.boss_sequence.length(lives, rules.boss_lives);
        Self {
            x,
            y: 0.0,
            size: rules.boss_size,
            speed: rules.boss_speed,
            lives,
            color: rules.boss_color.clone(),
            invincible: false,
            sequence: generate_sequence(rng, len),
        }
    }

    /// Place a vulnerable boss with a known sequence and classic stats.
    pub fn with_sequence(x: f64, y: f64, lives: u32, sequence: Sequence) -> Self {
        let rules = classic();
        Self {
            x,
            y,
            size: rules.boss_size,
            speed: rules.boss_speed,
            lives,
            color: rules.boss_color.clone(),
            invincible: false,
            sequence,
        }
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible
    }

    /// Move one tick. While invulnerable the boss climbs back to the top; on
    /// arrival it turns vulnerable again with a new sequence sized for its
    /// remaining lives.
    pub fn update<R: Rng>(&mut self, rng: &mut R, rules: &Ruleset) {
        if !self.invincible {
            self.y += self.speed;
            return;
        }
        self.y -= rules.boss_retreat_speed;
        if self.y <= 0.0 {
            self.invincible = false;
            let len = rules.boss_sequence.length(self.lives, rules.boss_lives);
            self.sequence = generate_sequence(rng, len);
            self.color = rules.boss_color.clone();
            self.size = (self.size - rules.boss_shrink_per_return).max(rules.boss_min_size);
            log::debug!(
                "boss back at the top: lives={} sequence={}",
                self.lives,
                self.sequence
            );
        }
    }

    /// Called after every dispatch. An emptied sequence costs a life; with
    /// lives left the boss becomes invulnerable, otherwise it is defeated.
    pub fn reset_or_defeat(&mut self, rules: &Ruleset) {
        if self.invincible || !self.sequence.is_empty() {
            return;
        }
        self.lives = self.lives.saturating_sub(1);
        self.speed += rules.boss_speed_step;
        if self.lives > 0 {
            self.invincible = true;
            self.color = rules.boss_invulnerable_color.clone();
            log::info!("boss lost a life, {} left", self.lives);
        }
    }
}

impl SequenceTarget for Boss {
    fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    fn sequence_mut(&mut self) -> &mut Sequence {
        &mut self.sequence
    }

    fn is_defeated(&self) -> bool {
        !self.invincible && self.lives < 1
    }

    fn decrement_sequence(&mut self, gesture: GestureKind) -> bool {
        !self.invincible && self.sequence.consume(gesture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn boss(glyphs: &str, lives: u32) -> Boss {
        Boss::with_sequence(100.0, 50.0, lives, Sequence::parse(glyphs).unwrap())
    }

    #[test]
    fn test_last_life_defeats() {
        let rules = Ruleset::default();
        let mut b = boss("V", 1);
        assert!(b.decrement_sequence(GestureKind::VShape));
        b.reset_or_defeat(&rules);
        assert_eq!(b.lives, 0);
        assert!(!b.is_invincible());
        assert!(b.is_defeated());
    }

    #[test]
    fn test_cleared_sequence_with_lives_left_turns_invincible() {
        let rules = Ruleset::default();
        let mut b = boss("Ʌ", 3);
        b.decrement_sequence(GestureKind::InvertedVShape);
        b.reset_or_defeat(&rules);
        assert_eq!(b.lives, 2);
        assert!(b.is_invincible());
        assert!(!b.is_defeated());
        assert_eq!(b.color, rules.boss_invulnerable_color);
        assert_eq!(b.speed, rules.boss_speed + rules.boss_speed_step);

        // A second call while invincible must not cost another life.
        b.reset_or_defeat(&rules);
        assert_eq!(b.lives, 2);
    }

    #[test]
    fn test_non_empty_sequence_keeps_lives() {
        let rules = Ruleset::default();
        let mut b = boss("_|", 3);
        b.decrement_sequence(GestureKind::Horizontal);
        b.reset_or_defeat(&rules);
        assert_eq!(b.lives, 3);
        assert!(!b.is_invincible());
    }

    #[test]
    fn test_invincible_returns_to_top_and_regenerates() {
        let rules = Ruleset::default();
        let mut rng = Pcg32::seed_from_u64(11);
        let mut b = boss("_", 3);
        b.y = 3.0;
        b.decrement_sequence(GestureKind::Horizontal);
        b.reset_or_defeat(&rules);
        assert!(b.is_invincible());

        // Gestures bounce off while invincible.
        assert!(!b.decrement_sequence(GestureKind::Horizontal));

        b.update(&mut rng, &rules);
        assert!(b.is_invincible());
        assert_eq!(b.y, 1.5);
        b.update(&mut rng, &rules);
        assert!(!b.is_invincible());
        // classic: 6 + 2 per remaining life
        assert_eq!(b.sequence().len(), 6 + 2 * 2);
        assert_eq!(b.size, rules.boss_size - rules.boss_shrink_per_return);
        assert_eq!(b.color, rules.boss_color);
    }

    #[test]
    fn test_moves_down_when_vulnerable() {
        let rules = Ruleset::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut b = boss("_", 3);
        b.update(&mut rng, &rules);
        assert_eq!(b.y, 50.0 + rules.boss_speed);
    }

    #[test]
    fn test_spawn_position_and_sequence() {
        let rules = Ruleset::default();
        let mut rng = Pcg32::seed_from_u64(5);
        let b = Boss::spawn(&mut rng, &rules, 1000.0);
        assert!(b.x >= 300.0 && b.x < 700.0);
        assert_eq!(b.lives, 3);
        assert_eq!(b.sequence().len(), 12);
    }
}
