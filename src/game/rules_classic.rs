// Classic ruleset: ghosts only keep the player busy, the run is decided by
// the boss. The boss shrinks every time it retreats.
use super::{BossSequenceRule, EnemySequenceRule, Ruleset};
use std::sync::OnceLock;

pub fn classic() -> &'static Ruleset {
    static RS: OnceLock<Ruleset> = OnceLock::new();
    RS.get_or_init(|| Ruleset {
        name: "classic".to_string(),
        scoring_target: 0,
        spawn_chance: 0.015,
        enemy_size: 25.0,
        enemy_color: "#AAA".to_string(),
        enemy_sequence: EnemySequenceRule::RandomThenSlow {
            min_len: 1,
            max_len: 5,
            slowdown_per_symbol: 0.1,
        },
        boss_lives: 3,
        boss_size: 100.0,
        boss_min_size: 40.0,
        boss_speed: 0.25,
        boss_speed_step: 0.25,
        boss_retreat_speed: 1.5,
        boss_shrink_per_return: 15.0,
        boss_color: "#FF4500".to_string(),
        boss_invulnerable_color: "#888".to_string(),
        boss_sequence: BossSequenceRule::PerLifeRemaining { base: 6, per_life: 2 },
        enemies_retreat_when_boss_exhausted: true,
    })
}
