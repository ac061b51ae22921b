// Gauntlet ruleset: a ghost quota must be met on top of beating the boss.
// Slow ghosts carry longer sequences and the boss sequence grows with every
// life it loses. The boss keeps its size and glows gold while invulnerable.
use super::{BossSequenceRule, EnemySequenceRule, Ruleset};
use std::sync::OnceLock;

pub fn gauntlet() -> &'static Ruleset {
    static RS: OnceLock<Ruleset> = OnceLock::new();
    RS.get_or_init(|| Ruleset {
        name: "gauntlet".to_string(),
        scoring_target: 20,
        spawn_chance: 0.02,
        enemy_size: 25.0,
        enemy_color: "#AAA".to_string(),
        enemy_sequence: EnemySequenceRule::InverseSpeed {
            numerator: 2.4,
            max_len: 5,
        },
        boss_lives: 3,
        boss_size: 100.0,
        boss_min_size: 100.0,
        boss_speed: 0.25,
        boss_speed_step: 0.25,
        boss_retreat_speed: 1.5,
        boss_shrink_per_return: 0.0,
        boss_color: "#FF4500".to_string(),
        boss_invulnerable_color: "#FFD700".to_string(),
        boss_sequence: BossSequenceRule::PerLifeLost { base: 4, per_life: 2 },
        enemies_retreat_when_boss_exhausted: false,
    })
}
