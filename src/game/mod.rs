//! Game session, rulesets and the browser glue that drives them.
//!
//! [`Session`] owns everything a run needs (boss, ghosts, counters, RNG, the
//! stroke in progress) and exposes the operations the host calls: one
//! [`Session::tick`] per animation frame, pointer events, and a click that
//! restarts the run once the end screen has been up long enough. It has no
//! browser dependencies so it can be driven from native tests.
//!
//! `start_game_mode()` wires a session to a canvas: it installs the mouse
//! listeners and the `requestAnimationFrame` loop and keeps the session in a
//! thread-local.
use std::cell::RefCell;
use std::rc::Rc;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, window};

use crate::gesture::{GestureKind, Point, StrokeRecorder};
use crate::sequence::SequenceTarget;

mod boss;
mod enemy;
mod rules_classic;
mod rules_gauntlet;
pub mod surface;

pub use boss::Boss;
pub use enemy::Enemy;
pub use surface::{CanvasSurface, Surface, TextAlign, render_session};

/// Time the end screen stays up before a click may restart the run.
pub const RESTART_DELAY_MS: f64 = 1000.0;

const CANVAS_ID: &str = "gs-canvas";
const CANVAS_WIDTH: u32 = 600;
const CANVAS_HEIGHT: u32 = 800;

// --- Rulesets -----------------------------------------------------------------

/// How a ghost's sequence length and speed are rolled at spawn.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EnemySequenceRule {
    /// Length uniform in `min_len..=max_len`; every symbol slows the ghost
    /// down by `slowdown_per_symbol`.
    RandomThenSlow {
        min_len: usize,
        max_len: usize,
        slowdown_per_symbol: f64,
    },
    /// Speed is rolled first; length is `ceil(numerator / speed)` clamped to
    /// `1..=max_len`, so slow ghosts carry longer sequences.
    InverseSpeed { numerator: f64, max_len: usize },
}

impl EnemySequenceRule {
    /// Roll `(sequence length, speed)` for a new ghost.
    pub fn roll<R: Rng>(&self, rng: &mut R) -> (usize, f64) {
        let base_speed = 0.6 + rng.random::<f64>() * 0.8;
        match *self {
            EnemySequenceRule::RandomThenSlow {
                min_len,
                max_len,
                slowdown_per_symbol,
            } => {
                let len = rng.random_range(min_len..=max_len.max(min_len));
                (len, base_speed - len as f64 * slowdown_per_symbol)
            }
            EnemySequenceRule::InverseSpeed { numerator, max_len } => {
                let len = (numerator / base_speed).ceil().max(1.0) as usize;
                (len.min(max_len.max(1)), base_speed)
            }
        }
    }
}

/// How long the boss sequence is for a given number of remaining lives.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BossSequenceRule {
    /// `base + lives * per_life`: the boss gets easier as it weakens.
    PerLifeRemaining { base: usize, per_life: usize },
    /// `base + (lives lost + 1) * per_life`: every retreat makes it longer.
    PerLifeLost { base: usize, per_life: usize },
}

impl BossSequenceRule {
    pub fn length(&self, lives: u32, max_lives: u32) -> usize {
        match *self {
            BossSequenceRule::PerLifeRemaining { base, per_life } => {
                base + lives as usize * per_life
            }
            BossSequenceRule::PerLifeLost { base, per_life } => {
                let lost = max_lives.saturating_sub(lives) as usize;
                base + (lost + 1) * per_life
            }
        }
    }
}

/// Everything that differs between game variants.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Ruleset {
    pub name: String,
    /// Ghosts that must be cleared (in addition to the boss) to win.
    pub scoring_target: u32,
    /// Per-tick probability of a new ghost.
    pub spawn_chance: f64,
    pub enemy_size: f64,
    pub enemy_color: String,
    pub enemy_sequence: EnemySequenceRule,
    pub boss_lives: u32,
    pub boss_size: f64,
    pub boss_min_size: f64,
    pub boss_speed: f64,
    /// Added to the boss speed each time it loses a life.
    pub boss_speed_step: f64,
    /// Upward speed while invulnerable.
    pub boss_retreat_speed: f64,
    pub boss_shrink_per_return: f64,
    pub boss_color: String,
    pub boss_invulnerable_color: String,
    pub boss_sequence: BossSequenceRule,
    /// Ghosts drift back up once the boss has no lives left.
    pub enemies_retreat_when_boss_exhausted: bool,
}

impl Ruleset {
    /// Check that the ruleset can only produce non-empty sequences, a boss
    /// with lives, and finite non-negative speeds and sizes.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.spawn_chance) {
            return Err(format!("spawn_chance {} outside 0..=1", self.spawn_chance));
        }
        if self.boss_lives == 0 {
            return Err("boss_lives must be at least 1".to_string());
        }
        match self.enemy_sequence {
            EnemySequenceRule::RandomThenSlow {
                min_len,
                max_len,
                slowdown_per_symbol,
            } => {
                if min_len == 0 || max_len < min_len {
                    return Err(format!(
                        "enemy sequence length {}..={} is empty or zero",
                        min_len, max_len
                    ));
                }
                if !slowdown_per_symbol.is_finite() || slowdown_per_symbol < 0.0 {
                    return Err(format!(
                        "slowdown_per_symbol {} must be finite and >= 0",
                        slowdown_per_symbol
                    ));
                }
                // Slowest roll: base speed 0.6 with the longest sequence.
                if 0.6 - max_len as f64 * slowdown_per_symbol <= 0.0 {
                    return Err("ghosts with the longest sequence would not move".to_string());
                }
            }
            EnemySequenceRule::InverseSpeed { numerator, max_len } => {
                if !numerator.is_finite() || numerator <= 0.0 {
                    return Err(format!("numerator {} must be finite and > 0", numerator));
                }
                if max_len == 0 {
                    return Err("enemy max_len must be at least 1".to_string());
                }
            }
        }
        if let Some(lives) =
            (1..=self.boss_lives).find(|&l| self.boss_sequence.length(l, self.boss_lives) == 0)
        {
            return Err(format!("boss sequence is empty with {} lives left", lives));
        }
        let measures = [
            ("enemy_size", self.enemy_size),
            ("boss_size", self.boss_size),
            ("boss_min_size", self.boss_min_size),
            ("boss_speed", self.boss_speed),
            ("boss_speed_step", self.boss_speed_step),
            ("boss_retreat_speed", self.boss_retreat_speed),
            ("boss_shrink_per_return", self.boss_shrink_per_return),
        ];
        if let Some((name, v)) = measures.iter().find(|(_, v)| !v.is_finite() || *v < 0.0) {
            return Err(format!("{} {} must be finite and >= 0", name, v));
        }
        if self.boss_min_size > self.boss_size {
            return Err(format!(
                "boss_min_size {} larger than boss_size {}",
                self.boss_min_size, self.boss_size
            ));
        }
        if self.boss_retreat_speed == 0.0 {
            return Err("boss_retreat_speed must be > 0".to_string());
        }
        Ok(())
    }
}

impl Default for Ruleset {
    fn default() -> Self {
        rules_classic::classic().clone()
    }
}

/// All built-in rulesets, classic first.
pub fn rulesets() -> &'static [&'static Ruleset] {
    use std::sync::OnceLock;
    static RULESETS: OnceLock<&'static [&'static Ruleset]> = OnceLock::new();
    RULESETS.get_or_init(|| {
        Box::leak(vec![rules_classic::classic(), rules_gauntlet::gauntlet()].into_boxed_slice())
    })
}

pub fn ruleset(name: &str) -> Option<&'static Ruleset> {
    rulesets().iter().copied().find(|r| r.name == name)
}

// --- Session ------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Running,
    Won,
    Lost,
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        self != GameStatus::Running
    }
}

/// One run of the game, from first frame to restart.
pub struct Session {
    rules: Ruleset,
    width: f64,
    height: f64,
    rng: Pcg32,
    status: GameStatus,
    enemies: Vec<Enemy>,
    boss: Option<Boss>,
    // Sticky: set once the boss has been removed as defeated.
    boss_defeated: bool,
    defeated: u32,
    ended_at_ms: Option<f64>,
    stroke: StrokeRecorder,
}

impl Session {
    pub fn new(rules: Ruleset, width: f64, height: f64, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let boss = Boss::spawn(&mut rng, &rules, width);
        log::info!(
            "session started: ruleset={} size={}x{} seed={}",
            rules.name,
            width,
            height,
            seed
        );
        Self {
            rules,
            width,
            height,
            rng,
            status: GameStatus::Running,
            enemies: Vec::new(),
            boss: Some(boss),
            boss_defeated: false,
            defeated: 0,
            ended_at_ms: None,
            stroke: StrokeRecorder::new(),
        }
    }

    /// Reinitialize in place: same ruleset and playfield, fresh everything else.
    pub fn reset(&mut self, seed: u64) {
        *self = Session::new(self.rules.clone(), self.width, self.height, seed);
    }

    pub fn rules(&self) -> &Ruleset {
        &self.rules
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn defeated(&self) -> u32 {
        self.defeated
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn boss(&self) -> Option<&Boss> {
        self.boss.as_ref()
    }

    pub fn set_boss(&mut self, boss: Option<Boss>) {
        self.boss = boss;
    }

    pub fn add_enemy(&mut self, enemy: Enemy) {
        self.enemies.push(enemy);
    }

    pub fn stroke(&self) -> &StrokeRecorder {
        &self.stroke
    }

    fn boss_exhausted(&self) -> bool {
        self.boss
            .as_ref()
            .map_or(self.boss_defeated, |b| b.lives == 0)
    }

    /// Advance one animation frame: move everything, maybe spawn a ghost,
    /// then check for the end of the run.
    pub fn tick(&mut self, now_ms: f64) {
        if self.status.is_terminal() {
            return;
        }

        if let Some(boss) = self.boss.as_mut() {
            boss.update(&mut self.rng, &self.rules);
        }
        let retreat = self.rules.enemies_retreat_when_boss_exhausted && self.boss_exhausted();
        for enemy in &mut self.enemies {
            enemy.update(retreat);
        }

        if self.rng.random::<f64>() < self.rules.spawn_chance {
            let enemy = Enemy::spawn(&mut self.rng, &self.rules, self.width);
            log::debug!(
                "ghost spawned at x={:.0} sequence={}",
                enemy.x,
                enemy.sequence()
            );
            self.enemies.push(enemy);
        }

        let breached = self.boss.iter().any(|b| b.y > self.height)
            || self.enemies.iter().any(|e| e.y > self.height);
        if breached {
            self.end(GameStatus::Lost, now_ms);
        } else if self.defeated >= self.rules.scoring_target && self.boss.is_none() {
            self.end(GameStatus::Won, now_ms);
        }
    }

    fn end(&mut self, status: GameStatus, now_ms: f64) {
        self.status = status;
        self.ended_at_ms = Some(now_ms);
        self.stroke.cancel();
        log::info!("run ended: {:?}, ghosts eliminated: {}", status, self.defeated);
    }

    /// Broadcast a gesture to the boss and every ghost. Returns how many
    /// entities had a symbol consumed.
    pub fn dispatch(&mut self, gesture: GestureKind) -> usize {
        if self.status.is_terminal() {
            return 0;
        }
        let mut hits = 0;

        let mut boss_down = false;
        if let Some(boss) = self.boss.as_mut() {
            if boss.decrement_sequence(gesture) {
                hits += 1;
            }
            boss.reset_or_defeat(&self.rules);
            boss_down = boss.is_defeated();
        }
        if boss_down {
            self.boss = None;
            self.boss_defeated = true;
            log::info!("boss defeated");
        }

        let before = self.enemies.len();
        self.enemies.retain_mut(|enemy| {
            if enemy.decrement_sequence(gesture) {
                hits += 1;
            }
            !enemy.is_defeated()
        });
        self.defeated += (before - self.enemies.len()) as u32;

        log::debug!(
            "gesture {} landed on {} target(s), {} ghosts eliminated",
            gesture.as_str(),
            hits,
            self.defeated
        );
        hits
    }

    /// Pointer-down. Ignored once the run is over.
    pub fn pointer_down(&mut self, p: Point) {
        if !self.status.is_terminal() {
            self.stroke.begin(p);
        }
    }

    pub fn pointer_move(&mut self, p: Point) {
        self.stroke.extend(p);
    }

    /// Pointer-up: classify the stroke and dispatch it. Short strokes are
    /// dropped without touching the session.
    pub fn pointer_up(&mut self) -> Option<GestureKind> {
        let gesture = self.stroke.finish()?;
        self.dispatch(gesture);
        Some(gesture)
    }

    /// True once the run has ended and the end screen has been shown for
    /// [`RESTART_DELAY_MS`].
    pub fn restart_armed(&self, now_ms: f64) -> bool {
        self.ended_at_ms
            .is_some_and(|t| now_ms - t >= RESTART_DELAY_MS)
    }

    /// Click: restart if armed. Returns whether a restart happened.
    pub fn click(&mut self, now_ms: f64, seed: u64) -> bool {
        if !self.restart_armed(now_ms) {
            return false;
        }
        self.reset(seed);
        true
    }
}

// --- Browser glue -------------------------------------------------------------

struct WebGame {
    session: Session,
    surface: CanvasSurface,
}

thread_local! {
    static GAME: RefCell<Option<WebGame>> = const { RefCell::new(None) };
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn now_ms() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

fn fresh_seed() -> u64 {
    ((now_ms() * 1000.0) as u64) ^ 0x9E37_79B9_7F4A_7C15
}

fn with_game<F: FnOnce(&mut WebGame)>(f: F) {
    GAME.with(|cell| {
        if let Some(game) = cell.borrow_mut().as_mut() {
            f(game);
        }
    });
}

fn event_point(evt: &MouseEvent) -> Point {
    Point::new(evt.offset_x() as f64, evt.offset_y() as f64)
}

fn listen<F>(canvas: &HtmlCanvasElement, event: &str, handler: F) -> Result<(), JsValue>
where
    F: FnMut(MouseEvent) + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(MouseEvent)>);
    canvas.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Attach a session with `rules` to the game canvas (created on first call)
/// and start the frame loop. Calling again replaces the running session.
pub fn start_game_mode(rules: Ruleset) -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let canvas: HtmlCanvasElement = if let Some(el) = doc.get_element_by_id(CANVAS_ID) {
        el.dyn_into()?
    } else {
        let c: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
        c.set_id(CANVAS_ID);
        c.set_width(CANVAS_WIDTH);
        c.set_height(CANVAS_HEIGHT);
        c.set_attribute("style", "position:fixed; left:50%; top:50%; transform:translate(-50%,-50%); border:2px solid #222; background:#181818; cursor:crosshair;").ok();
        doc.body()
            .ok_or_else(|| JsValue::from_str("no body"))?
            .append_child(&c)?;
        c
    };
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;

    let session = Session::new(
        rules,
        canvas.width() as f64,
        canvas.height() as f64,
        fresh_seed(),
    );
    let already_running = GAME.with(|cell| {
        cell.borrow_mut()
            .replace(WebGame {
                session,
                surface: CanvasSurface::new(ctx),
            })
            .is_some()
    });
    if already_running {
        return Ok(());
    }

    listen(&canvas, "mousedown", |evt| {
        with_game(|g| g.session.pointer_down(event_point(&evt)));
    })?;
    listen(&canvas, "mousemove", |evt| {
        with_game(|g| g.session.pointer_move(event_point(&evt)));
    })?;
    listen(&canvas, "mouseup", |_evt| {
        with_game(|g| {
            g.session.pointer_up();
        });
    })?;
    listen(&canvas, "mouseleave", |_evt| {
        with_game(|g| {
            g.session.pointer_up();
        });
    })?;
    listen(&canvas, "click", |_evt| {
        with_game(|g| {
            if g.session.click(now_ms(), fresh_seed()) {
                log::info!("restarting run");
            }
        });
    })?;

    start_game_loop();
    Ok(())
}

fn start_game_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        with_game(|game| {
            game.session.tick(ts);
            render_session(&game.session, &mut game.surface, ts);
        });
        if let (Some(w), Some(cb)) = (window(), f.borrow().as_ref()) {
            let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let (Some(w), Some(cb)) = (window(), g.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
