//! Ghost Strokes core crate.
//!
//! Draw strokes on the canvas to wear down falling ghosts and their boss.
//! Every entity shows a queue of symbols ("_", "|", "V", "Ʌ"); a stroke that
//! classifies as the symbol at the front of a queue consumes it.
//!
//! - `gesture`: stroke recording and classification
//! - `sequence`: symbol queues shared by ghosts and the boss
//! - `game`: rulesets, the session state machine, rendering and browser glue

use wasm_bindgen::prelude::*;

pub mod game;
pub mod gesture;
pub mod sequence;

pub use game::{GameStatus, Ruleset, Session};
pub use gesture::{GestureKind, Point, classify};
pub use sequence::{Sequence, SequenceTarget, Symbol};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    // A second init (e.g. hot reload) reports an error we can ignore.
    let _ = console_log::init_with_level(log::Level::Info);
}

// -----------------------------------------------------------------------------
// JS entrypoints
// -----------------------------------------------------------------------------

/// Start (or restart) with the classic ruleset.
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    game::start_game_mode(Ruleset::default())
}

/// Start with a built-in ruleset by name (`"classic"` or `"gauntlet"`).
#[wasm_bindgen]
pub fn start_game_with_ruleset(name: &str) -> Result<(), JsValue> {
    let rules = game::ruleset(name)
        .ok_or_else(|| JsValue::from_str(&format!("unknown ruleset '{}'", name)))?;
    game::start_game_mode(rules.clone())
}

/// Start with a ruleset given as JSON. Missing fields fall back to classic.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_game_with_config(json: &str) -> Result<(), JsValue> {
    let rules = parse_ruleset(json).map_err(|e| JsValue::from_str(&e))?;
    game::start_game_mode(rules)
}

#[cfg(feature = "serde_json")]
pub fn parse_ruleset(json: &str) -> Result<Ruleset, String> {
    let rules: Ruleset =
        serde_json::from_str(json).map_err(|e| format!("invalid ruleset: {}", e))?;
    rules
        .validate()
        .map_err(|e| format!("invalid ruleset: {}", e))?;
    Ok(rules)
}

/// Names of the built-in rulesets, for menus on the JS side.
#[wasm_bindgen]
pub fn ruleset_names() -> Vec<String> {
    game::rulesets().iter().map(|r| r.name.clone()).collect()
}
