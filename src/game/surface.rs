//! Drawing target abstraction and the per-frame scene.
//!
//! The game only ever needs a full clear, filled rectangles and single-line
//! text, so that is all [`Surface`] asks for. [`CanvasSurface`] maps it onto a
//! 2D canvas context; tests use a recording implementation.
use web_sys::CanvasRenderingContext2d;

use super::{GameStatus, Session};
use crate::sequence::SequenceTarget;

const TEXT_COLOR: &str = "white";
const TRAIL_COLOR: &str = "#FFD166";
const TRAIL_DOT: f64 = 3.0;
const FONT_FAMILY: &str = "Arial";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

impl TextAlign {
    fn as_css(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
        }
    }
}

pub trait Surface {
    fn clear(&mut self, width: f64, height: f64);
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str);
    fn fill_text(&mut self, text: &str, x: f64, y: f64, font_px: u32, align: TextAlign, color: &str);
}

pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self, width: f64, height: f64) {
        self.ctx.clear_rect(0.0, 0.0, width, height);
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(x, y, w, h);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, font_px: u32, align: TextAlign, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.set_font(&format!("{}px {}", font_px, FONT_FAMILY));
        self.ctx.set_text_align(align.as_css());
        self.ctx.fill_text(text, x, y).ok();
    }
}

/// Draw one frame: the playfield while running, the end screen afterwards.
pub fn render_session<S: Surface>(session: &Session, surface: &mut S, now_ms: f64) {
    let (w, h) = (session.width(), session.height());
    surface.clear(w, h);

    if session.status().is_terminal() {
        draw_outcome(session, surface, now_ms);
        return;
    }

    if let Some(boss) = session.boss() {
        surface.fill_rect(boss.x, boss.y, boss.size, boss.size, &boss.color);
        let cx = boss.x + boss.size / 2.0;
        surface.fill_text(
            &boss.sequence().to_string(),
            cx,
            boss.y - 10.0,
            16,
            TextAlign::Center,
            TEXT_COLOR,
        );
        surface.fill_text(
            "Angry boss",
            cx,
            boss.y + boss.size + 15.0,
            12,
            TextAlign::Center,
            TEXT_COLOR,
        );
    }

    for enemy in session.enemies() {
        surface.fill_rect(enemy.x, enemy.y, enemy.size, enemy.size, &enemy.color);
        surface.fill_text(
            &enemy.sequence().to_string(),
            enemy.x + enemy.size / 2.0,
            enemy.y - 10.0,
            16,
            TextAlign::Center,
            TEXT_COLOR,
        );
    }

    for p in session.stroke().points() {
        surface.fill_rect(
            p.x - TRAIL_DOT / 2.0,
            p.y - TRAIL_DOT / 2.0,
            TRAIL_DOT,
            TRAIL_DOT,
            TRAIL_COLOR,
        );
    }

    surface.fill_text(
        &counter_text(session),
        10.0,
        h - 20.0,
        15,
        TextAlign::Left,
        TEXT_COLOR,
    );
}

fn counter_text(session: &Session) -> String {
    format!("Ghost Eliminated : {}", session.defeated())
}

fn draw_outcome<S: Surface>(session: &Session, surface: &mut S, now_ms: f64) {
    let cx = session.width() / 2.0;
    let cy = session.height() / 2.0;
    let title = match session.status() {
        GameStatus::Won => "You Win!",
        _ => "Game Over",
    };
    surface.fill_text(title, cx, cy - 50.0, 48, TextAlign::Center, TEXT_COLOR);
    surface.fill_text(&counter_text(session), cx, cy - 20.0, 24, TextAlign::Center, TEXT_COLOR);
    if session.restart_armed(now_ms) {
        surface.fill_text(
            "- Click to restart game -",
            cx,
            cy + 10.0,
            12,
            TextAlign::Center,
            TEXT_COLOR,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Enemy, Ruleset};
    use crate::gesture::Point;
    use crate::sequence::Sequence;

    #[derive(Debug, PartialEq)]
    enum Call {
        Clear,
        Rect(String),
        Text(String, u32, TextAlign),
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl Surface for Recorder {
        fn clear(&mut self, _width: f64, _height: f64) {
            self.calls.push(Call::Clear);
        }
        fn fill_rect(&mut self, _x: f64, _y: f64, _w: f64, _h: f64, color: &str) {
            self.calls.push(Call::Rect(color.to_string()));
        }
        fn fill_text(&mut self, text: &str, _x: f64, _y: f64, font_px: u32, align: TextAlign, _color: &str) {
            self.calls.push(Call::Text(text.to_string(), font_px, align));
        }
    }

    impl Recorder {
        fn texts(&self) -> Vec<&str> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Text(t, _, _) => Some(t.as_str()),
                    _ => None,
                })
                .collect()
        }
    }

    fn quiet() -> Ruleset {
        Ruleset {
            spawn_chance: 0.0,
            ..Ruleset::default()
        }
    }

    #[test]
    fn test_running_frame_layout() {
        let mut s = Session::new(quiet(), 600.0, 800.0, 9);
        s.add_enemy(Enemy::with_sequence(5.0, 40.0, 1.0, Sequence::parse("V_").unwrap()));
        let mut rec = Recorder::default();
        render_session(&s, &mut rec, 0.0);

        assert_eq!(rec.calls[0], Call::Clear);
        let texts = rec.texts();
        assert!(texts.contains(&"Angry boss"));
        assert!(texts.contains(&"V_"));
        assert_eq!(texts.last(), Some(&"Ghost Eliminated : 0"));
        assert!(rec.calls.contains(&Call::Rect("#FF4500".to_string())));
        assert!(rec.calls.contains(&Call::Rect("#AAA".to_string())));
        assert!(matches!(rec.calls.last(), Some(Call::Text(_, 15, TextAlign::Left))));
    }

    #[test]
    fn test_stroke_trail_is_drawn() {
        let mut s = Session::new(quiet(), 600.0, 800.0, 9);
        s.set_boss(None);
        s.pointer_down(Point::new(0.0, 0.0));
        s.pointer_move(Point::new(5.0, 5.0));
        let mut rec = Recorder::default();
        render_session(&s, &mut rec, 0.0);
        let trail = rec
            .calls
            .iter()
            .filter(|c| **c == Call::Rect(TRAIL_COLOR.to_string()))
            .count();
        assert_eq!(trail, 2);
    }

    #[test]
    fn test_end_screen_hint_appears_after_delay() {
        let mut s = Session::new(quiet(), 600.0, 800.0, 9);
        s.add_enemy(Enemy::with_sequence(5.0, 850.0, 1.0, Sequence::parse("V").unwrap()));
        s.tick(1_000.0);

        let mut rec = Recorder::default();
        render_session(&s, &mut rec, 1_200.0);
        assert_eq!(rec.texts(), vec!["Game Over", "Ghost Eliminated : 0"]);

        let mut rec = Recorder::default();
        render_session(&s, &mut rec, 2_000.0);
        assert_eq!(
            rec.texts(),
            vec!["Game Over", "Ghost Eliminated : 0", "- Click to restart game -"]
        );
    }

    #[test]
    fn test_win_title() {
        let mut s = Session::new(quiet(), 600.0, 800.0, 9);
        s.set_boss(None);
        s.tick(0.0);
        let mut rec = Recorder::default();
        render_session(&s, &mut rec, 0.0);
        assert_eq!(rec.texts()[0], "You Win!");
    }
}
