//! Stroke recording and gesture classification.
//!
//! A stroke is the list of pointer positions seen between pointer-down and
//! pointer-up. Once finished it is reduced to one of four gestures using only
//! the first, middle and last points, so the classifier is cheap and fully
//! deterministic for a given path.

use crate::sequence::Symbol;

/// Minimum start-to-end distance (surface units) for a stroke to count.
pub const MIN_STROKE_LENGTH: f64 = 50.0;

/// Relative sag / rise of the midpoint (vs. horizontal width) that turns a
/// stroke into a V or Ʌ.
const PEAK_RATIO: f64 = 0.2;

/// Surface-relative pointer position. `y` grows downward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The four strokes the game understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GestureKind {
    Horizontal,
    Vertical,
    VShape,
    InvertedVShape,
}

impl GestureKind {
    /// Symbol an entity must show at the front of its sequence for this
    /// gesture to land.
    pub fn symbol(self) -> Symbol {
        match self {
            GestureKind::Horizontal => Symbol::Underscore,
            GestureKind::Vertical => Symbol::Bar,
            GestureKind::VShape => Symbol::Vee,
            GestureKind::InvertedVShape => Symbol::Wedge,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GestureKind::Horizontal => "horizontal",
            GestureKind::Vertical => "vertical",
            GestureKind::VShape => "V",
            GestureKind::InvertedVShape => "Ʌ",
        }
    }
}

/// Distance between the first and last point; 0 for fewer than two points.
pub fn stroke_length(path: &[Point]) -> f64 {
    match (path.first(), path.last()) {
        (Some(start), Some(end)) if path.len() >= 2 => {
            let dx = end.x - start.x;
            let dy = end.y - start.y;
            (dx * dx + dy * dy).sqrt()
        }
        _ => 0.0,
    }
}

/// Classify a finished stroke.
///
/// V and Ʌ are tested before the angle, so a stroke whose midpoint sags or
/// rises by more than 20% of its horizontal width wins over the
/// horizontal / vertical split. With zero width any nonzero sag or rise is
/// enough.
///
/// Callers are expected to pass a path that satisfies [`is_valid_stroke`];
/// shorter inputs still return a value but it carries no meaning.
pub fn classify(path: &[Point]) -> GestureKind {
    let (start, end) = match (path.first(), path.last()) {
        (Some(s), Some(e)) => (*s, *e),
        _ => return GestureKind::Horizontal,
    };
    let mid = path[path.len() / 2];

    let width = (end.x - start.x).abs();

    let depth = (mid.y - start.y).min(mid.y - end.y);
    if depth > PEAK_RATIO * width {
        return GestureKind::VShape;
    }

    let height = (start.y - mid.y).min(end.y - mid.y);
    if height > PEAK_RATIO * width {
        return GestureKind::InvertedVShape;
    }

    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let angle = dy.atan2(dx).to_degrees().abs();
    if angle <= 45.0 || angle >= 135.0 {
        GestureKind::Horizontal
    } else {
        GestureKind::Vertical
    }
}

/// True if the path has at least two points and is long enough to classify.
pub fn is_valid_stroke(path: &[Point]) -> bool {
    path.len() >= 2 && stroke_length(path) >= MIN_STROKE_LENGTH
}

/// Pointer-down / move / up state machine feeding the classifier.
#[derive(Clone, Debug, Default)]
pub struct StrokeRecorder {
    active: bool,
    path: Vec<Point>,
}

impl StrokeRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer-down: start a fresh path.
    pub fn begin(&mut self, p: Point) {
        self.active = true;
        self.path.clear();
        self.path.push(p);
    }

    /// Pointer-move: append while a stroke is in progress.
    pub fn extend(&mut self, p: Point) {
        if self.active {
            self.path.push(p);
        }
    }

    /// Pointer-up: classify the stroke if it qualifies. The path is cleared
    /// either way.
    pub fn finish(&mut self) -> Option<GestureKind> {
        let gesture = if self.active && is_valid_stroke(&self.path) {
            Some(classify(&self.path))
        } else {
            None
        };
        self.cancel();
        gesture
    }

    /// Drop the in-progress stroke without classifying it.
    pub fn cancel(&mut self) {
        self.active = false;
        self.path.clear();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Points recorded so far (for trail rendering).
    pub fn points(&self) -> &[Point] {
        &self.path
    }
}
