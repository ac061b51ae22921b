// Property tests for the classifier and sequence matching.

use ghost_strokes::gesture::{GestureKind, Point, StrokeRecorder, classify, stroke_length};
use ghost_strokes::sequence::{Sequence, Symbol};
use proptest::prelude::*;

fn point() -> impl Strategy<Value = Point> {
    (-500.0f64..500.0, -500.0f64..500.0).prop_map(|(x, y)| Point::new(x, y))
}

fn gesture() -> impl Strategy<Value = GestureKind> {
    prop_oneof![
        Just(GestureKind::Horizontal),
        Just(GestureKind::Vertical),
        Just(GestureKind::VShape),
        Just(GestureKind::InvertedVShape),
    ]
}

fn sequence() -> impl Strategy<Value = Sequence> {
    prop::collection::vec(0usize..4, 0..10).prop_map(|idx| {
        let glyphs: String = idx.into_iter().map(|i| Symbol::ALL[i].glyph()).collect();
        Sequence::parse(&glyphs).unwrap()
    })
}

proptest! {
    #[test]
    fn classify_is_pure(path in prop::collection::vec(point(), 2..20)) {
        prop_assert_eq!(classify(&path), classify(&path));
    }

    #[test]
    fn short_strokes_never_classify(
        start in point(),
        offsets in prop::collection::vec((-35.0f64..35.0, -35.0f64..35.0), 0..20)
    ) {
        // Every point stays within 35 units per axis of the start, so the
        // start-to-end distance is always below 50.
        let mut rec = StrokeRecorder::new();
        rec.begin(start);
        for (dx, dy) in offsets {
            rec.extend(Point::new(start.x + dx, start.y + dy));
        }
        prop_assert!(stroke_length(rec.points()) < 50.0);
        prop_assert_eq!(rec.finish(), None);
        prop_assert!(rec.points().is_empty());
    }

    #[test]
    fn consume_removes_at_most_front(seq in sequence(), g in gesture()) {
        let mut after = seq.clone();
        let hit = after.consume(g);
        if hit {
            prop_assert_eq!(seq.front(), Some(g.symbol()));
            prop_assert_eq!(after.len(), seq.len() - 1);
            let tail: Vec<Symbol> = seq.iter().skip(1).collect();
            prop_assert_eq!(after.iter().collect::<Vec<_>>(), tail);
        } else {
            prop_assert_eq!(after, seq);
        }
    }

    #[test]
    fn length_never_grows_under_gestures(seq in sequence(), gs in prop::collection::vec(gesture(), 0..30)) {
        let mut s = seq;
        let mut last = s.len();
        for g in gs {
            s.consume(g);
            prop_assert!(s.len() <= last);
            last = s.len();
        }
    }
}
