mod source;

pub use source::{
    PointerButton, PointerEvent, PointerEventKind, PointerSource, Projection, SubscriptionId,
};

use tracing::trace;

use crate::error::{ProjectionError, Result};
use crate::math::{chebyshev_distance, GeoCoord, ScreenPoint};

/// Outcome of a pointer-up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// Press and release close enough together; carries the release position.
    Click(ScreenPoint),
    /// The pointer travelled beyond the click tolerance.
    Drag,
    /// Nothing armed, click-to-add suspended, or not the primary button.
    Ignored,
}

#[derive(Debug, Clone, Copy)]
struct ArmedPress {
    down: ScreenPoint,
    listener: SubscriptionId,
    press: u64,
}

/// Pointer state machine: `Idle -> Armed -> Idle`.
///
/// Every pointer-down arms a one-shot pointer-up listener. A primary-button
/// release within the click tolerance (Chebyshev distance, in pixels) of the
/// press is a click; anything else is a drag or a no-op. A new press before
/// the release supersedes the armed listener, which is unsubscribed at once.
#[derive(Debug)]
pub struct GestureClassifier {
    armed: Option<ArmedPress>,
    tolerance_px: f64,
    click_to_add: bool,
    presses: u64,
}

impl GestureClassifier {
    /// Creates an idle classifier.
    #[must_use]
    pub fn new(tolerance_px: f64, click_to_add: bool) -> Self {
        Self {
            armed: None,
            tolerance_px,
            click_to_add,
            presses: 0,
        }
    }

    /// Arms a fresh pointer-up listener, replacing any stale one.
    pub fn pointer_down<S: PointerSource>(&mut self, source: &mut S, event: &PointerEvent) {
        if let Some(stale) = self.armed.take() {
            source.unsubscribe(stale.listener);
            trace!(press = stale.press, "armed press superseded");
        }
        let listener = source.subscribe(PointerEventKind::Up);
        self.presses += 1;
        self.armed = Some(ArmedPress {
            down: event.position,
            listener,
            press: self.presses,
        });
        trace!(press = self.presses, x = event.position.x, y = event.position.y, "armed");
    }

    /// Consumes the armed listener and classifies the press/release pair.
    pub fn pointer_up<S: PointerSource>(&mut self, source: &mut S, event: &PointerEvent) -> Gesture {
        let Some(armed) = self.armed.take() else {
            return Gesture::Ignored;
        };
        source.unsubscribe(armed.listener);

        if !self.click_to_add || event.button != PointerButton::Primary {
            trace!(press = armed.press, "release ignored");
            return Gesture::Ignored;
        }
        let gesture = self.classify(&armed.down, &event.position);
        trace!(press = armed.press, ?gesture, "classified");
        gesture
    }

    /// Classifies a primary-button press at `down` released at `up`.
    #[must_use]
    pub fn classify(&self, down: &ScreenPoint, up: &ScreenPoint) -> Gesture {
        if chebyshev_distance(down, up) <= self.tolerance_px {
            Gesture::Click(*up)
        } else {
            Gesture::Drag
        }
    }

    /// Resolves a clicked screen point to a geographic coordinate.
    ///
    /// # Errors
    ///
    /// Returns `ProjectionError::OutsideSurface` if the point is not on the
    /// mapped surface.
    pub fn resolve<P: Projection + ?Sized>(projection: &P, point: ScreenPoint) -> Result<GeoCoord> {
        projection
            .screen_to_geo(point)
            .ok_or_else(|| ProjectionError::OutsideSurface { x: point.x, y: point.y }.into())
    }

    /// Drops the armed listener, if any.
    pub fn disarm<S: PointerSource>(&mut self, source: &mut S) {
        if let Some(armed) = self.armed.take() {
            source.unsubscribe(armed.listener);
        }
    }

    /// Returns `true` while a pointer-up listener is armed.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Suspends or resumes click-to-add.
    pub fn set_click_to_add(&mut self, enabled: bool) {
        self.click_to_add = enabled;
    }

    /// Whether clicks currently add vertices.
    #[must_use]
    pub fn click_to_add(&self) -> bool {
        self.click_to_add
    }
}


#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::testing::RecordingSource;
    use super::*;
    use crate::error::PolyEditError;

    fn classifier() -> GestureClassifier {
        GestureClassifier::new(3.0, true)
    }

    #[test]
    fn small_travel_is_click() {
        let mut source = RecordingSource::default();
        let mut c = classifier();
        c.pointer_down(&mut source, &PointerEvent::primary(100.0, 100.0));
        let gesture = c.pointer_up(&mut source, &PointerEvent::primary(102.0, 101.0));
        assert_eq!(gesture, Gesture::Click(ScreenPoint::new(102.0, 101.0)));
    }

    #[test]
    fn large_travel_is_drag() {
        let mut source = RecordingSource::default();
        let mut c = classifier();
        c.pointer_down(&mut source, &PointerEvent::primary(100.0, 100.0));
        let gesture = c.pointer_up(&mut source, &PointerEvent::primary(110.0, 100.0));
        assert_eq!(gesture, Gesture::Drag);
    }

    #[test]
    fn threshold_is_inclusive() {
        let c = classifier();
        let down = ScreenPoint::new(0.0, 0.0);
        assert!(matches!(c.classify(&down, &ScreenPoint::new(3.0, -3.0)), Gesture::Click(_)));
        assert_eq!(c.classify(&down, &ScreenPoint::new(3.5, 0.0)), Gesture::Drag);
    }

    #[test]
    fn secondary_button_is_ignored() {
        let mut source = RecordingSource::default();
        let mut c = classifier();
        c.pointer_down(&mut source, &PointerEvent::primary(5.0, 5.0));
        let up = PointerEvent::new(5.0, 5.0, PointerButton::Secondary);
        assert_eq!(c.pointer_up(&mut source, &up), Gesture::Ignored);
        assert_eq!(source.live_count(), 0);
    }

    #[test]
    fn suspended_mode_is_ignored() {
        let mut source = RecordingSource::default();
        let mut c = classifier();
        c.set_click_to_add(false);
        c.pointer_down(&mut source, &PointerEvent::primary(5.0, 5.0));
        assert_eq!(
            c.pointer_up(&mut source, &PointerEvent::primary(5.0, 5.0)),
            Gesture::Ignored
        );
        assert!(!c.click_to_add());
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut source = RecordingSource::default();
        let mut c = classifier();
        assert_eq!(
            c.pointer_up(&mut source, &PointerEvent::primary(1.0, 1.0)),
            Gesture::Ignored
        );
    }

    #[test]
    fn listener_fires_once() {
        let mut source = RecordingSource::default();
        let mut c = classifier();
        c.pointer_down(&mut source, &PointerEvent::primary(1.0, 1.0));
        assert!(c.is_armed());
        assert_eq!(source.live_count(), 1);
        assert_eq!(source.kinds, vec![PointerEventKind::Up]);

        c.pointer_up(&mut source, &PointerEvent::primary(1.0, 1.0));
        assert!(!c.is_armed());
        assert_eq!(source.live_count(), 0);
        assert_eq!(
            c.pointer_up(&mut source, &PointerEvent::primary(1.0, 1.0)),
            Gesture::Ignored
        );
        assert_eq!(source.double_unsubscribes, 0);
    }

    #[test]
    fn new_press_supersedes_stale_listener() {
        let mut source = RecordingSource::default();
        let mut c = classifier();
        c.pointer_down(&mut source, &PointerEvent::primary(0.0, 0.0));
        c.pointer_down(&mut source, &PointerEvent::primary(50.0, 50.0));
        assert_eq!(source.live_count(), 1);

        // Classified against the second press only.
        let gesture = c.pointer_up(&mut source, &PointerEvent::primary(51.0, 49.0));
        assert_eq!(gesture, Gesture::Click(ScreenPoint::new(51.0, 49.0)));
        assert_eq!(source.live_count(), 0);
        assert_eq!(source.double_unsubscribes, 0);
    }

    #[test]
    fn disarm_releases_listener() {
        let mut source = RecordingSource::default();
        let mut c = classifier();
        c.pointer_down(&mut source, &PointerEvent::primary(0.0, 0.0));
        c.disarm(&mut source);
        c.disarm(&mut source);
        assert_eq!(source.live_count(), 0);
        assert_eq!(source.double_unsubscribes, 0);
    }

    #[test]
    fn resolve_off_surface_fails() {
        let projection = |p: ScreenPoint| (p.x >= 0.0).then(|| GeoCoord::new(p.y, p.x));
        let ok = GestureClassifier::resolve(&projection, ScreenPoint::new(4.0, 2.0)).unwrap();
        assert_eq!(ok, GeoCoord::new(2.0, 4.0));

        let err = GestureClassifier::resolve(&projection, ScreenPoint::new(-1.0, 0.0)).unwrap_err();
        assert!(matches!(err, PolyEditError::Projection(_)));
    }
}
