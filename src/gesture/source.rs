use crate::math::{GeoCoord, ScreenPoint};

/// Pointer button reported with a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
    Other(u16),
}

impl PointerButton {
    /// Maps a DOM-style button index (0 = primary, 1 = middle, 2 = secondary).
    #[must_use]
    pub fn from_index(index: u16) -> Self {
        match index {
            0 => Self::Primary,
            1 => Self::Middle,
            2 => Self::Secondary,
            other => Self::Other(other),
        }
    }
}

/// A pointer-down or pointer-up on the editing surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Position in surface pixels.
    pub position: ScreenPoint,
    pub button: PointerButton,
}

impl PointerEvent {
    /// Creates a new pointer event.
    #[must_use]
    pub fn new(x: f64, y: f64, button: PointerButton) -> Self {
        Self {
            position: ScreenPoint::new(x, y),
            button,
        }
    }

    /// Creates a primary-button event.
    #[must_use]
    pub fn primary(x: f64, y: f64) -> Self {
        Self::new(x, y, PointerButton::Primary)
    }
}

/// Kinds of pointer event a listener can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    Down,
    Up,
}

/// Opaque listener registration issued by a [`PointerSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Low-level pointer event delivery of the host toolkit.
///
/// The host routes events of a subscribed kind to the editor for as long as
/// the subscription is alive.
pub trait PointerSource {
    /// Starts delivering events of `kind`.
    fn subscribe(&mut self, kind: PointerEventKind) -> SubscriptionId;

    /// Stops delivering events for a subscription.
    fn unsubscribe(&mut self, subscription: SubscriptionId);
}

/// Scene projection from surface pixels to geographic coordinates.
pub trait Projection {
    /// Resolves a screen point, or `None` if it falls outside the mapped area.
    fn screen_to_geo(&self, point: ScreenPoint) -> Option<GeoCoord>;
}

impl<F> Projection for F
where
    F: Fn(ScreenPoint) -> Option<GeoCoord>,
{
    fn screen_to_geo(&self, point: ScreenPoint) -> Option<GeoCoord> {
        self(point)
    }
}
