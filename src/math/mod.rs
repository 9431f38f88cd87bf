/// 2D point type, used for screen-space pointer positions (pixels).
pub type ScreenPoint = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Global tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// A geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GeoCoord {
    pub lat: f64,
    pub lng: f64,
}

impl GeoCoord {
    /// Creates a new coordinate.
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns the coordinate as a `(lat, lng)` vector.
    #[must_use]
    pub fn to_vector(self) -> Vector2 {
        Vector2::new(self.lat, self.lng)
    }

    /// Creates a coordinate from a `(lat, lng)` vector.
    #[must_use]
    pub fn from_vector(v: Vector2) -> Self {
        Self { lat: v.x, lng: v.y }
    }

    /// Returns the point halfway between `self` and `other`.
    #[must_use]
    pub fn midpoint(self, other: Self) -> Self {
        Self::from_vector((self.to_vector() + other.to_vector()) * 0.5)
    }

    /// Returns `true` if both components are within [`TOLERANCE`] of `other`.
    #[must_use]
    pub fn approx_eq(self, other: Self) -> bool {
        (self.to_vector() - other.to_vector()).amax() < TOLERANCE
    }
}

/// Arithmetic mean of a set of coordinates, or `None` for an empty set.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean<I>(coords: I) -> Option<GeoCoord>
where
    I: IntoIterator<Item = GeoCoord>,
{
    let (sum, count) = coords
        .into_iter()
        .fold((Vector2::zeros(), 0usize), |(sum, n), c| {
            (sum + c.to_vector(), n + 1)
        });
    if count == 0 {
        return None;
    }
    Some(GeoCoord::from_vector(sum / count as f64))
}

/// Chebyshev (chessboard) distance between two screen points.
#[must_use]
pub fn chebyshev_distance(a: &ScreenPoint, b: &ScreenPoint) -> f64 {
    (b - a).amax()
}
