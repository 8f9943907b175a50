//! Point and centroid types.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Integer image coordinate of a tracked point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    /// X coordinate (column).
    pub x: i32,
    /// Y coordinate (row).
    pub y: i32,
}

impl Point {
    /// Creates a new point.
    #[inline]
    #[must_use]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Computes the squared Euclidean distance to another point.
    #[inline]
    #[must_use]
    pub fn distance_squared(&self, other: &Self) -> u64 {
        let dx = u64::from(self.x.abs_diff(other.x));
        let dy = u64::from(self.y.abs_diff(other.y));
        dx * dx + dy * dy
    }
}

/// Sub-pixel cluster center.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Centroid {
    pub x: f64,
    pub y: f64,
}

impl Centroid {
    #[inline]
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared distance from this centroid to a point.
    #[inline]
    #[must_use]
    pub fn distance_squared_to(&self, point: &Point) -> f64 {
        let dx = f64::from(point.x) - self.x;
        let dy = f64::from(point.y) - self.y;
        dx * dx + dy * dy
    }

    /// Euclidean distance from this centroid to a point.
    #[inline]
    #[must_use]
    pub fn distance_to(&self, point: &Point) -> f64 {
        self.distance_squared_to(point).sqrt()
    }

    /// Euclidean distance between two centroids.
    #[inline]
    #[must_use]
    pub fn distance_between(&self, other: &Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Arithmetic mean of a set of points, or `None` for an empty set.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_of<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point>,
    {
        let mut count = 0usize;
        let (mut sx, mut sy) = (0.0, 0.0);
        for p in points {
            sx += f64::from(p.x);
            sy += f64::from(p.y);
            count += 1;
        }
        (count > 0).then(|| Self::new(sx / count as f64, sy / count as f64))
    }
}

impl From<Point> for Centroid {
    fn from(point: Point) -> Self {
        Self::new(f64::from(point.x), f64::from(point.y))
    }
}
