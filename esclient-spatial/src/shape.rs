//! Shapes and how they relate to each other

use crate::relation::SpatialRelation;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A two dimensional shape
pub trait Shape: fmt::Debug + Send + Sync {
    /// The smallest rectangle enclosing the shape
    fn bounding_box(&self) -> Rectangle;

    fn has_area(&self) -> bool;

    fn area(&self) -> f64;

    fn center(&self) -> Point;

    /// How this shape relates to `other`
    fn relate(&self, other: &dyn Shape) -> SpatialRelation;

    /// This shape as a point, when it is one
    fn as_point(&self) -> Option<&Point> {
        None
    }

    fn as_rectangle(&self) -> Option<&Rectangle> {
        None
    }
}

/// A location; it has no area
///
/// Equality compares coordinates exactly, with `-0.0` distinct from `0.0`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// Move the point in place
    pub fn reset(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.x.total_cmp(&other.x) == Ordering::Equal
            && self.y.total_cmp(&other.y) == Ordering::Equal
    }
}

impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.x.to_bits().hash(state);
        self.y.to_bits().hash(state);
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pt(x={:?},y={:?})", self.x, self.y)
    }
}

impl Shape for Point {
    fn bounding_box(&self) -> Rectangle {
        Rectangle::from_corners(self, self)
    }

    fn has_area(&self) -> bool {
        false
    }

    fn area(&self) -> f64 {
        0.0
    }

    fn center(&self) -> Point {
        *self
    }

    fn relate(&self, other: &dyn Shape) -> SpatialRelation {
        match other.as_point() {
            Some(point) if point == self => SpatialRelation::Intersects,
            Some(_) => SpatialRelation::Disjoint,
            None => other.relate(self).transpose(),
        }
    }

    fn as_point(&self) -> Option<&Point> {
        Some(self)
    }
}

/// An axis aligned rectangle, edges included
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    min_x: f64,
    max_x: f64,
    min_y: f64,
    max_y: f64,
}

impl Rectangle {
    /// Callers guarantee `min_x <= max_x` and `min_y <= max_y`; see
    /// [`SpatialContext::make_rectangle`](crate::SpatialContext::make_rectangle)
    pub(crate) fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// The rectangle spanned by two corner points, in any order
    pub fn from_corners(a: &Point, b: &Point) -> Self {
        Self::new(
            a.x.min(b.x),
            a.x.max(b.x),
            a.y.min(b.y),
            a.y.max(b.y),
        )
    }

    pub fn min_x(&self) -> f64 {
        self.min_x
    }

    pub fn max_x(&self) -> f64 {
        self.max_x
    }

    pub fn min_y(&self) -> f64 {
        self.min_y
    }

    pub fn max_y(&self) -> f64 {
        self.max_y
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn contains_point(&self, point: &Point) -> bool {
        (self.min_x..=self.max_x).contains(&point.x) && (self.min_y..=self.max_y).contains(&point.y)
    }

    fn relate_rectangle(&self, other: &Rectangle) -> SpatialRelation {
        if other.min_x > self.max_x
            || other.max_x < self.min_x
            || other.min_y > self.max_y
            || other.max_y < self.min_y
        {
            return SpatialRelation::Disjoint;
        }
        let contains = |outer: &Rectangle, inner: &Rectangle| {
            outer.min_x <= inner.min_x
                && inner.max_x <= outer.max_x
                && outer.min_y <= inner.min_y
                && inner.max_y <= outer.max_y
        };
        if contains(self, other) {
            SpatialRelation::Contains
        } else if contains(other, self) {
            SpatialRelation::Within
        } else {
            SpatialRelation::Intersects
        }
    }
}

impl Shape for Rectangle {
    fn bounding_box(&self) -> Rectangle {
        *self
    }

    fn has_area(&self) -> bool {
        self.width() > 0.0 && self.height() > 0.0
    }

    fn area(&self) -> f64 {
        self.width() * self.height()
    }

    fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    fn relate(&self, other: &dyn Shape) -> SpatialRelation {
        if let Some(point) = other.as_point() {
            return if self.contains_point(point) {
                SpatialRelation::Contains
            } else {
                SpatialRelation::Disjoint
            };
        }
        match other.as_rectangle() {
            Some(rectangle) => self.relate_rectangle(rectangle),
            None => other.relate(self).transpose(),
        }
    }

    fn as_rectangle(&self) -> Option<&Rectangle> {
        Some(self)
    }
}
