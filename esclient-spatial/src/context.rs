//! Bounded worlds that create shapes

use crate::shape::{Point, Rectangle};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpatialError {
    #[error("{value} is outside the world bounds [{min}, {max}] on the {axis} axis")]
    OutOfBounds {
        axis: char,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("minimum {min} is greater than maximum {max} on the {axis} axis")]
    InvertedRange { axis: char, min: f64, max: f64 },

    #[error("coordinate on the {axis} axis is not a number")]
    NotANumber { axis: char },
}

pub type SpatialResult<T> = Result<T, SpatialError>;

/// Factory for shapes inside a bounded world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialContext {
    world: Rectangle,
}

impl Default for SpatialContext {
    /// Geographic degrees: longitude on x, latitude on y
    fn default() -> Self {
        Self::geo()
    }
}

impl SpatialContext {
    pub fn geo() -> Self {
        Self {
            world: Rectangle::new(-180.0, 180.0, -90.0, 90.0),
        }
    }

    /// A flat world spanning `world`
    pub fn with_world(world: Rectangle) -> Self {
        Self { world }
    }

    pub fn world_bounds(&self) -> &Rectangle {
        &self.world
    }

    pub fn make_point(&self, x: f64, y: f64) -> SpatialResult<Point> {
        self.verify('x', x, self.world.min_x(), self.world.max_x())?;
        self.verify('y', y, self.world.min_y(), self.world.max_y())?;
        Ok(Point::new(x, y))
    }

    pub fn make_rectangle(
        &self,
        min_x: f64,
        max_x: f64,
        min_y: f64,
        max_y: f64,
    ) -> SpatialResult<Rectangle> {
        for (axis, min, max) in [('x', min_x, max_x), ('y', min_y, max_y)] {
            if min > max {
                return Err(SpatialError::InvertedRange { axis, min, max });
            }
        }
        let lower = self.make_point(min_x, min_y)?;
        let upper = self.make_point(max_x, max_y)?;
        Ok(Rectangle::from_corners(&lower, &upper))
    }

    fn verify(&self, axis: char, value: f64, min: f64, max: f64) -> SpatialResult<()> {
        if value.is_nan() {
            return Err(SpatialError::NotANumber { axis });
        }
        if value < min || value > max {
            return Err(SpatialError::OutOfBounds {
                axis,
                value,
                min,
                max,
            });
        }
        Ok(())
    }
}
