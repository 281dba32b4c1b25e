//! # esclient spatial
//!
//! Points and rectangles for geo queries, with relation testing.
//!
//! ```rust
//! use esclient_spatial::{Shape, SpatialContext, SpatialRelation};
//!
//! let ctx = SpatialContext::geo();
//! let berlin = ctx.make_point(13.4, 52.5).unwrap();
//! let europe = ctx.make_rectangle(-10.0, 40.0, 35.0, 70.0).unwrap();
//!
//! assert_eq!(berlin.relate(&europe), SpatialRelation::Within);
//! assert_eq!(berlin.to_string(), "Pt(x=13.4,y=52.5)");
//! ```

mod context;
mod relation;
mod shape;

pub use context::{SpatialContext, SpatialError, SpatialResult};
pub use relation::SpatialRelation;
pub use shape::{Point, Rectangle, Shape};
