//! Relation rules between points and rectangles

use esclient_spatial::{Point, Rectangle, Shape, SpatialContext, SpatialRelation};
use rstest::rstest;

fn rect(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Rectangle {
    SpatialContext::geo()
        .make_rectangle(min_x, max_x, min_y, max_y)
        .unwrap()
}

#[rstest]
#[case::same_location(Point::new(1.0, 2.0), Point::new(1.0, 2.0), SpatialRelation::Intersects)]
#[case::different_x(Point::new(1.0, 2.0), Point::new(1.5, 2.0), SpatialRelation::Disjoint)]
#[case::different_y(Point::new(1.0, 2.0), Point::new(1.0, 2.5), SpatialRelation::Disjoint)]
fn test_point_to_point(#[case] a: Point, #[case] b: Point, #[case] expected: SpatialRelation) {
    assert_eq!(a.relate(&b), expected);
    assert_eq!(b.relate(&a), expected);
}

#[rstest]
#[case::inside(Point::new(5.0, 5.0), SpatialRelation::Within)]
#[case::on_edge(Point::new(0.0, 5.0), SpatialRelation::Within)]
#[case::outside(Point::new(20.0, 5.0), SpatialRelation::Disjoint)]
fn test_point_delegates_to_other_shape(#[case] point: Point, #[case] expected: SpatialRelation) {
    let area = rect(0.0, 10.0, 0.0, 10.0);
    assert_eq!(point.relate(&area), expected);
    assert_eq!(area.relate(&point), expected.transpose());
}

#[rstest]
#[case::nested(rect(2.0, 3.0, 2.0, 3.0), SpatialRelation::Contains)]
#[case::enclosing(rect(-1.0, 11.0, -1.0, 11.0), SpatialRelation::Within)]
#[case::overlapping(rect(5.0, 15.0, 5.0, 15.0), SpatialRelation::Intersects)]
#[case::touching(rect(10.0, 12.0, 0.0, 10.0), SpatialRelation::Intersects)]
#[case::apart(rect(11.0, 12.0, 0.0, 10.0), SpatialRelation::Disjoint)]
fn test_rectangle_to_rectangle(#[case] other: Rectangle, #[case] expected: SpatialRelation) {
    let area = rect(0.0, 10.0, 0.0, 10.0);
    assert_eq!(area.relate(&other), expected);
    assert_eq!(other.relate(&area), expected.transpose());
}

#[test]
fn test_moved_point_relates_at_new_location() {
    let area = rect(0.0, 10.0, 0.0, 10.0);
    let mut point = Point::new(50.0, 50.0);
    assert_eq!(point.relate(&area), SpatialRelation::Disjoint);

    point.reset(1.0, 1.0);
    assert_eq!(point.relate(&area), SpatialRelation::Within);
}

#[test]
fn test_point_serializes_coordinates() {
    let json = serde_json::to_value(Point::new(1.5, -3.0)).unwrap();
    assert_eq!(json, serde_json::json!({"x": 1.5, "y": -3.0}));
}
