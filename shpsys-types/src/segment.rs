use crate::geom::{apex_dist_sq, segment_hit, segment_intersection, SegmentIntersection};
use crate::point::CartesianPoint2d;

/// A straight line segment between two points.
#[derive(Debug, PartialEq)]
pub struct Segment<'a, Point>(pub &'a Point, pub &'a Point);

impl<'a, P: CartesianPoint2d<Num = f64>> Segment<'a, P> {
    /// Shortest euclidean distance (squared) between a point and the segment:
    ///
    /// * if the normal from the point to the segment ends inside the segment, the returned value is the squared length
    ///   of the normal
    /// * if the normal from the point to the segment ends outside of the segment, the returned value is the smaller one
    ///   of the squared distances between the point and the segment's endpoints
    pub fn distance_to_point_sq<Point: CartesianPoint2d<Num = f64>>(&self, point: &Point) -> f64 {
        apex_dist_sq(
            self.0.distance_sq(point),
            point.distance_sq(self.1),
            self.0.distance_sq(self.1),
        )
    }

    /// Returns true if the segment has at least one common point with the `other` segment.
    pub fn intersects<Point: CartesianPoint2d<Num = f64>>(&self, other: &Segment<Point>) -> bool {
        segment_hit(
            self.0.to_point2(),
            self.1.to_point2(),
            other.0.to_point2(),
            other.1.to_point2(),
        )
    }

    /// Intersection with the `other` segment. Touching at a shared endpoint is not an intersection.
    pub fn intersection<Point: CartesianPoint2d<Num = f64>>(
        &self,
        other: &Segment<Point>,
    ) -> Option<SegmentIntersection> {
        segment_intersection(
            self.0.to_point2(),
            self.1.to_point2(),
            other.0.to_point2(),
            other.1.to_point2(),
        )
    }
}
