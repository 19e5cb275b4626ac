use std::rc::Rc;

use geo::{LineString, Polygon};

use crate::feature::Feature;
use crate::geometry;

/** a candidate placement: the rectangle where a feature's label could be
drawn, with its placement cost.

Candidates live in the problem's arena; every cross-reference (spatial
index entries, chain moves, the solution vector) uses the candidate id,
which equals its index in the arena. */
#[derive(Debug, Clone)]
pub struct LabelPosition {
    /// candidate id == index in the problem's flat candidate array
    id: usize,
    /// dense index of the owning feature within the problem
    feature_index: usize,
    /// the feature this candidate labels
    feature: Rc<Feature>,
    /// x coordinates of the four corners
    x: [f64; 4],
    /// y coordinates of the four corners
    y: [f64; 4],
    /// placement cost (non-negative, non-decreasing during finalisation)
    cost: f64,
    /// number of currently-indexed conflicting candidates
    nb_overlaps: i64,
    /// the candidate touches an obstacle
    conflicts_with_obstacle: bool,
    /// the candidate touches an obstacle that outranks its feature
    has_hard_obstacle_conflict: bool,
}

impl LabelPosition {

    /// constructor from explicit corners
    pub fn new(id:usize, feature_index:usize, feature:Rc<Feature>,
               x:[f64;4], y:[f64;4], cost:f64) -> Self {
        Self {
            id,
            feature_index,
            feature,
            x,
            y,
            cost,
            nb_overlaps: 0,
            conflicts_with_obstacle: false,
            has_hard_obstacle_conflict: false,
        }
    }

    /// constructor for an axis-parallel candidate rectangle
    pub fn axis_parallel(id:usize, feature_index:usize, feature:Rc<Feature>,
                         xmin:f64, ymin:f64, width:f64, height:f64, cost:f64) -> Self {
        Self::new(
            id, feature_index, feature,
            [xmin, xmin + width, xmin + width, xmin],
            [ymin, ymin, ymin + height, ymin + height],
            cost,
        )
    }

    /// candidate id
    pub fn id(&self) -> usize { self.id }

    /** re-numbers the candidate once its slot in the flat arena is known
    (called by the problem builder after finalisation reordered the
    per-feature lists) */
    pub fn set_id(&mut self, id:usize) { self.id = id; }

    /// dense index of the owning feature within the problem
    pub fn feature_index(&self) -> usize { self.feature_index }

    /// the feature this candidate labels
    pub fn feature(&self) -> &Feature { &self.feature }

    /// shared handle to the owning feature
    pub fn feature_rc(&self) -> &Rc<Feature> { &self.feature }

    /// x coordinates of the four corners
    pub fn x(&self) -> &[f64;4] { &self.x }

    /// y coordinates of the four corners
    pub fn y(&self) -> &[f64;4] { &self.y }

    /// centre of the candidate rectangle
    pub fn center(&self) -> (f64, f64) {
        ((self.x[0] + self.x[2]) / 2.0, (self.y[0] + self.y[2]) / 2.0)
    }

    /// placement cost
    pub fn cost(&self) -> f64 { self.cost }

    /// sets the placement cost
    pub fn set_cost(&mut self, cost:f64) { self.cost = cost; }

    /// number of currently-indexed conflicting candidates
    pub fn num_overlaps(&self) -> i64 { self.nb_overlaps }

    /// increments the overlap count
    pub fn increment_num_overlaps(&mut self) { self.nb_overlaps += 1; }

    /// decrements the overlap count
    pub fn decrement_num_overlaps(&mut self) { self.nb_overlaps -= 1; }

    /// resets the overlap count to zero
    pub fn reset_num_overlaps(&mut self) { self.nb_overlaps = 0; }

    /// true iff the candidate touches an obstacle
    pub fn conflicts_with_obstacle(&self) -> bool { self.conflicts_with_obstacle }

    /// marks the candidate as touching an obstacle
    pub fn set_conflicts_with_obstacle(&mut self, conflicts:bool) {
        self.conflicts_with_obstacle = conflicts;
    }

    /// true iff the candidate touches an obstacle that outranks its feature
    pub fn has_hard_obstacle_conflict(&self) -> bool { self.has_hard_obstacle_conflict }

    /// marks the candidate as hard-conflicting with an obstacle
    pub fn set_has_hard_obstacle_conflict(&mut self, conflict:bool) {
        self.has_hard_obstacle_conflict = conflict;
    }

    /// axis-parallel bounding box (xmin, ymin, xmax, ymax)
    pub fn bounding_box(&self) -> (f64, f64, f64, f64) {
        geometry::quad_bounding_box(&self.x, &self.y)
    }

    /// true iff the two candidate rectangles intersect
    pub fn intersects(&self, other:&LabelPosition) -> bool {
        geometry::intersects_polygon(&self.x, &self.y,
            &geometry::quad_to_polygon(&other.x, &other.y))
    }

    /// distance from the candidate borders to a point (negative inside)
    pub fn distance_to_point(&self, px:f64, py:f64) -> f64 {
        geometry::signed_distance_to_point(&self.x, &self.y, px, py)
    }

    /// true iff one of the candidate borders crosses the line
    pub fn crosses_line(&self, line:&LineString<f64>) -> bool {
        geometry::crosses_line(&self.x, &self.y, line)
    }

    /// true iff one of the candidate borders crosses a polygon ring
    pub fn crosses_boundary(&self, polygon:&Polygon<f64>) -> bool {
        geometry::crosses_boundary(&self.x, &self.y, polygon)
    }

    /// true iff the candidate intersects the polygon at all
    pub fn intersects_polygon(&self, polygon:&Polygon<f64>) -> bool {
        geometry::intersects_polygon(&self.x, &self.y, polygon)
    }

    /// covered-area penalty over the polygon, 0..=12
    pub fn polygon_intersection_cost(&self, polygon:&Polygon<f64>) -> i32 {
        geometry::polygon_intersection_cost(&self.x, &self.y, polygon)
    }
}
