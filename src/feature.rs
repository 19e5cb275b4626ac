use geo::{LineString, Point, Polygon, Rect};
use geo::{Area, Centroid, EuclideanLength};

use crate::label_position::LabelPosition;

/** geometry of a feature to be labelled (or acting as an obstacle) */
#[derive(Debug, Clone)]
pub enum FeatureGeometry {
    /// a single point
    Point(Point<f64>),
    /// an open polyline
    Line(LineString<f64>),
    /// a polygon, possibly with holes
    Polygon(Polygon<f64>),
}

/// geometry kind of a feature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
    /// point feature
    Point,
    /// line feature
    Line,
    /// polygon feature
    Polygon,
}

/// label arrangement strategy chosen for the feature's layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrangement {
    /// candidates anywhere inside/around the geometry
    Free,
    /// horizontal candidates only
    Horizontal,
    /// candidates on a circle around a point
    AroundPoint,
    /// candidates along a line
    AlongLine,
}

/// what to do with a feature whose every candidate conflicts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlapHandling {
    /// never emit an overlapping placement
    Prevent,
    /// emit the best candidate even if it overlaps
    AllowIfRequired,
    /// overlaps are acceptable for this layer
    AllowAtNoCost,
}

/// how a polygon obstacle repels labels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleType {
    /// penalize labels covering the polygon interior
    PolygonInterior,
    /// penalize labels crossing the polygon boundary
    PolygonBoundary,
    /// penalize labels touching the polygon at all
    PolygonWhole,
}

/** obstacle behaviour settings */
#[derive(Debug, Clone)]
pub struct ObstacleSettings {
    /// repelling strength, 0..=2 (1 = neutral)
    factor: f64,
    /// polygon obstacle mode
    obstacle_type: ObstacleType,
}

impl ObstacleSettings {
    /// constructor
    pub fn new(factor:f64, obstacle_type:ObstacleType) -> Self {
        Self { factor, obstacle_type }
    }

    /// repelling strength
    pub fn factor(&self) -> f64 { self.factor }

    /// polygon obstacle mode
    pub fn obstacle_type(&self) -> ObstacleType { self.obstacle_type }
}

/** a geometry repelling labels */
#[derive(Debug, Clone)]
pub struct Obstacle {
    /// obstacle geometry
    geometry: FeatureGeometry,
    /// behaviour settings
    settings: ObstacleSettings,
}

impl Obstacle {
    /// constructor
    pub fn new(geometry:FeatureGeometry, settings:ObstacleSettings) -> Self {
        Self { geometry, settings }
    }

    /// obstacle geometry
    pub fn geometry(&self) -> &FeatureGeometry { &self.geometry }

    /// behaviour settings
    pub fn settings(&self) -> &ObstacleSettings { &self.settings }
}

/** models a geographic feature to be labelled.
Immutable during a solve; shared by its candidates. */
#[derive(Debug)]
pub struct Feature {
    /// stable identifier from the host data set
    id: u64,
    /// feature geometry
    geometry: FeatureGeometry,
    /// label priority, 0 (highest) ..= 1 (lowest)
    priority: f64,
    /// minimum distance between the label and the feature
    label_distance: f64,
    /// arrangement strategy of the feature's layer
    arrangement: Arrangement,
    /// overlap behaviour of the feature's layer
    overlap_handling: OverlapHandling,
    /// always emit a placement for this feature
    always_show: bool,
}

impl Feature {

    /** constructor; settings default to a free, overlap-preventing,
    median-priority feature */
    pub fn new(id:u64, geometry:FeatureGeometry) -> Self {
        Self {
            id,
            geometry,
            priority: 0.5,
            label_distance: 0.0,
            arrangement: Arrangement::Free,
            overlap_handling: OverlapHandling::Prevent,
            always_show: false,
        }
    }

    /// stable identifier
    pub fn id(&self) -> u64 { self.id }

    /// feature geometry
    pub fn geometry(&self) -> &FeatureGeometry { &self.geometry }

    /// geometry kind
    pub fn kind(&self) -> GeometryKind {
        match self.geometry {
            FeatureGeometry::Point(_) => GeometryKind::Point,
            FeatureGeometry::Line(_) => GeometryKind::Line,
            FeatureGeometry::Polygon(_) => GeometryKind::Polygon,
        }
    }

    /// label priority, 0 (highest) ..= 1 (lowest)
    pub fn priority(&self) -> f64 { self.priority }

    /// sets the label priority
    pub fn set_priority(&mut self, priority:f64) { self.priority = priority; }

    /// minimum distance between the label and the feature
    pub fn label_distance(&self) -> f64 { self.label_distance }

    /// sets the label distance
    pub fn set_label_distance(&mut self, distance:f64) { self.label_distance = distance; }

    /// arrangement strategy
    pub fn arrangement(&self) -> Arrangement { self.arrangement }

    /// sets the arrangement strategy
    pub fn set_arrangement(&mut self, arrangement:Arrangement) { self.arrangement = arrangement; }

    /// overlap behaviour
    pub fn overlap_handling(&self) -> OverlapHandling { self.overlap_handling }

    /// sets the overlap behaviour
    pub fn set_overlap_handling(&mut self, handling:OverlapHandling) { self.overlap_handling = handling; }

    /// true iff the feature must always receive a placement
    pub fn always_show(&self) -> bool { self.always_show }

    /// sets the always-show flag
    pub fn set_always_show(&mut self, always_show:bool) { self.always_show = always_show; }

    /// length of the geometry (0 unless it is a line)
    pub fn length(&self) -> f64 {
        match &self.geometry {
            FeatureGeometry::Line(line) => line.euclidean_length(),
            _ => 0.0,
        }
    }

    /// area of the geometry (0 unless it is a polygon)
    pub fn area(&self) -> f64 {
        match &self.geometry {
            FeatureGeometry::Polygon(polygon) => polygon.unsigned_area(),
            _ => 0.0,
        }
    }

    /// centroid of a polygon feature
    pub fn centroid(&self) -> Option<(f64, f64)> {
        match &self.geometry {
            FeatureGeometry::Polygon(polygon) =>
                polygon.centroid().map(|c| (c.x(), c.y())),
            _ => None,
        }
    }

    /** adds a size penalty to every candidate of the feature
    (small lines/polygons get higher cost) */
    pub fn add_size_penalty(&self, candidates:&mut [LabelPosition], extent:&Rect<f64>) {
        let size_cost = match &self.geometry {
            FeatureGeometry::Line(line) => {
                let length = line.euclidean_length();
                if length <= 0.0 { return; }
                // a line over a quarter of the longest extent side is big enough
                let reference = extent.width().max(extent.height()) / 4.0;
                if length >= reference { return; }
                1.0 - length / reference
            }
            FeatureGeometry::Polygon(polygon) => {
                let area = polygon.unsigned_area();
                if area <= 0.0 { return; }
                let reference = extent.width() * extent.height() / 16.0;
                if area >= reference { return; }
                1.0 - (area / reference).sqrt()
            }
            FeatureGeometry::Point(_) => return,
        };
        for candidate in candidates.iter_mut() {
            candidate.set_cost(candidate.cost() + size_cost / 100.0);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    use geo::Coord;

    use crate::geometry::{doubles_near, EPSILON};

    fn square(side:f64) -> Polygon<f64> {
        Polygon::new(
            LineString::from(vec![(0., 0.), (side, 0.), (side, side), (0., side), (0., 0.)]),
            vec![],
        )
    }

    fn extent() -> Rect<f64> {
        Rect::new(Coord { x: 0., y: 0. }, Coord { x: 1000., y: 1000. })
    }

    fn one_candidate(feature:&Rc<Feature>) -> Vec<LabelPosition> {
        vec![LabelPosition::axis_parallel(0, 0, feature.clone(), 0., 0., 10., 5., 1.0)]
    }

    #[test]
    fn test_size_penalty_small_polygon() {
        let feature = Rc::new(Feature::new(0, FeatureGeometry::Polygon(square(100.))));
        let mut candidates = one_candidate(&feature);
        // area 10_000 vs reference 62_500: cost grows by (1 - sqrt(0.16)) / 100
        feature.add_size_penalty(&mut candidates, &extent());
        assert!(doubles_near(candidates[0].cost(), 1.0 + (1.0 - 0.4) / 100.0, EPSILON));
    }

    #[test]
    fn test_size_penalty_big_polygon_free() {
        let feature = Rc::new(Feature::new(0, FeatureGeometry::Polygon(square(500.))));
        let mut candidates = one_candidate(&feature);
        feature.add_size_penalty(&mut candidates, &extent());
        assert!(doubles_near(candidates[0].cost(), 1.0, EPSILON));
    }

    #[test]
    fn test_point_has_no_size_penalty() {
        let feature = Rc::new(Feature::new(0, FeatureGeometry::Point(Point::new(1., 1.))));
        let mut candidates = one_candidate(&feature);
        feature.add_size_penalty(&mut candidates, &extent());
        assert!(doubles_near(candidates[0].cost(), 1.0, EPSILON));
    }
}
