use std::rc::Rc;

use geo::Rect;
use log::trace;
use ordered_float::OrderedFloat;

use crate::engine::PlacementVersion;
use crate::feature::{Arrangement, Feature, FeatureGeometry, GeometryKind, Obstacle, ObstacleType};
use crate::geometry::{self, EPSILON};
use crate::label_position::LabelPosition;

/** a feature together with its candidate placements, as produced by the
upstream candidate generator. Candidates are sorted ascending by cost
once [`CostCalculator::finalize_candidate_costs`] ran. */
#[derive(Debug)]
pub struct Feats {
    /// the feature to be labelled
    pub feature: Rc<Feature>,
    /// feature priority, 0 (highest) ..= 1 (lowest)
    pub priority: f64,
    /// candidate placements
    pub candidates: Vec<LabelPosition>,
}

/// whether finalisation prunes candidates by the cost discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidatePruning {
    /// prune (matches the historical behaviour)
    Enabled,
    /// keep every candidate (experimental)
    Disabled,
}

/** scores candidates: obstacle penalties per candidate, then per-feature
cost finalisation */
#[derive(Debug)]
pub struct CostCalculator;

impl CostCalculator {

    /** penalizes a candidate for sitting close to an obstacle.

    The penalty scales with the obstacle factor. Under
    [`PlacementVersion::Version2`], an obstacle whose factor exceeds the
    feature's own weight additionally marks the candidate as
    hard-conflicting. */
    pub fn add_obstacle_cost_penalty(lp:&mut LabelPosition, obstacle:&Obstacle,
                                     version:PlacementVersion) {
        let distlabel = lp.feature().label_distance();
        let n:i32 = match obstacle.geometry() {
            FeatureGeometry::Point(point) => {
                let dist = lp.distance_to_point(point.x(), point.y());
                if dist < 0.0 {
                    2
                } else if dist < distlabel {
                    // note this never happens at the moment - points are not
                    // obstacles if they don't fall within the label
                    1
                } else {
                    0
                }
            }
            FeatureGeometry::Line(line) => {
                // is one of the label's borders crossing the line?
                if lp.crosses_line(line) { 1 } else { 0 }
            }
            FeatureGeometry::Polygon(polygon) => match obstacle.settings().obstacle_type() {
                // n ranges from 0 -> 12
                ObstacleType::PolygonInterior => lp.polygon_intersection_cost(polygon),
                // penalty may need tweaking, given that interior mode ranges up to 12
                ObstacleType::PolygonBoundary =>
                    if lp.crosses_boundary(polygon) { 6 } else { 0 },
                // n is either 0 or 12
                ObstacleType::PolygonWhole =>
                    if lp.intersects_polygon(polygon) { 12 } else { 0 },
            },
        };

        // scale cost by the obstacle's factor
        let obstacle_cost = obstacle.settings().factor() * f64::from(n);
        if n > 0 {
            lp.set_conflicts_with_obstacle(true);
        }

        match version {
            PlacementVersion::Version1 => {}
            PlacementVersion::Version2 => {
                // obstacle factor is from 0 -> 2, label priority is from 1 -> 0. argh!
                let priority = 2.0 * (1.0 - lp.feature().priority());
                let obstacle_priority = obstacle.settings().factor();
                if n > 0
                    && priority < obstacle_priority
                    && !geometry::doubles_near(priority, obstacle_priority, 0.001)
                {
                    lp.set_has_hard_obstacle_conflict(true);
                }
            }
        }

        lp.set_cost(lp.cost() + obstacle_cost);
    }

    /** finalizes the candidate costs of one feature: sorts candidates,
    prunes by the cost discriminant, refines polygon candidates and adds
    the geometry size penalty. See
    [`Self::finalize_candidate_costs_with`] for the pruning toggle. */
    pub fn finalize_candidate_costs(feats:&mut Feats, extent:&Rect<f64>) {
        Self::finalize_candidate_costs_with(feats, extent, CandidatePruning::Enabled)
    }

    /// cost finalisation with an explicit pruning mode
    pub fn finalize_candidate_costs_with(feats:&mut Feats, extent:&Rect<f64>,
                                         pruning:CandidatePruning) {
        if feats.candidates.is_empty() { return; }

        // sort candidates list, best label to worst
        feats.candidates.sort_by_key(|lp| OrderedFloat(lp.cost()));

        if pruning == CandidatePruning::Enabled {
            // scan for the smallest integer threshold keeping a non-empty
            // prefix of the sorted candidates, then drop the rest
            let max_cost = feats.candidates[feats.candidates.len() - 1].cost();
            let mut discrim = 0.0;
            let mut stop;
            loop {
                discrim += 1.0;
                stop = 0;
                while stop < feats.candidates.len() && feats.candidates[stop].cost() < discrim {
                    stop += 1;
                }
                if stop != 0 || discrim >= max_cost + 2.0 { break; }
            }
            if discrim > 1.5 {
                for lp in feats.candidates[..stop].iter_mut() {
                    lp.set_cost(0.0021);
                }
            }
            if feats.candidates.len() > stop {
                trace!("feature {}: dropping {} candidates past the cost discriminant {}",
                       feats.feature.id(), feats.candidates.len() - stop, discrim);
                feats.candidates.truncate(stop);
            }
        }

        // set costs for candidates of polygon
        if feats.feature.kind() == GeometryKind::Polygon {
            let arrangement = feats.feature.arrangement();
            if arrangement == Arrangement::Free || arrangement == Arrangement::Horizontal {
                // prefer positions closer to the pole of inaccessibility
                Self::calculate_polygon_ring_distance_costs(feats, extent);
                // ...of these, prefer positions closer to the overall polygon centroid
                Self::calculate_polygon_centroid_distance_costs(feats);
                feats.candidates.sort_by_key(|lp| OrderedFloat(lp.cost()));
            }
        }

        // add size penalty (small lines/polygons get higher cost)
        let feature = feats.feature.clone();
        feature.add_size_penalty(&mut feats.candidates, extent);
    }

    /** spreads a 0.002 cost over the candidates by their distance to the
    closest ring (polygon rings or map border): the farthest candidate
    gains nothing, the closest gains the full 0.002 */
    fn calculate_polygon_ring_distance_costs(feats:&mut Feats, extent:&Rect<f64>) {
        let mut distances = Vec::with_capacity(feats.candidates.len());
        let mut min_distance = f64::MAX;
        let mut max_distance = f64::MIN;
        for lp in &feats.candidates {
            let d = Self::polygon_ring_distance(lp, &feats.feature, extent);
            if d < min_distance { min_distance = d; }
            if d > max_distance { max_distance = d; }
            distances.push(d);
        }

        // if the range is too small, just ignore the ring distance cost
        let cost_range = max_distance - min_distance;
        if cost_range <= EPSILON { return; }

        let normalizer = 0.0020 / cost_range;
        for (lp, d) in feats.candidates.iter_mut().zip(distances) {
            lp.set_cost(lp.cost() + 0.002 - (d - min_distance) * normalizer);
        }
    }

    /** spreads a 0.001 cost over the candidates by their distance to the
    polygon centroid: the closest gains nothing, the farthest the full
    0.001 */
    fn calculate_polygon_centroid_distance_costs(feats:&mut Feats) {
        let (cx, cy) = match feats.feature.centroid() {
            None => return,
            Some(centroid) => centroid,
        };
        let mut distances = Vec::with_capacity(feats.candidates.len());
        let mut min_distance = f64::MAX;
        let mut max_distance = f64::MIN;
        for lp in &feats.candidates {
            let (px, py) = lp.center();
            let d = ((cx - px) * (cx - px) + (cy - py) * (cy - py)).sqrt();
            if d < min_distance { min_distance = d; }
            if d > max_distance { max_distance = d; }
            distances.push(d);
        }

        let cost_range = max_distance - min_distance;
        if cost_range <= EPSILON { return; }

        // NOTE: centroid cost range may need adjusting with respect to ring distance range!
        let normalizer = 0.001 / cost_range;
        for (lp, d) in feats.candidates.iter_mut().zip(distances) {
            lp.set_cost(lp.cost() + (d - min_distance) * normalizer);
        }
    }

    /** minimum distance from the candidate centre to the polygon rings,
    the map border and the polygon holes.

    A centre sitting outside the polygon still prefers a larger distance
    to the outer ring; kept as-is to match the historical placements. */
    fn polygon_ring_distance(candidate:&LabelPosition, feature:&Feature,
                             extent:&Rect<f64>) -> f64 {
        let (px, py) = candidate.center();
        let mut min_distance = f64::MAX;
        if let FeatureGeometry::Polygon(polygon) = feature.geometry() {
            let outer = geometry::min_distance_to_ring(px, py, polygon.exterior());
            if outer < min_distance { min_distance = outer; }
            // prefer candidates further from the outside of the map
            let border = geometry::min_distance_to_ring(px, py, &geometry::rect_ring(extent));
            if border < min_distance { min_distance = border; }
            // prefer candidates further from interior rings (holes) of the polygon
            for hole in polygon.interiors() {
                let inner = geometry::min_distance_to_ring(px, py, hole);
                if inner < min_distance { min_distance = inner; }
            }
        }
        min_distance
    }
}
