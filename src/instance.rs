/*
Implements:
 - procedures to read and write label placement instances and solutions (JSON)
 - assembly of a solvable problem from an instance
*/
use std::fs;
use std::rc::Rc;

use geo::{Coord, LineString, Point, Polygon, Rect};
use serde::{Serialize, Deserialize};

use crate::cost::{CostCalculator, Feats};
use crate::engine::Engine;
use crate::error::Error;
use crate::feature::{Arrangement, Feature, FeatureGeometry, Obstacle, ObstacleSettings, ObstacleType};
use crate::label_position::LabelPosition;
use crate::problem::Problem;

/** a label placement scene: the map extent, the features with their
pre-generated candidate rectangles, and the obstacles */
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LabelInstance {
    /// map extent, [xmin, ymin, xmax, ymax]
    extent: [f64; 4],
    /// features to be labelled
    features: Vec<FeatureRecord>,
    /// geometries repelling labels
    #[serde(default)]
    obstacles: Vec<ObstacleRecord>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct FeatureRecord {
    /// stable feature identifier
    id: u64,
    /// "point" | "line" | "polygon"
    kind: String,
    /// coordinate rings: a single point, the line vertices, or the polygon
    /// outer ring followed by its holes
    rings: Vec<Vec<[f64; 2]>>,
    /// label priority, 0 (highest) ..= 1 (lowest)
    #[serde(default = "default_priority")]
    priority: f64,
    /// minimum distance between the label and the feature
    #[serde(default)]
    label_distance: f64,
    /// penalty when unlabelled; derived from the priority when absent
    #[serde(default)]
    inactive_cost: Option<f64>,
    /// "free" | "horizontal" | "around_point" | "along_line"
    #[serde(default)]
    arrangement: Option<String>,
    /// always emit a placement for this feature
    #[serde(default)]
    always_show: bool,
    /// candidate rectangles produced by the upstream generator
    candidates: Vec<CandidateRecord>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct CandidateRecord {
    /// lower-left corner x
    x: f64,
    /// lower-left corner y
    y: f64,
    /// rectangle width
    width: f64,
    /// rectangle height
    height: f64,
    /// base cost from the candidate generator
    cost: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct ObstacleRecord {
    /// "point" | "line" | "polygon"
    kind: String,
    /// coordinate rings, as for features
    rings: Vec<Vec<[f64; 2]>>,
    /// repelling strength, 0..=2
    #[serde(default = "default_factor")]
    factor: f64,
    /// "interior" | "boundary" | "whole" (polygons only)
    #[serde(default)]
    obstacle_type: Option<String>,
}

fn default_priority() -> f64 { 0.5 }
fn default_factor() -> f64 { 1.0 }

fn ring_of(coordinates:&[[f64; 2]]) -> LineString<f64> {
    LineString::from(coordinates.iter().map(|c| (c[0], c[1])).collect::<Vec<_>>())
}

fn build_geometry(kind:&str, rings:&[Vec<[f64; 2]>]) -> FeatureGeometry {
    match kind {
        "point" => FeatureGeometry::Point(Point::new(rings[0][0][0], rings[0][0][1])),
        "line" => FeatureGeometry::Line(ring_of(&rings[0])),
        "polygon" => FeatureGeometry::Polygon(Polygon::new(
            ring_of(&rings[0]),
            rings[1..].iter().map(|ring| ring_of(ring)).collect(),
        )),
        _ => panic!("geometry kind unknown {}", kind),
    }
}

impl FeatureRecord {
    fn build_feature(&self) -> Feature {
        let mut feature = Feature::new(self.id, build_geometry(&self.kind, &self.rings));
        feature.set_priority(self.priority);
        feature.set_label_distance(self.label_distance);
        feature.set_always_show(self.always_show);
        if let Some(arrangement) = &self.arrangement {
            feature.set_arrangement(match arrangement.as_str() {
                "free" => Arrangement::Free,
                "horizontal" => Arrangement::Horizontal,
                "around_point" => Arrangement::AroundPoint,
                "along_line" => Arrangement::AlongLine,
                _ => panic!("arrangement unknown {}", arrangement),
            });
        }
        feature
    }
}

impl ObstacleRecord {
    fn build_obstacle(&self) -> Obstacle {
        let obstacle_type = match self.obstacle_type.as_deref() {
            None | Some("interior") => ObstacleType::PolygonInterior,
            Some("boundary") => ObstacleType::PolygonBoundary,
            Some("whole") => ObstacleType::PolygonWhole,
            Some(other) => panic!("obstacle type unknown {}", other),
        };
        Obstacle::new(
            build_geometry(&self.kind, &self.rings),
            ObstacleSettings::new(self.factor, obstacle_type),
        )
    }
}

impl LabelInstance {

    /** reads a label placement instance from a file. */
    pub fn from_file(filename:&str) -> Self {
        let str = fs::read_to_string(filename)
            .expect("Error while reading the file...");
        serde_json::from_str(&str)
            .expect("Error while deserializing the json file")
    }

    /// number of features
    pub fn nb_features(&self) -> usize { self.features.len() }

    /// total number of candidates
    pub fn nb_candidates(&self) -> usize {
        self.features.iter().map(|f| f.candidates.len()).sum()
    }

    /// number of obstacles
    pub fn nb_obstacles(&self) -> usize { self.obstacles.len() }

    /// map extent rectangle
    pub fn extent(&self) -> Rect<f64> {
        Rect::new(
            Coord { x: self.extent[0], y: self.extent[1] },
            Coord { x: self.extent[2], y: self.extent[3] },
        )
    }

    /** displays some statistics of the instance */
    pub fn display_statistics(&self) {
        println!("\t{} \t features", self.nb_features());
        println!("\t{} \t candidates", self.nb_candidates());
        println!("\t{} \t obstacles", self.nb_obstacles());
    }

    /** assembles a solvable problem: candidates are penalized against the
    obstacles, the per-feature costs finalized, and the surviving
    candidates flattened into the problem arena. */
    pub fn build_problem(&self, engine:Rc<Engine>, display_all:bool) -> Result<Problem, Error> {
        let extent = self.extent();
        let obstacles:Vec<Obstacle> =
            self.obstacles.iter().map(|record| record.build_obstacle()).collect();

        let mut flat:Vec<LabelPosition> = Vec::new();
        let mut nb_lp:Vec<usize> = Vec::with_capacity(self.features.len());
        let mut inactive:Vec<f64> = Vec::with_capacity(self.features.len());
        let mut no_candidates:Vec<LabelPosition> = Vec::new();

        for record in &self.features {
            let feature = Rc::new(record.build_feature());
            if record.candidates.is_empty() {
                // the generator produced nothing: the feature never enters
                // the problem, it is only reported as unlabeled
                let anchor = record.rings[0][0];
                no_candidates.push(LabelPosition::axis_parallel(
                    0, 0, feature, anchor[0], anchor[1], 0.0, 0.0, 0.0));
                continue;
            }
            let problem_feat = nb_lp.len();
            let mut candidates:Vec<LabelPosition> = record.candidates.iter().enumerate()
                .map(|(j, c)| LabelPosition::axis_parallel(
                    j, problem_feat, feature.clone(), c.x, c.y, c.width, c.height, c.cost))
                .collect();
            for lp in candidates.iter_mut() {
                for obstacle in &obstacles {
                    CostCalculator::add_obstacle_cost_penalty(lp, obstacle, engine.version());
                }
            }
            let mut feats = Feats { feature, priority: record.priority, candidates };
            CostCalculator::finalize_candidate_costs(&mut feats, &extent);

            nb_lp.push(feats.candidates.len());
            inactive.push(record.inactive_cost
                .unwrap_or_else(|| 2f64.powf(10.0 - 10.0 * record.priority)));
            for mut lp in feats.candidates {
                lp.set_id(flat.len());
                flat.push(lp);
            }
        }

        let mut problem = Problem::new(engine, extent, flat, nb_lp, inactive, display_all)?;
        problem.positions_with_no_candidates_mut().append(&mut no_candidates);
        Ok(problem)
    }

    /** writes a string encoding the solution (use this to export the
    placements): one line per placement with the feature identifier, the
    candidate id and its bounding box */
    pub fn solution_to_string(&self, placements:&[&LabelPosition]) -> String {
        let mut res = String::default();
        for lp in placements {
            let (xmin, ymin, xmax, ymax) = lp.bounding_box();
            res += format!("{} {} {} {} {} {}\n",
                lp.feature().id(), lp.id(), xmin, ymin, xmax, ymax).as_str();
        }
        res
    }

    /** writes a solution into a file. each line corresponds to a placement. */
    pub fn write_solution(&self, filename:&str, placements:&[&LabelPosition]) {
        fs::write(filename, self.solution_to_string(placements))
            .unwrap_or_else(|_|
                panic!("write_solution: unable to write the solution in {}", filename)
            );
    }
}
