use std::iter::once;
use std::rc::Rc;

use bit_set::BitSet;
use geo::Rect;
use log::debug;

use crate::engine::Engine;
use crate::error::Error;
use crate::geometry::EPSILON;
use crate::label_position::LabelPosition;
use crate::queue::CandidateQueue;
use crate::rtree::CandidateIndex;

/** an ejection chain: an ordered list of (feature, new label) moves and
the cost change obtained by applying them all. `None` labels hide the
feature. Feature indices are unique within a chain. */
#[derive(Debug, Clone)]
pub struct Chain {
    /// accumulated cost change (negative = improvement)
    pub delta: f64,
    /// (feature index, new label id) moves
    pub moves: Vec<(usize, Option<usize>)>,
}

impl Chain {
    /// number of moves
    pub fn degree(&self) -> usize { self.moves.len() }

    fn from_moves(current:&[ElemTrans], last:(usize, Option<usize>), delta:f64) -> Self {
        let mut moves:Vec<(usize, Option<usize>)> =
            current.iter().map(|et| (et.feat, et.new_label)).collect();
        moves.push(last);
        Self { delta, moves }
    }
}

/// one applied (and later unwound) move while growing a chain
#[derive(Debug, Clone, Copy)]
struct ElemTrans {
    feat: usize,
    old_label: Option<usize>,
    new_label: Option<usize>,
}

/** the label placement optimisation problem: the candidate arena, the
spatial indices over all/active candidates and the solution vector.

The solve runs [`Self::reduce`] then [`Self::chain_search`] (greedy FALP
seed followed by an ejection chain local search), and the result is read
back with [`Self::get_solution`]. */
#[derive(Debug)]
pub struct Problem {
    /// solve context
    engine: Rc<Engine>,
    /// map extent
    extent: Rect<f64>,
    /// number of features
    feature_count: usize,
    /// number of candidates still considered
    total_candidates: usize,
    /// nb_lp[f]: number of candidates of feature f still considered
    feat_nb_lp: Vec<usize>,
    /// start_id[f]: arena index of the first candidate of feature f
    feat_start_id: Vec<usize>,
    /// cost of leaving feature f unlabelled
    inactive_cost: Vec<f64>,
    /// the candidate arena; a candidate id is its index here
    positions: Vec<LabelPosition>,
    /// placeholder positions of features the generator produced nothing for
    positions_no_candidates: Vec<LabelPosition>,
    /// index over every considered candidate
    all_candidates: CandidateIndex,
    /// index over the currently placed candidates
    active_candidates: CandidateIndex,
    /// active_labels[f]: placed candidate of feature f, if any
    active_labels: Vec<Option<usize>>,
    /// running count of conflicting candidate pairs
    nb_overlap: i64,
    /// assign every feature a label, conflicting or not
    display_all: bool,
}

impl Problem {

    /** builds a problem over a flat candidate arena.

    `feat_nb_lp[f]` candidates of feature `f` occupy consecutive arena
    slots, features in order; every candidate id must equal its slot and
    carry the feature's dense index. Candidate overlap counts are seeded
    here from the conflict oracle. */
    pub fn new(engine:Rc<Engine>, extent:Rect<f64>, candidates:Vec<LabelPosition>,
               feat_nb_lp:Vec<usize>, inactive_cost:Vec<f64>, display_all:bool)
               -> Result<Self, Error> {
        let feature_count = feat_nb_lp.len();
        if inactive_cost.len() != feature_count {
            return Err(Error::InvalidInput(format!(
                "{} inactive costs for {} features", inactive_cost.len(), feature_count)));
        }
        let total_candidates:usize = feat_nb_lp.iter().sum();
        if total_candidates != candidates.len() {
            return Err(Error::InvalidInput(format!(
                "{} candidates but per-feature counts sum to {}",
                candidates.len(), total_candidates)));
        }
        let mut feat_start_id = Vec::with_capacity(feature_count);
        let mut start = 0;
        for nb in &feat_nb_lp {
            feat_start_id.push(start);
            start += nb;
        }
        for (slot, lp) in candidates.iter().enumerate() {
            if lp.id() != slot {
                return Err(Error::InvalidInput(format!(
                    "candidate id {} stored in arena slot {}", lp.id(), slot)));
            }
        }
        for (feat, (&first, &nb)) in feat_start_id.iter().zip(&feat_nb_lp).enumerate() {
            for lp in &candidates[first..first + nb] {
                if lp.feature_index() != feat {
                    return Err(Error::InvalidInput(format!(
                        "candidate {} carries feature index {} but sits in feature {}'s range",
                        lp.id(), lp.feature_index(), feat)));
                }
            }
        }

        let mut problem = Self {
            engine,
            extent,
            feature_count,
            total_candidates,
            feat_nb_lp,
            feat_start_id,
            inactive_cost,
            positions: candidates,
            positions_no_candidates: Vec::new(),
            all_candidates: CandidateIndex::new(),
            active_candidates: CandidateIndex::new(),
            active_labels: vec![None; feature_count],
            nb_overlap: 0,
            display_all,
        };
        for id in 0..problem.positions.len() {
            let bbox = problem.positions[id].bounding_box();
            problem.all_candidates.insert(id, bbox);
        }
        // seed the overlap counts from the fully-populated index
        for id in 0..problem.positions.len() {
            let hits = problem.all_candidates.intersecting(problem.positions[id].bounding_box());
            for hit in hits {
                if hit != id && problem.candidates_conflict(id, hit) {
                    problem.positions[id].increment_num_overlaps();
                    problem.nb_overlap += 1;
                }
            }
        }
        problem.nb_overlap /= 2;
        Ok(problem)
    }

    /// number of features
    pub fn feature_count(&self) -> usize { self.feature_count }

    /// map extent
    pub fn extent(&self) -> &Rect<f64> { &self.extent }

    /// number of candidates still considered
    pub fn total_candidates(&self) -> usize { self.total_candidates }

    /// number of candidates of feature `feat` still considered
    pub fn nb_candidates(&self, feat:usize) -> usize { self.feat_nb_lp[feat] }

    /// running count of conflicting candidate pairs
    pub fn nb_overlaps(&self) -> i64 { self.nb_overlap }

    /// the candidate with the given id
    pub fn position(&self, id:usize) -> &LabelPosition { &self.positions[id] }

    /// active_labels[f]: placed candidate of feature f, if any
    pub fn active_labels(&self) -> &[Option<usize>] { &self.active_labels }

    /// placeholder positions of features the generator produced nothing for
    pub fn positions_with_no_candidates_mut(&mut self) -> &mut Vec<LabelPosition> {
        &mut self.positions_no_candidates
    }

    /// total cost of the current solution (placed costs + inactive costs)
    pub fn solution_cost(&self) -> f64 {
        (0..self.feature_count).map(|feat| match self.active_labels[feat] {
            Some(label) => self.positions[label].cost(),
            None => self.inactive_cost[feat],
        }).sum()
    }

    fn candidates_conflict(&self, a:usize, b:usize) -> bool {
        self.engine.conflicts(&self.positions[a], &self.positions[b])
    }

    /** locks in zero-overlap candidates: whenever a feature owns a
    candidate nothing conflicts with, its worse-cost siblings are dropped
    from the problem and the overlap counts of their conflictors updated.
    Repeats until a full pass changes nothing. */
    pub fn reduce(&mut self) {
        let mut ok = BitSet::with_capacity(self.positions.len());
        let mut counter = 0;
        let mut run = true;

        while run {
            if self.engine.is_canceled() { break; }
            run = false;
            for feat in 0..self.feature_count {
                if self.engine.is_canceled() { break; }
                for j in 0..self.feat_nb_lp[feat] {
                    let locked = self.feat_start_id[feat] + j;
                    if ok.contains(locked) { continue; }
                    if self.positions[locked].num_overlaps() != 0 { continue; }
                    // this candidate conflicts with nothing: keep it and
                    // retire every worse sibling
                    run = true;
                    ok.insert(locked);
                    counter += self.feat_nb_lp[feat] - j - 1;
                    for k in (j + 1)..self.feat_nb_lp[feat] {
                        let dropped = self.feat_start_id[feat] + k;
                        ok.insert(dropped);
                        let bbox = self.positions[dropped].bounding_box();
                        self.nb_overlap -= self.positions[dropped].num_overlaps();
                        for hit in self.all_candidates.intersecting(bbox) {
                            if self.candidates_conflict(dropped, hit) {
                                self.positions[hit].decrement_num_overlaps();
                                self.positions[dropped].decrement_num_overlaps();
                            }
                        }
                        self.all_candidates.remove(dropped, bbox);
                    }
                    self.feat_nb_lp[feat] = j + 1;
                    break;
                }
            }
        }

        self.total_candidates -= counter;
        debug!("reduce: {} candidates retired, {} remain", counter, self.total_candidates);
    }

    /** removes a candidate from the pending queue and tells its queued
    conflictors that one pending conflict disappeared */
    fn ignore_label(&mut self, label:usize, list:&mut CandidateQueue) {
        if !list.is_in(label) { return; }
        list.remove(label);
        let bbox = self.positions[label].bounding_box();
        for hit in self.all_candidates.intersecting(bbox) {
            if hit != label && list.is_in(hit) && self.candidates_conflict(hit, label) {
                list.decrease_key(hit);
            }
        }
    }

    /** greedy initial solution (FALP, Yamamoto/Câmara/Lorena): repeatedly
    places the pending candidate with the fewest pending conflicts, then
    withdraws its siblings and conflictors from the queue */
    pub fn init_sol_falp(&mut self) {
        self.active_labels = vec![None; self.feature_count];

        let mut list = CandidateQueue::with_capacity(self.total_candidates);
        for feat in 0..self.feature_count {
            for j in 0..self.feat_nb_lp[feat] {
                let label = self.feat_start_id[feat] + j;
                if list.insert(label, self.positions[label].num_overlaps()).is_err() {
                    continue; // queue full: this candidate just won't seed anything
                }
            }
        }
        debug!("falp: queue seeded with {} candidates", list.len());

        while !list.is_empty() {
            if self.engine.is_canceled() { return; }
            let label = match list.pop_best() {
                None => break,
                Some(label) => label,
            };
            let feat = self.positions[label].feature_index();
            self.active_labels[feat] = Some(label);

            for sibling in self.feat_start_id[feat]
                ..self.feat_start_id[feat] + self.feat_nb_lp[feat] {
                self.ignore_label(sibling, &mut list);
            }

            let bbox = self.positions[label].bounding_box();
            let conflicting:Vec<usize> = self.all_candidates.intersecting(bbox)
                .into_iter()
                .filter(|&hit| self.candidates_conflict(label, hit))
                .collect();
            for hit in conflicting {
                self.ignore_label(hit, &mut list);
            }

            self.active_candidates.insert(label, bbox);
        }

        if self.display_all {
            self.assign_remaining_overlapping();
        }
    }

    /** `display_all` fallback: every still-unplaced feature receives the
    candidate with the fewest conflicts against the active placements */
    fn assign_remaining_overlapping(&mut self) {
        for feat in 0..self.feature_count {
            if self.active_labels[feat].is_some() { continue; }
            let mut retained:Option<usize> = None;
            let mut nb_overlap = i64::MAX;
            for j in 0..self.feat_nb_lp[feat] {
                let label = self.feat_start_id[feat] + j;
                self.positions[label].reset_num_overlaps();
                let bbox = self.positions[label].bounding_box();
                for hit in self.active_candidates.intersecting(bbox) {
                    if self.candidates_conflict(label, hit) {
                        self.positions[label].increment_num_overlaps();
                    }
                }
                if self.positions[label].num_overlaps() < nb_overlap {
                    retained = Some(label);
                    nb_overlap = self.positions[label].num_overlaps();
                }
            }
            if let Some(label) = retained {
                self.active_labels[feat] = Some(label);
                self.active_candidates.insert(label, self.positions[label].bounding_box());
            }
        }
    }

    /** grows an ejection chain from `seed`: tries every alternative label
    of the current seed, following single-conflict alternatives deeper
    (bounded by the engine's max degree) and recording the best completed
    chain. The active index is restored before returning. */
    fn chain(&mut self, seed:usize) -> Option<Chain> {
        let max_degree = self.engine.max_chain_degree();

        let mut delta = 0.0;
        let mut delta_best = f64::MAX;
        let mut retained_chain:Option<Chain> = None;
        let mut current_chain:Vec<ElemTrans> = Vec::new();
        let mut tmpsol = self.active_labels.clone();

        let mut current_seed = Some(seed);
        while let Some(seed) = current_seed {
            let seed_nb_lp = self.feat_nb_lp[seed];
            let mut delta_min = f64::MAX;
            let mut next_seed:Option<usize> = None;
            let mut retained_label:Option<usize> = None;

            // the seed's current placement is ejected
            match tmpsol[seed] {
                None => delta -= self.inactive_cost[seed],
                Some(label) => delta -= self.positions[label].cost(),
            }

            for alt in once(None).chain((0..seed_nb_lp).map(Some)) {
                let alt_label = alt.map(|j| self.feat_start_id[seed] + j);
                if alt_label == tmpsol[seed] { continue; } // skip the active label

                let label = match alt_label {
                    None => {
                        // hiding the seed ends the chain
                        if retained_chain.is_none() || delta + self.inactive_cost[seed] < delta_best {
                            delta_best = delta + self.inactive_cost[seed];
                            retained_chain = Some(Chain::from_moves(
                                &current_chain, (seed, None), delta_best));
                        }
                        continue;
                    }
                    Some(label) => label,
                };

                // evaluate the conflict graph after moving the seed's label
                let mut delta_tmp = delta;
                let mut conflicts:Vec<usize> = Vec::new();
                let mut cycle = false;
                let bbox = self.positions[label].bounding_box();
                for hit in self.active_candidates.intersecting(bbox) {
                    if !self.candidates_conflict(hit, label) { continue; }
                    let feat = self.positions[hit].feature_index();
                    if current_chain.iter().any(|et| et.feat == feat) {
                        // this alternative would re-eject a chained feature
                        cycle = true;
                        break;
                    }
                    if !conflicts.contains(&feat) {
                        conflicts.push(feat);
                        delta_tmp += self.positions[hit].cost() + self.inactive_cost[feat];
                    }
                }
                if cycle { continue; }

                if conflicts.is_empty() {
                    // no conflict -> end of chain
                    let cost = self.positions[label].cost();
                    if retained_chain.is_none() || delta + cost < delta_best {
                        delta_best = delta + cost;
                        retained_chain = Some(Chain::from_moves(
                            &current_chain, (seed, Some(label)), delta_best));
                    }
                } else if conflicts.len() == 1 {
                    // a single other feature can be ejected in turn
                    if delta_tmp < delta_min {
                        delta_min = delta_tmp;
                        retained_label = Some(label);
                        next_seed = Some(conflicts[0]);
                    }
                } else {
                    // several conflicts: hide them all and store the chain
                    let mut chain_delta = delta + self.positions[label].cost();
                    let mut moves:Vec<(usize, Option<usize>)> =
                        current_chain.iter().map(|et| (et.feat, et.new_label)).collect();
                    moves.push((seed, Some(label)));
                    for &feat in &conflicts {
                        moves.push((feat, None));
                        chain_delta += self.inactive_cost[feat];
                    }
                    if chain_delta < delta_best {
                        delta_best = chain_delta;
                        retained_chain = Some(Chain { delta: chain_delta, moves });
                    }
                }
            }

            if next_seed.is_none() || current_chain.len() > max_degree {
                current_seed = None;
            } else {
                let et = ElemTrans {
                    feat: seed,
                    old_label: tmpsol[seed],
                    new_label: retained_label,
                };
                if let Some(old) = et.old_label {
                    self.active_candidates.remove(old, self.positions[old].bounding_box());
                }
                if let Some(new) = et.new_label {
                    self.active_candidates.insert(new, self.positions[new].bounding_box());
                    delta += self.positions[new].cost();
                }
                current_chain.push(et);
                tmpsol[seed] = retained_label;
                current_seed = next_seed;
            }
        }

        // put the active index back the way it was
        for et in &current_chain {
            if let Some(new) = et.new_label {
                self.active_candidates.remove(new, self.positions[new].bounding_box());
            }
            if let Some(old) = et.old_label {
                self.active_candidates.insert(old, self.positions[old].bounding_box());
            }
        }

        retained_chain
    }

    /** the optimisation: a FALP seed, then ejection chains grown from every
    feature until no seed yields an improving chain */
    pub fn chain_search(&mut self) {
        if self.feature_count == 0 { return; }

        let mut ok = BitSet::with_capacity(self.feature_count);
        self.init_sol_falp();

        let mut iter = 0;
        loop {
            if self.engine.is_canceled() { break; }

            let mut seed = (iter + 1) % self.feature_count;
            while ok.contains(seed) && seed != iter {
                seed = (seed + 1) % self.feature_count;
            }
            if seed == iter { break; } // every seed is settled

            iter = (iter + 1) % self.feature_count;
            match self.chain(seed) {
                Some(chain) if chain.delta < -EPSILON => {
                    debug!("chain from seed {}: delta {:.4}, degree {}",
                           seed, chain.delta, chain.degree());
                    for &(feat, label) in &chain.moves {
                        if let Some(old) = self.active_labels[feat] {
                            let bbox = self.positions[old].bounding_box();
                            self.active_candidates.remove(old, bbox);
                            // ejecting a label unsettles everything it conflicted with
                            for hit in self.all_candidates.intersecting(bbox) {
                                if self.candidates_conflict(old, hit) {
                                    ok.remove(self.positions[hit].feature_index());
                                }
                            }
                        }
                        self.active_labels[feat] = label;
                        if let Some(new) = label {
                            self.active_candidates.insert(new, self.positions[new].bounding_box());
                        }
                        ok.remove(feat);
                    }
                }
                _ => { ok.insert(seed); } // no chain, or not good enough
            }
        }
    }

    /** extracts the placements: the active label per feature, or the best
    candidate of features allowed to overlap. Unplaced features with
    genuine candidates are reported through `unlabeled`, followed by the
    placeholders of features the generator produced nothing for. */
    pub fn get_solution<'a>(&'a self, return_inactive:bool,
                            mut unlabeled:Option<&mut Vec<&'a LabelPosition>>)
                            -> Vec<&'a LabelPosition> {
        let mut placements = Vec::with_capacity(self.feature_count);

        for feat in 0..self.feature_count {
            let start = self.feat_start_id[feat];
            let found_candidates = start < self.positions.len();

            if let Some(label) = self.active_labels[feat] {
                placements.push(&self.positions[label]);
            } else if found_candidates
                && (return_inactive
                    || self.positions[start].feature().overlap_handling()
                        == crate::feature::OverlapHandling::AllowIfRequired
                    || self.positions[start].feature().always_show()) {
                placements.push(&self.positions[start]); // overlapping placement
            } else if let Some(sink) = unlabeled.as_mut() {
                // if the next feature starts at the same slot, this feature
                // never had candidates of its own
                if found_candidates
                    && (feat == self.feature_count - 1
                        || start != self.feat_start_id[feat + 1]) {
                    sink.push(&self.positions[start]);
                }
            }
        }

        if let Some(sink) = unlabeled {
            for position in &self.positions_no_candidates {
                sink.push(position);
            }
        }

        placements
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::Cell;

    use geo::{Coord, Point};

    use crate::feature::{Feature, FeatureGeometry, OverlapHandling};
    use crate::geometry::doubles_near;

    fn extent() -> Rect<f64> {
        Rect::new(Coord { x: -1000., y: -1000. }, Coord { x: 1000., y: 1000. })
    }

    /// one feature per entry: 10x10 candidates given as (xmin, ymin, cost),
    /// plus the feature's inactive cost
    fn build_problem(engine:Rc<Engine>, feats:Vec<(Vec<(f64, f64, f64)>, f64)>,
                     display_all:bool) -> Problem {
        let mut flat = Vec::new();
        let mut nb_lp = Vec::new();
        let mut inactive = Vec::new();
        for (feat, (candidates, inactive_cost)) in feats.into_iter().enumerate() {
            let feature = Rc::new(Feature::new(feat as u64,
                FeatureGeometry::Point(Point::new(0., 0.))));
            nb_lp.push(candidates.len());
            inactive.push(inactive_cost);
            for (x, y, cost) in candidates {
                let id = flat.len();
                flat.push(LabelPosition::axis_parallel(id, feat, feature.clone(),
                    x, y, 10., 10., cost));
            }
        }
        Problem::new(engine, extent(), flat, nb_lp, inactive, display_all).unwrap()
    }

    #[test]
    fn test_invalid_input() {
        let engine = Rc::new(Engine::with_default_oracle());
        let feature = Rc::new(Feature::new(0, FeatureGeometry::Point(Point::new(0., 0.))));
        let candidates = vec![
            LabelPosition::axis_parallel(0, 0, feature, 0., 0., 10., 10., 0.1),
        ];
        let result = Problem::new(engine, extent(), candidates, vec![2], vec![1.0], false);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_single_feature_placed() {
        let engine = Rc::new(Engine::with_default_oracle());
        let mut problem = build_problem(engine, vec![
            (vec![(0., 0., 0.0021)], 10.0),
        ], false);
        problem.reduce();
        problem.chain_search();
        assert_eq!(problem.active_labels(), &[Some(0)]);
        let mut unlabeled = Vec::new();
        let placements = problem.get_solution(false, Some(&mut unlabeled));
        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].id(), 0);
        assert!(unlabeled.is_empty());
    }

    #[test]
    fn test_overlap_counts_seeded() {
        let engine = Rc::new(Engine::with_default_oracle());
        let problem = build_problem(engine, vec![
            (vec![(0., 0., 0.1), (300., 0., 5.0)], 10.0),
            (vec![(5., 5., 0.2), (600., 0., 5.0)], 10.0),
        ], false);
        assert_eq!(problem.position(0).num_overlaps(), 1);
        assert_eq!(problem.position(1).num_overlaps(), 0);
        assert_eq!(problem.position(2).num_overlaps(), 1);
        assert_eq!(problem.position(3).num_overlaps(), 0);
        assert_eq!(problem.nb_overlaps(), 1);
    }

    #[test]
    fn test_reduce_locks_conflict_free_candidates() {
        let engine = Rc::new(Engine::with_default_oracle());
        let mut problem = build_problem(engine, vec![
            // best candidate conflict-free, worse one conflicting
            (vec![(0., 0., 0.1), (100., 0., 0.5)], 10.0),
            // best candidate conflicting with the sibling above, worse one free
            (vec![(105., 0., 0.2), (200., 0., 0.9)], 10.0),
        ], false);
        problem.reduce();
        // locking feature 0 at its best frees feature 1's best, which locks too
        assert_eq!(problem.total_candidates(), 2);
        assert_eq!(problem.nb_candidates(0), 1);
        assert_eq!(problem.nb_candidates(1), 1);
        assert_eq!(problem.position(2).num_overlaps(), 0);
        problem.chain_search();
        assert_eq!(problem.active_labels(), &[Some(0), Some(2)]);
        assert!(doubles_near(problem.solution_cost(), 0.3, EPSILON));
    }

    #[test]
    fn test_mutual_conflict_resolved_by_chains() {
        let engine = Rc::new(Engine::with_default_oracle());
        let mut problem = build_problem(engine, vec![
            (vec![(0., 0., 0.1), (300., 0., 5.0)], 10.0),
            (vec![(5., 5., 0.2), (600., 0., 5.0)], 10.0),
        ], false);
        problem.chain_search();
        // whichever greedy tie-break happened, the chains settle on one
        // cheap label plus one expensive alternative
        let labels = problem.active_labels();
        assert!(labels[0].is_some() && labels[1].is_some());
        assert!(doubles_near(problem.solution_cost(), 5.1, EPSILON));
        let a = problem.position(labels[0].unwrap());
        let b = problem.position(labels[1].unwrap());
        assert!(!a.intersects(b));
    }

    #[test]
    fn test_chain_search_idempotent_at_fixed_point() {
        let engine = Rc::new(Engine::with_default_oracle());
        let mut problem = build_problem(engine, vec![
            (vec![(0., 0., 0.1), (300., 0., 5.0)], 10.0),
            (vec![(5., 5., 0.2), (600., 0., 5.0)], 10.0),
            (vec![(900., 0., 0.4)], 10.0),
        ], false);
        problem.chain_search();
        let first = problem.active_labels().to_vec();
        let first_cost = problem.solution_cost();
        problem.chain_search();
        assert_eq!(problem.active_labels(), first.as_slice());
        assert!(doubles_near(problem.solution_cost(), first_cost, EPSILON));
    }

    #[test]
    fn test_cancellation_mid_falp() {
        let mut engine = Engine::with_default_oracle();
        let polls = Rc::new(Cell::new(0usize));
        let counter = polls.clone();
        engine.set_cancel_callback(Rc::new(move || {
            counter.set(counter.get() + 1);
            counter.get() > 10
        }));
        let feats = (0..100).map(|i| (vec![(i as f64 * 50., 0., 0.1)], 10.0)).collect();
        let mut problem = build_problem(Rc::new(engine), feats, false);
        problem.init_sol_falp();
        let placed = problem.active_labels().iter().filter(|l| l.is_some()).count();
        assert_eq!(placed, 10);
    }

    #[test]
    fn test_display_all_places_everything() {
        let engine = Rc::new(Engine::with_default_oracle());
        let mut problem = build_problem(engine, vec![
            (vec![(0., 0., 0.1)], 10.0),
            (vec![(5., 5., 0.2)], 10.0),
        ], true);
        problem.init_sol_falp();
        assert!(problem.active_labels().iter().all(|l| l.is_some()));
        assert_eq!(problem.get_solution(false, None).len(), 2);
    }

    #[test]
    fn test_unlabeled_reporting() {
        let engine = Rc::new(Engine::with_default_oracle());
        let mut problem = build_problem(engine, vec![
            (vec![(0., 0., 0.1)], 10.0),
            (vec![(5., 5., 0.2)], 10.0),
        ], false);
        problem.init_sol_falp();
        let mut unlabeled = Vec::new();
        let placements = problem.get_solution(false, Some(&mut unlabeled));
        assert_eq!(placements.len(), 1);
        assert_eq!(unlabeled.len(), 1);
        // asking for inactive placements returns both labels instead
        let placements = problem.get_solution(true, None);
        assert_eq!(placements.len(), 2);
    }

    #[test]
    fn test_always_show_feature_emitted() {
        let engine = Rc::new(Engine::with_default_oracle());
        let mut always = Feature::new(1, FeatureGeometry::Point(Point::new(0., 0.)));
        always.set_always_show(true);
        let always = Rc::new(always);
        let other = Rc::new(Feature::new(0, FeatureGeometry::Point(Point::new(0., 0.))));
        let candidates = vec![
            LabelPosition::axis_parallel(0, 0, other, 0., 0., 10., 10., 0.1),
            LabelPosition::axis_parallel(1, 1, always, 5., 5., 10., 10., 0.2),
        ];
        let mut problem = Problem::new(engine, extent(), candidates,
            vec![1, 1], vec![10.0, 10.0], false).unwrap();
        problem.init_sol_falp();
        let placements = problem.get_solution(false, None);
        assert_eq!(placements.len(), 2);
    }

    #[test]
    fn test_overlap_if_required_emitted() {
        let engine = Rc::new(Engine::with_default_oracle());
        let mut lenient = Feature::new(1, FeatureGeometry::Point(Point::new(0., 0.)));
        lenient.set_overlap_handling(OverlapHandling::AllowIfRequired);
        let lenient = Rc::new(lenient);
        let other = Rc::new(Feature::new(0, FeatureGeometry::Point(Point::new(0., 0.))));
        let candidates = vec![
            LabelPosition::axis_parallel(0, 0, other, 0., 0., 10., 10., 0.1),
            LabelPosition::axis_parallel(1, 1, lenient, 5., 5., 10., 10., 0.2),
        ];
        let mut problem = Problem::new(engine, extent(), candidates,
            vec![1, 1], vec![10.0, 10.0], false).unwrap();
        problem.init_sol_falp();
        assert_eq!(problem.get_solution(false, None).len(), 2);
    }
}
