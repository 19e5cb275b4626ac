use rstar::{RTree, RTreeObject, AABB};

/// (candidate id, bounding box) entry; the index never owns candidates
#[derive(Debug, Clone, PartialEq)]
struct IndexEntry {
    id: usize,
    env: AABB<[f64; 2]>,
}

impl RTreeObject for IndexEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope { self.env }
}

fn envelope_of(bbox:(f64, f64, f64, f64)) -> AABB<[f64; 2]> {
    let (xmin, ymin, xmax, ymax) = bbox;
    AABB::from_corners([xmin, ymin], [xmax, ymax])
}

/** spatial index over candidate bounding boxes.

Keys are candidate ids; removal needs the same bounding box the entry was
inserted with. Range queries return the hit ids as a vector, so callers
are free to mutate candidates (or the index itself) while consuming the
hits. */
#[derive(Debug, Default)]
pub struct CandidateIndex {
    tree: RTree<IndexEntry>,
}

impl CandidateIndex {

    /// empty index
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// indexes a candidate under its bounding box
    pub fn insert(&mut self, id:usize, bbox:(f64, f64, f64, f64)) {
        self.tree.insert(IndexEntry { id, env: envelope_of(bbox) });
    }

    /// removes a candidate; true iff it was indexed
    pub fn remove(&mut self, id:usize, bbox:(f64, f64, f64, f64)) -> bool {
        self.tree.remove(&IndexEntry { id, env: envelope_of(bbox) }).is_some()
    }

    /// ids of every indexed candidate whose bounding box intersects the rectangle
    pub fn intersecting(&self, bbox:(f64, f64, f64, f64)) -> Vec<usize> {
        self.tree
            .locate_in_envelope_intersecting(&envelope_of(bbox))
            .map(|entry| entry.id)
            .collect()
    }

    /// iterates over every indexed id
    pub fn iter_ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.tree.iter().map(|entry| entry.id)
    }

    /// number of indexed candidates
    pub fn len(&self) -> usize { self.tree.size() }

    /// true iff nothing is indexed
    pub fn is_empty(&self) -> bool { self.tree.size() == 0 }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_query_remove() {
        let mut index = CandidateIndex::new();
        index.insert(0, (0., 0., 10., 10.));
        index.insert(1, (5., 5., 15., 15.));
        index.insert(2, (100., 100., 110., 110.));
        assert_eq!(index.len(), 3);

        let mut hits = index.intersecting((8., 8., 9., 9.));
        hits.sort_unstable();
        assert_eq!(hits, vec![0, 1]);

        assert!(index.remove(1, (5., 5., 15., 15.)));
        assert!(!index.remove(1, (5., 5., 15., 15.))); // already gone
        let hits = index.intersecting((8., 8., 9., 9.));
        assert_eq!(hits, vec![0]);
    }

    #[test]
    fn test_touching_boxes_intersect() {
        let mut index = CandidateIndex::new();
        index.insert(7, (0., 0., 10., 10.));
        // shared edge counts as an intersection
        assert_eq!(index.intersecting((10., 0., 20., 10.)), vec![7]);
    }

    #[test]
    fn test_iteration() {
        let mut index = CandidateIndex::new();
        for id in 0..5 {
            index.insert(id, (id as f64, 0., id as f64 + 1., 1.));
        }
        let mut ids: Vec<usize> = index.iter_ids().collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    }
}
