use std::fmt;
use std::rc::Rc;

use crate::label_position::LabelPosition;

/// revision of the placement cost rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementVersion {
    /// original rules: no hard obstacle conflicts
    Version1,
    /// current rules: obstacles may outrank low-priority features
    Version2,
}

/** decides whether two candidates cannot both be placed.

The predicate must be symmetric and non-reflexive; the solver never calls
it with two candidates of the same feature carrying the same id, and
caches nothing. */
pub trait ConflictOracle {
    /// true iff the two candidates cannot both be placed
    fn conflicts(&self, a:&LabelPosition, b:&LabelPosition) -> bool;
}

/** default oracle: candidates of two distinct features conflict iff their
rectangles intersect */
#[derive(Debug, Default)]
pub struct RectOverlapOracle;

impl ConflictOracle for RectOverlapOracle {
    fn conflicts(&self, a:&LabelPosition, b:&LabelPosition) -> bool {
        a.feature_index() != b.feature_index() && a.intersects(b)
    }
}

/** the solve context: conflict oracle, cooperative cancellation,
placement rules revision and the ejection chain degree bound */
pub struct Engine {
    /// conflict predicate supplied by the host
    oracle: Rc<dyn ConflictOracle>,
    /// polled by the solver at coarse boundaries
    cancel: Option<Rc<dyn Fn() -> bool>>,
    /// revision of the placement cost rules
    version: PlacementVersion,
    /// maximum degree of an ejection chain
    max_chain_degree: usize,
}

impl Engine {

    /// constructor with the host's conflict oracle
    pub fn new(oracle:Rc<dyn ConflictOracle>) -> Self {
        Self {
            oracle,
            cancel: None,
            version: PlacementVersion::Version2,
            max_chain_degree: 50,
        }
    }

    /// constructor using the rectangle-overlap oracle
    pub fn with_default_oracle() -> Self {
        Self::new(Rc::new(RectOverlapOracle))
    }

    /// installs a cancellation callback
    pub fn set_cancel_callback(&mut self, cancel:Rc<dyn Fn() -> bool>) {
        self.cancel = Some(cancel);
    }

    /// sets the placement rules revision
    pub fn set_version(&mut self, version:PlacementVersion) { self.version = version; }

    /// placement rules revision
    pub fn version(&self) -> PlacementVersion { self.version }

    /// sets the maximum degree of an ejection chain
    pub fn set_max_chain_degree(&mut self, degree:usize) { self.max_chain_degree = degree; }

    /// maximum degree of an ejection chain
    pub fn max_chain_degree(&self) -> usize { self.max_chain_degree }

    /// true iff the host asked the solver to stop
    pub fn is_canceled(&self) -> bool {
        match &self.cancel {
            None => false,
            Some(cancel) => cancel(),
        }
    }

    /// true iff the two candidates cannot both be placed
    pub fn conflicts(&self, a:&LabelPosition, b:&LabelPosition) -> bool {
        self.oracle.conflicts(a, b)
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f:&mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("version", &self.version)
            .field("max_chain_degree", &self.max_chain_degree)
            .field("cancelable", &self.cancel.is_some())
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::Cell;
    use std::rc::Rc;

    use geo::Point;

    use crate::feature::{Feature, FeatureGeometry};

    #[test]
    fn test_default_oracle_symmetry() {
        let fa = Rc::new(Feature::new(0, FeatureGeometry::Point(Point::new(0., 0.))));
        let fb = Rc::new(Feature::new(1, FeatureGeometry::Point(Point::new(0., 0.))));
        let a = LabelPosition::axis_parallel(0, 0, fa.clone(), 0., 0., 10., 10., 0.1);
        let b = LabelPosition::axis_parallel(1, 1, fb, 5., 5., 10., 10., 0.1);
        let sibling = LabelPosition::axis_parallel(2, 0, fa, 5., 5., 10., 10., 0.1);
        let oracle = RectOverlapOracle;
        assert_eq!(oracle.conflicts(&a, &b), oracle.conflicts(&b, &a));
        assert!(oracle.conflicts(&a, &b));
        assert!(!oracle.conflicts(&a, &sibling)); // same feature never conflicts
    }

    #[test]
    fn test_cancellation_callback() {
        let mut engine = Engine::with_default_oracle();
        assert!(!engine.is_canceled());
        let flag = Rc::new(Cell::new(false));
        let polled = flag.clone();
        engine.set_cancel_callback(Rc::new(move || polled.get()));
        assert!(!engine.is_canceled());
        flag.set(true);
        assert!(engine.is_canceled());
    }
}
