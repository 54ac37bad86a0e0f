//! Selection state for the pre-alignment workflow.

use crate::host::NodeId;

/// Which of the two fiducial sets a placement action targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FiducialRole {
    /// Fiducials placed on the scanned (moving) tracker model.
    Moving,
    /// Fiducials placed on the template (fixed) tracker model.
    Fixed,
}

/// The four node references the user picks before pre-alignment can run.
///
/// Each slot is either unset or bound to a host node handle; the slots are
/// transient mirrors of the externally-owned scene graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Segmented optical scan of the tracker.
    pub optical_model: Option<NodeId>,
    /// Template model of the tracker.
    pub template_model: Option<NodeId>,
    /// Fiducial set placed on the optical scan.
    pub moving_fiducials: Option<NodeId>,
    /// Fiducial set placed on the template model.
    pub fixed_fiducials: Option<NodeId>,
}

impl Selection {
    /// The fiducial set bound for the given role, if any.
    pub fn fiducials(&self, role: FiducialRole) -> Option<&NodeId> {
        match role {
            FiducialRole::Moving => self.moving_fiducials.as_ref(),
            FiducialRole::Fixed => self.fixed_fiducials.as_ref(),
        }
    }

    /// Both model references set and distinct. Identity comparison only.
    pub fn models_distinct(&self) -> bool {
        match (&self.optical_model, &self.template_model) {
            (Some(a), Some(b)) => a != b,
            _ => false,
        }
    }

    /// Both fiducial-set references set and distinct.
    pub fn fiducials_distinct(&self) -> bool {
        match (&self.moving_fiducials, &self.fixed_fiducials) {
            (Some(a), Some(b)) => a != b,
            _ => false,
        }
    }

    /// All four references set, models distinct, fiducial sets distinct.
    /// This is the selection half of the controller's `ready` predicate.
    pub fn is_complete_and_distinct(&self) -> bool {
        self.models_distinct() && self.fiducials_distinct()
    }

    /// Clear all four slots.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> Option<NodeId> {
        Some(NodeId::new(s))
    }

    fn full() -> Selection {
        Selection {
            optical_model: id("m-optical"),
            template_model: id("m-template"),
            moving_fiducials: id("f-moving"),
            fixed_fiducials: id("f-fixed"),
        }
    }

    #[test]
    fn empty_selection_is_not_ready() {
        assert!(!Selection::default().is_complete_and_distinct());
    }

    #[test]
    fn full_distinct_selection_is_ready() {
        assert!(full().is_complete_and_distinct());
    }

    #[test]
    fn identical_models_block_readiness() {
        // Scenario from the workflow: both model slots bound to M1.
        let mut s = full();
        s.template_model = s.optical_model.clone();
        assert!(!s.is_complete_and_distinct());
        assert!(s.fiducials_distinct());
    }

    #[test]
    fn identical_fiducial_sets_block_readiness() {
        let mut s = full();
        s.fixed_fiducials = s.moving_fiducials.clone();
        assert!(!s.is_complete_and_distinct());
        assert!(s.models_distinct());
    }

    #[test]
    fn any_missing_slot_blocks_readiness() {
        for slot in 0..4 {
            let mut s = full();
            match slot {
                0 => s.optical_model = None,
                1 => s.template_model = None,
                2 => s.moving_fiducials = None,
                _ => s.fixed_fiducials = None,
            }
            assert!(!s.is_complete_and_distinct(), "slot {slot} unset");
        }
    }

    #[test]
    fn fiducials_by_role() {
        let s = full();
        assert_eq!(s.fiducials(FiducialRole::Moving), s.moving_fiducials.as_ref());
        assert_eq!(s.fiducials(FiducialRole::Fixed), s.fixed_fiducials.as_ref());
        assert_eq!(Selection::default().fiducials(FiducialRole::Moving), None);
    }

    #[test]
    fn clear_resets_all_slots() {
        let mut s = full();
        s.clear();
        assert_eq!(s, Selection::default());
    }
}
