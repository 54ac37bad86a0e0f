//! Selection & placement controller for the pre-alignment workflow.
//!
//! The controller tracks which four scene nodes are chosen (optical model,
//! template model, moving and fixed fiducial sets), derives a `ready` flag
//! from them, and drives the host's placement-target register and
//! interaction mode through the injected capability traits. It is a strict
//! two-state machine over the `placing` flag: `Idle -> Placing` on
//! toggle-while-idle, `Placing -> Idle` on toggle-while-placing or on any
//! selection change.

use crate::events::{
    AlignEvent, EventController, EventKind, PlacementMeta, RegistrationMeta, SelectionMeta,
};
use crate::host::{FiducialRegistration, InteractionMode, NodeId, PlacementTarget, RegistrationError};
use crate::selection::{FiducialRole, Selection};

pub struct PreAlignController {
    selection: Selection,
    placing: bool,
    ready: bool,

    placement: Box<dyn PlacementTarget>,
    interaction: Box<dyn InteractionMode>,
    registration: Box<dyn FiducialRegistration>,
    events: EventController,
}

impl PreAlignController {
    /// Build a controller over the injected host capabilities.
    pub fn new(
        placement: Box<dyn PlacementTarget>,
        interaction: Box<dyn InteractionMode>,
        registration: Box<dyn FiducialRegistration>,
    ) -> Self {
        Self {
            selection: Selection::default(),
            placing: false,
            ready: false,
            placement,
            interaction,
            registration,
            events: EventController::new(),
        }
    }

    /// Current selection snapshot.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// True iff all four references are set, models distinct, fiducial sets
    /// distinct, and placement mode is not active.
    pub fn ready(&self) -> bool {
        self.ready
    }

    /// Whether placement mode is currently active.
    pub fn placing(&self) -> bool {
        self.placing
    }

    /// Event hub for subscribing to controller activity.
    pub fn events(&self) -> &EventController {
        &self.events
    }

    pub fn set_optical_model(&mut self, node: Option<NodeId>) {
        self.selection.optical_model = node;
        self.on_selection_changed();
    }

    pub fn set_template_model(&mut self, node: Option<NodeId>) {
        self.selection.template_model = node;
        self.on_selection_changed();
    }

    pub fn set_moving_fiducials(&mut self, node: Option<NodeId>) {
        self.selection.moving_fiducials = node;
        self.on_selection_changed();
    }

    pub fn set_fixed_fiducials(&mut self, node: Option<NodeId>) {
        self.selection.fixed_fiducials = node;
        self.on_selection_changed();
    }

    /// React to a selection change: unconditionally stop placement mode and
    /// recompute readiness. An incomplete or invalid selection is never an
    /// error, it only reads back as `ready() == false`.
    pub fn on_selection_changed(&mut self) {
        let was_placing = self.placing;
        self.stop_placing();

        let mut kinds = EventKind::SELECTION_CHANGED;
        if was_placing {
            kinds |= EventKind::PLACEMENT_STOPPED;
        }
        if self.recompute_ready() {
            kinds |= EventKind::READY_CHANGED;
        }

        log::debug!(
            "selection changed: ready={} (was_placing={was_placing})",
            self.ready
        );

        let mut evt = AlignEvent::new(kinds);
        evt.selection = Some(SelectionMeta {
            selection: self.selection.clone(),
            ready: self.ready,
        });
        if was_placing {
            evt.placement = Some(PlacementMeta {
                target: None,
                role: None,
            });
        }
        self.events.emit(evt);
    }

    /// Toggle fiducial placement against the set bound for `role`.
    ///
    /// Idle: makes that set the host's active placement destination and
    /// enters persistent point-placement mode. Placing: clears the
    /// destination and returns the host to view/navigate mode. Toggling a
    /// role whose set is unbound is a no-op.
    pub fn toggle_placement(&mut self, role: FiducialRole) {
        if self.placing {
            self.stop_placing();
            let changed = self.recompute_ready();
            let mut kinds = EventKind::PLACEMENT_STOPPED;
            if changed {
                kinds |= EventKind::READY_CHANGED;
            }
            log::debug!("placement stopped ({role:?})");
            let mut evt = AlignEvent::new(kinds);
            evt.placement = Some(PlacementMeta {
                target: None,
                role: Some(role),
            });
            self.events.emit(evt);
            return;
        }

        let Some(target) = self.selection.fiducials(role).cloned() else {
            log::debug!("placement toggle ignored: no {role:?} fiducial set selected");
            return;
        };

        self.placement.set_target(&target);
        self.interaction.enter_placement(true);
        self.placing = true;

        let mut kinds = EventKind::PLACEMENT_STARTED;
        if self.recompute_ready() {
            kinds |= EventKind::READY_CHANGED;
        }
        log::debug!("placement started on {target} ({role:?})");
        let mut evt = AlignEvent::new(kinds);
        evt.placement = Some(PlacementMeta {
            target: Some(target),
            role: Some(role),
        });
        self.events.emit(evt);
    }

    /// Forward the moving and fixed fiducial sets to the host's built-in
    /// fiducial registration routine. Correspondence, transform estimation
    /// and failure handling for degenerate point sets are entirely the
    /// host's responsibility.
    pub fn request_registration(&mut self) -> Result<(), RegistrationError> {
        let (moving, fixed) = match (
            self.selection.moving_fiducials.clone(),
            self.selection.fixed_fiducials.clone(),
        ) {
            (Some(m), Some(f)) => (m, f),
            _ => return Err(RegistrationError::SelectionIncomplete),
        };

        let mut evt = AlignEvent::new(EventKind::REGISTRATION_REQUESTED);
        evt.registration = Some(RegistrationMeta {
            moving: moving.clone(),
            fixed: fixed.clone(),
            error: None,
        });
        self.events.emit(evt);

        match self.registration.register(&moving, &fixed) {
            Ok(()) => {
                log::debug!("fiducial registration complete ({moving} -> {fixed})");
                let mut evt = AlignEvent::new(EventKind::REGISTRATION_COMPLETE);
                evt.registration = Some(RegistrationMeta {
                    moving,
                    fixed,
                    error: None,
                });
                self.events.emit(evt);
                Ok(())
            }
            Err(err) => {
                log::debug!("fiducial registration failed: {err}");
                let mut evt = AlignEvent::new(EventKind::REGISTRATION_FAILED);
                evt.registration = Some(RegistrationMeta {
                    moving,
                    fixed,
                    error: Some(err.to_string()),
                });
                self.events.emit(evt);
                Err(err)
            }
        }
    }

    /// Force placement off and restore the host to navigation. Always clears
    /// the host target register, even when already idle.
    fn stop_placing(&mut self) {
        self.placement.clear_target();
        self.interaction.leave_placement();
        self.placing = false;
    }

    /// Recompute the cached `ready` flag; returns whether it flipped.
    fn recompute_ready(&mut self) -> bool {
        let next = self.selection.is_complete_and_distinct() && !self.placing;
        let changed = next != self.ready;
        self.ready = next;
        changed
    }
}
