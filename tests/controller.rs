use prealign::{
    EventFilter, EventKind, FiducialRegistration, FiducialRole, InteractionMode, InteractionState,
    MemoryHost, NodeId, NodeKind, PlacementTarget, PreAlignController, RegistrationError,
};

fn controller_with(host: &MemoryHost) -> PreAlignController {
    PreAlignController::new(
        Box::new(host.clone()),
        Box::new(host.clone()),
        Box::new(host.clone()),
    )
}

struct Scene {
    host: MemoryHost,
    optical: NodeId,
    template: NodeId,
    moving: NodeId,
    fixed: NodeId,
}

fn scene() -> Scene {
    let host = MemoryHost::new();
    let optical = host.add_node(NodeKind::Model, "tracker scan").id;
    let template = host.add_node(NodeKind::Model, "tracker template").id;
    let moving = host.add_node(NodeKind::FiducialSet, "moving fiducials").id;
    let fixed = host.add_node(NodeKind::FiducialSet, "fixed fiducials").id;
    Scene {
        host,
        optical,
        template,
        moving,
        fixed,
    }
}

fn select_all(ctrl: &mut PreAlignController, s: &Scene) {
    ctrl.set_optical_model(Some(s.optical.clone()));
    ctrl.set_template_model(Some(s.template.clone()));
    ctrl.set_moving_fiducials(Some(s.moving.clone()));
    ctrl.set_fixed_fiducials(Some(s.fixed.clone()));
}

#[test]
fn empty_selection_is_not_ready() {
    let s = scene();
    let ctrl = controller_with(&s.host);
    assert!(!ctrl.ready());
    assert!(!ctrl.placing());
}

#[test]
fn full_distinct_selection_is_ready() {
    let s = scene();
    let mut ctrl = controller_with(&s.host);
    select_all(&mut ctrl, &s);
    assert!(ctrl.ready());
}

#[test]
fn identical_models_are_not_ready() {
    // opticalModel and templateModel bound to the same node M1.
    let s = scene();
    let mut ctrl = controller_with(&s.host);
    ctrl.set_optical_model(Some(s.optical.clone()));
    ctrl.set_template_model(Some(s.optical.clone()));
    ctrl.set_moving_fiducials(Some(s.moving.clone()));
    ctrl.set_fixed_fiducials(Some(s.fixed.clone()));
    assert!(!ctrl.ready());
}

#[test]
fn identical_fiducial_sets_are_not_ready() {
    let s = scene();
    let mut ctrl = controller_with(&s.host);
    select_all(&mut ctrl, &s);
    ctrl.set_fixed_fiducials(Some(s.moving.clone()));
    assert!(!ctrl.ready());
}

#[test]
fn toggle_enters_placement_mode() {
    let s = scene();
    let mut ctrl = controller_with(&s.host);
    select_all(&mut ctrl, &s);

    ctrl.toggle_placement(FiducialRole::Moving);

    assert!(ctrl.placing());
    assert!(!ctrl.ready(), "placing suppresses readiness");
    assert_eq!(s.host.target(), Some(s.moving.clone()));
    assert_eq!(s.host.state(), InteractionState::Place);
    assert!(s.host.place_persistent());
}

#[test]
fn double_toggle_returns_to_idle() {
    let s = scene();
    let mut ctrl = controller_with(&s.host);
    select_all(&mut ctrl, &s);

    ctrl.toggle_placement(FiducialRole::Fixed);
    ctrl.toggle_placement(FiducialRole::Fixed);

    assert!(!ctrl.placing());
    assert!(ctrl.ready());
    assert_eq!(s.host.target(), None);
    assert_eq!(s.host.state(), InteractionState::ViewTransform);
}

#[test]
fn either_button_stops_an_active_placement() {
    let s = scene();
    let mut ctrl = controller_with(&s.host);
    select_all(&mut ctrl, &s);

    ctrl.toggle_placement(FiducialRole::Moving);
    ctrl.toggle_placement(FiducialRole::Fixed);

    assert!(!ctrl.placing());
    assert_eq!(s.host.target(), None);
}

#[test]
fn selection_change_stops_placement() {
    let s = scene();
    let mut ctrl = controller_with(&s.host);
    select_all(&mut ctrl, &s);

    ctrl.toggle_placement(FiducialRole::Moving);
    assert!(ctrl.placing());

    // Any change to the selection forces the machine back to Idle.
    let other = s.host.add_node(NodeKind::Model, "another model").id;
    ctrl.set_template_model(Some(other));

    assert!(!ctrl.placing());
    assert_eq!(s.host.target(), None);
    assert_eq!(s.host.state(), InteractionState::ViewTransform);
}

#[test]
fn notification_without_a_change_also_stops_placement() {
    let s = scene();
    let mut ctrl = controller_with(&s.host);
    select_all(&mut ctrl, &s);

    ctrl.toggle_placement(FiducialRole::Moving);
    ctrl.on_selection_changed();

    assert!(!ctrl.placing());
    assert!(ctrl.ready());
}

#[test]
fn toggle_without_a_bound_set_is_a_no_op() {
    let s = scene();
    let mut ctrl = controller_with(&s.host);

    ctrl.toggle_placement(FiducialRole::Moving);

    assert!(!ctrl.placing());
    assert_eq!(s.host.target(), None);
    assert_eq!(s.host.state(), InteractionState::ViewTransform);
}

#[test]
fn registration_forwards_both_fiducial_sets() {
    let s = scene();
    let mut ctrl = controller_with(&s.host);
    select_all(&mut ctrl, &s);

    ctrl.request_registration().unwrap();

    let regs = s.host.registrations();
    assert_eq!(regs.len(), 1);
    assert_eq!(regs[0], (s.moving.clone(), s.fixed.clone()));
}

#[test]
fn registration_with_incomplete_selection_fails() {
    let s = scene();
    let mut ctrl = controller_with(&s.host);
    ctrl.set_moving_fiducials(Some(s.moving.clone()));

    let err = ctrl.request_registration().unwrap_err();
    assert!(matches!(err, RegistrationError::SelectionIncomplete));
    assert!(s.host.registrations().is_empty());
}

struct FailingRegistration;

impl FiducialRegistration for FailingRegistration {
    fn register(&mut self, _moving: &NodeId, _fixed: &NodeId) -> Result<(), RegistrationError> {
        Err(RegistrationError::Host("degenerate point set".to_string()))
    }
}

#[test]
fn registration_failure_propagates_and_is_reported() {
    let s = scene();
    let mut ctrl = PreAlignController::new(
        Box::new(s.host.clone()),
        Box::new(s.host.clone()),
        Box::new(FailingRegistration),
    );
    select_all(&mut ctrl, &s);
    let rx = ctrl
        .events()
        .subscribe(EventFilter::only(EventKind::REGISTRATION_FAILED));

    let err = ctrl.request_registration().unwrap_err();
    assert!(matches!(err, RegistrationError::Host(_)));

    let evt = rx.try_recv().unwrap();
    let meta = evt.registration.unwrap();
    assert_eq!(meta.moving, s.moving);
    assert!(meta.error.unwrap().contains("degenerate"));
}

#[test]
fn events_report_placement_transitions() {
    let s = scene();
    let mut ctrl = controller_with(&s.host);
    select_all(&mut ctrl, &s);

    let rx = ctrl.events().subscribe(EventFilter::only(
        EventKind::PLACEMENT_STARTED | EventKind::PLACEMENT_STOPPED,
    ));

    ctrl.toggle_placement(FiducialRole::Moving);
    let started = rx.try_recv().unwrap();
    assert!(started.kinds.contains(EventKind::PLACEMENT_STARTED));
    let meta = started.placement.unwrap();
    assert_eq!(meta.target, Some(s.moving.clone()));
    assert_eq!(meta.role, Some(FiducialRole::Moving));

    // Stopping via a selection change is also a PLACEMENT_STOPPED event.
    ctrl.set_optical_model(Some(s.template.clone()));
    let stopped = rx.try_recv().unwrap();
    assert!(stopped.kinds.contains(EventKind::PLACEMENT_STOPPED));
    assert!(stopped.kinds.contains(EventKind::SELECTION_CHANGED));
}

#[test]
fn ready_changed_fires_on_transitions_only() {
    let s = scene();
    let mut ctrl = controller_with(&s.host);
    let rx = ctrl
        .events()
        .subscribe(EventFilter::only(EventKind::READY_CHANGED));

    ctrl.set_optical_model(Some(s.optical.clone()));
    ctrl.set_template_model(Some(s.template.clone()));
    ctrl.set_moving_fiducials(Some(s.moving.clone()));
    assert!(rx.try_recv().is_err(), "still not ready, no transition yet");

    ctrl.set_fixed_fiducials(Some(s.fixed.clone()));
    let evt = rx.try_recv().unwrap();
    assert!(evt.selection.unwrap().ready);
    assert!(rx.try_recv().is_err());
}
