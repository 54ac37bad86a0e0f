//! In-memory host implementation.
//!
//! [`MemoryHost`] implements every capability trait over a shared
//! `Arc<Mutex<Inner>>`, so one host can be cloned into the controller (as
//! placement/interaction/registration handles) while the panel keeps a clone
//! as its scene registry. Used by the standalone demo and integration tests;
//! a real embedding supplies its own implementations instead.

use std::sync::{Arc, Mutex};

use crate::host::{
    CommandError, CommandParams, CommandRunner, FiducialRegistration, InteractionMode,
    InteractionState, NodeHandle, NodeId, NodeKind, PlacementTarget, RegistrationError,
    SceneRegistry,
};

#[derive(Clone)]
pub struct MemoryHost {
    inner: Arc<Mutex<MemoryHostInner>>,
}

struct MemoryHostInner {
    nodes: Vec<NodeHandle>,
    next_id: u32,
    active_target: Option<NodeId>,
    interaction: InteractionState,
    place_persistent: bool,
    /// (moving, fixed) pairs handed to the registration routine.
    registrations: Vec<(NodeId, NodeId)>,
    /// (module, params) records handed to the command runner.
    commands: Vec<(String, CommandParams)>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemoryHostInner {
                nodes: Vec::new(),
                next_id: 1,
                active_target: None,
                interaction: InteractionState::ViewTransform,
                place_persistent: false,
                registrations: Vec::new(),
                commands: Vec::new(),
            })),
        }
    }

    /// Add a node and return its handle.
    pub fn add_node(&self, kind: NodeKind, name: &str) -> NodeHandle {
        let mut inner = self.inner.lock().unwrap();
        inner.push_node(kind, name)
    }

    /// Whether the host ever left placement mode persistent.
    pub fn place_persistent(&self) -> bool {
        self.inner.lock().unwrap().place_persistent
    }

    /// Registration invocations recorded so far.
    pub fn registrations(&self) -> Vec<(NodeId, NodeId)> {
        self.inner.lock().unwrap().registrations.clone()
    }

    /// Command invocations recorded so far.
    pub fn commands(&self) -> Vec<(String, CommandParams)> {
        self.inner.lock().unwrap().commands.clone()
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHostInner {
    fn push_node(&mut self, kind: NodeKind, name: &str) -> NodeHandle {
        let id = NodeId::new(format!("node-{}", self.next_id));
        self.next_id += 1;
        let handle = NodeHandle {
            id,
            name: name.to_string(),
            kind,
        };
        self.nodes.push(handle.clone());
        handle
    }
}

impl SceneRegistry for MemoryHost {
    fn nodes(&self, kind: NodeKind) -> Vec<NodeHandle> {
        self.inner
            .lock()
            .unwrap()
            .nodes
            .iter()
            .filter(|n| n.kind == kind)
            .cloned()
            .collect()
    }

    fn node(&self, id: &NodeId) -> Option<NodeHandle> {
        self.inner
            .lock()
            .unwrap()
            .nodes
            .iter()
            .find(|n| &n.id == id)
            .cloned()
    }

    fn create(&mut self, kind: NodeKind, name: &str) -> NodeHandle {
        self.inner.lock().unwrap().push_node(kind, name)
    }

    fn remove(&mut self, id: &NodeId) {
        self.inner.lock().unwrap().nodes.retain(|n| &n.id != id);
    }
}

impl PlacementTarget for MemoryHost {
    fn set_target(&mut self, id: &NodeId) {
        self.inner.lock().unwrap().active_target = Some(id.clone());
    }

    fn clear_target(&mut self) {
        self.inner.lock().unwrap().active_target = None;
    }

    fn target(&self) -> Option<NodeId> {
        self.inner.lock().unwrap().active_target.clone()
    }
}

impl InteractionMode for MemoryHost {
    fn enter_placement(&mut self, persistent: bool) {
        let mut inner = self.inner.lock().unwrap();
        inner.interaction = InteractionState::Place;
        inner.place_persistent = persistent;
    }

    fn leave_placement(&mut self) {
        self.inner.lock().unwrap().interaction = InteractionState::ViewTransform;
    }

    fn state(&self) -> InteractionState {
        self.inner.lock().unwrap().interaction
    }
}

impl FiducialRegistration for MemoryHost {
    fn register(&mut self, moving: &NodeId, fixed: &NodeId) -> Result<(), RegistrationError> {
        self.inner
            .lock()
            .unwrap()
            .registrations
            .push((moving.clone(), fixed.clone()));
        Ok(())
    }
}

impl CommandRunner for MemoryHost {
    fn run_blocking(&mut self, module: &str, params: &CommandParams) -> Result<(), CommandError> {
        self.inner
            .lock()
            .unwrap()
            .commands
            .push((module.to_string(), params.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nodes_are_filtered_by_kind() {
        let mut host = MemoryHost::new();
        host.add_node(NodeKind::Model, "tracker scan");
        host.add_node(NodeKind::FiducialSet, "moving");
        let created = host.create(NodeKind::Model, "template");

        assert_eq!(host.nodes(NodeKind::Model).len(), 2);
        assert_eq!(host.nodes(NodeKind::FiducialSet).len(), 1);
        assert_eq!(host.node(&created.id), Some(created.clone()));

        host.remove(&created.id);
        assert_eq!(host.nodes(NodeKind::Model).len(), 1);
        assert_eq!(host.node(&created.id), None);
    }

    #[test]
    fn clones_share_state() {
        let host = MemoryHost::new();
        let mut clone: MemoryHost = host.clone();
        let set = host.add_node(NodeKind::FiducialSet, "moving");

        clone.set_target(&set.id);
        assert_eq!(host.target(), Some(set.id));

        clone.enter_placement(true);
        assert_eq!(host.state(), InteractionState::Place);
        assert!(host.place_persistent());
    }
}
