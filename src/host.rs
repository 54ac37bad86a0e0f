//! Capability interfaces provided by the embedding host.
//!
//! The original host located its singletons (placement target register,
//! interaction mode node) through global string-keyed lookups. Here every
//! capability is an explicit trait that the embedder implements and injects
//! into [`PreAlignController`](crate::controller::PreAlignController) or
//! [`PreAlignPanel`](crate::panel::PreAlignPanel), so the controller can be
//! exercised without a running host.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

/// Opaque identity handle for a scene node. Two handles refer to the same
/// node iff their ids compare equal; no deep equality is ever performed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct NodeId(String);

impl NodeId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Node categories the panel cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum NodeKind {
    /// A named 3D surface mesh in the host scene.
    Model,
    /// A markup set of user-placed fiducial points.
    FiducialSet,
    /// A scalar volume (only used by the vestigial threshold section).
    Volume,
}

/// What the scene registry exposes to the UI for each node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeHandle {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
}

/// Scene-graph node registry: lookup by kind plus the node management the
/// selectors need (`allow_create` / `allow_remove` selector flags).
pub trait SceneRegistry {
    /// All nodes of the given kind, in host order.
    fn nodes(&self, kind: NodeKind) -> Vec<NodeHandle>;

    /// Look up a single node by id.
    fn node(&self, id: &NodeId) -> Option<NodeHandle>;

    /// Create a new node of the given kind and return its handle.
    fn create(&mut self, kind: NodeKind, name: &str) -> NodeHandle;

    /// Remove a node. Removing an unknown id is a no-op.
    fn remove(&mut self, id: &NodeId);
}

/// The host's active-placement-target register: which fiducial set newly
/// placed points land on.
pub trait PlacementTarget {
    fn set_target(&mut self, id: &NodeId);
    fn clear_target(&mut self);
    fn target(&self) -> Option<NodeId>;
}

/// Host-wide interaction state. `Place` means user clicks create fiducial
/// points on the active placement target; `ViewTransform` is normal
/// view/navigate interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionState {
    Place,
    #[default]
    ViewTransform,
}

/// The host's interaction-mode toggle.
pub trait InteractionMode {
    /// Enter point-placement mode. With `persistent` set, the host stays in
    /// placement mode after each placed point instead of reverting.
    fn enter_placement(&mut self, persistent: bool);

    /// Return to normal view/navigate interaction.
    fn leave_placement(&mut self);

    fn state(&self) -> InteractionState;
}

/// Error reported by the host's registration routine. Mismatched point
/// counts, degenerate configurations and the like are entirely the host's
/// business; they all surface here as an opaque message.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("moving and fixed fiducial sets must both be selected")]
    SelectionIncomplete,
    #[error("registration failed: {0}")]
    Host(String),
}

/// The host's built-in fiducial registration: given two equal-cardinality
/// point sets, estimate a rigid transform aligning moving onto fixed. This
/// crate only states the call contract; it implements no registration math.
pub trait FiducialRegistration {
    fn register(&mut self, moving: &NodeId, fixed: &NodeId) -> Result<(), RegistrationError>;
}

/// Named-argument record passed to the host's command execution facility.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandParams(BTreeMap<String, Value>);

impl CommandParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<V: Into<Value>>(&mut self, key: &str, value: V) -> &mut Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

/// Failure of an external command module run.
#[derive(Debug, thiserror::Error)]
#[error("command module '{module}' failed: {message}")]
pub struct CommandError {
    pub module: String,
    pub message: String,
}

/// Blocking external command execution, parametrized by a named-argument
/// mapping. The call returns only once the module has finished; there is no
/// cancellation and no timeout.
pub trait CommandRunner {
    fn run_blocking(&mut self, module: &str, params: &CommandParams) -> Result<(), CommandError>;
}
