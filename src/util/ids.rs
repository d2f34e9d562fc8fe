// Layer 1: Standard library imports
use std::fmt::{self, Display};

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Layer 3: Internal module imports
// (none)

/// Unique identifier for a stage in a pipeline graph.
///
/// Used to deduplicate leaf discovery when a stage is the downstream target
/// of more than one upstream stage.
///
/// # Example
/// ```rust
/// use conveyor::util::StageId;
///
/// let a = StageId::new();
/// let b = StageId::new();
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StageId(Uuid);

impl StageId {
    /// Generate a new random StageId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a StageId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for StageId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier for one worker within a stage's pool.
///
/// Unlike [`StageId`], this is not globally unique by itself — it is only
/// meaningful paired with the owning stage's id, e.g. in monitoring events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkerId {
    stage: StageId,
    index: usize,
}

impl WorkerId {
    /// Construct the id of worker `index` within `stage`.
    pub fn new(stage: StageId, index: usize) -> Self {
        Self { stage, index }
    }

    /// The owning stage's id.
    pub fn stage(&self) -> StageId {
        self.stage
    }

    /// The worker's position within its pool, `0..pool_size`.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.stage, self.index)
    }
}
