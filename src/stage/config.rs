//! Per-stage configuration with sensible defaults.

// Layer 1: Standard library
// (none)

// Layer 2: Third-party
use serde::{Deserialize, Serialize};

// Layer 3: Internal
use super::error::StageError;

/// Default stage name used when none is given.
pub const DEFAULT_STAGE_NAME: &str = "stage";

/// Per-stage configuration.
///
/// # Examples
///
/// ```rust
/// use conveyor::stage::StageConfig;
///
/// let config = StageConfig::default();
/// assert_eq!(config.bounded_capacity, None);
///
/// let config = StageConfig::builder()
///     .with_name("squares")
///     .with_bounded_capacity(16)
///     .build()
///     .unwrap();
/// assert_eq!(config.name, "squares");
/// assert_eq!(config.bounded_capacity, Some(16));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageConfig {
    /// Name used in monitoring events and `Debug` output.
    pub name: String,

    /// `None` leaves the stage's input tube unbounded (the default); `Some(n)`
    /// caps it at `n` unconsumed envelopes, applying backpressure on `put`.
    pub bounded_capacity: Option<usize>,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_STAGE_NAME.to_string(),
            bounded_capacity: None,
        }
    }
}

impl StageConfig {
    /// Create a new configuration builder.
    pub fn builder() -> StageConfigBuilder {
        StageConfigBuilder::default()
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), StageError> {
        if self.name.trim().is_empty() {
            return Err(StageError::Config("stage name must not be empty".to_string()));
        }
        if self.bounded_capacity == Some(0) {
            return Err(StageError::Config(
                "bounded_capacity must be greater than zero when set".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`StageConfig`] with a fluent API.
#[derive(Debug, Default)]
pub struct StageConfigBuilder {
    config: StageConfig,
}

impl StageConfigBuilder {
    /// Set the stage's name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Bound the stage's input tube at `capacity` unconsumed envelopes.
    pub fn with_bounded_capacity(mut self, capacity: usize) -> Self {
        self.config.bounded_capacity = Some(capacity);
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> Result<StageConfig, StageError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
