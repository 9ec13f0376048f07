//! Acquisition of the caller's own position.
//!
//! [`LocationAcquirer`] wraps a platform [`LocationCapability`] in a small
//! state machine:
//!
//! ```text
//! Idle ──acquire──▶ Acquiring ──ok──▶ Resolved(coordinate)
//!   ▲                   │
//!   └──clear_error── Failed(reason) ◀──err──┘
//! ```
//!
//! The last resolved coordinate is kept as the reference point until a later
//! acquisition succeeds; it never expires on its own.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;
use truckfinder_core::Coordinate;

/// Failure reported by a platform location capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("permission to read the device location was denied")]
    PermissionDenied,
    #[error("the device position is currently unavailable")]
    PositionUnavailable,
    #[error("timed out waiting for the device position")]
    Timeout,
}

/// Why a location acquisition failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("location services are not available on this platform")]
    CapabilityUnavailable,
    #[error("permission to read the device location was denied")]
    PermissionDenied,
    #[error("the device position is currently unavailable")]
    PositionUnavailable,
    #[error("timed out waiting for the device position")]
    Timeout,
}

impl LocationError {
    /// One message suitable for any failure, for callers that do not want to
    /// distinguish reasons.
    pub const USER_MESSAGE: &'static str =
        "Unable to get your location. Check your location settings and try again.";
}

impl From<PositionError> for LocationError {
    fn from(err: PositionError) -> Self {
        match err {
            PositionError::PermissionDenied => LocationError::PermissionDenied,
            PositionError::PositionUnavailable => LocationError::PositionUnavailable,
            PositionError::Timeout => LocationError::Timeout,
        }
    }
}

/// A platform's one-shot "where am I" operation.
#[async_trait]
pub trait LocationCapability: Send + Sync {
    async fn current_position(&self) -> Result<Coordinate, PositionError>;
}

/// A capability that always reports the same position.
///
/// Backs the CLI, where the "device" position comes from configuration.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Coordinate);

#[async_trait]
impl LocationCapability for FixedLocation {
    async fn current_position(&self) -> Result<Coordinate, PositionError> {
        Ok(self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum LocationState {
    #[default]
    Idle,
    Acquiring,
    Resolved(Coordinate),
    Failed(LocationError),
}

impl LocationState {
    #[must_use]
    pub fn failure(&self) -> Option<LocationError> {
        match self {
            LocationState::Failed(err) => Some(*err),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct AcquirerState {
    state: LocationState,
    reference: Option<Coordinate>,
}

/// Owns the location state machine and the current reference point.
pub struct LocationAcquirer {
    capability: Option<Arc<dyn LocationCapability>>,
    inner: Mutex<AcquirerState>,
}

impl LocationAcquirer {
    #[must_use]
    pub fn new(capability: Arc<dyn LocationCapability>) -> Self {
        Self::with_capability(Some(capability))
    }

    /// An acquirer for a platform with no location capability at all.
    #[must_use]
    pub fn unavailable() -> Self {
        Self::with_capability(None)
    }

    #[must_use]
    pub fn with_capability(capability: Option<Arc<dyn LocationCapability>>) -> Self {
        Self {
            capability,
            inner: Mutex::new(AcquirerState::default()),
        }
    }

    /// Asks the capability for the current position.
    ///
    /// Moves to `Acquiring` (clearing any earlier failure), then to
    /// `Resolved` or `Failed`. Overlapping calls each run to completion and
    /// the last one to finish decides the final state.
    ///
    /// # Errors
    ///
    /// - [`LocationError::CapabilityUnavailable`] when no capability is installed.
    /// - [`LocationError::PermissionDenied`], [`LocationError::PositionUnavailable`]
    ///   or [`LocationError::Timeout`] as reported by the capability. A
    ///   reported position outside the valid coordinate range counts as
    ///   `PositionUnavailable`.
    pub async fn acquire(&self) -> Result<Coordinate, LocationError> {
        self.inner.lock().await.state = LocationState::Acquiring;

        let outcome = match &self.capability {
            None => Err(LocationError::CapabilityUnavailable),
            Some(capability) => match capability.current_position().await {
                Ok(position) => Coordinate::new(position.latitude, position.longitude)
                    .map_err(|_| LocationError::PositionUnavailable),
                Err(err) => Err(LocationError::from(err)),
            },
        };

        let mut inner = self.inner.lock().await;
        match outcome {
            Ok(coordinate) => {
                inner.state = LocationState::Resolved(coordinate);
                inner.reference = Some(coordinate);
                tracing::debug!(%coordinate, "resolved device location");
            }
            Err(err) => {
                inner.state = LocationState::Failed(err);
                tracing::warn!(error = %err, "failed to acquire device location");
            }
        }
        outcome
    }

    pub async fn state(&self) -> LocationState {
        self.inner.lock().await.state
    }

    /// The most recently resolved position, kept across later failures.
    pub async fn reference_point(&self) -> Option<Coordinate> {
        self.inner.lock().await.reference
    }

    /// Resets `Failed` back to `Idle` without acquiring; any other state is
    /// left as is.
    pub async fn clear_error(&self) {
        let mut inner = self.inner.lock().await;
        if matches!(inner.state, LocationState::Failed(_)) {
            inner.state = LocationState::Idle;
        }
    }
}
