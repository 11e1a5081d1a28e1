//! First-run gate.
//!
//! The app may only leave onboarding once the camera and the media library
//! are both available. The "has opened" flag is written only after every
//! permission is granted, so a denial sends the user back through
//! onboarding on the next launch.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::StorageError;
use crate::storage::KvStore;

pub const HAS_OPENED_KEY: &str = "hasOpened";

/// Device permissions onboarding asks for, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    Camera,
    MediaLibrary,
}

impl Permission {
    pub const REQUIRED: [Permission; 2] = [Permission::Camera, Permission::MediaLibrary];
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Permission::Camera => "camera",
            Permission::MediaLibrary => "media library",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    Granted,
    Denied,
}

/// Asks the platform (or the user) for a permission.
pub trait PermissionGate {
    fn request(&mut self, permission: Permission) -> PermissionStatus;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "permission", rename_all = "snake_case")]
pub enum OnboardingOutcome {
    Completed,
    Denied(Permission),
}

/// True until onboarding has completed once.
pub fn is_first_run<S: KvStore + ?Sized>(store: &S) -> Result<bool, StorageError> {
    Ok(store.get(HAS_OPENED_KEY)?.is_none())
}

/// Request each required permission in turn, stopping at the first denial.
pub fn complete<S, G>(store: &mut S, gate: &mut G) -> Result<OnboardingOutcome, StorageError>
where
    S: KvStore + ?Sized,
    G: PermissionGate + ?Sized,
{
    for permission in Permission::REQUIRED {
        if gate.request(permission) == PermissionStatus::Denied {
            tracing::info!(%permission, "onboarding stopped: permission denied");
            return Ok(OnboardingOutcome::Denied(permission));
        }
    }
    store.set(HAS_OPENED_KEY, "true")?;
    tracing::info!("onboarding completed");
    Ok(OnboardingOutcome::Completed)
}
