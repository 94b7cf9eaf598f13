use std::time::Duration;

use anyhow::Result;
use log::{info, warn};
use thiserror::Error;
use tokio::time::sleep;

use crate::camera::Region;
use crate::markers::Coordinate;

/// Minimum time the loading surface stays visible, even when the position
/// fix resolves immediately.
pub const MIN_DISPLAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

/// Requested fix accuracy. The screen always asks for `Balanced`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accuracy {
    Low,
    Balanced,
    High,
}

/// Device location collaborator: permission prompt plus a one-shot fix.
pub trait LocationService {
    fn request_permission(&self) -> impl Future<Output = Result<Permission>>;
    fn current_position(&self, accuracy: Accuracy) -> impl Future<Output = Result<Coordinate>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LocationError {
    /// Terminal: the user must grant permission in system settings; the
    /// screen renders a retry-to-settings affordance, never a spinner.
    #[error("location permission denied")]
    PermissionDenied,
    /// Terminal for the session: the fix could not be acquired; retry
    /// requires a remount.
    #[error("current position unavailable")]
    Unavailable,
}

/// A resolved device position plus the initial camera region derived from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationFix {
    pub coordinate: Coordinate,
    pub initial_region: Region,
}

/// Acquire the device position once, on screen mount.
///
/// Requests foreground permission, then fetches a single balanced-accuracy
/// fix joined with the minimum-display timer. There is no continuous
/// tracking; the fix is never refreshed automatically.
pub async fn acquire<S: LocationService>(service: &S) -> Result<LocationFix, LocationError> {
    match service.request_permission().await {
        Ok(Permission::Granted) => {}
        Ok(Permission::Denied) => {
            warn!("location permission denied");
            return Err(LocationError::PermissionDenied);
        }
        Err(e) => {
            warn!("location permission request failed: {e:#}");
            return Err(LocationError::Unavailable);
        }
    }

    let (fix, ()) = tokio::join!(
        service.current_position(Accuracy::Balanced),
        sleep(MIN_DISPLAY),
    );

    let coordinate = fix.map_err(|e| {
        warn!("position fetch failed: {e:#}");
        LocationError::Unavailable
    })?;

    info!(
        "device position resolved at ({:.4}, {:.4})",
        coordinate.latitude, coordinate.longitude
    );

    Ok(LocationFix {
        coordinate,
        initial_region: Region::around(coordinate),
    })
}
