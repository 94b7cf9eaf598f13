//! Interactive map core for the elevator-maintenance field app.
//!
//! Tracks the device position once per mount, assembles the marker set
//! (office, role-gated maintenance jobs, technician, user), filters jobs by
//! status, estimates a straight-line route between the user and a selected
//! marker, and drives the single-selection info-card lifecycle. Rendering is
//! out of scope: controllers emit [`camera::CameraIntent`] values and
//! [`screen::Effect`] commands that a thin adapter applies to the actual map.

pub mod camera;
pub mod filter;
pub mod location;
pub mod map_type;
pub mod markers;
pub mod route;
pub mod screen;
pub mod selection;

pub use camera::{CameraController, CameraIntent, CameraRenderer, Region};
pub use filter::{StatusFilter, filter_markers};
pub use location::{LocationError, LocationFix, LocationService, acquire};
pub use map_type::MapType;
pub use markers::{
    Coordinate, JobStatus, MaintenanceRecord, MarkerEntity, OfficeInfo, UserRole, build_markers,
};
pub use route::{Route, RouteError, route_to_geojson};
pub use screen::{Dialer, DialerError, Effect, MapEvent, MapScreen, ScreenPhase};
pub use selection::{SelectionController, SelectionState};
