use log::debug;

use crate::markers::Coordinate;

/// Span used when focusing a single marker, and for the initial region
/// derived from the device position (degrees).
pub const FOCUS_SPAN_DEG: f64 = 0.005;
pub const FOCUS_DURATION_MS: u64 = 500;
pub const FIT_DURATION_MS: u64 = 1000;
pub const RESET_DURATION_MS: u64 = 1000;

/// A rectangular map region: a center plus latitude/longitude spans.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub center: Coordinate,
    pub lat_delta: f64,
    pub lon_delta: f64,
}

impl Region {
    /// The default close-up region around a coordinate.
    pub fn around(center: Coordinate) -> Self {
        Self {
            center,
            lat_delta: FOCUS_SPAN_DEG,
            lon_delta: FOCUS_SPAN_DEG,
        }
    }
}

/// Viewport padding, in rendered points, applied when fitting bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgePadding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for EdgePadding {
    fn default() -> Self {
        Self {
            top: 50.0,
            right: 50.0,
            bottom: 50.0,
            left: 50.0,
        }
    }
}

/// A camera-animation command issued by the controllers and consumed by the
/// map renderer. Controllers never touch the map instance directly; these
/// values are the entire boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum CameraIntent {
    FocusMarker {
        center: Coordinate,
        lat_delta: f64,
        lon_delta: f64,
        duration_ms: u64,
    },
    FitBounds {
        coordinates: Vec<Coordinate>,
        edge_padding: EdgePadding,
        duration_ms: u64,
    },
    Reset {
        region: Region,
        duration_ms: u64,
    },
}

impl CameraIntent {
    pub fn focus(center: Coordinate) -> Self {
        CameraIntent::FocusMarker {
            center,
            lat_delta: FOCUS_SPAN_DEG,
            lon_delta: FOCUS_SPAN_DEG,
            duration_ms: FOCUS_DURATION_MS,
        }
    }

    pub fn fit(coordinates: Vec<Coordinate>) -> Self {
        CameraIntent::FitBounds {
            coordinates,
            edge_padding: EdgePadding::default(),
            duration_ms: FIT_DURATION_MS,
        }
    }

    pub fn reset(region: Region) -> Self {
        CameraIntent::Reset {
            region,
            duration_ms: RESET_DURATION_MS,
        }
    }
}

/// Rendering adapter that performs the actual camera animation.
pub trait CameraRenderer {
    fn animate(&mut self, intent: &CameraIntent);
}

/// Executes camera intents against a renderer. Holds no map state; a later
/// intent simply supersedes whatever animation is still in flight.
pub struct CameraController<R: CameraRenderer> {
    renderer: R,
    in_flight: Option<CameraIntent>,
}

impl<R: CameraRenderer> CameraController<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            in_flight: None,
        }
    }

    pub fn apply(&mut self, intent: CameraIntent) {
        debug!("camera intent: {intent:?}");
        self.renderer.animate(&intent);
        self.in_flight = Some(intent);
    }

    /// The most recently issued intent, if any.
    pub fn in_flight(&self) -> Option<&CameraIntent> {
        self.in_flight.as_ref()
    }
}
