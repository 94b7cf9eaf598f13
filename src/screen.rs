use log::{debug, info, warn};
use thiserror::Error;

use crate::camera::CameraIntent;
use crate::filter::{StatusFilter, filter_markers};
use crate::location::{LocationError, LocationFix};
use crate::map_type::MapType;
use crate::markers::{
    Coordinate, MaintenanceRecord, MarkerEntity, OfficeInfo, UserRole, build_markers,
};
use crate::route::{self, Route};
use crate::selection::{CloseOutcome, SelectionController, SelectionState, TapOutcome};

#[derive(Debug, Error)]
#[error("failed to open phone dialer for {number}")]
pub struct DialerError {
    pub number: String,
}

/// External dialer collaborator. Fire and forget; a failure surfaces as a
/// user-facing alert, never as a state change.
pub trait Dialer {
    fn open(&self, number: &str) -> Result<(), DialerError>;
}

/// What the screen shell should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenPhase {
    /// Loading surface; shown for at least the minimum display time.
    Loading,
    /// Terminal: retry-to-settings UI, the map never renders.
    PermissionDenied,
    /// Terminal for the session: generic error UI, retry requires remount.
    Unavailable,
    /// The map is live.
    Ready,
}

/// Discrete UI events feeding the screen's single transition function.
#[derive(Debug, Clone)]
pub enum MapEvent {
    LocationResolved(LocationFix),
    LocationFailed(LocationError),
    TapMarker(String),
    TapBackground,
    CloseCard,
    SetFilter(Option<StatusFilter>),
    RequestRoute,
    ToggleMapType,
    CallOffice,
    /// Renderer acknowledgement that the last card animation finished.
    Settled,
}

/// Commands for the rendering shell, applied in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Camera(CameraIntent),
    PresentCard(MarkerEntity),
    DismissCard,
    ShowRoute(Route),
    ClearRoute,
    Alert(String),
    MapTypeChanged(MapType),
}

/// The interactive map screen: one explicit state object with a single
/// transition function.
///
/// Selection, route, filter and map-type state live here together instead of
/// in scattered locals, so every invariant between them is enforced in one
/// place: at most one selected marker, a route only while a marker is
/// selected and the device position is known, and exactly one camera intent
/// per filter change.
pub struct MapScreen<D: Dialer> {
    records: Vec<MaintenanceRecord>,
    role: UserRole,
    office: OfficeInfo,
    technician_position: Option<Coordinate>,
    dialer: D,

    phase: ScreenPhase,
    location: Option<LocationFix>,
    selection: SelectionController,
    route: Option<Route>,
    filter: Option<StatusFilter>,
    map_type: MapType,
}

impl<D: Dialer> MapScreen<D> {
    pub fn new(
        records: Vec<MaintenanceRecord>,
        role: UserRole,
        office: OfficeInfo,
        technician_position: Option<Coordinate>,
        dialer: D,
    ) -> Self {
        Self {
            records,
            role,
            office,
            technician_position,
            dialer,
            phase: ScreenPhase::Loading,
            location: None,
            selection: SelectionController::new(),
            route: None,
            filter: None,
            map_type: MapType::default(),
        }
    }

    pub fn phase(&self) -> ScreenPhase {
        self.phase
    }

    pub fn location(&self) -> Option<&LocationFix> {
        self.location.as_ref()
    }

    pub fn selection(&self) -> &SelectionState {
        self.selection.state()
    }

    pub fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    pub fn filter(&self) -> Option<StatusFilter> {
        self.filter
    }

    pub fn map_type(&self) -> MapType {
        self.map_type
    }

    /// The markers to render: the full set for the current role and
    /// location, with the active status filter applied.
    pub fn markers(&self) -> Vec<MarkerEntity> {
        let all = build_markers(
            &self.records,
            self.role,
            &self.office,
            self.technician_position,
            self.location.map(|fix| fix.coordinate),
        );
        filter_markers(&all, self.filter)
    }

    /// Replace the maintenance-record collection (upstream data changed).
    pub fn set_records(&mut self, records: Vec<MaintenanceRecord>) {
        self.records = records;
    }

    /// Replace the user role (session changed); the marker set follows.
    pub fn set_role(&mut self, role: UserRole) {
        self.role = role;
    }

    /// The status filter bar is an admin-only control.
    pub fn filter_bar_visible(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// The screen's single transition function.
    pub fn handle(&mut self, event: MapEvent) -> Vec<Effect> {
        match event {
            MapEvent::LocationResolved(fix) => {
                info!(
                    "map ready at ({:.4}, {:.4})",
                    fix.coordinate.latitude, fix.coordinate.longitude
                );
                self.location = Some(fix);
                self.phase = ScreenPhase::Ready;
                vec![]
            }
            MapEvent::LocationFailed(err) => {
                warn!("location acquisition failed: {err}");
                self.phase = match err {
                    LocationError::PermissionDenied => ScreenPhase::PermissionDenied,
                    LocationError::Unavailable => ScreenPhase::Unavailable,
                };
                vec![]
            }
            _ if self.phase != ScreenPhase::Ready => {
                // Location errors block the map entirely; nothing below is
                // reachable until a fix resolves.
                debug!("ignoring {event:?} while screen is {:?}", self.phase);
                vec![]
            }
            MapEvent::TapMarker(id) => self.on_tap_marker(&id),
            MapEvent::TapBackground | MapEvent::CloseCard => self.on_close(),
            MapEvent::SetFilter(filter) => self.on_set_filter(filter),
            MapEvent::RequestRoute => self.on_request_route(),
            MapEvent::ToggleMapType => {
                self.map_type = self.map_type.next();
                info!("map type toggled to {}", self.map_type.as_str());
                vec![Effect::MapTypeChanged(self.map_type)]
            }
            MapEvent::CallOffice => self.on_call_office(),
            MapEvent::Settled => {
                self.selection.settled();
                vec![]
            }
        }
    }

    fn on_tap_marker(&mut self, id: &str) -> Vec<Effect> {
        let Some(marker) = self.markers().into_iter().find(|m| m.id() == id) else {
            warn!("tap on unknown marker {id}");
            return vec![];
        };

        let mut effects = Vec::new();
        match self.selection.tap(marker.clone()) {
            TapOutcome::Dropped => return vec![],
            TapOutcome::Reselected => {
                effects.push(Effect::DismissCard);
                if self.route.take().is_some() {
                    effects.push(Effect::ClearRoute);
                }
            }
            TapOutcome::Selected => {
                if self.route.take().is_some() {
                    effects.push(Effect::ClearRoute);
                }
            }
        }

        effects.push(Effect::PresentCard(marker.clone()));
        effects.push(Effect::Camera(CameraIntent::focus(marker.coordinate())));
        effects
    }

    fn on_close(&mut self) -> Vec<Effect> {
        match self.selection.close() {
            CloseOutcome::Closed => {
                self.route = None;
                vec![Effect::DismissCard, Effect::ClearRoute]
            }
            CloseOutcome::AlreadyIdle | CloseOutcome::Dropped => vec![],
        }
    }

    fn on_set_filter(&mut self, filter: Option<StatusFilter>) -> Vec<Effect> {
        self.filter = filter;
        info!(
            "status filter changed to {}",
            filter.map_or("none", StatusFilter::as_str)
        );

        // Every filter change re-frames the camera with exactly one intent.
        let intent = match filter {
            None => {
                let region = self
                    .location
                    .map(|fix| fix.initial_region)
                    .expect("screen is ready");
                CameraIntent::reset(region)
            }
            Some(_) => {
                let mut coordinates: Vec<Coordinate> = self
                    .markers()
                    .iter()
                    .filter(|m| m.is_job())
                    .map(MarkerEntity::coordinate)
                    .collect();
                coordinates.push(self.office.coordinate);
                CameraIntent::fit(coordinates)
            }
        };
        vec![Effect::Camera(intent)]
    }

    fn on_request_route(&mut self) -> Vec<Effect> {
        let Some(fix) = self.location else {
            debug!("route requested without a resolved position");
            return vec![];
        };
        let Some(marker) = self.selection.selected() else {
            debug!("route requested with no selected marker");
            return vec![];
        };

        let origin = fix.coordinate;
        let destination = marker.coordinate();
        match route::calculate(origin, destination) {
            Ok(route) => {
                info!(
                    "route to {}: {:.1} km, ~{} min",
                    marker.id(),
                    route.distance_km,
                    route.duration_min
                );
                self.route = Some(route.clone());
                vec![
                    Effect::ShowRoute(route),
                    Effect::Camera(CameraIntent::fit(vec![origin, destination])),
                ]
            }
            Err(e) => {
                // Non-fatal: log and leave the route unset.
                warn!("route calculation failed: {e}");
                vec![]
            }
        }
    }

    fn on_call_office(&mut self) -> Vec<Effect> {
        let number = self.office.phone;
        match self.dialer.open(number) {
            Ok(()) => {
                info!("opened dialer for {number}");
                vec![]
            }
            Err(e) => {
                warn!("{e}");
                vec![Effect::Alert(
                    "Could not open the phone dialer.".to_string(),
                )]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Region;
    use crate::markers::{JobStatus, OFFICE};
    use chrono::DateTime;

    struct FakeDialer {
        fail: bool,
    }

    impl Dialer for FakeDialer {
        fn open(&self, number: &str) -> Result<(), DialerError> {
            if self.fail {
                Err(DialerError {
                    number: number.to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    fn record(id: &str, status: JobStatus, latitude: f64, longitude: f64) -> MaintenanceRecord {
        MaintenanceRecord {
            id: id.to_string(),
            coordinates: Coordinate::new(latitude, longitude),
            status,
            client_name: "client".to_string(),
            address: "address".to_string(),
            scheduled_date: DateTime::parse_from_rfc3339("2026-08-12T09:00:00-05:00").unwrap(),
            assigned_tech_id: None,
        }
    }

    fn ready_screen(fail_dialer: bool) -> MapScreen<FakeDialer> {
        let records = vec![
            record("mnt-1", JobStatus::Scheduled, -12.0865, -77.0364),
            record("mnt-2", JobStatus::Completed, -12.1211, -77.0297),
        ];
        let mut screen = MapScreen::new(
            records,
            UserRole::Admin,
            OFFICE,
            None,
            FakeDialer { fail: fail_dialer },
        );
        let here = Coordinate::new(-12.0464, -77.0428);
        let fix = LocationFix {
            coordinate: here,
            initial_region: Region::around(here),
        };
        screen.handle(MapEvent::LocationResolved(fix));
        screen
    }

    fn camera_intents(effects: &[Effect]) -> usize {
        effects
            .iter()
            .filter(|e| matches!(e, Effect::Camera(_)))
            .count()
    }

    #[test]
    fn events_before_location_resolves_are_ignored() {
        let mut screen = MapScreen::new(
            vec![],
            UserRole::Client,
            OFFICE,
            None,
            FakeDialer { fail: false },
        );

        assert_eq!(screen.phase(), ScreenPhase::Loading);
        assert!(screen.handle(MapEvent::TapMarker("office".into())).is_empty());
        assert!(screen.handle(MapEvent::ToggleMapType).is_empty());
        assert_eq!(screen.map_type(), MapType::Standard);
    }

    #[test]
    fn location_errors_map_to_terminal_phases() {
        let mut screen = MapScreen::new(
            vec![],
            UserRole::Client,
            OFFICE,
            None,
            FakeDialer { fail: false },
        );
        screen.handle(MapEvent::LocationFailed(LocationError::PermissionDenied));
        assert_eq!(screen.phase(), ScreenPhase::PermissionDenied);

        screen.handle(MapEvent::LocationFailed(LocationError::Unavailable));
        assert_eq!(screen.phase(), ScreenPhase::Unavailable);
    }

    #[test]
    fn tapping_a_marker_presents_card_and_focuses_camera() {
        let mut screen = ready_screen(false);
        let effects = screen.handle(MapEvent::TapMarker("mnt-1".into()));

        assert!(matches!(effects[0], Effect::PresentCard(_)));
        assert!(matches!(
            effects[1],
            Effect::Camera(CameraIntent::FocusMarker { .. })
        ));
        assert!(matches!(screen.selection(), SelectionState::Selected(_)));
    }

    #[test]
    fn tap_on_unknown_marker_does_nothing() {
        let mut screen = ready_screen(false);
        assert!(screen.handle(MapEvent::TapMarker("mnt-999".into())).is_empty());
        assert_eq!(screen.selection(), &SelectionState::Idle);
    }

    #[test]
    fn tap_on_filtered_out_marker_does_nothing() {
        let mut screen = ready_screen(false);
        screen.handle(MapEvent::SetFilter(Some(StatusFilter::Only(
            JobStatus::Completed,
        ))));

        // mnt-1 is scheduled, so it is not on the map right now.
        assert!(screen.handle(MapEvent::TapMarker("mnt-1".into())).is_empty());
    }

    #[test]
    fn every_filter_change_emits_exactly_one_camera_intent() {
        let mut screen = ready_screen(false);

        let effects = screen.handle(MapEvent::SetFilter(Some(StatusFilter::Only(
            JobStatus::Completed,
        ))));
        assert_eq!(camera_intents(&effects), 1);

        let effects = screen.handle(MapEvent::SetFilter(Some(StatusFilter::All)));
        assert_eq!(camera_intents(&effects), 1);

        let effects = screen.handle(MapEvent::SetFilter(None));
        assert_eq!(camera_intents(&effects), 1);
    }

    #[test]
    fn clearing_the_filter_resets_to_the_initial_region() {
        let mut screen = ready_screen(false);
        let effects = screen.handle(MapEvent::SetFilter(None));

        match &effects[0] {
            Effect::Camera(CameraIntent::Reset { region, .. }) => {
                assert_eq!(region.center, Coordinate::new(-12.0464, -77.0428));
            }
            other => panic!("expected reset intent, got {other:?}"),
        }
    }

    #[test]
    fn filter_fit_bounds_covers_jobs_plus_office() {
        let mut screen = ready_screen(false);
        let effects = screen.handle(MapEvent::SetFilter(Some(StatusFilter::Only(
            JobStatus::Completed,
        ))));

        match &effects[0] {
            Effect::Camera(CameraIntent::FitBounds { coordinates, .. }) => {
                assert_eq!(
                    coordinates,
                    &vec![Coordinate::new(-12.1211, -77.0297), OFFICE.coordinate]
                );
            }
            other => panic!("expected fit-bounds intent, got {other:?}"),
        }
    }

    #[test]
    fn route_request_requires_a_selection() {
        let mut screen = ready_screen(false);
        assert!(screen.handle(MapEvent::RequestRoute).is_empty());
        assert_eq!(screen.route(), None);
    }

    #[test]
    fn route_request_shows_route_and_fits_both_endpoints() {
        let mut screen = ready_screen(false);
        screen.handle(MapEvent::TapMarker("mnt-1".into()));
        let effects = screen.handle(MapEvent::RequestRoute);

        match &effects[0] {
            Effect::ShowRoute(route) => {
                assert!((route.distance_km - 4.55).abs() < 0.15);
                assert_eq!(route.duration_min, 9);
            }
            other => panic!("expected route effect, got {other:?}"),
        }
        match &effects[1] {
            Effect::Camera(CameraIntent::FitBounds { coordinates, .. }) => {
                assert_eq!(coordinates.len(), 2);
            }
            other => panic!("expected fit-bounds intent, got {other:?}"),
        }
        assert!(screen.route().is_some());
    }

    #[test]
    fn closing_clears_selection_and_route() {
        let mut screen = ready_screen(false);
        screen.handle(MapEvent::TapMarker("mnt-1".into()));
        screen.handle(MapEvent::RequestRoute);
        screen.handle(MapEvent::Settled);

        let effects = screen.handle(MapEvent::CloseCard);
        assert_eq!(effects, vec![Effect::DismissCard, Effect::ClearRoute]);
        assert_eq!(screen.selection(), &SelectionState::Idle);
        assert_eq!(screen.route(), None);
    }

    #[test]
    fn background_tap_behaves_like_close() {
        let mut screen = ready_screen(false);
        screen.handle(MapEvent::TapMarker("mnt-1".into()));
        screen.handle(MapEvent::Settled);

        let effects = screen.handle(MapEvent::TapBackground);
        assert_eq!(effects, vec![Effect::DismissCard, Effect::ClearRoute]);
        assert_eq!(screen.selection(), &SelectionState::Idle);
    }

    #[test]
    fn reselection_dismisses_previous_card_and_drops_stale_route() {
        let mut screen = ready_screen(false);
        screen.handle(MapEvent::TapMarker("mnt-1".into()));
        screen.handle(MapEvent::RequestRoute);
        screen.handle(MapEvent::Settled);

        let effects = screen.handle(MapEvent::TapMarker("mnt-2".into()));
        assert_eq!(effects[0], Effect::DismissCard);
        assert_eq!(effects[1], Effect::ClearRoute);
        assert!(matches!(effects[2], Effect::PresentCard(_)));

        // Any later route reflects the new marker, never the old one.
        assert_eq!(screen.route(), None);
        let effects = screen.handle(MapEvent::RequestRoute);
        match &effects[0] {
            Effect::ShowRoute(route) => {
                assert_eq!(route.waypoints[1], Coordinate::new(-12.1211, -77.0297));
            }
            other => panic!("expected route effect, got {other:?}"),
        }
    }

    #[test]
    fn rapid_taps_are_dropped_until_settled() {
        let mut screen = ready_screen(false);
        screen.handle(MapEvent::TapMarker("mnt-1".into()));

        // No Settled acknowledgement yet: the second tap is dropped.
        assert!(screen.handle(MapEvent::TapMarker("mnt-2".into())).is_empty());
        match screen.selection() {
            SelectionState::Selected(marker) => assert_eq!(marker.id(), "mnt-1"),
            other => panic!("expected selection, got {other:?}"),
        }
    }

    #[test]
    fn dialer_failure_surfaces_an_alert_without_state_change() {
        let mut screen = ready_screen(true);
        screen.handle(MapEvent::TapMarker("office".into()));
        screen.handle(MapEvent::Settled);

        let effects = screen.handle(MapEvent::CallOffice);
        assert!(matches!(effects[0], Effect::Alert(_)));
        assert!(matches!(screen.selection(), SelectionState::Selected(_)));
    }

    #[test]
    fn dialer_success_produces_no_effects() {
        let mut screen = ready_screen(false);
        assert!(screen.handle(MapEvent::CallOffice).is_empty());
    }

    #[test]
    fn filter_bar_is_admin_only() {
        let mut screen = ready_screen(false);
        assert!(screen.filter_bar_visible());

        screen.set_role(UserRole::Client);
        assert!(!screen.filter_bar_visible());
    }

    #[test]
    fn map_type_toggle_cycles() {
        let mut screen = ready_screen(false);
        let effects = screen.handle(MapEvent::ToggleMapType);
        assert_eq!(effects, vec![Effect::MapTypeChanged(MapType::Satellite)]);
    }
}
