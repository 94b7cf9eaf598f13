use std::time::Duration;

use anyhow::Result;
use log::{debug, info, warn};
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tokio::time::sleep;

use liftmap::camera::{CameraController, CameraIntent, CameraRenderer};
use liftmap::location::{Accuracy, LocationService, Permission};
use liftmap::markers::OFFICE;
use liftmap::route::route_to_geojson;
use liftmap::screen::{Dialer, DialerError, Effect, MapEvent, MapScreen};
use liftmap::{Coordinate, JobStatus, MaintenanceRecord, StatusFilter, UserRole, acquire};

/// Simulated device location service for the demo: permission is granted and
/// the fix resolves after a short delay, like a warm GPS.
struct SimulatedLocation {
    position: Coordinate,
}

impl LocationService for SimulatedLocation {
    async fn request_permission(&self) -> Result<Permission> {
        Ok(Permission::Granted)
    }

    async fn current_position(&self, _accuracy: Accuracy) -> Result<Coordinate> {
        sleep(Duration::from_millis(250)).await;
        Ok(self.position)
    }
}

/// Demo dialer that only logs; a real shell hands the number to the OS.
struct LogDialer;

impl Dialer for LogDialer {
    fn open(&self, number: &str) -> Result<(), DialerError> {
        info!("dialer opened with {number}");
        Ok(())
    }
}

/// Demo renderer: a real shell would animate the map view here.
struct LogRenderer;

impl CameraRenderer for LogRenderer {
    fn animate(&mut self, intent: &CameraIntent) {
        info!("camera animating: {intent:?}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .format_target(false)
        .format_timestamp(None)
        .target(env_logger::Target::Stderr)
        .init();
    info!("Starting liftmap demo");

    let mut file = File::open("sample/maintenance-records.json").await?;
    let mut contents = vec![];
    file.read_to_end(&mut contents).await?;

    let records: Vec<MaintenanceRecord> = serde_json::from_slice(&contents)?;
    info!("Loaded {} maintenance records", records.len());

    let service = SimulatedLocation {
        position: Coordinate::new(-12.0464, -77.0428),
    };

    let mut screen = MapScreen::new(
        records,
        UserRole::Admin,
        OFFICE,
        Some(Coordinate::new(-12.0725, -77.0411)),
        LogDialer,
    );
    let mut camera = CameraController::new(LogRenderer);

    // Mount: acquire the one-shot position fix, then feed the result in.
    match acquire(&service).await {
        Ok(fix) => {
            run(&mut screen, &mut camera, MapEvent::LocationResolved(fix));
        }
        Err(e) => {
            warn!("location acquisition failed: {e}");
            run(&mut screen, &mut camera, MapEvent::LocationFailed(e));
            return Ok(());
        }
    }

    info!("{} markers on the map", screen.markers().len());

    // A scripted interaction: filter, pick a job, ask for the route,
    // close the card, cycle the render style, call the office.
    run(
        &mut screen,
        &mut camera,
        MapEvent::SetFilter(Some(StatusFilter::Only(JobStatus::Scheduled))),
    );
    run(&mut screen, &mut camera, MapEvent::TapMarker("mnt-2481".to_string()));
    run(&mut screen, &mut camera, MapEvent::Settled);
    run(&mut screen, &mut camera, MapEvent::RequestRoute);

    if let Some(route) = screen.route() {
        info!(
            "straight-line estimate: {:.1} km, ~{} min at 30 km/h",
            route.distance_km, route.duration_min
        );
        debug!("Route GeoJSON: {}", route_to_geojson(route));
    }

    run(&mut screen, &mut camera, MapEvent::SetFilter(None));
    run(&mut screen, &mut camera, MapEvent::CloseCard);
    run(&mut screen, &mut camera, MapEvent::Settled);
    run(&mut screen, &mut camera, MapEvent::ToggleMapType);
    run(&mut screen, &mut camera, MapEvent::CallOffice);

    info!("Demo finished");
    Ok(())
}

fn run(
    screen: &mut MapScreen<LogDialer>,
    camera: &mut CameraController<LogRenderer>,
    event: MapEvent,
) {
    debug!("event: {event:?}");
    for effect in screen.handle(event) {
        match effect {
            Effect::Camera(intent) => camera.apply(intent),
            other => info!("effect: {other:?}"),
        }
    }
}
