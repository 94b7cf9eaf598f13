use chrono::{DateTime, FixedOffset};
use geo_types::Point;
use serde::{Deserialize, Serialize};

/// A latitude/longitude pair. Immutable value type; degrees, WGS84.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Convert to a `geo` point (x = longitude, y = latitude).
    pub fn to_point(self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }
}

/// Lifecycle state of a maintenance job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobStatus {
    Scheduled,
    InProgress,
    Completed,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Scheduled => "scheduled",
            JobStatus::InProgress => "in-progress",
            JobStatus::Completed => "completed",
        }
    }
}

/// One maintenance job as supplied by the record store. Read-only input;
/// this module never mutates or persists it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceRecord {
    pub id: String,

    pub coordinates: Coordinate,

    pub status: JobStatus,

    #[serde(rename = "clientName")]
    pub client_name: String,

    pub address: String,

    #[serde(rename = "scheduledDate")]
    pub scheduled_date: DateTime<FixedOffset>,

    #[serde(rename = "assignedTechId", default, skip_serializing_if = "Option::is_none")]
    pub assigned_tech_id: Option<String>,
}

/// Role of the signed-in user, as supplied by the session provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Technician,
    Client,
}

/// Static facts about the company office marker.
#[derive(Debug, Clone, PartialEq)]
pub struct OfficeInfo {
    pub coordinate: Coordinate,
    pub title: &'static str,
    pub description: &'static str,
    pub phone: &'static str,
}

/// The single company office. Exactly one office marker exists on the map.
pub const OFFICE: OfficeInfo = OfficeInfo {
    coordinate: Coordinate::new(-12.0989, -77.0340),
    title: "Central office",
    description: "Elevator maintenance head office",
    phone: "+51 1 4800134",
};

pub const OFFICE_MARKER_ID: &str = "office";
pub const TECHNICIAN_MARKER_ID: &str = "technician";
pub const USER_MARKER_ID: &str = "user";

/// A renderable point of interest on the map.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkerEntity {
    Office {
        coordinate: Coordinate,
        title: &'static str,
        description: &'static str,
        phone: &'static str,
    },
    MaintenanceJob {
        id: String,
        coordinate: Coordinate,
        status: JobStatus,
        client_name: String,
        address: String,
        scheduled_date: DateTime<FixedOffset>,
        assigned_tech_id: Option<String>,
    },
    Technician {
        coordinate: Coordinate,
    },
    User {
        coordinate: Coordinate,
    },
}

impl MarkerEntity {
    /// Stable identifier used for tap lookups.
    pub fn id(&self) -> &str {
        match self {
            MarkerEntity::Office { .. } => OFFICE_MARKER_ID,
            MarkerEntity::MaintenanceJob { id, .. } => id,
            MarkerEntity::Technician { .. } => TECHNICIAN_MARKER_ID,
            MarkerEntity::User { .. } => USER_MARKER_ID,
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        match self {
            MarkerEntity::Office { coordinate, .. }
            | MarkerEntity::MaintenanceJob { coordinate, .. }
            | MarkerEntity::Technician { coordinate }
            | MarkerEntity::User { coordinate } => *coordinate,
        }
    }

    /// Job status, for maintenance-job markers only.
    pub fn job_status(&self) -> Option<JobStatus> {
        match self {
            MarkerEntity::MaintenanceJob { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_job(&self) -> bool {
        matches!(self, MarkerEntity::MaintenanceJob { .. })
    }
}

impl From<&MaintenanceRecord> for MarkerEntity {
    fn from(record: &MaintenanceRecord) -> Self {
        MarkerEntity::MaintenanceJob {
            id: record.id.clone(),
            coordinate: record.coordinates,
            status: record.status,
            client_name: record.client_name.clone(),
            address: record.address.clone(),
            scheduled_date: record.scheduled_date,
            assigned_tech_id: record.assigned_tech_id.clone(),
        }
    }
}

/// Assemble the full marker set for the current screen state.
///
/// The office marker is always present. Each maintenance record contributes
/// one job marker with its metadata carried verbatim. The technician marker
/// is shown to admins only, and only when a real technician position was
/// injected; without one it is omitted rather than fabricated. The user
/// marker appears once the device position has resolved.
pub fn build_markers(
    records: &[MaintenanceRecord],
    role: UserRole,
    office: &OfficeInfo,
    technician_position: Option<Coordinate>,
    user_coordinate: Option<Coordinate>,
) -> Vec<MarkerEntity> {
    let mut markers = Vec::with_capacity(records.len() + 3);

    markers.push(MarkerEntity::Office {
        coordinate: office.coordinate,
        title: office.title,
        description: office.description,
        phone: office.phone,
    });

    for record in records {
        markers.push(MarkerEntity::from(record));
    }

    if role == UserRole::Admin {
        if let Some(coordinate) = technician_position {
            markers.push(MarkerEntity::Technician { coordinate });
        }
    }

    if let Some(coordinate) = user_coordinate {
        markers.push(MarkerEntity::User { coordinate });
    }

    markers
}
