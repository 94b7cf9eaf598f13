use crate::markers::{JobStatus, MarkerEntity};

/// Status filter applied to maintenance-job markers. `All` is the explicit
/// "show everything" sentinel and filters identically to no filter at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Only(JobStatus),
}

impl StatusFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Only(status) => status.as_str(),
        }
    }
}

fn passes(marker: &MarkerEntity, filter: Option<StatusFilter>) -> bool {
    // Only maintenance jobs are ever filtered; office, technician and user
    // markers stay visible regardless.
    let Some(status) = marker.job_status() else {
        return true;
    };

    match filter {
        None | Some(StatusFilter::All) => true,
        Some(StatusFilter::Only(wanted)) => status == wanted,
    }
}

/// Filter the marker set by job status.
pub fn filter_markers(markers: &[MarkerEntity], filter: Option<StatusFilter>) -> Vec<MarkerEntity> {
    markers
        .iter()
        .filter(|marker| passes(marker, filter))
        .cloned()
        .collect()
}
