use serde::Deserialize;

/// The envelope of a `GET /fred/series/observations` response.
///
/// The payload carries paging fields as well, but the observations are all we
/// consume.
#[derive(Debug, Clone, Deserialize)]
pub struct ObservationsResponse {
    pub observations: Vec<Observation>,
}

/// A single dated observation from a FRED series.
#[derive(Debug, Clone, Deserialize)]
pub struct Observation {
    pub date: String,
    /// The value as reported by FRED. A literal "." marks a missing data
    /// point and must be skipped, not parsed.
    pub value: String,
}
