//! Incident records and loading

pub mod csv;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One geotagged, timestamped incident report.
///
/// Records are immutable once loaded; the loader guarantees every field
/// here is present and the coordinates/timestamp are usable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Incident {
    /// Unique case identifier within a batch.
    pub case_number: String,

    /// UTC-naive timestamp of the incident.
    pub date: NaiveDateTime,

    /// Latitude in decimal degrees.
    pub latitude: f64,

    /// Longitude in decimal degrees.
    pub longitude: f64,

    /// Category label ("primary type" in the source table).
    pub primary_type: String,

    /// Free-text description.
    pub description: String,

    /// Block-level location string.
    pub block: String,

    /// Whether the incident led to an arrest.
    pub arrest: bool,

    /// Whether the incident was flagged domestic.
    pub domestic: bool,
}

/// Guard against malformed records reaching the engine.
///
/// The loader owns cleaning, so a record failing here is an upstream
/// contract violation; surfacing it beats silently corrupting distances
/// and centroids.
pub fn validate_records(incidents: &[Incident]) -> crate::error::Result<()> {
    for inc in incidents {
        if !inc.latitude.is_finite() || !(-90.0..=90.0).contains(&inc.latitude) {
            return Err(crate::error::AnalysisError::MalformedRecord {
                case_number: inc.case_number.clone(),
                message: "latitude outside [-90, 90]",
            });
        }
        if !inc.longitude.is_finite() || !(-180.0..=180.0).contains(&inc.longitude) {
            return Err(crate::error::AnalysisError::MalformedRecord {
                case_number: inc.case_number.clone(),
                message: "longitude outside [-180, 180]",
            });
        }
    }
    Ok(())
}

/// Filter a batch down to one category.
///
/// Returns owned clones so the engine works on a self-contained subset;
/// an unknown category simply yields an empty vector.
pub fn filter_by_type(incidents: &[Incident], primary_type: &str) -> Vec<Incident> {
    incidents
        .iter()
        .filter(|inc| inc.primary_type == primary_type)
        .cloned()
        .collect()
}

#[cfg(test)]
pub(crate) fn test_incident(
    case_number: &str,
    date: &str,
    latitude: f64,
    longitude: f64,
) -> Incident {
    Incident {
        case_number: case_number.to_string(),
        date: NaiveDateTime::parse_from_str(date, "%Y-%m-%d %H:%M:%S").unwrap(),
        latitude,
        longitude,
        primary_type: "ROBBERY".to_string(),
        description: "ARMED".to_string(),
        block: "001XX N STATE ST".to_string(),
        arrest: false,
        domestic: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_matches_exact_type() {
        let mut incidents = vec![
            test_incident("A", "2024-01-01 12:00:00", 41.8, -87.6),
            test_incident("B", "2024-01-02 12:00:00", 41.9, -87.7),
        ];
        incidents[1].primary_type = "THEFT".to_string();

        let robbery = filter_by_type(&incidents, "ROBBERY");
        assert_eq!(robbery.len(), 1);
        assert_eq!(robbery[0].case_number, "A");

        assert!(filter_by_type(&incidents, "HOMICIDE").is_empty());
    }

    #[test]
    fn incident_round_trips_through_json() {
        let incident = test_incident("JE123456", "2024-01-01 12:00:00", 41.8781, -87.6298);
        let json = serde_json::to_string(&incident).unwrap();
        assert!(json.contains("\"case_number\":\"JE123456\""));

        let back: Incident = serde_json::from_str(&json).unwrap();
        assert_eq!(back.date, incident.date);
        assert_eq!(back.latitude, incident.latitude);
    }

    #[test]
    fn out_of_range_coordinates_are_rejected() {
        let good = test_incident("A", "2024-01-01 12:00:00", 41.8, -87.6);
        assert!(validate_records(&[good.clone()]).is_ok());

        let mut bad = good.clone();
        bad.latitude = 91.0;
        assert!(validate_records(&[bad]).is_err());

        let mut bad = good;
        bad.longitude = f64::NAN;
        assert!(validate_records(&[bad]).is_err());
    }
}
