//! Common validation utilities.

use validator::ValidationError;

/// Validates that a latitude value is within valid range (-90 to 90).
pub fn validate_latitude(lat: f64) -> Result<(), ValidationError> {
    if (-90.0..=90.0).contains(&lat) {
        Ok(())
    } else {
        let mut err = ValidationError::new("latitude_range");
        err.message = Some("Latitude must be between -90 and 90".into());
        Err(err)
    }
}

/// Validates that a longitude value is within valid range (-180 to 180).
pub fn validate_longitude(lon: f64) -> Result<(), ValidationError> {
    if (-180.0..=180.0).contains(&lon) {
        Ok(())
    } else {
        let mut err = ValidationError::new("longitude_range");
        err.message = Some("Longitude must be between -180 and 180".into());
        Err(err)
    }
}

/// Check-in coordinates come as a pair or not at all.
pub fn validate_coordinate_pair(
    lat: Option<f64>,
    lng: Option<f64>,
) -> Result<(), ValidationError> {
    match (lat, lng) {
        (Some(lat), Some(lng)) => {
            validate_latitude(lat)?;
            validate_longitude(lng)
        }
        (None, None) => Ok(()),
        _ => {
            let mut err = ValidationError::new("coordinate_pair");
            err.message = Some("Latitude and longitude must be provided together".into());
            Err(err)
        }
    }
}

/// Rejects strings that are empty once surrounding whitespace is trimmed.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value must not be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}
