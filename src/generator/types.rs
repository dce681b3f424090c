use crate::error::GeneratorError;
use serde::{Deserialize, Serialize};

/// Most decimal digits an `f64` coordinate can keep
pub const MAX_LOCATION_PRECISION: u32 = 15;

/// Ranges and constants used when drawing a mock offer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    /// How many leading detail images go into each offer
    pub detail_images_number: usize,
    /// Post date lies this many days before now
    pub min_days_ago: u32,
    pub max_days_ago: u32,
    pub min_price: u32,
    pub max_price: u32,
    pub min_rating: u32,
    pub max_rating: u32,
    pub min_rooms: u32,
    pub max_rooms: u32,
    pub min_guests: u32,
    pub max_guests: u32,
    pub min_comments: u32,
    pub max_comments: u32,
    /// Latitude and longitude bounds, in degrees
    pub min_degrees: f64,
    pub max_degrees: f64,
    /// Decimal digits kept on each coordinate
    pub location_precision: u32,
    /// Password given to every seed user
    pub password_sample: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            detail_images_number: 6,
            min_days_ago: 1,
            max_days_ago: 31,
            min_price: 100,
            max_price: 100_000,
            min_rating: 1,
            max_rating: 5,
            min_rooms: 1,
            max_rooms: 8,
            min_guests: 1,
            max_guests: 10,
            min_comments: 0,
            max_comments: 500,
            min_degrees: 0.0,
            max_degrees: 90.0,
            location_precision: 6,
            password_sample: "testpassword".to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Reject settings that cannot be drawn from
    pub fn validate(&self) -> Result<(), GeneratorError> {
        if self.location_precision > MAX_LOCATION_PRECISION {
            return Err(GeneratorError::InvalidConfig(format!(
                "location_precision {} is above {}",
                self.location_precision, MAX_LOCATION_PRECISION
            )));
        }
        if !(self.max_degrees - self.min_degrees).is_finite() {
            return Err(GeneratorError::InvalidConfig(format!(
                "degree range {}..{} is not finite",
                self.min_degrees, self.max_degrees
            )));
        }
        Ok(())
    }
}
