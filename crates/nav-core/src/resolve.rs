//! Turning location text into coordinates.
//!
//! The core only parses numeric input. Free-text lookup belongs to an
//! external geocoder plugged in through [`LocationResolver`].

use crate::error::{RouteError, ValidationError};
use crate::models::Coordinate;

/// Anything that can turn a location string into a coordinate.
pub trait LocationResolver {
    fn resolve(&self, text: &str) -> Result<Coordinate, RouteError>;
}

/// Outcome of parsing a location parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedLocation {
    /// A `lon,lat` numeric pair
    Coordinate(Coordinate),
    /// Free text that needs geocoding
    Place(String),
}

/// Parse `"lon,lat"` pairs; anything without a comma is a place name.
///
/// `current` is rejected because the client must send its own position as
/// numbers.
pub fn parse_location(text: &str) -> Result<ParsedLocation, ValidationError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ValidationError::new("missing location"));
    }
    if text.eq_ignore_ascii_case("current") {
        return Err(ValidationError::new(
            "current location must be sent as numeric coordinates",
        ));
    }
    if !text.contains(',') {
        return Ok(ParsedLocation::Place(text.to_string()));
    }

    let mut parts = text.split(',').map(str::trim);
    let (Some(lon), Some(lat), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(ValidationError::new(format!(
            "expected 'lon,lat' but got '{}'",
            text
        )));
    };
    let lon: f64 = lon
        .parse()
        .map_err(|_| ValidationError::new(format!("invalid longitude '{}'", lon)))?;
    let lat: f64 = lat
        .parse()
        .map_err(|_| ValidationError::new(format!("invalid latitude '{}'", lat)))?;

    let coordinate = Coordinate::new(lat, lon);
    coordinate.validate()?;
    Ok(ParsedLocation::Coordinate(coordinate))
}

/// Resolver that only accepts numeric `lon,lat` input.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericResolver;

impl LocationResolver for NumericResolver {
    fn resolve(&self, text: &str) -> Result<Coordinate, RouteError> {
        match parse_location(text)? {
            ParsedLocation::Coordinate(coordinate) => Ok(coordinate),
            ParsedLocation::Place(query) => Err(RouteError::UnresolvableLocation { query }),
        }
    }
}
