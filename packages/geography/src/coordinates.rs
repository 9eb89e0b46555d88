//! City bounds and land/water checks.

use memorial_geography_models::{CityBounds, Coordinate, CoordinateReport};

/// Approximate municipal limits of Salvador.
pub const SALVADOR_BOUNDS: CityBounds = CityBounds {
    north: -12.82,
    south: -13.02,
    east: -38.30,
    west: -38.58,
};

/// Points east of this longitude are treated as open sea.
pub const OCEAN_MAX_LNG: f64 = -38.48;

/// Eastern edge of the Baía de Todos os Santos exclusion.
pub const BAY_MAX_LNG: f64 = -38.48;

/// Northern edge of the Baía de Todos os Santos exclusion.
pub const BAY_MIN_LAT: f64 = -12.95;

/// Inside the city bounds, west of the ocean line and outside the bay box.
#[must_use]
pub fn is_valid_salvador_coordinate(lat: f64, lng: f64) -> bool {
    let not_in_ocean = lng <= OCEAN_MAX_LNG;
    let not_in_bay = !(lng > BAY_MAX_LNG && lat < BAY_MIN_LAT);
    SALVADOR_BOUNDS.contains(lat, lng) && not_in_ocean && not_in_bay
}

/// Splits `coordinates` into valid and invalid, with one warning for each
/// rule an invalid coordinate breaks.
#[must_use]
pub fn validate_coordinates(coordinates: &[Coordinate]) -> CoordinateReport {
    let mut report = CoordinateReport::default();

    for coordinate in coordinates {
        if is_valid_salvador_coordinate(coordinate.lat, coordinate.lng) {
            report.valid.push(coordinate.clone());
            continue;
        }

        let Coordinate { lat, lng, name } = coordinate;
        if *lng > OCEAN_MAX_LNG {
            report
                .warnings
                .push(format!("{name}: Coordenada pode estar no mar (lng: {lng})"));
        }
        if !SALVADOR_BOUNDS.contains_lat(*lat) {
            report.warnings.push(format!(
                "{name}: Latitude fora dos limites de Salvador (lat: {lat})"
            ));
        }
        if !SALVADOR_BOUNDS.contains_lng(*lng) {
            report.warnings.push(format!(
                "{name}: Longitude fora dos limites de Salvador (lng: {lng})"
            ));
        }
        log::debug!("Rejected coordinate {name} ({lat}, {lng})");
        report.invalid.push(coordinate.clone());
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coordinate(name: &str, lat: f64, lng: f64) -> Coordinate {
        Coordinate {
            lat,
            lng,
            name: name.to_string(),
        }
    }

    #[test]
    fn accepts_points_on_land() {
        assert!(is_valid_salvador_coordinate(-12.9714, -38.5145));
        assert!(is_valid_salvador_coordinate(-13.0106, -38.5326));
    }

    #[test]
    fn rejects_ocean_and_bounds() {
        // Itapuã sits east of the ocean line.
        assert!(!is_valid_salvador_coordinate(-12.945, -38.365));
        assert!(!is_valid_salvador_coordinate(-12.5, -38.5));
        assert!(!is_valid_salvador_coordinate(-12.97, -38.7));
    }

    #[test]
    fn warns_per_rule() {
        let report = validate_coordinates(&[
            coordinate("Pelourinho", -12.9714, -38.5145),
            coordinate("Mar", -12.90, -38.20),
            coordinate("Norte", -12.50, -38.50),
        ]);

        assert_eq!(report.valid.len(), 1);
        assert_eq!(report.invalid.len(), 2);
        assert_eq!(
            report.warnings,
            vec![
                "Mar: Coordenada pode estar no mar (lng: -38.2)".to_string(),
                "Mar: Longitude fora dos limites de Salvador (lng: -38.2)".to_string(),
                "Norte: Latitude fora dos limites de Salvador (lat: -12.5)".to_string(),
            ]
        );
    }

    #[test]
    fn empty_input() {
        assert_eq!(validate_coordinates(&[]), CoordinateReport::default());
    }
}
