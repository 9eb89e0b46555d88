//! Victim-light placement.
//!
//! Each homicide becomes one light near its neighborhood centre. Points
//! are drawn inside a cone pointing away from the water for that
//! neighborhood and kept only when they land inside [`SCATTER_BOUNDS`].

use std::f64::consts::PI;

use memorial_geography_models::{CityBounds, NeighborhoodStats, VictimLight};
use rand::Rng;

/// Tighter box used when accepting scattered points.
pub const SCATTER_BOUNDS: CityBounds = CityBounds {
    north: -12.86,
    south: -13.02,
    east: -38.35,
    west: -38.54,
};

/// Points east of this longitude are too close to the coast.
pub const SCATTER_MAX_LNG: f64 = -38.36;

/// Draws per light before falling back to a jitter around the centre.
pub const MAX_ATTEMPTS: usize = 10;

/// Every radius starts at this offset from the centre.
pub const MIN_RADIUS: f64 = 0.002;

/// Full width of the fallback jitter box.
pub const FALLBACK_JITTER: f64 = 0.003;

/// Preferred bearing for a neighborhood's lights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Direction {
    /// Radians; `0` points north, `PI / 2` east.
    Fixed(f64),
    /// A fresh random bearing on every draw.
    Any,
}

/// How far and which way lights spread around a centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterConfig {
    /// Added on top of [`MIN_RADIUS`], scaled by a uniform draw.
    pub max_radius: f64,
    /// Centre of the half-circle cone.
    pub direction: Direction,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            max_radius: 0.008,
            direction: Direction::Fixed(PI * 1.25),
        }
    }
}

/// Scatter configuration for a neighborhood slug.
#[must_use]
pub fn scatter_config(id: &str) -> ScatterConfig {
    let (max_radius, direction) = match id {
        "centro-historico" => (0.006, Direction::Fixed(PI * 1.25)),
        "liberdade" => (0.008, Direction::Fixed(PI * 1.5)),
        "suburbio" => (0.008, Direction::Fixed(PI)),
        "cajazeiras" => (0.012, Direction::Any),
        "itapua" | "periperi" => (0.008, Direction::Fixed(PI * 1.25)),
        "brotas" => (0.006, Direction::Fixed(PI * 0.75)),
        "barra" => (0.005, Direction::Fixed(PI * 0.5)),
        "fazenda-grande" => (0.007, Direction::Fixed(PI * 1.5)),
        _ => return ScatterConfig::default(),
    };
    ScatterConfig {
        max_radius,
        direction,
    }
}

/// Whether a scattered point is acceptable.
#[must_use]
pub fn is_valid_scatter_point(lat: f64, lng: f64) -> bool {
    SCATTER_BOUNDS.contains(lat, lng) && lng <= SCATTER_MAX_LNG
}

fn draw<R: Rng + ?Sized>(rng: &mut R, lat: f64, lng: f64, config: ScatterConfig) -> (f64, f64) {
    let direction = match config.direction {
        Direction::Fixed(angle) => angle,
        Direction::Any => rng.r#gen::<f64>() * 2.0 * PI,
    };
    let angle = (rng.r#gen::<f64>() - 0.5).mul_add(PI, direction);
    let radius = rng.r#gen::<f64>().mul_add(config.max_radius, MIN_RADIUS);
    (angle.cos().mul_add(radius, lat), angle.sin().mul_add(radius, lng))
}

fn place_light<R: Rng + ?Sized>(rng: &mut R, stats: &NeighborhoodStats) -> (f64, f64) {
    let config = scatter_config(&stats.id);

    for _ in 0..MAX_ATTEMPTS {
        let (lat, lng) = draw(rng, stats.lat, stats.lng, config);
        if is_valid_scatter_point(lat, lng) {
            return (lat, lng);
        }
    }

    let lat = (rng.r#gen::<f64>() - 0.5).mul_add(FALLBACK_JITTER, stats.lat);
    let lng = (rng.r#gen::<f64>() - 0.5).mul_add(FALLBACK_JITTER, stats.lng);
    (lat, lng)
}

/// One light per homicide in each neighborhood, in input order.
pub fn scatter_victim_lights<R: Rng + ?Sized>(
    stats: &[NeighborhoodStats],
    rng: &mut R,
) -> Vec<VictimLight> {
    let capacity = stats
        .iter()
        .map(|s| usize::try_from(s.homicides).unwrap_or(usize::MAX))
        .fold(0_usize, usize::saturating_add);
    let mut lights = Vec::with_capacity(capacity);

    for neighborhood in stats {
        for _ in 0..neighborhood.homicides {
            let (lat, lng) = place_light(rng, neighborhood);
            lights.push(VictimLight {
                lat,
                lng,
                neighborhood: neighborhood.name.clone(),
            });
        }
    }

    log::debug!("Scattered {} victim lights", lights.len());
    lights
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng as _, rngs::StdRng};

    use super::*;
    use crate::stats::neighborhood_stats;

    #[test]
    fn one_light_per_homicide() {
        let stats = neighborhood_stats(161, &[]);
        let expected: u64 = stats.iter().map(|s| s.homicides).sum();

        let mut rng = StdRng::seed_from_u64(7);
        let lights = scatter_victim_lights(&stats, &mut rng);

        assert_eq!(lights.len() as u64, expected);
        let in_barra = lights.iter().filter(|l| l.neighborhood == "Barra").count();
        assert_eq!(in_barra as u64, stats[6].homicides);
    }

    #[test]
    fn lights_stay_near_their_centre() {
        let stats = neighborhood_stats(161, &[]);
        let mut rng = StdRng::seed_from_u64(42);
        let lights = scatter_victim_lights(&stats, &mut rng);

        for light in &lights {
            let centre = stats.iter().find(|s| s.name == light.neighborhood).unwrap();
            let config = scatter_config(&centre.id);
            let reach = MIN_RADIUS + config.max_radius;
            assert!((light.lat - centre.lat).abs() <= reach + 1e-12);
            assert!((light.lng - centre.lng).abs() <= reach + 1e-12);
        }
    }

    #[test]
    fn accepted_points_are_valid_or_jittered() {
        let stats = neighborhood_stats(161, &[]);
        let mut rng = StdRng::seed_from_u64(3);
        let lights = scatter_victim_lights(&stats, &mut rng);

        for light in &lights {
            let centre = stats.iter().find(|s| s.name == light.neighborhood).unwrap();
            let jittered = (light.lat - centre.lat).abs() <= FALLBACK_JITTER / 2.0
                && (light.lng - centre.lng).abs() <= FALLBACK_JITTER / 2.0;
            assert!(is_valid_scatter_point(light.lat, light.lng) || jittered);
        }
    }

    #[test]
    fn same_seed_same_lights() {
        let stats = neighborhood_stats(50, &[]);
        let first = scatter_victim_lights(&stats, &mut StdRng::seed_from_u64(9));
        let second = scatter_victim_lights(&stats, &mut StdRng::seed_from_u64(9));
        assert_eq!(first, second);
    }

    #[test]
    fn unknown_slug_uses_default() {
        assert_eq!(scatter_config("nowhere"), ScatterConfig::default());
        assert_eq!(scatter_config("cajazeiras").direction, Direction::Any);
    }

    #[test]
    fn no_homicides_no_lights() {
        let stats = neighborhood_stats(0, &[]);
        let lights = scatter_victim_lights(&stats, &mut StdRng::seed_from_u64(1));
        assert!(lights.is_empty());
    }
}
