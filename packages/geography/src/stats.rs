//! Per-neighborhood homicide counts and rates.

use memorial_geography_models::{Neighborhood, NeighborhoodCount, NeighborhoodStats};

use crate::neighborhoods::NEIGHBORHOODS;

/// Rates are expressed per this many residents.
pub const RATE_BASE: f64 = 100_000.0;

fn round_one_decimal(value: f64) -> f64 {
    (value.mul_add(10.0, 0.5)).floor() / 10.0
}

/// `round(total * share)`, halves rounding up.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn estimated_homicides(total: u64, share: f64) -> u64 {
    let estimate = (total as f64).mul_add(share, 0.5).floor();
    if estimate <= 0.0 { 0 } else { estimate as u64 }
}

/// Finds the real count whose name contains, or is contained in, the
/// neighborhood name (case-insensitive).
fn matching_count<'a>(
    neighborhood: &Neighborhood,
    real: &'a [NeighborhoodCount],
) -> Option<&'a NeighborhoodCount> {
    let name = neighborhood.name.to_lowercase();
    real.iter().find(|count| {
        let reported = count.neighborhood.trim().to_lowercase();
        !reported.is_empty() && (reported.contains(&name) || name.contains(&reported))
    })
}

/// Stats for one neighborhood given the city total and any real counts.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn stats_for(
    neighborhood: &Neighborhood,
    total_homicides: u64,
    real: &[NeighborhoodCount],
) -> NeighborhoodStats {
    let matched = matching_count(neighborhood, real);
    let homicides = matched.map_or_else(
        || estimated_homicides(total_homicides, neighborhood.violence_share),
        |count| count.homicides,
    );
    let rate = homicides as f64 / f64::from(neighborhood.population) * RATE_BASE;

    NeighborhoodStats {
        id: neighborhood.id.to_string(),
        name: neighborhood.name.to_string(),
        lat: neighborhood.lat,
        lng: neighborhood.lng,
        homicides,
        from_source: matched.is_some(),
        population: neighborhood.population,
        rate: round_one_decimal(rate),
        description: neighborhood.description.to_string(),
        level: neighborhood.level,
        violence_share: neighborhood.violence_share,
    }
}

/// Stats for every neighborhood in the table, in table order.
#[must_use]
pub fn neighborhood_stats(total_homicides: u64, real: &[NeighborhoodCount]) -> Vec<NeighborhoodStats> {
    NEIGHBORHOODS
        .iter()
        .map(|n| stats_for(n, total_homicides, real))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimates_from_share() {
        let stats = neighborhood_stats(161, &[]);

        let centro = &stats[0];
        assert_eq!(centro.id, "centro-historico");
        // 161 * 0.18 = 28.98
        assert_eq!(centro.homicides, 29);
        assert!(!centro.from_source);
        // 29 / 45 000 * 100 000 = 64.44
        assert!((centro.rate - 64.4).abs() < 1e-9);

        let barra = stats.iter().find(|s| s.id == "barra").unwrap();
        // 161 * 0.06 = 9.66
        assert_eq!(barra.homicides, 10);
        assert!((barra.rate - 33.3).abs() < 1e-9);
    }

    #[test]
    fn half_rounds_up() {
        assert_eq!(estimated_homicides(25, 0.1), 3);
        assert_eq!(estimated_homicides(0, 0.5), 0);
    }

    #[test]
    fn real_counts_match_either_way() {
        let real = vec![
            NeighborhoodCount {
                neighborhood: "LIBERDADE".to_string(),
                homicides: 40,
            },
            NeighborhoodCount {
                neighborhood: "Fazenda Grande do Retiro".to_string(),
                homicides: 7,
            },
            NeighborhoodCount {
                neighborhood: "Subúrbio".to_string(),
                homicides: 3,
            },
        ];
        let stats = neighborhood_stats(100, &real);
        let by_id = |id: &str| stats.iter().find(|s| s.id == id).unwrap();

        assert_eq!(by_id("liberdade").homicides, 40);
        assert!(by_id("liberdade").from_source);
        assert_eq!(by_id("fazenda-grande").homicides, 7);
        assert_eq!(by_id("suburbio").homicides, 3);
        assert!(!by_id("brotas").from_source);
        assert_eq!(by_id("brotas").homicides, 10);
    }

    #[test]
    fn blank_names_never_match() {
        let real = vec![NeighborhoodCount {
            neighborhood: "  ".to_string(),
            homicides: 999,
        }];
        let stats = neighborhood_stats(0, &real);
        assert!(stats.iter().all(|s| s.homicides == 0 && !s.from_source));
    }
}
