use rand::Rng;

use crate::config::MapConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// Uniformly scattered points inside the configured bounding box
pub fn random_locations<R: Rng + ?Sized>(rng: &mut R, config: &MapConfig) -> Vec<Location> {
    let (lat_lo, lat_hi) = ordered(config.lat_min, config.lat_max);
    let (lon_lo, lon_hi) = ordered(config.lon_min, config.lon_max);

    (0..config.point_count)
        .map(|_| Location {
            latitude: sample(rng, lat_lo, lat_hi),
            longitude: sample(rng, lon_lo, lon_hi),
        })
        .collect()
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

fn sample<R: Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    if lo == hi {
        lo
    } else {
        rng.random_range(lo..hi)
    }
}

/// Canvas bounds `[x_min, x_max]`, `[y_min, y_max]` around the view centre, in degrees.
/// Wide enough to show every point with a small margin.
pub fn view_bounds(config: &MapConfig) -> ([f64; 2], [f64; 2]) {
    let half_lon = (config.center_lon - config.lon_min)
        .abs()
        .max((config.lon_max - config.center_lon).abs())
        * 1.1;
    let half_lat = (config.center_lat - config.lat_min)
        .abs()
        .max((config.lat_max - config.center_lat).abs())
        * 1.1;

    (
        [config.center_lon - half_lon, config.center_lon + half_lon],
        [config.center_lat - half_lat, config.center_lat + half_lat],
    )
}
