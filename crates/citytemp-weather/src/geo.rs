//! Bounding-box geometry around a city.
//!
//! Kilometres are converted to degrees with a single fixed factor on both
//! axes. That holds near the equator only: a degree of longitude shrinks
//! with `cos(latitude)`, so boxes at high latitudes cover less ground east
//! to west than the radius suggests. Callers get exactly this approximation;
//! it is not corrected here.

use crate::types::{BoundingBox, Coordinates};

/// Kilometres per degree of arc
pub const KM_PER_DEGREE: f64 = 111.139;

/// Result-limiting "zoom" parameter of the box lookup
pub const DEFAULT_ZOOM: u32 = 10;

/// Decimal places kept from the city's coordinates
const CENTER_DECIMALS: i32 = 4;

fn round_coordinate(value: f64) -> f64 {
    let scale = 10f64.powi(CENTER_DECIMALS);
    (value * scale).round() / scale
}

impl BoundingBox {
    /// Square box centred on `center` with half-width `radius_km / KM_PER_DEGREE`.
    ///
    /// The centre is first rounded to four decimal places, the precision
    /// the box lookup is sent with.
    pub fn around(center: Coordinates, radius_km: f64) -> Self {
        let lon = round_coordinate(center.longitude);
        let lat = round_coordinate(center.latitude);
        let dd = radius_km / KM_PER_DEGREE;
        Self {
            lon_min: lon - dd,
            lon_max: lon + dd,
            lat_min: lat - dd,
            lat_max: lat + dd,
        }
    }

    pub fn center(&self) -> Coordinates {
        Coordinates {
            longitude: (self.lon_min + self.lon_max) / 2.0,
            latitude: (self.lat_min + self.lat_max) / 2.0,
        }
    }

    /// Half-widths in degrees as `(longitude, latitude)`
    pub fn half_width(&self) -> (f64, f64) {
        (
            (self.lon_max - self.lon_min) / 2.0,
            (self.lat_max - self.lat_min) / 2.0,
        )
    }

    /// `bbox` parameter: `lon_min,lat_min,lon_max,lat_max,zoom`
    pub fn to_query(&self, zoom: u32) -> String {
        format!(
            "{:.4},{:.4},{:.4},{:.4},{}",
            self.lon_min, self.lat_min, self.lon_max, self.lat_max, zoom
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn moscow() -> Coordinates {
        Coordinates {
            longitude: 37.6156,
            latitude: 55.7522,
        }
    }

    #[test]
    fn test_box_is_centered_for_all_radii() {
        for radius in [0.0, 1.0, 30.0, 100.0, 555.5] {
            let bbox = BoundingBox::around(moscow(), radius);
            let center = bbox.center();
            assert!((center.longitude - 37.6156).abs() < EPS, "radius {}", radius);
            assert!((center.latitude - 55.7522).abs() < EPS, "radius {}", radius);

            let (lon_hw, lat_hw) = bbox.half_width();
            let expected = radius / KM_PER_DEGREE;
            assert!((lon_hw - expected).abs() < EPS, "radius {}", radius);
            assert!((lat_hw - expected).abs() < EPS, "radius {}", radius);
        }
    }

    #[test]
    fn test_zero_radius_collapses_to_point() {
        let bbox = BoundingBox::around(moscow(), 0.0);
        assert_eq!(bbox.lon_min, bbox.lon_max);
        assert_eq!(bbox.lat_min, bbox.lat_max);
    }

    #[test]
    fn test_one_degree_radius() {
        let bbox = BoundingBox::around(
            Coordinates {
                longitude: 0.0,
                latitude: 0.0,
            },
            KM_PER_DEGREE,
        );
        assert!((bbox.lon_min + 1.0).abs() < EPS);
        assert!((bbox.lat_max - 1.0).abs() < EPS);
    }

    #[test]
    fn test_center_rounded_to_four_places() {
        let center = Coordinates {
            longitude: 37.61564,
            latitude: -55.75226,
        };
        let bbox = BoundingBox::around(center, 30.0);
        let rounded = bbox.center();
        assert!((rounded.longitude - 37.6156).abs() < EPS);
        assert!((rounded.latitude + 55.7523).abs() < EPS);

        let dd = 30.0 / KM_PER_DEGREE;
        assert!((bbox.lon_min - (37.6156 - dd)).abs() < EPS);
        assert!((bbox.lat_max - (-55.7523 + dd)).abs() < EPS);
    }

    #[test]
    fn test_to_query_format() {
        let bbox = BoundingBox {
            lon_min: 12.0,
            lon_max: 15.5,
            lat_min: 32.0,
            lat_max: 37.25,
        };
        assert_eq!(bbox.to_query(DEFAULT_ZOOM), "12.0000,32.0000,15.5000,37.2500,10");
    }
}
