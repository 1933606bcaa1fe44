use std::f64::consts::{PI, TAU};

const INSET_EPSILON: f64 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Region {
    Lower48,
    Alaska,
    Hawaii,
}

/// Conic equal-area projection with a longitude-only rotation.
#[derive(Clone, Copy, Debug)]
struct ConicEqualArea {
    n: f64,
    c: f64,
    r0: f64,
    delta_lambda: f64,
    scale: f64,
    dx: f64,
    dy: f64,
}

impl ConicEqualArea {
    fn new(
        parallels: [f64; 2],
        rotate_deg: f64,
        center_deg: [f64; 2],
        scale: f64,
        translate: [f64; 2],
    ) -> Self {
        let sin_phi0 = parallels[0].to_radians().sin();
        let n = (sin_phi0 + parallels[1].to_radians().sin()) / 2.0;
        let c = 1.0 + sin_phi0 * (2.0 * n - sin_phi0);
        let r0 = c.sqrt() / n;

        let mut projection = Self {
            n,
            c,
            r0,
            delta_lambda: rotate_deg.to_radians(),
            scale,
            dx: 0.0,
            dy: 0.0,
        };

        // The center is expressed in the rotated frame, so it goes straight
        // through the raw projection.
        let (cx, cy) = projection.raw(center_deg[0].to_radians(), center_deg[1].to_radians());
        projection.dx = translate[0] - scale * cx;
        projection.dy = translate[1] + scale * cy;
        projection
    }

    fn raw(&self, lambda: f64, phi: f64) -> (f64, f64) {
        let r = (self.c - 2.0 * self.n * phi.sin()).sqrt() / self.n;
        let x = lambda * self.n;
        (r * x.sin(), self.r0 - r * x.cos())
    }

    fn project(&self, longitude: f64, latitude: f64) -> [f64; 2] {
        let lambda = wrap_longitude(longitude.to_radians() + self.delta_lambda);
        let (x, y) = self.raw(lambda, latitude.to_radians());
        [self.dx + self.scale * x, self.dy - self.scale * y]
    }
}

fn wrap_longitude(lambda: f64) -> f64 {
    if lambda > PI {
        lambda - TAU
    } else if lambda < -PI {
        lambda + TAU
    } else {
        lambda
    }
}

#[derive(Clone, Copy, Debug)]
struct Extent {
    min: [f64; 2],
    max: [f64; 2],
}

impl Extent {
    fn contains(self, point: [f64; 2]) -> bool {
        self.min[0] <= point[0]
            && point[0] <= self.max[0]
            && self.min[1] <= point[1]
            && point[1] <= self.max[1]
    }
}

#[derive(Clone, Copy, Debug)]
struct Inset {
    projection: ConicEqualArea,
    extent: Extent,
}

impl Inset {
    fn project(&self, longitude: f64, latitude: f64) -> Option<[f64; 2]> {
        let point = self.projection.project(longitude, latitude);
        self.extent.contains(point).then_some(point)
    }
}

/// Composite continental US projection: lower 48 states plus scaled
/// Alaska and Hawaii insets placed in the lower-left corner.
#[derive(Clone, Copy, Debug)]
pub struct AlbersUsa {
    lower48: Inset,
    alaska: Inset,
    hawaii: Inset,
}

impl AlbersUsa {
    pub fn new(scale: f64, translate: [f64; 2]) -> Self {
        let k = scale;
        let [x, y] = translate;

        let lower48 = Inset {
            projection: ConicEqualArea::new([29.5, 45.5], 96.0, [-0.6, 38.7], k, translate),
            extent: Extent {
                min: [x - 0.455 * k, y - 0.238 * k],
                max: [x + 0.455 * k, y + 0.238 * k],
            },
        };

        let alaska = Inset {
            projection: ConicEqualArea::new(
                [55.0, 65.0],
                154.0,
                [-2.0, 58.5],
                k * 0.35,
                [x - 0.307 * k, y + 0.201 * k],
            ),
            extent: Extent {
                min: [x - 0.425 * k + INSET_EPSILON, y + 0.120 * k + INSET_EPSILON],
                max: [x - 0.214 * k - INSET_EPSILON, y + 0.234 * k - INSET_EPSILON],
            },
        };

        let hawaii = Inset {
            projection: ConicEqualArea::new(
                [8.0, 18.0],
                157.0,
                [-3.0, 19.9],
                k,
                [x - 0.205 * k, y + 0.212 * k],
            ),
            extent: Extent {
                min: [x - 0.214 * k + INSET_EPSILON, y + 0.166 * k + INSET_EPSILON],
                max: [x - 0.115 * k - INSET_EPSILON, y + 0.234 * k - INSET_EPSILON],
            },
        };

        Self {
            lower48,
            alaska,
            hawaii,
        }
    }

    fn inset(&self, region: Region) -> &Inset {
        match region {
            Region::Lower48 => &self.lower48,
            Region::Alaska => &self.alaska,
            Region::Hawaii => &self.hawaii,
        }
    }

    /// Projects a point with the first inset whose clip extent contains it.
    /// Returns `None` for points outside every inset, including NaN input.
    pub fn project(&self, longitude: f64, latitude: f64) -> Option<[f64; 2]> {
        self.region_of(longitude, latitude)
            .map(|region| self.project_in(region, longitude, latitude))
    }

    pub fn region_of(&self, longitude: f64, latitude: f64) -> Option<Region> {
        [Region::Lower48, Region::Alaska, Region::Hawaii]
            .into_iter()
            .find(|&region| self.inset(region).project(longitude, latitude).is_some())
    }

    /// Projects with a fixed inset and no clipping, so rings that straddle an
    /// inset edge stay closed.
    pub fn project_in(&self, region: Region, longitude: f64, latitude: f64) -> [f64; 2] {
        self.inset(region).projection.project(longitude, latitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_near(actual: [f64; 2], expected: [f64; 2]) {
        assert!(
            (actual[0] - expected[0]).abs() < 0.5 && (actual[1] - expected[1]).abs() < 0.5,
            "expected {expected:?}, got {actual:?}"
        );
    }

    fn reference() -> AlbersUsa {
        AlbersUsa::new(1070.0, [480.0, 250.0])
    }

    #[test]
    fn projects_lower48_cities() {
        let projection = reference();
        let san_francisco = projection.project(-122.4194, 37.7749).expect("in lower48");
        assert_near(san_francisco, [107.4, 214.1]);
        let new_york = projection.project(-74.0059, 40.7128).expect("in lower48");
        assert_near(new_york, [794.6, 176.5]);
        assert_eq!(projection.region_of(-95.9928, 36.1540), Some(Region::Lower48));
    }

    #[test]
    fn projects_alaska_into_its_inset() {
        let projection = reference();
        assert_eq!(projection.region_of(-149.9003, 61.2181), Some(Region::Alaska));
        let anchorage = projection.project(-149.9003, 61.2181).expect("in alaska inset");
        assert_near(anchorage, [171.2, 446.9]);
    }

    #[test]
    fn projects_hawaii_into_its_inset() {
        let projection = reference();
        assert_eq!(projection.region_of(-157.8583, 21.3069), Some(Region::Hawaii));
    }

    #[test]
    fn rejects_points_outside_every_inset() {
        let projection = reference();
        assert!(projection.project(2.3522, 48.8566).is_none());
        assert!(projection.project(f64::NAN, 40.0).is_none());
        assert!(projection.project(-100.0, f64::NAN).is_none());
    }

    #[test]
    fn translate_moves_the_center() {
        let a = AlbersUsa::new(1300.0, [400.0, 300.0]);
        let b = AlbersUsa::new(1300.0, [500.0, 350.0]);
        let pa = a.project(-96.0, 39.0).expect("central US");
        let pb = b.project(-96.0, 39.0).expect("central US");
        assert!((pb[0] - pa[0] - 100.0).abs() < 1e-6);
        assert!((pb[1] - pa[1] - 50.0).abs() < 1e-6);
    }
}
