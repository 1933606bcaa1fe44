use eframe::egui::{Vec2, vec2};

pub(in crate::app) const MIN_SCALE: f32 = 1.0;
pub(in crate::app) const MAX_SCALE: f32 = 200.0;

pub(in crate::app) const CLICK_ZOOM_SECS: f64 = 0.75;
pub(in crate::app) const DOUBLE_CLICK_ZOOM_SECS: f64 = 0.25;

const RHO: f64 = std::f64::consts::SQRT_2;
const RHO2: f64 = 2.0;
const RHO4: f64 = 4.0;
const EPSILON2: f64 = 1e-12;

/// Translate + uniform scale from map coordinates into canvas-local
/// coordinates: `local = world * k + (x, y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct ZoomTransform {
    pub k: f32,
    pub x: f32,
    pub y: f32,
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ZoomTransform {
    pub(in crate::app) const IDENTITY: Self = Self {
        k: 1.0,
        x: 0.0,
        y: 0.0,
    };

    pub(in crate::app) fn clamp_scale(k: f32) -> f32 {
        if k.is_finite() {
            k.clamp(MIN_SCALE, MAX_SCALE)
        } else {
            MIN_SCALE
        }
    }

    pub(in crate::app) fn apply(self, world: Vec2) -> Vec2 {
        world * self.k + vec2(self.x, self.y)
    }

    pub(in crate::app) fn invert(self, local: Vec2) -> Vec2 {
        (local - vec2(self.x, self.y)) / self.k
    }

    pub(in crate::app) fn translate_by(self, delta: Vec2) -> Self {
        Self {
            k: self.k,
            x: self.x + delta.x,
            y: self.y + delta.y,
        }
    }

    /// Rescales while keeping the map point under `anchor` fixed.
    pub(in crate::app) fn scale_about(self, k: f32, anchor: Vec2) -> Self {
        let k = Self::clamp_scale(k);
        let world = self.invert(anchor);
        Self {
            k,
            x: anchor.x - world.x * k,
            y: anchor.y - world.y * k,
        }
    }

    pub(in crate::app) fn centered_on(world: Vec2, k: f32, view_size: Vec2) -> Self {
        let k = Self::clamp_scale(k);
        Self {
            k,
            x: view_size.x / 2.0 - world.x * k,
            y: view_size.y / 2.0 - world.y * k,
        }
    }
}

/// Smooth zoom between two transforms (van Wijk and Nuij), eased
/// cubic-in-out. The clock starts on the first sample.
pub(in crate::app) struct ZoomTransition {
    from: ZoomTransform,
    to: ZoomTransform,
    anchor: [f64; 2],
    width: f64,
    duration_secs: f64,
    started_at: Option<f64>,
}

impl ZoomTransition {
    pub(in crate::app) fn new(
        from: ZoomTransform,
        to: ZoomTransform,
        view_size: Vec2,
        duration_secs: f64,
    ) -> Self {
        Self {
            from,
            to,
            anchor: [f64::from(view_size.x) / 2.0, f64::from(view_size.y) / 2.0],
            width: f64::from(view_size.x.max(view_size.y)).max(1.0),
            duration_secs,
            started_at: None,
        }
    }

    pub(in crate::app) fn target(&self) -> ZoomTransform {
        self.to
    }

    pub(in crate::app) fn sample(&mut self, now: f64) -> (ZoomTransform, bool) {
        let started_at = *self.started_at.get_or_insert(now);
        let progress = if self.duration_secs <= 0.0 {
            1.0
        } else {
            ((now - started_at) / self.duration_secs).clamp(0.0, 1.0)
        };

        if progress >= 1.0 {
            return (self.to, true);
        }

        (self.at(ease_cubic_in_out(progress)), false)
    }

    fn view_of(&self, transform: ZoomTransform) -> [f64; 3] {
        let k = f64::from(transform.k);
        [
            (self.anchor[0] - f64::from(transform.x)) / k,
            (self.anchor[1] - f64::from(transform.y)) / k,
            self.width / k,
        ]
    }

    fn at(&self, t: f64) -> ZoomTransform {
        let [ux, uy, w] = interpolate_zoom(self.view_of(self.from), self.view_of(self.to), t);
        // The path may dip below the scale extent; keep its centre under the anchor.
        let k = f64::from(ZoomTransform::clamp_scale((self.width / w) as f32));
        ZoomTransform {
            k: k as f32,
            x: (self.anchor[0] - ux * k) as f32,
            y: (self.anchor[1] - uy * k) as f32,
        }
    }
}

fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

/// Interpolates between two views `[center_x, center_y, width]` along the
/// path that keeps perceived motion uniform.
fn interpolate_zoom(from: [f64; 3], to: [f64; 3], t: f64) -> [f64; 3] {
    let [ux0, uy0, w0] = from;
    let [ux1, uy1, w1] = to;
    let dx = ux1 - ux0;
    let dy = uy1 - uy0;
    let d2 = dx * dx + dy * dy;

    if d2 < EPSILON2 {
        let s = (w1 / w0).ln() / RHO;
        return [ux0 + t * dx, uy0 + t * dy, w0 * (RHO * t * s).exp()];
    }

    let d1 = d2.sqrt();
    let b0 = (w1 * w1 - w0 * w0 + RHO4 * d2) / (2.0 * w0 * RHO2 * d1);
    let b1 = (w1 * w1 - w0 * w0 - RHO4 * d2) / (2.0 * w1 * RHO2 * d1);
    let r0 = ((b0 * b0 + 1.0).sqrt() - b0).ln();
    let r1 = ((b1 * b1 + 1.0).sqrt() - b1).ln();
    let s = (r1 - r0) / RHO * t;
    let cosh_r0 = r0.cosh();
    let u = w0 / (RHO2 * d1) * (cosh_r0 * (RHO * s + r0).tanh() - r0.sinh());
    [ux0 + u * dx, uy0 + u * dy, w0 * cosh_r0 / (RHO * s + r0).cosh()]
}
