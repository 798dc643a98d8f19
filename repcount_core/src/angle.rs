//! Joint angles from landmark triples.
//!
//! The angle at the vertex is the unsigned angle between `proximal − vertex`
//! and `distal − vertex`, computed as the inverse cosine of their normalized
//! dot product in `f64`. The cosine is clamped to [-1, 1] before `acos`, so
//! rounding can never yield NaN, and the result lies in [0°, 180°].

use repcount_traits::Landmark;

use crate::config::GateCfg;

/// Segments shorter than this (normalized image units) are treated as coincident landmarks.
pub const MIN_SEGMENT_LEN: f64 = 1e-4;

/// Which coordinates take part in the angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Projection {
    /// x and y only; depth is ignored even when present.
    #[default]
    Planar,
    /// x, y and z. All three landmarks must carry a finite z.
    Spatial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validity {
    Valid,
    /// A landmark is missing or below the confidence threshold.
    LowConfidence,
    /// Geometry is undefined (coincident or non-finite landmarks).
    Degenerate,
}

/// Result of one angle computation. `degrees` is present iff the sample is valid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleSample {
    degrees: Option<f32>,
    validity: Validity,
}

impl AngleSample {
    pub fn valid(degrees: f32) -> Self {
        Self {
            degrees: Some(degrees),
            validity: Validity::Valid,
        }
    }

    pub fn low_confidence() -> Self {
        Self {
            degrees: None,
            validity: Validity::LowConfidence,
        }
    }

    pub fn degenerate() -> Self {
        Self {
            degrees: None,
            validity: Validity::Degenerate,
        }
    }

    #[inline]
    pub fn degrees(&self) -> Option<f32> {
        self.degrees
    }

    #[inline]
    pub fn validity(&self) -> Validity {
        self.validity
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.validity == Validity::Valid
    }
}

/// Confidence gate plus angle geometry, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleEngine {
    confidence_threshold: f32,
    projection: Projection,
}

impl Default for AngleEngine {
    fn default() -> Self {
        Self::from_gate(&GateCfg::default())
    }
}

impl AngleEngine {
    pub fn new(confidence_threshold: f32, projection: Projection) -> Self {
        Self {
            confidence_threshold,
            projection,
        }
    }

    pub fn from_gate(gate: &GateCfg) -> Self {
        Self::new(gate.confidence_threshold, gate.projection)
    }

    pub fn confidence_threshold(&self) -> f32 {
        self.confidence_threshold
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    /// Angle at `vertex`. Missing landmarks count as low confidence.
    pub fn compute(
        &self,
        proximal: Option<&Landmark>,
        vertex: Option<&Landmark>,
        distal: Option<&Landmark>,
    ) -> AngleSample {
        let (Some(p), Some(v), Some(d)) = (proximal, vertex, distal) else {
            return AngleSample::low_confidence();
        };
        if ![p, v, d].into_iter().all(|lm| self.is_confident(lm)) {
            return AngleSample::low_confidence();
        }
        match joint_angle_deg(p, v, d, self.projection) {
            Some(deg) => AngleSample::valid(deg),
            None => AngleSample::degenerate(),
        }
    }

    // NaN confidence compares false and is rejected.
    #[inline]
    fn is_confident(&self, lm: &Landmark) -> bool {
        matches!(lm.confidence, Some(c) if c >= self.confidence_threshold)
    }
}

/// Unsigned angle at `vertex` in degrees, or `None` when the geometry is undefined.
pub fn joint_angle_deg(
    proximal: &Landmark,
    vertex: &Landmark,
    distal: &Landmark,
    projection: Projection,
) -> Option<f32> {
    let a = coords(proximal, projection)?;
    let b = coords(vertex, projection)?;
    let c = coords(distal, projection)?;

    let v1 = sub(a, b);
    let v2 = sub(c, b);
    let n1 = norm(v1);
    let n2 = norm(v2);
    if !(n1 >= MIN_SEGMENT_LEN && n2 >= MIN_SEGMENT_LEN) {
        return None;
    }

    let cos = dot(v1, v2) / (n1 * n2);
    if !cos.is_finite() {
        return None;
    }
    let deg = fold_half_turn(cos.clamp(-1.0, 1.0).acos().to_degrees());
    Some(deg as f32)
}

/// Reflect any angle into [0°, 180°] (`θ > 180°` becomes `360° − θ`).
#[inline]
pub fn fold_half_turn(deg: f64) -> f64 {
    let d = deg.rem_euclid(360.0);
    if d > 180.0 { 360.0 - d } else { d }
}

fn coords(lm: &Landmark, projection: Projection) -> Option<[f64; 3]> {
    let z = match projection {
        Projection::Planar => 0.0,
        Projection::Spatial => f64::from(lm.z?),
    };
    let p = [f64::from(lm.x), f64::from(lm.y), z];
    p.iter().all(|c| c.is_finite()).then_some(p)
}

#[inline]
fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[inline]
fn norm(a: [f64; 3]) -> f64 {
    dot(a, a).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Polar-angle difference, planar only. Kept here to check agreement.
    fn polar_difference_deg(p: &Landmark, v: &Landmark, d: &Landmark) -> f64 {
        let a1 = f64::from(p.y - v.y).atan2(f64::from(p.x - v.x));
        let a2 = f64::from(d.y - v.y).atan2(f64::from(d.x - v.x));
        fold_half_turn((a2 - a1).to_degrees().abs())
    }

    #[test]
    fn agrees_with_polar_difference_in_the_plane() {
        let v = Landmark::new(0.5, 0.5);
        for step in 0..72_i32 {
            let theta = f64::from(step) * 5.0_f64.to_radians();
            let p = Landmark::new(0.5 + 0.2 * theta.cos() as f32, 0.5 + 0.2 * theta.sin() as f32);
            for other in 0..72_i32 {
                let phi = f64::from(other) * 5.0_f64.to_radians() + 0.013;
                let d = Landmark::new(0.5 + 0.3 * phi.cos() as f32, 0.5 + 0.3 * phi.sin() as f32);
                let acos = f64::from(joint_angle_deg(&p, &v, &d, Projection::Planar).unwrap());
                let polar = polar_difference_deg(&p, &v, &d);
                assert!(
                    (acos - polar).abs() < 1e-2,
                    "theta={theta} phi={phi}: acos={acos} polar={polar}"
                );
            }
        }
    }

    #[test]
    fn folds_reflex_angles() {
        assert_eq!(fold_half_turn(190.0), 170.0);
        assert_eq!(fold_half_turn(360.0), 0.0);
        assert_eq!(fold_half_turn(-90.0), 90.0);
        assert_eq!(fold_half_turn(180.0), 180.0);
    }

    #[test]
    fn collinear_opposite_segments_are_straight() {
        let deg = joint_angle_deg(
            &Landmark::new(0.5, 0.3),
            &Landmark::new(0.5, 0.5),
            &Landmark::new(0.5, 0.7),
            Projection::Planar,
        )
        .unwrap();
        assert!((deg - 180.0).abs() < 1e-3);
    }
}
