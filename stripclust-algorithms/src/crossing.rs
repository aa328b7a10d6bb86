//! Stereo crossing of a P-side and an N-side strip.
//!
//! Each side's strips are tilted by its stereo angle. A P strip at
//! intercept `xp` runs along `x = xp + kP * z`, an N strip at intercept
//! `xn` along `x = xn + kN * (dz - z)`, with `z` measured from the module
//! edge. Their intersection, shifted to the module centre, is the local point.

use stripclust_core::geometry::ModuleGeometry;

/// Local coordinates relative to the module centre, geometry length units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalPoint {
    /// Across the strips.
    pub x: f64,
    /// Along the strips.
    pub z: f64,
}

/// Position uncertainty of a crossing point, geometry length units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossingError {
    /// Uncertainty in x.
    pub dx: f64,
    /// Uncertainty in z.
    pub dz: f64,
}

/// Crossing solver bound to one module geometry.
#[derive(Debug, Clone, Copy)]
pub struct CrossingSolver {
    pitch: f64,
    dx: f64,
    dz: f64,
    tan_p: f64,
    tan_n: f64,
}

impl CrossingSolver {
    /// Pre-computes the stereo tangents of `geometry`.
    #[must_use]
    pub fn new(geometry: &ModuleGeometry) -> Self {
        Self {
            pitch: geometry.pitch,
            dx: geometry.dx,
            dz: geometry.dz,
            tan_p: geometry.stereo_p.tan(),
            tan_n: geometry.stereo_n.tan(),
        }
    }

    /// True if the two strip families are parallel and never cross.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        let sum = self.tan_p + self.tan_n;
        sum == 0.0 || !sum.is_finite()
    }

    /// Crossing of the P cluster at `p` and the N cluster at `n` (strip units).
    ///
    /// Returns `None` if the strips meet outside the module.
    #[must_use]
    pub fn solve(&self, p: f64, n: f64) -> Option<LocalPoint> {
        if self.is_degenerate() {
            return None;
        }
        // The N position fixes the intercept of the strip line tilted by
        // the P angle and vice versa.
        let xp = n * self.pitch;
        let xn = p * self.pitch;
        let sum = self.tan_p + self.tan_n;

        let z = (self.dz * self.tan_n - xp + xn) / sum;
        let x = xp + self.tan_p * z;
        let local = LocalPoint {
            x: x - self.dx / 2.0,
            z: z - self.dz / 2.0,
        };

        let inside = local.x.abs() <= self.dx / 2.0 && local.z.abs() <= self.dz / 2.0;
        inside.then_some(local)
    }

    /// Propagates strip-unit position errors `dp`, `dn` to the crossing point.
    #[must_use]
    pub fn error(&self, dp: f64, dn: f64) -> Option<CrossingError> {
        if self.is_degenerate() {
            return None;
        }
        let sum = self.tan_p + self.tan_n;
        let share = self.tan_p / sum;
        Some(CrossingError {
            dx: self.pitch * ((dp * (1.0 - share)).abs() + (dn * share).abs()),
            dz: ((dp + dn) * self.pitch / sum).abs(),
        })
    }
}

/// One-shot form of [`CrossingSolver::solve`].
#[must_use]
pub fn solve_crossing(p: f64, n: f64, geometry: &ModuleGeometry) -> Option<LocalPoint> {
    CrossingSolver::new(geometry).solve(p, n)
}
