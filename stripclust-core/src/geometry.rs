//! Module geometry and geometry lookup.
//!
//! Lengths are in microns by convention; any unit works as long as pitch
//! and extents agree.

use crate::digit::Side;
use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Geometry of one double-sided strip module.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ModuleGeometry {
    /// Strip pitch.
    pub pitch: f64,
    /// Module extent across the strips (x).
    pub dx: f64,
    /// Module extent along the strips (z).
    pub dz: f64,
    /// P-side stereo angle (radians).
    pub stereo_p: f64,
    /// N-side stereo angle (radians).
    pub stereo_n: f64,
}

/// Number of strips a stereo strip drifts across over the module length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StepFactors {
    /// P side.
    pub forward: i64,
    /// N side.
    pub backward: i64,
}

impl ModuleGeometry {
    /// Creates a module geometry.
    #[must_use]
    pub fn new(pitch: f64, dx: f64, dz: f64, stereo_p: f64, stereo_n: f64) -> Self {
        Self {
            pitch,
            dx,
            dz,
            stereo_p,
            stereo_n,
        }
    }

    /// ALICE ITS layer 5 SSD module (microns).
    #[must_use]
    pub fn alice_ssd_layer5() -> Self {
        Self::new(95.0, 72_960.0, 40_000.0, 0.0075, 0.0275)
    }

    /// ALICE ITS layer 6 SSD module; stereo angles swapped with respect to layer 5.
    #[must_use]
    pub fn alice_ssd_layer6() -> Self {
        Self::new(95.0, 72_960.0, 40_000.0, 0.0275, 0.0075)
    }

    /// Stereo angle of a side.
    #[inline]
    #[must_use]
    pub fn stereo(&self, side: Side) -> f64 {
        match side {
            Side::P => self.stereo_p,
            Side::N => self.stereo_n,
        }
    }

    /// Half extents `(dx/2, dz/2)`.
    #[inline]
    #[must_use]
    pub fn half_extents(&self) -> (f64, f64) {
        (self.dx / 2.0, self.dz / 2.0)
    }

    /// Step factors of both sides, truncated toward zero.
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn step_factors(&self) -> StepFactors {
        StepFactors {
            forward: (self.stereo_p * self.dz / self.pitch).trunc() as i64,
            backward: (self.stereo_n * self.dz / self.pitch).trunc() as i64,
        }
    }

    /// Checks that the geometry describes a real module.
    pub fn validate(&self) -> Result<()> {
        if !(self.pitch.is_finite() && self.pitch > 0.0) {
            return Err(Error::InvalidGeometry(format!(
                "pitch must be positive, got {}",
                self.pitch
            )));
        }
        if !(self.dx.is_finite() && self.dx > 0.0 && self.dz.is_finite() && self.dz > 0.0) {
            return Err(Error::InvalidGeometry(format!(
                "extents must be positive, got dx={} dz={}",
                self.dx, self.dz
            )));
        }
        if !(self.stereo_p.is_finite() && self.stereo_n.is_finite()) {
            return Err(Error::InvalidGeometry(
                "stereo angles must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

/// Read access to per-module geometry.
pub trait GeometryProvider: Send + Sync {
    /// Geometry of `module`, or `None` if the module is unknown.
    fn geometry(&self, module: u32) -> Option<ModuleGeometry>;

    /// Like [`GeometryProvider::geometry`] but reports unknown modules as errors.
    fn require(&self, module: u32) -> Result<ModuleGeometry> {
        self.geometry(module).ok_or(Error::UnknownModule(module))
    }
}

/// A single geometry shared by every module.
impl GeometryProvider for ModuleGeometry {
    fn geometry(&self, _module: u32) -> Option<ModuleGeometry> {
        Some(*self)
    }
}

/// A contiguous range of module ids forming one detector layer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Layer {
    /// Layer number.
    pub number: u32,
    /// First module id of the layer.
    pub first_module: u32,
    /// Number of modules in the layer.
    pub modules: u32,
    /// Geometry shared by all modules of the layer.
    pub geometry: ModuleGeometry,
}

impl Layer {
    /// True if `module` belongs to this layer.
    #[must_use]
    pub fn contains(&self, module: u32) -> bool {
        module >= self.first_module && module - self.first_module < self.modules
    }
}

/// Geometry lookup by layer membership of the module id.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LayeredGeometry {
    layers: Vec<Layer>,
}

impl LayeredGeometry {
    /// Creates an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a layer; the geometry is validated and ranges may not overlap.
    pub fn add_layer(&mut self, layer: Layer) -> Result<()> {
        layer.geometry.validate()?;
        if let Some(other) = self.layers.iter().find(|other| {
            layer.first_module < other.first_module.saturating_add(other.modules)
                && other.first_module < layer.first_module.saturating_add(layer.modules)
        }) {
            return Err(Error::ConfigError(format!(
                "layer {} overlaps module range of layer {}",
                layer.number, other.number
            )));
        }
        self.layers.push(layer);
        Ok(())
    }

    /// Builder form of [`LayeredGeometry::add_layer`].
    pub fn with_layer(
        mut self,
        number: u32,
        first_module: u32,
        modules: u32,
        geometry: ModuleGeometry,
    ) -> Result<Self> {
        self.add_layer(Layer {
            number,
            first_module,
            modules,
            geometry,
        })?;
        Ok(self)
    }

    /// The two ALICE SSD layers: 748 modules on layer 5 then 950 on layer 6.
    #[must_use]
    pub fn alice_ssd() -> Self {
        Self {
            layers: vec![
                Layer {
                    number: 5,
                    first_module: 0,
                    modules: 748,
                    geometry: ModuleGeometry::alice_ssd_layer5(),
                },
                Layer {
                    number: 6,
                    first_module: 748,
                    modules: 950,
                    geometry: ModuleGeometry::alice_ssd_layer6(),
                },
            ],
        }
    }

    /// Layer that owns `module`.
    #[must_use]
    pub fn layer_of(&self, module: u32) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.contains(module))
    }

    /// Configured layers.
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }
}

impl GeometryProvider for LayeredGeometry {
    fn geometry(&self, module: u32) -> Option<ModuleGeometry> {
        self.layer_of(module).map(|layer| layer.geometry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stereo_by_side() {
        let geom = ModuleGeometry::alice_ssd_layer5();
        assert!((geom.stereo(Side::P) - 0.0075).abs() < f64::EPSILON);
        assert!((geom.stereo(Side::N) - 0.0275).abs() < f64::EPSILON);
        let swapped = ModuleGeometry::alice_ssd_layer6();
        assert!((swapped.stereo(Side::P) - 0.0275).abs() < f64::EPSILON);
    }

    #[test]
    fn test_step_factors() {
        // 0.0075 * 40000 / 95 = 3.157..., 0.0275 * 40000 / 95 = 11.578...
        let steps = ModuleGeometry::alice_ssd_layer5().step_factors();
        assert_eq!(steps.forward, 3);
        assert_eq!(steps.backward, 11);
    }

    #[test]
    fn test_validate_rejects_bad_pitch() {
        let geom = ModuleGeometry::new(0.0, 10.0, 10.0, 0.01, 0.01);
        assert!(matches!(geom.validate(), Err(Error::InvalidGeometry(_))));
        let geom = ModuleGeometry::new(1.0, -1.0, 10.0, 0.01, 0.01);
        assert!(geom.validate().is_err());
        assert!(ModuleGeometry::alice_ssd_layer5().validate().is_ok());
    }

    #[test]
    fn test_uniform_provider() {
        let geom = ModuleGeometry::new(1.0, 2.0, 2.0, 0.01, 0.01);
        assert_eq!(geom.geometry(1234), Some(geom));
    }

    #[test]
    fn test_layered_lookup() {
        let provider = LayeredGeometry::alice_ssd();
        assert_eq!(provider.layer_of(0).map(|l| l.number), Some(5));
        assert_eq!(provider.layer_of(747).map(|l| l.number), Some(5));
        assert_eq!(provider.layer_of(748).map(|l| l.number), Some(6));
        assert_eq!(provider.layer_of(1697).map(|l| l.number), Some(6));
        assert!(provider.geometry(1698).is_none());
        assert_eq!(provider.require(5000), Err(Error::UnknownModule(5000)));
    }

    #[test]
    fn test_layered_rejects_overlap() {
        let geom = ModuleGeometry::alice_ssd_layer5();
        let provider = LayeredGeometry::new().with_layer(1, 0, 10, geom).unwrap();
        assert!(provider.with_layer(2, 9, 5, geom).is_err());
    }
}
