//! Rec point assembly from P/N cluster pairs.

use crate::crossing::CrossingSolver;
use stripclust_core::cluster::{Cluster, ModuleClusters};
use stripclust_core::clustering::{ClusterFinderConfig, ErrorModel};
use stripclust_core::geometry::ModuleGeometry;
use stripclust_core::recpoint::{RawCluster, RawClusterSink, RecPoint, RecPointSink};

/// Counters of one assembly pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssemblyCounts {
    /// Pairs handed to the crossing solver.
    pub pairs_tested: usize,
    /// Rec points emitted.
    pub rec_points: usize,
}

/// Turns every geometrically valid P/N cluster pair into a rec point.
///
/// No charge matching is applied, so several pairings of the same hits may
/// all produce points when both sides carry more than one cluster.
#[derive(Debug, Clone)]
pub struct RecPointAssembler<'a> {
    config: &'a ClusterFinderConfig,
    solver: CrossingSolver,
    sigma_x2: f64,
    sigma_z2: f64,
}

impl<'a> RecPointAssembler<'a> {
    /// Prepares an assembler for one module.
    #[must_use]
    pub fn new(config: &'a ClusterFinderConfig, geometry: &ModuleGeometry) -> Self {
        let solver = CrossingSolver::new(geometry);
        let scale = config.length_scale;
        let (rms_x, rms_z) = match config.error_model {
            ErrorModel::Fixed => (config.rms_x, config.rms_z),
            ErrorModel::Propagated => solver
                .error(1.0, 1.0)
                .map_or((config.rms_x, config.rms_z), |err| (err.dx, err.dz)),
        };
        Self {
            config,
            solver,
            sigma_x2: (rms_x * scale).powi(2),
            sigma_z2: (rms_z * scale).powi(2),
        }
    }

    /// Tries one P/N pair; on success returns the point and its diagnostics.
    #[must_use]
    pub fn pair(&self, p: &Cluster, n: &Cluster) -> Option<(RecPoint, RawCluster)> {
        let local = self.solver.solve(p.position()?, n.position()?)?;

        let signal_p = p.total_signal();
        let signal_n = n.total_signal();
        let q = signal_p.max(signal_n);
        let tracks = p.tracks();
        let scale = self.config.length_scale;

        let point = RecPoint {
            x: local.x * scale,
            z: local.z * scale,
            q,
            dedx: q * self.config.adc_to_kev,
            sigma_x2: self.sigma_x2,
            sigma_z2: self.sigma_z2,
            tracks,
        };
        let raw = RawCluster {
            signal_p,
            signal_n,
            multiplicity_p: p.len(),
            multiplicity_n: n.len(),
            q_err: (signal_p - signal_n).abs(),
            n_tracks: tracks.count(),
        };
        Some((point, raw))
    }

    /// Runs the full P x N cross product, delivering each point as it is found.
    pub fn assemble<R, C>(
        &self,
        clusters: &ModuleClusters,
        rec_sink: &mut R,
        raw_sink: &mut C,
    ) -> AssemblyCounts
    where
        R: RecPointSink + ?Sized,
        C: RawClusterSink + ?Sized,
    {
        let mut counts = AssemblyCounts::default();
        for p in &clusters.p {
            for n in &clusters.n {
                counts.pairs_tested += 1;
                if let Some((point, raw)) = self.pair(p, n) {
                    raw_sink.add_raw_cluster(raw);
                    rec_sink.add_rec_point(point);
                    counts.rec_points += 1;
                }
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use stripclust_core::digit::{Digit, Side, TrackIds};

    fn single(side: Side, strip: u32, signal: f64) -> Cluster {
        let mut cluster = Cluster::new(side);
        cluster.push(Digit::new(strip, side, signal).with_tracks(TrackIds::single(11)));
        cluster
    }

    fn unit_geometry() -> ModuleGeometry {
        ModuleGeometry::new(1.0, 2.0, 2.0, 0.01, 0.01)
    }

    #[test]
    fn test_pair_values() {
        let config = ClusterFinderConfig::default().with_length_scale(1.0);
        let geometry = unit_geometry();
        let assembler = RecPointAssembler::new(&config, &geometry);

        let (point, raw) = assembler
            .pair(&single(Side::P, 0, 30.0), &single(Side::N, 0, 40.0))
            .unwrap();
        assert_abs_diff_eq!(point.q, 40.0);
        assert_abs_diff_eq!(point.dedx, 40.0 * 2.16, epsilon = 1e-9);
        assert_abs_diff_eq!(point.sigma_x2, 400.0, epsilon = 1e-9);
        assert_abs_diff_eq!(point.sigma_z2, 640_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(point.z, 0.0, epsilon = 1e-12);
        assert_eq!(point.tracks, TrackIds::single(11));
        assert_abs_diff_eq!(raw.q_err, 10.0);
        assert_eq!(raw.multiplicity_p, 1);
        assert_eq!(raw.n_tracks, 1);
    }

    #[test]
    fn test_default_scale_converts_microns() {
        let config = ClusterFinderConfig::default();
        let geometry = unit_geometry();
        let assembler = RecPointAssembler::new(&config, &geometry);
        let (point, _) = assembler
            .pair(&single(Side::P, 0, 1.0), &single(Side::N, 0, 1.0))
            .unwrap();
        assert_abs_diff_eq!(point.sigma_x2, 4.0e-6, epsilon = 1e-15);
        assert_abs_diff_eq!(point.sigma_z2, 6.4e-3, epsilon = 1e-12);
    }

    #[test]
    fn test_cross_product_counts() {
        let config = ClusterFinderConfig::default();
        let geometry = unit_geometry();
        let assembler = RecPointAssembler::new(&config, &geometry);
        let clusters = ModuleClusters {
            p: vec![single(Side::P, 0, 5.0), single(Side::P, 1, 5.0)],
            n: vec![single(Side::N, 0, 5.0), single(Side::N, 1, 5.0)],
        };

        let mut points: Vec<RecPoint> = Vec::new();
        let mut raw: Vec<RawCluster> = Vec::new();
        let counts = assembler.assemble(&clusters, &mut points, &mut raw);
        assert_eq!(counts.pairs_tested, 4);
        // off-diagonal pairs cross far outside the 2x2 module
        assert_eq!(points.len(), 2);
        assert_eq!(counts.rec_points, points.len());
        assert_eq!(raw.len(), points.len());
    }

    #[test]
    fn test_empty_side_yields_nothing() {
        let config = ClusterFinderConfig::default();
        let geometry = unit_geometry();
        let assembler = RecPointAssembler::new(&config, &geometry);
        let clusters = ModuleClusters {
            p: Vec::new(),
            n: vec![single(Side::N, 0, 5.0)],
        };
        let mut points: Vec<RecPoint> = Vec::new();
        let counts = assembler.assemble(&clusters, &mut points, &mut ());
        assert_eq!(counts, AssemblyCounts::default());
        assert!(points.is_empty());
    }

    #[test]
    fn test_propagated_errors() {
        let config = ClusterFinderConfig::default()
            .with_length_scale(1.0)
            .with_error_model(ErrorModel::Propagated);
        let geometry = ModuleGeometry::alice_ssd_layer5();
        let assembler = RecPointAssembler::new(&config, &geometry);
        let expected = CrossingSolver::new(&geometry).error(1.0, 1.0).unwrap();
        assert_abs_diff_eq!(assembler.sigma_x2, expected.dx * expected.dx, epsilon = 1e-9);
        assert_abs_diff_eq!(assembler.sigma_z2, expected.dz * expected.dz, epsilon = 1e-6);
    }
}
