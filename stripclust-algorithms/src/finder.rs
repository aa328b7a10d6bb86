//! Per-module cluster finding pipeline and the parallel event driver.
//!
//! Pipeline for one module:
//! 1. Index digits per side, dropping repeated strips
//! 2. Sort each side by strip number
//! 3. Build clusters from runs of adjacent strips
//! 4. Optionally split clusters at signal dips, then re-order them
//! 5. Cross every P cluster with every N cluster

use rayon::prelude::*;

use crate::assembler::RecPointAssembler;
use crate::builder::build_clusters;
use crate::index::DigitIndex;
use crate::sort::sort_by_strip;
use crate::splitter::{order_by_first_strip, split_clusters};
use stripclust_core::cluster::ModuleClusters;
use stripclust_core::clustering::{ClusterFinderConfig, ModuleStatistics};
use stripclust_core::digit::{Digit, ModuleDigits, Side};
use stripclust_core::error::Result;
use stripclust_core::geometry::{GeometryProvider, ModuleGeometry};
use stripclust_core::recpoint::{RawCluster, RawClusterSink, RecPoint, RecPointSink};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Scratch buffers reused from one module to the next.
#[derive(Debug, Default)]
pub struct ModuleScratch {
    index: DigitIndex,
    split_points: Vec<usize>,
}

impl ModuleScratch {
    /// Clears all buffers, keeping their allocations.
    pub fn reset(&mut self) {
        self.index.clear();
        self.split_points.clear();
    }
}

/// Everything produced for one module.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ModuleResult {
    /// Module id.
    pub module: u32,
    /// Clusters of both sides.
    pub clusters: ModuleClusters,
    /// Reconstructed points.
    pub rec_points: Vec<RecPoint>,
    /// Per-point pairing diagnostics.
    pub raw_clusters: Vec<RawCluster>,
    /// Counters.
    pub statistics: ModuleStatistics,
}

/// Silicon strip cluster finder.
#[derive(Debug, Clone, Default)]
pub struct ClusterFinder {
    config: ClusterFinderConfig,
}

impl ClusterFinder {
    /// Create with custom configuration.
    #[must_use]
    pub fn new(config: ClusterFinderConfig) -> Self {
        Self { config }
    }

    /// Create with a validated configuration.
    pub fn try_new(config: ClusterFinderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &ClusterFinderConfig {
        &self.config
    }

    /// Fresh scratch buffers for one worker.
    #[must_use]
    pub fn create_scratch(&self) -> ModuleScratch {
        ModuleScratch::default()
    }

    /// Finds the clusters of one module's digits on both sides.
    pub fn find_clusters(
        &self,
        digits: &[Digit],
        scratch: &mut ModuleScratch,
        stats: &mut ModuleStatistics,
    ) -> ModuleClusters {
        scratch.reset();
        stats.duplicates += scratch.index.fill(digits);

        let mut clusters = ModuleClusters::default();
        for side in Side::ALL {
            let indices = scratch.index.side_mut(side);
            sort_by_strip(indices, digits);

            let out = clusters.side_mut(side);
            build_clusters(side, indices, digits, out);

            if self.config.split_overlapped {
                stats.splits +=
                    split_clusters(out, self.config.split_factor, &mut scratch.split_points);
            }
            if self.config.order_clusters {
                order_by_first_strip(out);
            }
        }

        stats.digits_p += scratch.index.len(Side::P);
        stats.digits_n += scratch.index.len(Side::N);
        stats.clusters_p += clusters.p.len();
        stats.clusters_n += clusters.n.len();
        clusters
    }

    /// Crosses the clusters of one module and feeds the sinks.
    pub fn reconstruct<R, C>(
        &self,
        clusters: &ModuleClusters,
        geometry: &ModuleGeometry,
        rec_sink: &mut R,
        raw_sink: &mut C,
        stats: &mut ModuleStatistics,
    ) where
        R: RecPointSink + ?Sized,
        C: RawClusterSink + ?Sized,
    {
        let assembler = RecPointAssembler::new(&self.config, geometry);
        let counts = assembler.assemble(clusters, rec_sink, raw_sink);
        stats.pairs_tested += counts.pairs_tested;
        stats.rec_points += counts.rec_points;
    }

    /// Runs the whole pipeline for one module, streaming results into the sinks.
    pub fn process_module<G, R, C>(
        &self,
        module: &ModuleDigits,
        provider: &G,
        scratch: &mut ModuleScratch,
        rec_sink: &mut R,
        raw_sink: &mut C,
    ) -> Result<ModuleStatistics>
    where
        G: GeometryProvider + ?Sized,
        R: RecPointSink + ?Sized,
        C: RawClusterSink + ?Sized,
    {
        let (_, stats) = self.run_module(module, provider, scratch, rec_sink, raw_sink)?;
        Ok(stats)
    }

    /// Runs the whole pipeline for one module and keeps everything it produced.
    pub fn process_module_collect<G>(
        &self,
        module: &ModuleDigits,
        provider: &G,
        scratch: &mut ModuleScratch,
    ) -> Result<ModuleResult>
    where
        G: GeometryProvider + ?Sized,
    {
        let mut rec_points = Vec::new();
        let mut raw_clusters = Vec::new();
        let (clusters, statistics) =
            self.run_module(module, provider, scratch, &mut rec_points, &mut raw_clusters)?;
        Ok(ModuleResult {
            module: module.module,
            clusters,
            rec_points,
            raw_clusters,
            statistics,
        })
    }

    /// Processes all modules of an event, one module per rayon task.
    ///
    /// Results come back in input order.
    pub fn process_event<G>(
        &self,
        modules: &[ModuleDigits],
        provider: &G,
    ) -> Result<Vec<ModuleResult>>
    where
        G: GeometryProvider + ?Sized,
    {
        modules
            .par_iter()
            .map_init(
                || self.create_scratch(),
                |scratch, module| self.process_module_collect(module, provider, scratch),
            )
            .collect()
    }

    fn run_module<G, R, C>(
        &self,
        module: &ModuleDigits,
        provider: &G,
        scratch: &mut ModuleScratch,
        rec_sink: &mut R,
        raw_sink: &mut C,
    ) -> Result<(ModuleClusters, ModuleStatistics)>
    where
        G: GeometryProvider + ?Sized,
        R: RecPointSink + ?Sized,
        C: RawClusterSink + ?Sized,
    {
        let geometry = provider.require(module.module)?;
        geometry.validate()?;

        let mut stats = ModuleStatistics {
            modules: 1,
            ..Default::default()
        };
        let clusters = self.find_clusters(&module.digits, scratch, &mut stats);
        self.reconstruct(&clusters, &geometry, rec_sink, raw_sink, &mut stats);

        let steps = geometry.step_factors();
        log::debug!(
            "module {}: digits P={} N={}, clusters P={} N={}, {} rec points (step factors {}/{})",
            module.module,
            stats.digits_p,
            stats.digits_n,
            stats.clusters_p,
            stats.clusters_n,
            stats.rec_points,
            steps.forward,
            steps.backward
        );
        Ok((clusters, stats))
    }
}

/// Sums the counters of all modules.
#[must_use]
pub fn event_statistics(results: &[ModuleResult]) -> ModuleStatistics {
    results
        .iter()
        .fold(ModuleStatistics::default(), |mut total, result| {
            total.merge(&result.statistics);
            total
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use stripclust_core::error::Error;

    #[test]
    fn test_find_clusters_both_sides() {
        let digits = vec![
            Digit::p(12, 5.0),
            Digit::p(10, 5.0),
            Digit::p(11, 5.0),
            Digit::n(3, 5.0),
            Digit::n(7, 5.0),
        ];
        let finder = ClusterFinder::default();
        let mut scratch = finder.create_scratch();
        let mut stats = ModuleStatistics::default();
        let clusters = finder.find_clusters(&digits, &mut scratch, &mut stats);

        assert_eq!(clusters.p.len(), 1);
        assert_eq!(clusters.p[0].strips().collect::<Vec<_>>(), vec![10, 11, 12]);
        assert_eq!(clusters.n.len(), 2);
        assert_eq!(stats.digits_p, 3);
        assert_eq!(stats.clusters_n, 2);
    }

    #[test]
    fn test_split_enabled_orders_clusters() {
        let digits = vec![
            Digit::p(0, 10.0),
            Digit::p(1, 1.0),
            Digit::p(2, 10.0),
            Digit::p(5, 4.0),
        ];
        let finder = ClusterFinder::new(ClusterFinderConfig::new().with_split_overlapped(true));
        let mut scratch = finder.create_scratch();
        let mut stats = ModuleStatistics::default();
        let clusters = finder.find_clusters(&digits, &mut scratch, &mut stats);

        assert_eq!(stats.splits, 1);
        let firsts: Vec<_> = clusters.p.iter().filter_map(|c| c.first_strip()).collect();
        assert_eq!(firsts, vec![0, 1, 5]);
    }

    #[test]
    fn test_split_disabled_by_default() {
        let digits = vec![Digit::p(0, 10.0), Digit::p(1, 1.0), Digit::p(2, 10.0)];
        let finder = ClusterFinder::default();
        let mut scratch = finder.create_scratch();
        let mut stats = ModuleStatistics::default();
        let clusters = finder.find_clusters(&digits, &mut scratch, &mut stats);
        assert_eq!(clusters.p.len(), 1);
        assert_eq!(stats.splits, 0);
    }

    #[test]
    fn test_try_new_rejects_bad_config() {
        let config = ClusterFinderConfig::new().with_split_factor(2.0);
        assert!(matches!(
            ClusterFinder::try_new(config),
            Err(Error::ConfigError(_))
        ));
    }

    #[test]
    fn test_invalid_geometry_is_error() {
        let finder = ClusterFinder::default();
        let geometry = ModuleGeometry::new(0.0, 1.0, 1.0, 0.01, 0.01);
        let module = ModuleDigits::with_digits(0, vec![Digit::p(0, 1.0)]);
        let mut scratch = finder.create_scratch();
        let result = finder.process_module_collect(&module, &geometry, &mut scratch);
        assert!(matches!(result, Err(Error::InvalidGeometry(_))));
    }
}
