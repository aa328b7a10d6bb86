#![allow(clippy::cast_possible_truncation, clippy::unreadable_literal)]
use stripclust_algorithms::{event_statistics, ClusterFinder, ClusterFinderConfig};
use stripclust_core::{
    Digit, Error, LayeredGeometry, ModuleDigits, ModuleGeometry, RawCluster, RecPoint, Side,
};

fn generate_event() -> Vec<ModuleDigits> {
    let mut rng_seed: u64 = 2024;
    let mut rand = || {
        rng_seed = (rng_seed.wrapping_mul(1103515245).wrapping_add(12345)) & 0x7fffffff;
        rng_seed as u32
    };

    // modules on both layers, in no particular order
    let ids = [900_u32, 3, 747, 748, 1200, 10, 1697, 0];
    ids.iter()
        .map(|&module| {
            let mut digits = Vec::new();
            for _ in 0..(rand() % 6) {
                let p = 100 + rand() % 500;
                let n = 100 + rand() % 500;
                for k in 0..(1 + rand() % 3) {
                    digits.push(Digit::new(p + k, Side::P, f64::from(10 + rand() % 40)));
                    digits.push(Digit::new(n + k, Side::N, f64::from(10 + rand() % 40)));
                }
            }
            ModuleDigits::with_digits(module, digits)
        })
        .collect()
}

#[test]
fn test_parallel_matches_sequential() {
    let provider = LayeredGeometry::alice_ssd();
    let modules = generate_event();
    let finder = ClusterFinder::new(ClusterFinderConfig::new().with_split_overlapped(true));

    let parallel = finder.process_event(&modules, &provider).unwrap();
    assert_eq!(parallel.len(), modules.len());

    let mut scratch = finder.create_scratch();
    for (module, result) in modules.iter().zip(&parallel) {
        assert_eq!(result.module, module.module);

        let mut points: Vec<RecPoint> = Vec::new();
        let mut raw: Vec<RawCluster> = Vec::new();
        let stats = finder
            .process_module(module, &provider, &mut scratch, &mut points, &mut raw)
            .unwrap();
        assert_eq!(stats, result.statistics);
        assert_eq!(points, result.rec_points);
        assert_eq!(raw, result.raw_clusters);
    }

    let total = event_statistics(&parallel);
    assert_eq!(total.modules, modules.len());
    assert_eq!(
        total.rec_points,
        parallel.iter().map(|r| r.rec_points.len()).sum::<usize>()
    );
}

#[test]
fn test_layers_use_their_own_geometry() {
    let provider = LayeredGeometry::alice_ssd();
    let digits = vec![
        Digit::p(380, 30.0),
        Digit::p(381, 20.0),
        Digit::n(383, 25.0),
    ];
    let modules = vec![
        ModuleDigits::with_digits(10, digits.clone()),
        ModuleDigits::with_digits(1000, digits),
    ];

    let finder = ClusterFinder::default();
    let results = finder.process_event(&modules, &provider).unwrap();
    let a = &results[0].rec_points;
    let b = &results[1].rec_points;
    assert_eq!(a.len(), 1);
    assert_eq!(b.len(), 1);
    // swapped stereo angles move the crossing
    assert!((a[0].z - b[0].z).abs() > 1e-3);
}

#[test]
fn test_event_propagates_unknown_module() {
    let provider = LayeredGeometry::new()
        .with_layer(5, 0, 10, ModuleGeometry::alice_ssd_layer5())
        .unwrap();
    let modules = vec![
        ModuleDigits::with_digits(1, vec![Digit::p(1, 1.0)]),
        ModuleDigits::with_digits(50, vec![Digit::p(1, 1.0)]),
    ];
    let finder = ClusterFinder::default();
    assert_eq!(
        finder.process_event(&modules, &provider),
        Err(Error::UnknownModule(50))
    );
}

#[test]
fn test_empty_event() {
    let finder = ClusterFinder::default();
    let geometry = ModuleGeometry::alice_ssd_layer5();
    let results = finder.process_event(&[], &geometry).unwrap();
    assert!(results.is_empty());
    assert_eq!(event_statistics(&results).modules, 0);
}
