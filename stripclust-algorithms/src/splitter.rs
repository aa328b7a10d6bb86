//! Splitting of clusters that merge two nearby hits.
//!
//! A cluster is cut in front of every interior digit whose signal drops
//! below `factor` times both of its neighbours.

use stripclust_core::cluster::Cluster;

/// Collects the split positions of `cluster` into `points`, ascending.
///
/// Clusters with fewer than three digits have no interior and yield nothing.
pub fn find_split_points(cluster: &Cluster, factor: f64, points: &mut Vec<usize>) {
    points.clear();
    let digits = cluster.digits();
    if digits.len() < 3 {
        return;
    }
    for (j, w) in digits.windows(3).enumerate() {
        let (before, middle, after) = (w[0].signal, w[1].signal, w[2].signal);
        if middle < factor * before && middle < factor * after {
            points.push(j + 1);
        }
    }
}

/// Cuts `cluster` at `points` (ascending member positions).
///
/// Cuts are applied from the highest position down so the lower positions
/// stay valid; each cut appends one new cluster to `out`, so the pieces land
/// in `out` right to left. Returns the number of cuts applied.
pub fn split_cluster(cluster: &mut Cluster, points: &[usize], out: &mut Vec<Cluster>) -> usize {
    let mut applied = 0;
    for &j in points.iter().rev() {
        let Some(mut tail) = cluster.split_off(j) else {
            continue;
        };
        tail.left_neighbour = true;
        if cluster.right_neighbour {
            tail.right_neighbour = true;
        } else {
            cluster.right_neighbour = true;
        }
        out.push(tail);
        applied += 1;
    }
    applied
}

/// Splits every cluster present on entry; new pieces are appended.
///
/// `points` is scratch space reused across clusters. Returns the total
/// number of cuts.
pub fn split_clusters(clusters: &mut Vec<Cluster>, factor: f64, points: &mut Vec<usize>) -> usize {
    let mut pieces = Vec::new();
    let mut applied = 0;
    for cluster in clusters.iter_mut() {
        find_split_points(cluster, factor, points);
        if !points.is_empty() {
            applied += split_cluster(cluster, points, &mut pieces);
        }
    }
    clusters.append(&mut pieces);
    applied
}

/// Stably orders clusters by their first strip.
pub fn order_by_first_strip(clusters: &mut [Cluster]) {
    clusters.sort_by_key(|c| c.first_strip().unwrap_or(u32::MAX));
}
