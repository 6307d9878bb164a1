//! One-dimensional value clustering shared by word grouping and edge snapping.

/// Group values that lie within `tolerance` of their sorted predecessor.
///
/// Returns index groups into `values`, ordered by ascending value. Clusters
/// chain: each value is compared with the previous value in sorted order,
/// not with the first member of its cluster. Equal values keep their input
/// order inside a group.
pub fn cluster_indices(values: &[f64], tolerance: f64) -> Vec<Vec<usize>> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut last: Option<f64> = None;
    for idx in order {
        let v = values[idx];
        match (last, groups.last_mut()) {
            (Some(prev), Some(group)) if v <= prev + tolerance => group.push(idx),
            _ => groups.push(vec![idx]),
        }
        last = Some(v);
    }
    groups
}
