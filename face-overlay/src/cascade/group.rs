//! Merging raw window hits into detections.

use super::detect::round;
use crate::geometry::Rect;

fn similar(a: &Rect, b: &Rect, eps: f64) -> bool {
    let delta = eps * f64::from(a.width.min(b.width) + a.height.min(b.height)) * 0.5;
    f64::from((a.x - b.x).abs()) <= delta
        && f64::from((a.y - b.y).abs()) <= delta
        && f64::from((a.right() - b.right()).abs()) <= delta
        && f64::from((a.bottom() - b.bottom()).abs()) <= delta
}

fn find(parent: &mut [usize], mut i: usize) -> usize {
    while parent[i] != i {
        parent[i] = parent[parent[i]];
        i = parent[i];
    }
    i
}

/// Clusters similar rectangles, averages each cluster, and keeps clusters with more than
/// `min_neighbors` members. A kept cluster nested inside a stronger one is dropped as well.
///
/// Cluster order follows the first appearance of a member in `rects`.
pub fn group_rectangles(rects: &[Rect], min_neighbors: usize, eps: f64) -> Vec<Rect> {
    if rects.is_empty() {
        return Vec::new();
    }

    let mut parent: Vec<usize> = (0..rects.len()).collect();
    for i in 0..rects.len() {
        for j in 0..i {
            if similar(&rects[i], &rects[j], eps) {
                let (a, b) = (find(&mut parent, i), find(&mut parent, j));
                if a != b {
                    parent[a.max(b)] = a.min(b);
                }
            }
        }
    }

    let mut labels = vec![usize::MAX; rects.len()];
    let mut sums: Vec<(i64, i64, i64, i64, usize)> = Vec::new();
    for i in 0..rects.len() {
        let root = find(&mut parent, i);
        if labels[root] == usize::MAX {
            labels[root] = sums.len();
            sums.push((0, 0, 0, 0, 0));
        }
        let cluster = &mut sums[labels[root]];
        let r = &rects[i];
        cluster.0 += i64::from(r.x);
        cluster.1 += i64::from(r.y);
        cluster.2 += i64::from(r.width);
        cluster.3 += i64::from(r.height);
        cluster.4 += 1;
    }

    let clusters: Vec<(Rect, usize)> = sums
        .into_iter()
        .map(|(x, y, w, h, n)| {
            let s = 1.0 / n as f64;
            (
                Rect::new(
                    round(x as f64 * s),
                    round(y as f64 * s),
                    round(w as f64 * s),
                    round(h as f64 * s),
                ),
                n,
            )
        })
        .collect();

    clusters
        .iter()
        .enumerate()
        .filter(|(_, (_, n))| *n > min_neighbors)
        .filter(|(i, (r1, n1))| {
            !clusters.iter().enumerate().any(|(j, (r2, n2))| {
                if j == *i || *n2 <= min_neighbors {
                    return false;
                }
                let dx = round(f64::from(r2.width) * eps);
                let dy = round(f64::from(r2.height) * eps);
                r1.x >= r2.x - dx
                    && r1.y >= r2.y - dy
                    && r1.right() <= r2.right() + dx
                    && r1.bottom() <= r2.bottom() + dy
                    && (*n2 > (*n1).max(3) || *n1 < 3)
            })
        })
        .map(|(_, (r, _))| *r)
        .collect()
}
