//! k-d tree resolver over palette colors.
//!
//! A drop-in replacement for the linear scan when palettes grow to dozens
//! of entries. The search explores a far subtree whenever the splitting
//! plane is *not farther* than the current best, so equidistant candidates
//! on both sides are always compared and the lower device code wins exactly
//! as in [`Palette::find_nearest()`].

use super::palette::{Palette, PaletteEntry};
use super::resolver::Resolver;

#[derive(Debug, Clone)]
struct Node {
    entry: PaletteEntry,
    axis: usize,
    left: Option<usize>,
    right: Option<usize>,
}

/// Nearest-color resolver backed by a 3-d tree in RGB space.
///
/// # Example
///
/// ```
/// use epd_dither::{KdTreeResolver, Palette, Resolver};
///
/// let palette = Palette::spectra6();
/// let tree = KdTreeResolver::new(&palette);
/// assert_eq!(tree.resolve([250, 20, 10]).code, 3); // red
/// ```
#[derive(Debug, Clone)]
pub struct KdTreeResolver {
    nodes: Vec<Node>,
    root: Option<usize>,
}

impl KdTreeResolver {
    /// Build a tree over all entries of `palette`.
    pub fn new(palette: &Palette) -> Self {
        let mut entries = palette.entries().to_vec();
        let mut nodes = Vec::with_capacity(entries.len());
        let root = build(&mut entries, 0, &mut nodes);
        Self { nodes, root }
    }

    fn search(
        &self,
        node: Option<usize>,
        pixel: [i16; 3],
        best: &mut Option<(PaletteEntry, u64)>,
    ) {
        let Some(i) = node else {
            return;
        };
        let node = &self.nodes[i];

        let dist = node.entry.color.squared_distance(pixel);
        let better = match best {
            None => true,
            Some((b, b_dist)) => (dist, node.entry.code) < (*b_dist, b.code),
        };
        if better {
            *best = Some((node.entry, dist));
        }

        let split = i64::from(node.entry.color.to_bytes()[node.axis]);
        let diff = i64::from(pixel[node.axis]) - split;
        let (near, far) = if diff < 0 {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };

        self.search(near, pixel, best);

        let plane = diff.unsigned_abs().pow(2);
        if best.map_or(true, |(_, d)| plane <= d) {
            self.search(far, pixel, best);
        }
    }
}

fn build(entries: &mut [PaletteEntry], depth: usize, nodes: &mut Vec<Node>) -> Option<usize> {
    if entries.is_empty() {
        return None;
    }
    let axis = depth % 3;
    entries.sort_by_key(|e| (e.color.to_bytes()[axis], e.code));
    let mid = entries.len() / 2;
    let entry = entries[mid];

    let (lower, rest) = entries.split_at_mut(mid);
    let upper = &mut rest[1..];
    let left = build(lower, depth + 1, nodes);
    let right = build(upper, depth + 1, nodes);

    nodes.push(Node {
        entry,
        axis,
        left,
        right,
    });
    Some(nodes.len() - 1)
}

impl Resolver for KdTreeResolver {
    fn resolve(&self, pixel: [i16; 3]) -> PaletteEntry {
        let mut best = None;
        self.search(self.root, pixel, &mut best);
        // The tree holds every entry of a non-empty palette
        best.map_or(self.nodes[0].entry, |(entry, _)| entry)
    }
}
