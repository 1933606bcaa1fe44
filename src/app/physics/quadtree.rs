use eframe::egui::{Vec2, vec2};

const LEAF_CAPACITY: usize = 4;
const MAX_DEPTH: usize = 16;

/// Square subdivision cell; children split it into quadrants.
#[derive(Clone, Copy)]
pub(super) struct Cell {
    pub(super) center: Vec2,
    pub(super) half_extent: f32,
}

impl Cell {
    fn enclosing(points: &[Vec2]) -> Option<Self> {
        let (min, max) = tight_extent(points.iter().copied())?;
        let span = (max.x - min.x).max(max.y - min.y).max(1.0);
        Some(Self {
            center: (min + max) * 0.5,
            half_extent: span * 0.5,
        })
    }

    fn quadrant(self, index: usize) -> Self {
        let half_extent = self.half_extent * 0.5;
        let sign = vec2(
            if index & 1 == 0 { -1.0 } else { 1.0 },
            if index & 2 == 0 { -1.0 } else { 1.0 },
        );
        Self {
            center: self.center + sign * half_extent,
            half_extent,
        }
    }

    fn quadrant_of(self, point: Vec2) -> usize {
        usize::from(point.x >= self.center.x) | (usize::from(point.y >= self.center.y) << 1)
    }
}

fn tight_extent(points: impl Iterator<Item = Vec2>) -> Option<(Vec2, Vec2)> {
    let mut min = Vec2::splat(f32::INFINITY);
    let mut max = Vec2::splat(f32::NEG_INFINITY);
    for point in points {
        min = min.min(point);
        max = max.max(point);
    }
    (min.is_finite() && max.is_finite()).then_some((min, max))
}

/// Point quadtree over circle centres. Every node knows the tight box of
/// its centres and the largest radius below it, so two subtrees can be
/// skipped once their boxes are farther apart than those radii allow.
pub(super) struct QuadNode {
    pub(super) cell: Cell,
    pub(super) min: Vec2,
    pub(super) max: Vec2,
    pub(super) max_radius: f32,
    pub(super) indices: Vec<usize>,
    pub(super) children: [Option<Box<QuadNode>>; 4],
}

pub(in crate::app) struct QuadtreeCell {
    pub center: Vec2,
    pub half_extent: f32,
    pub depth: usize,
    pub is_leaf: bool,
}

impl QuadNode {
    /// `radii[i]` belongs to `positions[i]`; missing radii count as zero.
    pub(super) fn build(positions: &[Vec2], radii: &[f32]) -> Option<Self> {
        let cell = Cell::enclosing(positions)?;
        let indices = (0..positions.len()).collect::<Vec<_>>();
        Some(Self::build_node(cell, indices, positions, radii, 0))
    }

    fn build_node(
        cell: Cell,
        indices: Vec<usize>,
        positions: &[Vec2],
        radii: &[f32],
        depth: usize,
    ) -> Self {
        let (min, max) = tight_extent(indices.iter().map(|&index| positions[index]))
            .unwrap_or((cell.center, cell.center));
        let max_radius = indices
            .iter()
            .map(|&index| radii.get(index).copied().unwrap_or(0.0))
            .fold(0.0_f32, f32::max);

        let mut node = Self {
            cell,
            min,
            max,
            max_radius,
            indices,
            children: std::array::from_fn(|_| None),
        };

        if depth >= MAX_DEPTH || node.indices.len() <= LEAF_CAPACITY || min == max {
            return node;
        }

        let mut buckets: [Vec<usize>; 4] = std::array::from_fn(|_| Vec::new());
        for index in node.indices.drain(..) {
            buckets[cell.quadrant_of(positions[index])].push(index);
        }
        for (quadrant, bucket) in buckets.into_iter().enumerate() {
            if !bucket.is_empty() {
                node.children[quadrant] = Some(Box::new(Self::build_node(
                    cell.quadrant(quadrant),
                    bucket,
                    positions,
                    radii,
                    depth + 1,
                )));
            }
        }
        node
    }

    pub(super) fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }

    /// Whether any circle below `self` can overlap any circle below `other`.
    pub(super) fn may_touch(&self, other: &Self) -> bool {
        let gap_x = (self.min.x - other.max.x).max(other.min.x - self.max.x).max(0.0);
        let gap_y = (self.min.y - other.max.y).max(other.min.y - self.max.y).max(0.0);
        let reach = self.max_radius + other.max_radius;
        gap_x * gap_x + gap_y * gap_y < reach * reach
    }
}

pub(super) fn collect_quadtree_cells(node: &QuadNode, depth: usize, cells: &mut Vec<QuadtreeCell>) {
    cells.push(QuadtreeCell {
        center: node.cell.center,
        half_extent: node.cell.half_extent,
        depth,
        is_leaf: node.is_leaf(),
    });

    for child in node.children.iter().flatten() {
        collect_quadtree_cells(child, depth + 1, cells);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf_indices(node: &QuadNode, out: &mut Vec<usize>) {
        out.extend_from_slice(&node.indices);
        for child in node.children.iter().flatten() {
            leaf_indices(child, out);
        }
    }

    #[test]
    fn every_point_lands_in_exactly_one_leaf() {
        let positions = (0..100)
            .map(|index| vec2((index % 10) as f32 * 7.0, (index / 10) as f32 * 3.0))
            .collect::<Vec<_>>();
        let tree = QuadNode::build(&positions, &[]).expect("finite points");
        assert!(!tree.is_leaf());

        let mut indices = Vec::new();
        leaf_indices(&tree, &mut indices);
        indices.sort_unstable();
        assert_eq!(indices, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn nodes_track_tight_extent_and_largest_radius() {
        let positions = (0..12)
            .map(|index| vec2(index as f32 * 10.0, 5.0))
            .collect::<Vec<_>>();
        let mut radii = vec![1.0; positions.len()];
        radii[7] = 6.0;

        let tree = QuadNode::build(&positions, &radii).expect("finite points");
        assert_eq!(tree.min, vec2(0.0, 5.0));
        assert_eq!(tree.max, vec2(110.0, 5.0));
        assert_eq!(tree.max_radius, 6.0);

        let holder = tree
            .children
            .iter()
            .flatten()
            .find(|child| child.max_radius == 6.0)
            .expect("child holding the big circle");
        assert!(holder.min.x <= 70.0 && holder.max.x >= 70.0);
    }

    #[test]
    fn distant_subtrees_cannot_touch() {
        let near = QuadNode::build(&[vec2(0.0, 0.0), vec2(2.0, 0.0)], &[1.0, 1.0])
            .expect("finite points");
        let far = QuadNode::build(&[vec2(10.0, 0.0)], &[3.0]).expect("finite points");
        let reachable = QuadNode::build(&[vec2(5.5, 0.0)], &[3.0]).expect("finite points");

        assert!(!near.may_touch(&far));
        assert!(near.may_touch(&reachable));
    }

    #[test]
    fn coincident_points_stay_in_one_leaf() {
        let positions = vec![vec2(4.0, 4.0); 40];
        let tree = QuadNode::build(&positions, &[]).expect("finite points");
        assert!(tree.is_leaf());
        assert_eq!(tree.indices.len(), 40);
    }

    #[test]
    fn empty_or_non_finite_input_has_no_tree() {
        assert!(QuadNode::build(&[], &[]).is_none());
        assert!(QuadNode::build(&[vec2(f32::NAN, 1.0)], &[]).is_none());
    }

    #[test]
    fn cells_cover_every_node() {
        let positions = (0..30)
            .map(|index| vec2(index as f32 * 11.0, (index * index) as f32))
            .collect::<Vec<_>>();
        let tree = QuadNode::build(&positions, &[]).expect("finite points");
        let mut cells = Vec::new();
        collect_quadtree_cells(&tree, 0, &mut cells);
        assert_eq!(cells[0].depth, 0);
        assert!(cells.iter().any(|cell| cell.is_leaf));
    }
}
