use eframe::egui::{Vec2, vec2};

use super::quadtree::QuadNode;

#[derive(Clone, Copy)]
pub(super) struct CollisionParams {
    pub(super) strength: f32,
}

pub(super) fn apply_position_forces(
    positions: &[Vec2],
    targets: &[Vec2],
    velocities: &mut [Vec2],
    strength: f32,
    alpha: f32,
) {
    for ((position, target), velocity) in positions.iter().zip(targets).zip(velocities.iter_mut()) {
        *velocity += (*target - *position) * (strength * alpha);
    }
}

fn resolve_pair(
    from: usize,
    to: usize,
    predicted: &[Vec2],
    radii: &[f32],
    params: CollisionParams,
    impulses: &mut [Vec2],
) {
    let reach = radii[from] + radii[to];
    let delta = predicted[from] - predicted[to];
    let distance_sq = delta.length_sq();
    if distance_sq >= reach * reach {
        return;
    }

    let distance = distance_sq.sqrt();
    let direction = if distance > 1e-6 {
        delta / distance
    } else {
        let angle =
            ((from as f32) * 0.618_034 + (to as f32) * 0.414_214) * std::f32::consts::TAU;
        vec2(angle.cos(), angle.sin())
    };

    // Larger markers move less.
    let from_sq = radii[from] * radii[from];
    let to_sq = radii[to] * radii[to];
    let share = if from_sq + to_sq > 0.0 {
        to_sq / (from_sq + to_sq)
    } else {
        0.5
    };

    let push = direction * ((reach - distance) * params.strength);
    impulses[from] += push * share;
    impulses[to] -= push * (1.0 - share);
}

/// Visits every pair of overlapping circles once, skipping subtree pairs
/// whose radii cannot bridge the gap between them.
pub(super) fn accumulate_collision_pairs(
    node_a: &QuadNode,
    node_b: &QuadNode,
    same_node: bool,
    predicted: &[Vec2],
    radii: &[f32],
    params: CollisionParams,
    impulses: &mut [Vec2],
) {
    if !node_a.may_touch(node_b) {
        return;
    }

    if node_a.is_leaf() && node_b.is_leaf() {
        if same_node {
            for (offset, &from) in node_a.indices.iter().enumerate() {
                for &to in &node_a.indices[offset + 1..] {
                    resolve_pair(from, to, predicted, radii, params, impulses);
                }
            }
        } else {
            for &from in &node_a.indices {
                for &to in &node_b.indices {
                    resolve_pair(from, to, predicted, radii, params, impulses);
                }
            }
        }
        return;
    }

    if same_node {
        for first in 0..4 {
            let Some(child_a) = node_a.children[first].as_ref() else {
                continue;
            };

            accumulate_collision_pairs(child_a, child_a, true, predicted, radii, params, impulses);

            for second in (first + 1)..4 {
                let Some(child_b) = node_a.children[second].as_ref() else {
                    continue;
                };
                accumulate_collision_pairs(
                    child_a, child_b, false, predicted, radii, params, impulses,
                );
            }
        }
        return;
    }

    let split_a = if node_a.is_leaf() {
        false
    } else if node_b.is_leaf() {
        true
    } else {
        node_a.cell.half_extent >= node_b.cell.half_extent
    };

    if split_a {
        for child in node_a.children.iter().flatten() {
            accumulate_collision_pairs(child, node_b, false, predicted, radii, params, impulses);
        }
    } else {
        for child in node_b.children.iter().flatten() {
            accumulate_collision_pairs(node_a, child, false, predicted, radii, params, impulses);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brute_force(predicted: &[Vec2], radii: &[f32], params: CollisionParams) -> Vec<Vec2> {
        let mut impulses = vec![Vec2::ZERO; predicted.len()];
        for from in 0..predicted.len() {
            for to in (from + 1)..predicted.len() {
                resolve_pair(from, to, predicted, radii, params, &mut impulses);
            }
        }
        impulses
    }

    #[test]
    fn tree_traversal_matches_brute_force() {
        let predicted = (0..60)
            .map(|index| {
                let index = index as f32;
                vec2((index * 3.7) % 25.0, (index * 1.3) % 17.0)
            })
            .collect::<Vec<_>>();
        let radii = vec![2.5; predicted.len()];
        let params = CollisionParams { strength: 1.0 };

        let tree = QuadNode::build(&predicted, &radii).expect("finite points");
        let mut impulses = vec![Vec2::ZERO; predicted.len()];
        accumulate_collision_pairs(&tree, &tree, true, &predicted, &radii, params, &mut impulses);

        for (tree_impulse, brute) in impulses.iter().zip(brute_force(&predicted, &radii, params)) {
            assert!((*tree_impulse - brute).length() < 1e-3);
        }
    }

    #[test]
    fn mixed_radii_traversal_matches_brute_force() {
        let predicted = (0..80)
            .map(|index| {
                let index = index as f32;
                vec2((index * 7.3) % 60.0, (index * 2.9) % 45.0)
            })
            .collect::<Vec<_>>();
        let radii = (0..predicted.len())
            .map(|index| if index % 9 == 0 { 8.0 } else { 1.5 })
            .collect::<Vec<_>>();
        let params = CollisionParams { strength: 0.7 };

        let tree = QuadNode::build(&predicted, &radii).expect("finite points");
        let mut impulses = vec![Vec2::ZERO; predicted.len()];
        accumulate_collision_pairs(&tree, &tree, true, &predicted, &radii, params, &mut impulses);

        for (tree_impulse, brute) in impulses.iter().zip(brute_force(&predicted, &radii, params)) {
            assert!((*tree_impulse - brute).length() < 1e-3);
        }
    }

    #[test]
    fn equal_radii_split_overlap_evenly() {
        let predicted = vec![vec2(0.0, 0.0), vec2(4.0, 0.0)];
        let radii = vec![3.0, 3.0];
        let params = CollisionParams { strength: 1.0 };
        let impulses = brute_force(&predicted, &radii, params);
        assert!((impulses[0].x + 1.0).abs() < 1e-6);
        assert!((impulses[1].x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn coincident_markers_get_pushed_apart() {
        let predicted = vec![vec2(5.0, 5.0), vec2(5.0, 5.0)];
        let radii = vec![1.0, 1.0];
        let params = CollisionParams { strength: 1.0 };
        let impulses = brute_force(&predicted, &radii, params);
        assert!(impulses[0].length() > 0.9);
        assert!((impulses[0] + impulses[1]).length() < 1e-6);
    }

    #[test]
    fn position_force_scales_with_alpha() {
        let positions = [vec2(0.0, 0.0)];
        let targets = [vec2(10.0, -20.0)];
        let mut velocities = [Vec2::ZERO];
        apply_position_forces(&positions, &targets, &mut velocities, 0.1, 0.5);
        assert!((velocities[0] - vec2(0.5, -1.0)).length() < 1e-6);
    }
}
