mod forces;
mod quadtree;

use eframe::egui::{Vec2, vec2};

use forces::{CollisionParams, accumulate_collision_pairs, apply_position_forces};
pub(in crate::app) use quadtree::QuadtreeCell;
use quadtree::{QuadNode, collect_quadtree_cells};

const ALPHA_MIN: f32 = 0.001;
const VELOCITY_DECAY: f32 = 0.4;
const INITIAL_RADIUS: f32 = 10.0;

#[derive(Clone, Copy, Debug)]
pub(in crate::app) struct ForceParams {
    pub position_strength: f32,
    pub collision_radius: f32,
    pub collision_strength: f32,
}

impl ForceParams {
    pub(in crate::app) const POSITION_STRENGTH: f32 = 0.1;

    pub(in crate::app) fn with_collision_radius(collision_radius: f32) -> Self {
        Self {
            position_strength: Self::POSITION_STRENGTH,
            collision_radius,
            collision_strength: 1.0,
        }
    }
}

/// Marker positions relaxing toward their projected targets while
/// avoiding overlap. Node `i` belongs to marker `i`.
pub(in crate::app) struct LayoutSimulation {
    positions: Vec<Vec2>,
    velocities: Vec<Vec2>,
    targets: Vec<Vec2>,
    alpha: f32,
    alpha_decay: f32,
    scratch: PhysicsScratch,
}

#[derive(Default)]
struct PhysicsScratch {
    predicted: Vec<Vec2>,
    radii: Vec<f32>,
    impulses: Vec<Vec2>,
}

/// Phyllotaxis start position, the same spiral d3 seeds nodes on.
fn initial_position(index: usize) -> Vec2 {
    let golden_angle = std::f32::consts::PI * (3.0 - 5.0_f32.sqrt());
    let radius = INITIAL_RADIUS * (0.5 + index as f32).sqrt();
    let angle = index as f32 * golden_angle;
    vec2(radius * angle.cos(), radius * angle.sin())
}

impl LayoutSimulation {
    pub(in crate::app) fn new(targets: Vec<Vec2>) -> Self {
        let positions = (0..targets.len()).map(initial_position).collect();
        Self {
            velocities: vec![Vec2::ZERO; targets.len()],
            positions,
            targets,
            alpha: 1.0,
            alpha_decay: 1.0 - ALPHA_MIN.powf(1.0 / 300.0),
            scratch: PhysicsScratch::default(),
        }
    }

    pub(in crate::app) fn restart(&mut self) {
        self.alpha = 1.0;
    }

    pub(in crate::app) fn alpha(&self) -> f32 {
        self.alpha
    }

    pub(in crate::app) fn is_awake(&self) -> bool {
        self.alpha >= ALPHA_MIN
    }

    pub(in crate::app) fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    pub(in crate::app) fn target(&self, node: usize) -> Option<Vec2> {
        self.targets.get(node).copied()
    }

    pub(in crate::app) fn quadtree_cells(&self, cells: &mut Vec<QuadtreeCell>) {
        cells.clear();
        if let Some(tree) = QuadNode::build(&self.positions, &[]) {
            collect_quadtree_cells(&tree, 0, cells);
        }
    }
}

/// Advances the simulation by one tick. Returns false once it has cooled
/// down and nothing moved.
pub(in crate::app) fn step_simulation(simulation: &mut LayoutSimulation, params: ForceParams) -> bool {
    if !simulation.is_awake() {
        return false;
    }

    simulation.alpha += (0.0 - simulation.alpha) * simulation.alpha_decay;
    let node_count = simulation.positions.len();
    if node_count == 0 {
        return true;
    }

    apply_position_forces(
        &simulation.positions,
        &simulation.targets,
        &mut simulation.velocities,
        params.position_strength,
        simulation.alpha,
    );

    let scratch = &mut simulation.scratch;
    scratch.predicted.clear();
    scratch.predicted.extend(
        simulation
            .positions
            .iter()
            .zip(&simulation.velocities)
            .map(|(position, velocity)| *position + *velocity),
    );
    scratch.radii.clear();
    scratch.radii.resize(node_count, params.collision_radius);
    scratch.impulses.clear();
    scratch.impulses.resize(node_count, Vec2::ZERO);

    if params.collision_radius > 0.0
        && let Some(tree) = QuadNode::build(&scratch.predicted, &scratch.radii)
    {
        accumulate_collision_pairs(
            &tree,
            &tree,
            true,
            &scratch.predicted,
            &scratch.radii,
            CollisionParams {
                strength: params.collision_strength,
            },
            &mut scratch.impulses,
        );
    }

    for ((position, velocity), impulse) in simulation
        .positions
        .iter_mut()
        .zip(simulation.velocities.iter_mut())
        .zip(&scratch.impulses)
    {
        *velocity = (*velocity + *impulse) * (1.0 - VELOCITY_DECAY);
        *position += *velocity;
    }

    true
}
