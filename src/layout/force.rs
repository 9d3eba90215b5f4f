//! 力导向布局（弹簧-电荷模型）。
//!
//! 每轮迭代中，每个节点受到其余全部节点的库仑斥力与相邻节点的胡克引力，
//! 所有节点基于本轮开始时的位置同时移动到钳制在画布内的新位置。总位移足够小
//! 或每个连通分量内的合力都不超过阈值时计数一次，连续计数达到上限即收敛。
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use indexmap::IndexMap;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::components::component_labels;
use crate::analysis::graph::AdjacencyGraph;
use crate::layout::vector::{Point, Rect, Vector};
use crate::net::core::Net;
use crate::net::ids::NodeId;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("canvas {width}x{height} cannot hold a node of size {node_size}")]
    InvalidCanvas {
        width: f64,
        height: f64,
        node_size: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// 节点外接正方形的边长，同时是吸附网格的步长。
    pub node_size: f64,
    pub attraction: f64,
    pub repulsion: f64,
    /// 不同连通分量之间斥力的衰减系数。
    pub inter_component_damping: f64,
    pub repulsion_degree_scale: f64,
    pub isolated_repulsion_scale: f64,
    pub displacement_per_node: f64,
    pub component_force_threshold: f64,
    pub stop_count: usize,
    pub max_iterations: usize,
    pub spring_length: Option<f64>,
    pub seed: Option<u64>,
    /// 动画模式下每轮迭代后的停顿（毫秒）。
    pub frame_delay_ms: Option<u64>,
    pub snap_to_grid: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_size: 40.0,
            attraction: 0.1,
            repulsion: 50000.0,
            inter_component_damping: 0.7,
            repulsion_degree_scale: 5.0,
            isolated_repulsion_scale: 1.0 / 3.0,
            displacement_per_node: 4.0,
            component_force_threshold: 10.0,
            stop_count: 15,
            max_iterations: 1000,
            spring_length: None,
            seed: None,
            frame_delay_ms: None,
            snap_to_grid: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    fn validate(&self, node_size: f64) -> Result<(), LayoutError> {
        let fits = |extent: f64| extent.is_finite() && extent >= node_size;
        if node_size.is_finite() && node_size >= 0.0 && fits(self.width) && fits(self.height) {
            Ok(())
        } else {
            Err(LayoutError::InvalidCanvas {
                width: self.width,
                height: self.height,
                node_size,
            })
        }
    }

    /// Keeps a node of `size` entirely inside the canvas.
    fn clamp(&self, point: Point, size: f64) -> Point {
        let half = size / 2.0;
        Point::new(
            point.x.clamp(half, self.width - half),
            point.y.clamp(half, self.height - half),
        )
    }
}

/// 协作式取消信号，在每轮迭代开始时检查。
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    Converged,
    IterationCap,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub positions: IndexMap<NodeId, Point>,
    /// Extent of the arranged diagram, node sizes included.
    pub bounds: Rect,
    pub iterations: usize,
    pub termination: Termination,
    pub spring_length: f64,
}

impl Layout {
    pub fn position(&self, id: &str) -> Option<Point> {
        self.positions.get(id).copied()
    }
}

/// 一轮迭代完成后的快照，交给观察者用于动画显示。
pub struct Frame<'a> {
    pub iteration: usize,
    pub total_displacement: f64,
    ids: &'a [&'a NodeId],
    positions: &'a [Point],
}

impl<'a> Frame<'a> {
    pub fn iter(&self) -> impl Iterator<Item = (&'a NodeId, Point)> + '_ {
        self.ids.iter().copied().zip(self.positions.iter().copied())
    }

    pub fn position(&self, id: &str) -> Option<Point> {
        self.ids
            .iter()
            .position(|node| node.as_str() == id)
            .map(|index| self.positions[index])
    }
}

#[derive(Debug, Clone, Default)]
pub struct ForceLayout {
    config: LayoutConfig,
}

/// 每次布局调用独占的工作数据。
struct Simulation<'c> {
    config: &'c LayoutConfig,
    canvas: Canvas,
    spring_length: f64,
    labels: Vec<usize>,
    components: usize,
    neighbors: Vec<Vec<usize>>,
    positions: Vec<Point>,
}

impl ForceLayout {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn arrange(&self, net: &Net, canvas: Canvas) -> Result<Layout, LayoutError> {
        self.arrange_with(net, canvas, &CancelToken::new(), |_| {})
    }

    /// Runs the simulation, reporting every completed iteration to `observer`
    /// and stopping early once `cancel` is raised.
    pub fn arrange_with<F>(
        &self,
        net: &Net,
        canvas: Canvas,
        cancel: &CancelToken,
        mut observer: F,
    ) -> Result<Layout, LayoutError>
    where
        F: FnMut(&Frame<'_>),
    {
        let config = &self.config;
        canvas.validate(config.node_size)?;

        let graph = AdjacencyGraph::from_net(net);
        let ids: Vec<&NodeId> = (0..graph.len()).map(|node| graph.id(node)).collect();
        if ids.is_empty() {
            return Ok(Layout {
                positions: IndexMap::new(),
                bounds: Rect::default(),
                iterations: 0,
                termination: Termination::Converged,
                spring_length: 0.0,
            });
        }

        let (labels, components) = component_labels(&graph);
        let spring_length = config.spring_length.unwrap_or_else(|| {
            canvas.width / (4.0 * (ids.len() as f64).sqrt() * components as f64)
        });
        let seed = config.seed.unwrap_or_else(rand::random);
        debug!(
            "layout of {} nodes in {} components, spring length {:.2}, seed {}",
            ids.len(),
            components,
            spring_length,
            seed
        );

        let mut rng = StdRng::seed_from_u64(seed);
        let mut simulation = Simulation {
            config,
            canvas,
            spring_length,
            labels,
            components,
            neighbors: (0..graph.len()).map(|node| graph.neighbors(node)).collect(),
            positions: scatter(ids.len(), canvas, config.node_size, &mut rng),
        };

        let mut iterations = 0;
        let mut satisfied = 0;
        let termination = loop {
            if cancel.is_cancelled() {
                break Termination::Cancelled;
            }

            let (total_displacement, component_forces) = simulation.step();
            iterations += 1;
            observer(&Frame {
                iteration: iterations,
                total_displacement,
                ids: &ids,
                positions: &simulation.positions,
            });

            let settled = total_displacement < config.displacement_per_node * ids.len() as f64
                || component_forces
                    .iter()
                    .all(|force| *force <= config.component_force_threshold);
            satisfied = if settled { satisfied + 1 } else { 0 };
            if satisfied >= config.stop_count {
                break Termination::Converged;
            }
            if iterations >= config.max_iterations {
                break Termination::IterationCap;
            }
            if let Some(delay) = config.frame_delay_ms {
                thread::sleep(Duration::from_millis(delay));
            }
        };

        simulation.centralize();
        if config.snap_to_grid {
            simulation.snap_to_grid();
        }
        info!(
            "layout finished after {} iterations ({:?})",
            iterations, termination
        );

        let bounds = Rect::enclosing(simulation.positions.iter().copied())
            .map(|rect| rect.inflate(config.node_size / 2.0))
            .unwrap_or_default();
        Ok(Layout {
            positions: ids
                .into_iter()
                .cloned()
                .zip(simulation.positions)
                .collect(),
            bounds,
            iterations,
            termination,
            spring_length,
        })
    }
}

/// Initial positions: nodes are shuffled over a grid of cells covering the usable
/// canvas and placed at a random point inside their cell.
fn scatter(count: usize, canvas: Canvas, node_size: f64, rng: &mut StdRng) -> Vec<Point> {
    let columns = (count as f64).sqrt().ceil() as usize;
    let rows = count.div_ceil(columns);
    let half = node_size / 2.0;
    let cell_width = (canvas.width - node_size) / columns as f64;
    let cell_height = (canvas.height - node_size) / rows as f64;

    let mut cells: Vec<usize> = (0..count).collect();
    cells.shuffle(rng);
    cells
        .into_iter()
        .map(|cell| {
            let (column, row) = (cell % columns, cell / columns);
            let x = half + (column as f64 + rng.random::<f64>()) * cell_width;
            let y = half + (row as f64 + rng.random::<f64>()) * cell_height;
            canvas.clamp(Point::new(x, y), node_size)
        })
        .collect()
}

impl Simulation<'_> {
    /// One synchronous iteration. Returns the total displacement and the summed
    /// intra-component force magnitude of every component.
    fn step(&mut self) -> (f64, Vec<f64>) {
        let mut component_forces = vec![0.0; self.components];
        let next: Vec<Point> = (0..self.positions.len())
            .map(|node| {
                let degree = self.neighbors[node].len();
                let mut net_force = Vector::ZERO;
                let mut component_force = Vector::ZERO;

                for other in 0..self.positions.len() {
                    if other == node {
                        continue;
                    }
                    let mut force = self.repulsion(node, other, degree);
                    if self.labels[node] == self.labels[other] {
                        component_force += force;
                    } else {
                        force = force * self.config.inter_component_damping;
                    }
                    net_force += force;
                }

                for &other in &self.neighbors[node] {
                    let force = self.attraction(node, other) * (degree as f64).sqrt();
                    net_force += force;
                    component_force += force;
                }

                component_forces[self.labels[node]] += component_force.length();
                self.canvas
                    .clamp(self.positions[node] + net_force, self.config.node_size)
            })
            .collect();

        let total = self
            .positions
            .iter()
            .zip(&next)
            .map(|(current, next)| current.distance(*next))
            .sum();
        self.positions = next;
        (total, component_forces)
    }

    /// Proximity used by both laws: whole distance units, never below one.
    fn proximity(&self, node: usize, other: usize) -> f64 {
        self.positions[node]
            .distance(self.positions[other])
            .trunc()
            .max(1.0)
    }

    fn direction(&self, node: usize, other: usize) -> f64 {
        let (from, to) = (self.positions[node], self.positions[other]);
        if from == to {
            // 重合节点沿 x 轴按节点顺序分开。
            if node < other { 0.0 } else { 180.0 }
        } else {
            from.angle_to(to)
        }
    }

    fn repulsion(&self, node: usize, other: usize, degree: usize) -> Vector {
        let proximity = self.proximity(node, other);
        let mut force = -(self.config.repulsion / (proximity * proximity));
        force *= if degree == 0 {
            self.config.isolated_repulsion_scale
        } else {
            self.config.repulsion_degree_scale / degree as f64
        };
        Vector::from_polar(force, self.direction(node, other))
    }

    fn attraction(&self, node: usize, other: usize) -> Vector {
        let proximity = self.proximity(node, other);
        let force = self.config.attraction * (proximity - self.spring_length).max(0.0);
        Vector::from_polar(force, self.direction(node, other))
    }

    /// Shifts the diagram so that its centre coincides with the canvas centre.
    fn centralize(&mut self) {
        let Some(extent) = Rect::enclosing(self.positions.iter().copied()) else {
            return;
        };
        let target = Point::new(self.canvas.width / 2.0, self.canvas.height / 2.0);
        let shift = target - extent.center();
        for position in &mut self.positions {
            *position = self.canvas.clamp(*position + shift, self.config.node_size);
        }
    }

    fn snap_to_grid(&mut self) {
        let step = self.config.node_size;
        if step <= 0.0 {
            return;
        }
        for position in &mut self.positions {
            *position = Point::new(
                snap(position.x, self.canvas.width, step),
                snap(position.y, self.canvas.height, step),
            );
        }
    }
}

/// Nearest grid line that still keeps a node of size `step` inside `extent`.
fn snap(value: f64, extent: f64, step: f64) -> f64 {
    let half = step / 2.0;
    let (first, last) = ((half / step).ceil(), ((extent - half) / step).floor());
    if first > last {
        return value.clamp(half, extent - half);
    }
    (value / step).round().clamp(first, last) * step
}
