//! Johnson 初等回路枚举。
//!
//! 在网的深拷贝上工作：每轮取剩余网中的第一个节点，求其所在强连通分量，
//! 在该分量内做带阻塞表的回溯搜索，然后从拷贝中删除该节点。找到的回路
//! 按标识符映射回原网的节点。
use log::debug;

use crate::analysis::Subnet;
use crate::analysis::graph::AdjacencyGraph;
use crate::analysis::scc::kosaraju;
use crate::net::core::Net;

pub fn elementary_circuits(net: &Net) -> Vec<Subnet<'_>> {
    let mut working = net.deep_clone();
    let mut circuits = Vec::new();

    loop {
        let first = working.node_ids().next().cloned();
        let Some(first) = first else { break };
        {
            let graph = AdjacencyGraph::from_net(&working);
            let root = graph
                .index_of(first.as_str())
                .expect("first node must be in the snapshot");
            let component = kosaraju(&graph)
                .into_iter()
                .find(|component| component.contains(&root))
                .expect("every node belongs to a strongly connected component");

            if component.len() > 1 {
                let mut search = CircuitSearch::new(&graph, &component);
                search.circuit(root, root);
                debug!(
                    "root {} closes {} circuits in a component of {} nodes",
                    first,
                    search.found.len(),
                    component.len()
                );
                for found in search.found {
                    circuits.push(
                        found
                            .into_iter()
                            .map(|node| {
                                net.find_by_id(graph.id(node).as_str())
                                    .expect("cloned node must exist in the source net")
                            })
                            .collect(),
                    );
                }
            }
        }
        working.remove_node(first.as_str());
    }

    debug!("enumerated {} elementary circuits", circuits.len());
    circuits
}

/// 一次回溯搜索的全部可变状态。
struct CircuitSearch<'g, 'n> {
    graph: &'g AdjacencyGraph<'n>,
    in_component: Vec<bool>,
    blocked: Vec<bool>,
    blocked_by: Vec<Vec<usize>>,
    stack: Vec<usize>,
    found: Vec<Vec<usize>>,
}

impl<'g, 'n> CircuitSearch<'g, 'n> {
    fn new(graph: &'g AdjacencyGraph<'n>, component: &[usize]) -> Self {
        let mut in_component = vec![false; graph.len()];
        for &node in component {
            in_component[node] = true;
        }
        Self {
            graph,
            in_component,
            blocked: vec![false; graph.len()],
            blocked_by: vec![Vec::new(); graph.len()],
            stack: Vec::new(),
            found: Vec::new(),
        }
    }

    fn circuit(&mut self, node: usize, root: usize) -> bool {
        let mut closed = false;
        self.stack.push(node);
        self.blocked[node] = true;

        let graph = self.graph;
        let successors = graph
            .successors(node)
            .iter()
            .copied()
            .filter(|&successor| self.in_component[successor])
            .collect::<Vec<_>>();

        for &successor in &successors {
            if successor == root {
                self.found.push(self.stack.clone());
                closed = true;
            } else if !self.blocked[successor] && self.circuit(successor, root) {
                closed = true;
            }
        }

        if closed {
            self.unblock(node);
        } else {
            for &successor in &successors {
                if !self.blocked_by[successor].contains(&node) {
                    self.blocked_by[successor].push(node);
                }
            }
        }

        self.stack.pop();
        closed
    }

    fn unblock(&mut self, node: usize) {
        let mut pending = vec![node];
        while let Some(node) = pending.pop() {
            self.blocked[node] = false;
            for waiting in std::mem::take(&mut self.blocked_by[node]) {
                if self.blocked[waiting] {
                    pending.push(waiting);
                }
            }
        }
    }
}
