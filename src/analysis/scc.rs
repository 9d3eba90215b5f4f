//! Kosaraju 强连通分量。
use log::debug;

use crate::analysis::Subnet;
use crate::analysis::graph::AdjacencyGraph;
use crate::net::core::Net;

/// 将网划分为强连通分量。每个分量内部按节点顺序排列，分量之间按 Kosaraju
/// 第二遍的发现顺序排列。不修改网。
pub fn strongly_connected_components(net: &Net) -> Vec<Subnet<'_>> {
    let graph = AdjacencyGraph::from_net(net);
    let components = kosaraju(&graph);
    debug!(
        "found {} strongly connected components over {} nodes",
        components.len(),
        graph.len()
    );
    components
        .into_iter()
        .map(|component| {
            component
                .into_iter()
                .map(|node| {
                    net.find_by_id(graph.id(node).as_str())
                        .expect("snapshot node must belong to the net")
                })
                .collect()
        })
        .collect()
}

pub fn is_strongly_connected(net: &Net) -> bool {
    kosaraju(&AdjacencyGraph::from_net(net)).len() == 1
}

pub(crate) fn kosaraju(graph: &AdjacencyGraph<'_>) -> Vec<Vec<usize>> {
    let order = finish_order(graph);

    let mut assigned = vec![false; graph.len()];
    let mut components = Vec::new();
    for &root in order.iter().rev() {
        if assigned[root] {
            continue;
        }
        assigned[root] = true;
        let mut component = Vec::new();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            component.push(node);
            for &predecessor in graph.predecessors(node) {
                if !assigned[predecessor] {
                    assigned[predecessor] = true;
                    stack.push(predecessor);
                }
            }
        }
        component.sort_unstable();
        components.push(component);
    }
    components
}

/// Post-order of an iterative depth-first search over the forward graph.
fn finish_order(graph: &AdjacencyGraph<'_>) -> Vec<usize> {
    let mut visited = vec![false; graph.len()];
    let mut order = Vec::with_capacity(graph.len());
    for root in 0..graph.len() {
        if visited[root] {
            continue;
        }
        visited[root] = true;
        let mut stack = vec![(root, 0usize)];
        while let Some(frame) = stack.last_mut() {
            let (node, cursor) = *frame;
            match graph.successors(node).get(cursor) {
                Some(&successor) => {
                    frame.1 += 1;
                    if !visited[successor] {
                        visited[successor] = true;
                        stack.push((successor, 0));
                    }
                }
                None => {
                    order.push(node);
                    stack.pop();
                }
            }
        }
    }
    order
}
