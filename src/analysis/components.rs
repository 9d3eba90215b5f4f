//! 弱连通分量：忽略弧方向后的连通划分，供布局按子图计算受力。
use crate::analysis::Subnet;
use crate::analysis::graph::AdjacencyGraph;
use crate::net::core::Net;

/// 分量按其第一个节点在网中的顺序排列，分量内部保持节点顺序。
pub fn connected_components(net: &Net) -> Vec<Subnet<'_>> {
    let graph = AdjacencyGraph::from_net(net);
    let (labels, count) = component_labels(&graph);
    let mut components: Vec<Subnet<'_>> = vec![Vec::new(); count];
    for (node, label) in labels.into_iter().enumerate() {
        components[label].push(
            net.find_by_id(graph.id(node).as_str())
                .expect("snapshot node must belong to the net"),
        );
    }
    components
}

/// Component number of every node of `graph`, and the number of components.
pub(crate) fn component_labels(graph: &AdjacencyGraph<'_>) -> (Vec<usize>, usize) {
    let mut labels = vec![usize::MAX; graph.len()];
    let mut count = 0;
    for root in 0..graph.len() {
        if labels[root] != usize::MAX {
            continue;
        }
        labels[root] = count;
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            for neighbor in graph.neighbors(node) {
                if labels[neighbor] == usize::MAX {
                    labels[neighbor] = count;
                    stack.push(neighbor);
                }
            }
        }
        count += 1;
    }
    (labels, count)
}
