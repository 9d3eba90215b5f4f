use std::collections::HashMap;

use crate::net::core::Net;
use crate::net::ids::NodeId;
use crate::net::structure::NodeKind;

/// 网的稠密邻接快照：节点按 [`Net::node_ids`] 顺序编号，边来自各节点的出入弧。
pub(crate) struct AdjacencyGraph<'n> {
    ids: Vec<&'n NodeId>,
    kinds: Vec<NodeKind>,
    index: HashMap<&'n str, usize>,
    successors: Vec<Vec<usize>>,
    predecessors: Vec<Vec<usize>>,
}

impl<'n> AdjacencyGraph<'n> {
    pub(crate) fn from_net(net: &'n Net) -> Self {
        let mut ids = Vec::with_capacity(net.len());
        let mut kinds = Vec::with_capacity(net.len());
        let mut index = HashMap::with_capacity(net.len());
        for node in net.nodes() {
            index.insert(node.id().as_str(), ids.len());
            ids.push(node.id());
            kinds.push(node.kind());
        }

        let mut successors = vec![Vec::new(); ids.len()];
        let mut predecessors = vec![Vec::new(); ids.len()];
        for arc in net.arcs() {
            let source = index[arc.source().as_str()];
            let target = index[arc.target().as_str()];
            successors[source].push(target);
            predecessors[target].push(source);
        }

        Self {
            ids,
            kinds,
            index,
            successors,
            predecessors,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.ids.len()
    }

    pub(crate) fn id(&self, node: usize) -> &'n NodeId {
        self.ids[node]
    }

    pub(crate) fn kind(&self, node: usize) -> NodeKind {
        self.kinds[node]
    }

    pub(crate) fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub(crate) fn successors(&self, node: usize) -> &[usize] {
        &self.successors[node]
    }

    pub(crate) fn predecessors(&self, node: usize) -> &[usize] {
        &self.predecessors[node]
    }

    /// Undirected neighbours of `node`, each listed once.
    pub(crate) fn neighbors(&self, node: usize) -> Vec<usize> {
        let mut neighbors = self.successors[node].clone();
        for &predecessor in &self.predecessors[node] {
            if !neighbors.contains(&predecessor) {
                neighbors.push(predecessor);
            }
        }
        neighbors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_follows_node_order() {
        let mut net = Net::empty();
        net.add_transition(None, Some("t1")).unwrap();
        net.add_place(None, Some("p1")).unwrap();
        net.add_place(None, Some("p2")).unwrap();
        net.connect("p1", "t1", 1).unwrap();
        net.connect("t1", "p1", 1).unwrap();
        net.connect("t1", "p2", 2).unwrap();

        let graph = AdjacencyGraph::from_net(&net);
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.id(0).as_str(), "p1");
        assert_eq!(graph.id(2).as_str(), "t1");
        assert_eq!(graph.kind(2), NodeKind::Transition);
        assert_eq!(graph.successors(2), &[0, 1]);
        assert_eq!(graph.predecessors(2), &[0]);
        assert_eq!(graph.neighbors(0), vec![2]);
        assert_eq!(graph.index_of("p2"), Some(1));
        assert_eq!(graph.index_of("nope"), None);
    }
}
