//! 回路的把手（handle）：首尾落在回路上、内部节点不在回路上的简单路径。
use std::collections::HashSet;
use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::net::core::Net;
use crate::net::ids::NodeId;
use crate::net::structure::{Node, NodeKind};

/// 由首尾节点类型决定的把手类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    PP,
    PT,
    TP,
    TT,
}

impl HandleKind {
    pub fn between(first: NodeKind, last: NodeKind) -> Self {
        match (first, last) {
            (NodeKind::Place, NodeKind::Place) => HandleKind::PP,
            (NodeKind::Place, NodeKind::Transition) => HandleKind::PT,
            (NodeKind::Transition, NodeKind::Place) => HandleKind::TP,
            (NodeKind::Transition, NodeKind::Transition) => HandleKind::TT,
        }
    }

    /// PT and TP handles cross between node kinds.
    pub fn is_bad(self) -> bool {
        matches!(self, HandleKind::PT | HandleKind::TP)
    }
}

impl fmt::Display for HandleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HandleKind::PP => "PP",
            HandleKind::PT => "PT",
            HandleKind::TP => "TP",
            HandleKind::TT => "TT",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handle<'n> {
    nodes: Vec<&'n Node>,
    kind: HandleKind,
}

impl<'n> Handle<'n> {
    pub fn nodes(&self) -> &[&'n Node] {
        &self.nodes
    }

    pub fn kind(&self) -> HandleKind {
        self.kind
    }

    pub fn first(&self) -> &'n Node {
        self.nodes[0]
    }

    pub fn last(&self) -> &'n Node {
        self.nodes[self.nodes.len() - 1]
    }
}

/// 在整张网上搜索给定回路的把手。
pub struct HandleFinder<'n> {
    net: &'n Net,
    bad_only: bool,
}

impl<'n> HandleFinder<'n> {
    pub fn new(net: &'n Net) -> Self {
        Self {
            net,
            bad_only: false,
        }
    }

    /// Restricts the search to PT and TP handles.
    pub fn bad_only(mut self, bad_only: bool) -> Self {
        self.bad_only = bad_only;
        self
    }

    pub fn find(&self, circuit: &[&Node]) -> Vec<Handle<'n>> {
        let mut search = HandleSearch {
            net: self.net,
            bad_only: self.bad_only,
            on_circuit: circuit.iter().map(|node| node.id()).collect(),
            path: Vec::new(),
            found: Vec::new(),
        };
        for start in circuit {
            let start = self.net_node(start.id());
            search.extend(start.id(), start);
        }
        debug!(
            "circuit of {} nodes has {} handles{}",
            circuit.len(),
            search.found.len(),
            if self.bad_only { " (bad only)" } else { "" }
        );

        search
            .found
            .into_iter()
            .map(|path| {
                let nodes: Vec<&'n Node> = path.into_iter().map(|id| self.net_node(id)).collect();
                let kind = HandleKind::between(nodes[0].kind(), nodes[nodes.len() - 1].kind());
                Handle { nodes, kind }
            })
            .collect()
    }

    fn net_node(&self, id: &NodeId) -> &'n Node {
        self.net
            .find_by_id(id.as_str())
            .expect("handle search only visits nodes of the net")
    }
}

struct HandleSearch<'n, 'c> {
    net: &'n Net,
    bad_only: bool,
    on_circuit: HashSet<&'c NodeId>,
    path: Vec<&'n NodeId>,
    found: Vec<Vec<&'n NodeId>>,
}

impl<'n, 'c> HandleSearch<'n, 'c> {
    fn extend(&mut self, node: &'n NodeId, start: &'n Node) {
        self.path.push(node);
        let net = self.net;
        for successor in net.successors(node.as_str()) {
            if node != start.id() && self.on_circuit.contains(successor) {
                let end = net
                    .find_by_id(successor.as_str())
                    .expect("successor of a net node is in the net");
                if self.bad_only && end.kind() == start.kind() {
                    continue;
                }
                let mut handle = self.path.clone();
                handle.push(successor);
                self.found.push(handle);
            } else if !self.on_circuit.contains(successor) && !self.path.contains(&successor) {
                self.extend(successor, start);
            }
        }
        self.path.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::circuits::elementary_circuits;

    fn cycle_with_bypass() -> Net {
        let mut net = Net::empty();
        for p in ["p1", "p2", "p3"] {
            net.add_place(None, Some(p)).unwrap();
        }
        for t in ["t1", "t2"] {
            net.add_transition(None, Some(t)).unwrap();
        }
        for (from, to) in [
            ("p1", "t1"),
            ("t1", "p2"),
            ("p2", "t2"),
            ("t2", "p1"),
            ("t1", "p3"),
            ("p3", "t2"),
        ] {
            net.connect(from, to, 1).unwrap();
        }
        net
    }

    fn ids<'n>(handle: &Handle<'n>) -> Vec<&'n str> {
        handle.nodes().iter().map(|node| node.id().as_str()).collect()
    }

    #[test]
    fn bypass_is_a_tt_handle() {
        let net = cycle_with_bypass();
        let circuits = elementary_circuits(&net);
        let circuit = circuits
            .iter()
            .find(|circuit| circuit.len() == 4)
            .unwrap();
        let circuit_ids: Vec<&str> = circuit.iter().map(|node| node.id().as_str()).collect();
        assert_eq!(circuit_ids, ["p1", "t1", "p2", "t2"]);

        let handles = HandleFinder::new(&net).find(circuit);
        assert_eq!(handles.len(), 1);
        assert_eq!(ids(&handles[0]), ["t1", "p3", "t2"]);
        assert_eq!(handles[0].kind(), HandleKind::TT);
        assert!(!handles[0].kind().is_bad());

        assert!(HandleFinder::new(&net).bad_only(true).find(circuit).is_empty());
    }

    #[test]
    fn bad_only_keeps_crossing_handles() {
        // p1 -> t3 -> p3 -> t2 leaves the circuit at a place and rejoins it at a transition.
        let mut net = cycle_with_bypass();
        net.add_transition(None, Some("t3")).unwrap();
        net.connect("p1", "t3", 1).unwrap();
        net.connect("t3", "p3", 1).unwrap();

        let circuit: Vec<&Node> = ["p1", "t1", "p2", "t2"]
            .iter()
            .map(|id| net.find_by_id(id).unwrap())
            .collect();

        let all = HandleFinder::new(&net).find(&circuit);
        let mut kinds: Vec<(Vec<&str>, HandleKind)> =
            all.iter().map(|handle| (ids(handle), handle.kind())).collect();
        kinds.sort();
        assert_eq!(
            kinds,
            vec![
                (vec!["p1", "t3", "p3", "t2"], HandleKind::PT),
                (vec!["t1", "p3", "t2"], HandleKind::TT),
            ]
        );

        let bad = HandleFinder::new(&net).bad_only(true).find(&circuit);
        assert_eq!(bad.len(), 1);
        assert_eq!(bad[0].kind(), HandleKind::PT);
        assert_eq!(bad[0].first().id().as_str(), "p1");
        assert_eq!(bad[0].last().id().as_str(), "t2");
    }

    #[test]
    fn direct_circuit_arcs_are_not_handles() {
        let mut net = Net::empty();
        net.add_place(None, Some("p1")).unwrap();
        net.add_transition(None, Some("t1")).unwrap();
        net.connect("p1", "t1", 1).unwrap();
        net.connect("t1", "p1", 1).unwrap();
        let circuit: Vec<&Node> = net.nodes().collect();
        assert!(HandleFinder::new(&net).find(&circuit).is_empty());
    }

    #[test]
    fn kind_follows_endpoints() {
        assert_eq!(
            HandleKind::between(NodeKind::Place, NodeKind::Place),
            HandleKind::PP
        );
        assert_eq!(
            HandleKind::between(NodeKind::Transition, NodeKind::Place),
            HandleKind::TP
        );
        assert!(HandleKind::TP.is_bad());
        assert!(!HandleKind::PP.is_bad());
        assert_eq!(HandleKind::PT.to_string(), "PT");
    }
}
