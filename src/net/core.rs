//! 运行时: 网的编辑操作、发生语义与深拷贝.
use std::collections::HashSet;
use std::fmt;

use indexmap::IndexMap;
use indexmap::map::Entry;
use log::debug;
use petgraph::Graph;
use thiserror::Error;

use crate::net::ids::{ArcId, NodeId};
use crate::net::structure::{Arc, ArcKind, Marking, Node, NodeKind, Weight, bounded_name};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetError {
    #[error("malformed net structure: {0}")]
    MalformedStructure(String),
    #[error("cannot connect {from} to {to}: both endpoints are {kind}s")]
    Connection {
        from: NodeId,
        to: NodeId,
        kind: NodeKind,
    },
    #[error("no arc leads from {from} to {to}")]
    Disconnection { from: NodeId, to: NodeId },
    #[error("node {0} does not exist")]
    UnknownNode(NodeId),
    #[error("node {id} is a {actual}, expected a {expected}")]
    KindMismatch {
        id: NodeId,
        expected: NodeKind,
        actual: NodeKind,
    },
    #[error("token count of place {place} would overflow")]
    MarkingOverflow { place: NodeId },
}

/// Result of [`Net::connect`]: a fresh arc, or an existing arc whose multiplicity grew.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Connection {
    Created(ArcId),
    Merged(ArcId),
}

impl Connection {
    pub fn arc(&self) -> &ArcId {
        match self {
            Connection::Created(arc) | Connection::Merged(arc) => arc,
        }
    }

    pub fn is_merged(&self) -> bool {
        matches!(self, Connection::Merged(_))
    }
}

/// 发生尝试的结果。未使能不是错误。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    Fired,
    Disabled,
}

impl FireOutcome {
    pub fn is_fired(self) -> bool {
        matches!(self, FireOutcome::Fired)
    }
}

/// 以标识符为键的二分有向图。节点与弧均由网独占持有，交叉引用一律通过标识符查找。
#[derive(Clone, Default)]
pub struct Net {
    id: Option<String>,
    places: IndexMap<NodeId, Node>,
    transitions: IndexMap<NodeId, Node>,
    arcs: IndexMap<ArcId, Arc>,
    marking: Marking,
    serial: u64,
}

impl fmt::Debug for Net {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Net")
            .field("id", &self.id)
            .field("places", &self.places.values().collect::<Vec<_>>())
            .field("transitions", &self.transitions.values().collect::<Vec<_>>())
            .field("arcs", &self.arcs.values().collect::<Vec<_>>())
            .field("marking", &self.marking)
            .finish()
    }
}

impl Net {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn add_place(&mut self, name: Option<&str>, id: Option<&str>) -> Result<NodeId, NetError> {
        self.add_node(NodeKind::Place, name, id)
    }

    pub fn add_transition(
        &mut self,
        name: Option<&str>,
        id: Option<&str>,
    ) -> Result<NodeId, NetError> {
        self.add_node(NodeKind::Transition, name, id)
    }

    fn add_node(
        &mut self,
        kind: NodeKind,
        name: Option<&str>,
        id: Option<&str>,
    ) -> Result<NodeId, NetError> {
        let node_id = match id {
            Some("") => {
                return Err(NetError::MalformedStructure(
                    "node identifier must not be empty".to_owned(),
                ));
            }
            Some(id) if self.node(id).is_some() => {
                return Err(NetError::MalformedStructure(format!(
                    "duplicate node identifier {id}"
                )));
            }
            Some(id) => NodeId::new(id),
            None => NodeId::new(self.fresh_id(
                match kind {
                    NodeKind::Place => "P",
                    NodeKind::Transition => "T",
                },
                &HashSet::new(),
            )),
        };

        let node = match kind {
            NodeKind::Place => {
                let default_name = format!("p{}", self.places.len() + 1);
                let node = Node::new(node_id.clone(), name.unwrap_or(&default_name), kind);
                self.marking.insert(node_id.clone(), 0);
                self.places.insert(node_id.clone(), node);
                &self.places[&node_id]
            }
            NodeKind::Transition => {
                let default_name = format!("t{}", self.transitions.len() + 1);
                let node = Node::new(node_id.clone(), name.unwrap_or(&default_name), kind);
                self.transitions.insert(node_id.clone(), node);
                &self.transitions[&node_id]
            }
        };
        debug!("added {} {} ({})", kind, node.id, node.name);
        Ok(node_id)
    }

    /// 生成未被占用的标识符；`reserved` 中的标识符同样跳过。
    fn fresh_id(&mut self, prefix: &str, reserved: &HashSet<&str>) -> String {
        loop {
            self.serial += 1;
            let candidate = format!("{prefix}{}", self.serial);
            if self.node(&candidate).is_none()
                && !self.arcs.contains_key(candidate.as_str())
                && !reserved.contains(candidate.as_str())
            {
                return candidate;
            }
        }
    }

    /// 按标识符查找节点。
    pub fn find_by_id(&self, id: &str) -> Option<&Node> {
        self.node(id)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.places.get(id).or_else(|| self.transitions.get(id))
    }

    fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        match self.places.get_mut(id) {
            Some(node) => Some(node),
            None => self.transitions.get_mut(id),
        }
    }

    fn expect_node(&self, id: &str) -> Result<&Node, NetError> {
        self.node(id)
            .ok_or_else(|| NetError::UnknownNode(NodeId::new(id)))
    }

    fn expect_kind(&self, id: &str, expected: NodeKind) -> Result<&Node, NetError> {
        let node = self.expect_node(id)?;
        if node.kind != expected {
            return Err(NetError::KindMismatch {
                id: node.id.clone(),
                expected,
                actual: node.kind,
            });
        }
        Ok(node)
    }

    pub fn rename(&mut self, id: &str, name: &str) -> Result<(), NetError> {
        let node = self
            .node_mut(id)
            .ok_or_else(|| NetError::UnknownNode(NodeId::new(id)))?;
        node.name = bounded_name(name);
        Ok(())
    }

    /// 先库所后变迁，各自保持插入顺序。
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.places.values().chain(self.transitions.values())
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.places.keys().chain(self.transitions.keys())
    }

    pub fn places(&self) -> impl Iterator<Item = &Node> {
        self.places.values()
    }

    pub fn transitions(&self) -> impl Iterator<Item = &Node> {
        self.transitions.values()
    }

    pub fn arcs(&self) -> impl Iterator<Item = &Arc> {
        self.arcs.values()
    }

    pub fn arc(&self, id: &str) -> Option<&Arc> {
        self.arcs.get(id)
    }

    pub fn len(&self) -> usize {
        self.places.len() + self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn places_len(&self) -> usize {
        self.places.len()
    }

    pub fn transitions_len(&self) -> usize {
        self.transitions.len()
    }

    pub fn arcs_len(&self) -> usize {
        self.arcs.len()
    }

    /// The unique arc for the ordered pair `(from, to)`, if any.
    pub fn arc_between(&self, from: &str, to: &str) -> Option<&Arc> {
        self.node(from)?
            .out_arcs
            .iter()
            .map(|arc| &self.arcs[arc])
            .find(|arc| arc.target.as_str() == to)
    }

    /// 连接两个节点。同一有序节点对上已有弧时只累加重数并返回 [`Connection::Merged`]。
    pub fn connect(
        &mut self,
        from: &str,
        to: &str,
        multiplicity: Weight,
    ) -> Result<Connection, NetError> {
        self.connect_with_id(from, to, multiplicity, None, &HashSet::new())
    }

    /// Like [`Net::connect`], with an explicit arc id. Generated ids avoid `reserved`.
    pub(crate) fn connect_with_id(
        &mut self,
        from: &str,
        to: &str,
        multiplicity: Weight,
        id: Option<&str>,
        reserved: &HashSet<&str>,
    ) -> Result<Connection, NetError> {
        if multiplicity == 0 {
            return Err(NetError::MalformedStructure(format!(
                "arc {from} -> {to} must have a positive multiplicity"
            )));
        }
        let source = self.expect_node(from)?;
        let target = self.expect_node(to)?;
        let kind = ArcKind::between(source.kind, target.kind).ok_or_else(|| {
            NetError::Connection {
                from: source.id.clone(),
                to: target.id.clone(),
                kind: source.kind,
            }
        })?;
        let (source_id, target_id) = (source.id.clone(), target.id.clone());

        if let Some(existing) = self.arc_between(from, to).map(|arc| arc.id.clone()) {
            let arc = self
                .arcs
                .get_mut(&existing)
                .expect("arc referenced by a node must be owned by the net");
            arc.multiplicity = arc.multiplicity.saturating_add(multiplicity);
            debug!(
                "merged into arc {} ({} -> {}), multiplicity {}",
                existing, source_id, target_id, arc.multiplicity
            );
            return Ok(Connection::Merged(existing));
        }

        let arc_id = match id {
            Some(id) if self.arcs.contains_key(id) => {
                return Err(NetError::MalformedStructure(format!(
                    "duplicate arc identifier {id}"
                )));
            }
            Some(id) => ArcId::new(id),
            None => ArcId::new(self.fresh_id("A", reserved)),
        };

        self.node_mut(from)
            .expect("source checked above")
            .out_arcs
            .push(arc_id.clone());
        self.node_mut(to)
            .expect("target checked above")
            .in_arcs
            .push(arc_id.clone());
        debug!("connected {} -> {} with {} arc {}", source_id, target_id, kind, arc_id);
        self.arcs.insert(
            arc_id.clone(),
            Arc {
                id: arc_id.clone(),
                kind,
                source: source_id,
                target: target_id,
                multiplicity,
            },
        );
        Ok(Connection::Created(arc_id))
    }

    /// 删除有序节点对上唯一的弧。
    pub fn disconnect(&mut self, from: &str, to: &str) -> Result<Arc, NetError> {
        let arc_id = self
            .arc_between(from, to)
            .map(|arc| arc.id.clone())
            .ok_or_else(|| NetError::Disconnection {
                from: NodeId::new(from),
                to: NodeId::new(to),
            })?;
        Ok(self
            .remove_arc(arc_id.as_str())
            .expect("arc found through its source must exist"))
    }

    pub fn remove_arc(&mut self, id: &str) -> Option<Arc> {
        let arc = self.arcs.shift_remove(id)?;
        if let Some(source) = self.node_mut(arc.source.as_str()) {
            source.detach(&arc.id);
        }
        if let Some(target) = self.node_mut(arc.target.as_str()) {
            target.detach(&arc.id);
        }
        Some(arc)
    }

    /// 删除节点并级联删除其全部关联弧。重复删除返回 `None`。
    pub fn remove_node(&mut self, id: &str) -> Option<Node> {
        let node = self.node(id)?;
        let kind = node.kind;
        let incident: Vec<ArcId> = node
            .in_arcs
            .iter()
            .chain(node.out_arcs.iter())
            .cloned()
            .collect();
        for arc in &incident {
            self.remove_arc(arc.as_str());
        }
        let removed = match kind {
            NodeKind::Place => {
                self.marking.remove(id);
                self.places.shift_remove(id)
            }
            NodeKind::Transition => self.transitions.shift_remove(id),
        };
        debug!("removed {} {} with {} incident arcs", kind, id, incident.len());
        removed
    }

    /// 无向邻接：任一方向存在弧即为相连。
    pub fn are_connected(&self, a: &str, b: &str) -> bool {
        self.arc_between(a, b).is_some() || self.arc_between(b, a).is_some()
    }

    pub fn successors<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a NodeId> + use<'a> {
        self.node(id)
            .into_iter()
            .flat_map(|node| node.out_arcs.iter())
            .map(move |arc| &self.arcs[arc].target)
    }

    pub fn predecessors<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a NodeId> + use<'a> {
        self.node(id)
            .into_iter()
            .flat_map(|node| node.in_arcs.iter())
            .map(move |arc| &self.arcs[arc].source)
    }

    /// Nodes adjacent to `id` in either direction, without duplicates.
    pub fn neighbors(&self, id: &str) -> Vec<&NodeId> {
        let mut neighbors: Vec<&NodeId> = self.successors(id).collect();
        for predecessor in self.predecessors(id) {
            if !neighbors.contains(&predecessor) {
                neighbors.push(predecessor);
            }
        }
        neighbors
    }

    pub fn marking(&self) -> &Marking {
        &self.marking
    }

    /// Token count of a place; `None` when `place` is not a place of this net.
    pub fn tokens(&self, place: &str) -> Option<Weight> {
        self.places.get(place).map(|_| self.marking.tokens(place))
    }

    fn tokens_mut(&mut self, place: &str) -> Result<&mut Weight, NetError> {
        self.expect_kind(place, NodeKind::Place)?;
        Ok(self
            .marking
            .tokens_mut(place)
            .expect("every place has a marking entry"))
    }

    pub fn add_token(&mut self, place: &str) -> Result<Weight, NetError> {
        let tokens = self.tokens_mut(place)?;
        *tokens = tokens
            .checked_add(1)
            .ok_or_else(|| NetError::MarkingOverflow {
                place: NodeId::new(place),
            })?;
        Ok(*tokens)
    }

    /// 移除一个令牌；已为零时不做任何事。
    pub fn remove_token(&mut self, place: &str) -> Result<Weight, NetError> {
        let tokens = self.tokens_mut(place)?;
        *tokens = tokens.saturating_sub(1);
        Ok(*tokens)
    }

    pub fn set_tokens(&mut self, place: &str, count: Weight) -> Result<(), NetError> {
        *self.tokens_mut(place)? = count;
        Ok(())
    }

    pub fn clear_tokens(&mut self, place: &str) -> Result<(), NetError> {
        self.set_tokens(place, 0)
    }

    pub fn clear_marking(&mut self) {
        for place in self.places.keys() {
            if let Some(tokens) = self.marking.tokens_mut(place.as_str()) {
                *tokens = 0;
            }
        }
    }

    pub fn is_enabled(&self, transition: &str) -> Result<bool, NetError> {
        let node = self.expect_kind(transition, NodeKind::Transition)?;
        Ok(self.enabled(node))
    }

    pub fn enabled_transitions(&self) -> Vec<&NodeId> {
        self.transitions
            .values()
            .filter(|node| self.enabled(node))
            .map(|node| &node.id)
            .collect()
    }

    fn enabled(&self, transition: &Node) -> bool {
        !transition.in_arcs.is_empty()
            && transition.in_arcs.iter().all(|arc| {
                let arc = &self.arcs[arc];
                self.marking.tokens(arc.source.as_str()) >= arc.multiplicity
            })
    }

    /// 原子地发生一个变迁：要么全部输入/输出库所一起更新，要么标识保持不变。
    pub fn fire(&mut self, transition: &str) -> Result<FireOutcome, NetError> {
        let node = self.expect_kind(transition, NodeKind::Transition)?;
        if !self.enabled(node) {
            debug!("transition {} is not enabled", transition);
            return Ok(FireOutcome::Disabled);
        }

        let mut staged: IndexMap<&NodeId, Weight> = IndexMap::new();
        for arc in node.in_arcs.iter().map(|arc| &self.arcs[arc]) {
            let tokens = staged_tokens(&mut staged, &self.marking, &arc.source);
            *tokens = tokens
                .checked_sub(arc.multiplicity)
                .expect("enabled transition must have sufficient tokens");
        }
        for arc in node.out_arcs.iter().map(|arc| &self.arcs[arc]) {
            let tokens = staged_tokens(&mut staged, &self.marking, &arc.target);
            *tokens = tokens
                .checked_add(arc.multiplicity)
                .ok_or_else(|| NetError::MarkingOverflow {
                    place: arc.target.clone(),
                })?;
        }

        let staged: Vec<(NodeId, Weight)> = staged
            .into_iter()
            .map(|(place, tokens)| (place.clone(), tokens))
            .collect();
        for (place, tokens) in staged {
            *self
                .marking
                .tokens_mut(place.as_str())
                .expect("arc endpoints of a transition are places of the net") = tokens;
        }
        debug!("fired {}", transition);
        Ok(FireOutcome::Fired)
    }

    /// 完全独立的副本：新的节点与弧对象，标识符与标识相同。
    pub fn deep_clone(&self) -> Net {
        self.clone()
    }

    /// Exports the structure as a petgraph graph; node weights are identifiers and edge
    /// weights are multiplicities.
    pub fn to_graph(&self) -> Graph<NodeId, Weight> {
        let mut graph = Graph::with_capacity(self.len(), self.arcs.len());
        let indices: IndexMap<&NodeId, _> = self
            .node_ids()
            .map(|id| (id, graph.add_node(id.clone())))
            .collect();
        for arc in self.arcs.values() {
            graph.add_edge(
                indices[&arc.source],
                indices[&arc.target],
                arc.multiplicity,
            );
        }
        graph
    }
}

fn staged_tokens<'a, 'b>(
    staged: &'b mut IndexMap<&'a NodeId, Weight>,
    marking: &Marking,
    place: &'a NodeId,
) -> &'b mut Weight {
    match staged.entry(place) {
        Entry::Occupied(entry) => entry.into_mut(),
        Entry::Vacant(entry) => entry.insert(marking.tokens(place.as_str())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn producer_consumer() -> (Net, NodeId, NodeId, NodeId) {
        let mut net = Net::empty();
        let p1 = net.add_place(Some("P1"), Some("p1")).unwrap();
        let p2 = net.add_place(Some("P2"), Some("p2")).unwrap();
        let t1 = net.add_transition(Some("T1"), Some("t1")).unwrap();
        net.connect("p1", "t1", 1).unwrap();
        net.connect("t1", "p2", 1).unwrap();
        (net, p1, p2, t1)
    }

    #[test]
    fn generated_ids_and_default_names() {
        let mut net = Net::empty();
        let p = net.add_place(None, None).unwrap();
        let t = net.add_transition(None, None).unwrap();
        assert_ne!(p, t);
        assert_eq!(net.node(p.as_str()).unwrap().name(), "p1");
        assert_eq!(net.node(t.as_str()).unwrap().name(), "t1");
        assert_eq!(net.tokens(p.as_str()), Some(0));
    }

    #[test]
    fn generated_ids_skip_taken_identifiers() {
        let mut net = Net::empty();
        net.add_place(None, Some("P1")).unwrap();
        let generated = net.add_place(None, None).unwrap();
        assert_ne!(generated.as_str(), "P1");
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut net = Net::empty();
        net.add_place(None, Some("x")).unwrap();
        assert!(matches!(
            net.add_transition(None, Some("x")),
            Err(NetError::MalformedStructure(_))
        ));
        assert!(matches!(
            net.add_place(None, Some("")),
            Err(NetError::MalformedStructure(_))
        ));
    }

    #[test]
    fn connect_builds_typed_arcs() {
        let (net, p1, p2, t1) = producer_consumer();
        assert_eq!(
            net.arc_between(p1.as_str(), t1.as_str()).unwrap().kind(),
            ArcKind::PlaceToTransition
        );
        assert_eq!(
            net.arc_between(t1.as_str(), p2.as_str()).unwrap().kind(),
            ArcKind::TransitionToPlace
        );
        assert!(net.arc_between(t1.as_str(), p1.as_str()).is_none());
        assert_eq!(net.successors("p1").collect::<Vec<_>>(), vec![&t1]);
        assert_eq!(net.predecessors("p2").collect::<Vec<_>>(), vec![&t1]);
    }

    #[test]
    fn same_kind_connection_fails() {
        let (mut net, ..) = producer_consumer();
        let err = net.connect("p1", "p2", 1).unwrap_err();
        assert!(matches!(
            err,
            NetError::Connection {
                kind: NodeKind::Place,
                ..
            }
        ));
        assert!(matches!(
            net.connect("p1", "missing", 1),
            Err(NetError::UnknownNode(_))
        ));
        assert!(matches!(
            net.connect("p1", "t1", 0),
            Err(NetError::MalformedStructure(_))
        ));
    }

    #[test]
    fn repeated_connection_merges_multiplicity() {
        let (mut net, ..) = producer_consumer();
        let arcs_before = net.arcs_len();
        let connection = net.connect("p1", "t1", 2).unwrap();
        assert!(connection.is_merged());
        assert_eq!(net.arcs_len(), arcs_before);
        assert_eq!(net.arc(connection.arc().as_str()).unwrap().multiplicity(), 3);
    }

    #[test]
    fn connect_then_disconnect_restores_arcs() {
        let (mut net, ..) = producer_consumer();
        net.add_place(None, Some("p3")).unwrap();
        let before: Vec<Arc> = net.arcs().cloned().collect();
        net.connect("t1", "p3", 1).unwrap();
        let removed = net.disconnect("t1", "p3").unwrap();
        assert_eq!(removed.target().as_str(), "p3");
        assert_eq!(net.arcs().cloned().collect::<Vec<_>>(), before);
        assert!(net.node("p3").unwrap().in_arcs().is_empty());
        assert!(matches!(
            net.disconnect("t1", "p3"),
            Err(NetError::Disconnection { .. })
        ));
    }

    #[test]
    fn removing_a_node_cascades_and_is_idempotent() {
        let (mut net, ..) = producer_consumer();
        let removed = net.remove_node("t1").unwrap();
        assert_eq!(removed.id().as_str(), "t1");
        assert_eq!(net.arcs_len(), 0);
        assert!(net.node("p1").unwrap().out_arcs().is_empty());
        assert!(net.node("p2").unwrap().in_arcs().is_empty());
        assert!(net.remove_node("t1").is_none());

        net.remove_node("p1");
        assert!(net.marking().iter().all(|(place, _)| place.as_str() != "p1"));
    }

    #[test]
    fn are_connected_ignores_direction() {
        let (net, ..) = producer_consumer();
        assert!(net.are_connected("p1", "t1"));
        assert!(net.are_connected("t1", "p1"));
        assert!(!net.are_connected("p1", "p2"));
    }

    #[test]
    fn token_operations() {
        let (mut net, ..) = producer_consumer();
        assert_eq!(net.add_token("p1").unwrap(), 1);
        assert_eq!(net.add_token("p1").unwrap(), 2);
        assert_eq!(net.remove_token("p1").unwrap(), 1);
        net.clear_tokens("p1").unwrap();
        assert_eq!(net.remove_token("p1").unwrap(), 0);
        net.set_tokens("p2", 4).unwrap();
        net.clear_marking();
        assert_eq!(net.marking().total(), 0);
        assert!(matches!(
            net.add_token("t1"),
            Err(NetError::KindMismatch { .. })
        ));
    }

    #[test]
    fn fire_moves_tokens_atomically() {
        let (mut net, ..) = producer_consumer();
        net.add_token("p1").unwrap();
        assert_eq!(net.enabled_transitions(), vec![&NodeId::new("t1")]);
        assert_eq!(net.fire("t1").unwrap(), FireOutcome::Fired);
        assert_eq!(net.tokens("p1"), Some(0));
        assert_eq!(net.tokens("p2"), Some(1));

        let snapshot = net.marking().clone();
        assert_eq!(net.fire("t1").unwrap(), FireOutcome::Disabled);
        assert_eq!(net.marking(), &snapshot);
    }

    #[test]
    fn fire_respects_multiplicities_and_self_loops() {
        let mut net = Net::empty();
        net.add_place(None, Some("p")).unwrap();
        net.add_place(None, Some("q")).unwrap();
        net.add_transition(None, Some("t")).unwrap();
        net.connect("p", "t", 2).unwrap();
        net.connect("t", "p", 1).unwrap();
        net.connect("t", "q", 3).unwrap();
        net.set_tokens("p", 1).unwrap();
        assert_eq!(net.fire("t").unwrap(), FireOutcome::Disabled);
        assert_eq!(net.tokens("p"), Some(1));

        net.set_tokens("p", 2).unwrap();
        assert!(net.fire("t").unwrap().is_fired());
        assert_eq!(net.tokens("p"), Some(1));
        assert_eq!(net.tokens("q"), Some(3));
    }

    #[test]
    fn transition_without_inputs_never_fires() {
        let mut net = Net::empty();
        net.add_place(None, Some("p")).unwrap();
        net.add_transition(None, Some("source")).unwrap();
        net.connect("source", "p", 1).unwrap();
        assert!(!net.is_enabled("source").unwrap());
        assert_eq!(net.fire("source").unwrap(), FireOutcome::Disabled);
        assert!(matches!(
            net.fire("p"),
            Err(NetError::KindMismatch { .. })
        ));
    }

    #[test]
    fn overflowing_fire_changes_nothing() {
        let mut net = Net::empty();
        net.add_place(None, Some("p")).unwrap();
        net.add_place(None, Some("q")).unwrap();
        net.add_transition(None, Some("t")).unwrap();
        net.connect("p", "t", 1).unwrap();
        net.connect("t", "q", 1).unwrap();
        net.set_tokens("p", 1).unwrap();
        net.set_tokens("q", Weight::MAX).unwrap();
        assert!(matches!(
            net.fire("t"),
            Err(NetError::MarkingOverflow { .. })
        ));
        assert_eq!(net.tokens("p"), Some(1));
    }

    #[test]
    fn deep_clone_is_independent() {
        let (mut net, ..) = producer_consumer();
        net.add_token("p1").unwrap();
        let mut copy = net.deep_clone();
        copy.remove_node("t1");
        copy.add_token("p1").unwrap();
        assert_eq!(net.arcs_len(), 2);
        assert_eq!(net.tokens("p1"), Some(1));
        assert_eq!(copy.tokens("p1"), Some(2));
        assert_eq!(net.len(), copy.len() + 1);
    }

    #[test]
    fn rename_is_bounded() {
        let (mut net, ..) = producer_consumer();
        net.rename("p1", "input").unwrap();
        assert_eq!(net.node("p1").unwrap().name(), "inpu");
    }

    #[test]
    fn graph_export_mirrors_arcs() {
        let (net, ..) = producer_consumer();
        let graph = net.to_graph();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
    }
}
