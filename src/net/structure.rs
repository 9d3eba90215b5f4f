//! P/T 网静态结构元素：节点（库所/变迁）、弧与标识。
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::net::ids::{ArcId, NodeId};

pub type Weight = u64;

/// 显示名称的最大字符数，超出部分被截断。
pub const MAX_NAME_LEN: usize = 4;

pub(crate) type ArcList = SmallVec<[ArcId; 4]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Place,
    Transition,
}

impl NodeKind {
    pub fn is_place(self) -> bool {
        matches!(self, NodeKind::Place)
    }

    pub fn is_transition(self) -> bool {
        matches!(self, NodeKind::Transition)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Place => f.write_str("place"),
            NodeKind::Transition => f.write_str("transition"),
        }
    }
}

/// 网中的一个节点。弧以标识符形式反向引用，节点本身由 [`Net`](crate::net::Net) 独占持有。
#[derive(Clone, PartialEq, Eq)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) name: String,
    pub(crate) kind: NodeKind,
    pub(crate) in_arcs: ArcList,
    pub(crate) out_arcs: ArcList,
}

impl Node {
    pub(crate) fn new(id: NodeId, name: &str, kind: NodeKind) -> Self {
        Self {
            id,
            name: bounded_name(name),
            kind,
            in_arcs: ArcList::new(),
            out_arcs: ArcList::new(),
        }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn is_place(&self) -> bool {
        self.kind.is_place()
    }

    pub fn is_transition(&self) -> bool {
        self.kind.is_transition()
    }

    pub fn in_arcs(&self) -> &[ArcId] {
        &self.in_arcs
    }

    pub fn out_arcs(&self) -> &[ArcId] {
        &self.out_arcs
    }

    pub(crate) fn detach(&mut self, arc: &ArcId) {
        self.in_arcs.retain(|id| id != arc);
        self.out_arcs.retain(|id| id != arc);
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

pub(crate) fn bounded_name(name: &str) -> String {
    name.chars().take(MAX_NAME_LEN).collect()
}

/// Direction of an arc; the only two shapes a bipartite net admits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArcKind {
    #[serde(rename = "PT")]
    PlaceToTransition,
    #[serde(rename = "TP")]
    TransitionToPlace,
}

impl ArcKind {
    /// 由端点类型推导弧类型；同类端点返回 `None`。
    pub fn between(source: NodeKind, target: NodeKind) -> Option<Self> {
        match (source, target) {
            (NodeKind::Place, NodeKind::Transition) => Some(ArcKind::PlaceToTransition),
            (NodeKind::Transition, NodeKind::Place) => Some(ArcKind::TransitionToPlace),
            _ => None,
        }
    }
}

impl fmt::Display for ArcKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArcKind::PlaceToTransition => f.write_str("PT"),
            ArcKind::TransitionToPlace => f.write_str("TP"),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Arc {
    pub(crate) id: ArcId,
    pub(crate) kind: ArcKind,
    pub(crate) source: NodeId,
    pub(crate) target: NodeId,
    pub(crate) multiplicity: Weight,
}

impl Arc {
    pub fn id(&self) -> &ArcId {
        &self.id
    }

    pub fn kind(&self) -> ArcKind {
        self.kind
    }

    pub fn source(&self) -> &NodeId {
        &self.source
    }

    pub fn target(&self) -> &NodeId {
        &self.target
    }

    pub fn multiplicity(&self) -> Weight {
        self.multiplicity
    }
}

impl fmt::Debug for Arc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arc")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("source", &self.source)
            .field("target", &self.target)
            .field("multiplicity", &self.multiplicity)
            .finish()
    }
}

/// 标识：库所到令牌数的映射，顺序与库所插入顺序一致。
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Marking(IndexMap<NodeId, Weight>);

impl Marking {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &Weight)> {
        self.0.iter()
    }

    /// Token count of `place`; places absent from the marking hold nothing.
    pub fn tokens(&self, place: &str) -> Weight {
        self.0.get(place).copied().unwrap_or_default()
    }

    /// Sum of all tokens in the marking, saturating at [`Weight::MAX`].
    pub fn total(&self) -> Weight {
        self.0
            .values()
            .fold(0, |total: Weight, tokens| total.saturating_add(*tokens))
    }

    pub(crate) fn tokens_mut(&mut self, place: &str) -> Option<&mut Weight> {
        self.0.get_mut(place)
    }

    pub(crate) fn insert(&mut self, place: NodeId, tokens: Weight) {
        self.0.insert(place, tokens);
    }

    pub(crate) fn remove(&mut self, place: &str) {
        self.0.shift_remove(place);
    }

    pub fn into_inner(self) -> IndexMap<NodeId, Weight> {
        self.0
    }
}

impl fmt::Debug for Marking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (place, tokens) in self.iter() {
            map.entry(place, tokens);
        }
        map.finish()
    }
}
