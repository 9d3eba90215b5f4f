//! 结构描述：节点/弧描述符与可选初始标识，以及与 [`Net`] 之间的转换。
use std::collections::HashSet;

use indexmap::IndexMap;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::net::core::{Net, NetError};
use crate::net::structure::{ArcKind, NodeKind, Weight};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetDescription {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub nodes: Vec<NodeDescriptor>,
    #[serde(default)]
    pub arcs: Vec<ArcDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marking: Option<IndexMap<String, TokenCount>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDescriptor {
    pub kind: NodeKind,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArcDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub kind: ArcKind,
    pub source: String,
    pub target: String,
    #[serde(default = "default_multiplicity")]
    pub multiplicity: Weight,
}

fn default_multiplicity() -> Weight {
    1
}

/// A token count as written in a description. Kept loose so that negative or
/// fractional counts are reported as malformed input rather than parse failures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TokenCount {
    Unsigned(u64),
    Signed(i64),
    Real(f64),
}

impl TokenCount {
    fn to_weight(self) -> Option<Weight> {
        match self {
            TokenCount::Unsigned(count) => Some(count),
            TokenCount::Signed(count) => Weight::try_from(count).ok(),
            TokenCount::Real(_) => None,
        }
    }
}

impl NetDescription {
    /// 构建网。任何结构问题都报告为 [`NetError::MalformedStructure`]。
    pub fn build(&self) -> Result<Net, NetError> {
        let mut net = match &self.id {
            Some(id) => Net::with_id(id.clone()),
            None => Net::empty(),
        };

        for node in &self.nodes {
            match node.kind {
                NodeKind::Place => net.add_place(node.name.as_deref(), Some(&node.id))?,
                NodeKind::Transition => {
                    net.add_transition(node.name.as_deref(), Some(&node.id))?
                }
            };
        }

        let mut arc_ids = HashSet::new();
        for id in self.arcs.iter().filter_map(|arc| arc.id.as_deref()) {
            if !arc_ids.insert(id) {
                return Err(NetError::MalformedStructure(format!(
                    "duplicate arc identifier {id}"
                )));
            }
        }
        for arc in &self.arcs {
            build_arc(&mut net, &arc_ids, arc)?;
        }

        if let Some(marking) = &self.marking {
            for (place, count) in marking {
                match net.node(place).map(|node| node.kind()) {
                    Some(NodeKind::Place) => {}
                    Some(NodeKind::Transition) => {
                        return Err(NetError::MalformedStructure(format!(
                            "marking assigns tokens to transition {place}"
                        )));
                    }
                    None => {
                        return Err(NetError::MalformedStructure(format!(
                            "marking references unknown place {place}"
                        )));
                    }
                }
                let tokens = count.to_weight().ok_or_else(|| {
                    NetError::MalformedStructure(format!(
                        "token count {count:?} of place {place} is not a non-negative integer"
                    ))
                })?;
                net.set_tokens(place, tokens)?;
            }
        }

        for node in net.nodes() {
            if node.in_arcs().is_empty() && node.out_arcs().is_empty() {
                warn!("孤立{} '{}' ({}) 没有任何弧", node.kind(), node.name(), node.id());
            }
        }
        debug!(
            "built net with {} places, {} transitions, {} arcs",
            net.places_len(),
            net.transitions_len(),
            net.arcs_len()
        );
        Ok(net)
    }
}

/// 连接一条描述中的弧；匿名弧生成的标识符避开 `arc_ids` 中显式声明的标识符。
fn build_arc(net: &mut Net, arc_ids: &HashSet<&str>, arc: &ArcDescriptor) -> Result<(), NetError> {
    let label = arc.id.as_deref().unwrap_or("<anonymous>");

    let endpoint_kind = |id: &str| {
        net.node(id).map(|node| node.kind()).ok_or_else(|| {
            NetError::MalformedStructure(format!(
                "arc {label} references missing node {id}"
            ))
        })
    };
    let source = endpoint_kind(&arc.source)?;
    let target = endpoint_kind(&arc.target)?;
    if ArcKind::between(source, target) != Some(arc.kind) {
        return Err(NetError::MalformedStructure(format!(
            "arc {label} is declared {} but connects a {source} to a {target}",
            arc.kind
        )));
    }

    let connection = net.connect_with_id(
        &arc.source,
        &arc.target,
        arc.multiplicity,
        arc.id.as_deref(),
        arc_ids,
    )?;
    if connection.is_merged() {
        debug!(
            "arc {label} duplicates {} -> {}, merged into {}",
            arc.source,
            arc.target,
            connection.arc()
        );
    }
    Ok(())
}

impl TryFrom<&NetDescription> for Net {
    type Error = NetError;

    fn try_from(description: &NetDescription) -> Result<Self, Self::Error> {
        description.build()
    }
}

impl From<&Net> for NetDescription {
    fn from(net: &Net) -> Self {
        let nodes = net
            .nodes()
            .map(|node| NodeDescriptor {
                kind: node.kind(),
                id: node.id().to_string(),
                name: Some(node.name().to_owned()),
            })
            .collect();
        let arcs = net
            .arcs()
            .map(|arc| ArcDescriptor {
                id: Some(arc.id().to_string()),
                kind: arc.kind(),
                source: arc.source().to_string(),
                target: arc.target().to_string(),
                multiplicity: arc.multiplicity(),
            })
            .collect();
        let marking: IndexMap<String, TokenCount> = net
            .marking()
            .iter()
            .filter(|(_, tokens)| **tokens > 0)
            .map(|(place, tokens)| (place.to_string(), TokenCount::Unsigned(*tokens)))
            .collect();

        NetDescription {
            id: net.id().map(str::to_owned),
            nodes,
            arcs,
            marking: (!marking.is_empty()).then_some(marking),
        }
    }
}

impl Net {
    pub fn to_description(&self) -> NetDescription {
        NetDescription::from(self)
    }
}
