//! 结构分析报告：强连通分量、初等回路与把手，以及由此推出的结构性质。
use std::fmt;

use itertools::Itertools;
use log::info;
use serde::{Deserialize, Serialize};

use crate::analysis::Subnet;
use crate::analysis::circuits::elementary_circuits;
use crate::analysis::handles::{HandleFinder, HandleKind};
use crate::analysis::scc::strongly_connected_components;
use crate::net::core::Net;
use crate::net::ids::NodeId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedSubnet {
    pub tag: String,
    pub nodes: Vec<NodeId>,
}

impl TaggedSubnet {
    fn new(prefix: &str, index: usize, subnet: &Subnet<'_>) -> Self {
        Self {
            tag: format!("{prefix}{}", index + 1),
            nodes: subnet.iter().map(|node| node.id().clone()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandleEntry {
    pub tag: String,
    /// Tag of the circuit the handle belongs to.
    pub circuit: String,
    pub kind: HandleKind,
    pub nodes: Vec<NodeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralProperties {
    pub structurally_bounded: bool,
    pub repetitive: bool,
    pub structurally_live: bool,
    pub conservative: bool,
    pub consistent: bool,
}

impl StructuralProperties {
    fn from_handle_counts(pt_handles: usize, tp_handles: usize) -> Self {
        let neither = pt_handles == 0 && tp_handles == 0;
        Self {
            structurally_bounded: tp_handles == 0,
            repetitive: pt_handles == 0,
            structurally_live: neither,
            conservative: neither,
            consistent: neither,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralReport {
    pub bad_handles_only: bool,
    pub components: Vec<TaggedSubnet>,
    pub circuits: Vec<TaggedSubnet>,
    pub handles: Vec<HandleEntry>,
    pub pt_handles: usize,
    pub tp_handles: usize,
    /// `None` unless the net is strongly connected.
    pub properties: Option<StructuralProperties>,
}

impl StructuralReport {
    pub fn is_strongly_connected(&self) -> bool {
        self.components.len() == 1
    }
}

/// 对网做完整的结构分解。`bad_handles_only` 时只收集 PT/TP 把手。
pub fn analyze(net: &Net, bad_handles_only: bool) -> StructuralReport {
    let components: Vec<TaggedSubnet> = strongly_connected_components(net)
        .iter()
        .enumerate()
        .map(|(index, component)| TaggedSubnet::new("SCC", index, component))
        .collect();

    let finder = HandleFinder::new(net).bad_only(bad_handles_only);
    let mut circuits = Vec::new();
    let mut handles = Vec::new();
    for (index, circuit) in elementary_circuits(net).iter().enumerate() {
        let tagged = TaggedSubnet::new("CRCT", index, circuit);
        for handle in finder.find(circuit) {
            handles.push(HandleEntry {
                tag: format!("HNDL{}", handles.len() + 1),
                circuit: tagged.tag.clone(),
                kind: handle.kind(),
                nodes: handle.nodes().iter().map(|node| node.id().clone()).collect(),
            });
        }
        circuits.push(tagged);
    }

    let pt_handles = handles
        .iter()
        .filter(|handle| handle.kind == HandleKind::PT)
        .count();
    let tp_handles = handles
        .iter()
        .filter(|handle| handle.kind == HandleKind::TP)
        .count();
    let properties = (components.len() == 1)
        .then(|| StructuralProperties::from_handle_counts(pt_handles, tp_handles));

    info!(
        "analysis: {} SCCs, {} circuits, {} handles ({} PT, {} TP)",
        components.len(),
        circuits.len(),
        handles.len(),
        pt_handles,
        tp_handles
    );

    StructuralReport {
        bad_handles_only,
        components,
        circuits,
        handles,
        pt_handles,
        tp_handles,
        properties,
    }
}

impl fmt::Display for StructuralReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Analysis results:")?;
        writeln!(f, "Strongly connected components found: {}", self.components.len())?;
        writeln!(f, "Elementary circuits found: {}", self.circuits.len())?;
        if self.bad_handles_only {
            writeln!(f, "Bad (PT/TP) handles found: {}", self.pt_handles + self.tp_handles)?;
        } else {
            writeln!(f, "Handles found: {}", self.handles.len())?;
        }
        writeln!(f)?;

        for subnet in self.components.iter().chain(&self.circuits) {
            writeln!(f, "{}: {}", subnet.tag, subnet.nodes.iter().join(" "))?;
        }
        for handle in &self.handles {
            writeln!(
                f,
                "{} [{}] on {}: {}",
                handle.tag,
                handle.kind,
                handle.circuit,
                handle.nodes.iter().join(" ")
            )?;
        }
        writeln!(f)?;

        let Some(properties) = self.properties else {
            return writeln!(
                f,
                "The net is not strongly connected, no further analysis is possible."
            );
        };
        match (self.pt_handles > 0, self.tp_handles > 0) {
            (true, true) => writeln!(
                f,
                "The net is strongly connected, however there are PT and TP handles."
            )?,
            (false, true) => writeln!(
                f,
                "The net is strongly connected and no circuit has a PT-handle."
            )?,
            (true, false) => writeln!(
                f,
                "The net is strongly connected and no circuit has a TP-handle."
            )?,
            (false, false) => writeln!(
                f,
                "The net is strongly connected and no circuit has a TP-handle nor a PT-handle."
            )?,
        }
        let holds = [
            ("structurally bounded", properties.structurally_bounded),
            ("repetitive", properties.repetitive),
            ("structurally live", properties.structurally_live),
            ("conservative", properties.conservative),
            ("consistent", properties.consistent),
        ]
        .into_iter()
        .filter(|(_, holds)| *holds)
        .map(|(name, _)| name)
        .join(", ");
        if holds.is_empty() {
            writeln!(f, "No structural property can be derived.")
        } else {
            writeln!(f, "The net is {holds}.")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn net(arcs: &[(&str, &str)]) -> Net {
        let mut net = Net::empty();
        for (from, to) in arcs {
            for id in [from, to] {
                if net.node(id).is_none() {
                    if id.starts_with('p') {
                        net.add_place(None, Some(*id)).unwrap();
                    } else {
                        net.add_transition(None, Some(*id)).unwrap();
                    }
                }
            }
            net.connect(from, to, 1).unwrap();
        }
        net
    }

    #[test]
    fn plain_cycle_has_every_property() {
        let report = analyze(
            &net(&[("p1", "t1"), ("t1", "p2"), ("p2", "t2"), ("t2", "p1")]),
            false,
        );
        assert_eq!(report.components.len(), 1);
        assert_eq!(report.components[0].tag, "SCC1");
        assert_eq!(report.circuits[0].tag, "CRCT1");
        assert!(report.handles.is_empty());
        let properties = report.properties.unwrap();
        assert!(properties.structurally_bounded);
        assert!(properties.repetitive);
        assert!(properties.structurally_live);
        assert!(properties.conservative);
        assert!(properties.consistent);
        assert!(report.to_string().contains("structurally bounded, repetitive"));
    }

    #[test]
    fn pt_handle_breaks_repetitiveness() {
        let report = analyze(
            &net(&[
                ("p1", "t1"),
                ("t1", "p2"),
                ("p2", "t2"),
                ("t2", "p1"),
                ("p1", "t3"),
                ("t3", "p3"),
                ("p3", "t2"),
            ]),
            true,
        );
        assert!(report.is_strongly_connected());
        assert_eq!(report.circuits.len(), 2);
        assert_eq!(report.pt_handles, 2);
        assert_eq!(report.tp_handles, 0);
        assert!(report.handles.iter().all(|handle| handle.kind.is_bad()));
        assert_eq!(report.handles[0].circuit, "CRCT1");
        assert_eq!(report.handles[1].circuit, "CRCT2");

        let properties = report.properties.unwrap();
        assert!(properties.structurally_bounded);
        assert!(!properties.repetitive);
        assert!(!properties.conservative);
        assert!(report.to_string().contains("Bad (PT/TP) handles found: 2"));
    }

    #[test]
    fn disconnected_net_has_no_properties() {
        let report = analyze(&net(&[("p1", "t1"), ("t1", "p2")]), false);
        assert_eq!(report.components.len(), 3);
        assert!(report.properties.is_none());
        assert!(report.to_string().contains("not strongly connected"));
    }

    #[test]
    fn report_serializes() {
        let report = analyze(&net(&[("p1", "t1"), ("t1", "p1")]), false);
        let json = serde_json::to_string(&report).unwrap();
        let back: StructuralReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
