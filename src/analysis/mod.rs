//! 结构分析：强连通分量、初等回路、把手与弱连通分量。
//!
//! 所有结果都是指向原网节点的有序序列，算法本身从不修改传入的网。

pub mod circuits;
pub mod components;
pub(crate) mod graph;
pub mod handles;
pub mod report;
pub mod scc;

use crate::net::structure::Node;

/// 子网：按算法给出的顺序排列的原网节点。
pub type Subnet<'n> = Vec<&'n Node>;

pub use circuits::elementary_circuits;
pub use components::connected_components;
pub use handles::{Handle, HandleFinder, HandleKind};
pub use report::{HandleEntry, StructuralProperties, StructuralReport, TaggedSubnet, analyze};
pub use scc::{is_strongly_connected, strongly_connected_components};
