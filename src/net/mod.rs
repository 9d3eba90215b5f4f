//! # Petri 网核心定义（Place/Transition Net）
//!
//! 网由库所集合 `P`、变迁集合 `T` 与带权弧构成，弧只连接不同类型的节点：
//! `P → T` 为输入弧，`T → P` 为输出弧。对任意标识 `M`：
//!
//! * 变迁 `t` **可激发** 当且仅当它至少有一条输入弧，且对每条输入弧 `(p, t)`
//!   满足 `M[p] ≥ w(p, t)`；
//! * 变迁 **发射** 时先从全部输入库所扣除弧权，再向全部输出库所加上弧权，
//!   整个过程原子完成，失败时标识保持不变。
//!
//! 节点以字符串标识符寻址，遍历顺序固定为“先库所后变迁”，各自按插入顺序。
//!
//! ## 示例
//!
//! ```rust
//! use pnd::net::*;
//!
//! let mut net = Net::empty();
//! let p0 = net.add_place(Some("p0"), None).unwrap();
//! let p1 = net.add_place(Some("p1"), None).unwrap();
//! let t0 = net.add_transition(Some("t0"), None).unwrap();
//!
//! net.connect(p0.as_str(), t0.as_str(), 1).unwrap();
//! net.connect(t0.as_str(), p1.as_str(), 1).unwrap();
//! net.add_token(p0.as_str()).unwrap();
//!
//! assert_eq!(net.enabled_transitions(), vec![&t0]);
//! assert!(net.fire(t0.as_str()).unwrap().is_fired());
//! assert_eq!(net.tokens(p0.as_str()), Some(0));
//! assert_eq!(net.tokens(p1.as_str()), Some(1));
//! ```

pub mod core;
pub mod description;
pub mod ids;
pub mod io;
pub mod structure;

pub use self::core::{Connection, FireOutcome, Net, NetError};
pub use description::{ArcDescriptor, NetDescription, NodeDescriptor, TokenCount};
pub use ids::{ArcId, NodeId};
pub use io::{Format, IoError, load_net, save_net};
pub use structure::{Arc, ArcKind, MAX_NAME_LEN, Marking, Node, NodeKind, Weight};
