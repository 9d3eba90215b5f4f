//! Petri 网结构分析与图形布局。
//!
//! * [`net`]：网模型、发生规则与结构描述的读写；
//! * [`analysis`]：强连通分量、初等回路、把手与结构性质报告；
//! * [`layout`]：力导向布局。

pub mod analysis;
pub mod config;
pub mod layout;
pub mod net;
pub mod options;
