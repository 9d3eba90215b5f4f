//! 图形布局：平面向量工具与力导向布局。
pub mod force;
pub mod vector;

pub use force::{
    CancelToken, Canvas, ForceLayout, Frame, Layout, LayoutConfig, LayoutError, Termination,
};
pub use vector::{Point, Rect, Vector};
