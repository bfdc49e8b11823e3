//! Graph records and the adapt/layout pipeline that feeds the canvas.

pub mod adapter;
pub mod layout;
pub mod params;
pub mod style;
pub mod types;

pub use adapter::{DisplayOptions, FlowEdge, FlowNode};
pub use layout::{LayoutStrategy, PositionedGraph, PositionedNode, build_view};
pub use params::{GraphQueryParams, GraphScope, LayoutKind, ParamWarning};
pub use types::{EdgeType, GraphData, GraphEdge, GraphNode, NodeType, PayloadError};
