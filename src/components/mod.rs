pub mod annotation_editor;
pub mod graph_controls;
pub mod mind_map;
pub mod relationship_graph;
