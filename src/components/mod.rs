pub mod debug_toolbar;
pub mod details;
pub mod footer;
pub mod metric_selector;
pub mod status;
pub mod topologies;
pub mod topology_graph;
