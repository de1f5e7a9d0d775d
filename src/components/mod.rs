//! Browser-side rendering of networks.

pub mod force_graph;
