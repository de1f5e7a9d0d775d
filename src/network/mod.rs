//! Recipe dependency graphs.
//!
//! A [`Network`] is configured with a target [`Stack`], bounds and filters,
//! generates a [`Graph`] through one of the registered
//! [traversal algorithms](algorithm::AlgorithmKind), and translates that
//! graph into a [`RenderScene`] for a [`Renderer`].
//!
//! Edges point from an ingredient (`child`) to the item it is used to make
//! (`parent`).

pub mod algorithm;
mod edge;
mod error;
mod events;
mod graph;
pub mod interaction;
mod layout;
mod model;
mod node;
pub mod options;
mod pattern;
mod recipe;
pub mod render;
mod stack;
mod state;

pub use algorithm::{AlgorithmKind, CancelToken, GenerationRequest, TraversalAlgorithm};
pub use edge::{Edge, EdgeId};
pub use error::{NetworkError, Result};
pub use events::{NetworkEvent, SubscriptionId};
pub use graph::Graph;
pub use layout::LayoutKind;
pub use model::{GenerationPlan, Network};
pub use node::{Node, NodeGroup, NodeId};
pub use options::RenderOptions;
pub use pattern::{Filter, Pattern};
pub use recipe::{RecipeBook, RecipeSource, Relation};
pub use render::{
	ClickEvent, DoubleClickEvent, ImageResolver, NoImages, ProfileImages, RenderEdge, RenderNode,
	RenderScene, RenderSurface, Renderer,
};
pub use stack::Stack;
pub use state::{DEFAULT_DEPTH, DEFAULT_LIMIT, NetworkState};
