//! Algorithm module: the stripification passes, in pipeline order.
//!
//! Strip growth ([`strip`]), the experiment-driven search ([`experiments`]),
//! cache-aware splitting and scheduling ([`optimize`]) and final index
//! emission ([`emit`]), all scored against the same [`vertex_cache`]
//! simulation.

pub mod emit;
pub mod experiments;
pub mod optimize;
pub mod strip;
pub mod vertex_cache;

pub use emit::{create_strips, StripIndex};
pub use experiments::{find_all_strips, find_traversal, NUM_SAMPLES};
pub use optimize::split_and_optimize;
pub use strip::{StripFace, StripInfo, StripStart};
pub use vertex_cache::VertexCache;
