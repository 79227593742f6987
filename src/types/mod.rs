//! The read-side type system of the graph store: id mappings, compressed
//! adjacency storage with cursors, schemas, and property stores.

pub mod adj_list;
pub mod graph;
pub mod id_map;
pub mod properties;
pub mod schema;
