//! Build-time machinery: id map construction, label accumulation, adjacency
//! compression, and the sizing logic they share.

pub mod compress;
pub mod loading;
