extern crate petgraph;
extern crate num;

pub mod errors;
pub mod graph;
pub mod graphs;
pub mod scoring;
pub mod backtrack;
pub mod slicing;
pub mod aligner;
