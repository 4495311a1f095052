//! This crate provides an interactive viewer for point clouds stored as plain text files.
//!
//! Points are colored by their elevation or by their own color, and can be inspected in any
//! number of viewer windows at once.

pub mod io;
pub mod modules;
pub mod navigation;
pub mod renderer;
pub mod scene;
