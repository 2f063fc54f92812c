//! # Fragment Injection
//!
//! Second stage of the pipeline. A fragment is a file named after the marker
//! token; every line elsewhere in the code directory that consists of the
//! marker alone is replaced by the fragment's lines, indented like the
//! marker line was.
//!
//! - [`injector`] holds the text transformation ([`injector::expand`]) and
//!   the walk that applies it to every file under a directory.
//! - [`manager`] finds the fragment file, drives the injector and removes
//!   the fragment from the code directory afterwards.

pub mod injector;
pub mod manager;

pub use injector::{expand, Injector};
pub use manager::FragmentManager;
