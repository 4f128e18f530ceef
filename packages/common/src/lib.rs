//! Filesystem seam shared by the stylebridge packages.

pub mod filesystem;

pub use filesystem::*;
