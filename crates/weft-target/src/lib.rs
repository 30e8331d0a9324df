//! # weft-target
//!
//! Build target definitions for the Weft pipeline.
//!
//! This crate provides the target kinds Weft can build for (WeChat, Baidu
//! Swan, Ant, Toutiao, quick app) and the per-target file dialect tables
//! that drive component sibling classification.

pub mod target;

pub use target::{TargetKind, UnknownTarget};
