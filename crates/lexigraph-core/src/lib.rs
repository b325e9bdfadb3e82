//! Lexigraph Core Types and Definitions
//!
//! This crate provides the foundational types shared by every stage of the
//! Lexigraph pipeline. It includes:
//!
//! - **Graph**: Nodes, typed edges and the closure-checked [`graph::Graph`]
//! - **Relationships**: The four-bucket [`relationship::RelationshipSet`]
//!   returned by semantic sources
//! - **Geometry**: Double-precision points used for layout ([`geometry`] module)
//! - **Colors**: CSS color handling for rendering ([`color::Color`])
//! - **Warnings**: Non-fatal pipeline conditions ([`warning::Warning`])

pub mod color;
pub mod geometry;
pub mod graph;
pub mod relationship;
pub mod warning;
