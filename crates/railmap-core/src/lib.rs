//! Railmap Core Types and Geometry
//!
//! This crate provides the geometric foundation for importing rail diagrams
//! into a virtual world map and for the map's editing tools. It includes:
//!
//! - **Geometry**: Diagram and world point types ([`geometry`] module)
//! - **Transforms**: Per-region diagram-to-world mapping ([`transform`] module)
//! - **Curves**: Edge path builders with rounded corners ([`curve`] module)
//! - **Network**: Parsed line and station records ([`network`] module)
//! - **Colors**: Line colour attributes ([`color::LineColor`])
//! - **Nearest points**: Segment and ring projection ([`nearest`] module)
//! - **Snapping**: Threshold-gated snapping and control-point edits ([`snap`] module)

pub mod color;
pub mod curve;
pub mod geometry;
pub mod nearest;
pub mod network;
pub mod snap;
pub mod transform;
