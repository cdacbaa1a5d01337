//! # PCBTex Core
//!
//! Board description model for the layer texture pipeline: geometry
//! primitives, boundary-representation shapes with bulge arcs, the typed
//! feature set, and the layer visibility toggles.
//!
//! Everything here is plain immutable data plus pure geometry; rasterization
//! lives in `pcbtex-renderer`.

pub mod board;
pub mod brep;
pub mod error;
pub mod feature;
pub mod geometry;
pub mod layer;

pub use board::{Board, BoardMaterial, Side};
pub use brep::{build_boundary_polygon, ring_to_polygon, tessellate_arc, BRep, PolygonWithHoles, Ring, Vertex};
pub use error::GeometryError;
pub use feature::{LayerFeature, Text};
pub use geometry::{is_clockwise, BBox, Point};
pub use layer::{LayerColor, LayerVisibility};
