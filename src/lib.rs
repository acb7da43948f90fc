//! Procedural node-link diagram synthesis, rendering, and animation.
//!
//! A numeric parameter set ([`DiagramParams`]) plus a seed deterministically
//! produces a [`DiagramState`] (nodes and curved connections with explicit
//! control points). Two backends render states, a `vello_cpu` pixel surface
//! and a static SVG document, sharing one geometric kernel. An externally
//! ticked [`AnimationDriver`] tweens between successively generated diagrams.
#![forbid(unsafe_code)]

pub mod driver;
pub mod error;
pub mod generate;
pub mod geometry;
pub mod interp;
pub mod model;
pub mod params;
pub mod render;
pub mod rng;
pub mod text;

pub use driver::{AnimationDriver, RenderTarget, Tick};
pub use error::{NodelinkError, NodelinkResult};
pub use generate::generate;
pub use interp::{Ease, interpolate};
pub use model::{Connection, DiagramState, Node};
pub use params::DiagramParams;
pub use render::raster::{FrameRgba, RasterRenderer};
pub use render::svg::{SvgRenderer, render_svg};
pub use rng::SeededRandom;
