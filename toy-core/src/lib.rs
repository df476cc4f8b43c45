//! Rope physics and motion for an on-screen cat toy.
//!
//! A chain of Verlet nodes hangs from an anchor that either follows the
//! pointer or steers itself around the screen. Each frame the chain is
//! relaxed, smoothed into a curve and handed to a [`paint::Painter`].

pub mod catalog;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod geom;
pub mod motion;
pub mod paint;
pub mod path;
pub mod raster;
pub mod rope;
pub mod scene;

pub use catalog::{Catalog, Decor, Scene, Toy};
pub use config::{Config, Mode};
pub use engine::Engine;
pub use error::{ConfigError, SnapshotError};
pub use geom::{Point, Viewport};
pub use motion::{AutoMotion, Motion, PointerMotion};
pub use paint::{Painter, Rgba, TrailStyle};
pub use path::{PathCmd, TrailPath, build_path};
pub use raster::{PixmapPainter, snapshot_png};
pub use rope::{Rope, RopeNode};
pub use scene::{Decorations, draw_scene};
