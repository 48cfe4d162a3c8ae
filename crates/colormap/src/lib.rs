//! # NitraMap Colormap
//!
//! Class palettes and legend rows for the classified map layers.
//!
//! Classification decides which class a value falls into; this crate only
//! decides how each class is drawn.
//!
//! ## Usage
//!
//! ```ignore
//! use nitramap_colormap::{legend_entries, ClassPalette};
//!
//! let fill = ClassPalette::CancerRate.color(breaks.classify(0.21));
//! let legend = legend_entries(&breaks, ClassPalette::CancerRate);
//! ```

mod legend;
mod scheme;

pub use legend::{legend_entries, LegendEntry};
pub use scheme::{ClassPalette, Rgb, NO_CLASS};
