//! Legend rows for classified layers

use nitramap_algorithms::classification::ClassBreaks;
use serde::Serialize;

use crate::scheme::{ClassPalette, Rgb};

/// One legend row: a class range and its fill.
///
/// Open-ended deviation classes have infinite bounds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub class: usize,
    pub lower: f64,
    pub upper: f64,
    pub color: Rgb,
}

impl LegendEntry {
    /// `"lower – upper"` with two decimals, or `"< upper"` / `"> lower"`
    /// for open ends.
    pub fn label(&self) -> String {
        match (self.lower.is_finite(), self.upper.is_finite()) {
            (true, true) => format!("{:.2} – {:.2}", self.lower, self.upper),
            (false, true) => format!("≤ {:.2}", self.upper),
            (true, false) => format!("> {:.2}", self.lower),
            (false, false) => "all values".to_string(),
        }
    }
}

/// Legend rows for `breaks`, lowest class first.
pub fn legend_entries(breaks: &ClassBreaks, palette: ClassPalette) -> Vec<LegendEntry> {
    breaks
        .bounds()
        .into_iter()
        .enumerate()
        .map(|(class, (lower, upper))| LegendEntry {
            class,
            lower,
            upper,
            color: palette.color(Some(class)),
        })
        .collect()
}
