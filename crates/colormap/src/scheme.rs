//! Class palettes.
//!
//! Each palette holds one color per class, lowest class first. The cancer
//! and nitrate ramps are sequential; the residual ramp diverges around a
//! neutral middle class.

use serde::{Serialize, Serializer};

/// RGB color as (r, g, b) with values in 0..=255.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.strip_prefix('#').unwrap_or(s);
        if s.len() != 6 || !s.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&s[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Lowercase `#rrggbb`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Fill for features whose value has no class (e.g. unjoined hexagons).
pub const NO_CLASS: Rgb = Rgb::new(88, 88, 88);

/// Available class palettes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassPalette {
    /// Light lavender -> dark blue (cancer incidence)
    CancerRate,
    /// Pale yellow -> brown (nitrate concentration)
    Nitrate,
    /// Blue -> White -> Red (regression residuals)
    Residual,
}

impl ClassPalette {
    pub const ALL: &[ClassPalette] = &[Self::CancerRate, Self::Nitrate, Self::Residual];

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CancerRate => "Cancer rate",
            Self::Nitrate => "Nitrate",
            Self::Residual => "Residual",
        }
    }

    /// Colors of every class, lowest first.
    pub fn colors(&self) -> &'static [Rgb] {
        match self {
            Self::CancerRate => CANCER_RATE,
            Self::Nitrate => NITRATE,
            Self::Residual => RESIDUAL,
        }
    }

    /// Color of `class`. Classes past the end of the palette take its last
    /// color; `None` takes [`NO_CLASS`].
    pub fn color(&self, class: Option<usize>) -> Rgb {
        let colors = self.colors();
        match class {
            Some(i) => colors[i.min(colors.len() - 1)],
            None => NO_CLASS,
        }
    }
}

// ─── Palette definitions (ColorBrewer, 5 classes) ─────────────────────

const CANCER_RATE: &[Rgb] = &[
    Rgb::new(0xf1, 0xee, 0xf6),
    Rgb::new(0xbd, 0xc9, 0xe1),
    Rgb::new(0x74, 0xa9, 0xcf),
    Rgb::new(0x2b, 0x8c, 0xbe),
    Rgb::new(0x04, 0x5a, 0x8d),
];

const NITRATE: &[Rgb] = &[
    Rgb::new(0xff, 0xff, 0xd4),
    Rgb::new(0xfe, 0xd9, 0x8e),
    Rgb::new(0xfe, 0x99, 0x29),
    Rgb::new(0xd9, 0x5f, 0x0e),
    Rgb::new(0x99, 0x34, 0x04),
];

const RESIDUAL: &[Rgb] = &[
    Rgb::new(0x05, 0x71, 0xb0),
    Rgb::new(0x92, 0xc5, 0xde),
    Rgb::new(0xf7, 0xf7, 0xf7),
    Rgb::new(0xf4, 0xa5, 0x82),
    Rgb::new(0xca, 0x00, 0x20),
];
