//! Fish color tags
//!
//! The simulation only carries the tag; renderers map it to a palette.

use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FishColor {
    #[default]
    Coral,
    Slate,
    Sage,
}

impl FishColor {
    pub const ALL: [FishColor; 3] = [FishColor::Coral, FishColor::Slate, FishColor::Sage];

    /// Pick one tag uniformly
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FishColor::Coral => "Coral",
            FishColor::Slate => "Slate",
            FishColor::Sage => "Sage",
        }
    }

    /// Body fill color
    pub fn body_hex(&self) -> &'static str {
        match self {
            FishColor::Coral => "#ffa69e",
            FishColor::Slate => "#89a8b2",
            FishColor::Sage => "#727d73",
        }
    }

    /// Lighter shade used for fins
    pub fn fin_hex(&self) -> &'static str {
        match self {
            FishColor::Coral => "#ffd5d1",
            FishColor::Slate => "#c7d6da",
            FishColor::Sage => "#a7aea7",
        }
    }

    /// Compact tag for flat buffers handed to renderers
    pub fn as_u8(&self) -> u8 {
        match self {
            FishColor::Coral => 0,
            FishColor::Slate => 1,
            FishColor::Sage => 2,
        }
    }

    /// Inverse of [`FishColor::as_u8`]
    pub fn from_u8(tag: u8) -> Option<Self> {
        Self::ALL.get(tag as usize).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown fish color {0:?}")]
pub struct UnknownColor(pub String);

impl FromStr for FishColor {
    type Err = UnknownColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "coral" => Ok(FishColor::Coral),
            "slate" => Ok(FishColor::Slate),
            "sage" => Ok(FishColor::Sage),
            _ => Err(UnknownColor(s.to_string())),
        }
    }
}
