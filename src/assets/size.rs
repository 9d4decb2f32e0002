//! Image size variants and derivative naming

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target size of a served image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImageSize {
    Original,
    Detail,
    ItemCard,
    PageTitle,
}

impl ImageSize {
    pub const ALL: [ImageSize; 4] = [
        ImageSize::Original,
        ImageSize::Detail,
        ImageSize::ItemCard,
        ImageSize::PageTitle,
    ];

    /// Tag prefixed to derivative file names
    pub fn tag(self) -> &'static str {
        match self {
            ImageSize::Original => "ORIGINAL",
            ImageSize::Detail => "DETAIL",
            ImageSize::ItemCard => "ITEM_CARD",
            ImageSize::PageTitle => "PAGE_TITLE",
        }
    }

    /// Target width in pixels; `None` serves the unscaled file
    pub fn width(self) -> Option<u32> {
        match self {
            ImageSize::Original => None,
            ImageSize::Detail => Some(800),
            ImageSize::ItemCard => Some(400),
            ImageSize::PageTitle => Some(1920),
        }
    }

    /// `"{TAG}-{file_name}"`
    pub fn scaled_name(self, file_name: &str) -> String {
        format!("{}-{}", self.tag(), file_name)
    }

    /// Whether `name` is a derivative of some other file
    pub fn is_scaled_name(name: &str) -> bool {
        Self::ALL.iter().any(|size| {
            name.strip_prefix(size.tag())
                .is_some_and(|rest| rest.starts_with('-'))
        })
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ImageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|size| size.tag() == normalized)
            .ok_or_else(|| format!("Unknown image size: {}", s))
    }
}
