//! Coarse content-type categories derived from file extensions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A coarse content-type label used for browsing and filtering.
///
/// Categories are derived from the file extension only; the content is
/// never inspected. Anything without a known extension falls into
/// [`Category::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Raster and vector images.
    Images,
    /// Text documents.
    Documents,
    /// Spreadsheets and tabular data.
    Spreadsheets,
    /// Slide decks.
    Presentations,
    /// Video files.
    Videos,
    /// Audio files.
    Audio,
    /// Compressed archives.
    Archives,
    /// Source code and markup.
    Code,
    /// Everything else.
    Other,
}

impl Category {
    /// All categories in a stable display order.
    pub const ALL: [Category; 9] = [
        Category::Images,
        Category::Documents,
        Category::Spreadsheets,
        Category::Presentations,
        Category::Videos,
        Category::Audio,
        Category::Archives,
        Category::Code,
        Category::Other,
    ];

    /// The category name as shown to clients.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Images => "images",
            Category::Documents => "documents",
            Category::Spreadsheets => "spreadsheets",
            Category::Presentations => "presentations",
            Category::Videos => "videos",
            Category::Audio => "audio",
            Category::Archives => "archives",
            Category::Code => "code",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or(())
    }
}
