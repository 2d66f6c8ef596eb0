//! File categorization by extension.

use drivebox_entity::file::Category;

/// Category -> extension table. First matching category wins.
const CATEGORY_EXTENSIONS: &[(Category, &[&str])] = &[
    (
        Category::Images,
        &["jpg", "jpeg", "png", "gif", "bmp", "svg", "webp"],
    ),
    (
        Category::Documents,
        &["pdf", "doc", "docx", "txt", "rtf", "odt"],
    ),
    (Category::Spreadsheets, &["xls", "xlsx", "csv", "ods"]),
    (Category::Presentations, &["ppt", "pptx", "odp"]),
    (
        Category::Videos,
        &["mp4", "avi", "mov", "wmv", "flv", "webm", "mkv"],
    ),
    (
        Category::Audio,
        &["mp3", "wav", "flac", "aac", "ogg", "wma"],
    ),
    (
        Category::Archives,
        &["zip", "rar", "7z", "tar", "gz", "bz2"],
    ),
    (
        Category::Code,
        &[
            "js", "ts", "jsx", "tsx", "html", "css", "scss", "json", "xml", "yaml", "yml",
        ],
    ),
];

/// Maps a file name to a [`Category`] by its extension.
///
/// Pure and deterministic: the same name always yields the same category,
/// the comparison is case-insensitive, and an unknown or missing extension
/// yields [`Category::Other`]. The content is never inspected.
#[derive(Debug, Clone, Default)]
pub struct CategoryClassifier;

impl CategoryClassifier {
    /// Creates a new classifier.
    pub fn new() -> Self {
        Self
    }

    /// Classify a file name.
    pub fn classify(&self, name: &str) -> Category {
        let Some(ext) = extension(name) else {
            return Category::Other;
        };
        let ext = ext.to_lowercase();

        CATEGORY_EXTENSIONS
            .iter()
            .find(|(_, exts)| exts.contains(&ext.as_str()))
            .map(|(category, _)| *category)
            .unwrap_or(Category::Other)
    }
}

/// The extension of a file name, without the dot. Dotfiles such as
/// `.gitignore` have no extension.
fn extension(name: &str) -> Option<&str> {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_is_case_insensitive() {
        let classifier = CategoryClassifier::new();
        assert_eq!(classifier.classify("a.JPG"), Category::Images);
        assert_eq!(classifier.classify("a.jpg"), Category::Images);
        assert_eq!(classifier.classify("A.JpG"), Category::Images);
    }

    #[test]
    fn known_extensions_map_to_their_category() {
        let classifier = CategoryClassifier::new();
        assert_eq!(classifier.classify("report.pdf"), Category::Documents);
        assert_eq!(classifier.classify("sheet.xlsx"), Category::Spreadsheets);
        assert_eq!(classifier.classify("deck.pptx"), Category::Presentations);
        assert_eq!(classifier.classify("clip.mkv"), Category::Videos);
        assert_eq!(classifier.classify("song.flac"), Category::Audio);
        assert_eq!(classifier.classify("backup.7z"), Category::Archives);
        assert_eq!(classifier.classify("app.tsx"), Category::Code);
    }

    #[test]
    fn unknown_and_missing_extensions_are_other() {
        let classifier = CategoryClassifier::new();
        assert_eq!(classifier.classify("a.xyz"), Category::Other);
        assert_eq!(classifier.classify("noextension"), Category::Other);
        assert_eq!(classifier.classify(".gitignore"), Category::Other);
        assert_eq!(classifier.classify(""), Category::Other);
    }

    #[test]
    fn only_the_last_extension_counts() {
        let classifier = CategoryClassifier::new();
        assert_eq!(classifier.classify("archive.tar.gz"), Category::Archives);
        assert_eq!(classifier.classify("notes.pdf.mp3"), Category::Audio);
    }
}
