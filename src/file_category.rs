//! File categorization by extension.
//!
//! This module owns the compiled-in extension table and the ordered list of
//! categories. Classification is a total function: every file name maps to
//! exactly one [`Category`], with [`Category::Others`] as the catch-all.
//!
//! # Examples
//!
//! ```
//! use tidyup::file_category::{Category, classify};
//!
//! assert_eq!(classify("photo.JPG"), Category::Images);
//! assert_eq!(classify("notes.txt"), Category::Documents);
//! assert_eq!(classify("archive.zip"), Category::Others);
//! ```

use serde::Serialize;
use std::collections::HashMap;
use std::sync::LazyLock;

/// A destination category. Each variant is also the name of the sub-folder
/// files of that category are moved into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Category {
    /// Image files (JPG, PNG, GIF, etc.)
    Images,
    /// Video files (MP4, MKV, MOV, etc.)
    Videos,
    /// PDF documents
    #[serde(rename = "PDFs")]
    Pdfs,
    /// Office and plain-text documents (DOCX, TXT, XLSX, CSV, etc.)
    Documents,
    /// Source code and structured text (RS, PY, JSON, YAML, etc.)
    Code,
    /// Anything without a recognised extension
    Others,
}

impl Category {
    /// Every category in folder-creation and display order.
    pub const ALL: [Category; 6] = [
        Category::Images,
        Category::Videos,
        Category::Pdfs,
        Category::Documents,
        Category::Code,
        Category::Others,
    ];

    /// Returns the directory name for this category.
    ///
    /// # Examples
    ///
    /// ```
    /// use tidyup::file_category::Category;
    ///
    /// assert_eq!(Category::Images.dir_name(), "Images");
    /// assert_eq!(Category::Pdfs.dir_name(), "PDFs");
    /// assert_eq!(Category::Others.dir_name(), "Others");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Images => "Images",
            Category::Videos => "Videos",
            Category::Pdfs => "PDFs",
            Category::Documents => "Documents",
            Category::Code => "Code",
            Category::Others => "Others",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dir_name())
    }
}

const EXTENSIONS: &[(&str, Category)] = &[
    // Images
    (".jpg", Category::Images),
    (".jpeg", Category::Images),
    (".png", Category::Images),
    (".gif", Category::Images),
    (".bmp", Category::Images),
    (".svg", Category::Images),
    (".webp", Category::Images),
    (".ico", Category::Images),
    (".tiff", Category::Images),
    (".heic", Category::Images),
    // Videos
    (".mp4", Category::Videos),
    (".avi", Category::Videos),
    (".mkv", Category::Videos),
    (".mov", Category::Videos),
    (".wmv", Category::Videos),
    (".flv", Category::Videos),
    (".webm", Category::Videos),
    // PDFs
    (".pdf", Category::Pdfs),
    // Documents
    (".doc", Category::Documents),
    (".docx", Category::Documents),
    (".txt", Category::Documents),
    (".rtf", Category::Documents),
    (".odt", Category::Documents),
    (".xls", Category::Documents),
    (".xlsx", Category::Documents),
    (".ppt", Category::Documents),
    (".pptx", Category::Documents),
    (".csv", Category::Documents),
    // Code
    (".py", Category::Code),
    (".js", Category::Code),
    (".ts", Category::Code),
    (".html", Category::Code),
    (".css", Category::Code),
    (".java", Category::Code),
    (".c", Category::Code),
    (".cpp", Category::Code),
    (".h", Category::Code),
    (".rb", Category::Code),
    (".go", Category::Code),
    (".rs", Category::Code),
    (".php", Category::Code),
    (".swift", Category::Code),
    (".kt", Category::Code),
    (".sh", Category::Code),
    (".json", Category::Code),
    (".xml", Category::Code),
    (".yaml", Category::Code),
    (".yml", Category::Code),
    (".sql", Category::Code),
    (".md", Category::Code),
];

static CATALOG: LazyLock<ExtensionCatalog> = LazyLock::new(ExtensionCatalog::new);

/// Maps lowercase extensions (with the leading `.`) to categories.
///
/// The table is built once per process and never mutated. Use
/// [`ExtensionCatalog::global`] to reach it.
#[derive(Debug)]
pub struct ExtensionCatalog {
    extension_map: HashMap<&'static str, Category>,
}

impl ExtensionCatalog {
    fn new() -> Self {
        Self {
            extension_map: EXTENSIONS.iter().copied().collect(),
        }
    }

    /// Returns the process-wide catalog.
    pub fn global() -> &'static ExtensionCatalog {
        &CATALOG
    }

    /// Looks up an extension such as `.pdf`. Matching is case-insensitive.
    ///
    /// # Examples
    ///
    /// ```
    /// use tidyup::file_category::{Category, ExtensionCatalog};
    ///
    /// let catalog = ExtensionCatalog::global();
    /// assert_eq!(catalog.lookup(".PDF"), Some(Category::Pdfs));
    /// assert_eq!(catalog.lookup(".zip"), None);
    /// ```
    pub fn lookup(&self, extension: &str) -> Option<Category> {
        self.extension_map
            .get(extension.to_lowercase().as_str())
            .copied()
    }

    /// Determines the category for a file name, defaulting to `Others`.
    pub fn categorize(&self, file_name: &str) -> Category {
        match extension_of(file_name) {
            Some(ext) => self.lookup(&ext).unwrap_or(Category::Others),
            None => Category::Others,
        }
    }

    /// Number of known extensions.
    pub fn len(&self) -> usize {
        self.extension_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extension_map.is_empty()
    }
}

/// Returns the lowercase extension of `file_name`, including the leading dot.
///
/// Leading dots are part of the stem, so `.bashrc` has no extension while
/// `archive.tar.gz` has `.gz`. A trailing dot yields `"."`.
pub fn extension_of(file_name: &str) -> Option<String> {
    let trimmed = file_name.trim_start_matches('.');
    let offset = file_name.len() - trimmed.len();
    trimmed
        .rfind('.')
        .map(|idx| file_name[offset + idx..].to_lowercase())
}

/// Maps a file name to its category using the global catalog.
pub fn classify(file_name: &str) -> Category {
    ExtensionCatalog::global().categorize(file_name)
}

/// Returns true for hidden or system entries (names starting with `.`).
///
/// ```
/// use tidyup::file_category::is_excluded;
///
/// assert!(is_excluded(".DS_Store"));
/// assert!(!is_excluded("photo.jpg"));
/// ```
pub fn is_excluded(file_name: &str) -> bool {
    file_name.starts_with('.')
}
