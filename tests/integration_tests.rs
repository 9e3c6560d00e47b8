/// Integration tests for tidyup
///
/// These tests drive the library entry point against real temporary
/// directories and check the resulting file system layout.
///
/// Test categories:
/// 1. Basic organization workflows
/// 2. Name collisions
/// 3. Exclusions (hidden files, sub-directories, config rules)
/// 4. Dry-run mode
/// 5. Fatal errors
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;
use tidyup::cli::{CliError, RunOptions, run_cli};
use tidyup::file_category::Category;
use tidyup::file_organizer::{OrganizeError, SkipReason};
use tidyup::validate::ValidationError;

// ============================================================================
// Test Utilities
// ============================================================================

/// A temporary directory with helpers for building and inspecting layouts.
struct TestFixture {
    temp_dir: TempDir,
}

impl TestFixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        TestFixture { temp_dir }
    }

    fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    fn create_file(&self, name: &str, content: &[u8]) {
        let file_path = self.path().join(name);
        let mut file = File::create(&file_path).expect("Failed to create file");
        file.write_all(content)
            .expect("Failed to write file content");
    }

    fn create_text_file(&self, name: &str, content: &str) {
        self.create_file(name, content.as_bytes());
    }

    fn create_subdir(&self, name: &str) {
        fs::create_dir_all(self.path().join(name)).expect("Failed to create subdirectory");
    }

    fn run(&self) -> tidyup::OrganizeReport {
        run_cli(&RunOptions::new(self.path())).expect("Organize run failed")
    }

    fn assert_dir_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(path.is_dir(), "Directory should exist: {}", path.display());
    }

    fn assert_file_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(path.is_file(), "File should exist: {}", path.display());
    }

    fn assert_file_not_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(!path.exists(), "File should not exist: {}", path.display());
    }

    fn read(&self, rel_path: &str) -> String {
        fs::read_to_string(self.path().join(rel_path)).expect("Failed to read file")
    }

    /// Counts regular files directly in the root (non-recursive).
    fn count_root_files(&self) -> usize {
        fs::read_dir(self.path())
            .expect("Failed to read directory")
            .filter_map(|entry| entry.ok())
            .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
            .count()
    }

    fn count_dirs(&self) -> usize {
        fs::read_dir(self.path())
            .expect("Failed to read directory")
            .filter_map(|entry| entry.ok())
            .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
            .count()
    }
}

// ============================================================================
// Test Suite 1: Basic Organization
// ============================================================================

#[test]
fn test_organize_empty_directory() {
    let fixture = TestFixture::new();

    let report = fixture.run();

    assert_eq!(report.summary.total(), 0);
    assert!(report.summary.iter().all(|(_, count)| count == 0));
    // Category folders are provisioned even when nothing moves.
    assert_eq!(fixture.count_dirs(), Category::ALL.len());
    for category in Category::ALL {
        fixture.assert_dir_exists(category.dir_name());
    }
}

#[test]
fn test_organize_mixed_directory() {
    let fixture = TestFixture::new();
    fixture.create_text_file("photo.JPG", "jpeg");
    fixture.create_text_file("notes.txt", "notes");
    fixture.create_text_file("archive.zip", "zip");
    fixture.create_text_file(".DS_Store", "finder");

    let report = fixture.run();

    fixture.assert_file_exists("Images/photo.JPG");
    fixture.assert_file_exists("Documents/notes.txt");
    fixture.assert_file_exists("Others/archive.zip");
    fixture.assert_file_exists(".DS_Store");
    fixture.assert_file_not_exists("photo.JPG");

    assert_eq!(report.summary.count(Category::Images), 1);
    assert_eq!(report.summary.count(Category::Documents), 1);
    assert_eq!(report.summary.count(Category::Others), 1);
    assert_eq!(report.summary.count(Category::Videos), 0);
    assert_eq!(report.summary.total(), 3);
    assert!(report.is_complete_success());
}

#[test]
fn test_organize_every_category() {
    let fixture = TestFixture::new();
    for name in [
        "a.png", "b.mov", "c.pdf", "d.docx", "e.py", "f.unknown", "Makefile",
    ] {
        fixture.create_text_file(name, "x");
    }

    let report = fixture.run();

    fixture.assert_file_exists("Images/a.png");
    fixture.assert_file_exists("Videos/b.mov");
    fixture.assert_file_exists("PDFs/c.pdf");
    fixture.assert_file_exists("Documents/d.docx");
    fixture.assert_file_exists("Code/e.py");
    fixture.assert_file_exists("Others/f.unknown");
    fixture.assert_file_exists("Others/Makefile");
    assert_eq!(report.summary.count(Category::Others), 2);
    assert_eq!(fixture.count_root_files(), 0);
}

#[test]
fn test_organize_preserves_file_content() {
    let fixture = TestFixture::new();
    fixture.create_text_file("report.pdf", "%PDF-1.4 original bytes");

    fixture.run();

    assert_eq!(fixture.read("PDFs/report.pdf"), "%PDF-1.4 original bytes");
}

#[test]
fn test_organize_special_characters_in_filename() {
    let fixture = TestFixture::new();
    fixture.create_text_file("photo (1).png", "x");
    fixture.create_text_file("document - final.pdf", "x");
    fixture.create_text_file("résumé.docx", "x");

    fixture.run();

    fixture.assert_file_exists("Images/photo (1).png");
    fixture.assert_file_exists("PDFs/document - final.pdf");
    fixture.assert_file_exists("Documents/résumé.docx");
}

#[test]
fn test_organize_is_idempotent() {
    let fixture = TestFixture::new();
    fixture.create_text_file("a.jpg", "x");
    fixture.create_text_file("b.csv", "x");

    let first = fixture.run();
    assert_eq!(first.summary.total(), 2);

    let second = fixture.run();
    assert_eq!(second.summary.total(), 0);
    fixture.assert_file_exists("Images/a.jpg");
    fixture.assert_file_exists("Documents/b.csv");
    fixture.assert_file_not_exists("Images/a_1.jpg");
}

#[test]
fn test_organize_many_files() {
    let fixture = TestFixture::new();
    for i in 0..50 {
        let ext = ["png", "txt", "mp4", "rs", "bin"][i % 5];
        fixture.create_text_file(&format!("file_{i}.{ext}"), "x");
    }

    let report = fixture.run();

    assert_eq!(report.summary.total(), 50);
    for category in [
        Category::Images,
        Category::Documents,
        Category::Videos,
        Category::Code,
        Category::Others,
    ] {
        assert_eq!(report.summary.count(category), 10);
    }
    assert_eq!(fixture.count_root_files(), 0);
}

// ============================================================================
// Test Suite 2: Name Collisions
// ============================================================================

#[test]
fn test_collision_with_existing_category_file() {
    let fixture = TestFixture::new();
    fixture.create_subdir("Images");
    fixture.create_text_file("Images/photo.jpg", "original");
    fixture.create_text_file("photo.jpg", "incoming");

    let report = fixture.run();

    assert_eq!(report.summary.count(Category::Images), 1);
    assert_eq!(fixture.read("Images/photo.jpg"), "original");
    assert_eq!(fixture.read("Images/photo_1.jpg"), "incoming");
    fixture.assert_file_not_exists("photo.jpg");
}

#[test]
fn test_collisions_across_runs_keep_counting() {
    let fixture = TestFixture::new();

    for expected in ["notes.txt", "notes_1.txt", "notes_2.txt"] {
        fixture.create_text_file("notes.txt", expected);
        fixture.run();
        assert_eq!(fixture.read(&format!("Documents/{expected}")), expected);
    }
}

#[test]
fn test_collision_with_root_file_using_numbered_name() {
    let fixture = TestFixture::new();
    fixture.create_subdir("Images");
    fixture.create_text_file("Images/photo.jpg", "old");
    fixture.create_text_file("photo.jpg", "first");
    fixture.create_text_file("photo_1.jpg", "second");

    let report = fixture.run();

    assert_eq!(report.summary.count(Category::Images), 2);
    assert_eq!(fixture.read("Images/photo.jpg"), "old");
    assert_eq!(fixture.read("Images/photo_1.jpg"), "first");
    assert_eq!(fixture.read("Images/photo_1_1.jpg"), "second");
}

// ============================================================================
// Test Suite 3: Exclusions
// ============================================================================

#[test]
fn test_hidden_files_are_never_moved() {
    let fixture = TestFixture::new();
    fixture.create_text_file(".hidden.txt", "secret");
    fixture.create_text_file(".gitignore", "target");
    fixture.create_text_file("visible.txt", "hello");

    let report = fixture.run();

    fixture.assert_file_exists(".hidden.txt");
    fixture.assert_file_exists(".gitignore");
    fixture.assert_file_exists("Documents/visible.txt");
    assert_eq!(report.summary.total(), 1);
    assert_eq!(report.skipped.len(), 2);
    assert!(
        report
            .skipped
            .iter()
            .all(|entry| entry.reason == SkipReason::Hidden)
    );
}

#[test]
fn test_subdirectories_are_not_traversed() {
    let fixture = TestFixture::new();
    fixture.create_subdir("projects/rust");
    fixture.create_text_file("projects/rust/main.rs", "fn main() {}");
    fixture.create_text_file("projects/readme.txt", "x");

    let report = fixture.run();

    assert_eq!(report.summary.total(), 0);
    fixture.assert_file_exists("projects/rust/main.rs");
    fixture.assert_file_exists("projects/readme.txt");
    fixture.assert_dir_exists("projects");
}

#[test]
fn test_totals_are_conserved() {
    let fixture = TestFixture::new();
    fixture.create_text_file("a.png", "x");
    fixture.create_text_file("b.txt", "x");
    fixture.create_text_file("c", "x");
    fixture.create_text_file(".env", "x");
    fixture.create_text_file("skip.part", "x");
    fixture.create_subdir("folder");

    let config_path = fixture.path().join("rules.toml");
    fs::write(
        &config_path,
        "[exclude]\nextensions = [\"part\", \"toml\"]\n",
    )
    .expect("Failed to write config");

    let mut options = RunOptions::new(fixture.path());
    options.config = Some(config_path);
    let report = run_cli(&options).expect("Organize run failed");

    // a.png, b.txt, c, .env, skip.part, rules.toml
    assert_eq!(report.total_processed(), 6);
    assert_eq!(report.summary.total(), 3);
    assert_eq!(report.skipped.len(), 3);
    assert!(report.failures.is_empty());
}

#[test]
fn test_config_exclusions_keep_files_in_place() {
    let fixture = TestFixture::new();
    fixture.create_text_file("Thumbs.db", "x");
    fixture.create_text_file("movie.mp4.part", "x");
    fixture.create_text_file("draft-01.docx", "x");
    fixture.create_text_file("keep-draft.docx", "x");
    fixture.create_text_file("final.docx", "x");

    let config_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = config_dir.path().join("tidyup.toml");
    fs::write(
        &config_path,
        r#"
[exclude]
names = ["Thumbs.db"]
extensions = ["part"]
globs = ["*draft*"]

[include]
globs = ["keep-*"]
"#,
    )
    .expect("Failed to write config");

    let mut options = RunOptions::new(fixture.path());
    options.config = Some(config_path);
    let report = run_cli(&options).expect("Organize run failed");

    fixture.assert_file_exists("Thumbs.db");
    fixture.assert_file_exists("movie.mp4.part");
    fixture.assert_file_exists("draft-01.docx");
    fixture.assert_file_exists("Documents/keep-draft.docx");
    fixture.assert_file_exists("Documents/final.docx");
    assert_eq!(report.summary.count(Category::Documents), 2);
    assert!(
        report
            .skipped
            .iter()
            .all(|entry| entry.reason == SkipReason::Filtered)
    );
}

// ============================================================================
// Test Suite 4: Dry-Run Mode
// ============================================================================

#[test]
fn test_dry_run_doesnt_move_files() {
    let fixture = TestFixture::new();
    fixture.create_text_file("photo.png", "x");
    fixture.create_text_file("report.pdf", "x");

    let mut options = RunOptions::new(fixture.path());
    options.dry_run = true;
    let report = run_cli(&options).expect("Dry run failed");

    assert_eq!(report.summary.count(Category::Images), 1);
    assert_eq!(report.summary.count(Category::Pdfs), 1);
    fixture.assert_file_exists("photo.png");
    fixture.assert_file_exists("report.pdf");
    assert_eq!(fixture.count_dirs(), 0, "Dry-run should not create directories");
}

#[test]
fn test_dry_run_matches_actual_run() {
    let fixture = TestFixture::new();
    fixture.create_text_file("a.gif", "x");
    fixture.create_text_file("b.sql", "x");
    fixture.create_text_file("c.rar", "x");

    let mut options = RunOptions::new(fixture.path());
    options.dry_run = true;
    let planned = run_cli(&options).expect("Dry run failed");

    let actual = fixture.run();

    assert_eq!(planned.summary, actual.summary);
    let planned_paths: Vec<_> = planned.moved.iter().map(|m| &m.destination).collect();
    let actual_paths: Vec<_> = actual.moved.iter().map(|m| &m.destination).collect();
    assert_eq!(planned_paths, actual_paths);
}

// ============================================================================
// Test Suite 5: Fatal Errors
// ============================================================================

#[test]
fn test_missing_directory_creates_nothing() {
    let fixture = TestFixture::new();
    let missing = fixture.path().join("missing");

    let result = run_cli(&RunOptions::new(&missing));

    assert!(matches!(
        result,
        Err(CliError::Validation(ValidationError::NotFound { .. }))
    ));
    assert!(!missing.exists());
    assert_eq!(fixture.count_dirs(), 0);
}

#[test]
fn test_file_target_is_rejected() {
    let fixture = TestFixture::new();
    fixture.create_text_file("plain.txt", "x");

    let result = run_cli(&RunOptions::new(fixture.path().join("plain.txt")));

    assert!(matches!(
        result,
        Err(CliError::Validation(ValidationError::NotADirectory { .. }))
    ));
    fixture.assert_file_exists("plain.txt");
}

#[test]
fn test_invalid_config_aborts_before_any_change() {
    let fixture = TestFixture::new();
    fixture.create_text_file("photo.png", "x");
    let config_path = fixture.path().join("bad.toml");
    fs::write(&config_path, "[exclude]\nregex = [\"(unclosed\"]\n")
        .expect("Failed to write config");

    let mut options = RunOptions::new(fixture.path());
    options.config = Some(config_path);
    let result = run_cli(&options);

    assert!(matches!(result, Err(CliError::Config(_))));
    fixture.assert_file_exists("photo.png");
    assert_eq!(fixture.count_dirs(), 0);
}

#[test]
fn test_file_blocking_category_folder_is_fatal() {
    let fixture = TestFixture::new();
    fixture.create_text_file("Code", "not a folder");
    fixture.create_text_file("main.rs", "fn main() {}");

    let result = run_cli(&RunOptions::new(fixture.path()));

    assert!(matches!(
        result,
        Err(CliError::Organize(OrganizeError::ProvisionFailure { .. }))
    ));
    fixture.assert_file_exists("main.rs");
    fixture.assert_file_exists("Code");
}
