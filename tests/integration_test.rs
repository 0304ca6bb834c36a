// Integration tests for Infera

use infera::{extract, Config, Error, Extractor, TreeNode};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

fn fixtures_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Zip every file and directory under `src` into `dest`
fn zip_dir(src: &Path, dest: &Path) {
    let mut zip = ZipWriter::new(File::create(dest).expect("Failed to create zip"));
    let options = SimpleFileOptions::default();

    for entry in WalkDir::new(src).sort_by_file_name().min_depth(1) {
        let entry = entry.expect("Failed to walk fixture");
        let relative = entry.path().strip_prefix(src).unwrap();
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");

        if entry.file_type().is_dir() {
            zip.add_directory(format!("{}/", name), options).unwrap();
        } else {
            zip.start_file(name, options).unwrap();
            zip.write_all(&fs::read(entry.path()).unwrap()).unwrap();
        }
    }

    zip.finish().expect("Failed to finish zip");
}

fn write_zip(dest: &Path, files: &[(&str, &[u8])]) {
    let mut zip = ZipWriter::new(File::create(dest).unwrap());
    let options = SimpleFileOptions::default();
    for &(name, contents) in files {
        zip.start_file(name, options).unwrap();
        zip.write_all(contents).unwrap();
    }
    zip.finish().unwrap();
}

// Extractor whose staged directories land in `scratch`
fn create_extractor(scratch: &Path) -> Extractor {
    let mut config = Config::default();
    config.staging.temp_root = Some(scratch.to_path_buf());
    Extractor::new(config).expect("Failed to create extractor")
}

fn shop_archive(work: &TempDir) -> PathBuf {
    let archive = work.path().join("shop.zip");
    zip_dir(&fixtures_path("shop"), &archive);
    archive
}

fn is_empty_dir(path: &Path) -> bool {
    fs::read_dir(path).unwrap().next().is_none()
}

// ============================================================================
// Extraction Tests
// ============================================================================

#[test]
fn test_extract_fixture_diagram() {
    let work = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let archive = shop_archive(&work);

    let result = create_extractor(scratch.path())
        .extract(&archive)
        .expect("Extraction failed");

    let expected = [
        "classDiagram",
        "    class BaseModel { id\\n__init__\\nsave }",
        "    class Order { lines\\nstatus\\nstatus\\n__init__\\nship }",
        "    class Refund",
        "    BaseModel <|-- Order",
        "    class root_module { main }",
        "    class shop_models_module { order_total }",
        "    class shop_utils_module { format_price\\nparse_price }",
    ]
    .join("\n");
    assert_eq!(result.diagram, expected);

    assert_eq!(result.stats.files_scanned, 5);
    assert_eq!(result.stats.classes, 3);
    assert_eq!(result.stats.inheritance_edges, 1);
    assert_eq!(result.stats.module_functions, 4);
}

#[test]
fn test_extract_fixture_structure() {
    let work = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let archive = shop_archive(&work);

    let result = create_extractor(scratch.path()).extract(&archive).unwrap();

    let value = serde_json::to_value(&result.structure).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "README.md": null,
            "manage.py": null,
            "shop": {
                "__init__.py": null,
                "models": { "base.py": null, "order.py": null },
                "utils": { "money.py": null },
            }
        })
    );

    let names: Vec<&str> = result.structure.names().collect();
    assert_eq!(names, vec!["README.md", "manage.py", "shop"]);
    assert!(matches!(result.structure.get("shop"), Some(TreeNode::Directory(_))));
}

#[test]
fn test_extract_is_idempotent() {
    let work = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let archive = shop_archive(&work);
    let extractor = create_extractor(scratch.path());

    let first = extractor.extract(&archive).unwrap();
    let second = extractor.extract(&archive).unwrap();
    assert_eq!(first.diagram, second.diagram);
    assert_eq!(first.structure, second.structure);
}

#[test]
fn test_free_function_matches_contract() {
    let work = TempDir::new().unwrap();
    let archive = work.path().join("single.zip");
    write_zip(&archive, &[("pkg/sub/tools.py", &b"def build():\n    pass\n"[..])]);

    let (structure, diagram) = extract(&archive).expect("Extraction failed");
    assert!(structure.subdir("pkg").unwrap().subdir("sub").is_some());
    assert_eq!(diagram, "classDiagram\n    class pkg_sub_module { build }");
}

#[test]
fn test_invalid_encoding_is_skipped() {
    let work = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let archive = work.path().join("mixed.zip");
    write_zip(
        &archive,
        &[
            ("latin.py", &b"# caf\xe9\nclass Caf\xe9Menu:\n    def list(self):\n        pass\n"[..]),
            ("ok.py", &b"class Clean:\n    def run(self):\n        self.done = True\n"[..]),
        ],
    );

    let result = create_extractor(scratch.path()).extract(&archive).unwrap();
    assert!(result.diagram.contains("class CafMenu { list }"));
    assert!(result.diagram.contains("class Clean { done\\nrun }"));
    assert_eq!(result.stats.files_scanned, 2);
}

#[test]
fn test_module_functions_can_be_disabled() {
    let work = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let archive = shop_archive(&work);

    let mut config = Config::default();
    config.staging.temp_root = Some(scratch.path().to_path_buf());
    config.diagram.module_functions = false;
    let result = Extractor::new(config).unwrap().extract(&archive).unwrap();

    assert!(!result.diagram.contains("_module"));
    assert!(result.diagram.ends_with("BaseModel <|-- Order"));
}

// ============================================================================
// Cleanup Tests
// ============================================================================

#[test]
fn test_staged_dir_removed_after_success() {
    let work = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let archive = shop_archive(&work);

    create_extractor(scratch.path()).extract(&archive).unwrap();
    assert!(is_empty_dir(scratch.path()), "staged directory left behind");
}

#[test]
fn test_staged_dir_removed_after_failure() {
    let work = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let archive = work.path().join("corrupt.zip");
    fs::write(&archive, b"PK\x03\x04 definitely not a zip").unwrap();

    let result = create_extractor(scratch.path()).extract(&archive);
    assert!(matches!(result, Err(Error::Extraction { .. })));
    assert!(is_empty_dir(scratch.path()), "staged directory left behind");
}

#[test]
fn test_staged_dir_removed_after_partial_extraction() {
    let work = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let archive = work.path().join("clash.zip");
    // `a` is written as a file, so `a/b.py` cannot be created under it
    write_zip(
        &archive,
        &[("a", &b"plain file"[..]), ("a/b.py", &b"class B:\n    pass\n"[..])],
    );

    let result = create_extractor(scratch.path()).extract(&archive);
    assert!(matches!(result, Err(Error::Extraction { .. })));
    assert!(is_empty_dir(scratch.path()), "staged directory left behind");
}

// ============================================================================
// Error Handling Tests
// ============================================================================

#[test]
fn test_extract_nonexistent_path() {
    let scratch = TempDir::new().unwrap();
    let result = create_extractor(scratch.path()).extract(Path::new("/nonexistent/code.zip"));

    match result {
        Err(Error::NotFound(path)) => assert_eq!(path, PathBuf::from("/nonexistent/code.zip")),
        other => panic!("Expected NotFound, got {:?}", other.map(|r| r.diagram)),
    }
    assert!(is_empty_dir(scratch.path()), "no filesystem writes expected");
}

#[test]
fn test_invalid_config_rejected() {
    let mut config = Config::default();
    config.diagram.module_suffix.clear();
    assert!(Extractor::new(config).is_err());
}
