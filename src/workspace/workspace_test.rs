use std::fs;

use tempfile::TempDir;

use super::*;

fn workspace() -> (TempDir, Workspace) {
    let dir = TempDir::new().unwrap();
    let workspace = Workspace::new(dir.path().join("workspace")).unwrap();
    (dir, workspace)
}

#[test]
fn test_parent_traversal_rejected() {
    let (dir, ws) = workspace();

    let result = ws.write_file("../outside.txt", "nope");
    assert!(!result.success);
    assert_eq!(
        result.message,
        "Path '../outside.txt' escapes workspace sandbox"
    );
    assert!(!dir.path().join("outside.txt").exists());

    let result = ws.read_file("a/../../outside.txt");
    assert!(!result.success);
    assert!(result.message.contains("escapes workspace sandbox"));
}

#[test]
fn test_absolute_paths_treated_as_relative() {
    let (_dir, ws) = workspace();

    let result = ws.write_file("/notes.txt", "hello");
    assert!(result.success);
    assert!(ws.root().join("notes.txt").is_file());

    let result = ws.read_file("/etc/passwd");
    assert!(!result.success);
    assert_eq!(result.message, "File not found: /etc/passwd");
}

#[cfg(unix)]
#[test]
fn test_symlinked_directory_cannot_escape() {
    let (dir, ws) = workspace();
    let outside = dir.path().join("outside");
    fs::create_dir_all(&outside).unwrap();
    std::os::unix::fs::symlink(&outside, ws.root().join("link")).unwrap();

    // Writing a new file through the link must be rejected before any I/O
    let result = ws.write_file("link/escape.txt", "nope");
    assert!(!result.success);
    assert!(result.message.contains("escapes workspace sandbox"));
    assert!(!outside.join("escape.txt").exists());

    // Reading an existing file through the link is rejected the same way
    fs::write(outside.join("data.txt"), "x").unwrap();
    let result = ws.read_file("link/data.txt");
    assert!(!result.success);
    assert!(result.message.contains("escapes workspace sandbox"));
}

#[test]
fn test_interior_parent_components_stay_inside() {
    let (_dir, ws) = workspace();

    let result = ws.write_file("a/b/../c.txt", "x");
    assert!(result.success);
    assert!(ws.root().join("a/c.txt").is_file());
}

#[test]
fn test_python_project_layout() {
    let (_dir, ws) = workspace();

    let result = ws.create_project("demo", ProjectTemplate::Python);
    assert!(result.success);
    assert!(result.message.contains("Created project 'demo'"));
    assert_eq!(ws.list_projects(), vec!["demo"]);

    let names: Vec<String> = ws
        .list_directory("demo")
        .into_iter()
        .map(|info| info.name)
        .collect();
    for expected in [".gitignore", "README.md", "requirements.txt", "src", "tests"] {
        assert!(names.contains(&expected.to_string()), "missing {}", expected);
    }

    let readme = ws.read_file("demo/README.md");
    assert!(readme.success);
    assert!(readme.data.unwrap().starts_with("# demo"));
}

#[test]
fn test_duplicate_project_rejected() {
    let (_dir, ws) = workspace();

    assert!(ws.create_project("demo", ProjectTemplate::Empty).success);
    let result = ws.create_project("demo", ProjectTemplate::Empty);
    assert!(!result.success);
    assert_eq!(result.message, "Project 'demo' already exists");
}

#[test]
fn test_delete_project() {
    let (_dir, ws) = workspace();

    let result = ws.delete_project("ghost");
    assert!(!result.success);
    assert_eq!(result.message, "Project 'ghost' not found");

    ws.write_file("plain.txt", "x");
    let result = ws.delete_project("plain.txt");
    assert!(!result.success);
    assert_eq!(result.message, "'plain.txt' is not a project directory");

    ws.create_project("demo", ProjectTemplate::Basic);
    assert!(ws.delete_project("demo").success);
    assert!(ws.list_projects().is_empty());
}

#[test]
fn test_write_creates_parents() {
    let (_dir, ws) = workspace();

    let result = ws.write_file("a/b/c.txt", "hi");
    assert!(result.success);
    assert_eq!(result.message, "Wrote 2 bytes to a/b/c.txt");

    let read = ws.read_file("a/b/c.txt");
    assert!(read.success);
    assert_eq!(read.message, "Read 2 bytes from a/b/c.txt");
    assert_eq!(read.data.as_deref(), Some("hi"));
}

#[test]
fn test_append_creates_and_extends() {
    let (_dir, ws) = workspace();

    assert!(ws.append_file("log.txt", "one\n").success);
    let result = ws.append_file("log.txt", "two\n");
    assert!(result.success);
    assert_eq!(result.message, "Appended 4 bytes to log.txt");
    assert_eq!(ws.read_file("log.txt").data.as_deref(), Some("one\ntwo\n"));
}

#[test]
fn test_delete_file_refuses_directories() {
    let (_dir, ws) = workspace();

    assert!(ws.create_directory("d").success);
    let result = ws.delete_file("d");
    assert!(!result.success);
    assert_eq!(result.message, "Use delete_project for directories: d");

    let result = ws.delete_file("missing.txt");
    assert!(!result.success);
    assert_eq!(result.message, "File not found: missing.txt");

    ws.write_file("f.txt", "x");
    let result = ws.delete_file("f.txt");
    assert!(result.success);
    assert_eq!(result.message, "Deleted f.txt");
    assert!(!ws.root().join("f.txt").exists());
}

#[test]
fn test_binary_file_read_rejected() {
    let (_dir, ws) = workspace();

    fs::write(ws.root().join("blob.bin"), [0xff, 0xfe, 0x00, 0x81]).unwrap();
    let result = ws.read_file("blob.bin");
    assert!(!result.success);
    assert_eq!(result.message, "Cannot read binary file: blob.bin");
}

#[test]
fn test_list_directory_sorted_with_sizes() {
    let (_dir, ws) = workspace();

    ws.write_file("proj/a.txt", "abc");
    ws.create_directory("proj/sub");
    let entries = ws.list_directory("proj");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].name, "a.txt");
    assert_eq!(entries[0].size, 3);
    assert!(!entries[0].is_dir);
    assert!(entries[1].is_dir);
    assert_eq!(entries[1].path, "proj/sub");
}

#[test]
fn test_list_directory_missing_returns_empty() {
    let (_dir, ws) = workspace();

    assert!(ws.list_directory("missing").is_empty());
    ws.write_file("file.txt", "x");
    assert!(ws.list_directory("file.txt").is_empty());
}

#[test]
fn test_tree_rendering() {
    let (_dir, ws) = workspace();

    ws.write_file("app/src/main.py", "x");
    ws.write_file("app/README.md", "x");

    let tree = ws.tree("app", 3);
    let lines: Vec<&str> = tree.lines().collect();
    assert_eq!(lines[0], "app/");
    assert_eq!(lines[1], "├── src/");
    assert_eq!(lines[2], "│   └── main.py");
    assert_eq!(lines[3], "└── README.md");
}

#[test]
fn test_tree_respects_depth_limit() {
    let (_dir, ws) = workspace();

    ws.write_file("app/src/main.py", "x");
    let shallow = ws.tree("app", 1);
    assert!(shallow.contains("src/"));
    assert!(!shallow.contains("main.py"));
}

#[test]
fn test_tree_missing_directory() {
    let (_dir, ws) = workspace();

    assert_eq!(ws.tree("nope", 3), "Directory not found: nope");
    assert_eq!(
        ws.tree("../up", 3),
        "Error: Path '../up' escapes workspace sandbox"
    );
}

#[test]
fn test_search_skips_hidden_directories() {
    let (_dir, ws) = workspace();

    ws.write_file("a.py", "x");
    ws.write_file("pkg/d.py", "x");
    ws.write_file(".hidden/c.py", "x");
    ws.write_file("pkg/readme.md", "x");

    assert_eq!(ws.search_files("*.py", "."), vec!["a.py", "pkg/d.py"]);
}

#[test]
fn test_grep_case_insensitive_with_pattern_filter() {
    let (_dir, ws) = workspace();

    ws.write_file("src/app.py", "def main():\n    print('Hello World')\n");
    ws.write_file("notes.txt", "hello world\n");
    fs::write(ws.root().join("src/bad.py"), [0xff, 0xfe]).unwrap();

    let matches = ws.grep("HELLO", ".", "*.py");
    assert_eq!(matches, vec!["src/app.py:2:print('Hello World')"]);
}

#[test]
fn test_file_info_display() {
    let info = FileInfo {
        path: "src".to_string(),
        name: "src".to_string(),
        is_dir: true,
        size: 0,
    };
    assert_eq!(info.to_string(), "[DIR]  src");

    let info = FileInfo {
        path: "src/main.py".to_string(),
        name: "main.py".to_string(),
        is_dir: false,
        size: 42,
    };
    assert_eq!(info.to_string(), "[FILE] main.py (42 bytes)");
}
