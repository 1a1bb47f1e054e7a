//! Sandboxed workspace file store
//!
//! All agent file operations go through [`Workspace`], which confines them to
//! a single root directory. Paths from agents or users are treated as relative
//! to that root no matter how they are spelled: leading slashes are stripped,
//! `..` components are resolved lexically and rejected once they would climb
//! above the root, and symlinked paths are canonicalized and re-checked.
//!
//! Operations return [`OperationResult`] rather than `Result` so that callers
//! can relay the outcome message verbatim to an agent or a shell user.

pub mod templates;

use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;

pub use templates::ProjectTemplate;

/// Depth limit applied by callers that do not choose their own
pub const DEFAULT_TREE_DEPTH: usize = 3;

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("Path '{0}' escapes workspace sandbox")]
    Escape(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Outcome of a single workspace operation
///
/// `data` carries the operation payload when there is one: file content for
/// reads, the resolved path for writes and project creation.
#[derive(Debug, Clone)]
pub struct OperationResult {
    pub success: bool,
    pub message: String,
    pub data: Option<String>,
}

impl OperationResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }

    pub fn ok_with(message: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data.into()),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

/// Directory entry as reported by [`Workspace::list_directory`]
#[derive(Debug, Clone)]
pub struct FileInfo {
    /// Path relative to the workspace root
    pub path: String,
    pub name: String,
    pub is_dir: bool,
    /// Size in bytes, zero for directories
    pub size: u64,
}

impl fmt::Display for FileInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dir {
            write!(f, "[DIR]  {}", self.name)
        } else {
            write!(f, "[FILE] {} ({} bytes)", self.name, self.size)
        }
    }
}

/// Sandboxed file store rooted at a single directory
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Opens the workspace, creating the root directory if needed
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, WorkspaceError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        let root = root.canonicalize()?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a caller-supplied path to an absolute path inside the root
    ///
    /// Leading separators are dropped so absolute paths degrade to relative
    /// ones. The component walk rejects any `..` that would climb above the
    /// root before touching the filesystem. The deepest existing ancestor is
    /// then canonicalized and re-checked, so a symlink inside the workspace
    /// cannot smuggle a new or existing path outside; the non-existent tail
    /// is re-joined afterwards.
    fn resolve(&self, path: &str) -> Result<PathBuf, WorkspaceError> {
        let trimmed = path.trim_start_matches(['/', '\\']);
        let mut resolved = self.root.clone();
        let mut depth = 0usize;
        for component in Path::new(trimmed).components() {
            match component {
                Component::Normal(part) => {
                    resolved.push(part);
                    depth += 1;
                }
                Component::CurDir => {}
                Component::ParentDir => {
                    if depth == 0 {
                        return Err(WorkspaceError::Escape(path.to_string()));
                    }
                    resolved.pop();
                    depth -= 1;
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(WorkspaceError::Escape(path.to_string()));
                }
            }
        }

        // Walk up to the deepest ancestor that exists; the root always does.
        // symlink_metadata keeps dangling symlinks in the "existing" set so
        // canonicalize surfaces them as errors instead of writing through.
        let mut existing = resolved.as_path();
        let mut tail: Vec<std::ffi::OsString> = Vec::new();
        while existing != self.root && existing.symlink_metadata().is_err() {
            match (existing.file_name(), existing.parent()) {
                (Some(name), Some(parent)) => {
                    tail.push(name.to_os_string());
                    existing = parent;
                }
                _ => return Err(WorkspaceError::Escape(path.to_string())),
            }
        }
        let mut canonical = existing.canonicalize()?;
        if !canonical.starts_with(&self.root) {
            return Err(WorkspaceError::Escape(path.to_string()));
        }
        for part in tail.iter().rev() {
            canonical.push(part);
        }
        Ok(canonical)
    }

    fn relative(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string()
    }

    // Project operations

    /// Creates a project directory and writes the template's files into it
    pub fn create_project(&self, name: &str, template: ProjectTemplate) -> OperationResult {
        let project_path = match self.resolve(name) {
            Ok(path) => path,
            Err(e) => return OperationResult::fail(e.to_string()),
        };
        if project_path.exists() {
            return OperationResult::fail(format!("Project '{}' already exists", name));
        }
        if let Err(e) = fs::create_dir_all(&project_path) {
            return OperationResult::fail(e.to_string());
        }
        for (relative_path, content) in template.files(name) {
            let file_path = project_path.join(relative_path);
            if let Some(parent) = file_path.parent() {
                if let Err(e) = fs::create_dir_all(parent) {
                    return OperationResult::fail(e.to_string());
                }
            }
            if let Err(e) = fs::write(&file_path, content) {
                return OperationResult::fail(e.to_string());
            }
        }
        OperationResult::ok_with(
            format!("Created project '{}' at {}", name, project_path.display()),
            project_path.display().to_string(),
        )
    }

    /// Top-level project directories, sorted, hidden entries excluded
    pub fn list_projects(&self) -> Vec<String> {
        let mut projects = Vec::new();
        if let Ok(entries) = fs::read_dir(&self.root) {
            for entry in entries.flatten() {
                let name = entry.file_name().to_string_lossy().to_string();
                if entry.path().is_dir() && !name.starts_with('.') {
                    projects.push(name);
                }
            }
        }
        projects.sort();
        projects
    }

    /// Removes a project directory and everything under it
    pub fn delete_project(&self, name: &str) -> OperationResult {
        let project_path = match self.resolve(name) {
            Ok(path) => path,
            Err(e) => return OperationResult::fail(e.to_string()),
        };
        if !project_path.exists() {
            return OperationResult::fail(format!("Project '{}' not found", name));
        }
        if !project_path.is_dir() {
            return OperationResult::fail(format!("'{}' is not a project directory", name));
        }
        match fs::remove_dir_all(&project_path) {
            Ok(()) => OperationResult::ok(format!("Deleted project '{}'", name)),
            Err(e) => OperationResult::fail(e.to_string()),
        }
    }

    // File operations

    /// Reads a UTF-8 file, returning its content in `data`
    pub fn read_file(&self, path: &str) -> OperationResult {
        let full_path = match self.resolve(path) {
            Ok(p) => p,
            Err(e) => return OperationResult::fail(e.to_string()),
        };
        if !full_path.exists() {
            return OperationResult::fail(format!("File not found: {}", path));
        }
        if !full_path.is_file() {
            return OperationResult::fail(format!("Not a file: {}", path));
        }
        let bytes = match fs::read(&full_path) {
            Ok(bytes) => bytes,
            Err(e) => return OperationResult::fail(e.to_string()),
        };
        match String::from_utf8(bytes) {
            Ok(content) => OperationResult::ok_with(
                format!("Read {} bytes from {}", content.len(), path),
                content,
            ),
            Err(_) => OperationResult::fail(format!("Cannot read binary file: {}", path)),
        }
    }

    /// Writes a file, creating parent directories as needed
    pub fn write_file(&self, path: &str, content: &str) -> OperationResult {
        let full_path = match self.resolve(path) {
            Ok(p) => p,
            Err(e) => return OperationResult::fail(e.to_string()),
        };
        if let Some(parent) = full_path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                return OperationResult::fail(e.to_string());
            }
        }
        match fs::write(&full_path, content) {
            Ok(()) => OperationResult::ok_with(
                format!("Wrote {} bytes to {}", content.len(), path),
                full_path.display().to_string(),
            ),
            Err(e) => OperationResult::fail(e.to_string()),
        }
    }

    /// Appends to a file, creating it if absent (parents must exist)
    pub fn append_file(&self, path: &str, content: &str) -> OperationResult {
        use std::io::Write;

        let full_path = match self.resolve(path) {
            Ok(p) => p,
            Err(e) => return OperationResult::fail(e.to_string()),
        };
        let result = fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(&full_path)
            .and_then(|mut file| file.write_all(content.as_bytes()));
        match result {
            Ok(()) => OperationResult::ok(format!("Appended {} bytes to {}", content.len(), path)),
            Err(e) => OperationResult::fail(e.to_string()),
        }
    }

    /// Deletes a single file; directories must go through [`Self::delete_project`]
    pub fn delete_file(&self, path: &str) -> OperationResult {
        let full_path = match self.resolve(path) {
            Ok(p) => p,
            Err(e) => return OperationResult::fail(e.to_string()),
        };
        if !full_path.exists() {
            return OperationResult::fail(format!("File not found: {}", path));
        }
        if full_path.is_dir() {
            return OperationResult::fail(format!("Use delete_project for directories: {}", path));
        }
        match fs::remove_file(&full_path) {
            Ok(()) => OperationResult::ok(format!("Deleted {}", path)),
            Err(e) => OperationResult::fail(e.to_string()),
        }
    }

    pub fn create_directory(&self, path: &str) -> OperationResult {
        let full_path = match self.resolve(path) {
            Ok(p) => p,
            Err(e) => return OperationResult::fail(e.to_string()),
        };
        match fs::create_dir_all(&full_path) {
            Ok(()) => OperationResult::ok(format!("Created directory: {}", path)),
            Err(e) => OperationResult::fail(e.to_string()),
        }
    }

    /// Entries of a directory sorted by name; empty on any failure
    pub fn list_directory(&self, dir_path: &str) -> Vec<FileInfo> {
        let full_path = match self.resolve(dir_path) {
            Ok(p) => p,
            Err(_) => return Vec::new(),
        };
        if !full_path.is_dir() {
            return Vec::new();
        }
        let entries = match fs::read_dir(&full_path) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };
        let mut items = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().to_string();
            let is_dir = path.is_dir();
            let size = if path.is_file() {
                entry.metadata().map(|m| m.len()).unwrap_or(0)
            } else {
                0
            };
            items.push(FileInfo {
                path: self.relative(&path),
                name,
                is_dir,
                size,
            });
        }
        items.sort_by(|a, b| a.name.cmp(&b.name));
        items
    }

    // Inspection

    /// Renders a directory tree down to `max_depth` levels
    ///
    /// Directories sort before files and carry a trailing slash. Branches use
    /// the usual `├──`/`└──` connectors with `│` continuation lines.
    pub fn tree(&self, dir_path: &str, max_depth: usize) -> String {
        let full_path = match self.resolve(dir_path) {
            Ok(path) => path,
            Err(e) => return format!("Error: {}", e),
        };
        if !full_path.is_dir() {
            return format!("Directory not found: {}", dir_path);
        }
        let name = full_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| full_path.display().to_string());
        let mut lines = vec![format!("{}/", name)];
        self.build_tree(&full_path, "", max_depth, 0, &mut lines);
        lines.join("\n")
    }

    fn build_tree(
        &self,
        path: &Path,
        prefix: &str,
        max_depth: usize,
        depth: usize,
        lines: &mut Vec<String>,
    ) {
        if depth >= max_depth {
            return;
        }
        let entries = match fs::read_dir(path) {
            Ok(entries) => entries,
            Err(_) => return,
        };
        let mut items: Vec<PathBuf> = entries.flatten().map(|entry| entry.path()).collect();
        items.sort_by_key(|item| (!item.is_dir(), item.file_name().map(|n| n.to_os_string())));
        let count = items.len();
        for (index, item) in items.iter().enumerate() {
            let is_last = index == count - 1;
            let connector = if is_last { "└── " } else { "├── " };
            let name = item
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            if item.is_dir() {
                lines.push(format!("{}{}{}/", prefix, connector, name));
                let child_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
                self.build_tree(item, &child_prefix, max_depth, depth + 1, lines);
            } else {
                lines.push(format!("{}{}{}", prefix, connector, name));
            }
        }
    }

    /// Files whose name matches a glob pattern, as sorted relative paths
    ///
    /// Hidden directories are not descended into.
    pub fn search_files(&self, pattern: &str, dir_path: &str) -> Vec<String> {
        let full_path = match self.resolve(dir_path) {
            Ok(p) => p,
            Err(_) => return Vec::new(),
        };
        let matcher = match glob::Pattern::new(pattern) {
            Ok(matcher) => matcher,
            Err(_) => return Vec::new(),
        };
        let mut matches = Vec::new();
        self.walk(&full_path, &mut |file| {
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            if matcher.matches(&name) {
                matches.push(self.relative(file));
            }
        });
        matches.sort();
        matches
    }

    /// Case-insensitive substring search across file contents
    ///
    /// Results are `path:line:text` with the line trimmed. Files that are not
    /// valid UTF-8 or cannot be read are skipped silently.
    pub fn grep(&self, search_term: &str, dir_path: &str, file_pattern: &str) -> Vec<String> {
        let full_path = match self.resolve(dir_path) {
            Ok(p) => p,
            Err(_) => return Vec::new(),
        };
        let matcher = match glob::Pattern::new(file_pattern) {
            Ok(matcher) => matcher,
            Err(_) => return Vec::new(),
        };
        let needle = search_term.to_lowercase();
        let mut matches = Vec::new();
        self.walk(&full_path, &mut |file| {
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            if !matcher.matches(&name) {
                return;
            }
            let content = match fs::read_to_string(file) {
                Ok(content) => content,
                Err(_) => return,
            };
            let relative = self.relative(file);
            for (line_number, line) in content.lines().enumerate() {
                if line.to_lowercase().contains(&needle) {
                    matches.push(format!("{}:{}:{}", relative, line_number + 1, line.trim()));
                }
            }
        });
        matches
    }

    /// Depth-first file visitor that prunes hidden directories
    fn walk(&self, dir: &Path, visit: &mut dyn FnMut(&Path)) {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(_) => return,
        };
        for entry in entries.flatten() {
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().to_string();
            if path.is_dir() {
                if !name.starts_with('.') {
                    self.walk(&path, visit);
                }
            } else if path.is_file() {
                visit(&path);
            }
        }
    }
}

#[cfg(test)]
#[path = "workspace_test.rs"]
mod tests;
