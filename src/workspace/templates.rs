//! Project scaffolding templates
//!
//! Static file sets written by [`Workspace::create_project`]. Pure data.
//!
//! [`Workspace::create_project`]: crate::workspace::Workspace::create_project

use std::str::FromStr;

/// Available project templates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectTemplate {
    Basic,
    Python,
    Node,
    Rust,
    Empty,
}

impl ProjectTemplate {
    pub const ALL: [ProjectTemplate; 5] = [
        ProjectTemplate::Basic,
        ProjectTemplate::Python,
        ProjectTemplate::Node,
        ProjectTemplate::Rust,
        ProjectTemplate::Empty,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectTemplate::Basic => "basic",
            ProjectTemplate::Python => "python",
            ProjectTemplate::Node => "node",
            ProjectTemplate::Rust => "rust",
            ProjectTemplate::Empty => "empty",
        }
    }

    /// Files this template writes, as (relative path, content) pairs
    pub fn files(&self, name: &str) -> Vec<(&'static str, String)> {
        let readme = (
            "README.md",
            format!("# {}\n\nProject created by Ergane.\n", name),
        );

        match self {
            ProjectTemplate::Basic => vec![
                readme,
                (
                    ".gitignore",
                    "# Created by Ergane\n.env\n*.log\n".to_string(),
                ),
            ],
            ProjectTemplate::Python => vec![
                readme,
                (".gitignore", PYTHON_GITIGNORE.to_string()),
                (
                    "src/__init__.py",
                    format!("\"\"\"{} package.\"\"\"\n", name),
                ),
                ("src/main.py", PYTHON_MAIN.to_string()),
                ("tests/__init__.py", String::new()),
                ("tests/test_main.py", PYTHON_TEST.to_string()),
                ("requirements.txt", "# Dependencies\n".to_string()),
            ],
            ProjectTemplate::Node => vec![
                readme,
                (".gitignore", NODE_GITIGNORE.to_string()),
                ("package.json", node_package_json(name)),
                (
                    "src/index.js",
                    "console.log(\"Hello from Ergane!\");\n".to_string(),
                ),
            ],
            ProjectTemplate::Rust => vec![
                readme,
                (
                    ".gitignore",
                    "# Rust\n/target\n\n# Environment\n.env\n".to_string(),
                ),
                ("Cargo.toml", rust_manifest(name)),
                (
                    "src/main.rs",
                    "fn main() {\n    println!(\"Hello from Ergane!\");\n}\n".to_string(),
                ),
            ],
            ProjectTemplate::Empty => vec![],
        }
    }
}

impl std::fmt::Display for ProjectTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProjectTemplate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "basic" => Ok(ProjectTemplate::Basic),
            "python" => Ok(ProjectTemplate::Python),
            "node" => Ok(ProjectTemplate::Node),
            "rust" => Ok(ProjectTemplate::Rust),
            "empty" => Ok(ProjectTemplate::Empty),
            other => Err(format!(
                "Unknown template '{}' (expected basic, python, node, rust, or empty)",
                other
            )),
        }
    }
}

const PYTHON_MAIN: &str = "\"\"\"Main entry point.\"\"\"


def main():
    print(\"Hello from Ergane!\")


if __name__ == \"__main__\":
    main()
";

const PYTHON_TEST: &str = "\"\"\"Tests for main module.\"\"\"


def test_placeholder():
    assert True
";

const PYTHON_GITIGNORE: &str = "# Python
*.pyc
__pycache__/
*.egg-info/
dist/
build/

# Virtual env
venv/
.venv/

# IDE
.idea/
.vscode/
*.swp

# Environment
.env
.env.local
";

const NODE_GITIGNORE: &str = "# Node
node_modules/
*.log

# Build
dist/
build/

# Environment
.env
.env.local
";

fn node_package_json(name: &str) -> String {
    format!(
        "{{\n  \"name\": \"{}\",\n  \"version\": \"1.0.0\",\n  \"description\": \"Created by Ergane\",\n  \"main\": \"src/index.js\",\n  \"scripts\": {{\n    \"start\": \"node src/index.js\",\n    \"test\": \"echo \\\"No tests yet\\\"\"\n  }}\n}}\n",
        name
    )
}

fn rust_manifest(name: &str) -> String {
    format!(
        "[package]\nname = \"{}\"\nversion = \"0.1.0\"\nedition = \"2021\"\n\n[dependencies]\n",
        name
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_names_roundtrip() {
        for template in ProjectTemplate::ALL {
            assert_eq!(
                template.as_str().parse::<ProjectTemplate>().unwrap(),
                template
            );
        }
        assert!("haskell".parse::<ProjectTemplate>().is_err());
    }

    #[test]
    fn test_python_template_file_set() {
        let files = ProjectTemplate::Python.files("demo");
        let paths: Vec<&str> = files.iter().map(|(path, _)| *path).collect();
        assert!(paths.contains(&"README.md"));
        assert!(paths.contains(&"src/main.py"));
        assert!(paths.contains(&"tests/test_main.py"));
        assert!(paths.contains(&"requirements.txt"));
    }

    #[test]
    fn test_empty_template_writes_nothing() {
        assert!(ProjectTemplate::Empty.files("demo").is_empty());
    }

    #[test]
    fn test_readme_carries_project_name() {
        let files = ProjectTemplate::Basic.files("my-app");
        let readme = &files
            .iter()
            .find(|(path, _)| *path == "README.md")
            .unwrap()
            .1;
        assert!(readme.starts_with("# my-app\n"));
    }

    #[test]
    fn test_node_package_json_is_valid_json() {
        let json = node_package_json("my-app");
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["name"], "my-app");
        assert_eq!(value["version"], "1.0.0");
    }
}
