//! Extension based language classification.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Programming language recognised by file extension.
///
/// Variant order is the table order used to break ranking ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    React,
    ReactTypeScript,
    Java,
    Go,
    Rust,
    Ruby,
    Php,
    CSharp,
    Cpp,
    C,
    Swift,
    Kotlin,
}

impl Language {
    /// Every language, in table order.
    pub const ALL: [Self; 15] = [
        Self::Python,
        Self::JavaScript,
        Self::TypeScript,
        Self::React,
        Self::ReactTypeScript,
        Self::Java,
        Self::Go,
        Self::Rust,
        Self::Ruby,
        Self::Php,
        Self::CSharp,
        Self::Cpp,
        Self::C,
        Self::Swift,
        Self::Kotlin,
    ];

    /// Look up a language from a bare extension (no leading dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        let lang = match ext {
            "py" => Self::Python,
            "js" => Self::JavaScript,
            "ts" => Self::TypeScript,
            "jsx" => Self::React,
            "tsx" => Self::ReactTypeScript,
            "java" => Self::Java,
            "go" => Self::Go,
            "rs" => Self::Rust,
            "rb" => Self::Ruby,
            "php" => Self::Php,
            "cs" => Self::CSharp,
            "cpp" => Self::Cpp,
            "c" => Self::C,
            "swift" => Self::Swift,
            "kt" => Self::Kotlin,
            _ => return None,
        };
        Some(lang)
    }

    /// Classify a path by its extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension().and_then(|e| e.to_str()).and_then(Self::from_extension)
    }

    /// Get display name for the language.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Python => "Python",
            Self::JavaScript => "JavaScript",
            Self::TypeScript => "TypeScript",
            Self::React => "React",
            Self::ReactTypeScript => "React/TypeScript",
            Self::Java => "Java",
            Self::Go => "Go",
            Self::Rust => "Rust",
            Self::Ruby => "Ruby",
            Self::Php => "PHP",
            Self::CSharp => "C#",
            Self::Cpp => "C++",
            Self::C => "C",
            Self::Swift => "Swift",
            Self::Kotlin => "Kotlin",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Extensions counted as source code.
const SOURCE_EXTENSIONS: &[&str] = &["py", "js", "ts", "java", "go", "rs"];

/// Extensions counted as configuration.
const CONFIG_EXTENSIONS: &[&str] = &["json", "yaml", "yml", "toml", "ini", "env"];

pub(crate) fn is_source_extension(ext: &str) -> bool {
    SOURCE_EXTENSIONS.contains(&ext)
}

pub(crate) fn is_config_extension(ext: &str) -> bool {
    CONFIG_EXTENSIONS.contains(&ext)
}
