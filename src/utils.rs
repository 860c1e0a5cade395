use std::path::{Component, Path, PathBuf};

use crate::RefError;

/// Lexically normalize a path: drop `.` and let `..` pop the previous component.
/// Does not touch the filesystem, so missing files keep a readable path.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(out.components().next_back(), Some(Component::Normal(_)))
                    && out.pop();
                if !popped && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Expand "~/" and resolve relative paths against base_dir, then normalize.
pub fn resolve_file_path(raw_path: &str, base_dir: &Path) -> Result<PathBuf, RefError> {
    let mut p = if let Some(rest) = raw_path.strip_prefix("~/") {
        let home = dirs::home_dir().ok_or_else(|| RefError::IoError {
            message: "Could not determine home directory for ~ expansion".into(),
            path: raw_path.to_string(),
            hint: Some("Set HOME or use an absolute path in the reference".into()),
            code: Some(303),
        })?;
        home.join(rest)
    } else {
        PathBuf::from(raw_path)
    };

    if p.is_relative() {
        p = base_dir.join(p);
    }
    Ok(normalize_path(&p))
}

/// Directory a document's relative references are resolved from.
pub fn base_dir_of(doc_path: &Path) -> &Path {
    doc_path.parent().unwrap_or_else(|| Path::new("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_drops_dots() {
        assert_eq!(normalize_path(Path::new("/a/./b/../c.json")), PathBuf::from("/a/c.json"));
        assert_eq!(normalize_path(Path::new("/../x.json")), PathBuf::from("/x.json"));
        assert_eq!(normalize_path(Path::new("../x/./y")), PathBuf::from("../x/y"));
        assert_eq!(normalize_path(Path::new("./")), PathBuf::from("."));
    }

    #[test]
    fn test_resolve_relative_against_base() {
        let p = resolve_file_path("../shared/types.json", Path::new("/proj/models")).unwrap();
        assert_eq!(p, PathBuf::from("/proj/shared/types.json"));

        let abs = resolve_file_path("/etc/other.json", Path::new("/proj")).unwrap();
        assert_eq!(abs, PathBuf::from("/etc/other.json"));
    }

    #[test]
    fn test_resolve_home_relative() {
        let home = dirs::home_dir().expect("home directory");
        let p = resolve_file_path("~/x.json", Path::new("/proj")).unwrap();
        assert_eq!(p, normalize_path(&home.join("x.json")));
    }

    #[test]
    fn test_base_dir_of_document() {
        assert_eq!(base_dir_of(Path::new("/proj/main.json")), Path::new("/proj"));
    }
}
