use anyhow::{Context, Result};
use similar::TextDiff;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tempfile::NamedTempFile;

/// Resolve `.` and `..` components without touching the filesystem.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Split `path` into segments relative to `root`, or `None` if it lies outside.
pub fn segments_under(root: &Path, path: &Path) -> Option<Vec<String>> {
    let rel = path.strip_prefix(root).ok()?;
    let mut parts = Vec::new();
    for comp in rel.components() {
        match comp {
            Component::Normal(os) => parts.push(os.to_string_lossy().into_owned()),
            _ => return None,
        }
    }
    Some(parts)
}

/// Build an import specifier that reaches `to` from directory `from_dir`.
/// Always starts with `./` or `../` and uses `/` separators.
pub fn relative_specifier(from_dir: &Path, to: &Path) -> String {
    let from: Vec<Component> = from_dir.components().collect();
    let to: Vec<Component> = to.components().collect();
    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = Vec::new();
    for _ in common..from.len() {
        parts.push("..".into());
    }
    for comp in &to[common..] {
        parts.push(comp.as_os_str().to_string_lossy().into_owned());
    }

    if parts.first().map(String::as_str) == Some("..") {
        parts.join("/")
    } else if parts.is_empty() {
        ".".into()
    } else {
        format!("./{}", parts.join("/"))
    }
}

/// Replace `path` with `contents` through a temp file in the same directory.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create temp file in {}", dir.display()))?;
    tmp.write_all(contents)
        .with_context(|| format!("failed to write {}", path.display()))?;
    tmp.persist(path)
        .with_context(|| format!("failed to replace {}", path.display()))?;
    Ok(())
}

/// Unified diff of a pending rewrite, for dry runs.
pub fn format_diff(path: &Path, old: &str, new: &str) -> String {
    let name = path.display().to_string();
    TextDiff::from_lines(old, new)
        .unified_diff()
        .context_radius(3)
        .header(&name, &name)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn normalize_collapses_dot_segments() {
        let p = normalize_lexically(Path::new("/a/b/./c/../d"));
        assert_eq!(p, PathBuf::from("/a/b/d"));
    }

    #[test]
    fn segments_under_root() {
        let root = Path::new("/repo/src");
        assert_eq!(
            segments_under(root, Path::new("/repo/src/finance/roi")),
            Some(vec!["finance".to_string(), "roi".to_string()])
        );
        assert_eq!(segments_under(root, Path::new("/repo/other")), None);
        assert_eq!(segments_under(root, root), Some(vec![]));
    }

    #[test]
    fn relative_specifier_forms() {
        let base = Path::new("/repo/src");
        assert_eq!(
            relative_specifier(base, Path::new("/repo/src/finance/roi")),
            "./finance/roi"
        );
        assert_eq!(
            relative_specifier(Path::new("/repo/src/health"), Path::new("/repo/src/finance/roi")),
            "../finance/roi"
        );
        assert_eq!(relative_specifier(base, base), ".");
    }

    #[test]
    fn format_diff_shows_changed_lines() {
        let diff = format_diff(
            Path::new("index.ts"),
            "import { a } from './a_calc';\nexport {};\n",
            "import { a } from './a-calculator';\nexport {};\n",
        );
        assert!(diff.starts_with("--- index.ts\n+++ index.ts\n"));
        assert!(diff.contains("-import { a } from './a_calc';"));
        assert!(diff.contains("+import { a } from './a-calculator';"));
    }

    #[test]
    fn write_atomic_replaces_content() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("index.ts");
        std::fs::write(&file, "old").unwrap();
        write_atomic(&file, b"new").unwrap();
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "new");
    }
}
