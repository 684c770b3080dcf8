use std::path::{Path, PathBuf};

use crate::ConfError;

/// Expand a leading `~/` to the user's home directory.
pub(super) fn resolve_path(raw_path: &Path) -> Result<PathBuf, ConfError> {
    let Ok(rest) = raw_path.strip_prefix("~") else {
        return Ok(raw_path.to_path_buf());
    };

    let home = dirs::home_dir().ok_or_else(|| ConfError::File {
        message: "Could not determine home directory for ~ expansion".into(),
        path: raw_path.to_string_lossy().to_string(),
        hint: Some("Set HOME or use an absolute path".into()),
        code: Some(500),
    })?;
    Ok(home.join(rest))
}

/// Split a dotted path such as `boundary.internal.write` into its segments.
pub(super) fn split_path(path: &str) -> Result<Vec<&str>, ConfError> {
    let segments: Vec<&str> = path.split('.').map(str::trim).collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(ConfError::Syntax {
            kind: "PATH".into(),
            value: path.to_string(),
            line: 0,
            column: 0,
            hint: Some("Use dot-separated names, e.g. boundary.internal.write".into()),
            code: Some(303),
        });
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_paths_are_untouched() {
        let path = Path::new("cases/setup.inp");
        assert_eq!(resolve_path(path).unwrap(), PathBuf::from("cases/setup.inp"));
    }

    #[test]
    fn test_home_expansion() {
        if let Some(home) = dirs::home_dir() {
            let resolved = resolve_path(Path::new("~/setup.inp")).unwrap();
            assert_eq!(resolved, home.join("setup.inp"));
        }
    }

    #[test]
    fn test_split_path() {
        assert_eq!(split_path("a.b.c").unwrap(), vec!["a", "b", "c"]);
        assert!(split_path("a..c").is_err());
        assert!(split_path("").is_err());
    }
}
