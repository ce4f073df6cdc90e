//! Environment variable loading.
//!
//! Keeps the fallback chains (primary key, aliases, default) in one place.

use std::env;
use std::ffi::OsStr;
use std::path::Path;

/// Load `.env` from the current directory into the process environment
/// (existing variables are never overridden). Runs at most once.
pub fn load_dotenv() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let dir = env::current_dir().unwrap_or_else(|_| std::path::PathBuf::from("."));
        load_dotenv_from_dir(&dir);
    });
}

/// Load `<dir>/.env` into the process environment without overriding existing variables.
///
/// Returns the number of variables that were set.
pub fn load_dotenv_from_dir(dir: &Path) -> usize {
    let Ok(content) = std::fs::read_to_string(dir.join(".env")) else {
        return 0;
    };
    let mut applied = 0;
    for (key, value) in parse_dotenv(&content) {
        if env::var_os(&key).is_none() {
            set_env_var(&key, &value);
            applied += 1;
        }
    }
    if applied > 0 {
        tracing::debug!(dir = %dir.display(), applied, "Loaded .env");
    }
    applied
}

/// Parse `KEY=VALUE` lines. Blank lines and `#` comments are skipped, unquoted
/// inline comments are stripped, and one level of matching quotes is removed.
pub fn parse_dotenv(content: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        let Some(eq_pos) = line.find('=') else {
            continue;
        };
        let key = line[..eq_pos].trim();
        let mut value = line[eq_pos + 1..].trim();
        if let Some(hash_pos) = value.find('#') {
            let before_hash = value[..hash_pos].trim_end();
            if !before_hash.contains('"') && !before_hash.contains('\'') {
                value = before_hash;
            }
        }
        if value.len() >= 2
            && ((value.starts_with('"') && value.ends_with('"'))
                || (value.starts_with('\'') && value.ends_with('\'')))
        {
            value = &value[1..value.len() - 1];
        }
        if !key.is_empty() {
            pairs.push((key.to_string(), value.to_string()));
        }
    }
    pairs
}

/// Read the primary key or the first set alias; empty values fall back to `default`.
pub fn env_or<F>(primary: &str, aliases: &[&str], default: F) -> String
where
    F: FnOnce() -> String,
{
    env::var(primary)
        .ok()
        .or_else(|| aliases.iter().find_map(|a| env::var(a).ok()))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(default)
}

/// Read the primary key or the first set alias; empty values count as unset.
pub fn env_optional(primary: &str, aliases: &[&str]) -> Option<String> {
    env::var(primary)
        .ok()
        .or_else(|| aliases.iter().find_map(|a| env::var(a).ok()))
        .and_then(|s| {
            let s = s.trim().to_string();
            if s.is_empty() {
                None
            } else {
                Some(s)
            }
        })
}

/// Boolean variable: `0/false/no/off` are false, any other value is true.
pub fn env_bool(primary: &str, aliases: &[&str], default: bool) -> bool {
    let v = env::var(primary)
        .ok()
        .or_else(|| aliases.iter().find_map(|a| env::var(a).ok()));
    match v.as_deref() {
        Some(s) => !matches!(
            s.trim().to_lowercase().as_str(),
            "0" | "false" | "no" | "off"
        ),
        None => default,
    }
}

// ─── Centralized env::set_var / remove_var ─────────────────────────────────
//
// Callers must only mutate the process environment from the main thread,
// before any worker threads exist.

/// Set a single environment variable.
pub fn set_env_var<K: AsRef<OsStr>, V: AsRef<OsStr>>(key: K, value: V) {
    env::set_var(key, value);
}

/// Remove a single environment variable.
pub fn remove_env_var<K: AsRef<OsStr>>(key: K) {
    env::remove_var(key);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dotenv_basic() {
        let pairs = parse_dotenv(
            "# comment\n\nVENVKIT_VENV_DIR=.venv\nexport VENVKIT_PYTHON = python3.12\n",
        );
        assert_eq!(
            pairs,
            vec![
                ("VENVKIT_VENV_DIR".to_string(), ".venv".to_string()),
                ("VENVKIT_PYTHON".to_string(), "python3.12".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_dotenv_quotes_and_inline_comment() {
        let pairs = parse_dotenv("A=\"with space\"\nB='single'\nC=value # trailing\nD=\"x # y\"\n");
        assert_eq!(pairs[0].1, "with space");
        assert_eq!(pairs[1].1, "single");
        assert_eq!(pairs[2].1, "value");
        assert_eq!(pairs[3].1, "x # y");
    }

    #[test]
    fn test_parse_dotenv_skips_lines_without_equals() {
        let pairs = parse_dotenv("NOT_A_PAIR\n=missing_key\nOK=1\n");
        assert_eq!(pairs, vec![("OK".to_string(), "1".to_string())]);
    }

    #[test]
    fn test_load_dotenv_from_dir_does_not_override() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join(".env"),
            "VENVKIT_TEST_DOTENV_NEW=from_file\nVENVKIT_TEST_DOTENV_SET=from_file\n",
        )
        .unwrap();
        set_env_var("VENVKIT_TEST_DOTENV_SET", "from_env");

        let applied = load_dotenv_from_dir(tmp.path());

        assert_eq!(applied, 1);
        assert_eq!(env::var("VENVKIT_TEST_DOTENV_NEW").unwrap(), "from_file");
        assert_eq!(env::var("VENVKIT_TEST_DOTENV_SET").unwrap(), "from_env");
        remove_env_var("VENVKIT_TEST_DOTENV_NEW");
        remove_env_var("VENVKIT_TEST_DOTENV_SET");
    }

    #[test]
    fn test_env_helpers_fallback_chain() {
        set_env_var("VENVKIT_TEST_ALIAS_B", "alias");
        assert_eq!(
            env_or("VENVKIT_TEST_PRIMARY_A", &["VENVKIT_TEST_ALIAS_B"], || "d".into()),
            "alias"
        );
        assert_eq!(env_optional("VENVKIT_TEST_MISSING_C", &[]), None);
        assert!(env_bool("VENVKIT_TEST_MISSING_C", &[], true));
        set_env_var("VENVKIT_TEST_BOOL_D", "off");
        assert!(!env_bool("VENVKIT_TEST_BOOL_D", &[], true));
        remove_env_var("VENVKIT_TEST_ALIAS_B");
        remove_env_var("VENVKIT_TEST_BOOL_D");
    }
}
