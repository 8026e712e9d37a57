//! # Name Gazetteer
//!
//! Lookup of known first and last names. Lists are stored lowercase so that
//! membership tests ignore case.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::error::{MeishiError, Result};

/// Answers whether a token is a known first or last name.
pub trait NameGazetteer {
    fn is_known_first_name(&self, token: &str) -> bool;

    fn is_known_last_name(&self, token: &str) -> bool;

    /// `true` if the token is known as either kind of name.
    fn is_known_name(&self, token: &str) -> bool {
        self.is_known_first_name(token) || self.is_known_last_name(token)
    }
}

/// In-memory first/last name sets.
#[derive(Debug, Clone, Default)]
pub struct NameList {
    first: HashSet<String>,
    last: HashSet<String>,
}

impl NameList {
    /// An empty gazetteer that knows no names.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from in-memory name lists.
    pub fn from_names<I, J, S, T>(first: I, last: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        Self {
            first: first.into_iter().map(|n| normalize(n.as_ref())).collect(),
            last: last.into_iter().map(|n| normalize(n.as_ref())).collect(),
        }
    }

    /// Load one-name-per-line files. Either list may be omitted.
    ///
    /// # Errors
    ///
    /// Returns `MeishiError::ResourceLoad` if a given file cannot be read.
    pub fn from_files(first: Option<&Path>, last: Option<&Path>) -> Result<Self> {
        let mut list = Self::new();
        if let Some(path) = first {
            list.first = read_names(path)?;
        }
        if let Some(path) = last {
            list.last = read_names(path)?;
        }
        debug!(
            first_names = list.first.len(),
            last_names = list.last.len(),
            "loaded name gazetteer"
        );
        Ok(list)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.first.len() + self.last.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.first.is_empty() && self.last.is_empty()
    }
}

impl NameGazetteer for NameList {
    fn is_known_first_name(&self, token: &str) -> bool {
        self.first.contains(&normalize(token))
    }

    fn is_known_last_name(&self, token: &str) -> bool {
        self.last.contains(&normalize(token))
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

fn read_names(path: &Path) -> Result<HashSet<String>> {
    let load_err = |source| MeishiError::ResourceLoad {
        path: path.to_path_buf(),
        source,
    };

    let reader = BufReader::new(File::open(path).map_err(load_err)?);
    let mut names = HashSet::new();

    for line in reader.lines() {
        let line = line.map_err(load_err)?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        names.insert(normalize(line));
    }

    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_case_insensitive_lookup() {
        let names = NameList::from_names(["John"], ["Smith"]);

        assert!(names.is_known_first_name("john"));
        assert!(names.is_known_first_name("JOHN"));
        assert!(names.is_known_last_name("Smith"));
        assert!(!names.is_known_first_name("Smith"));
        assert!(names.is_known_name("smith"));
        assert!(!names.is_known_name("table"));
    }

    #[test]
    fn test_empty_list_knows_nothing() {
        let names = NameList::new();
        assert!(names.is_empty());
        assert!(!names.is_known_name("Mary"));
    }

    #[test]
    fn test_from_files() {
        let mut first = tempfile::NamedTempFile::new().unwrap();
        writeln!(first, "# common first names\nMary\n\n  Ahmed  ").unwrap();

        let names = NameList::from_files(Some(first.path()), None).unwrap();
        assert_eq!(names.len(), 2);
        assert!(names.is_known_first_name("Mary"));
        assert!(names.is_known_first_name("ahmed"));
        assert!(!names.is_known_first_name("# common first names"));
    }

    #[test]
    fn test_missing_file() {
        let err = NameList::from_files(Some(Path::new("/no/such/names.txt")), None).unwrap_err();
        assert!(matches!(err, MeishiError::ResourceLoad { .. }));
    }
}
