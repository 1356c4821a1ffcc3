/// Where a repository is hosted and which branch links point at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    /// Web URL of the repository, e.g. `https://github.com/owner/name`.
    pub remote: String,
    pub default_branch: String,
}

/// A range of lines in a file of a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub repository: Option<Repository>,
    /// Path of the file relative to the repository root.
    pub path: String,
    pub start_line: usize,
    pub end_line: usize,
}

impl SourceLocation {
    pub fn new(path: impl Into<String>, start_line: usize, end_line: usize) -> Self {
        SourceLocation {
            repository: None,
            path: path.into(),
            start_line,
            end_line,
        }
    }

    pub fn in_repository(mut self, remote: impl Into<String>, branch: impl Into<String>) -> Self {
        self.repository = Some(Repository {
            remote: remote.into(),
            default_branch: branch.into(),
        });
        self
    }

    /// The repository and the file path without a leading `/`.
    pub(crate) fn parts(&self) -> Option<(&Repository, &str)> {
        let repo = self.repository.as_ref()?;
        Some((repo, self.path.trim_start_matches('/')))
    }
}
