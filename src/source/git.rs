//! Source provider backed by the `git` executable.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::warn;

use super::{AUTHOR_PLACEHOLDER, ContentStream, SourceError, SourceProvider};

#[derive(Debug, Clone)]
pub struct GitSource {
    repository: PathBuf,
    bare: bool,
}

impl GitSource {
    /// `bare = false` means `repository` is a work tree with a `.git` directory.
    pub fn new(repository: impl Into<PathBuf>, bare: bool) -> Self {
        GitSource {
            repository: repository.into(),
            bare,
        }
    }

    pub fn repository(&self) -> &Path {
        &self.repository
    }

    fn git_dir(&self) -> PathBuf {
        if self.bare {
            self.repository.clone()
        } else {
            self.repository.join(".git")
        }
    }

    /// Run `git --git-dir <dir> <args>` and return stdout. A non-zero exit is an error.
    fn run(&self, args: &[&str]) -> Result<Vec<u8>, SourceError> {
        let command = args.join(" ");
        let mut cmd = Command::new("git");
        cmd.arg("--git-dir").arg(self.git_dir());
        if !self.bare {
            cmd.arg("--work-tree").arg(&self.repository);
        }
        let output = cmd.args(args).output().map_err(|e| SourceError::Git {
            command: command.clone(),
            detail: e.to_string(),
        })?;

        if !output.status.success() {
            return Err(SourceError::Git {
                command,
                detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output.stdout)
    }

    fn run_text(&self, args: &[&str]) -> Result<String, SourceError> {
        let stdout = self.run(args)?;
        String::from_utf8(stdout).map_err(|e| SourceError::Git {
            command: args.join(" "),
            detail: format!("output is not UTF-8: {}", e),
        })
    }
}

impl SourceProvider for GitSource {
    fn list_tracked_files(
        &self,
        reference: Option<&str>,
        filter: &dyn Fn(&str) -> bool,
    ) -> Result<Vec<String>, SourceError> {
        let paths: Vec<String> = match reference {
            // <mode> SP <type> SP <object> TAB <path>
            Some(reference) => self
                .run_text(&["ls-tree", "--full-tree", "-r", reference])?
                .lines()
                .filter_map(|line| line.split_once('\t').map(|(_, path)| path.to_string()))
                .collect(),
            None => self
                .run_text(&["ls-files"])?
                .lines()
                .map(str::to_string)
                .collect(),
        };
        Ok(paths.into_iter().filter(|p| filter(p)).collect())
    }

    fn tags_at(&self, reference: Option<&str>) -> Vec<String> {
        match self.run_text(&["tag", "--points-at", reference.unwrap_or("HEAD")]) {
            Ok(text) => text
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect(),
            Err(e) => {
                warn!(error = %e, "could not read tags");
                Vec::new()
            }
        }
    }

    fn author_of(&self, reference: Option<&str>) -> String {
        let text = self.run_text(&[
            "show",
            "-s",
            "--format=%aN <%aE>",
            reference.unwrap_or("HEAD"),
        ]);
        match text {
            Ok(text) => match text.lines().next().map(str::trim) {
                Some(author) if !author.is_empty() => author.to_string(),
                _ => AUTHOR_PLACEHOLDER.to_string(),
            },
            Err(e) => {
                warn!(error = %e, "could not read author");
                AUTHOR_PLACEHOLDER.to_string()
            }
        }
    }

    fn open_content(
        &self,
        path: &str,
        reference: Option<&str>,
    ) -> Result<ContentStream, SourceError> {
        let bytes = match reference {
            Some(reference) => self.run(&["show", &format!("{}:{}", reference, path)])?,
            None => {
                let full = self.repository.join(path);
                std::fs::read(&full).map_err(|e| SourceError::Io {
                    op: "read",
                    path: full.display().to_string(),
                    detail: e.to_string(),
                })?
            }
        };
        Ok(Box::new(Cursor::new(bytes)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn git_dir_depends_on_bare_flag() {
        assert_eq!(GitSource::new("/repo.git", true).git_dir(), PathBuf::from("/repo.git"));
        assert_eq!(GitSource::new("/repo", false).git_dir(), PathBuf::from("/repo/.git"));
    }

    #[test]
    fn missing_repository_fails_open_for_metadata() {
        let source = GitSource::new("/nonexistent/talend-review-repo", true);
        assert!(source.tags_at(Some("HEAD")).is_empty());
        assert_eq!(source.author_of(Some("HEAD")), AUTHOR_PLACEHOLDER);
    }

    #[test]
    fn work_tree_read_of_missing_file_is_an_io_error() {
        let source = GitSource::new("/nonexistent/talend-review-repo", false);
        let err = source.open_content("talend.project", None).err().unwrap();
        assert!(matches!(err, SourceError::Io { op: "read", .. }));
    }
}
