use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use git2::{Repository, Signature};
use git_commit_hook::cli::CommandContext;
use git_commit_hook::{Cli, HookError};
use tempfile::TempDir;

/// Test setup that creates a temporary git repository and a configuration for it.
struct TestRepo {
    _temp_dir: TempDir,
    repo_path: PathBuf,
    repo: Repository,
    config_path: PathBuf,
}

impl TestRepo {
    fn new() -> Result<Self> {
        let temp_dir = tempfile::tempdir()?;
        let repo_path = temp_dir.path().canonicalize()?.join("project");
        fs::create_dir_all(&repo_path)?;

        let repo = Repository::init(&repo_path)?;
        let mut config = repo.config()?;
        config.set_str("user.name", "Test User")?;
        config.set_str("user.email", "test@example.com")?;

        // Kept outside the repository so it never shows up as untracked.
        let config_path = temp_dir.path().canonicalize()?.join("git-commit-hook.yaml");
        fs::write(
            &config_path,
            format!(
                r#"
test project:
  path: {}
  branch:
    feature: '^feature/PROJECT-[0-9]+$'
    release: '^release/v([0-9]*\.*)*(-fix)*$'
  template:
    feature: '{{{{.BranchName}}}}: {{{{.CommitMessage}}}}'
    release: '{{{{.CommitMessage}}}} ({{{{.BranchName}}}})'
  validation:
    release:
      '(?m)(?:\s|^|/)(([A-Z](_)*)+-[0-9]+)([\s,;:!.-]|$)': valid ticket ID
      '(?m)@noissue': '@noissue'
"#,
                repo.path().display()
            ),
        )?;

        Ok(Self {
            _temp_dir: temp_dir,
            repo_path,
            repo,
            config_path,
        })
    }

    fn commit(&self, message: &str) -> Result<git2::Oid> {
        fs::write(self.repo_path.join("test.txt"), message)?;
        let mut index = self.repo.index()?;
        index.add_path(Path::new("test.txt"))?;
        index.write()?;

        let signature = Signature::now("Test User", "test@example.com")?;
        let tree = self.repo.find_tree(index.write_tree()?)?;
        let parent = match self.repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(_) => None,
        };
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        Ok(self
            .repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)?)
    }

    fn checkout_new_branch(&self, name: &str) -> Result<()> {
        let head = self.repo.head()?.peel_to_commit()?;
        self.repo.branch(name, &head, false)?;
        self.repo.set_head(&format!("refs/heads/{name}"))?;
        Ok(())
    }

    fn context(&self) -> CommandContext {
        CommandContext {
            config_override: Some(self.config_path.clone()),
            working_dir: self.repo_path.clone(),
            executable: self.repo_path.parent().unwrap().join("git-commit-hook"),
        }
    }

    fn write_commit_message(&self, message: &str) -> Result<PathBuf> {
        let path = self.repo.path().join("COMMIT_EDITMSG");
        fs::write(&path, message)?;
        Ok(path)
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        let cli = Cli::try_parse_from(std::iter::once("git-commit-hook").chain(args.iter().copied()))?;
        let mut out = Vec::new();
        cli.execute_in(&self.context(), &mut out)?;
        Ok(String::from_utf8(out)?)
    }
}

#[test]
fn hook_rewrites_message_on_unborn_branch() -> Result<()> {
    let test_repo = TestRepo::new()?;
    test_repo.repo.set_head("refs/heads/feature/PROJECT-123")?;

    let file = test_repo.write_commit_message("initial commit\n")?;
    test_repo.run(&[file.to_str().unwrap()])?;

    assert_eq!(
        fs::read_to_string(&file)?,
        "feature/PROJECT-123: initial commit"
    );
    Ok(())
}

#[test]
fn hook_rejects_release_commit_without_ticket() -> Result<()> {
    let test_repo = TestRepo::new()?;
    test_repo.commit("Initial commit")?;
    test_repo.checkout_new_branch("release/v1.0.1-fix")?;

    let file = test_repo.write_commit_message("initial commit\n")?;
    let err = test_repo.run(&[file.to_str().unwrap()]).unwrap_err();

    match err.downcast_ref::<HookError>() {
        Some(HookError::Validation {
            branch_name,
            descriptions,
        }) => {
            assert_eq!(branch_name, "release/v1.0.1-fix");
            assert_eq!(descriptions, &vec!["valid ticket ID".to_string(), "@noissue".to_string()]);
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(fs::read_to_string(&file)?, "initial commit\n");
    Ok(())
}

#[test]
fn hook_accepts_release_commit_with_ticket() -> Result<()> {
    let test_repo = TestRepo::new()?;
    test_repo.commit("Initial commit")?;
    test_repo.checkout_new_branch("release/v1.0.1-fix")?;

    let file = test_repo.write_commit_message("fixed something for PROJECT-123, should work now")?;
    test_repo.run(&[file.to_str().unwrap()])?;

    assert_eq!(
        fs::read_to_string(&file)?,
        "fixed something for PROJECT-123, should work now (release/v1.0.1-fix)"
    );
    Ok(())
}

#[test]
fn hook_keeps_message_on_untyped_branch() -> Result<()> {
    let test_repo = TestRepo::new()?;
    test_repo.commit("Initial commit")?;
    test_repo.checkout_new_branch("develop")?;

    let file = test_repo.write_commit_message("  tidy up\n\n")?;
    test_repo.run(&[file.to_str().unwrap()])?;

    assert_eq!(fs::read_to_string(&file)?, "tidy up");
    Ok(())
}

#[test]
fn hook_fails_for_unconfigured_repository() -> Result<()> {
    let test_repo = TestRepo::new()?;
    let other = tempfile::tempdir()?;
    let other_repo = Repository::init(other.path())?;
    let file = other_repo.path().join("COMMIT_EDITMSG");
    fs::write(&file, "initial commit\n")?;

    let err = test_repo.run(&[file.to_str().unwrap()]).unwrap_err();
    assert!(err.to_string().contains("project configuration not found"));
    assert_eq!(fs::read_to_string(&file)?, "initial commit\n");
    Ok(())
}

#[test]
fn test_subcommand_reads_current_branch() -> Result<()> {
    let test_repo = TestRepo::new()?;
    test_repo.commit("Initial commit")?;
    test_repo.checkout_new_branch("feature/PROJECT-7")?;

    let output = test_repo.run(&["test", "-m", "add login page"])?;

    assert!(output.contains("project        : test project\n"));
    assert!(output.contains("branch         : feature/PROJECT-7\n"));
    assert!(output.ends_with(
        "would generate the following commit message:\nfeature/PROJECT-7: add login page\n"
    ));
    Ok(())
}

#[cfg(unix)]
#[test]
fn install_then_diag_then_uninstall() -> Result<()> {
    let test_repo = TestRepo::new()?;
    let executable = test_repo.context().executable;
    fs::write(&executable, "#!/bin/sh\n")?;

    let installed = test_repo.run(&["install", "-p", "test project"])?;
    assert!(installed.ends_with(": OK\n"));
    let hook = test_repo.repo.path().join("hooks").join("commit-msg");
    assert_eq!(fs::read_link(&hook)?, executable);

    let diag = test_repo.run(&["diag"])?;
    assert!(diag.contains("project: test project\n"));
    assert!(diag.contains("git-commit-hook installed: YES\n"));

    let uninstalled = test_repo.run(&["uninstall", "-a"])?;
    assert!(uninstalled.ends_with(": OK\n"));
    assert!(fs::symlink_metadata(&hook).is_err());
    Ok(())
}
