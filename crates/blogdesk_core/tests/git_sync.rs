use blogdesk_core::{GitCliSync, SyncError, SyncStage, SyncWorker, VersionSync};
use std::fs;
use std::path::Path;
use std::process::Command;

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn init_repo_with_remote(root: &Path) -> std::path::PathBuf {
    let remote = root.join("remote.git");
    let work = root.join("work");
    fs::create_dir_all(&remote).unwrap();
    fs::create_dir_all(&work).unwrap();

    git(&remote, &["init", "--bare", "--quiet"]);
    git(&work, &["init", "--quiet"]);
    git(&work, &["config", "user.name", "Blog Editor"]);
    git(&work, &["config", "user.email", "editor@example.com"]);
    git(&work, &["config", "commit.gpgsign", "false"]);
    git(&work, &["config", "push.default", "current"]);
    git(&work, &["remote", "add", "origin", remote.to_str().unwrap()]);
    work
}

#[test]
fn plain_directory_is_not_a_repository() {
    if !git_available() {
        eprintln!("skipping: git is not installed");
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("blog_data.json");
    fs::write(&file, "{}").unwrap();

    let err = GitCliSync::new(dir.path())
        .stage_and_push(&file)
        .unwrap_err();
    assert!(matches!(err, SyncError::NotARepository(_)));
}

#[test]
fn stage_commit_and_push_reach_the_remote() {
    if !git_available() {
        eprintln!("skipping: git is not installed");
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let work = init_repo_with_remote(dir.path());
    let file = work.join("blog_data.json");
    fs::write(&file, "{}\n").unwrap();

    let report = GitCliSync::new(&work).stage_and_push(&file).unwrap();
    assert!(report.committed);
    assert!(report
        .commit_message
        .starts_with("feat(blog): update blog posts - "));
    assert_eq!(git(&work, &["log", "-1", "--format=%s"]), report.commit_message);

    let remote_head = git(&dir.path().join("remote.git"), &["log", "-1", "--all", "--format=%s"]);
    assert_eq!(remote_head, report.commit_message);
}

#[test]
fn missing_remote_fails_at_push_stage() {
    if !git_available() {
        eprintln!("skipping: git is not installed");
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let work = init_repo_with_remote(dir.path());
    let file = work.join("blog_data.json");
    fs::write(&file, "{}\n").unwrap();

    let err = GitCliSync::new(&work)
        .with_remote("nowhere")
        .stage_and_push(&file)
        .unwrap_err();
    assert!(matches!(
        err,
        SyncError::StepFailed {
            stage: SyncStage::Push,
            ..
        }
    ));
    // The commit stays local.
    assert_eq!(git(&work, &["rev-list", "--count", "HEAD"]), "1");
}

#[test]
fn unchanged_file_still_pushes_earlier_commit() {
    if !git_available() {
        eprintln!("skipping: git is not installed");
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let work = init_repo_with_remote(dir.path());
    git(&work, &["remote", "remove", "origin"]);
    let file = work.join("blog_data.json");
    fs::write(&file, "{}\n").unwrap();

    let sync = GitCliSync::new(&work);
    let err = sync.stage_and_push(&file).unwrap_err();
    assert!(matches!(
        err,
        SyncError::StepFailed {
            stage: SyncStage::Push,
            ..
        }
    ));
    let local_head = git(&work, &["log", "-1", "--format=%s"]);

    let remote = dir.path().join("remote.git");
    git(&work, &["remote", "add", "origin", remote.to_str().unwrap()]);
    let report = sync.stage_and_push(&file).unwrap();
    assert!(!report.committed);
    assert_eq!(git(&work, &["rev-list", "--count", "HEAD"]), "1");
    assert_eq!(git(&remote, &["log", "-1", "--all", "--format=%s"]), local_head);
}

#[test]
fn changed_file_is_committed_each_time() {
    if !git_available() {
        eprintln!("skipping: git is not installed");
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let work = init_repo_with_remote(dir.path());
    let file = work.join("blog_data.json");
    let sync = GitCliSync::new(&work);

    fs::write(&file, "{}\n").unwrap();
    assert!(sync.stage_and_push(&file).unwrap().committed);
    fs::write(&file, "{\"post\": {\"translations\": {}}}\n").unwrap();
    assert!(sync.stage_and_push(&file).unwrap().committed);
    assert_eq!(git(&work, &["rev-list", "--count", "HEAD"]), "2");
}

#[test]
fn worker_reports_outcomes_off_thread() {
    if !git_available() {
        eprintln!("skipping: git is not installed");
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("blog_data.json");
    fs::write(&file, "{}").unwrap();

    let worker = SyncWorker::spawn(GitCliSync::new(dir.path()), 2).unwrap();
    worker.submit(&file).unwrap();
    let outcomes = worker.shutdown();
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].path, file);
    assert!(matches!(
        outcomes[0].result,
        Err(SyncError::NotARepository(_))
    ));
}
