use std::path::Path;
use std::process::Command;

use brancher_build::tag::{FALLBACK_VERSION, ImageTag};
use brancher_build::template::{self, Substitutions};
use brancher_build::{TagError, compute_tag, extract_version};
use brancher_core::HostIdentity;
use tempfile::TempDir;

const JENKINS_DOCKERFILE: &str = r#"FROM jenkins/jenkins:lts
ARG JENKINS_VERSION
ENV JENKINS_VERSION ${JENKINS_VERSION:-2.263.1}
COPY ref /usr/share/jenkins/ref
"#;

fn identity() -> HostIdentity {
    HostIdentity {
        fqdn: "host.example.com".to_owned(),
        user: "mwaite".to_owned(),
    }
}

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap()
        .status;
    assert!(status.success(), "git {args:?} failed");
}

/// Initialize a git repo with a template directory and an initial commit.
fn init_git_project(dir: &Path) {
    std::fs::create_dir_all(dir.join("ref/jobs/demo")).unwrap();
    std::fs::write(
        dir.join("ref/jenkins.location.xml"),
        "<url>http://localhost:8080/</url>\n<adminAddress>LOGNAME@JENKINS_HOSTNAME</adminAddress>\n",
    )
    .unwrap();
    std::fs::write(
        dir.join("ref/jobs/demo/config.xml"),
        "<scm>git://localhost/demo.git</scm>\n",
    )
    .unwrap();
    std::fs::write(dir.join("ref/README.md"), "served from localhost\n").unwrap();

    git(dir, &["init"]);
    git(dir, &["config", "user.email", "test@test.com"]);
    git(dir, &["config", "user.name", "Test"]);
    git(dir, &["add", "."]);
    git(dir, &["commit", "-m", "init"]);
}

// ── Tag Tests ──

#[test]
fn tag_uses_dockerfile_version() {
    let tmp = TempDir::new().unwrap();
    let dockerfile = tmp.path().join("Dockerfile");
    std::fs::write(&dockerfile, JENKINS_DOCKERFILE).unwrap();

    let tag = compute_tag(&dockerfile, "markewaite", "lts", "JENKINS_VERSION").unwrap();

    assert_eq!(tag.to_string(), "markewaite/lts:2.263.1");
}

#[test]
fn tag_falls_back_to_latest() {
    let tmp = TempDir::new().unwrap();
    let dockerfile = tmp.path().join("Dockerfile");
    std::fs::write(&dockerfile, "FROM jenkins/jenkins:lts\nUSER jenkins\n").unwrap();

    let tag = compute_tag(&dockerfile, "markewaite", "demo", "JENKINS_VERSION").unwrap();

    assert_eq!(tag.to_string(), "markewaite/demo:latest");
    assert_eq!(tag.version, FALLBACK_VERSION);
}

#[test]
fn tag_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    let dockerfile = tmp.path().join("Dockerfile");
    std::fs::write(&dockerfile, JENKINS_DOCKERFILE).unwrap();

    let first = compute_tag(&dockerfile, "markewaite", "lts-rc", "JENKINS_VERSION").unwrap();
    let second = compute_tag(&dockerfile, "markewaite", "lts-rc", "JENKINS_VERSION").unwrap();

    assert_eq!(first, second);
}

#[test]
fn tag_missing_dockerfile_is_an_error() {
    let tmp = TempDir::new().unwrap();

    let err = compute_tag(
        &tmp.path().join("Dockerfile"),
        "markewaite",
        "lts",
        "JENKINS_VERSION",
    )
    .unwrap_err();

    assert!(err.to_string().contains("Dockerfile"));
}

#[test]
fn tag_display_format() {
    let tag = ImageTag {
        namespace: "acme".to_owned(),
        name: "feature/x".to_owned(),
        version: "1.2".to_owned(),
    };
    assert_eq!(tag.to_string(), "acme/feature/x:1.2");
}

#[test]
fn version_requires_variable_twice_on_one_line() {
    assert_eq!(
        extract_version("JENKINS_VERSION:-2.0", "JENKINS_VERSION").unwrap(),
        None
    );
    assert_eq!(
        extract_version("ARG JENKINS_VERSION\nX=${JENKINS_VERSION:-2.0}", "JENKINS_VERSION")
            .unwrap(),
        None
    );
}

#[test]
fn version_last_default_on_line_wins() {
    let line = "JENKINS_VERSION=${JENKINS_VERSION:-1.0} ${JENKINS_VERSION:-2.0}";
    assert_eq!(
        extract_version(line, "JENKINS_VERSION").unwrap().as_deref(),
        Some("2.0")
    );
}

#[test]
fn version_empty_default_is_none() {
    assert_eq!(
        extract_version("ENV JENKINS_VERSION ${JENKINS_VERSION:-}", "JENKINS_VERSION").unwrap(),
        None
    );
}

#[test]
fn version_variable_is_literal() {
    let dockerfile = "ENV APP.VER ${APP.VER:-3.1}\nENV APPXVER ${APPXVER:-9.9}";
    assert_eq!(
        extract_version(dockerfile, "APP.VER").unwrap().as_deref(),
        Some("3.1")
    );
}

#[test]
fn version_pattern_too_large_is_an_error_not_latest() {
    // Compiles past the regex size limit.
    let variable = "V".repeat(2_000_000);
    let tmp = TempDir::new().unwrap();
    let dockerfile = tmp.path().join("Dockerfile");
    std::fs::write(&dockerfile, JENKINS_DOCKERFILE).unwrap();

    assert!(matches!(
        extract_version(JENKINS_DOCKERFILE, &variable),
        Err(TagError::Pattern { .. })
    ));
    assert!(compute_tag(&dockerfile, "markewaite", "lts", &variable).is_err());
}

// ── Substitution Tests ──

#[test]
fn substitution_rewrites_matching_files_recursively() {
    let tmp = TempDir::new().unwrap();
    init_git_project(tmp.path());
    let ref_dir = tmp.path().join("ref");

    let count = template::apply(&ref_dir, "*.xml", &Substitutions::for_identity(&identity())).unwrap();

    assert_eq!(count, 2);
    let location = std::fs::read_to_string(ref_dir.join("jenkins.location.xml")).unwrap();
    assert_eq!(
        location,
        "<url>http://host.example.com:8080/</url>\n<adminAddress>mwaite@host.example.com</adminAddress>\n"
    );
    let job = std::fs::read_to_string(ref_dir.join("jobs/demo/config.xml")).unwrap();
    assert_eq!(job, "<scm>git://host.example.com/demo.git</scm>\n");
}

#[test]
fn substitution_skips_non_matching_files() {
    let tmp = TempDir::new().unwrap();
    init_git_project(tmp.path());
    let ref_dir = tmp.path().join("ref");

    template::apply(&ref_dir, "*.xml", &Substitutions::for_identity(&identity())).unwrap();

    let readme = std::fs::read_to_string(ref_dir.join("README.md")).unwrap();
    assert_eq!(readme, "served from localhost\n");
}

#[test]
fn substitution_missing_directory_is_noop() {
    let tmp = TempDir::new().unwrap();

    let count = template::apply(
        &tmp.path().join("ref"),
        "*.xml",
        &Substitutions::for_identity(&identity()),
    )
    .unwrap();

    assert_eq!(count, 0);
    assert!(!tmp.path().join("ref").exists());
}

#[test]
fn substitution_invalid_pattern_is_an_error() {
    let tmp = TempDir::new().unwrap();
    init_git_project(tmp.path());

    let result = template::apply(
        &tmp.path().join("ref"),
        "[",
        &Substitutions::for_identity(&identity()),
    );

    assert!(result.is_err());
}

#[test]
fn substitution_then_revert_restores_content() {
    let tmp = TempDir::new().unwrap();
    init_git_project(tmp.path());
    let ref_dir = tmp.path().join("ref");
    let before = std::fs::read_to_string(ref_dir.join("jenkins.location.xml")).unwrap();

    template::apply(&ref_dir, "*.xml", &Substitutions::for_identity(&identity())).unwrap();
    assert_ne!(
        std::fs::read_to_string(ref_dir.join("jenkins.location.xml")).unwrap(),
        before
    );

    git(tmp.path(), &["checkout", "--", "ref"]);

    let after = std::fs::read_to_string(ref_dir.join("jenkins.location.xml")).unwrap();
    assert_eq!(after, before);
}

#[test]
fn revert_also_discards_unrelated_edits() {
    let tmp = TempDir::new().unwrap();
    init_git_project(tmp.path());
    let readme = tmp.path().join("ref/README.md");
    std::fs::write(&readme, "local edit\n").unwrap();

    template::apply(
        &tmp.path().join("ref"),
        "*.xml",
        &Substitutions::for_identity(&identity()),
    )
    .unwrap();
    git(tmp.path(), &["checkout", "--", "ref"]);

    assert_eq!(
        std::fs::read_to_string(&readme).unwrap(),
        "served from localhost\n"
    );
}
