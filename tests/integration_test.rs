// tests/integration_test.rs
use std::env;
use std::process::Command;

fn pkg_publish(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_pkg-publish"))
        .args(args)
        .env_remove("IS_RELEASE_CANDIDATE")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute pkg-publish")
}

#[test]
fn test_pkg_publish_help() {
    for token in ["--help", "-h", "help"] {
        let output = pkg_publish(&[token]);

        assert!(output.status.success(), "{} should exit 0", token);
        let stdout = String::from_utf8(output.stdout).unwrap();
        assert!(stdout.contains("USAGE:"));
        assert!(stdout.contains("pkg-publish [patch|minor|major]"));
    }
}

#[test]
fn test_pkg_publish_invalid_release_type() {
    let output = pkg_publish(&["bogus"]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("USAGE:"), "usage goes to stdout, got: {}", stdout);
}

#[test]
fn test_pkg_publish_invalid_release_type_before_config() {
    let output = pkg_publish(&["bogus", "--config", "/nonexistent/pkgpublish.toml"]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stdout.contains("USAGE:"), "usage goes to stdout, got: {}", stdout);
    assert!(
        !stderr.contains("Configuration error"),
        "config should not be read, got: {}",
        stderr
    );
}

#[test]
fn test_pkg_publish_missing_release_type() {
    let output = pkg_publish(&[]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_pkg_publish_unknown_flag() {
    let output = pkg_publish(&["patch", "--force"]);
    assert_eq!(output.status.code(), Some(1));
}

#[cfg(test)]
mod tests {
    use git2::Repository;
    use pkg_publish::cli::Toolchain;
    use pkg_publish::config::Config;
    use serial_test::serial;
    use std::env;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    // Helper function to setup a temporary git repo for testing
    fn setup_test_repo() -> TempDir {
        let temp_dir = TempDir::new().expect("Could not create temp dir");
        let repo = Repository::init(temp_dir.path()).expect("Could not init git repo");

        {
            let mut config = repo.config().expect("Could not get config");
            config
                .set_str("user.name", "Test User")
                .expect("Could not set user.name");
            config
                .set_str("user.email", "test@example.com")
                .expect("Could not set user.email");
        }

        fs::write(
            temp_dir.path().join("package.json"),
            "{\n  \"name\": \"widgets\",\n  \"version\": \"1.0.0\"\n}\n",
        )
        .expect("Could not write manifest");

        let mut index = repo.index().expect("Could not get index");
        index
            .add_path(Path::new("package.json"))
            .expect("Could not add file to index");
        index.write().expect("Could not write index");

        let tree_id = index.write_tree().expect("Could not write tree");
        let tree = repo.find_tree(tree_id).expect("Could not find tree");
        let sig = repo.signature().expect("Could not get sig");
        let commit_id = repo
            .commit(Some("HEAD"), &sig, &sig, "1.0.0", &tree, &[])
            .expect("Could not create commit");

        repo.tag_lightweight("v1.0.0", &repo.find_object(commit_id, None).unwrap(), false)
            .expect("Could not create tag");

        temp_dir
    }

    #[test]
    #[serial]
    fn test_connect_inside_repository() {
        let temp_dir = setup_test_repo();
        let original_dir = env::current_dir().unwrap();
        env::set_current_dir(temp_dir.path()).expect("Could not change to temp dir");

        let tools = Toolchain::connect(&Config::default());

        env::set_current_dir(original_dir).unwrap();

        let tools = tools.expect("connect should succeed inside a git repository");
        let state = tools.vcs.repository_state("origin").unwrap();
        assert!(state.is_clean);
        // No remote-tracking branch exists.
        assert!(!state.is_up_to_date_with_remote);
        assert_eq!(tools.vcs.list_tags().unwrap(), vec!["v1.0.0".to_string()]);
        assert_eq!(tools.host.program(), "gh");
    }

    #[test]
    #[serial]
    fn test_connect_outside_repository() {
        let temp_dir = TempDir::new().unwrap();
        let original_dir = env::current_dir().unwrap();
        env::set_current_dir(temp_dir.path()).expect("Could not change to temp dir");

        let result = Toolchain::connect(&Config::default());

        env::set_current_dir(original_dir).unwrap();

        let err = result.err().expect("connect should fail outside a repository");
        assert!(format!("{:#}", err).contains("not inside a git repository"));
    }
}
