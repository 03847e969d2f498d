//! End-to-end tests for the `sshd-audit` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn sshd_audit(settings_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("sshd-audit").unwrap();
    cmd.env_remove("SSHD_AUDIT_SETTINGS")
        .env_remove("RUST_LOG")
        .arg("--no-color")
        .arg("--settings")
        .arg(settings_dir.path().join("absent.toml"));
    cmd
}

#[test]
fn help_lists_subcommands() {
    let dir = TempDir::new().unwrap();
    sshd_audit(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("match-rule"))
        .stdout(predicate::str::contains("audit"));
}

#[test]
fn match_rule_wildcard() {
    let dir = TempDir::new().unwrap();
    sshd_audit(&dir)
        .args(["match-rule", ">0", "OpenSSH_9.6p1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("true"));
}

#[test]
fn match_vuln_requires_equality() {
    let dir = TempDir::new().unwrap();
    sshd_audit(&dir)
        .args(["match-vuln", "1.2", "1.3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("false"));

    sshd_audit(&dir)
        .args(["-o", "json", "match-vuln", ">0", "1.3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"matched\": false"));
}

#[test]
fn missing_default_binary_fails() {
    let root = TempDir::new().unwrap();
    sshd_audit(&root)
        .arg("--root")
        .arg(root.path())
        .arg("version")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("/usr/sbin/sshd"));
}

#[test]
fn malformed_rules_file_exits_one() {
    let dir = TempDir::new().unwrap();
    let rules = dir.path().join("rules.yaml");
    std::fs::write(&rules, "rules: [unterminated").unwrap();

    sshd_audit(&dir)
        .arg("--binary")
        .arg("/nonexistent/sbin/sshd")
        .args(["audit", "--rules"])
        .arg(&rules)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("loading rules"));
}

#[test]
fn config_parse_failure_is_reported_not_fatal() {
    let root = TempDir::new().unwrap();
    std::fs::create_dir_all(root.path().join("etc/ssh")).unwrap();
    std::fs::write(root.path().join("etc/ssh/sshd_config"), "Port 22\nMatch\n").unwrap();

    sshd_audit(&root)
        .arg("--root")
        .arg(root.path())
        .args(["-o", "json", "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"parsed\": false"))
        .stdout(predicate::str::contains("line 2"));
}

#[cfg(unix)]
mod unix {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;

    /// Write an executable stand-in for sshd that rejects `-?` the way OpenSSH does.
    fn fake_sshd(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("sshd");
        std::fs::write(
            &path,
            "#!/bin/sh\n\
             echo 'unknown option -- ?' >&2\n\
             echo 'OpenSSH_9.6p1 Ubuntu-3ubuntu13.5, OpenSSL 3.0.13 30 Jan 2024' >&2\n\
             echo 'usage: sshd [-46DdeGiqTtV]' >&2\n\
             exit 1\n",
        )
        .unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn version_from_explicit_binary() {
        let dir = TempDir::new().unwrap();
        let sshd = fake_sshd(&dir);

        sshd_audit(&dir)
            .arg("--binary")
            .arg(&sshd)
            .arg("version")
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "OpenSSH_9.6p1 Ubuntu-3ubuntu13.5, OpenSSL 3.0.13 30 Jan 2024",
            ));
    }

    #[test]
    fn audit_json_report() {
        let dir = TempDir::new().unwrap();
        let sshd = fake_sshd(&dir);
        let root = TempDir::new().unwrap();
        std::fs::create_dir_all(root.path().join("etc/ssh")).unwrap();
        std::fs::write(
            root.path().join("etc/ssh/sshd_config"),
            "PermitRootLogin yes\nPasswordAuthentication no\n",
        )
        .unwrap();

        let output = sshd_audit(&dir)
            .arg("--root")
            .arg(root.path())
            .arg("--binary")
            .arg(&sshd)
            .args(["--output", "json", "audit"])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(report["server_id"], "sshd");
        assert_eq!(report["probe_mode"], "unknown_option");
        assert_eq!(report["packages"][0]["module_name"], "sshd");
        assert_eq!(report["packages"][0]["package_manager_id"], "ossindex");
        assert_eq!(report["configuration_parsed"], true);
        assert!(report["binary_sha256"].as_str().is_some_and(|s| s.len() == 64));

        let findings = report["findings"].as_array().unwrap();
        let root_login = findings
            .iter()
            .find(|f| f["rule_id"] == "SSHD-001")
            .unwrap();
        assert_eq!(root_login["passed"], false);
        assert_eq!(root_login["actual"], "yes");
    }

    #[test]
    fn packages_filter_excludes_other_modules() {
        let dir = TempDir::new().unwrap();
        let sshd = fake_sshd(&dir);

        sshd_audit(&dir)
            .arg("--binary")
            .arg(&sshd)
            .args(["-o", "json", "packages", "--filter", "openssl"])
            .assert()
            .success()
            .stdout(predicate::str::diff("[]\n"));
    }
}
