//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create a kvenv command with an isolated environment.
    ///
    /// - `KVENV_CONFIG` inside the temp home
    /// - `KVENV_AZ` pointing at the fake az
    /// - no inherited vault, subscription, or log overrides
    /// - bash as the detected shell, colors off
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("kvenv").expect("failed to find kvenv binary");
        cmd.env("HOME", self.home.path());
        cmd.env("USERPROFILE", self.home.path());
        cmd.env("KVENV_CONFIG", self.config_path());
        cmd.env("KVENV_AZ", self.az_path());
        cmd.env("SHELL", "/bin/bash");
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("KVENV_VAULT");
        cmd.env_remove("KVENV_SUBSCRIPTION");
        cmd.env_remove("KVENV_LOG");
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Run kvenv with `args`.
    pub fn kvenv(&self, args: &[&str]) -> Output {
        self.cmd()
            .args(args)
            .output()
            .expect("failed to run kvenv")
    }

    /// Shortcut for `kvenv setup`.
    pub fn setup(&self, args: &[&str]) -> Output {
        let mut full = vec!["setup"];
        full.extend_from_slice(args);
        self.kvenv(&full)
    }

    /// Shortcut for `kvenv save NAME VALUE -r RESOURCE -e ENV_VAR`.
    pub fn save(&self, resource: &str, name: &str, value: &str, env_var: &str) -> Output {
        self.kvenv(&["save", name, value, "-r", resource, "-e", env_var])
    }

    /// Shortcut for `kvenv load --shell bash -r RESOURCE`.
    pub fn load(&self, resource: &str) -> Output {
        self.kvenv(&["load", "--shell", "bash", "-r", resource])
    }

    /// Shortcut for `kvenv list`.
    pub fn list(&self) -> Output {
        self.kvenv(&["list"])
    }
}
