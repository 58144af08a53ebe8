#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};

pub const PIP_VERSION: &str = "pip 24.0 from /fake/site-packages/pip (python 3.12)";

pub fn new_command_with_temp_home() -> (Command, tempfile::TempDir) {
    let temp_home = tempfile::tempdir().expect("temp home");
    let binary = assert_cmd::cargo::cargo_bin!("pyfreeze");
    let mut command = Command::new(binary);
    command.env("HOME", temp_home.path());
    command.env("XDG_CONFIG_HOME", temp_home.path().join(".config"));
    command.env("NO_COLOR", "1");
    (command, temp_home)
}

pub fn log_path(home: &Path) -> PathBuf {
    home.join(".config").join("pyfreeze").join("log.log")
}

pub fn read_log(home: &Path) -> String {
    fs::read_to_string(log_path(home)).unwrap_or_default()
}

/// Creates `project/app.py` under `home` and returns the project directory.
pub fn write_project(home: &Path, with_requirements: bool) -> PathBuf {
    let project = home.join("project");
    fs::create_dir_all(&project).expect("create project");
    fs::write(project.join("app.py"), "print('hello')\n").expect("write launcher");
    if with_requirements {
        fs::write(project.join("requirements.txt"), "requests\n").expect("write requirements");
    }
    project
}

/// Installs shell scripts standing in for python and pyinstaller and points the config at them.
#[cfg(unix)]
pub fn write_fake_tools(home: &Path, pip_output: &str) -> PathBuf {
    let bin = home.join("bin");
    fs::create_dir_all(&bin).expect("create bin dir");

    let python = bin.join("python");
    write_script(
        &python,
        &format!(
            "#!/bin/sh\nif [ \"$3\" = \"--version\" ]; then\n  echo \"{pip_output}\"\n  exit 0\nfi\necho \"$@\" > \"{}\"\n",
            bin.join("pip-args.txt").display()
        ),
    );

    let pyinstaller = bin.join("pyinstaller");
    write_script(
        &pyinstaller,
        "#!/bin/sh\nif [ \"$1\" = \"--version\" ]; then\n  echo \"6.3.0\"\n  exit 0\nfi\necho \"$@\" > pyinstaller-args.txt\nmkdir -p dist\n",
    );

    let config_dir = home.join(".config").join("pyfreeze");
    fs::create_dir_all(&config_dir).expect("create config dir");
    fs::write(
        config_dir.join("config.toml"),
        format!(
            "version = 1\n\n[tools]\npython = \"{}\"\npyinstaller = \"{}\"\neditor = \"true\"\n",
            python.display(),
            pyinstaller.display()
        ),
    )
    .expect("write config");

    bin
}

#[cfg(unix)]
fn write_script(path: &Path, body: &str) {
    use std::os::unix::fs::PermissionsExt;

    fs::write(path, body).expect("write script");
    let mut permissions = fs::metadata(path).expect("script metadata").permissions();
    permissions.set_mode(0o755);
    fs::set_permissions(path, permissions).expect("chmod script");
}
