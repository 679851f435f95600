//! Tests for the command handlers.

use super::*;
use crate::artefact::download::MockArtefactDownloader;
use crate::artefact::extraction::MockArtefactExtractor;
use crate::dirs::MockBaseDirs;
use crate::test_utils::{StubOutcome, StubRunner};
use crate::tools::ToolKind;
use rstest::{fixture, rstest};
use std::fs;
use tempfile::TempDir;

struct Buffers {
    stdout: Vec<u8>,
    stderr: Vec<u8>,
}

impl Buffers {
    fn console(&mut self, quiet: bool) -> Console<'_> {
        Console {
            stdout: &mut self.stdout,
            stderr: &mut self.stderr,
            quiet,
        }
    }

    fn stdout_text(&self) -> String {
        String::from_utf8(self.stdout.clone()).expect("utf-8 stdout")
    }

    fn stderr_text(&self) -> String {
        String::from_utf8(self.stderr.clone()).expect("utf-8 stderr")
    }
}

#[fixture]
fn buffers() -> Buffers {
    Buffers {
        stdout: Vec::new(),
        stderr: Vec::new(),
    }
}

#[fixture]
fn temp_root() -> (TempDir, Utf8PathBuf) {
    let dir = TempDir::new().expect("temp dir");
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir");
    (dir, root)
}

fn install_args(install_dir: Option<Utf8PathBuf>, print_path: bool) -> InstallArgs {
    InstallArgs {
        tool: ToolKind::Bitcoin,
        version: "27.0".parse().expect("valid version"),
        install_dir,
        sha256: None,
        print_path,
    }
}

fn unpacking_extractor() -> MockArtefactExtractor {
    let mut extractor = MockArtefactExtractor::new();
    extractor.expect_extract().times(1).returning(|_, dest| {
        fs::create_dir_all(dest.join("bitcoin-27.0").join("bin")).expect("create bin dir");
        Ok(1)
    });
    extractor
}

fn unused_dirs() -> MockBaseDirs {
    MockBaseDirs::new()
}

#[rstest]
fn unsupported_host_fails_before_download(mut buffers: Buffers) {
    let downloader = MockArtefactDownloader::new();
    let extractor = MockArtefactExtractor::new();
    let dirs = unused_dirs();
    let context = InstallContext {
        dirs: &dirs,
        downloader: &downloader,
        extractor: &extractor,
    };
    let host = Platform::from_os_arch("freebsd", "x86_64");

    let err = run_install(
        &install_args(Some(Utf8PathBuf::from("/unused")), false),
        host,
        &context,
        &mut buffers.console(false),
    )
    .expect_err("unsupported host");
    assert!(matches!(err, CliError::UnsupportedPlatform(_)));
    assert!(buffers.stderr.is_empty());
}

#[rstest]
fn install_prints_bin_dir_with_print_path(
    mut buffers: Buffers,
    temp_root: (TempDir, Utf8PathBuf),
) {
    let (_guard, root) = temp_root;
    let mut downloader = MockArtefactDownloader::new();
    downloader
        .expect_download()
        .withf(|url, _| {
            url == "https://bitcoincore.org/bin/bitcoin-core-27.0/bitcoin-27.0-x86_64-linux-gnu.tar.gz"
        })
        .times(1)
        .returning(|_, _| Ok(()));
    let extractor = unpacking_extractor();
    let dirs = unused_dirs();
    let context = InstallContext {
        dirs: &dirs,
        downloader: &downloader,
        extractor: &extractor,
    };

    let bin_dir = run_install(
        &install_args(Some(root.clone()), true),
        Ok(Platform::Linux),
        &context,
        &mut buffers.console(false),
    )
    .expect("install");

    assert_eq!(bin_dir, root.join("bitcoin-27.0").join("bin"));
    assert_eq!(buffers.stdout_text(), format!("{bin_dir}\n"));
    assert!(buffers.stderr_text().contains("bitcoin 27.0 is available"));
}

#[rstest]
fn install_shows_path_snippet_by_default(
    mut buffers: Buffers,
    temp_root: (TempDir, Utf8PathBuf),
) {
    let (_guard, root) = temp_root;
    fs::create_dir_all(root.join("bitcoin-27.0").join("bin")).expect("pre-installed");
    let downloader = MockArtefactDownloader::new();
    let extractor = MockArtefactExtractor::new();
    let dirs = unused_dirs();
    let context = InstallContext {
        dirs: &dirs,
        downloader: &downloader,
        extractor: &extractor,
    };

    run_install(
        &install_args(Some(root), false),
        Ok(Platform::Linux),
        &context,
        &mut buffers.console(false),
    )
    .expect("cached install");

    assert!(buffers.stdout.is_empty());
    assert!(buffers.stderr_text().contains("export PATH="));
}

#[rstest]
fn install_falls_back_to_data_dir(mut buffers: Buffers, temp_root: (TempDir, Utf8PathBuf)) {
    let (_guard, root) = temp_root;
    let data_dir = root.clone();
    let mut dirs = MockBaseDirs::new();
    dirs.expect_data_dir().returning(move || Some(data_dir.clone()));
    let mut downloader = MockArtefactDownloader::new();
    downloader.expect_download().times(1).returning(|_, _| Ok(()));
    let extractor = unpacking_extractor();
    let context = InstallContext {
        dirs: &dirs,
        downloader: &downloader,
        extractor: &extractor,
    };

    let bin_dir = run_install(
        &install_args(None, false),
        Ok(Platform::Linux),
        &context,
        &mut buffers.console(true),
    )
    .expect("install");

    assert_eq!(bin_dir, root.join("tools").join("bitcoin-27.0").join("bin"));
    assert!(buffers.stderr.is_empty(), "quiet mode prints nothing");
}

#[rstest]
fn install_without_any_directory_fails(mut buffers: Buffers) {
    let mut dirs = MockBaseDirs::new();
    dirs.expect_data_dir().returning(|| None);
    let downloader = MockArtefactDownloader::new();
    let extractor = MockArtefactExtractor::new();
    let context = InstallContext {
        dirs: &dirs,
        downloader: &downloader,
        extractor: &extractor,
    };

    let err = run_install(
        &install_args(None, false),
        Ok(Platform::Windows),
        &context,
        &mut buffers.console(false),
    )
    .expect_err("no install dir");
    assert!(matches!(err, CliError::NoInstallDir));
}

const CONFIG: &str = r#"
[app]
name = "Bisq2"
vendor = "Bisq"
version = "2.1.0"
license_file = "LICENSE"
main_artifact = "desktop-app-all.jar"
main_entry_point = "bisq.desktop_app_launcher.DesktopAppLauncher"
input_dir = "input"
runtime_image_dir = "runtime"
output_dir = "packaging/out"

[[format]]
tag = "deb"

[[format]]
tag = "rpm"
"#;

fn package_args(root: &Utf8PathBuf, formats: &[&str]) -> PackageArgs {
    let config = root.join("packaging.toml");
    fs::write(&config, CONFIG).expect("write config");
    PackageArgs {
        config,
        tool: Some(Utf8PathBuf::from("/opt/jdk/bin/jpackage")),
        formats: formats.iter().map(|tag| (*tag).to_owned()).collect(),
        timeout_secs: Some(30),
    }
}

#[rstest]
fn package_runs_every_configured_format(
    mut buffers: Buffers,
    temp_root: (TempDir, Utf8PathBuf),
) {
    let (_guard, root) = temp_root;
    let runner = StubRunner::succeeding();
    let built = run_package(
        &package_args(&root, &[]),
        &runner,
        &mut buffers.console(false),
    )
    .expect("package");

    assert_eq!(built.len(), 2);
    let calls = runner.invocations();
    assert_eq!(calls[0].program, Utf8PathBuf::from("/opt/jdk/bin/jpackage"));
    assert_eq!(calls[0].timeout, Duration::from_secs(30));
    let input = root.join("input");
    assert_eq!(calls[0].value_of("--input"), Some(input.as_str()));
    let stderr = buffers.stderr_text();
    assert!(stderr.contains("Packaging Bisq2 2.1.0 as deb, rpm"));
    assert!(stderr.contains("Built 2 packages"));
}

#[rstest]
fn package_filters_formats(mut buffers: Buffers, temp_root: (TempDir, Utf8PathBuf)) {
    let (_guard, root) = temp_root;
    let runner = StubRunner::succeeding();
    run_package(
        &package_args(&root, &["rpm"]),
        &runner,
        &mut buffers.console(true),
    )
    .expect("package");

    let calls = runner.invocations();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].value_of("--type"), Some("rpm"));
}

#[rstest]
fn package_failure_is_surfaced(mut buffers: Buffers, temp_root: (TempDir, Utf8PathBuf)) {
    let (_guard, root) = temp_root;
    let runner = StubRunner::with_outcomes(vec![StubOutcome::Exit(2)]);
    let err = run_package(
        &package_args(&root, &[]),
        &runner,
        &mut buffers.console(false),
    )
    .expect_err("deb fails");

    assert!(matches!(err, CliError::Packaging(_)));
    assert_eq!(runner.invocations().len(), 2);
}

#[rstest]
fn hash_manifest_defaults_label_to_host(
    mut buffers: Buffers,
    temp_root: (TempDir, Utf8PathBuf),
) {
    let (_guard, root) = temp_root;
    let artefact = root.join("Bisq-2.1.0.dmg");
    fs::write(&artefact, b"abc").expect("write artefact");
    let args = HashManifestArgs {
        output: root.join("out").join("hashes.txt"),
        label: None,
        files: vec![artefact],
    };

    let manifest = run_hash_manifest(&args, Ok(Platform::MacOsArm64), &mut buffers.console(false))
        .expect("manifest");

    assert_eq!(manifest.records()[0].platform_label, "macOS");
    let written = fs::read_to_string(&args.output).expect("manifest file");
    assert!(written.starts_with("macOS:Bisq-2.1.0.dmg:ba7816bf"));
    assert!(written.ends_with('\n'));
}

#[rstest]
fn hash_manifest_label_ignores_host(mut buffers: Buffers, temp_root: (TempDir, Utf8PathBuf)) {
    let (_guard, root) = temp_root;
    let artefact = root.join("a.exe");
    fs::write(&artefact, b"abc").expect("write artefact");
    let args = HashManifestArgs {
        output: root.join("hashes.txt"),
        label: Some("windows".to_owned()),
        files: vec![artefact],
    };

    let host = Platform::from_os_arch("haiku", "x86_64");
    run_hash_manifest(&args, host, &mut buffers.console(true)).expect("manifest");
}

#[rstest]
fn hash_manifest_needs_host_without_label(mut buffers: Buffers) {
    let args = HashManifestArgs {
        output: Utf8PathBuf::from("/unused/hashes.txt"),
        label: None,
        files: vec![Utf8PathBuf::from("/unused/a.exe")],
    };
    let host = Platform::from_os_arch("haiku", "x86_64");
    let err = run_hash_manifest(&args, host, &mut buffers.console(false)).expect_err("no label");
    assert!(matches!(err, CliError::UnsupportedPlatform(_)));
}
