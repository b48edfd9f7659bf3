//! BDD tests for the locate-or-install workflow.

use camino::Utf8PathBuf;
use flate2::Compression;
use flate2::write::GzEncoder;
use lintwrap_installer::artefact::download::{DownloadError, ReleaseDownloader};
use lintwrap_installer::artefact::extraction::BinaryExtractor;
use lintwrap_installer::error::InstallerError;
use lintwrap_installer::install::{InstallConfig, ensure_binary_with};
use lintwrap_installer::platform::Platform;
use lintwrap_installer::release::{TOOL_NAME, Version};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const BINARY: &[u8] = b"#!/bin/sh\nexit 0\n";

/// Serves synthetic release archives and records requested URLs.
struct StubDownloader {
    published: bool,
    requested: Mutex<Vec<String>>,
}

impl StubDownloader {
    fn new(published: bool) -> Self {
        Self {
            published,
            requested: Mutex::new(Vec::new()),
        }
    }

    fn archive_for(url: &str) -> Vec<u8> {
        let asset = url.rsplit('/').next().unwrap_or_default();
        if asset.ends_with(".zip") {
            let stem = asset.trim_end_matches(".zip");
            let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
            let options = zip::write::SimpleFileOptions::default().unix_permissions(0o755);
            writer
                .start_file(format!("{stem}/{TOOL_NAME}.exe"), options)
                .expect("start entry");
            writer.write_all(BINARY).expect("write entry");
            writer.finish().expect("zip finish").into_inner()
        } else {
            let stem = asset.trim_end_matches(".tar.gz");
            let mut builder =
                tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
            let mut header = tar::Header::new_gnu();
            header.set_size(BINARY.len() as u64);
            header.set_mode(0o755);
            builder
                .append_data(&mut header, format!("{stem}/{TOOL_NAME}"), BINARY)
                .expect("append entry");
            builder
                .into_inner()
                .expect("tar finish")
                .finish()
                .expect("gzip finish")
        }
    }
}

impl ReleaseDownloader for StubDownloader {
    fn download(
        &self,
        url: &str,
        dest_dir: &Path,
        _log: &mut dyn Write,
    ) -> Result<PathBuf, DownloadError> {
        self.requested.lock().expect("lock").push(url.to_owned());
        if !self.published {
            return Err(DownloadError::NotFound {
                url: url.to_owned(),
            });
        }
        let path = dest_dir.join(url.rsplit('/').next().unwrap_or("archive"));
        std::fs::write(&path, Self::archive_for(url))?;
        Ok(path)
    }

    fn download_text(&self, url: &str) -> Result<String, DownloadError> {
        Err(DownloadError::NotFound {
            url: url.to_owned(),
        })
    }
}

#[derive(Default)]
struct InstallWorld {
    _temp_dir: Option<tempfile::TempDir>,
    tools_root: Option<Utf8PathBuf>,
    config: Option<InstallConfig>,
    published: bool,
    requested: Vec<String>,
    result: Option<Result<Utf8PathBuf, InstallerError>>,
}

impl InstallWorld {
    fn config(&self) -> &InstallConfig {
        self.config.as_ref().expect("release configured")
    }
}

#[fixture]
fn world() -> InstallWorld {
    let temp_dir = tempfile::tempdir().expect("temp dir");
    let tools_root = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).expect("UTF-8 path");
    InstallWorld {
        _temp_dir: Some(temp_dir),
        tools_root: Some(tools_root),
        ..Default::default()
    }
}

fn configure(world: &mut InstallWorld, version: &str, os: &str, arch: &str, published: bool) {
    let tools_root = world.tools_root.clone().expect("tools root set");
    world.config = Some(InstallConfig::new(
        Version::parse(version).expect("valid version"),
        Platform::new(os, arch).expect("supported platform"),
        tools_root,
    ));
    world.published = published;
}

#[given("a published release \"{version}\" for \"{os}\" on \"{arch}\"")]
fn given_published_release(world: &mut InstallWorld, version: String, os: String, arch: String) {
    configure(world, &version, &os, &arch, true);
}

#[given("an unpublished release \"{version}\" for \"{os}\" on \"{arch}\"")]
fn given_unpublished_release(world: &mut InstallWorld, version: String, os: String, arch: String) {
    configure(world, &version, &os, &arch, false);
}

#[given("the binary is already installed")]
fn given_already_installed(world: &mut InstallWorld) {
    let path = world.config().install_path();
    std::fs::create_dir_all(path.parent().expect("parent")).expect("create bin dir");
    std::fs::write(&path, BINARY).expect("write binary");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).expect("chmod");
    }
}

#[when("the linter binary is ensured")]
fn when_binary_ensured(world: &mut InstallWorld) {
    let downloader = StubDownloader::new(world.published);
    let extractor = BinaryExtractor::new(TOOL_NAME);
    let mut log = Vec::new();
    let result = ensure_binary_with(world.config(), &downloader, &extractor, &mut log);
    world.requested = downloader.requested.into_inner().expect("lock");
    world.result = Some(result);
}

#[then("the binary is installed at \"{relative}\"")]
fn then_installed_at(world: &mut InstallWorld, relative: String) {
    let expected = world.tools_root.as_ref().expect("tools root set").join(relative);
    let result = world.result.as_ref().expect("result set");
    match result {
        Ok(path) => assert_eq!(path, &expected),
        Err(e) => panic!("expected install to succeed, got {e}"),
    }
    assert_eq!(std::fs::read(&expected).expect("read binary"), BINARY);
}

#[then("{count} download was requested")]
fn then_one_download(world: &mut InstallWorld, count: usize) {
    assert_eq!(world.requested.len(), count, "requested: {:?}", world.requested);
}

#[then("{count} downloads were requested")]
fn then_downloads(world: &mut InstallWorld, count: usize) {
    assert_eq!(world.requested.len(), count, "requested: {:?}", world.requested);
}

#[then("the requested asset is \"{asset}\"")]
fn then_requested_asset(world: &mut InstallWorld, asset: String) {
    let url = world.requested.first().expect("a download was requested");
    assert!(url.ends_with(&format!("/{asset}")), "unexpected URL {url}");
}

#[then("the install fails mentioning \"{keyword}\"")]
fn then_install_fails(world: &mut InstallWorld, keyword: String) {
    let result = world.result.as_ref().expect("result set");
    match result {
        Err(e) => {
            let message = e.to_string().to_lowercase();
            assert!(
                message.contains(&keyword.to_lowercase()),
                "expected '{keyword}' in: {message}"
            );
        }
        Ok(path) => panic!("expected failure, got {path}"),
    }
}

#[then("no binary is installed")]
fn then_no_binary(world: &mut InstallWorld) {
    let path = world.config().install_path();
    assert!(!path.exists(), "unexpected binary at {path}");
}

#[scenario(
    path = "tests/features/install.feature",
    name = "Missing binary is downloaded and installed"
)]
fn scenario_missing_binary(world: InstallWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/install.feature",
    name = "Installed binary is reused without downloading"
)]
fn scenario_installed_binary(world: InstallWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/install.feature",
    name = "Windows releases are fetched as zip archives"
)]
fn scenario_windows_zip(world: InstallWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/install.feature",
    name = "Missing release aborts the install"
)]
fn scenario_missing_release(world: InstallWorld) {
    let _ = world;
}
