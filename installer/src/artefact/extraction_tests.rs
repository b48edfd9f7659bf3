//! Unit tests for release archive extraction.

use super::*;
use flate2::Compression;
use flate2::write::GzEncoder;
use rstest::rstest;
use std::io::Write;
use tempfile::TempDir;

const BINARY: &[u8] = b"\x7fELF fake linter";
const PREFIX: &str = "golangci-lint";

struct Entry<'a> {
    name: &'a str,
    content: &'a [u8],
    mode: u32,
}

const fn entry<'a>(name: &'a str, content: &'a [u8], mode: u32) -> Entry<'a> {
    Entry {
        name,
        content,
        mode,
    }
}

fn build_tar_gz(dir: &TempDir, file_name: &str, entries: &[Entry<'_>]) -> PathBuf {
    let archive_path = dir.path().join(file_name);
    let file = File::create(&archive_path).expect("create archive");
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));

    for item in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(item.content.len() as u64);
        header.set_mode(item.mode);
        header.set_entry_type(tar::EntryType::Regular);
        header.set_cksum();
        builder
            .append_data(&mut header, item.name, item.content)
            .expect("append entry");
    }

    let encoder = builder.into_inner().expect("tar finish");
    encoder.finish().expect("gzip finish");
    archive_path
}

fn build_zip(dir: &TempDir, file_name: &str, entries: &[Entry<'_>]) -> PathBuf {
    let archive_path = dir.path().join(file_name);
    let file = File::create(&archive_path).expect("create archive");
    let mut writer = zip::ZipWriter::new(file);

    for item in entries {
        let options = zip::write::SimpleFileOptions::default().unix_permissions(item.mode);
        writer.start_file(item.name, options).expect("start entry");
        writer.write_all(item.content).expect("write entry");
    }

    writer.finish().expect("zip finish");
    archive_path
}

#[cfg(unix)]
fn mode_of(path: &Path) -> u32 {
    use std::os::unix::fs::PermissionsExt;

    fs::metadata(path).expect("metadata").permissions().mode() & 0o7777
}

#[rstest]
#[case::executable(0o755)]
#[case::owner_only(0o700)]
fn tar_gz_round_trip_preserves_content_and_mode(#[case] mode: u32) {
    let dir = tempfile::tempdir().expect("temp dir");
    let archive = build_tar_gz(
        &dir,
        "golangci-lint-1.56.2-linux-amd64.tar.gz",
        &[
            entry("golangci-lint-1.56.2-linux-amd64/README.md", b"readme", 0o644),
            entry("golangci-lint-1.56.2-linux-amd64/golangci-lint", BINARY, mode),
            entry("golangci-lint-1.56.2-linux-amd64/LICENSE", b"licence", 0o644),
        ],
    );
    let dest = dir.path().join("out-bin");

    BinaryExtractor::new(PREFIX)
        .extract(&archive, &dest)
        .expect("extract");

    assert_eq!(fs::read(&dest).expect("read extracted"), BINARY);
    #[cfg(unix)]
    assert_eq!(mode_of(&dest), mode);
}

#[test]
fn zip_round_trip_preserves_content_and_mode() {
    let dir = tempfile::tempdir().expect("temp dir");
    let archive = build_zip(
        &dir,
        "golangci-lint-1.56.2-windows-amd64.zip",
        &[
            entry("golangci-lint-1.56.2-windows-amd64/README.md", b"readme", 0o644),
            entry(
                "golangci-lint-1.56.2-windows-amd64/golangci-lint.exe",
                BINARY,
                0o750,
            ),
        ],
    );
    let dest = dir.path().join("out-bin.exe");

    BinaryExtractor::new(PREFIX)
        .extract(&archive, &dest)
        .expect("extract");

    assert_eq!(fs::read(&dest).expect("read extracted"), BINARY);
    #[cfg(unix)]
    assert_eq!(mode_of(&dest), 0o750);
}

#[rstest]
#[case::tar_gz("release.tar.gz")]
#[case::zip("release.zip")]
fn entries_without_prefix_are_never_extracted(#[case] file_name: &str) {
    let dir = tempfile::tempdir().expect("temp dir");
    let entries = [entry("dist/other-tool", BINARY, 0o755)];
    let archive = if file_name.ends_with(".zip") {
        build_zip(&dir, file_name, &entries)
    } else {
        build_tar_gz(&dir, file_name, &entries)
    };
    let dest = dir.path().join("out-bin");

    let err = BinaryExtractor::new(PREFIX)
        .extract(&archive, &dest)
        .expect_err("expected missing binary");

    assert!(matches!(err, ExtractionError::BinaryNotFound { .. }));
    assert!(!dest.exists(), "nothing should be written");
}

#[test]
fn prefix_is_matched_on_base_name_only() {
    let dir = tempfile::tempdir().expect("temp dir");
    let archive = build_tar_gz(
        &dir,
        "release.tar.gz",
        &[entry("golangci-lint-dir/not-the-binary", b"nope", 0o755)],
    );
    let dest = dir.path().join("out-bin");

    let err = BinaryExtractor::new(PREFIX)
        .extract(&archive, &dest)
        .expect_err("directory names must not match");
    assert!(matches!(err, ExtractionError::BinaryNotFound { .. }));
}

#[test]
fn last_matching_entry_wins() {
    let dir = tempfile::tempdir().expect("temp dir");
    let archive = build_tar_gz(
        &dir,
        "release.tar.gz",
        &[
            entry("a/golangci-lint", b"first", 0o755),
            entry("b/golangci-lint", b"second", 0o755),
        ],
    );
    let dest = dir.path().join("out-bin");

    BinaryExtractor::new(PREFIX)
        .extract(&archive, &dest)
        .expect("extract");

    assert_eq!(fs::read(&dest).expect("read extracted"), b"second");
}

#[test]
fn existing_destination_is_truncated() {
    let dir = tempfile::tempdir().expect("temp dir");
    let archive = build_tar_gz(
        &dir,
        "release.tar.gz",
        &[entry("golangci-lint", b"new", 0o755)],
    );
    let dest = dir.path().join("out-bin");
    fs::write(&dest, b"a much longer stale binary").expect("seed destination");

    BinaryExtractor::new(PREFIX)
        .extract(&archive, &dest)
        .expect("extract");

    assert_eq!(fs::read(&dest).expect("read extracted"), b"new");
}

#[test]
fn unknown_extension_is_rejected() {
    let dir = tempfile::tempdir().expect("temp dir");
    let archive = dir.path().join("release.tar.zst");
    fs::write(&archive, b"zstd").expect("write archive");

    let err = BinaryExtractor::new(PREFIX)
        .extract(&archive, &dir.path().join("out-bin"))
        .expect_err("expected unsupported format");
    assert!(matches!(err, ExtractionError::UnsupportedFormat { .. }));
}

#[rstest]
#[case::tar_gz("broken.tar.gz")]
#[case::zip("broken.zip")]
fn corrupt_archives_fail(#[case] file_name: &str) {
    let dir = tempfile::tempdir().expect("temp dir");
    let archive = dir.path().join(file_name);
    fs::write(&archive, b"definitely not an archive").expect("write archive");

    let result = BinaryExtractor::new(PREFIX).extract(&archive, &dir.path().join("out-bin"));
    assert!(
        matches!(
            result,
            Err(ExtractionError::Io(_) | ExtractionError::Zip(_))
        ),
        "unexpected result: {result:?}"
    );
}
