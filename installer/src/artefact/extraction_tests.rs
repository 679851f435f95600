//! Tests for archive format dispatch and extraction.

use super::*;
use flate2::Compression;
use flate2::write::GzEncoder;
use rstest::rstest;
use std::io::Write;

/// Build a `.tar.gz` containing `entries` as `(archive_name, contents)`.
fn write_tar_gz(path: &Path, entries: &[(&str, &[u8])]) {
    let file = File::create(path).expect("create archive");
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (name, contents) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o755);
        header.set_cksum();
        builder
            .append_data(&mut header, name, *contents)
            .expect("append");
    }
    let encoder = builder.into_inner().expect("tar finish");
    encoder.finish().expect("gzip finish");
}

/// A tarball member used by the link tests.
enum Member<'a> {
    File(&'a str, &'a [u8]),
    Symlink(&'a str, &'a str),
    HardLink(&'a str, &'a str),
}

/// Build a `.tar.gz` from `members`, including link entries.
fn write_tar_gz_members(path: &Path, members: &[Member<'_>]) {
    let file = File::create(path).expect("create archive");
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for member in members {
        let mut header = tar::Header::new_gnu();
        match member {
            Member::File(name, contents) => {
                header.set_size(contents.len() as u64);
                header.set_mode(0o644);
                header.set_cksum();
                builder
                    .append_data(&mut header, name, *contents)
                    .expect("append file");
            }
            Member::Symlink(name, target) | Member::HardLink(name, target) => {
                let kind = if matches!(member, Member::Symlink(..)) {
                    tar::EntryType::Symlink
                } else {
                    tar::EntryType::Link
                };
                header.set_entry_type(kind);
                header.set_size(0);
                header.set_mode(0o777);
                header.set_link_name(target).expect("link name");
                header.set_cksum();
                builder
                    .append_data(&mut header, name, std::io::empty())
                    .expect("append link");
            }
        }
    }
    let encoder = builder.into_inner().expect("tar finish");
    encoder.finish().expect("gzip finish");
}

/// Build a `.zip` containing `entries` as `(archive_name, contents)`.
fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
    let file = File::create(path).expect("create archive");
    let mut writer = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default().unix_permissions(0o755);
    for (name, contents) in entries {
        writer.start_file(*name, options).expect("start file");
        writer.write_all(contents).expect("write entry");
    }
    writer.finish().expect("zip finish");
}

#[rstest]
#[case::tar_gz("x.tar.gz", ArchiveFormat::TarGz)]
#[case::zip("x.zip", ArchiveFormat::Zip)]
#[case::nested_dirs("/downloads/bitcoin-27.0-x86_64-linux-gnu.tar.gz", ArchiveFormat::TarGz)]
fn dispatches_on_suffix(#[case] name: &str, #[case] expected: ArchiveFormat) {
    let format = ArchiveFormat::from_path(Path::new(name)).expect("supported");
    assert_eq!(format, expected);
}

#[rstest]
#[case::seven_zip("x.7z")]
#[case::bare_tar("x.tar")]
#[case::tgz("x.tgz")]
#[case::dmg("bitcoin-27.0-x86_64-apple-darwin.dmg")]
fn rejects_unknown_suffix(#[case] name: &str) {
    let err = ArchiveFormat::from_path(Path::new(name)).expect_err("unsupported");
    let ExtractionError::UnsupportedArchiveFormat { file_name } = err else {
        panic!("expected UnsupportedArchiveFormat, got {err:?}");
    };
    assert_eq!(file_name, name);
}

#[test]
fn unsupported_archive_is_rejected_before_opening() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = ArchiveExtractor
        .extract(&dir.path().join("absent.7z"), dir.path())
        .expect_err("unsupported");
    assert!(matches!(err, ExtractionError::UnsupportedArchiveFormat { .. }));
}

#[test]
fn extracts_tar_gz_release() {
    let dir = tempfile::tempdir().expect("temp dir");
    let archive = dir.path().join("tool-3.2.1-x86_64-linux-gnu.tar.gz");
    write_tar_gz(
        &archive,
        &[
            ("tool-3.2.1/bin/toold", b"#!/bin/sh\n".as_slice()),
            ("tool-3.2.1/README", b"readme".as_slice()),
        ],
    );
    let dest = dir.path().join("install");
    std::fs::create_dir_all(&dest).expect("mkdir");

    let count = ArchiveExtractor.extract(&archive, &dest).expect("extract");
    assert_eq!(count, 2);
    assert!(dest.join("tool-3.2.1/bin/toold").is_file());
    assert_eq!(
        std::fs::read(dest.join("tool-3.2.1/README")).expect("read"),
        b"readme"
    );
}

#[test]
fn extracts_zip_release() {
    let dir = tempfile::tempdir().expect("temp dir");
    let archive = dir.path().join("tool-3.2.1-win64.zip");
    write_zip(&archive, &[("tool-3.2.1/bin/toold.exe", b"MZ".as_slice())]);
    let dest = dir.path().join("install");

    let count = ArchiveExtractor.extract(&archive, &dest).expect("extract");
    assert_eq!(count, 1);
    assert_eq!(
        std::fs::read(dest.join("tool-3.2.1/bin/toold.exe")).expect("read"),
        b"MZ"
    );
}

#[cfg(unix)]
#[test]
fn zip_extraction_keeps_executable_bit() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().expect("temp dir");
    let archive = dir.path().join("tool.zip");
    write_zip(&archive, &[("bin/tool", b"#!/bin/sh\n".as_slice())]);
    let dest = dir.path().join("out");

    ArchiveExtractor.extract(&archive, &dest).expect("extract");
    let mode = std::fs::metadata(dest.join("bin/tool"))
        .expect("metadata")
        .permissions()
        .mode();
    assert_eq!(mode & 0o111, 0o111);
}

#[test]
fn zip_with_parent_components_is_rejected() {
    let dir = tempfile::tempdir().expect("temp dir");
    let archive = dir.path().join("evil.zip");
    write_zip(&archive, &[("../escape.txt", b"nope".as_slice())]);
    let dest = dir.path().join("out");

    let err = ArchiveExtractor.extract(&archive, &dest).expect_err("traversal");
    assert!(matches!(err, ExtractionError::PathTraversal { .. }));
    assert!(!dir.path().join("escape.txt").exists());
}

#[test]
fn empty_tarball_is_rejected() {
    let dir = tempfile::tempdir().expect("temp dir");
    let archive = dir.path().join("empty.tar.gz");
    write_tar_gz(&archive, &[]);

    let err = ArchiveExtractor
        .extract(&archive, dir.path())
        .expect_err("empty");
    assert!(matches!(err, ExtractionError::EmptyArchive));
}

#[test]
fn corrupt_tarball_reports_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let archive = dir.path().join("broken.tar.gz");
    std::fs::write(&archive, b"definitely not gzip".as_slice()).expect("write");

    let err = ArchiveExtractor
        .extract(&archive, dir.path())
        .expect_err("corrupt");
    assert!(matches!(err, ExtractionError::Io(_)));
}

#[rstest]
#[case::parent_dir("../escape.txt")]
#[case::nested_parent("foo/../../escape.txt")]
#[case::absolute("/etc/passwd")]
fn rejects_path_traversal(#[case] bad_path: &str) {
    let result = validate_entry_path(Path::new(bad_path));
    assert!(
        matches!(result, Err(ExtractionError::PathTraversal { .. })),
        "expected PathTraversal for {bad_path}"
    );
}

#[test]
fn accepts_normal_paths() {
    assert!(validate_entry_path(Path::new("bitcoin-27.0/bin/bitcoind")).is_ok());
}

#[cfg(unix)]
#[test]
fn symlink_pointing_outside_cannot_be_written_through() {
    let dir = tempfile::tempdir().expect("temp dir");
    let outside = dir.path().join("outside");
    std::fs::create_dir_all(&outside).expect("mkdir outside");
    let archive = dir.path().join("tool-1.tar.gz");
    let target = outside.to_str().expect("utf-8 temp path");
    write_tar_gz_members(
        &archive,
        &[
            Member::Symlink("tool-1/link", target),
            Member::File("tool-1/link/pwned.txt", b"escaped".as_slice()),
        ],
    );
    let dest = dir.path().join("install");

    let err = ArchiveExtractor.extract(&archive, &dest).expect_err("traversal");
    assert!(matches!(err, ExtractionError::PathTraversal { .. }), "{err:?}");
    assert!(!outside.join("pwned.txt").exists());
}

#[rstest]
#[case::relative_symlink(Member::Symlink("tool-1/link", "../../outside"))]
#[case::absolute_symlink(Member::Symlink("tool-1/link", "/etc"))]
#[case::escaping_hard_link(Member::HardLink("tool-1/passwd", "../outside/secret"))]
fn escaping_link_targets_are_rejected(#[case] member: Member<'static>) {
    let dir = tempfile::tempdir().expect("temp dir");
    let archive = dir.path().join("tool-1.tar.gz");
    write_tar_gz_members(&archive, &[member]);
    let dest = dir.path().join("install");

    let err = ArchiveExtractor.extract(&archive, &dest).expect_err("traversal");
    assert!(matches!(err, ExtractionError::PathTraversal { .. }), "{err:?}");
}

#[cfg(unix)]
#[test]
fn link_chain_leading_out_is_rejected() {
    let dir = tempfile::tempdir().expect("temp dir");
    let archive = dir.path().join("tool-1.tar.gz");
    write_tar_gz_members(
        &archive,
        &[
            Member::Symlink("a/up", ".."),
            Member::Symlink("a/up/out", ".."),
            Member::File("a/up/out/pwned.txt", b"escaped".as_slice()),
        ],
    );
    let dest = dir.path().join("install");

    let err = ArchiveExtractor.extract(&archive, &dest).expect_err("traversal");
    assert!(matches!(err, ExtractionError::PathTraversal { .. }), "{err:?}");
    assert!(!dir.path().join("pwned.txt").exists());
}

#[cfg(unix)]
#[test]
fn links_inside_the_release_are_kept() {
    let dir = tempfile::tempdir().expect("temp dir");
    let archive = dir.path().join("tool-1.tar.gz");
    write_tar_gz_members(
        &archive,
        &[
            Member::File("tool-1/lib/libtool.so.1", b"elf".as_slice()),
            Member::Symlink("tool-1/lib/libtool.so", "libtool.so.1"),
            Member::Symlink("tool-1/bin/libtool.so", "../lib/libtool.so.1"),
            Member::HardLink("tool-1/lib/libtool-copy.so", "tool-1/lib/libtool.so.1"),
        ],
    );
    let dest = dir.path().join("install");

    let count = ArchiveExtractor.extract(&archive, &dest).expect("extract");
    assert_eq!(count, 4);
    for name in [
        "tool-1/lib/libtool.so",
        "tool-1/bin/libtool.so",
        "tool-1/lib/libtool-copy.so",
    ] {
        assert_eq!(std::fs::read(dest.join(name)).expect("read"), b"elf", "{name}");
    }
}

#[rstest]
#[case::sibling("lib", "libtool.so.1", true)]
#[case::up_and_over("bin", "../lib/libtool.so.1", true)]
#[case::root_level("", "..", false)]
#[case::too_far("bin", "../../x", false)]
#[case::absolute("bin", "/usr/lib", false)]
fn link_targets_are_resolved_against_their_directory(
    #[case] base: &str,
    #[case] target: &str,
    #[case] inside: bool,
) {
    assert_eq!(stays_inside(Path::new(base), Path::new(target)), inside);
}
