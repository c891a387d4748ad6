//! Single-binary extraction.
//!
//! Release assets wrap the executable in one of a handful of containers. The
//! extractor pulls exactly one entry, matched by base name, and writes it to
//! the destination with mode `0755`. Output is staged in a temp file next to
//! the destination and renamed into place, so a failed extraction never
//! leaves a truncated binary behind.

use std::fs;
use std::io::{self, Cursor, Read, Write};
use std::path::{Path, PathBuf};

use bytes::Bytes;
use flate2::read::GzDecoder;
use obt_schema::ContainerFormat;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;
use xz2::read::XzDecoder;
use zip::ZipArchive;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("'{entry}' not found in archive")]
    NotFound { entry: String },
}

/// Extract `entry` from a `format` stream into `dest`.
///
/// For [`ContainerFormat::RawBinary`] and [`ContainerFormat::Gzip`] the whole
/// (decompressed) payload is the binary and `entry` is ignored.
pub fn extract<R: Read>(
    reader: R,
    format: ContainerFormat,
    entry: &str,
    dest: &Path,
) -> Result<(), ExtractError> {
    debug!(%format, entry, dest = %dest.display(), "extracting");
    match format {
        ContainerFormat::RawBinary => extract_raw(reader, dest),
        ContainerFormat::Gzip => extract_gzip(reader, dest),
        ContainerFormat::TarGzip => extract_tar_gz(reader, entry, dest),
        ContainerFormat::TarXz => extract_tar_xz(reader, entry, dest),
        ContainerFormat::Zip => extract_zip(reader, entry, dest),
    }
}

/// Run [`extract`] over an in-memory download on the blocking pool.
pub async fn extract_bytes(
    data: Bytes,
    format: ContainerFormat,
    entry: String,
    dest: PathBuf,
) -> Result<(), ExtractError> {
    tokio::task::spawn_blocking(move || extract(&data[..], format, &entry, &dest))
        .await
        .map_err(io::Error::other)?
}

/// Copy the stream verbatim.
pub fn extract_raw<R: Read>(mut reader: R, dest: &Path) -> Result<(), ExtractError> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    write_executable(dest, &buf)
}

/// Decompress a single gzip member.
pub fn extract_gzip<R: Read>(reader: R, dest: &Path) -> Result<(), ExtractError> {
    extract_raw(GzDecoder::new(reader), dest)
}

/// Gzip-compressed tarball.
pub fn extract_tar_gz<R: Read>(reader: R, entry: &str, dest: &Path) -> Result<(), ExtractError> {
    let payload = find_in_tar(GzDecoder::new(reader), entry)?;
    write_executable(dest, &payload)
}

/// Xz-compressed tarball.
pub fn extract_tar_xz<R: Read>(reader: R, entry: &str, dest: &Path) -> Result<(), ExtractError> {
    let payload = find_in_tar(XzDecoder::new(reader), entry)?;
    write_executable(dest, &payload)
}

/// Zip archive. The central directory lives at the end, so the stream is
/// buffered in full first.
pub fn extract_zip<R: Read>(mut reader: R, entry: &str, dest: &Path) -> Result<(), ExtractError> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    let mut archive = ZipArchive::new(Cursor::new(data))?;

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        if file.is_dir() || base_name(file.name()) != entry {
            continue;
        }
        let mut buf = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut buf)?;
        return write_executable(dest, &buf);
    }

    Err(ExtractError::NotFound {
        entry: entry.to_string(),
    })
}

/// First regular file whose base name equals `entry`.
fn find_in_tar<R: Read>(reader: R, entry: &str) -> Result<Vec<u8>, ExtractError> {
    let mut archive = tar::Archive::new(reader);

    for item in archive.entries()? {
        let mut item = item?;
        if !item.header().entry_type().is_file() {
            continue;
        }
        let matches = {
            let path = item.path()?;
            path.file_name().is_some_and(|name| name == entry)
        };
        if matches {
            let mut buf = Vec::with_capacity(item.size() as usize);
            item.read_to_end(&mut buf)?;
            return Ok(buf);
        }
    }

    Err(ExtractError::NotFound {
        entry: entry.to_string(),
    })
}

/// Last path component of an archive entry name, for either separator.
fn base_name(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}

fn write_executable(dest: &Path, bytes: &[u8]) -> Result<(), ExtractError> {
    let dir = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(tmp.path(), fs::Permissions::from_mode(0o755))?;
    }

    tmp.persist(dest).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use zip::write::SimpleFileOptions;

    const SAMPLE: &[u8] = b"sample\n";

    fn tar_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut builder = tar::Builder::new(Vec::new());
        for (path, data) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            builder.append_data(&mut header, path, *data).unwrap();
        }
        builder.into_inner().unwrap()
    }

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(data).unwrap();
        enc.finish().unwrap()
    }

    fn xz(data: &[u8]) -> Vec<u8> {
        let mut enc = xz2::write::XzEncoder::new(Vec::new(), 6);
        enc.write_all(data).unwrap();
        enc.finish().unwrap()
    }

    fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (path, data) in entries {
            writer
                .start_file(*path, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    fn assert_sample(dest: &Path) {
        assert_eq!(fs::read(dest).unwrap(), SAMPLE);
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(dest).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o755);
        }
    }

    #[test]
    fn test_extract_raw() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("sample");
        extract(SAMPLE, ContainerFormat::RawBinary, "ignored", &dest).unwrap();
        assert_sample(&dest);
    }

    #[test]
    fn test_extract_gzip() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("sample");
        let data = gzip(SAMPLE);
        extract(&data[..], ContainerFormat::Gzip, "ignored", &dest).unwrap();
        assert_sample(&dest);
    }

    #[test]
    fn test_extract_tar_gz() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("sample");
        let data = gzip(&tar_bytes(&[("sample.txt", SAMPLE)]));
        extract(&data[..], ContainerFormat::TarGzip, "sample.txt", &dest).unwrap();
        assert_sample(&dest);
    }

    #[test]
    fn test_extract_tar_xz() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("sample");
        let data = xz(&tar_bytes(&[("sample.txt", SAMPLE)]));
        extract(&data[..], ContainerFormat::TarXz, "sample.txt", &dest).unwrap();
        assert_sample(&dest);
    }

    #[test]
    fn test_extract_zip() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("sample");
        let data = zip_bytes(&[("sample.txt", SAMPLE)]);
        extract(&data[..], ContainerFormat::Zip, "sample.txt", &dest).unwrap();
        assert_sample(&dest);
    }

    #[test]
    fn test_entry_in_nested_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("tool");
        let data = gzip(&tar_bytes(&[
            ("tool-1.2.0/README.md", b"readme".as_slice()),
            ("tool-1.2.0/bin/tool", SAMPLE),
        ]));
        extract(&data[..], ContainerFormat::TarGzip, "tool", &dest).unwrap();
        assert_sample(&dest);

        let dest = tmp.path().join("tool-zip");
        let data = zip_bytes(&[("tool-1.2.0/tool", SAMPLE)]);
        extract(&data[..], ContainerFormat::Zip, "tool", &dest).unwrap();
        assert_sample(&dest);
    }

    #[test]
    fn test_base_name_must_match_exactly() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("fd");
        let data = gzip(&tar_bytes(&[
            ("pkg/autocomplete/_fd", b"completion".as_slice()),
            ("pkg/fd", SAMPLE),
        ]));
        extract(&data[..], ContainerFormat::TarGzip, "fd", &dest).unwrap();
        assert_sample(&dest);
    }

    #[test]
    fn test_first_match_wins() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("tool");
        let data = gzip(&tar_bytes(&[
            ("a/tool", SAMPLE),
            ("b/tool", b"other".as_slice()),
        ]));
        extract(&data[..], ContainerFormat::TarGzip, "tool", &dest).unwrap();
        assert_sample(&dest);
    }

    #[test]
    fn test_not_found_leaves_destination_untouched() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("tool");
        fs::write(&dest, b"old").unwrap();

        let data = gzip(&tar_bytes(&[("other", SAMPLE)]));
        let err = extract(&data[..], ContainerFormat::TarGzip, "tool", &dest).unwrap_err();
        assert!(matches!(err, ExtractError::NotFound { ref entry } if entry == "tool"));
        assert_eq!(fs::read(&dest).unwrap(), b"old");

        let data = zip_bytes(&[("other", SAMPLE)]);
        let err = extract(&data[..], ContainerFormat::Zip, "tool", &dest).unwrap_err();
        assert!(matches!(err, ExtractError::NotFound { .. }));
        assert_eq!(fs::read(&dest).unwrap(), b"old");
    }

    #[test]
    fn test_corrupt_stream_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("tool");

        let err = extract(&b"not gzip"[..], ContainerFormat::Gzip, "tool", &dest);
        assert!(err.is_err());
        assert!(!dest.exists());

        let err = extract(&b"not zip"[..], ContainerFormat::Zip, "tool", &dest);
        assert!(matches!(err, Err(ExtractError::Archive(_))));
        assert!(!dest.exists());
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("tool");
        let data = gzip(&tar_bytes(&[("other", SAMPLE)]));
        let _ = extract(&data[..], ContainerFormat::TarGzip, "tool", &dest);
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("a/b/tool"), "tool");
        assert_eq!(base_name("a\\tool.exe"), "tool.exe");
        assert_eq!(base_name("tool"), "tool");
    }

    #[tokio::test]
    async fn test_extract_bytes_on_blocking_pool() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("sample");
        let data = Bytes::from(zip_bytes(&[("sample.txt", SAMPLE)]));
        extract_bytes(data, ContainerFormat::Zip, "sample.txt".into(), dest.clone())
            .await
            .unwrap();
        assert_sample(&dest);
    }
}
