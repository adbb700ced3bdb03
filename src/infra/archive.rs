use log::{debug, info};
use std::fs::File;
use std::io::{self, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tempfile::{Builder, NamedTempFile};
use zip::ZipArchive;

use super::SubtitleIndex;
use crate::error::{Result, SubDlError};

#[derive(Debug, PartialEq, Eq)]
pub struct Unpacked {
    pub path: PathBuf,
    pub overwritten: bool,
}

/// Downloads the subtitle archive behind `link` into `destination` and places
/// its subtitle at `<destination>/<release_name>.srt`.
///
/// The archive is held in a temporary file inside `destination` and removed
/// when this returns, whatever the outcome.
pub fn fetch_and_unpack(
    index: &dyn SubtitleIndex,
    link: &str,
    destination: &Path,
    release_name: &str,
) -> Result<Unpacked> {
    let mut archive = Builder::new()
        .prefix("subtitle")
        .suffix(".zip")
        .tempfile_in(destination)
        .map_err(|e| SubDlError::io("Failed to create archive in", destination, e))?;

    let size = index.download(link, archive.as_file_mut())?;
    debug!("Downloaded {size} bytes to {}", archive.path().display());

    archive
        .as_file_mut()
        .seek(SeekFrom::Start(0))
        .map_err(|e| SubDlError::io("Failed to rewind", archive.path(), e))?;

    unpack(archive.as_file_mut(), destination, release_name)
}

/// Extracts the first file of `archive` as `<destination>/<release_name>.srt`.
///
/// The entry is written to a temporary file first and then moved into place,
/// so a failed move leaves any previous subtitle untouched.
pub fn unpack(archive: &mut File, destination: &Path, release_name: &str) -> Result<Unpacked> {
    let target = destination.join(format!("{release_name}.srt"));
    let mut zip = ZipArchive::new(archive)?;

    let index = (0..zip.len())
        .find(|&i| zip.by_index(i).map(|entry| !entry.is_dir()).unwrap_or(false))
        .ok_or(SubDlError::EmptyArchive)?;

    let mut extracted: NamedTempFile = Builder::new()
        .prefix(".subtitle")
        .tempfile_in(destination)
        .map_err(|e| SubDlError::io("Failed to create file in", destination, e))?;
    {
        let mut entry = zip.by_index(index)?;
        debug!("Extracting {} from archive", entry.name());
        io::copy(&mut entry, extracted.as_file_mut())
            .map_err(|e| SubDlError::io("Failed to extract to", extracted.path(), e))?;
    }

    let overwritten = target.exists();
    if overwritten {
        println!("Previous subtitle file will be overwritten.");
    }

    // On failure the PersistError still owns the temp file, which is removed on drop.
    extracted
        .persist(&target)
        .map_err(|e| SubDlError::io("Failed to move subtitle to", &target, e.error))?;
    info!("Saved subtitle to {}", target.display());

    Ok(Unpacked {
        path: target,
        overwritten,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Rating, SearchRow};
    use std::fs;
    use std::io::{Cursor, Write};
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn zip_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in entries {
            if name.ends_with('/') {
                writer.add_directory(*name, SimpleFileOptions::default()).unwrap();
            } else {
                writer.start_file(*name, SimpleFileOptions::default()).unwrap();
                writer.write_all(content.as_bytes()).unwrap();
            }
        }
        writer.finish().unwrap().into_inner()
    }

    struct ArchiveIndex {
        archive: Vec<u8>,
    }

    impl SubtitleIndex for ArchiveIndex {
        fn search(&self, _: &str) -> Result<Vec<SearchRow>> {
            Ok(Vec::new())
        }

        fn rating(&self, _: &str) -> Result<Option<Rating>> {
            Ok(None)
        }

        fn download(&self, _: &str, out: &mut dyn Write) -> Result<u64> {
            out.write_all(&self.archive).unwrap();
            Ok(self.archive.len() as u64)
        }
    }

    fn leftover_files(dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_fetch_and_unpack_renames_subtitle() {
        let temp_dir = TempDir::new().unwrap();
        let index = ArchiveIndex {
            archive: zip_bytes(&[("some.other.name.srt", "1\n00:00:01,000 --> 00:00:02,000\nHi\n")]),
        };

        let unpacked =
            fetch_and_unpack(&index, "/subtitles/x", temp_dir.path(), "Release.Name").unwrap();
        assert_eq!(unpacked.path, temp_dir.path().join("Release.Name.srt"));
        assert!(!unpacked.overwritten);
        assert_eq!(
            fs::read_to_string(&unpacked.path).unwrap(),
            "1\n00:00:01,000 --> 00:00:02,000\nHi\n"
        );
        assert_eq!(leftover_files(temp_dir.path()), vec!["Release.Name.srt"]);
    }

    #[test]
    fn test_fetch_and_unpack_overwrites_existing_subtitle() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("Release.Name.srt"), "old").unwrap();
        let index = ArchiveIndex {
            archive: zip_bytes(&[("fresh.srt", "fresh")]),
        };

        let unpacked =
            fetch_and_unpack(&index, "/subtitles/x", temp_dir.path(), "Release.Name").unwrap();
        assert!(unpacked.overwritten);
        assert_eq!(fs::read_to_string(&unpacked.path).unwrap(), "fresh");
        assert_eq!(leftover_files(temp_dir.path()), vec!["Release.Name.srt"]);
    }

    #[test]
    fn test_unpack_skips_directory_entries() {
        let temp_dir = TempDir::new().unwrap();
        let index = ArchiveIndex {
            archive: zip_bytes(&[("subs/", ""), ("subs/inner.srt", "inner")]),
        };

        let unpacked =
            fetch_and_unpack(&index, "/subtitles/x", temp_dir.path(), "Release.Name").unwrap();
        assert_eq!(fs::read_to_string(unpacked.path).unwrap(), "inner");
    }

    #[test]
    fn test_empty_archive_is_an_error_and_cleans_up() {
        let temp_dir = TempDir::new().unwrap();
        let index = ArchiveIndex {
            archive: zip_bytes(&[]),
        };

        let err =
            fetch_and_unpack(&index, "/subtitles/x", temp_dir.path(), "Release.Name").unwrap_err();
        assert!(matches!(err, SubDlError::EmptyArchive));
        assert!(leftover_files(temp_dir.path()).is_empty());
    }

    #[test]
    fn test_corrupt_archive_is_an_error_and_cleans_up() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("Release.Name.srt"), "old").unwrap();
        let index = ArchiveIndex {
            archive: b"<html>not a zip</html>".to_vec(),
        };

        let err =
            fetch_and_unpack(&index, "/subtitles/x", temp_dir.path(), "Release.Name").unwrap_err();
        assert!(matches!(err, SubDlError::Archive(_)));
        assert_eq!(leftover_files(temp_dir.path()), vec!["Release.Name.srt"]);
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("Release.Name.srt")).unwrap(),
            "old"
        );
    }
}
