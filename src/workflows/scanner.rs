use log::debug;
use std::fs;
use std::path::Path;

use crate::domain::models::Release;
use crate::error::{Result, SubDlError};

/// Lists the releases in `media_dir`, sorted by name.
pub fn scan(media_dir: &Path) -> Result<Vec<Release>> {
    let entries =
        fs::read_dir(media_dir).map_err(|e| SubDlError::io("Failed to read", media_dir, e))?;

    let mut releases = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| SubDlError::io("Failed to read", media_dir, e))?;
        let Some(release) = Release::from_path(&entry.path()) else {
            debug!("Skipping non UTF-8 entry {:?}", entry.path());
            continue;
        };
        if Release::looks_like_release(&release.name) {
            releases.push(release);
        }
    }

    if releases.is_empty() {
        return Err(SubDlError::NoReleases(media_dir.display().to_string()));
    }

    releases.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(releases)
}

pub fn print_releases(releases: &[Release]) {
    for (nr, release) in releases.iter().enumerate() {
        println!(" ({})  {}", nr + 1, release.name);
    }
}

/// Parses `N` or `start-end` (1-based, inclusive) into a slice of `releases`.
/// An end past the last release is clamped.
pub fn choose<'a>(releases: &'a [Release], choice: &str) -> Result<&'a [Release]> {
    let invalid = || SubDlError::InvalidSelection(choice.trim().to_string());

    let (start, end) = match choice.trim().split_once('-') {
        Some((start, end)) => (start.trim(), end.trim()),
        None => (choice.trim(), choice.trim()),
    };
    let start: i64 = start.parse().map_err(|_| invalid())?;
    let end: i64 = end.parse().map_err(|_| invalid())?;

    let len = releases.len() as i64;
    if start <= 0 || end <= 0 || start > len || start > end {
        return Err(invalid());
    }
    let end = end.min(len);

    Ok(&releases[(start - 1) as usize..end as usize])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    const NAMES: [&str; 4] = [
        "A.Movie.2019.1080p.mkv",
        "B.Show.S01E01.720p.WEB.mkv",
        "C.Show.S01E02.720p.WEB.mkv",
        "D.Other.2020.2160p.mkv",
    ];

    fn releases() -> Vec<Release> {
        NAMES
            .iter()
            .map(|name| Release {
                path: Path::new("/media").join(name),
                name: name.to_string(),
                is_dir: false,
            })
            .collect()
    }

    #[test]
    fn test_scan_filters_and_sorts() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        File::create(dir.join("Zed.Movie.2018.720p.mkv")).unwrap();
        File::create(dir.join("Alpha.Movie.2018.720p.mkv")).unwrap();
        File::create(dir.join("Alpha.Movie.2018.720p.srt")).unwrap();
        File::create(dir.join("Alpha.Movie.2018.720p.idx")).unwrap();
        File::create(dir.join("Alpha.Movie.2018.720p.sub")).unwrap();
        File::create(dir.join("notes.txt")).unwrap();
        File::create(dir.join("two.dots.txt")).unwrap();
        fs::create_dir(dir.join("Show.S02E05.1080p.WEB")).unwrap();
        fs::create_dir(dir.join("Extras")).unwrap();
        fs::create_dir(dir.join("Movie.2019.1080p.srt")).unwrap();

        let found = scan(dir).unwrap();
        let names: Vec<_> = found.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Alpha.Movie.2018.720p.mkv",
                "Show.S02E05.1080p.WEB",
                "Zed.Movie.2018.720p.mkv"
            ]
        );
        assert!(found[1].is_dir);
        assert!(!found[0].is_dir);
        assert!(!names.iter().any(|n| n.ends_with(".srt")));
    }

    #[test]
    fn test_scan_empty_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        File::create(temp_dir.path().join("Only.Subtitle.Here.srt")).unwrap();

        let err = scan(temp_dir.path()).unwrap_err();
        assert!(matches!(err, SubDlError::NoReleases(_)));
    }

    #[test]
    fn test_scan_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let err = scan(&temp_dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, SubDlError::Io { .. }));
    }

    #[test]
    fn test_choose_single() {
        let all = releases();
        let chosen = choose(&all, "2").unwrap();
        assert_eq!(chosen.len(), 1);
        assert_eq!(chosen[0].name, NAMES[1]);
    }

    #[test]
    fn test_choose_range() {
        let all = releases();
        let chosen = choose(&all, "2-3").unwrap();
        let names: Vec<_> = chosen.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec![NAMES[1], NAMES[2]]);
    }

    #[test]
    fn test_choose_clamps_end() {
        let all = releases();
        let chosen = choose(&all, "3-99").unwrap();
        assert_eq!(chosen.len(), 2);
        assert_eq!(chosen[1].name, NAMES[3]);
    }

    #[test]
    fn test_choose_rejects_bad_start() {
        let all = releases();
        for choice in ["0", "5", "0-2", "5-6", "-1", "3-2", "abc", "1-x", ""] {
            let err = choose(&all, choice).unwrap_err();
            assert!(
                matches!(err, SubDlError::InvalidSelection(_)),
                "{choice:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_choose_result_is_within_bounds() {
        let all = releases();
        for start in 1..=4 {
            for end in start..=8 {
                let chosen = choose(&all, &format!("{start}-{end}")).unwrap();
                assert_eq!(chosen.len(), (end.min(4) - start + 1) as usize);
                assert_eq!(chosen[0].name, NAMES[start as usize - 1]);
            }
        }
    }
}
