use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

use super::models::{Release, SearchQuery};

const SUBTITLE_EXTENSIONS: [&str; 3] = ["sub", "idx", "srt"];

fn episode_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\.(s\d{2}e\d{2})\.").expect("valid episode regex"))
}

impl Release {
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_string();
        Some(Self {
            path: path.to_path_buf(),
            name,
            is_dir: path.is_dir(),
        })
    }

    /// Scene-style names have at least three dots. Nothing with a subtitle
    /// extension is a release, directories included.
    pub fn looks_like_release(name: &str) -> bool {
        if name.matches('.').count() < 3 {
            return false;
        }
        match Path::new(name).extension().and_then(|e| e.to_str()) {
            Some(ext) => !SUBTITLE_EXTENSIONS.contains(&ext),
            None => true,
        }
    }

    /// Directory name, or file name without its extension.
    pub fn release_name(&self) -> String {
        if self.is_dir {
            return self.name.clone();
        }
        Path::new(&self.name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.name)
            .to_string()
    }

    /// Directory that receives the subtitle: the release itself, or its parent.
    pub fn destination(&self) -> &Path {
        if self.is_dir {
            &self.path
        } else {
            self.path.parent().unwrap_or(Path::new("."))
        }
    }

    pub fn search_query(&self) -> SearchQuery {
        SearchQuery::new(&self.release_name())
    }
}

impl SearchQuery {
    pub fn new(release_name: &str) -> Self {
        let release_name = strip_release_tag(release_name).to_string();
        let episode_code = episode_code(&release_name);
        Self {
            release_name,
            episode_code,
        }
    }

    /// True when `candidate` carries this query's episode code, or the query has none.
    pub fn same_episode(&self, candidate: &str) -> bool {
        match &self.episode_code {
            Some(code) => candidate.to_lowercase().contains(code.as_str()),
            None => true,
        }
    }
}

/// Drops a trailing `[group]` tag, e.g. `Show.S01E02.WEB-DL[ettv]`.
pub fn strip_release_tag(name: &str) -> &str {
    if !name.ends_with(']') {
        return name;
    }
    match name.rfind('[') {
        Some(idx) => &name[..idx],
        None => name,
    }
}

pub fn episode_code(name: &str) -> Option<String> {
    episode_regex()
        .captures(name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_lowercase())
}
