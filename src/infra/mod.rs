use std::io::Write;

use crate::domain::models::{Rating, SearchRow};
use crate::error::Result;

pub mod archive;
pub mod subscene;

/// A remote subtitle index. Implementations own all markup handling.
pub trait SubtitleIndex {
    /// Every result row for a release-name search, header excluded.
    fn search(&self, release_name: &str) -> Result<Vec<SearchRow>>;

    /// Rating shown on a subtitle's detail page, `None` when it has none.
    fn rating(&self, link: &str) -> Result<Option<Rating>>;

    /// Resolves the subtitle's download target and streams the archive into `out`.
    fn download(&self, link: &str, out: &mut dyn Write) -> Result<u64>;
}
