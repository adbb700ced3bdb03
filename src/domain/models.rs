use std::cmp::Ordering;
use std::path::PathBuf;

/// A media file or directory found in the media directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub path: PathBuf,
    pub name: String,
    pub is_dir: bool,
}

/// Query sent to the subtitle index for one release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub release_name: String,
    pub episode_code: Option<String>, // lower-case, e.g. "s01e02"
}

/// One result row of a release search, as parsed from the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRow {
    pub language: String,
    pub release_name: String,
    pub link: String,
    pub hearing_impaired: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Rating {
    pub score: u32,
    pub votes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleCandidate {
    pub link: String,
    pub rating: Option<Rating>, // None = unrated
    pub hearing_impaired: bool,
    pub release_name: String,
}

impl SubtitleCandidate {
    pub fn from_row(row: SearchRow, rating: Option<Rating>) -> Self {
        Self {
            link: row.link,
            rating,
            hearing_impaired: row.hearing_impaired,
            release_name: row.release_name,
        }
    }

    /// Ordering of the listing: non-HI first, then rating and votes ascending
    /// with unrated entries ahead of rated ones.
    pub fn listing_order(&self, other: &Self) -> Ordering {
        (self.hearing_impaired, self.rating).cmp(&(other.hearing_impaired, other.rating))
    }

    /// Non-HI first, then highest rating and vote count, unrated last.
    pub fn best_first_order(&self, other: &Self) -> Ordering {
        self.hearing_impaired
            .cmp(&other.hearing_impaired)
            .then_with(|| other.rating.cmp(&self.rating))
    }

    pub fn rating_cell(&self) -> String {
        match self.rating {
            Some(rating) => rating.score.to_string(),
            None => "N/A".to_string(),
        }
    }

    pub fn votes_cell(&self) -> String {
        match self.rating {
            Some(rating) => rating.votes.to_string(),
            None => String::new(),
        }
    }
}
