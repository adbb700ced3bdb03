use anyhow::Result;
use log::{debug, warn};

use crate::domain::models::{SearchQuery, SearchRow, SubtitleCandidate};
use crate::infra::SubtitleIndex;
use crate::workflows::prompt::Prompt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Row release name must equal the query.
    Exact,
    /// Any release in the right language (and episode, for TV).
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankOrder {
    /// Non-HI first, then rating and votes ascending, unrated first.
    #[default]
    Listing,
    /// Non-HI first, then best rated, unrated last.
    BestFirst,
}

#[derive(Debug, Clone)]
pub struct MatchOptions {
    pub language: String,
    pub auto: bool,
    pub order: RankOrder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub candidate: SubtitleCandidate,
    pub mode: MatchMode,
}

pub fn is_match(row: &SearchRow, query: &SearchQuery, language: &str, mode: MatchMode) -> bool {
    if row.language.to_lowercase() != language.to_lowercase() {
        return false;
    }
    if mode == MatchMode::Exact
        && row.release_name.to_lowercase() != query.release_name.to_lowercase()
    {
        return false;
    }
    query.same_episode(&row.release_name)
}

/// Filters `rows` for `mode` and looks up each survivor's rating.
pub fn collect_candidates(
    index: &dyn SubtitleIndex,
    rows: &[SearchRow],
    query: &SearchQuery,
    language: &str,
    mode: MatchMode,
) -> Result<Vec<SubtitleCandidate>> {
    let mut candidates = Vec::new();
    for row in rows.iter().filter(|row| is_match(row, query, language, mode)) {
        let rating = index.rating(&row.link)?;
        debug!("{} -> {rating:?}", row.link);
        candidates.push(SubtitleCandidate::from_row(row.clone(), rating));
    }
    Ok(candidates)
}

pub fn rank(candidates: &mut [SubtitleCandidate], order: RankOrder) {
    match order {
        RankOrder::Listing => candidates.sort_by(SubtitleCandidate::listing_order),
        RankOrder::BestFirst => candidates.sort_by(SubtitleCandidate::best_first_order),
    }
}

pub fn format_listing(candidates: &[SubtitleCandidate], mode: MatchMode) -> Vec<String> {
    let mut lines = Vec::with_capacity(candidates.len() + 1);
    lines.push(match mode {
        MatchMode::Exact => " Nr\tRating\tVotes\tH-i".to_string(),
        MatchMode::Fallback => " Nr\tRating\tVotes\tH-i\tRelease".to_string(),
    });

    for (nr, sub) in candidates.iter().enumerate() {
        let hi = if sub.hearing_impaired { "X" } else { "" };
        let mut line = format!(
            " ({})\t{}\t{}\t{}",
            nr + 1,
            sub.rating_cell(),
            sub.votes_cell(),
            hi
        );
        if mode == MatchMode::Fallback {
            line.push('\t');
            line.push_str(&sub.release_name);
        }
        lines.push(line);
    }
    lines
}

/// Picks one of the ranked `candidates`. Automatic when `auto` is set or only
/// one is available; a bad answer falls back to the first.
pub fn choose(
    candidates: &[SubtitleCandidate],
    auto: bool,
    prompt: &mut dyn Prompt,
) -> Result<Option<SubtitleCandidate>> {
    let Some(first) = candidates.first() else {
        return Ok(None);
    };

    if auto || candidates.len() == 1 {
        println!("Subtitle nr 1 chosen automatically.");
        return Ok(Some(first.clone()));
    }

    let answer = prompt.ask("Choose a subtitle: ")?;
    let chosen = answer
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(|nr| nr.checked_sub(1))
        .and_then(|idx| candidates.get(idx));

    match chosen {
        Some(sub) => Ok(Some(sub.clone())),
        None => {
            warn!("Subtitle choice {answer:?} out of range");
            println!("You chose a non-existing subtitle. Subtitle nr 1 chosen instead.");
            Ok(Some(first.clone()))
        }
    }
}

fn search_pass(
    index: &dyn SubtitleIndex,
    rows: &[SearchRow],
    query: &SearchQuery,
    options: &MatchOptions,
    mode: MatchMode,
    prompt: &mut dyn Prompt,
) -> Result<Option<Selection>> {
    let mut candidates = collect_candidates(index, rows, query, &options.language, mode)?;
    if candidates.is_empty() {
        return Ok(None);
    }

    rank(&mut candidates, options.order);
    for line in format_listing(&candidates, mode) {
        println!("{line}");
    }

    Ok(choose(&candidates, options.auto, prompt)?.map(|candidate| Selection { candidate, mode }))
}

/// Searches the index for `query`, trying an exact release match first and
/// falling back to every subtitle in the configured language.
pub fn find_subtitle(
    index: &dyn SubtitleIndex,
    query: &SearchQuery,
    options: &MatchOptions,
    prompt: &mut dyn Prompt,
) -> Result<Option<Selection>> {
    let rows = index.search(&query.release_name)?;

    if let Some(selection) = search_pass(index, &rows, query, options, MatchMode::Exact, prompt)? {
        return Ok(Some(selection));
    }

    println!(
        "No subtitles for {} found. Showing all subtitles.",
        query.release_name
    );
    search_pass(index, &rows, query, options, MatchMode::Fallback, prompt)
}
