use anyhow::{Error, Result};
use log::{debug, warn};

use crate::domain::models::Release;
use crate::error::SubDlError;
use crate::infra::archive::{self, Unpacked};
use crate::infra::SubtitleIndex;
use crate::workflows::matcher::{self, MatchOptions};
use crate::workflows::prompt::Prompt;

#[derive(Debug)]
pub enum ReleaseOutcome {
    Downloaded(Unpacked),
    NoSubtitles,
}

/// What the batch does after one release.
enum Step {
    Continue,
    Abort(Error),
}

/// Searches, picks and downloads the subtitle for one release.
pub fn process_release(
    index: &dyn SubtitleIndex,
    release: &Release,
    options: &MatchOptions,
    prompt: &mut dyn Prompt,
) -> Result<ReleaseOutcome> {
    let query = release.search_query();
    println!("\nSearching subtitles for {}", query.release_name);

    let Some(selection) = matcher::find_subtitle(index, &query, options, prompt)? else {
        return Ok(ReleaseOutcome::NoSubtitles);
    };
    debug!(
        "Selected {} ({:?} match)",
        selection.candidate.link, selection.mode
    );

    let unpacked = archive::fetch_and_unpack(
        index,
        &selection.candidate.link,
        release.destination(),
        &release.release_name(),
    )?;
    Ok(ReleaseOutcome::Downloaded(unpacked))
}

fn is_release_local(err: &Error) -> bool {
    err.downcast_ref::<SubDlError>()
        .is_some_and(SubDlError::is_release_local)
}

/// A failed release ends the run when nothing is left after it.
fn after_failure(err: Error, remaining: usize) -> Step {
    if remaining == 0 {
        return Step::Abort(err);
    }
    match err.downcast_ref::<SubDlError>() {
        Some(SubDlError::NoSubtitles(_)) => println!("No subtitles found. Continuing search."),
        _ => eprintln!("Error: {err}. Continuing search."),
    }
    Step::Continue
}

/// Processes `releases` in order and returns the subtitles written.
pub fn run_batch(
    index: &dyn SubtitleIndex,
    releases: &[Release],
    options: &MatchOptions,
    prompt: &mut dyn Prompt,
) -> Result<Vec<Unpacked>> {
    let mut saved = Vec::new();

    for (i, release) in releases.iter().enumerate() {
        let remaining = releases.len() - i - 1;

        let step = match process_release(index, release, options, prompt) {
            Ok(ReleaseOutcome::Downloaded(unpacked)) => {
                debug!(
                    "Wrote {} (replaced existing: {})",
                    unpacked.path.display(),
                    unpacked.overwritten
                );
                saved.push(unpacked);
                Step::Continue
            }
            Ok(ReleaseOutcome::NoSubtitles) => after_failure(
                SubDlError::NoSubtitles(release.release_name()).into(),
                remaining,
            ),
            Err(e) if is_release_local(&e) => {
                warn!("{} failed: {e}", release.name);
                after_failure(e, remaining)
            }
            Err(e) => Step::Abort(e),
        };

        if let Step::Abort(err) = step {
            return Err(err);
        }
    }

    Ok(saved)
}
