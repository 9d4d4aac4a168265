//! Question generation: one correct track plus K−1 decoys per round.

use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::game::track::Track;

/// One round's question: the correct track hidden among shuffled options.
#[derive(Debug, Clone)]
pub struct GameQuestion {
    /// The track the player is asked to identify.
    pub correct_track: Track,
    /// Answer options in randomized order; contains the correct track exactly once.
    pub options: Vec<Track>,
    /// Identifier of the correct track, for answer checking.
    pub correct_answer_id: String,
}

/// Draw a question from `pool`, skipping every track whose id is in `exclude_ids`.
///
/// Returns `None` when fewer than `option_count` candidates remain. The pool is
/// fixed for the session, so there is no recovery path; callers must surface the
/// failure instead of retrying.
///
/// The RNG is injected so tests can seed it; production callers pass `rand::rng()`.
pub fn generate_question<R: Rng + ?Sized>(
    pool: &[Track],
    exclude_ids: &HashSet<String>,
    option_count: usize,
    rng: &mut R,
) -> Option<GameQuestion> {
    let mut available: Vec<&Track> = pool
        .iter()
        .filter(|track| !exclude_ids.contains(&track.id))
        .collect();

    if available.len() < option_count {
        return None;
    }

    available.shuffle(rng);

    let correct_track = (*available[0]).clone();
    let mut options: Vec<Track> = available[..option_count]
        .iter()
        .map(|track| (*track).clone())
        .collect();
    options.shuffle(rng);

    let correct_answer_id = correct_track.id.clone();
    Some(GameQuestion {
        correct_track,
        options,
        correct_answer_id,
    })
}
