//! Game session lifecycle: round sequencing, answer checking, and scoring.

use std::collections::HashSet;

use rand::rngs::StdRng;
use thiserror::Error;
use uuid::Uuid;

use crate::game::pool::PoolSource;
use crate::game::question::{GameQuestion, generate_question};
use crate::game::track::Track;

/// Tunable parameters for a game session.
#[derive(Debug, Clone, Copy)]
pub struct GameSettings {
    /// Number of rounds played per session.
    pub question_count: usize,
    /// Number of answer options shown per round (correct track plus decoys).
    pub option_count: usize,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            question_count: 10,
            option_count: 4,
        }
    }
}

impl GameSettings {
    /// Smallest pool that can host a full session: every round consumes one
    /// track and the last round still needs a full set of options.
    pub fn minimum_pool_size(&self) -> usize {
        self.question_count + self.option_count - 1
    }
}

/// Where the session currently stands in its round cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No question is open; the next round can be drawn.
    BetweenRounds,
    /// A question is open and waiting for an answer.
    AwaitingAnswer,
    /// All rounds have been answered.
    Finished,
}

/// Errors raised by session operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// The pool cannot host a full session.
    #[error("pool of {actual} tracks is too small (need at least {needed})")]
    PoolTooSmall {
        /// Tracks available in the pool.
        actual: usize,
        /// Minimum pool size for the configured session.
        needed: usize,
    },
    /// The pool ran out of unused tracks mid-session. Unrecoverable: the pool
    /// is fixed for the session, so the game cannot continue.
    #[error("pool exhausted after {rounds_played} rounds")]
    PoolExhausted {
        /// Rounds completed before exhaustion.
        rounds_played: usize,
    },
    /// The requested operation does not match the current phase.
    #[error("invalid session state: {0}")]
    InvalidState(String),
}

/// Outcome of a single answered round. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundResult {
    /// 1-based round number.
    pub round: usize,
    /// Whether the submitted answer matched the correct track.
    pub correct: bool,
    /// Name of the correct track (not the submitted one).
    pub track_name: String,
    /// Artist of the correct track.
    pub artist_name: String,
}

/// Aggregate view of a finished (or in-progress) session.
#[derive(Debug, Clone)]
pub struct GameSummary {
    /// Correctly answered rounds.
    pub score: usize,
    /// Rounds played so far.
    pub rounds_played: usize,
    /// Configured number of rounds.
    pub question_count: usize,
    /// Per-round outcomes in play order.
    pub results: Vec<RoundResult>,
}

/// One play-through over a fixed pool: draws questions, tracks used ids, and
/// records round results. Exclusively owns its state; build a new session when
/// a new playlist is chosen.
#[derive(Debug)]
pub struct GameSession {
    id: Uuid,
    settings: GameSettings,
    pool: Vec<Track>,
    pool_source: PoolSource,
    used_track_ids: HashSet<String>,
    results: Vec<RoundResult>,
    current: Option<GameQuestion>,
    rng: StdRng,
}

impl GameSession {
    /// Start a session over `pool`, rejecting pools that cannot host a full game.
    pub fn new(
        pool: Vec<Track>,
        pool_source: PoolSource,
        settings: GameSettings,
    ) -> Result<Self, GameError> {
        use rand::SeedableRng;

        let needed = settings.minimum_pool_size();
        if pool.len() < needed {
            return Err(GameError::PoolTooSmall {
                actual: pool.len(),
                needed,
            });
        }

        Ok(Self {
            id: Uuid::new_v4(),
            settings,
            pool,
            pool_source,
            used_track_ids: HashSet::new(),
            results: Vec::new(),
            current: None,
            rng: StdRng::from_os_rng(),
        })
    }

    /// Session identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Whether this session runs on live catalog data or the mock fallback.
    pub fn pool_source(&self) -> PoolSource {
        self.pool_source
    }

    /// Current phase of the round cycle.
    pub fn phase(&self) -> SessionPhase {
        if self.current.is_some() {
            SessionPhase::AwaitingAnswer
        } else if self.results.len() >= self.settings.question_count {
            SessionPhase::Finished
        } else {
            SessionPhase::BetweenRounds
        }
    }

    /// 1-based number of the round currently open or about to open.
    pub fn current_round(&self) -> usize {
        self.results.len() + 1
    }

    /// Correctly answered rounds so far.
    pub fn score(&self) -> usize {
        self.results.iter().filter(|result| result.correct).count()
    }

    /// Draw the next question, marking its correct track as used so it never
    /// repeats within this session.
    pub fn next_round(&mut self) -> Result<&GameQuestion, GameError> {
        match self.phase() {
            SessionPhase::BetweenRounds => {}
            SessionPhase::AwaitingAnswer => {
                return Err(GameError::InvalidState(
                    "a question is already awaiting an answer".into(),
                ));
            }
            SessionPhase::Finished => {
                return Err(GameError::InvalidState("the game is finished".into()));
            }
        }

        let question = generate_question(
            &self.pool,
            &self.used_track_ids,
            self.settings.option_count,
            &mut self.rng,
        )
        .ok_or(GameError::PoolExhausted {
            rounds_played: self.results.len(),
        })?;

        self.used_track_ids.insert(question.correct_answer_id.clone());
        Ok(self.current.insert(question))
    }

    /// Record the answer for the open round. The result always carries the
    /// correct track's name and artist, regardless of what was submitted.
    pub fn submit_answer(&mut self, answer_id: &str) -> Result<&RoundResult, GameError> {
        let question = self.current.take().ok_or_else(|| {
            GameError::InvalidState("no question is awaiting an answer".into())
        })?;

        let result = RoundResult {
            round: self.results.len() + 1,
            correct: answer_id == question.correct_answer_id,
            track_name: question.correct_track.name,
            artist_name: question.correct_track.artist,
        };
        self.results.push(result);

        Ok(self.results.last().expect("result just pushed"))
    }

    /// Snapshot for the end-of-game screen.
    pub fn summary(&self) -> GameSummary {
        GameSummary {
            score: self.score(),
            rounds_played: self.results.len(),
            question_count: self.settings.question_count,
            results: self.results.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::track::mock_tracks;

    fn session() -> GameSession {
        GameSession::new(mock_tracks(), PoolSource::Fallback, GameSettings::default()).unwrap()
    }

    #[test]
    fn undersized_pool_is_rejected() {
        let pool: Vec<Track> = mock_tracks().into_iter().take(12).collect();
        let err = GameSession::new(pool, PoolSource::Live, GameSettings::default()).unwrap_err();
        assert_eq!(
            err,
            GameError::PoolTooSmall {
                actual: 12,
                needed: 13
            }
        );
    }

    #[test]
    fn wrong_answer_records_the_correct_tracks_identity() {
        // Pool of 20 mock tracks, four options, empty exclusion set.
        let mut game = session();
        let question = game.next_round().unwrap();
        let correct = question.correct_track.clone();

        let wrong_id = question
            .options
            .iter()
            .find(|option| option.id != question.correct_answer_id)
            .unwrap()
            .id
            .clone();

        let result = game.submit_answer(&wrong_id).unwrap();
        assert!(!result.correct);
        assert_eq!(result.round, 1);
        assert_eq!(result.track_name, correct.name);
        assert_eq!(result.artist_name, correct.artist);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn correct_answer_scores() {
        let mut game = session();
        let answer = game.next_round().unwrap().correct_answer_id.clone();
        let result = game.submit_answer(&answer).unwrap();
        assert!(result.correct);
        assert_eq!(game.score(), 1);
    }

    #[test]
    fn correct_tracks_never_repeat_within_a_session() {
        let mut game = session();
        let mut seen = HashSet::new();

        for round in 1..=10 {
            let question = game.next_round().unwrap();
            assert!(
                seen.insert(question.correct_answer_id.clone()),
                "round {round} repeated a correct track"
            );
            let answer = question.correct_answer_id.clone();
            game.submit_answer(&answer).unwrap();
        }

        assert_eq!(game.phase(), SessionPhase::Finished);
        assert_eq!(game.score(), 10);
    }

    #[test]
    fn round_cycle_enforced() {
        let mut game = session();
        assert!(matches!(
            game.submit_answer("1"),
            Err(GameError::InvalidState(_))
        ));

        game.next_round().unwrap();
        assert!(matches!(game.next_round(), Err(GameError::InvalidState(_))));
    }

    #[test]
    fn finished_game_rejects_further_rounds() {
        let mut game = session();
        for _ in 0..10 {
            let answer = game.next_round().unwrap().correct_answer_id.clone();
            game.submit_answer(&answer).unwrap();
        }

        assert!(matches!(game.next_round(), Err(GameError::InvalidState(_))));
        let summary = game.summary();
        assert_eq!(summary.rounds_played, 10);
        assert_eq!(summary.score, 10);
        assert_eq!(summary.results.len(), 10);
    }
}
