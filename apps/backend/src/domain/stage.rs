//! Pure stage state machine for a room and its current round.
//!
//! The coordinator is the only caller of [`next_transition`]; participant
//! actions never advance stages, which keeps the machine single-writer.

use crate::entities::games::GameStage;
use crate::entities::rounds::RoundStage;
use crate::errors::domain::DomainError;

/// Counts needed to decide the next transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomProgress {
    /// Non-host participants.
    pub players: usize,
    /// Configured painter cycles.
    pub cycles: u32,
    /// Rounds already in `Finished` stage, excluding the current one.
    pub finished_rounds: usize,
}

impl RoomProgress {
    pub fn total_rounds(&self) -> usize {
        self.players * self.cycles as usize
    }
}

/// One step of the room stage machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageAdvance {
    /// pregame -> preround (host start).
    BeginPreround,
    /// preround -> round; the first not-started round is armed into writing.
    BeginRound,
    /// writing -> selecting.
    BeginSelecting,
    /// selecting -> answers.
    BeginAnswers,
    /// answers -> results.
    ShowResults,
    /// answers on the final round of the room: round and room both finish,
    /// skipping the per-round results screen.
    FinishGame,
    /// results -> finished; the next not-started round is armed into writing.
    NextRound,
    /// results -> finished; the painter cycle is complete, room returns to
    /// preround.
    NextCycle,
}

pub fn next_transition(
    stage: GameStage,
    round_stage: Option<RoundStage>,
    progress: RoomProgress,
) -> Result<StageAdvance, DomainError> {
    match stage {
        GameStage::Pregame => Ok(StageAdvance::BeginPreround),
        GameStage::Preround => Ok(StageAdvance::BeginRound),
        GameStage::Round => {
            let round_stage = round_stage
                .ok_or_else(|| DomainError::state("room is in round stage without a current round"))?;
            match round_stage {
                RoundStage::Writing => Ok(StageAdvance::BeginSelecting),
                RoundStage::Selecting => Ok(StageAdvance::BeginAnswers),
                RoundStage::Answers => {
                    if progress.finished_rounds + 1 >= progress.total_rounds() {
                        Ok(StageAdvance::FinishGame)
                    } else {
                        Ok(StageAdvance::ShowResults)
                    }
                }
                RoundStage::Results => {
                    if (progress.finished_rounds + 1) % progress.players != 0 {
                        Ok(StageAdvance::NextRound)
                    } else {
                        Ok(StageAdvance::NextCycle)
                    }
                }
                RoundStage::NotStarted | RoundStage::Finished => Err(DomainError::state(format!(
                    "round stage {round_stage:?} cannot be current"
                ))),
            }
        }
        GameStage::Finished => Err(DomainError::state("room is finished")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(players: usize, cycles: u32, finished_rounds: usize) -> RoomProgress {
        RoomProgress {
            players,
            cycles,
            finished_rounds,
        }
    }

    #[test]
    fn host_start_moves_to_preround() {
        let advance = next_transition(GameStage::Pregame, None, progress(2, 1, 0)).unwrap();
        assert_eq!(advance, StageAdvance::BeginPreround);
    }

    #[test]
    fn preround_arms_first_round() {
        let advance = next_transition(GameStage::Preround, None, progress(3, 2, 0)).unwrap();
        assert_eq!(advance, StageAdvance::BeginRound);
    }

    #[test]
    fn round_stages_progress_in_order() {
        let p = progress(3, 2, 0);
        assert_eq!(
            next_transition(GameStage::Round, Some(RoundStage::Writing), p).unwrap(),
            StageAdvance::BeginSelecting
        );
        assert_eq!(
            next_transition(GameStage::Round, Some(RoundStage::Selecting), p).unwrap(),
            StageAdvance::BeginAnswers
        );
        assert_eq!(
            next_transition(GameStage::Round, Some(RoundStage::Answers), p).unwrap(),
            StageAdvance::ShowResults
        );
    }

    #[test]
    fn final_round_skips_results() {
        // 2 players x 1 cycle: the second round is the last of the room.
        let advance =
            next_transition(GameStage::Round, Some(RoundStage::Answers), progress(2, 1, 1)).unwrap();
        assert_eq!(advance, StageAdvance::FinishGame);
    }

    #[test]
    fn mid_cycle_results_arm_next_round() {
        let advance =
            next_transition(GameStage::Round, Some(RoundStage::Results), progress(3, 2, 0)).unwrap();
        assert_eq!(advance, StageAdvance::NextRound);
    }

    #[test]
    fn cycle_boundary_returns_to_preround() {
        // 3 players, the third round of the cycle just showed its results.
        let advance =
            next_transition(GameStage::Round, Some(RoundStage::Results), progress(3, 2, 2)).unwrap();
        assert_eq!(advance, StageAdvance::NextCycle);
    }

    #[test]
    fn two_player_single_cycle_walkthrough() {
        let players = 2;
        let cycles = 1;

        let mut stage = GameStage::Pregame;
        let mut round_stage: Option<RoundStage> = None;
        let mut finished = 0usize;
        let mut seen = Vec::new();

        for _ in 0..16 {
            if stage == GameStage::Finished {
                break;
            }
            let advance =
                next_transition(stage, round_stage, progress(players, cycles, finished)).unwrap();
            seen.push(advance);
            match advance {
                StageAdvance::BeginPreround => stage = GameStage::Preround,
                StageAdvance::BeginRound => {
                    stage = GameStage::Round;
                    round_stage = Some(RoundStage::Writing);
                }
                StageAdvance::BeginSelecting => round_stage = Some(RoundStage::Selecting),
                StageAdvance::BeginAnswers => round_stage = Some(RoundStage::Answers),
                StageAdvance::ShowResults => round_stage = Some(RoundStage::Results),
                StageAdvance::FinishGame => {
                    finished += 1;
                    round_stage = None;
                    stage = GameStage::Finished;
                }
                StageAdvance::NextRound => {
                    finished += 1;
                    round_stage = Some(RoundStage::Writing);
                }
                StageAdvance::NextCycle => {
                    finished += 1;
                    round_stage = None;
                    stage = GameStage::Preround;
                }
            }
        }

        assert_eq!(stage, GameStage::Finished);
        assert_eq!(finished, 2);
        // Round 1 shows results and chains straight into round 2's writing;
        // round 2 finishes the room from answers.
        assert_eq!(
            seen,
            vec![
                StageAdvance::BeginPreround,
                StageAdvance::BeginRound,
                StageAdvance::BeginSelecting,
                StageAdvance::BeginAnswers,
                StageAdvance::ShowResults,
                StageAdvance::NextRound,
                StageAdvance::BeginSelecting,
                StageAdvance::BeginAnswers,
                StageAdvance::FinishGame,
            ]
        );
    }

    #[test]
    fn finished_room_has_no_transitions() {
        let result = next_transition(GameStage::Finished, None, progress(2, 1, 2));
        assert!(result.is_err());
    }

    #[test]
    fn dangling_round_stage_is_rejected() {
        let result = next_transition(
            GameStage::Round,
            Some(RoundStage::NotStarted),
            progress(2, 1, 0),
        );
        assert!(result.is_err());
    }
}
