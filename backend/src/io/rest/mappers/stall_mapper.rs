//! backend/src/io/rest/mappers/stall_mapper.rs

use shared::{
    MilkingCandidate as SharedCandidate, MilkingCandidatesResponse, Stall, StallAnimal, StallBoardSnapshot,
};

use crate::domain::stall_board::{BoardSnapshot, MilkingCandidate, StallOccupant};

pub struct StallMapper;

impl StallMapper {
    pub fn to_stall_animal(occupant: StallOccupant) -> StallAnimal {
        StallAnimal { id: occupant.id, name: occupant.name, tag_number: occupant.tag_number }
    }

    pub fn to_snapshot_dto(snapshot: BoardSnapshot) -> StallBoardSnapshot {
        StallBoardSnapshot {
            stalls: snapshot
                .stalls
                .into_iter()
                .enumerate()
                .map(|(index, occupant)| Stall {
                    stall: index as u32 + 1,
                    animal: occupant.map(Self::to_stall_animal),
                })
                .collect(),
            already_milked: snapshot.already_milked,
            session_started_at: snapshot.session_started_at.map(|started| started.to_rfc3339()),
            last_update: snapshot.last_update.to_rfc3339(),
        }
    }

    pub fn to_candidates_dto(candidates: Vec<MilkingCandidate>) -> MilkingCandidatesResponse {
        MilkingCandidatesResponse {
            candidates: candidates
                .into_iter()
                .map(|candidate| SharedCandidate {
                    animal: StallAnimal {
                        id: candidate.animal.id,
                        name: candidate.animal.name,
                        tag_number: candidate.animal.tag_number,
                    },
                    assigned_stall: candidate.assigned_stall,
                    already_milked: candidate.already_milked,
                })
                .collect(),
        }
    }
}
