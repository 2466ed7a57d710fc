//! Milking-parlor stall board.
//!
//! Volatile record of which cow stands in which stall and which cows have
//! already been milked in the current session. Nothing here is persisted: a
//! restart starts with an empty parlor.
//!
//! The "already milked" list belongs to a session that starts with the first
//! placement and expires `history_ttl_hours` later. Expiry is checked on every
//! access; a background sweeper also clears it when the kiosk sits idle.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, info};

use crate::domain::clock::Clock;
use crate::domain::models::Animal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParlorSettings {
    pub stall_count: u32,
    pub history_ttl_hours: i64,
    pub sweep_interval_secs: u64,
}

impl Default for ParlorSettings {
    fn default() -> Self {
        Self { stall_count: 7, history_ttl_hours: 6, sweep_interval_secs: 60 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StallBoardError {
    #[error("Stall {stall} does not exist (stalls 1-{count})")]
    StallOutOfRange { stall: u32, count: u32 },
    #[error("Animal {animal_id} already stands in stall {stall}")]
    AlreadyInStall { animal_id: i64, stall: u32 },
    #[error("Animal {0} has left the herd")]
    InactiveAnimal(i64),
}

/// The cow standing in a stall
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StallOccupant {
    pub id: i64,
    pub name: String,
    pub tag_number: String,
}

impl StallOccupant {
    pub fn from_animal(animal: &Animal) -> Result<Self, StallBoardError> {
        if !animal.active {
            return Err(StallBoardError::InactiveAnimal(animal.id));
        }
        Ok(Self { id: animal.id, name: animal.name.clone(), tag_number: animal.tag_number.clone() })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    /// Index 0 is stall 1
    pub stalls: Vec<Option<StallOccupant>>,
    pub already_milked: Vec<i64>,
    pub session_started_at: Option<DateTime<Utc>>,
    pub last_update: DateTime<Utc>,
}

impl BoardSnapshot {
    fn empty(stall_count: u32, now: DateTime<Utc>) -> Self {
        Self {
            stalls: vec![None; stall_count as usize],
            already_milked: Vec::new(),
            session_started_at: None,
            last_update: now,
        }
    }

    /// Stall number (1-based) the animal stands in
    pub fn stall_of(&self, animal_id: i64) -> Option<u32> {
        self.stalls
            .iter()
            .position(|occupant| occupant.as_ref().map_or(false, |o| o.id == animal_id))
            .map(|index| index as u32 + 1)
    }

    pub fn is_already_milked(&self, animal_id: i64) -> bool {
        self.already_milked.contains(&animal_id)
    }

    fn clear_history(&mut self) {
        self.already_milked.clear();
        self.session_started_at = None;
    }
}

#[derive(Clone)]
pub struct StallBoard {
    state: Arc<RwLock<BoardSnapshot>>,
    clock: Arc<dyn Clock>,
    settings: ParlorSettings,
    sweeper: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl StallBoard {
    pub fn new(settings: ParlorSettings, clock: Arc<dyn Clock>) -> Self {
        let state = BoardSnapshot::empty(settings.stall_count, clock.now());
        Self {
            state: Arc::new(RwLock::new(state)),
            clock,
            settings,
            sweeper: Arc::new(Mutex::new(None)),
        }
    }

    pub fn stall_count(&self) -> u32 {
        self.settings.stall_count
    }

    pub async fn snapshot(&self) -> BoardSnapshot {
        let mut state = self.state.write().await;
        self.expire_history(&mut state);
        state.clone()
    }

    /// Place a cow in a stall. The cow is added to the already-milked list;
    /// the first placement of a session starts its clock.
    pub async fn assign(&self, stall: u32, occupant: StallOccupant) -> Result<BoardSnapshot, StallBoardError> {
        let index = self.stall_index(stall)?;
        let now = self.clock.now();

        let mut state = self.state.write().await;
        self.expire_history(&mut state);

        if let Some(current) = state.stall_of(occupant.id) {
            if current != stall {
                return Err(StallBoardError::AlreadyInStall { animal_id: occupant.id, stall: current });
            }
        }

        if !state.is_already_milked(occupant.id) {
            state.already_milked.push(occupant.id);
        }
        if state.session_started_at.is_none() {
            info!("Milking session started");
            state.session_started_at = Some(now);
        }

        info!("Placed {} ({}) in stall {}", occupant.name, occupant.tag_number, stall);
        state.stalls[index] = Some(occupant);
        state.last_update = now;
        Ok(state.clone())
    }

    /// Empty a stall. The cow that stood there is taken off the
    /// already-milked list again; an emptied list ends the session.
    pub async fn release(&self, stall: u32) -> Result<BoardSnapshot, StallBoardError> {
        let index = self.stall_index(stall)?;

        let mut state = self.state.write().await;
        self.expire_history(&mut state);

        if let Some(occupant) = state.stalls[index].take() {
            state.already_milked.retain(|id| *id != occupant.id);
            info!("Released stall {} ({})", stall, occupant.name);
            if state.already_milked.is_empty() && state.session_started_at.is_some() {
                info!("Milking session ended, no cows left on the list");
                state.clear_history();
            }
        }
        state.last_update = self.clock.now();
        Ok(state.clone())
    }

    /// Empty every stall, keeping the already-milked list
    pub async fn clear_stalls(&self) -> BoardSnapshot {
        let mut state = self.state.write().await;
        self.expire_history(&mut state);

        state.stalls.iter_mut().for_each(|stall| *stall = None);
        state.last_update = self.clock.now();
        info!("Cleared all stalls");
        state.clone()
    }

    pub async fn clear_history(&self) -> BoardSnapshot {
        let mut state = self.state.write().await;
        state.clear_history();
        state.last_update = self.clock.now();
        info!("Cleared milking history");
        state.clone()
    }

    /// Expire the session history if it is due. Returns true if it was cleared.
    pub async fn sweep(&self) -> bool {
        let mut state = self.state.write().await;
        self.expire_history(&mut state)
    }

    pub async fn start_sweeper(&self) {
        let mut sweeper_guard = self.sweeper.lock().await;
        if let Some(handle) = sweeper_guard.take() {
            handle.abort();
        }

        let board = self.clone();
        let interval_secs = self.settings.sweep_interval_secs.max(1);

        let handle = tokio::spawn(async move {
            let mut interval = time::interval(Duration::from_secs(interval_secs));
            loop {
                interval.tick().await;
                board.sweep().await;
            }
        });

        info!("Stall board sweeper started (every {}s)", interval_secs);
        *sweeper_guard = Some(handle);
    }

    pub async fn stop_sweeper(&self) {
        if let Some(handle) = self.sweeper.lock().await.take() {
            handle.abort();
            info!("Stall board sweeper stopped");
        }
    }

    pub async fn is_sweeper_running(&self) -> bool {
        self.sweeper.lock().await.as_ref().map_or(false, |handle| !handle.is_finished())
    }

    fn stall_index(&self, stall: u32) -> Result<usize, StallBoardError> {
        if stall == 0 || stall > self.settings.stall_count {
            return Err(StallBoardError::StallOutOfRange { stall, count: self.settings.stall_count });
        }
        Ok((stall - 1) as usize)
    }

    fn expire_history(&self, state: &mut BoardSnapshot) -> bool {
        let Some(started) = state.session_started_at else {
            return false;
        };
        let now = self.clock.now();
        if now < started + ChronoDuration::hours(self.settings.history_ttl_hours) {
            return false;
        }

        debug!("Milking session from {} expired", started);
        state.clear_history();
        state.last_update = now;
        true
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MilkingCandidate {
    pub animal: Animal,
    pub assigned_stall: Option<u32>,
    pub already_milked: bool,
}

/// Cows that can be placed in a stall: active, calved and not dried off,
/// matching `search` by name (case-insensitive) or tag. Cows not yet in a
/// stall come first, then by name.
pub fn milking_candidates(animals: &[Animal], board: &BoardSnapshot, search: &str) -> Vec<MilkingCandidate> {
    let needle = search.trim().to_lowercase();

    let mut candidates: Vec<MilkingCandidate> = animals
        .iter()
        .filter(|animal| animal.active && animal.is_cow() && animal.dry_off_date.is_none())
        .filter(|animal| {
            needle.is_empty()
                || animal.name.to_lowercase().contains(&needle)
                || animal.tag_number.to_lowercase().contains(&needle)
        })
        .map(|animal| MilkingCandidate {
            assigned_stall: board.stall_of(animal.id),
            already_milked: board.is_already_milked(animal.id),
            animal: animal.clone(),
        })
        .collect();

    candidates.sort_by(|a, b| {
        a.assigned_stall
            .is_some()
            .cmp(&b.assigned_stall.is_some())
            .then_with(|| a.animal.name.to_lowercase().cmp(&b.animal.name.to_lowercase()))
            .then_with(|| a.animal.id.cmp(&b.animal.id))
    });
    candidates
}
