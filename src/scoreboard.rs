//! Session scoreboard
//!
//! Built purely from `SimEvent`s, so it never has to look inside the engine.
//! Dome ownership follows the last comet to land in each dome.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::sim::{CometPhase, Player, SimEvent};

/// Per-player tallies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerTally {
    pub launched: u32,
    pub hits: u32,
    pub misses: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scoreboard {
    pub player_one: PlayerTally,
    pub player_two: PlayerTally,
    /// Dome index -> current owner
    owners: BTreeMap<usize, Player>,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tally(&self, player: Player) -> &PlayerTally {
        match player {
            Player::One => &self.player_one,
            Player::Two => &self.player_two,
        }
    }

    fn tally_mut(&mut self, player: Player) -> &mut PlayerTally {
        match player {
            Player::One => &mut self.player_one,
            Player::Two => &mut self.player_two,
        }
    }

    pub fn record(&mut self, event: &SimEvent) {
        match *event {
            SimEvent::CometLaunched { player, .. } => self.tally_mut(player).launched += 1,
            SimEvent::CometStopped { player, phase, .. } => match phase {
                CometPhase::StoppedSuccess => self.tally_mut(player).hits += 1,
                CometPhase::StoppedFailure => self.tally_mut(player).misses += 1,
                CometPhase::Spinning => {}
            },
            SimEvent::DomeScored { dome, player, .. } => {
                self.owners.insert(dome, player);
            }
        }
    }

    pub fn record_all<'a>(&mut self, events: impl IntoIterator<Item = &'a SimEvent>) {
        for event in events {
            self.record(event);
        }
    }

    /// Owner of a dome, if anyone has landed in it
    pub fn owner(&self, dome: usize) -> Option<Player> {
        self.owners.get(&dome).copied()
    }

    /// Number of domes currently held by `player`
    pub fn domes_owned(&self, player: Player) -> usize {
        self.owners.values().filter(|&&p| p == player).count()
    }

    /// Player holding more domes, `None` on a tie
    pub fn leader(&self) -> Option<Player> {
        let one = self.domes_owned(Player::One);
        let two = self.domes_owned(Player::Two);
        match one.cmp(&two) {
            std::cmp::Ordering::Greater => Some(Player::One),
            std::cmp::Ordering::Less => Some(Player::Two),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Forget everything (new session)
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Color;

    fn stopped(player: Player, phase: CometPhase) -> SimEvent {
        SimEvent::CometStopped {
            comet_id: 1,
            player,
            node: 0,
            phase,
        }
    }

    fn scored(dome: usize, player: Player) -> SimEvent {
        SimEvent::DomeScored {
            dome,
            color: Color::BLACK,
            player,
        }
    }

    #[test]
    fn test_hits_and_misses() {
        let mut board = Scoreboard::new();
        board.record_all(&[
            SimEvent::CometLaunched {
                comet_id: 1,
                player: Player::One,
                node: 0,
            },
            stopped(Player::One, CometPhase::StoppedSuccess),
            stopped(Player::Two, CometPhase::StoppedFailure),
        ]);

        assert_eq!(board.tally(Player::One).launched, 1);
        assert_eq!(board.tally(Player::One).hits, 1);
        assert_eq!(board.tally(Player::Two).misses, 1);
        assert_eq!(board.tally(Player::Two).hits, 0);
    }

    #[test]
    fn test_dome_ownership_follows_last_hit() {
        let mut board = Scoreboard::new();
        board.record(&scored(2, Player::One));
        board.record(&scored(3, Player::One));
        assert_eq!(board.leader(), Some(Player::One));

        board.record(&scored(2, Player::Two));
        assert_eq!(board.owner(2), Some(Player::Two));
        assert_eq!(board.domes_owned(Player::One), 1);
        assert_eq!(board.leader(), None);

        board.reset();
        assert_eq!(board.owner(3), None);
        assert_eq!(board.tally(Player::One).launched, 0);
    }
}
