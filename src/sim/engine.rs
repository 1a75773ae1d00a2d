//! Per-tick simulation engine
//!
//! One `SimulationEngine` owns everything a session mutates: dome colors,
//! the live comet collection and the node buffer. `tick` takes `&mut self`,
//! so at most one tick is ever in flight.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::dome::{Dome, find_dome};
use super::ring::RingTopology;
use super::state::{Color, Comet, CometPhase, Player, SimEvent};
use crate::config::RingConfig;
use crate::error::ConfigError;
use crate::renderer::{Frame, FrameSink};

pub struct SimulationEngine {
    ring: RingTopology,
    config: RingConfig,
    /// Fixed membership, stable order
    domes: Vec<Dome>,
    /// `true` for every node covered by a dome
    dome_mask: Vec<bool>,
    /// Live comets in launch order
    comets: Vec<Comet>,
    buffer: Vec<Color>,
    events: Vec<SimEvent>,
    rng: Pcg32,
    next_id: u32,
    tick_count: u64,
}

impl SimulationEngine {
    pub fn new(config: RingConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let ring = RingTopology::new(config.num_nodes)?;

        let domes: Vec<Dome> = config
            .domes
            .iter()
            .map(|p| Dome::new(p.start, p.width, config.background))
            .collect();

        let mut dome_mask = vec![false; ring.num_nodes()];
        for dome in &domes {
            dome_mask[dome.start..dome.end()].fill(true);
        }

        Ok(Self {
            ring,
            domes,
            dome_mask,
            comets: Vec::new(),
            buffer: vec![config.background; ring.num_nodes()],
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(config.seed),
            next_id: 1,
            tick_count: 0,
            config,
        })
    }

    pub fn ring(&self) -> &RingTopology {
        &self.ring
    }

    pub fn config(&self) -> &RingConfig {
        &self.config
    }

    pub fn domes(&self) -> &[Dome] {
        &self.domes
    }

    pub fn dome_mask(&self) -> &[bool] {
        &self.dome_mask
    }

    pub fn comets(&self) -> &[Comet] {
        &self.comets
    }

    /// Frame produced by the last tick
    pub fn buffer(&self) -> &[Color] {
        &self.buffer
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// No comets left in flight
    pub fn is_idle(&self) -> bool {
        self.comets.is_empty()
    }

    /// Take every event queued since the last drain
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Launch a comet for `player`; returns its id
    pub fn launch(&mut self, player: Player, start_position: f64) -> u32 {
        let id = self.next_id;
        self.next_id += 1;

        let jitter = self.config.launch_jitter;
        let speed = if jitter > 0.0 {
            (self.config.start_speed + self.rng.random_range(-jitter..=jitter)).max(0.0)
        } else {
            self.config.start_speed
        };

        let comet = Comet::new(
            id,
            player,
            self.config.player_color(player),
            speed,
            start_position,
            &self.ring,
        );
        log::info!(
            "Player {} launched comet {} at node {} (speed {:.2})",
            player.number(),
            id,
            comet.node,
            speed
        );
        self.events.push(SimEvent::CometLaunched {
            comet_id: id,
            player,
            node: comet.node,
        });
        self.comets.push(comet);
        id
    }

    /// Launch from node 0
    pub fn launch_default(&mut self, player: Player) -> u32 {
        self.launch(player, 0.0)
    }

    /// Run one tick and hand the finished frame to `sink`
    pub fn tick(&mut self, elapsed: f64, sink: &mut dyn FrameSink) {
        self.advance(elapsed);
        sink.present(&Frame {
            colors: &self.buffer,
            dome_mask: &self.dome_mask,
        });
    }

    /// Run one tick without presenting it
    pub fn advance(&mut self, elapsed: f64) {
        self.tick_count += 1;

        self.buffer.fill(self.config.background);
        self.update_domes();
        self.update_comets(elapsed);

        for dome in &self.domes {
            dome.paint(&mut self.buffer);
        }
        // Later comets win shared nodes
        for comet in &self.comets {
            self.buffer[comet.node] = comet.color;
        }

        self.cleanup();
    }

    /// Clear comets and dome colors for a new session
    pub fn reset_session(&mut self) {
        let background = self.config.background;
        for dome in &mut self.domes {
            dome.reset(background);
        }
        self.comets.clear();
        self.events.clear();
        self.buffer.fill(background);
        log::info!("Session reset ({} domes cleared)", self.domes.len());
    }

    /// Dome idle animation hook
    fn update_domes(&mut self) {}

    fn update_comets(&mut self, elapsed: f64) {
        let acceleration = self.config.acceleration;
        for comet in &mut self.comets {
            match comet.phase {
                CometPhase::Spinning => comet.step_spin(elapsed, acceleration, &self.ring),
                // No success animation yet; the comet just holds its node
                CometPhase::StoppedSuccess => {}
                CometPhase::StoppedFailure => {
                    log::debug!("Comet {} failure step at node {}", comet.id, comet.node);
                }
            }
        }
    }

    /// Stop and remove every comet that has slowed past the threshold
    fn cleanup(&mut self) {
        let removal_speed = self.config.removal_speed;

        let mut removed: Vec<usize> = Vec::new();
        for comet in &mut self.comets {
            if comet.can_remove(removal_speed) {
                Self::stop_comet(comet, &mut self.domes, &mut self.events);
                removed.push(comet.node);
            }
        }
        if removed.is_empty() {
            return;
        }

        self.comets.retain(|c| !c.phase.is_stopped());
        for node in removed {
            self.buffer[node] = self.config.background;
        }
    }

    /// Stop a comet in place and score the dome it landed in, if any
    fn stop_comet(comet: &mut Comet, domes: &mut [Dome], events: &mut Vec<SimEvent>) {
        comet.speed = 0.0;
        let hit = find_dome(domes, comet.node);
        comet.phase = if hit.is_some() {
            CometPhase::StoppedSuccess
        } else {
            CometPhase::StoppedFailure
        };

        log::debug!(
            "Comet {} (player {}) stopped at node {}: {:?}",
            comet.id,
            comet.player.number(),
            comet.node,
            comet.phase
        );
        events.push(SimEvent::CometStopped {
            comet_id: comet.id,
            player: comet.player,
            node: comet.node,
            phase: comet.phase,
        });

        if let Some(index) = hit {
            domes[index].resolve_hit(comet.color);
            events.push(SimEvent::DomeScored {
                dome: index,
                color: comet.color,
                player: comet.player,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DomePlacement;
    use crate::renderer::RecordingSink;

    fn engine_with_domes(domes: Vec<DomePlacement>) -> SimulationEngine {
        SimulationEngine::new(RingConfig {
            domes,
            ..Default::default()
        })
        .unwrap()
    }

    fn stops(events: &[SimEvent]) -> Vec<(u32, usize, CometPhase)> {
        events
            .iter()
            .filter_map(|e| match *e {
                SimEvent::CometStopped {
                    comet_id,
                    node,
                    phase,
                    ..
                } => Some((comet_id, node, phase)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_reference_spin_sequence() {
        let mut engine = engine_with_domes(vec![DomePlacement { start: 0, width: 4 }]);
        engine.launch_default(Player::One);
        engine.drain_events();

        let expected = [
            5, 10, 14, 19, 23, 27, 31, 34, 38, 1, 4, 7, 9, 12, 14, 16, 18, 19, 21,
        ];
        // Same integration, written out longhand
        let (mut position, mut speed) = (0.0f64, 5.0f64);
        for &node in &expected {
            engine.advance(1.0);
            let distance = speed * 1.0;
            speed = speed.abs() - 0.2;
            position = (position + distance).rem_euclid(40.0);

            let comet = &engine.comets()[0];
            assert_eq!(comet.node, node);
            assert_eq!(comet.position, position);
            assert_eq!(comet.phase, CometPhase::Spinning);
            assert!(engine.drain_events().is_empty());
        }

        // Tick 20: |speed| drops to 1 at node 22, outside the only dome
        engine.advance(1.0);
        assert!(engine.is_idle());
        let events = engine.drain_events();
        assert_eq!(stops(&events), vec![(1, 22, CometPhase::StoppedFailure)]);
        assert_eq!(engine.buffer()[22], Color::BLACK);
        assert_eq!(engine.domes()[0].color, Color::BLACK);
    }

    #[test]
    fn test_stop_inside_dome_scores_it() {
        let mut engine = engine_with_domes(vec![DomePlacement { start: 20, width: 4 }]);
        let p1 = engine.config().player_one_color;
        engine.launch_default(Player::One);

        for _ in 0..20 {
            engine.advance(1.0);
        }
        assert!(engine.is_idle());

        let events = engine.drain_events();
        assert_eq!(stops(&events), vec![(1, 22, CometPhase::StoppedSuccess)]);
        assert!(events.contains(&SimEvent::DomeScored {
            dome: 0,
            color: p1,
            player: Player::One,
        }));
        assert_eq!(engine.domes()[0].color, p1);
        // The removed comet's node is cleared for this frame only
        assert_eq!(engine.buffer()[22], Color::BLACK);

        engine.advance(1.0);
        assert_eq!(&engine.buffer()[20..24], &[p1; 4]);
        assert!(engine.buffer()[..20].iter().all(|&c| c == Color::BLACK));
    }

    #[test]
    fn test_no_ghost_after_removal() {
        let mut engine = engine_with_domes(vec![DomePlacement { start: 0, width: 4 }]);
        let p1 = engine.config().player_one_color;
        engine.launch_default(Player::One);

        for _ in 0..20 {
            engine.advance(1.0);
        }
        assert!(engine.is_idle());

        engine.advance(1.0);
        assert!(engine.buffer().iter().all(|&c| c != p1));
    }

    #[test]
    fn test_later_comet_wins_shared_node() {
        let mut engine = SimulationEngine::new(RingConfig::default()).unwrap();
        let (p1, p2) = (
            engine.config().player_one_color,
            engine.config().player_two_color,
        );

        engine.launch_default(Player::One);
        engine.launch_default(Player::Two);
        engine.advance(0.0);
        assert_eq!(engine.buffer()[0], p2);

        let mut engine = SimulationEngine::new(RingConfig::default()).unwrap();
        engine.launch_default(Player::Two);
        engine.launch_default(Player::One);
        engine.advance(0.0);
        assert_eq!(engine.buffer()[0], p1);
    }

    #[test]
    fn test_opposite_comets_meet() {
        let mut engine = engine_with_domes(Vec::new());
        let p2 = engine.config().player_two_color;

        engine.launch(Player::One, 0.0);
        engine.launch(Player::Two, 10.0);
        engine.advance(1.0);

        let nodes: Vec<usize> = engine.comets().iter().map(|c| c.node).collect();
        assert_eq!(nodes, vec![5, 5]);
        assert_eq!(engine.buffer()[5], p2);
    }

    #[test]
    fn test_comets_from_same_node_meet_across_ring() {
        let mut engine = engine_with_domes(Vec::new());
        let p2 = engine.config().player_two_color;

        engine.launch_default(Player::One);
        engine.launch_default(Player::Two);

        let mut met = None;
        for tick in 1..=20 {
            engine.advance(0.4);
            let comets = engine.comets();
            assert_eq!(comets.len(), 2);
            if comets[0].node == comets[1].node {
                met = Some((tick, comets[0].node));
                break;
            }
        }

        // 19.76 forward and 20.24 backward both light node 20
        assert_eq!(met, Some((13, 20)));
        assert_eq!(engine.buffer()[20], p2);
    }

    #[test]
    fn test_first_tick_half_node_ties_to_even() {
        let mut engine = SimulationEngine::new(RingConfig::default()).unwrap();
        engine.launch_default(Player::One);
        engine.advance(0.1);

        let comet = &engine.comets()[0];
        assert_eq!(comet.position, 0.5);
        assert_eq!(comet.node, 0);
        assert_eq!(engine.buffer()[0], engine.config().player_one_color);
    }

    #[test]
    fn test_comet_paints_over_dome() {
        let mut engine = engine_with_domes(vec![DomePlacement { start: 20, width: 4 }]);
        let (p1, p2) = (
            engine.config().player_one_color,
            engine.config().player_two_color,
        );
        engine.launch_default(Player::One);
        for _ in 0..20 {
            engine.advance(1.0);
        }

        engine.launch(Player::Two, 21.0);
        engine.advance(0.0);
        assert_eq!(engine.buffer()[20], p1);
        assert_eq!(engine.buffer()[21], p2);
        assert_eq!(engine.buffer()[22], p1);
    }

    #[test]
    fn test_buffer_only_holds_known_colors() {
        let mut engine = SimulationEngine::new(RingConfig::default()).unwrap();
        engine.launch_default(Player::One);
        engine.launch_default(Player::Two);

        for _ in 0..400 {
            engine.advance(0.1);
            assert_eq!(engine.buffer().len(), 40);

            let mut allowed = vec![engine.config().background];
            allowed.extend(engine.domes().iter().map(|d| d.color));
            allowed.extend(engine.comets().iter().map(|c| c.color));
            assert!(engine.buffer().iter().all(|c| allowed.contains(c)));

            for comet in engine.comets() {
                assert!(comet.node < 40);
                assert_eq!(comet.node, engine.ring().to_index(comet.position));
            }
        }
        assert!(engine.is_idle());
    }

    #[test]
    fn test_each_comet_stops_exactly_once() {
        let mut engine = SimulationEngine::new(RingConfig::default()).unwrap();
        let a = engine.launch_default(Player::One);
        let b = engine.launch_default(Player::Two);

        let mut all = Vec::new();
        for _ in 0..400 {
            engine.advance(0.1);
            all.extend(engine.drain_events());
        }

        let stopped = stops(&all);
        assert_eq!(stopped.iter().filter(|s| s.0 == a).count(), 1);
        assert_eq!(stopped.iter().filter(|s| s.0 == b).count(), 1);

        // Each outcome agrees with dome membership of the final node
        for (_, node, phase) in stopped {
            let inside = find_dome(engine.domes(), node).is_some();
            assert_eq!(phase == CometPhase::StoppedSuccess, inside);
        }
    }

    #[test]
    fn test_slow_launch_stops_on_first_tick() {
        let mut engine = SimulationEngine::new(RingConfig {
            start_speed: 0.5,
            ..Default::default()
        })
        .unwrap();
        engine.launch(Player::One, 2.0);
        engine.advance(1.0);

        assert!(engine.is_idle());
        // 2.0 + 0.5 = 2.5 ties to node 2, inside dome [0, 4)
        assert_eq!(engine.domes()[0].color, engine.config().player_one_color);
    }

    #[test]
    fn test_tick_presents_frame() {
        let mut engine = SimulationEngine::new(RingConfig::default()).unwrap();
        let mut sink = RecordingSink::new();
        engine.launch_default(Player::One);

        engine.tick(0.1, &mut sink);
        engine.tick(0.1, &mut sink);

        assert_eq!(sink.frames.len(), 2);
        let frame = sink.last().unwrap();
        assert_eq!(frame.colors, engine.buffer());
        assert_eq!(frame.dome_mask, engine.dome_mask());
        assert_eq!(frame.dome_mask.iter().filter(|&&d| d).count(), 20);
        assert_eq!(engine.tick_count(), 2);
    }

    #[test]
    fn test_reset_session() {
        let mut engine = engine_with_domes(vec![DomePlacement { start: 20, width: 4 }]);
        engine.launch_default(Player::One);
        for _ in 0..20 {
            engine.advance(1.0);
        }
        engine.launch_default(Player::Two);
        assert_ne!(engine.domes()[0].color, Color::BLACK);

        engine.reset_session();
        assert!(engine.is_idle());
        assert_eq!(engine.domes()[0].color, Color::BLACK);
        assert!(engine.buffer().iter().all(|&c| c == Color::BLACK));
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn test_launch_jitter_is_seeded() {
        let config = RingConfig {
            launch_jitter: 1.0,
            seed: 42,
            ..Default::default()
        };
        let mut a = SimulationEngine::new(config.clone()).unwrap();
        let mut b = SimulationEngine::new(config).unwrap();
        for _ in 0..5 {
            a.launch_default(Player::One);
            b.launch_default(Player::One);
        }

        for (ca, cb) in a.comets().iter().zip(b.comets()) {
            assert_eq!(ca.speed, cb.speed);
            assert!((4.0..=6.0).contains(&ca.speed));
        }

        let mut plain = SimulationEngine::new(RingConfig::default()).unwrap();
        plain.launch_default(Player::Two);
        assert_eq!(plain.comets()[0].speed, 5.0);
    }

    #[test]
    fn test_lowest_accepted_removal_speed_still_stops() {
        let mut engine = SimulationEngine::new(RingConfig {
            removal_speed: 0.1,
            ..Default::default()
        })
        .unwrap();
        engine.launch_default(Player::One);

        let mut last = f64::INFINITY;
        for _ in 0..100 {
            if engine.is_idle() {
                break;
            }
            engine.advance(1.0);
            if let Some(comet) = engine.comets().first() {
                assert!(comet.speed.abs() <= last);
                last = comet.speed.abs();
            }
        }
        assert!(engine.is_idle());

        let rejected = SimulationEngine::new(RingConfig {
            removal_speed: 0.0,
            ..Default::default()
        });
        assert!(matches!(rejected, Err(ConfigError::NeverStops { .. })));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = SimulationEngine::new(RingConfig {
            domes: vec![
                DomePlacement { start: 0, width: 4 },
                DomePlacement { start: 3, width: 4 },
            ],
            ..Default::default()
        });
        assert!(matches!(
            result,
            Err(ConfigError::OverlappingDomes { first: 0, second: 1 })
        ));
    }
}
