//! Game instance and core simulation types
//!
//! [`Game`] owns every piece of domain state: the physics world handle, the
//! body registry, the merge queue, the spawn controller, the game-over
//! detector and the score. Renderers and input layers only see the
//! read-only views and entry points exposed here.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::engine::CircleWorld;
use super::food::{Ordinal, Taxonomy};
use super::game_over::GameOverDetector;
use super::merge::MergeQueue;
use super::physics::{BodyId, BodyLabel, PhysicsWorld};
use super::registry::{BodyRegistry, spawn_food};
use super::spawn::{CurrentFood, SpawnController};
use crate::config::{Arena, ConfigError, GameConfig};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Run ended; physics is frozen
    GameOver,
}

/// Things that happened during a tick, for audio/visual feedback
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// A new piece appeared in the player's hand
    Spawned { ordinal: Ordinal },
    /// The held piece was released
    Dropped { id: BodyId, ordinal: Ordinal, pos: Vec2 },
    /// Two bodies merged; `into` is the successor tier, `None` at max tier
    Merged {
        ordinal: Ordinal,
        into: Option<Ordinal>,
        pos: Vec2,
        points: u64,
    },
    /// A settled piece crossed the death line
    DangerStarted,
    /// The death line is clear again
    DangerCleared,
    GameOver { final_score: u64 },
    Restarted,
}

/// A food body as the renderer sees it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoodView {
    pub id: BodyId,
    pub pos: Vec2,
    pub angle: f32,
    pub ordinal: Ordinal,
    pub radius: f32,
}

/// One running game
#[derive(Debug)]
pub struct Game<W: PhysicsWorld = CircleWorld> {
    pub(crate) config: GameConfig,
    /// Run seed for reproducibility
    seed: u64,
    pub(crate) rng: Pcg32,
    pub(crate) world: W,
    pub(crate) registry: BodyRegistry,
    pub(crate) merges: MergeQueue,
    pub(crate) spawner: SpawnController,
    pub(crate) detector: GameOverDetector,
    pub(crate) score: u64,
    pub(crate) phase: GamePhase,
    /// Simulation tick counter
    pub(crate) time_ticks: u64,
    /// Walls and floor
    boundaries: Vec<BodyId>,
    pub(crate) events: Vec<GameEvent>,
}

impl Game<CircleWorld> {
    /// Create a game on the bundled circle engine
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_world(CircleWorld::default(), config, seed)
    }
}

impl<W: PhysicsWorld> Game<W> {
    /// Create a game on an arbitrary physics world. The world should be
    /// empty; walls, floor and gravity are set up from `config`.
    pub fn with_world(mut world: W, config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;

        world.set_gravity(Vec2::new(0.0, config.gravity));
        let boundaries = build_container(&mut world, &config);

        let mut rng = Pcg32::seed_from_u64(seed);
        let spawner = SpawnController::new(&config.taxonomy, &mut rng, config.drop_cooldown_ticks());
        let detector = GameOverDetector::new(config.game_over_delay_ticks());

        let mut game = Self {
            config,
            seed,
            rng,
            world,
            registry: BodyRegistry::new(),
            merges: MergeQueue::new(),
            spawner,
            detector,
            score: 0,
            phase: GamePhase::Playing,
            time_ticks: 0,
            boundaries,
            events: Vec::new(),
        };
        game.spawn();

        log::info!("Game started with seed {}", seed);
        Ok(game)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.config.taxonomy
    }

    pub fn arena(&self) -> &Arena {
        &self.config.arena
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn registry(&self) -> &BodyRegistry {
        &self.registry
    }

    pub fn merge_queue(&self) -> &MergeQueue {
        &self.merges
    }

    pub fn detector(&self) -> &GameOverDetector {
        &self.detector
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Final score, once the game has ended
    pub fn final_score(&self) -> Option<u64> {
        self.is_over().then_some(self.score)
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    /// Events produced by the last tick
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Piece in the player's hand, if any
    pub fn current_food(&self) -> Option<&CurrentFood> {
        self.spawner.current()
    }

    /// Preview of the piece after the current one
    pub fn next_ordinal(&self) -> Ordinal {
        self.spawner.next_ordinal()
    }

    /// True while a drop is allowed
    pub fn can_drop(&self) -> bool {
        !self.is_over()
            && !self.spawner.is_cooling_down()
            && self.current_food().is_some_and(|f| !f.dropped)
    }

    /// Every registered food body, in id order
    pub fn food_bodies(&self) -> impl Iterator<Item = FoodView> + '_ {
        let taxonomy = &self.config.taxonomy;
        self.world
            .bodies()
            .filter(|b| b.label == BodyLabel::Food)
            .filter_map(move |body| {
                let ordinal = self.registry.lookup(body.id)?;
                Some(FoodView {
                    id: body.id,
                    pos: body.pos,
                    angle: body.angle,
                    ordinal,
                    radius: taxonomy.radius(ordinal),
                })
            })
    }

    /// Present the next piece. No-op once the game is over.
    pub fn spawn(&mut self) {
        if self.is_over() {
            return;
        }
        let ordinal = self
            .spawner
            .spawn(&self.config.taxonomy, &self.config.arena, &mut self.rng)
            .ordinal;
        self.events.push(GameEvent::Spawned { ordinal });
    }

    /// Move the held piece horizontally (clamped inside the walls)
    pub fn reposition(&mut self, x: f32) {
        if self.is_over() {
            return;
        }
        self.spawner.reposition(x, &self.config.taxonomy, &self.config.arena);
    }

    /// Release the held piece into the container.
    /// Returns the new body, or `None` if a drop isn't allowed right now.
    pub fn drop_food(&mut self) -> Option<BodyId> {
        if self.is_over() {
            return None;
        }
        let food = self.spawner.take_drop()?;
        let pos = food.pos();
        let id = self.insert_food(pos, food.ordinal)?;
        log::debug!("Dropped tier {} as {} at x={:.1}", food.ordinal, id, pos.x);
        self.events.push(GameEvent::Dropped {
            id,
            ordinal: food.ordinal,
            pos,
        });
        Some(id)
    }

    /// Place a food body directly (scripted scenes, tests).
    /// Returns `None` for an ordinal the taxonomy doesn't have.
    pub fn insert_food(&mut self, pos: Vec2, ordinal: Ordinal) -> Option<BodyId> {
        self.config.taxonomy.tier(ordinal)?;
        Some(spawn_food(
            &mut self.world,
            &mut self.registry,
            &self.config.taxonomy,
            pos,
            ordinal,
            self.config.food_material,
        ))
    }

    /// Full reset: clear food, queue, score and timers, then spawn again
    pub fn restart(&mut self) {
        for id in self.registry.ids() {
            self.world.remove_body(id);
        }
        // Anything food-labelled that slipped past the registry goes too
        let stray: Vec<BodyId> = self
            .world
            .bodies()
            .filter(|b| b.label == BodyLabel::Food)
            .map(|b| b.id)
            .collect();
        for id in stray {
            self.world.remove_body(id);
        }
        self.world.drain_collision_starts();

        self.registry.clear();
        self.merges.clear();
        self.detector.reset();
        self.spawner.reset(&self.config.taxonomy, &mut self.rng);
        self.score = 0;
        self.time_ticks = 0;
        self.phase = GamePhase::Playing;
        self.events.clear();
        self.events.push(GameEvent::Restarted);

        log::info!("Game restarted");
        self.spawn();
    }

    /// Transition to the terminal state
    pub(crate) fn end(&mut self) {
        if self.is_over() {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.merges.clear();
        log::info!("Game over! Final score: {}", self.score);
        self.events.push(GameEvent::GameOver {
            final_score: self.score,
        });
    }

    /// Walls and floor created for this game
    pub fn boundaries(&self) -> &[BodyId] {
        &self.boundaries
    }
}

/// Add the U-shaped container: two side walls and a floor
fn build_container<W: PhysicsWorld>(world: &mut W, config: &GameConfig) -> Vec<BodyId> {
    let arena = &config.arena;
    let thickness = arena.wall_thickness;
    let wall_height = arena.bottom() - arena.top;
    let wall_center_y = (arena.top + arena.bottom()) / 2.0;

    let left = world.add_static_rect(
        Vec2::new(arena.left() - thickness / 2.0, wall_center_y),
        Vec2::new(thickness, wall_height),
        config.wall_friction,
        BodyLabel::Wall,
    );
    let right = world.add_static_rect(
        Vec2::new(arena.right() + thickness / 2.0, wall_center_y),
        Vec2::new(thickness, wall_height),
        config.wall_friction,
        BodyLabel::Wall,
    );
    // Floor spans the whole canvas so nothing slips past the wall feet
    let floor = world.add_static_rect(
        Vec2::new(arena.width / 2.0, arena.bottom() + thickness / 2.0),
        Vec2::new(arena.width, thickness),
        config.floor_friction,
        BodyLabel::Floor,
    );

    vec![left, right, floor]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game() {
        let game = Game::new(GameConfig::default(), 12345).unwrap();
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.score(), 0);
        assert_eq!(game.boundaries().len(), 3);
        assert!(game.registry().is_empty());

        let current = game.current_food().unwrap();
        assert!(current.ordinal < 5);
        assert!(!current.dropped);
        assert!(game.can_drop());
        assert_eq!(game.events(), &[GameEvent::Spawned { ordinal: current.ordinal }]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = GameConfig::default();
        config.taxonomy.tiers.clear();
        config.taxonomy.spawn_weights.clear();
        assert!(matches!(Game::new(config, 1), Err(ConfigError::EmptyTaxonomy)));
    }

    #[test]
    fn test_insert_unknown_tier_refused() {
        let mut game = Game::new(GameConfig::default(), 5).unwrap();
        let unknown = game.taxonomy().len() as Ordinal;

        assert!(game.insert_food(Vec2::new(200.0, 600.0), unknown).is_none());
        assert!(game.registry().is_empty());
        assert_eq!(game.food_bodies().count(), 0);

        let id = game.insert_food(Vec2::new(200.0, 600.0), 0).unwrap();
        assert_eq!(game.registry().lookup(id), Some(0));
    }

    #[test]
    fn test_same_seed_same_pieces() {
        let a = Game::new(GameConfig::default(), 99).unwrap();
        let b = Game::new(GameConfig::default(), 99).unwrap();
        assert_eq!(a.current_food(), b.current_food());
        assert_eq!(a.next_ordinal(), b.next_ordinal());
    }

    #[test]
    fn test_drop_registers_body() {
        let mut game = Game::new(GameConfig::default(), 1).unwrap();
        game.reposition(100.0);
        let ordinal = game.current_food().unwrap().ordinal;

        let id = game.drop_food().unwrap();
        assert_eq!(game.registry().lookup(id), Some(ordinal));
        let view = game.food_bodies().next().unwrap();
        assert_eq!(view.id, id);
        assert_eq!(view.pos.x, 100.0);
        assert!(!game.can_drop());
    }

    #[test]
    fn test_double_drop_creates_one_body() {
        let mut game = Game::new(GameConfig::default(), 1).unwrap();
        assert!(game.drop_food().is_some());
        assert!(game.drop_food().is_none());
        assert_eq!(game.food_bodies().count(), 1);
    }

    #[test]
    fn test_restart_clears_everything() {
        let mut game = Game::new(GameConfig::default(), 5).unwrap();
        game.insert_food(Vec2::new(100.0, 600.0), 3);
        game.insert_food(Vec2::new(300.0, 600.0), 3);
        game.drop_food();
        game.score = 40;
        game.end();
        assert!(game.is_over());

        game.restart();
        assert!(!game.is_over());
        assert_eq!(game.score(), 0);
        assert!(game.registry().is_empty());
        assert_eq!(game.food_bodies().count(), 0);
        assert!(game.merge_queue().is_empty());
        assert!(game.can_drop());
        // Walls and floor survive
        for &id in game.boundaries() {
            assert!(game.world().body(id).is_some());
        }
    }

    #[test]
    fn test_input_ignored_after_game_over() {
        let mut game = Game::new(GameConfig::default(), 5).unwrap();
        game.end();
        let before = *game.current_food().unwrap();
        game.reposition(50.0);
        assert_eq!(*game.current_food().unwrap(), before);
        assert!(game.drop_food().is_none());
        game.spawn();
        assert_eq!(game.final_score(), Some(0));
    }
}
