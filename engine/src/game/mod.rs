//! The game world: registry, animation catalog, ability tuning and the
//! fixed simulation pipeline that advances it one tick at a time.

pub mod abilities;
pub mod animation;
pub mod collision;
pub mod debug;
pub mod input;
pub mod lifespan;
pub mod movement;
pub mod pipeline;
pub mod render;
pub mod spawn;
pub mod state;

use crate::anim::Catalog;
use crate::config::{AssetSource, GameConfig};
use crate::ecs::entity::{Id, Tag};
use crate::ecs::registry::Registry;
use crate::math::Vec2;

pub use debug::DebugFlags;
pub use input::{Button, InputEvent};
pub use pipeline::{FRAME_PIPELINE, Stage};
pub use render::Surface;
pub use state::TransitionPolicy;

/// The whole simulated world.
///
/// A tick commits the registry's pending lifecycle changes, then runs every
/// stage of [`FRAME_PIPELINE`] in order. Rendering is pulled separately by
/// the host via [`Game::render`].
pub struct Game {
    registry: Registry,
    catalog: Catalog,
    config: GameConfig,
    policy: TransitionPolicy,
    frame: u64,
    player_has_bone: bool,
    debug: DebugFlags,
    paused: bool,
    running: bool,
}

impl Game {
    /// Build a world from config, loading animations through the asset
    /// source. Starts empty; spawn a level before ticking.
    pub fn new(config: GameConfig, assets: &mut dyn AssetSource) -> Self {
        let catalog = Catalog::load(&config, assets);
        Self {
            registry: Registry::new(),
            catalog,
            config,
            policy: TransitionPolicy::default(),
            frame: 0,
            player_has_bone: true,
            debug: DebugFlags::default(),
            paused: false,
            running: true,
        }
    }

    /// Populate the built-in test level.
    pub fn spawn_test_level(&mut self) {
        spawn::test_level(&mut self.registry, &self.catalog, &self.config.abilities);
    }

    /// Spawn just the player, for hosts building their own level.
    pub fn spawn_player(&mut self) -> Id {
        spawn::player(&mut self.registry, &self.catalog, &self.config.abilities)
    }

    /// Advance the world one fixed tick, feeding it this tick's input
    /// events. While paused only input is processed.
    pub fn tick(&mut self, events: &[input::InputEvent]) {
        // Session-level buttons act on the container, not the player
        for event in events {
            match event {
                InputEvent::Pressed(Button::Pause) => self.paused = !self.paused,
                InputEvent::Pressed(Button::Quit) => self.running = false,
                _ => {}
            }
        }

        self.registry.commit();

        for stage in FRAME_PIPELINE {
            if self.paused && stage != Stage::Input {
                continue;
            }
            self.run_stage(stage, events);
        }

        self.frame += 1;
    }

    fn run_stage(&mut self, stage: Stage, events: &[input::InputEvent]) {
        match stage {
            Stage::Input => input::apply(&mut self.registry, &self.config.abilities, events),
            Stage::Movement => {
                movement::run(&mut self.registry, &self.config.abilities, self.frame)
            }
            Stage::Collision => collision::run(&mut self.registry),
            Stage::Attack => abilities::attack(&mut self.registry, self.policy),
            Stage::BoneThrow => {
                let outcome = abilities::bone_throw(
                    &mut self.registry,
                    &self.catalog,
                    &self.config.abilities,
                    self.policy,
                    self.player_has_bone,
                );
                if outcome.thrown {
                    self.player_has_bone = false;
                }
            }
            Stage::Lifespan => {
                if lifespan::run(&mut self.registry) {
                    self.player_has_bone = true;
                }
            }
            Stage::Animation => {
                animation::run(&mut self.registry, &self.catalog, self.player_has_bone)
            }
        }
    }

    /// Draw the current world state onto a host surface.
    pub fn render(&self, surface: &mut dyn Surface) {
        render::run(&self.registry, self.debug, surface);
    }

    /// The oldest player entity's id, if one exists.
    pub fn player(&self) -> Option<Id> {
        self.registry.first_by_tag(Tag::Player).map(|p| p.id())
    }

    /// Convenience lookup for hosts and tests: the player's position.
    pub fn player_pos(&self) -> Option<Vec2> {
        let player = self.registry.first_by_tag(Tag::Player)?;
        player.try_get::<crate::ecs::component::Transform>().map(|t| t.pos)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn player_has_bone(&self) -> bool {
        self.player_has_bone
    }

    pub fn debug_flags(&self) -> DebugFlags {
        self.debug
    }

    pub fn debug_flags_mut(&mut self) -> &mut DebugFlags {
        &mut self.debug
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// False once a quit has been requested; hosts end their loop on it.
    pub fn running(&self) -> bool {
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AssetError;
    use crate::ecs::component::Transform;
    use crate::math::Vec2;

    struct NoAssets;

    impl AssetSource for NoAssets {
        fn texture_size(&mut self, path: &str) -> Result<Vec2, AssetError> {
            Err(AssetError { path: path.to_string() })
        }
    }

    fn game() -> Game {
        Game::new(GameConfig::default(), &mut NoAssets)
    }

    #[test]
    fn tick_commits_before_running_systems() {
        // Given - a pending platform and player
        let mut game = game();
        spawn::platform(game.registry_mut(), Vec2::new(0.0, 100.0), Vec2::new(400.0, 20.0));
        assert_eq!(game.registry().live_count(), 0);

        // When
        game.tick(&[]);

        // Then
        assert_eq!(game.registry().live_count(), 1);
        assert_eq!(game.frame(), 1);
    }

    #[test]
    fn paused_game_freezes_the_world_but_reads_input() {
        // Given - a player standing in midair
        let mut game = game();
        game.spawn_test_level();
        game.tick(&[]);
        let before = game.player_pos().unwrap();

        // When
        game.set_paused(true);
        game.tick(&[InputEvent::Pressed(Button::Right)]);
        game.tick(&[]);

        // Then - no motion, but the press registered
        assert_eq!(game.player_pos().unwrap(), before);
        let player = game.player().unwrap();
        let entity = game.registry().get(player).unwrap();
        assert!(entity.get::<crate::ecs::component::Input>().right);

        // When - unpause
        game.set_paused(false);
        game.tick(&[]);

        // Then
        assert_ne!(game.player_pos().unwrap(), before);
    }

    #[test]
    fn pause_button_toggles_and_quit_stops_the_session() {
        // Given
        let mut game = game();
        assert!(game.running());

        // When
        game.tick(&[InputEvent::Pressed(Button::Pause)]);

        // Then
        assert!(game.paused());

        // When
        game.tick(&[InputEvent::Pressed(Button::Pause)]);

        // Then
        assert!(!game.paused());

        // When
        game.tick(&[InputEvent::Pressed(Button::Quit)]);

        // Then
        assert!(!game.running());
    }

    #[test]
    fn player_starts_with_the_bone() {
        // Given
        let game = game();

        // Then
        assert!(game.player_has_bone());
    }

    #[test]
    fn player_pos_reads_transform() {
        // Given
        let mut game = game();
        game.spawn_test_level();

        // Then - spawn position before any ticks
        let player = game.player().unwrap();
        let pos = game.registry().get(player).unwrap().get::<Transform>().pos;
        assert_eq!(pos, Vec2::new(100.0, 100.0));
        assert_eq!(game.player_pos(), Some(pos));
    }
}
