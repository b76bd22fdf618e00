//! Simulation core for a 2D platform-action game.
//!
//! The crate is host-agnostic: it owns the entity store, the fixed-tick
//! pipeline (input, movement, collision, abilities, lifespans, animation)
//! and the sprite-strip animation catalog, while windowing, textures and
//! real input devices stay on the host side behind the [`config::AssetSource`]
//! and [`game::Surface`] seams.

pub mod anim;
pub mod config;
pub mod core;
pub mod ecs;
pub mod game;
pub mod math;

pub use crate::core::log::{ChannelLogger, LogMessage};
pub use crate::core::time::{SIXTY_FPS, Time};
pub use crate::game::Game;
