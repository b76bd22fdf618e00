//! Sprite-strip animation playback.
//!
//! An [`Animation`] steps through the frames of a horizontal sprite strip at
//! a fixed per-frame tick duration. Looping animations wrap; one-shot
//! animations hold their final frame and report [`Animation::finished`]. The
//! [`Catalog`] owns one prototype per logical name, loaded from config, and
//! hands out fresh copies for entities to play.

use std::collections::HashMap;

use crate::config::{AssetError, AssetSource, GameConfig, strip_frame_count};
use crate::math::{Color, Vec2};

/// Ticks each strip frame stays on screen unless the config says otherwise.
pub const DEFAULT_FRAME_DURATION: u32 = 8;

/// Animations that play once and hold their final frame instead of looping.
const ONE_SHOT: &[&str] = &["dattack", "ftilt", "jump", "doublejump", "uspecial", "freya_attack"];

/// Geometry of a loaded sprite strip: the backing texture name, how many
/// frames it holds and the size of each frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Strip {
    pub texture: String,
    pub frame_count: u32,
    pub frame_size: Vec2,
}

impl Strip {
    pub fn new(texture: impl Into<String>, frame_count: u32, texture_size: Vec2) -> Self {
        let frame_count = frame_count.max(1);
        Self {
            texture: texture.into(),
            frame_count,
            frame_size: Vec2::new(texture_size.x / frame_count as f32, texture_size.y),
        }
    }
}

// frame_count is never below one, so stepping math can rely on it. The
// default is the textureless single-frame strip entities fall back to when
// their sprite failed to load.
impl Default for Strip {
    fn default() -> Self {
        Self { texture: String::new(), frame_count: 1, frame_size: Vec2::ZERO }
    }
}

/// A playing instance of a strip animation, plus the display attributes the
/// renderer stamps on before drawing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Animation {
    pub strip: Strip,
    pub looping: bool,
    frame_duration: u32,
    tick: u32,
    frame: u32,
    finished: bool,

    pub pos: Vec2,
    pub angle: f32,
    pub scale: Vec2,
    pub tint: Color,
}

impl Animation {
    pub fn from_strip(strip: Strip, frame_duration: u32, looping: bool) -> Self {
        Self {
            strip,
            looping,
            frame_duration: frame_duration.max(1),
            tick: 0,
            frame: 0,
            finished: false,
            pos: Vec2::ZERO,
            angle: 0.0,
            scale: Vec2::new(1.0, 1.0),
            tint: Color::WHITE,
        }
    }

    /// Advance one simulation tick. A finished one-shot stays on its final
    /// frame.
    pub fn update(&mut self) {
        if self.finished {
            return;
        }

        self.tick += 1;
        if self.tick < self.frame_duration {
            return;
        }

        self.tick = 0;
        self.frame += 1;
        if self.frame >= self.strip.frame_count {
            if self.looping {
                self.frame = 0;
            } else {
                self.frame = self.strip.frame_count.saturating_sub(1);
                self.finished = true;
            }
        }
    }

    /// Rewind to the first frame and clear the finished flag.
    pub fn restart(&mut self) {
        self.tick = 0;
        self.frame = 0;
        self.finished = false;
    }

    pub fn finished(&self) -> bool {
        self.finished
    }

    pub fn frame_index(&self) -> u32 {
        self.frame
    }

    /// The texture sub-rectangle of the current frame: top-left and size.
    pub fn frame_rect(&self) -> (Vec2, Vec2) {
        let origin = Vec2::new(self.frame as f32 * self.strip.frame_size.x, 0.0);
        (origin, self.strip.frame_size)
    }
}

/// One load attempt's outcome, surfaced to the host's debug console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadMessage {
    Loaded { name: String, frames: u32 },
    Failed { path: String },
}

/// Library of animation prototypes keyed by logical name.
#[derive(Debug, Default)]
pub struct Catalog {
    animations: HashMap<String, Animation>,
    messages: Vec<LoadMessage>,
}

impl Catalog {
    /// Load every strip the config names. Individual failures are logged and
    /// recorded but do not abort the load; a missing sprite costs one
    /// animation, not the whole game.
    pub fn load(config: &GameConfig, source: &mut dyn AssetSource) -> Self {
        let mut catalog = Self::default();
        let player = config.player_sprites.iter().map(|(n, f)| (n, f, "sprites/"));
        let freya = config.freya_sprites.iter().map(|(n, f)| (n, f, "enemy_sprites/freya/"));

        for (name, file, base_dir) in player.chain(freya) {
            let path = format!("{base_dir}{file}");
            match source.texture_size(&path) {
                Ok(size) => catalog.add_strip(name, &path, file, size),
                Err(AssetError { path }) => {
                    log::warn!("failed to load texture: {path}");
                    catalog.messages.push(LoadMessage::Failed { path });
                }
            }
        }

        if catalog.animations.is_empty() {
            log::warn!("no animations found in config");
        }
        catalog
    }

    fn add_strip(&mut self, name: &str, path: &str, file: &str, texture_size: Vec2) {
        let frames = strip_frame_count(file);
        let strip = Strip::new(path, frames, texture_size);
        let looping = !ONE_SHOT.contains(&name);
        self.animations
            .insert(name.to_string(), Animation::from_strip(strip, DEFAULT_FRAME_DURATION, looping));
        self.messages.push(LoadMessage::Loaded { name: name.to_string(), frames });
    }

    /// A fresh copy of the named animation, rewound to its first frame.
    pub fn instantiate(&self, name: &str) -> Option<Animation> {
        self.animations.get(name).map(|proto| {
            let mut anim = proto.clone();
            anim.restart();
            anim
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.animations.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.animations.keys().map(String::as_str)
    }

    pub fn messages(&self) -> &[LoadMessage] {
        &self.messages
    }
}
