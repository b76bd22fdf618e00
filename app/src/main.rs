//! Headless host: runs a scripted session of the simulation at a fixed 60hz
//! step, drains the engine's log channel and prints a world summary. Stands
//! in for a windowed host while exercising the full pipeline.

use std::collections::HashMap;

use log::LevelFilter;
use platformer_engine::config::{AssetError, AssetSource, GameConfig};
use platformer_engine::game::debug;
use platformer_engine::game::{Button, InputEvent};
use platformer_engine::math::Vec2;
use platformer_engine::{ChannelLogger, Game, SIXTY_FPS, Time};

const SESSION_TICKS: u64 = 600;

const CONFIG_JSON: &str = r#"{
    "player_sprites": {
        "idle": "idle_strip9.png",
        "dashstart": "dashstart_strip6.png",
        "dash": "dash_strip8.png",
        "dashstop": "dashstop_strip5.png",
        "dashturn": "dashturn_strip4.png",
        "jump": "jump_strip6.png",
        "doublejump": "doublejump_strip7.png",
        "fall": "fall_strip5.png",
        "dattack": "dattack_strip10.png",
        "ftilt": "ftilt_strip7.png",
        "uspecial": "uspecial_strip8.png",
        "bone": "bone.png"
    },
    "freya_sprites": {
        "freya_idle": "freya_idle_strip4.png",
        "freya_walk": "freya_walk_strip6.png",
        "freya_attack": "freya_attack_strip8.png"
    }
}"#;

/// Canned texture metadata in place of a real texture loader: every strip is
/// 64px per frame and 96px tall. Frame counts come from the file names.
struct StubAssets;

impl AssetSource for StubAssets {
    fn texture_size(&mut self, path: &str) -> Result<Vec2, AssetError> {
        let file = path.rsplit('/').next().unwrap_or(path);
        let frames = platformer_engine::config::strip_frame_count(file);
        Ok(Vec2::new(frames as f32 * 64.0, 96.0))
    }
}

/// The scripted input for a tick: run right, hop, double-jump, dash through
/// the landing, then attack and throw the bone.
fn script(tick: u64) -> Vec<InputEvent> {
    let mut events = Vec::new();
    match tick {
        30 => events.push(InputEvent::Pressed(Button::Right)),
        90 => events.push(InputEvent::Pressed(Button::Jump)),
        100 => events.push(InputEvent::Released(Button::Jump)),
        110 => events.push(InputEvent::Pressed(Button::Jump)),
        120 => events.push(InputEvent::Released(Button::Jump)),
        160 => {
            events.push(InputEvent::Released(Button::Right));
            events.push(InputEvent::Pressed(Button::Dash));
        }
        170 => events.push(InputEvent::Released(Button::Dash)),
        300 => events.push(InputEvent::Pressed(Button::Attack)),
        310 => events.push(InputEvent::Released(Button::Attack)),
        420 => events.push(InputEvent::Pressed(Button::Throw)),
        _ => {}
    }
    events
}

fn main() {
    let (logger, log_recv) = ChannelLogger::with_receiver();
    if log::set_boxed_logger(Box::new(logger)).is_ok() {
        log::set_max_level(LevelFilter::Info);
    }

    let config = match GameConfig::from_json(CONFIG_JSON) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return;
        }
    };

    let mut game = Game::new(config, &mut StubAssets);
    game.spawn_test_level();

    println!("loaded {} animations", debug::animation_names(game.catalog()).len());

    // Fixed-step loop: wall time feeds the accumulator, each fixed step runs
    // one simulation tick against the scripted input.
    let mut time = Time::new(SIXTY_FPS);
    while game.running() && game.frame() < SESSION_TICKS {
        time = time.next();
        while time.has_fixed() && game.frame() < SESSION_TICKS {
            time.increment_fixed();
            let events = script(game.frame());
            game.tick(&events);
        }

        for msg in log_recv.try_iter() {
            println!("[{}] {}", msg.level, msg.message);
        }
        std::thread::sleep(std::time::Duration::from_millis(1));
    }

    println!("--- session over after {} ticks ---", game.frame());

    let mut by_tag: HashMap<&str, usize> = HashMap::new();
    for entry in debug::entity_list(game.registry()) {
        *by_tag.entry(entry.tag.as_str()).or_default() += 1;
    }
    let mut counts: Vec<(&str, usize)> = by_tag.into_iter().collect();
    counts.sort();
    for (tag, count) in counts {
        println!("{tag}: {count}");
    }

    if let Some(snapshot) = debug::player_snapshot(game.registry()) {
        println!(
            "player: {} facing {} jumps_left={} bone={}",
            snapshot.state,
            if snapshot.facing_right { "right" } else { "left" },
            snapshot.jumps_left,
            game.player_has_bone(),
        );
        for (action, remaining) in snapshot.cooldowns {
            println!("  cooldown {action}: {remaining}");
        }
    }

    if let Some(pos) = game.player_pos() {
        println!("player at ({:.1}, {:.1})", pos.x, pos.y);
    }
}
