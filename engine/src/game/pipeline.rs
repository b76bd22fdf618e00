//! The fixed per-tick system order.
//!
//! Every tick runs the same stages in the same sequence, after the registry
//! commit. The order is data, not code, so hosts and tests can inspect it.

use std::fmt;

/// One system slot in the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Input,
    Movement,
    Collision,
    Attack,
    BoneThrow,
    Lifespan,
    Animation,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Input => "input",
            Stage::Movement => "movement",
            Stage::Collision => "collision",
            Stage::Attack => "attack",
            Stage::BoneThrow => "bone_throw",
            Stage::Lifespan => "lifespan",
            Stage::Animation => "animation",
        };
        f.write_str(name)
    }
}

/// The stage order of a simulation tick. Rendering is not a stage; hosts
/// draw whenever they like between ticks.
pub const FRAME_PIPELINE: [Stage; 7] = [
    Stage::Input,
    Stage::Movement,
    Stage::Collision,
    Stage::Attack,
    Stage::BoneThrow,
    Stage::Lifespan,
    Stage::Animation,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_resolves_before_physics_and_animation_closes_the_tick() {
        // Given
        let position = |stage| FRAME_PIPELINE.iter().position(|s| *s == stage).unwrap();

        // Then
        assert_eq!(position(Stage::Input), 0);
        assert!(position(Stage::Movement) < position(Stage::Collision));
        assert!(position(Stage::Collision) < position(Stage::Attack));
        assert_eq!(position(Stage::Animation), FRAME_PIPELINE.len() - 1);
    }
}
