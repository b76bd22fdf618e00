//! Player state machine: the transition policy table, state locks and the
//! grounded/airborne state resolution driven by input.

use crate::ecs::component::{
    Action, Buffer, Input, Jump, PlayerState, State, Transform,
};
use crate::ecs::entity::Entity;

/// Horizontal run speed in pixels per tick.
pub const MOVE_SPEED: f32 = 5.0;
/// Vertical jump impulse. Negative is up.
pub const JUMP_VELOCITY: f32 = -10.0;
/// Frames the state machine locks while playing the turn-around animation.
pub const TURN_LOCK_FRAMES: i32 = 5;

/// The table of forbidden state transitions.
///
/// Transitions are allowed by default; the table only lists exceptions. Locks
/// are handled separately: while `lock_frames > 0` nothing may transition at
/// all.
#[derive(Debug, Clone, Copy)]
pub struct TransitionPolicy {
    forbidden: &'static [(PlayerState, PlayerState)],
}

impl TransitionPolicy {
    pub fn allows(self, from: PlayerState, to: PlayerState) -> bool {
        !self.forbidden.contains(&(from, to))
    }
}

impl Default for TransitionPolicy {
    fn default() -> Self {
        // A dash cannot be cancelled into an attack.
        Self { forbidden: &[(PlayerState::Dashing, PlayerState::Attacking)] }
    }
}

/// Ground contact resets jump resources and consumes a buffered jump
/// immediately, so a press a few frames before touchdown still comes out.
pub(crate) fn handle_landing(entity: &mut Entity, max_jumps: i32) {
    let jump = entity.get_mut::<Jump>();
    jump.jumps_left = max_jumps;
    jump.jump_released = true;

    if entity.get::<Buffer>().contains(Action::Jump) {
        entity.get_mut::<Transform>().velocity.y = JUMP_VELOCITY;
        let jump = entity.get_mut::<Jump>();
        jump.jumps_left -= 1;
        jump.jump_released = false;
        entity.get_mut::<Buffer>().clear(Action::Jump);
        entity.get_mut::<State>().state = PlayerState::Jump1;
    }
}

/// Resolve held movement input into velocity and the matching state.
///
/// Runs only when the player is neither dashing nor state-locked. Handles
/// turn-around locks, the double-jump charge ladder, coyote time and the
/// grounded run/idle states.
pub(crate) fn resolve_player_input(entity: &mut Entity, on_ground_now: bool) {
    let input = *entity.get::<Input>();
    let prev_vel_x = entity.get::<Transform>().velocity.x;

    entity.get_mut::<Transform>().velocity.x = 0.0;
    if input.left {
        entity.get_mut::<Transform>().velocity.x = -MOVE_SPEED;
        if entity.get::<State>().facing_right && turn_around(entity, false, on_ground_now) {
            return;
        }
    } else if input.right {
        entity.get_mut::<Transform>().velocity.x = MOVE_SPEED;
        if !entity.get::<State>().facing_right && turn_around(entity, true, on_ground_now) {
            return;
        }
    }

    // Buffered jump, edge-triggered on the held key
    let jump = *entity.get::<Jump>();
    let jump_requested = input.up || entity.get::<Buffer>().contains(Action::Jump);
    let fresh_jump = jump.jump_released && input.up;

    if jump_requested && fresh_jump && (jump.jumps_left > 0 || jump.coyote_timer > 0) {
        entity.get_mut::<Transform>().velocity.y = JUMP_VELOCITY;

        let jump = entity.get_mut::<Jump>();
        if jump.coyote_timer > 0 {
            // A coyote jump is the ground jump the player just missed; it
            // does not spend an air charge.
            jump.coyote_timer = 0;
        } else {
            jump.jumps_left -= 1;
        }
        jump.jump_released = false;
        let jumps_left = jump.jumps_left;
        entity.get_mut::<Buffer>().clear(Action::Jump);

        let state = entity.get_mut::<State>();
        if jumps_left == 1 && state.state != PlayerState::Jump1 {
            state.state = PlayerState::Jump1;
        } else if jumps_left == 0 && state.state != PlayerState::Jump2 {
            state.state = PlayerState::Jump2;
        }
        return;
    }

    // Air states
    if !on_ground_now {
        let vel_y = entity.get::<Transform>().velocity.y;
        let jumps_left = entity.get::<Jump>().jumps_left;
        let state = entity.get_mut::<State>();
        if vel_y < 0.0 {
            if jumps_left == 1 && state.state != PlayerState::Jump1 {
                state.state = PlayerState::Jump1;
            } else if jumps_left == 0 && state.state != PlayerState::Jump2 {
                state.state = PlayerState::Jump2;
            }
        } else if state.state != PlayerState::Falling {
            state.state = PlayerState::Falling;
        }
        return;
    }

    // Grounded movement states, keyed on the velocity edge
    let vel_x = entity.get::<Transform>().velocity.x;
    let state = entity.get_mut::<State>();
    if prev_vel_x == 0.0 && vel_x != 0.0 {
        state.state = PlayerState::RunningStart;
    } else if prev_vel_x != 0.0 && vel_x == 0.0 {
        state.state = PlayerState::RunningStop;
    } else if vel_x != 0.0 {
        state.state = PlayerState::Running;
    } else {
        state.state = PlayerState::Idle;
    }
}

/// Flip facing; on the ground this also plays the turn animation under a
/// short lock. Returns true when the lock was taken.
fn turn_around(entity: &mut Entity, face_right: bool, on_ground_now: bool) -> bool {
    let state = entity.get_mut::<State>();
    state.facing_right = face_right;
    if on_ground_now && state.state != PlayerState::RunningTurn {
        state.state = PlayerState::RunningTurn;
        state.lock_frames = TURN_LOCK_FRAMES;
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::entity::{Id, Tag};
    use crate::math::Vec2;

    fn player() -> Entity {
        let mut entity = Entity::new(Id(0), Tag::Player);
        entity.insert(Transform::default());
        entity.insert(Input::default());
        entity.insert(State::default());
        entity.insert(Jump::default());
        entity.insert(Buffer::default());
        entity
    }

    #[test]
    fn policy_forbids_dash_into_attack() {
        // Given
        let policy = TransitionPolicy::default();

        // Then
        assert!(!policy.allows(PlayerState::Dashing, PlayerState::Attacking));
        assert!(policy.allows(PlayerState::Attacking, PlayerState::Dashing));
        assert!(policy.allows(PlayerState::Idle, PlayerState::Attacking));
        assert!(policy.allows(PlayerState::Dashing, PlayerState::Falling));
    }

    #[test]
    fn held_right_runs_right() {
        // Given
        let mut p = player();
        p.get_mut::<Input>().right = true;
        p.get_mut::<State>().state = PlayerState::Running; // already moving
        p.get_mut::<Transform>().velocity.x = MOVE_SPEED;

        // When
        resolve_player_input(&mut p, true);

        // Then
        assert_eq!(p.get::<Transform>().velocity.x, MOVE_SPEED);
        assert_eq!(p.get::<State>().state, PlayerState::Running);
    }

    #[test]
    fn starting_to_move_enters_running_start() {
        // Given - standing still, then press right
        let mut p = player();
        p.get_mut::<Input>().right = true;

        // When
        resolve_player_input(&mut p, true);

        // Then
        assert_eq!(p.get::<State>().state, PlayerState::RunningStart);
    }

    #[test]
    fn stopping_enters_running_stop() {
        // Given - moving, keys released
        let mut p = player();
        p.get_mut::<Transform>().velocity.x = MOVE_SPEED;
        p.get_mut::<State>().state = PlayerState::Running;

        // When
        resolve_player_input(&mut p, true);

        // Then
        assert_eq!(p.get::<Transform>().velocity.x, 0.0);
        assert_eq!(p.get::<State>().state, PlayerState::RunningStop);
    }

    #[test]
    fn grounded_turn_takes_a_lock() {
        // Given - facing right, press left on the ground
        let mut p = player();
        p.get_mut::<Input>().left = true;

        // When
        resolve_player_input(&mut p, true);

        // Then
        let state = p.get::<State>();
        assert!(!state.facing_right);
        assert_eq!(state.state, PlayerState::RunningTurn);
        assert_eq!(state.lock_frames, TURN_LOCK_FRAMES);
    }

    #[test]
    fn airborne_turn_does_not_lock() {
        // Given
        let mut p = player();
        p.get_mut::<Input>().left = true;

        // When
        resolve_player_input(&mut p, false);

        // Then - facing flips but no turn animation mid-air
        let state = p.get::<State>();
        assert!(!state.facing_right);
        assert_ne!(state.state, PlayerState::RunningTurn);
        assert_eq!(state.lock_frames, 0);
    }

    #[test]
    fn ground_jump_spends_first_charge() {
        // Given
        let mut p = player();
        p.get_mut::<Input>().up = true;

        // When
        resolve_player_input(&mut p, true);

        // Then
        assert_eq!(p.get::<Transform>().velocity.y, JUMP_VELOCITY);
        let jump = p.get::<Jump>();
        assert_eq!(jump.jumps_left, 1);
        assert!(!jump.jump_released);
        assert_eq!(p.get::<State>().state, PlayerState::Jump1);
    }

    #[test]
    fn held_key_does_not_double_jump() {
        // Given - first jump consumed, key still held
        let mut p = player();
        p.get_mut::<Input>().up = true;
        resolve_player_input(&mut p, true);

        // When - next frame, key never released
        resolve_player_input(&mut p, false);

        // Then - still one charge left
        assert_eq!(p.get::<Jump>().jumps_left, 1);
    }

    #[test]
    fn release_and_press_spends_second_charge() {
        // Given - airborne after first jump
        let mut p = player();
        p.get_mut::<Input>().up = true;
        resolve_player_input(&mut p, true);

        // When - release, then press again mid-air
        p.get_mut::<Input>().up = false;
        p.get_mut::<Jump>().jump_released = true;
        p.get_mut::<Input>().up = true;
        resolve_player_input(&mut p, false);

        // Then
        assert_eq!(p.get::<Jump>().jumps_left, 0);
        assert_eq!(p.get::<State>().state, PlayerState::Jump2);
        assert_eq!(p.get::<Transform>().velocity.y, JUMP_VELOCITY);
    }

    #[test]
    fn exhausted_charges_refuse_a_third_jump() {
        // Given - both charges spent
        let mut p = player();
        p.get_mut::<Jump>().jumps_left = 0;
        p.get_mut::<Jump>().jump_released = true;
        p.get_mut::<Input>().up = true;

        // When
        resolve_player_input(&mut p, false);

        // Then - no impulse
        assert_eq!(p.get::<Transform>().velocity.y, 0.0);
    }

    #[test]
    fn coyote_jump_preserves_air_charges() {
        // Given - just walked off a ledge, coyote window open
        let mut p = player();
        p.get_mut::<Jump>().coyote_timer = 3;
        p.get_mut::<Input>().up = true;

        // When
        resolve_player_input(&mut p, false);

        // Then - jumped without spending a charge
        assert_eq!(p.get::<Transform>().velocity.y, JUMP_VELOCITY);
        let jump = p.get::<Jump>();
        assert_eq!(jump.jumps_left, 2);
        assert_eq!(jump.coyote_timer, 0);
    }

    #[test]
    fn falling_state_when_descending() {
        // Given
        let mut p = player();
        p.get_mut::<Transform>().velocity.y = 4.0;

        // When
        resolve_player_input(&mut p, false);

        // Then
        assert_eq!(p.get::<State>().state, PlayerState::Falling);
    }

    #[test]
    fn landing_restores_charges_and_consumes_buffered_jump() {
        // Given - airborne with a jump pressed during the last few frames
        let mut p = player();
        p.get_mut::<Jump>().jumps_left = 0;
        p.get_mut::<Buffer>().push(Action::Jump, Buffer::WINDOW);

        // When
        handle_landing(&mut p, 2);

        // Then - jump came out on touchdown
        assert_eq!(p.get::<Transform>().velocity.y, JUMP_VELOCITY);
        assert_eq!(p.get::<Jump>().jumps_left, 1);
        assert!(!p.get::<Jump>().jump_released);
        assert!(!p.get::<Buffer>().contains(Action::Jump));
        assert_eq!(p.get::<State>().state, PlayerState::Jump1);
    }

    #[test]
    fn landing_without_buffer_just_restores() {
        // Given
        let mut p = player();
        p.get_mut::<Jump>().jumps_left = 0;
        p.get_mut::<Jump>().jump_released = false;

        // When
        handle_landing(&mut p, 2);

        // Then
        assert_eq!(p.get::<Jump>().jumps_left, 2);
        assert!(p.get::<Jump>().jump_released);
        assert_eq!(p.get::<Transform>().velocity.y, 0.0);
    }
}
