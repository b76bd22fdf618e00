//! Input application: logical button events become component flags plus
//! buffered actions on the controlled entity.
//!
//! The host translates whatever device it reads into [`InputEvent`]s; the
//! engine only knows logical buttons. Presses of the ability buttons also
//! buffer the matching action so a press during a lock still counts for a
//! few frames.

use crate::config::AbilityConfig;
use crate::ecs::component::{Action, Buffer, Input, Jump, State};
use crate::ecs::entity::Tag;
use crate::ecs::registry::Registry;

/// A device-independent button.
///
/// `Pause` and `Quit` act on the game container rather than the player and
/// are ignored here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Jump,
    Left,
    Right,
    Down,
    Attack,
    Dash,
    Throw,
    Pause,
    Quit,
}

/// One edge of a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Pressed(Button),
    Released(Button),
}

/// Apply a frame's worth of events to the player.
pub(crate) fn apply(registry: &mut Registry, abilities: &AbilityConfig, events: &[InputEvent]) {
    let Some(player_id) = registry.first_by_tag(Tag::Player).map(|p| p.id()) else {
        return;
    };
    let Some(player) = registry.get_mut(player_id) else { return };
    if !player.has::<Input>() {
        return;
    }

    let window = abilities.buffer_window;
    for event in events {
        match event {
            InputEvent::Pressed(button) => match button {
                Button::Jump => {
                    player.get_mut::<Input>().up = true;
                    player.get_mut::<Buffer>().push(Action::Jump, window);
                }
                Button::Left => {
                    player.get_mut::<Input>().left = true;
                    player.get_mut::<State>().facing_right = false;
                }
                Button::Right => {
                    player.get_mut::<Input>().right = true;
                    player.get_mut::<State>().facing_right = true;
                }
                Button::Down => player.get_mut::<Input>().down = true,
                Button::Attack => {
                    player.get_mut::<Input>().attack = true;
                    player.get_mut::<Buffer>().push(Action::Attack, window);
                }
                Button::Dash => {
                    player.get_mut::<Input>().dash = true;
                    player.get_mut::<Buffer>().push(Action::Dash, window);
                }
                Button::Throw => {
                    player.get_mut::<Input>().throw = true;
                    player.get_mut::<Buffer>().push(Action::BoneThrow, window);
                }
                Button::Pause | Button::Quit => {}
            },
            InputEvent::Released(button) => match button {
                Button::Jump => {
                    player.get_mut::<Input>().up = false;
                    // Re-arm the edge trigger for the next jump press
                    if player.has::<Jump>() {
                        player.get_mut::<Jump>().jump_released = true;
                    }
                }
                Button::Left => player.get_mut::<Input>().left = false,
                Button::Right => player.get_mut::<Input>().right = false,
                Button::Down => player.get_mut::<Input>().down = false,
                Button::Attack => player.get_mut::<Input>().attack = false,
                Button::Dash => player.get_mut::<Input>().dash = false,
                // The throw flag clears itself when the throw fires
                Button::Throw | Button::Pause | Button::Quit => {}
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world_with_player() -> (Registry, AbilityConfig) {
        let mut registry = Registry::new();
        let id = registry.create(Tag::Player);
        let p = registry.get_mut(id).unwrap();
        p.insert(Input::default());
        p.insert(Buffer::default());
        p.insert(State::default());
        p.insert(Jump::default());
        (registry, AbilityConfig::default())
    }

    fn player_of(registry: &Registry) -> &crate::ecs::entity::Entity {
        registry.first_by_tag(Tag::Player).unwrap()
    }

    #[test]
    fn jump_press_sets_flag_and_buffers() {
        // Given
        let (mut registry, abilities) = world_with_player();

        // When
        apply(&mut registry, &abilities, &[InputEvent::Pressed(Button::Jump)]);

        // Then
        let p = player_of(&registry);
        assert!(p.get::<Input>().up);
        assert!(p.get::<Buffer>().contains(Action::Jump));
    }

    #[test]
    fn jump_release_rearms_edge_trigger() {
        // Given - jump spent
        let (mut registry, abilities) = world_with_player();
        {
            let id = registry.first_by_tag(Tag::Player).unwrap().id();
            registry.get_mut(id).unwrap().get_mut::<Jump>().jump_released = false;
        }

        // When
        apply(&mut registry, &abilities, &[InputEvent::Released(Button::Jump)]);

        // Then
        let p = player_of(&registry);
        assert!(!p.get::<Input>().up);
        assert!(p.get::<Jump>().jump_released);
    }

    #[test]
    fn direction_presses_set_facing() {
        // Given
        let (mut registry, abilities) = world_with_player();

        // When
        apply(&mut registry, &abilities, &[InputEvent::Pressed(Button::Left)]);

        // Then
        assert!(!player_of(&registry).get::<State>().facing_right);

        // When
        apply(
            &mut registry,
            &abilities,
            &[InputEvent::Released(Button::Left), InputEvent::Pressed(Button::Right)],
        );

        // Then
        let p = player_of(&registry);
        assert!(!p.get::<Input>().left);
        assert!(p.get::<Input>().right);
        assert!(p.get::<State>().facing_right);
    }

    #[test]
    fn ability_presses_buffer_their_actions() {
        // Given
        let (mut registry, abilities) = world_with_player();

        // When
        apply(
            &mut registry,
            &abilities,
            &[
                InputEvent::Pressed(Button::Attack),
                InputEvent::Pressed(Button::Dash),
                InputEvent::Pressed(Button::Throw),
            ],
        );

        // Then
        let buffer = player_of(&registry).get::<Buffer>();
        assert!(buffer.contains(Action::Attack));
        assert!(buffer.contains(Action::Dash));
        assert!(buffer.contains(Action::BoneThrow));
    }

    #[test]
    fn events_without_a_player_are_dropped() {
        // Given - empty world
        let mut registry = Registry::new();
        let abilities = AbilityConfig::default();

        // When - must not panic
        apply(&mut registry, &abilities, &[InputEvent::Pressed(Button::Jump)]);
    }
}
