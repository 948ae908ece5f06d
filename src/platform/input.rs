//! Keyboard and pointer mapping

use crate::sim::InputEvent;

/// Pointer or touch contact changing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Up,
}

/// Map a `KeyboardEvent.code` to an input event.
///
/// Only the jump keys report releases; the other keys act on key down.
/// Auto-repeated key downs should be dropped by the caller.
pub fn key_to_input(code: &str, pressed: bool) -> Option<InputEvent> {
    match (code, pressed) {
        ("Space" | "ArrowUp" | "KeyW", true) => Some(InputEvent::JumpPress),
        ("Space" | "ArrowUp" | "KeyW", false) => Some(InputEvent::JumpRelease),
        ("Enter", true) => Some(InputEvent::Start),
        ("KeyR", true) => Some(InputEvent::Restart),
        ("KeyM", true) => Some(InputEvent::ToggleMute),
        _ => None,
    }
}

/// Any pointer or touch on the canvas is the jump button
pub fn pointer_to_input(phase: PointerPhase) -> InputEvent {
    match phase {
        PointerPhase::Down => InputEvent::JumpPress,
        PointerPhase::Up => InputEvent::JumpRelease,
    }
}

/// Keys whose browser default (page scroll) should be suppressed
pub fn is_game_key(code: &str) -> bool {
    matches!(code, "Space" | "ArrowUp")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jump_keys() {
        assert_eq!(key_to_input("Space", true), Some(InputEvent::JumpPress));
        assert_eq!(key_to_input("ArrowUp", false), Some(InputEvent::JumpRelease));
        assert_eq!(key_to_input("KeyW", true), Some(InputEvent::JumpPress));
    }

    #[test]
    fn test_command_keys_fire_on_press_only() {
        assert_eq!(key_to_input("Enter", true), Some(InputEvent::Start));
        assert_eq!(key_to_input("KeyR", true), Some(InputEvent::Restart));
        assert_eq!(key_to_input("KeyM", true), Some(InputEvent::ToggleMute));
        assert_eq!(key_to_input("KeyM", false), None);
        assert_eq!(key_to_input("KeyQ", true), None);
    }

    #[test]
    fn test_pointer_is_jump() {
        assert_eq!(pointer_to_input(PointerPhase::Down), InputEvent::JumpPress);
        assert_eq!(pointer_to_input(PointerPhase::Up), InputEvent::JumpRelease);
        assert!(is_game_key("Space"));
        assert!(!is_game_key("KeyM"));
    }
}
