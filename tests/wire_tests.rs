//! Pins the public wire contract so codec refactors cannot silently move
//! bytes that deployed clients depend on.

use net_tetris::types::{Phase, TetInput};
use net_tetris::wire::{decode_input, FRAME_HEADER_LEN, SCOREBOARD_FRAME_LEN, STATE_FRAME_LEN};

#[test]
fn test_frame_sizes_are_fixed() {
    assert_eq!(FRAME_HEADER_LEN, 16);
    assert_eq!(STATE_FRAME_LEN, 196);
    assert_eq!(SCOREBOARD_FRAME_LEN, 40);
}

#[test]
fn test_phase_bytes_are_pinned() {
    assert_eq!(Phase::Win.to_byte(), 0x00);
    assert_eq!(Phase::Stopped.to_byte(), 0x01);
    assert_eq!(Phase::InProgress.to_byte(), 0x02);
    assert_eq!(Phase::Lose.to_byte(), 0xFF);
}

#[test]
fn test_input_bytes_are_pinned() {
    let pinned = [
        (0, TetInput::Void),
        (1, TetInput::Left),
        (2, TetInput::Right),
        (3, TetInput::Down),
        (4, TetInput::DownInstant),
        (5, TetInput::RotateCw),
        (6, TetInput::RotateCcw),
        (7, TetInput::Cheat),
        (8, TetInput::Pause),
        (9, TetInput::Restart),
        (10, TetInput::Faster),
        (11, TetInput::Slower),
    ];
    for (byte, input) in pinned {
        assert_eq!(input.to_byte(), byte);
        assert_eq!(decode_input(byte).expect("in range"), input);
    }
    assert!(decode_input(12).is_err());
    assert!(decode_input(0xFF).is_err());
}
