//! Whole-machine runs from binary-text images through to `hlt`.

use me88_core::{
    encode_image, load_image, parse_image, Machine, MachineConfig, MemoryRegion, RunOutcome,
    DEFAULT_RESET_CS,
};
use proptest::prelude::*;
use rand as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;
use tracing as _;

const PUSH_POP_PROGRAM: &str = "01100000\n00000101\n00001011\n00001100\n00010101\n";

#[test]
fn push_pop_program_halts_with_al_restored() {
    let program = parse_image(PUSH_POP_PROGRAM).expect("valid image");
    assert_eq!(program, vec![0x60, 0x05, 0x0B, 0x0C, 0x15]);

    let mut machine =
        Machine::power_on(&MachineConfig::default(), &program, None).expect("power on");
    let outcome = machine.run_until_halt(1_000);
    assert!(matches!(outcome, RunOutcome::Halted { .. }));

    let status = machine.status();
    assert!(status.halted);
    assert_eq!(status.registers.al(), 0x05);
    assert_eq!(status.registers.sp(), 0x0000);
    assert_eq!(status.registers.cs(), DEFAULT_RESET_CS);
    assert_eq!(status.clocks, outcome.clocks());
}

#[test]
fn images_load_from_disk() {
    let dir = tempfile::tempdir().expect("temp dir");
    let program_path = dir.path().join("program.txt");
    let handler_path = dir.path().join("interrupts.txt");
    std::fs::write(&program_path, encode_image(&[0x66, 0x21, 0x15])).expect("write program");
    std::fs::write(&handler_path, encode_image(&[0x60, 0x42, 0x16])).expect("write handler");

    let program = load_image(&program_path).expect("program");
    let handler = load_image(&handler_path).expect("handler");
    let mut machine =
        Machine::power_on(&MachineConfig::default(), &program, Some(&handler)).expect("power on");
    machine.run_until_halt(1_000);

    assert!(machine.is_halted());
    assert_eq!(machine.status().registers.al(), 0x42);
}

#[test]
fn video_writes_show_up_in_the_text_dump() {
    // DS = 0xA000, then store 'h' and 'i' at offsets 1 and 0.
    let program = [
        0x60, 0xA0, 0x01, 0x60, 0x00, 0x07, // AX = 0xA000; DS = AX
        0x60, b'h', 0xA0, 0x01, 0x00, // store at ds:0001
        0x60, b'i', 0xA0, 0x00, 0x00, // store at ds:0000
        0x15,
    ];
    let mut machine =
        Machine::power_on(&MachineConfig::default(), &program, None).expect("power on");
    machine.run_until_halt(1_000);

    let video = machine.device(MemoryRegion::Video).expect("video");
    assert_eq!(video.populated(), 2);
    assert_eq!(machine.dumps()[3], "Dump Video: hi\n");
}

#[test]
fn reset_replays_the_same_program() {
    let program = [0x60, 0x09, 0x62, 0x01, 0x15];
    let mut machine =
        Machine::power_on(&MachineConfig::default(), &program, None).expect("power on");
    let first = machine.run_until_halt(1_000);
    machine.on_reset();
    assert!(!machine.is_halted());
    let second = machine.run_until_halt(1_000);

    assert_eq!(first, second);
    assert_eq!(machine.status().registers.al(), 0x0A);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn same_seed_gives_identical_runs(program in proptest::collection::vec(any::<u8>(), 1..64), seed in any::<u64>()) {
        let config = MachineConfig::default().with_noise_seed(seed);
        let mut left = Machine::power_on(&config, &program, None).expect("power on");
        let mut right = Machine::power_on(&config, &program, None).expect("power on");

        let left_outcome = left.run_until_halt(512);
        let right_outcome = right.run_until_halt(512);

        prop_assert_eq!(left_outcome, right_outcome);
        prop_assert_eq!(left.status(), right.status());
        prop_assert_eq!(left.dumps(), right.dumps());
    }

    #[test]
    fn log_never_exceeds_capacity(program in proptest::collection::vec(any::<u8>(), 1..64), capacity in 0_usize..16) {
        let config = MachineConfig { bus_log_capacity: capacity, ..MachineConfig::default() };
        let mut machine = Machine::power_on(&config, &program, None).expect("power on");
        machine.run_until_halt(256);
        prop_assert!(machine.status().log.len() <= capacity);
    }
}
