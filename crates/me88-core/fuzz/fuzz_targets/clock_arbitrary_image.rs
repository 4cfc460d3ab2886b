#![no_main]

use libfuzzer_sys::fuzz_target;
use me88_core::{Machine, MachineConfig, SystemBus};

const MAX_CLOCKS: u64 = 4_096;

fuzz_target!(|data: &[u8]| {
    let Some((&vector, program)) = data.split_first() else {
        return;
    };

    let config = MachineConfig::default();
    let Ok(mut machine) = Machine::power_on(&config, program, Some(program)) else {
        return;
    };

    for clock in 0..MAX_CLOCKS {
        if clock == MAX_CLOCKS / 2 {
            machine.raise_interrupt(vector);
        }
        machine.on_clock();
    }

    let status = machine.status();
    assert!(status.log.len() <= config.bus_log_capacity);
    assert!(status.lines.mar <= 0xF_FFFF);

    let mut bus = machine.bus().clone();
    let _ = bus.read(u32::from(vector) << 12);
});
