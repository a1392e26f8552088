//! Headless demo binary: loads an iNES ROM and runs the core for a fixed
//! number of frames, logging CPU/PPU state. No GUI shell, no input polling,
//! no configuration beyond the ROM path — those are out of scope for the
//! core and are left to a frontend that embeds this crate.

use std::env;
use std::process::ExitCode;

use nescore::{Cartridge, Core};

fn main() -> ExitCode {
    env_logger::init();

    let mut args = env::args();
    let program = args.next().unwrap_or_else(|| "nescore".to_string());
    let Some(rom_path) = args.next() else {
        eprintln!("usage: {program} <rom.nes>");
        return ExitCode::FAILURE;
    };

    let cartridge = match Cartridge::from_ines_file(&rom_path) {
        Ok(cart) => cart,
        Err(err) => {
            log::error!("failed to load {rom_path}: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut core = Core::new();
    core.reset(cartridge);

    const FRAMES: u32 = 60;
    for frame in 0..FRAMES {
        core.tick_until_vblank();
        let snapshot = core.ppu_snapshot();
        log::debug!(
            "frame {frame}: pc={:#06x} a={:#04x} x={:#04x} y={:#04x} status={:#04x} scanline={} dot={}",
            core.cpu().pc(),
            core.cpu().a(),
            core.cpu().x(),
            core.cpu().y(),
            core.cpu().status(),
            snapshot.scanline,
            snapshot.dot,
        );
    }

    println!("ran {FRAMES} frames from {rom_path}");
    ExitCode::SUCCESS
}
