//! The Game Boy facade: owns the CPU (and, through it, every peripheral)
//! and drives them forward in lockstep, one `tick` at a time.

use crate::{
    apu::{AudioSink, NullAudioSink},
    cpu::Cpu,
    error::Error,
    mmu::Mmu,
    pad::PadKey,
    ppu::{NullPixelSink, PixelSink},
    rom::Cartridge,
};

/// Number of instructions executed per batch before cycles are fanned out
/// to the rest of the system. Small enough that the PPU's 453-tick
/// scanline granularity is never skipped over by a single batch.
pub const BATCH_SIZE: usize = 4;

pub struct GameBoy {
    cpu: Cpu,

    /// Ratio of cycles actually executed vs. requested by the last `tick`
    /// call, kept for host-side diagnostics (pacing drift, stalls, etc).
    tick_ratio: f32,
}

impl GameBoy {
    /// Master clock frequency of the DMG, in Hz.
    pub const CPU_FREQ: u32 = 4_194_304;

    pub fn new(rom_data: &[u8]) -> Result<Self, Error> {
        Self::with_sinks(rom_data, Box::new(NullPixelSink), Box::new(NullAudioSink))
    }

    pub fn with_sinks(
        rom_data: &[u8],
        pixel_sink: Box<dyn PixelSink>,
        audio_sink: Box<dyn AudioSink>,
    ) -> Result<Self, Error> {
        let cartridge = Cartridge::from_data(rom_data)?;
        let mmu = Mmu::with_sinks(cartridge, pixel_sink, audio_sink);
        let mut cpu = Cpu::new(mmu);
        cpu.boot();
        Ok(Self {
            cpu,
            tick_ratio: 1.0,
        })
    }

    /// Runs the machine forward by `dt` seconds of simulated time, applying
    /// `keys` as the current input state. Executes CPU instructions in
    /// small batches, fanning each batch's consumed cycles out to the
    /// Timer, Display and Sound peripherals and applying `keys` to Input
    /// after every batch. Updates the rolling executed/target tick ratio
    /// used for diagnostics.
    pub fn tick(&mut self, dt: f32, keys: [bool; 8]) {
        let target_ticks = (dt * Self::CPU_FREQ as f32) as u32;
        let mut executed: u32 = 0;

        while executed < target_ticks {
            let mut batch_cycles: u16 = 0;
            for _ in 0..BATCH_SIZE {
                batch_cycles += self.cpu.clock() as u16;
            }

            let mmu = self.cpu.mmu();
            mmu.set_keys(keys);
            mmu.clock_timer(batch_cycles);
            mmu.clock_ppu(batch_cycles);
            mmu.clock_apu(batch_cycles);
            mmu.clock_dma();

            executed += batch_cycles as u32;
        }

        self.tick_ratio = if target_ticks == 0 {
            1.0
        } else {
            executed as f32 / target_ticks as f32
        };
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    pub fn key_press(&mut self, key: PadKey) {
        self.cpu.mmu().key_press(key);
    }

    pub fn key_lift(&mut self, key: PadKey) {
        self.cpu.mmu().key_lift(key);
    }

    /// Ratio of cycles executed to cycles targeted by the most recent
    /// `tick` call; 1.0 under normal operation.
    pub fn tick_ratio(&self) -> f32 {
        self.tick_ratio
    }
}

#[cfg(test)]
mod tests {
    use super::GameBoy;
    use crate::pad::PadKey;

    fn blank_rom() -> Vec<u8> {
        vec![0u8; 0x8000]
    }

    #[test]
    fn test_gb_boots_at_reset_vector() {
        let gb = GameBoy::new(&blank_rom()).unwrap();
        assert_eq!(gb.cpu().pc(), 0x0100);
    }

    #[test]
    fn test_gb_tick_advances_pc_and_reports_full_ratio() {
        let mut gb = GameBoy::new(&blank_rom()).unwrap();
        let start = gb.cpu().pc();
        gb.tick(1.0 / 1000.0, [false; 8]);
        assert_ne!(gb.cpu().pc(), start);
        assert!((gb.tick_ratio() - 1.0).abs() < 0.05);
    }

    #[test]
    fn test_gb_tick_raises_one_vblank_over_a_full_frame() {
        let mut gb = GameBoy::new(&blank_rom()).unwrap();
        // one full frame's worth of ticks at the real clock rate
        let dt = (154u32 * 453) as f32 / GameBoy::CPU_FREQ as f32;
        gb.tick(dt, [false; 8]);
        assert_eq!(gb.cpu_mut().mmu().pic().int_flag() & 0x01, 0x01);
    }

    #[test]
    fn test_gb_key_press_raises_pad_interrupt() {
        let mut gb = GameBoy::new(&blank_rom()).unwrap();
        gb.cpu_mut().mmu().write(crate::consts::JOYP_ADDR, 0xdf);
        gb.key_press(PadKey::A);
        assert_eq!(gb.cpu_mut().mmu().pic().int_flag() & 0x10, 0x10);
    }
}
