//! MMU (Memory Management Unit) functions and structures: address-space
//! dispatch to the region owning each byte of the 64 KiB bus.

use std::fmt::{self, Display, Formatter};

use crate::{
    apu::Apu,
    consts::{DMA_ADDR, IE_ADDR, IF_ADDR, JOYP_ADDR, KEY1_ADDR, SB_ADDR, SC_ADDR},
    dma::{Dma, OAM_DMA_DEST, OAM_DMA_SIZE},
    pad::{Pad, PadKey},
    pic::{Interrupt, Pic},
    ppu::Ppu,
    rom::Cartridge,
    serial::Serial,
    timer::Timer,
    warnln,
};

pub const RAM_SIZE: usize = 8192;
pub const HRAM_SIZE: usize = 127;

/// A region (or peripheral) addressable through the bus.
pub trait BusComponent {
    fn read(&self, addr: u16) -> u8;
    fn write(&mut self, addr: u16, value: u8);

    fn read_many(&self, addr: u16, count: usize) -> Vec<u8> {
        (0..count).map(|offset| self.read(addr + offset as u16)).collect()
    }

    fn write_many(&mut self, addr: u16, values: &[u8]) {
        for (offset, &value) in values.iter().enumerate() {
            self.write(addr + offset as u16, value);
        }
    }
}

pub struct Mmu {
    rom: Cartridge,
    ram: [u8; RAM_SIZE],
    hram: [u8; HRAM_SIZE],

    ppu: Ppu,
    apu: Apu,
    dma: Dma,
    pad: Pad,
    timer: Timer,
    serial: Serial,
    pic: Pic,
}

impl Mmu {
    pub fn new(rom: Cartridge) -> Self {
        Self {
            rom,
            ram: [0x00; RAM_SIZE],
            hram: [0x00; HRAM_SIZE],
            ppu: Ppu::new(Box::new(crate::ppu::NullPixelSink)),
            apu: Apu::new(Box::new(crate::apu::NullAudioSink)),
            dma: Dma::new(),
            pad: Pad::new(),
            timer: Timer::new(),
            serial: Serial::new(),
            pic: Pic::new(),
        }
    }

    pub fn with_sinks(
        rom: Cartridge,
        pixel_sink: Box<dyn crate::ppu::PixelSink>,
        audio_sink: Box<dyn crate::apu::AudioSink>,
    ) -> Self {
        Self {
            rom,
            ram: [0x00; RAM_SIZE],
            hram: [0x00; HRAM_SIZE],
            ppu: Ppu::new(pixel_sink),
            apu: Apu::new(audio_sink),
            dma: Dma::new(),
            pad: Pad::new(),
            timer: Timer::new(),
            serial: Serial::new(),
            pic: Pic::new(),
        }
    }

    pub fn reset(&mut self) {
        self.ram = [0x00; RAM_SIZE];
        self.hram = [0x00; HRAM_SIZE];
        self.ppu.reset();
        self.apu.reset();
        self.dma.reset();
        self.pad.reset();
        self.timer.reset();
        self.pic.reset();
        self.serial.reset();
    }

    pub fn read(&self, addr: u16) -> u8 {
        match addr {
            // 0x0000-0x7FFF: cartridge ROM (bank 0 fixed, bank N via MBC1)
            0x0000..=0x7fff => self.rom.read(addr),

            // 0x8000-0x9FFF: VRAM
            0x8000..=0x9fff => self.ppu.read(addr),

            // 0xA000-0xBFFF: external (cartridge) RAM
            0xa000..=0xbfff => self.rom.read(addr),

            // 0xC000-0xDFFF: work RAM
            0xc000..=0xdfff => self.ram[(addr - 0xc000) as usize],

            // 0xE000-0xFDFF: echo of 0xC000-0xDDFF
            0xe000..=0xfdff => self.ram[(addr - 0x2000 - 0xc000) as usize],

            // 0xFE00-0xFE9F: OAM
            0xfe00..=0xfe9f => self.ppu.read(addr),

            // 0xFEA0-0xFEFF: unusable, reads as zero
            0xfea0..=0xfeff => 0x00,

            JOYP_ADDR => self.pad.read(addr),
            SB_ADDR | SC_ADDR => self.serial.read(addr),
            0xff04..=0xff07 => self.timer.read(addr),
            IF_ADDR => self.pic.read(addr),
            0xff10..=0xff26 | 0xff30..=0xff3f => self.apu.read(addr),
            0xff40..=0xff45 | 0xff47..=0xff4b => self.ppu.read(addr),
            DMA_ADDR => self.dma.read(addr),

            // double-speed switch: no CGB mode, so always reads back unset
            KEY1_ADDR => 0x7e,

            // 0xFF80-0xFFFE: high RAM
            0xff80..=0xfffe => self.hram[(addr - 0xff80) as usize],

            IE_ADDR => self.pic.read(addr),

            addr => {
                warnln!("Reading from unknown location 0x{:04x}", addr);
                #[allow(unreachable_code)]
                0x00
            }
        }
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x7fff => self.rom.write(addr, value),
            0x8000..=0x9fff => self.ppu.write(addr, value),
            0xa000..=0xbfff => self.rom.write(addr, value),
            0xc000..=0xdfff => self.ram[(addr - 0xc000) as usize] = value,
            0xe000..=0xfdff => self.ram[(addr - 0x2000 - 0xc000) as usize] = value,
            0xfe00..=0xfe9f => self.ppu.write(addr, value),

            // unusable region: writes are no-ops
            0xfea0..=0xfeff => (),

            JOYP_ADDR => self.pad.write(addr, value),
            SB_ADDR | SC_ADDR => self.serial.write(addr, value, &mut self.pic),
            0xff04..=0xff07 => self.timer.write(addr, value),
            IF_ADDR => self.pic.write(addr, value),
            0xff10..=0xff26 | 0xff30..=0xff3f => self.apu.write(addr, value),
            0xff40..=0xff45 | 0xff47..=0xff4b => self.ppu.write(addr, value),
            DMA_ADDR => self.dma.write(addr, value),

            // double-speed switch: no CGB mode to enter, ignored
            KEY1_ADDR => (),

            0xff80..=0xfffe => self.hram[(addr - 0xff80) as usize] = value,
            IE_ADDR => self.pic.write(addr, value),

            addr => warnln!("Writing to unknown location 0x{:04x}", addr),
        }
    }

    /// Services a pending OAM DMA transfer synchronously: a real transfer
    /// takes 160 machine cycles during which the CPU can only access HRAM,
    /// a distinction this core doesn't model (see the DMA invariant notes).
    pub fn clock_dma(&mut self) {
        if !self.dma.active() {
            return;
        }
        let source = self.dma.source();
        let data = self.read_many(source, OAM_DMA_SIZE as usize);
        self.write_many(OAM_DMA_DEST, &data);
        self.dma.ack();
    }

    pub fn pic(&self) -> &Pic {
        &self.pic
    }

    pub fn pic_mut(&mut self) -> &mut Pic {
        &mut self.pic
    }

    /// Advances the display by `cycles` ticks, routing its VBlank and STAT
    /// coincidence interrupts straight into the shared PIC.
    pub fn clock_ppu(&mut self, cycles: u16) {
        self.ppu.clock(cycles, &mut self.pic);
    }

    pub fn clock_apu(&mut self, cycles: u16) {
        self.apu.clock(cycles);
    }

    /// Advances the timer by `cycles` ticks, raising a Timer interrupt on
    /// TIMA overflow.
    pub fn clock_timer(&mut self, cycles: u16) {
        if self.timer.clock(cycles) {
            self.pic.raise(Interrupt::Timer);
        }
    }

    pub fn set_keys(&mut self, keys: [bool; 8]) {
        self.pad.set_keys(keys, &mut self.pic);
    }

    pub fn key_press(&mut self, key: PadKey) {
        self.pad.key_press(key, &mut self.pic);
    }

    pub fn key_lift(&mut self, key: PadKey) {
        self.pad.key_lift(key);
    }

    pub fn ppu(&mut self) -> &mut Ppu {
        &mut self.ppu
    }

    pub fn ppu_i(&self) -> &Ppu {
        &self.ppu
    }

    pub fn apu(&mut self) -> &mut Apu {
        &mut self.apu
    }

    pub fn dma(&mut self) -> &mut Dma {
        &mut self.dma
    }

    pub fn pad(&mut self) -> &mut Pad {
        &mut self.pad
    }

    pub fn timer(&mut self) -> &mut Timer {
        &mut self.timer
    }

    pub fn serial(&mut self) -> &mut Serial {
        &mut self.serial
    }

    pub fn rom(&self) -> &Cartridge {
        &self.rom
    }
}

impl BusComponent for Mmu {
    fn read(&self, addr: u16) -> u8 {
        self.read(addr)
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.write(addr, value);
    }
}

impl Display for Mmu {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rom)
    }
}

#[cfg(test)]
mod tests {
    use super::Mmu;
    use crate::{consts::DMA_ADDR, rom::Cartridge};

    fn make_mmu() -> Mmu {
        let data = vec![0u8; 0x8000];
        let cartridge = Cartridge::from_data(&data).unwrap();
        Mmu::new(cartridge)
    }

    #[test]
    fn test_mmu_echo_ram_mirrors_work_ram() {
        let mut mmu = make_mmu();
        mmu.write(0xc010, 0x42);
        assert_eq!(mmu.read(0xe010), 0x42);
        mmu.write(0xe020, 0x24);
        assert_eq!(mmu.read(0xc020), 0x24);
    }

    #[test]
    fn test_mmu_unusable_region_reads_zero_and_ignores_writes() {
        let mut mmu = make_mmu();
        mmu.write(0xfeb0, 0x99);
        assert_eq!(mmu.read(0xfeb0), 0x00);
    }

    #[test]
    fn test_mmu_hram_round_trip() {
        let mut mmu = make_mmu();
        mmu.write(0xff90, 0x55);
        assert_eq!(mmu.read(0xff90), 0x55);
    }

    #[test]
    fn test_mmu_oam_dma_copies_block() {
        let mut mmu = make_mmu();
        for i in 0..160u16 {
            mmu.write(0xc000 + i, i as u8);
        }
        mmu.write(DMA_ADDR, 0xc0);
        mmu.clock_dma();
        for i in 0..160u16 {
            assert_eq!(mmu.read(0xfe00 + i), i as u8);
        }
    }
}
