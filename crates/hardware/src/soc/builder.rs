//! Composition session and peripheral attachment.
//!
//! This module is the composition root. It performs:
//! 1. **Seeding:** Derives the CSR, interrupt and memory-map tables from the base
//!    platform plus the Linux layer's reservations.
//! 2. **Emulator RAM:** Claims the machine-mode emulator RAM region and puts it on the bus.
//! 3. **Attachment:** One `add_*`/`configure_*` call per peripheral. Each checks its
//!    claims against the allocator, requests its pads, commits the claims, and only
//!    then wires itself into the bus or the SDRAM crossbar and records itself. A
//!    claim that cannot be granted fails before any pad is taken.
//! 4. **Hand-off:** Produces the [`PlatformDescription`] consumed by code generation.
//!
//! Attachments run in whatever order the orchestrator calls them. The one ordering
//! constraint, `configure_boot` after `add_spi_flash`, is the caller's to honour.

use std::fmt;

use crate::common::{CompositionError, DottedQuad, PhysAddr, Result};
use crate::config::{Config, SocConfig};
use crate::soc::allocator::{ClaimSet, Grant, ResourceAllocator};
use crate::soc::base::{BasePlatform, CSR, EMULATOR_RAM, SPIFLASH};
use crate::soc::constants::{self, ConstantTable, FLASH_BOOT_ADDRESS};
use crate::soc::description::PlatformDescription;
use crate::soc::devices::gpio::Channel;
use crate::soc::devices::{
    GpioOut, I2cMaster, IcapBitstream, Peripheral, RgbLed, SpiFlash, SpiMaster, VideoOut,
    VideoTiming, Xadc, flash, video,
};
use crate::soc::interconnect::{Bus, Crossbar};
use crate::soc::namespace::NamespaceTable;
use crate::soc::pads::{self, PadGroup, StaticPadProvider};
use crate::soc::regions::{MemoryRegion, RegionKind, RegionTable};
use crate::soc::registry::{PeripheralKind, PeripheralRecord, PeripheralRegistry};
use crate::soc::traits::PadProvider;

/// Where a session is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Tables seeded, nothing attached yet.
    Seeded,
    /// At least one attachment has completed.
    Extended,
}

/// One platform composition.
///
/// Owns the allocator (and through it every namespace table), the peripheral
/// registry, the bus, the SDRAM crossbar and the pad provider. A session is
/// driven by a single orchestrator; it is not meant to be shared.
///
/// # Examples
///
/// ```
/// use linsoc_core::config::Config;
/// use linsoc_core::soc::Session;
///
/// let mut session = Session::from_config(&Config::default()).unwrap();
/// assert_eq!(session.regions().len(), 1);
///
/// let grant = session.configure_ethernet("192.168.1.50", "192.168.1.100").unwrap();
/// assert_eq!(grant.constants.len(), 8);
/// assert_eq!(session.constants().len(), 8);
///
/// // No flash attached: boot finalization has nothing to emit.
/// assert_eq!(session.configure_boot().unwrap(), None);
/// ```
pub struct Session {
    soc: SocConfig,
    base: BasePlatform,
    allocator: ResourceAllocator,
    registry: PeripheralRegistry,
    bus: Bus,
    sdram: Option<Crossbar>,
    pads: Box<dyn PadProvider>,
    state: SessionState,
}

impl Session {
    /// Starts a session on top of `base`.
    ///
    /// # Arguments
    ///
    /// * `base` - Base platform reservations and capabilities.
    /// * `soc` - Linux layer parameters.
    /// * `pads` - Provider of the board's pads.
    ///
    /// # Errors
    ///
    /// * [`CompositionError::Collision`] if the base platform and the layer
    ///   reservations disagree.
    /// * [`CompositionError::MalformedInput`] if the CSR window does not fit the bus.
    /// * An error from claiming the emulator RAM region, e.g.
    ///   [`CompositionError::Overlap`] with the CSR window.
    pub fn begin(base: BasePlatform, soc: SocConfig, pads: Box<dyn PadProvider>) -> Result<Self> {
        let seed = base.seed()?;
        let csr_window = lookup_base(&seed.memory, CSR)?;
        let mut allocator =
            ResourceAllocator::new(seed.csr, seed.interrupts, seed.memory, soc.csr_slots)?
                .with_csr_window(csr_window, soc.csr_page_size)?;

        let ram_base = lookup_base(allocator.memory(), EMULATOR_RAM)?;
        let ram = MemoryRegion::new(EMULATOR_RAM, ram_base, soc.emulator_ram_size, RegionKind::Cached);
        let _grant = allocator.commit(ClaimSet::new().region(ram))?;

        let mut bus = Bus::new();
        bus.add_slave(EMULATOR_RAM, ram_base, soc.emulator_ram_size);

        let sdram = base.sdram.map(|s| Crossbar::new(s.data_width));

        tracing::info!(
            cpu = %soc.cpu_type,
            variant = %soc.cpu_variant,
            device = %base.device,
            csr = allocator.csr().len(),
            interrupts = allocator.interrupts().len(),
            memory = allocator.memory().len(),
            "session seeded"
        );

        Ok(Self {
            soc,
            base,
            allocator,
            registry: PeripheralRegistry::new(),
            bus,
            sdram,
            pads,
            state: SessionState::Seeded,
        })
    }

    /// Starts a session from a board description, with its pads served by a
    /// [`StaticPadProvider`].
    ///
    /// # Errors
    ///
    /// Same as [`Session::begin`], plus collisions inside the base maps and
    /// [`CompositionError::MalformedInput`] for a pad declared twice.
    pub fn from_config(config: &Config) -> Result<Self> {
        let base = BasePlatform::from_config(&config.base)?;
        let pads = StaticPadProvider::new(config.pads.clone())?;
        Self::begin(base, config.soc.clone(), Box::new(pads))
    }

    /// Attaches the memory-mapped SPI flash.
    ///
    /// # Errors
    ///
    /// * [`CompositionError::ResourceUnavailable`] without `spiflash4x` pads.
    /// * [`CompositionError::Collision`] / [`CompositionError::Overlap`] if the
    ///   CSR bank or the flash window is taken.
    pub fn add_spi_flash(&mut self) -> Result<&PeripheralRecord> {
        let base = lookup_base(self.allocator.memory(), SPIFLASH)?;
        let size = self.soc.spiflash_size;
        let claims = ClaimSet::new()
            .csr(SPIFLASH)
            .region(MemoryRegion::new(SPIFLASH, base, size, RegionKind::Cached));
        self.allocator.check(&claims)?;

        let pads = self.pads.request(flash::PADS, None)?;
        let spiflash = SpiFlash::new(pads, self.base.endianness, &self.base.device);
        let grant = self.allocator.commit(claims)?;
        self.bus.add_slave(SPIFLASH, base, size);

        Ok(self.record(Peripheral::SpiFlash(spiflash), grant))
    }

    /// Attaches a GPIO bank over every `user_led` pad.
    ///
    /// # Errors
    ///
    /// * [`CompositionError::ResourceUnavailable`] if the board has no `user_led` pads.
    /// * [`CompositionError::Collision`] if LEDs are already attached.
    pub fn add_leds(&mut self) -> Result<&PeripheralRecord> {
        let claims = ClaimSet::new().csr("leds");
        self.allocator.check(&claims)?;
        let pads = self.request_every("user_led")?;
        let grant = self.allocator.commit(claims)?;
        Ok(self.record(Peripheral::Leds(GpioOut::new(pads)), grant))
    }

    /// Attaches three PWM channels driving RGB LED #0.
    ///
    /// # Errors
    ///
    /// * [`CompositionError::ResourceUnavailable`] without an `rgb_led` #0 pad group.
    /// * [`CompositionError::Collision`] if a channel's CSR bank is taken.
    pub fn add_rgb_led(&mut self) -> Result<&PeripheralRecord> {
        let claims = Channel::ALL
            .into_iter()
            .fold(ClaimSet::new(), |claims, channel| claims.csr(channel.csr_name(0)));
        self.allocator.check(&claims)?;
        let pads = self.pads.request("rgb_led", Some(0))?;
        let grant = self.allocator.commit(claims)?;
        Ok(self.record(Peripheral::RgbLed(RgbLed::new(pads)), grant))
    }

    /// Attaches a GPIO bank over every `user_sw` pad.
    ///
    /// # Errors
    ///
    /// * [`CompositionError::ResourceUnavailable`] if the board has no `user_sw` pads.
    /// * [`CompositionError::Collision`] if switches are already attached.
    pub fn add_switches(&mut self) -> Result<&PeripheralRecord> {
        let claims = ClaimSet::new().csr("switches");
        self.allocator.check(&claims)?;
        let pads = self.request_every("user_sw")?;
        let grant = self.allocator.commit(claims)?;
        Ok(self.record(Peripheral::Switches(GpioOut::new(pads)), grant))
    }

    /// Attaches an SPI master.
    ///
    /// # Arguments
    ///
    /// * `data_width` - Word width in bits.
    /// * `spi_clk_freq` - SPI clock frequency in Hz.
    ///
    /// # Errors
    ///
    /// * [`CompositionError::ResourceUnavailable`] without `spi` pads.
    /// * [`CompositionError::Collision`] if `spi` is already attached.
    pub fn add_spi(&mut self, data_width: u32, spi_clk_freq: f64) -> Result<&PeripheralRecord> {
        let claims = ClaimSet::new().csr("spi");
        self.allocator.check(&claims)?;
        let pads = self.pads.request("spi", None)?;
        let grant = self.allocator.commit(claims)?;
        let spi = SpiMaster {
            pads,
            data_width,
            sys_clk_freq: self.base.sys_clk_freq,
            spi_clk_freq,
        };
        Ok(self.record(Peripheral::Spi(spi), grant))
    }

    /// Attaches I2C master `index` on `i2c` pad group `index`.
    ///
    /// Several instances may be attached, one per pad group.
    ///
    /// # Errors
    ///
    /// * [`CompositionError::ResourceUnavailable`] without that pad group.
    /// * [`CompositionError::Collision`] if the instance is already attached.
    pub fn add_i2c(&mut self, index: u32) -> Result<&PeripheralRecord> {
        let claims = ClaimSet::new().csr(I2cMaster::csr_name(index));
        self.allocator.check(&claims)?;
        let pads = self.pads.request("i2c", Some(index))?;
        let grant = self.allocator.commit(claims)?;
        Ok(self.record(Peripheral::I2c(I2cMaster { pads, index }), grant))
    }

    /// Attaches the XADC.
    ///
    /// # Errors
    ///
    /// Returns [`CompositionError::Collision`] if it is already attached.
    pub fn add_xadc(&mut self) -> Result<&PeripheralRecord> {
        let grant = self.allocator.commit(ClaimSet::new().csr("xadc"))?;
        Ok(self.record(Peripheral::Xadc(Xadc), grant))
    }

    /// Attaches the framebuffer in video mode `mode` and emits its timing constants.
    ///
    /// # Errors
    ///
    /// * [`CompositionError::MalformedInput`] if `mode` is not in the catalog.
    /// * [`CompositionError::MissingCollaborator`] if the base platform has no SDRAM.
    /// * [`CompositionError::Collision`] if the CSR bank or a constant is taken.
    /// * [`CompositionError::ResourceUnavailable`] without `vga_out` pads.
    pub fn add_framebuffer(&mut self, mode: &str) -> Result<&PeripheralRecord> {
        let timing = *VideoTiming::lookup(mode)
            .ok_or_else(|| CompositionError::malformed("video mode", mode))?;
        let crossbar = self
            .sdram
            .as_mut()
            .ok_or(CompositionError::MissingCollaborator {
                peripheral: PeripheralKind::Framebuffer,
                collaborator: "an SDRAM crossbar",
            })?;
        let claims = ClaimSet::new()
            .csr("framebuffer")
            .constants(constants::video_timing_records(&timing));
        self.allocator.check(&claims)?;

        let pads = self.pads.request(video::PADS, None)?;
        let grant = self.allocator.commit(claims)?;
        let dram_port = crossbar.get_port(video::dram_port_request());

        let framebuffer = VideoOut {
            device: self.base.device.clone(),
            pads,
            dram_port,
            mode: mode.to_string(),
            timing,
        };
        Ok(self.record(Peripheral::Framebuffer(framebuffer), grant))
    }

    /// Attaches the ICAP bitstream reload controller.
    ///
    /// # Errors
    ///
    /// Returns [`CompositionError::Collision`] if it is already attached.
    pub fn add_icap_bitstream(&mut self) -> Result<&PeripheralRecord> {
        let grant = self.allocator.commit(ClaimSet::new().csr("icap_bit"))?;
        Ok(self.record(Peripheral::IcapBitstream(IcapBitstream), grant))
    }

    /// Emits the network stack's local and remote address octets.
    ///
    /// Both addresses are parsed before anything is emitted.
    ///
    /// # Errors
    ///
    /// * [`CompositionError::MalformedInput`] if either address is not a dotted quad.
    /// * [`CompositionError::Collision`] if the constants were already emitted.
    pub fn configure_ethernet(&mut self, local_ip: &str, remote_ip: &str) -> Result<Grant> {
        let local: DottedQuad = local_ip.parse()?;
        let remote: DottedQuad = remote_ip.parse()?;
        let claims = ClaimSet::new().constants(constants::network_records(local, remote));
        let grant = self.allocator.commit(claims)?;
        tracing::info!(%local, %remote, "network addresses configured");
        self.state = SessionState::Extended;
        Ok(grant)
    }

    /// Emits the flash boot address if a SPI flash is attached.
    ///
    /// Must run after [`Session::add_spi_flash`] to see it; called earlier it
    /// emits nothing.
    ///
    /// # Returns
    ///
    /// The emitted boot address, or `None` when there is no flash.
    ///
    /// # Errors
    ///
    /// * [`CompositionError::Collision`] if the boot address was already emitted.
    /// * [`CompositionError::MalformedInput`] if the configured address does not
    ///   fit a constant.
    pub fn configure_boot(&mut self) -> Result<Option<u64>> {
        if !self.registry.contains(PeripheralKind::SpiFlash) {
            tracing::warn!("no SPI flash attached, boot address not emitted");
            return Ok(None);
        }
        let addr = self.soc.flash_boot_address;
        let value = i64::try_from(addr)
            .map_err(|_| CompositionError::malformed("flash boot address", addr.to_string()))?;
        let _grant = self
            .allocator
            .commit(ClaimSet::new().constant(FLASH_BOOT_ADDRESS, value))?;
        tracing::info!(addr = %PhysAddr::new(addr), "flash boot address configured");
        self.state = SessionState::Extended;
        Ok(Some(addr))
    }

    fn request_every(&mut self, name: &str) -> Result<Vec<PadGroup>> {
        let found = pads::request_all(self.pads.as_mut(), name);
        if found.is_empty() {
            return Err(CompositionError::ResourceUnavailable {
                name: name.to_string(),
                index: Some(0),
            });
        }
        Ok(found)
    }

    fn record(&mut self, peripheral: Peripheral, claims: Grant) -> &PeripheralRecord {
        tracing::info!(kind = %peripheral.kind(), csr = ?claims.csr, "peripheral attached");
        self.state = SessionState::Extended;
        self.registry.insert(PeripheralRecord { peripheral, claims })
    }

    /// Current lifecycle state.
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Linux layer parameters.
    pub const fn soc(&self) -> &SocConfig {
        &self.soc
    }

    /// Base platform.
    pub const fn base(&self) -> &BasePlatform {
        &self.base
    }

    /// The allocator, read-only.
    pub const fn allocator(&self) -> &ResourceAllocator {
        &self.allocator
    }

    /// CSR bank indices.
    pub const fn csr(&self) -> &NamespaceTable<u32> {
        self.allocator.csr()
    }

    /// Interrupt lines.
    pub const fn interrupts(&self) -> &NamespaceTable<u32> {
        self.allocator.interrupts()
    }

    /// Memory-map bases.
    pub const fn memory(&self) -> &NamespaceTable<PhysAddr> {
        self.allocator.memory()
    }

    /// Memory regions.
    pub const fn regions(&self) -> &RegionTable {
        self.allocator.regions()
    }

    /// Emitted constants.
    pub const fn constants(&self) -> &ConstantTable {
        self.allocator.constants()
    }

    /// Attached peripherals.
    pub const fn peripherals(&self) -> &PeripheralRegistry {
        &self.registry
    }

    /// System bus.
    pub const fn bus(&self) -> &Bus {
        &self.bus
    }

    /// SDRAM crossbar, if the base platform has one.
    pub const fn crossbar(&self) -> Option<&Crossbar> {
        self.sdram.as_ref()
    }

    /// Bus address of CSR bank `name`: the CSR window base plus one page per index.
    pub fn csr_base(&self, name: &str) -> Option<PhysAddr> {
        let index = self.csr().get(name)?;
        self.allocator.csr_bank_base(index)
    }

    /// Snapshot of the composition for code generation.
    pub fn describe(&self) -> PlatformDescription {
        PlatformDescription::from_session(self)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("soc", &self.soc)
            .field("base", &self.base)
            .field("allocator", &self.allocator)
            .field("registry", &self.registry)
            .field("bus", &self.bus)
            .field("sdram", &self.sdram)
            .finish_non_exhaustive()
    }
}

fn lookup_base(memory: &NamespaceTable<PhysAddr>, name: &str) -> Result<PhysAddr> {
    memory
        .get(name)
        .ok_or_else(|| CompositionError::malformed("memory map entry", name))
}
