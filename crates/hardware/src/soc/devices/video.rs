//! Framebuffer video output and the video mode catalog.
//!
//! The framebuffer scans a region of SDRAM through a dedicated crossbar read
//! port and drives the board's VGA/HDMI pads. The timing of the selected mode is
//! not programmed at run time; it is handed to firmware as `litevideo_*`
//! constants.

use serde::Serialize;

use crate::soc::interconnect::{Port, PortMode, PortRequest};
use crate::soc::pads::PadGroup;

/// Pad group the video PHY drives.
pub const PADS: &str = "vga_out";

/// Timing of one video mode. Horizontal fields are in pixels, vertical in lines.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct VideoTiming {
    /// Pixel clock in Hz.
    pub pix_clk: f64,
    /// Visible pixels per line.
    pub h_active: u32,
    /// Blanking pixels per line.
    pub h_blanking: u32,
    /// Horizontal sync width.
    pub h_sync: u32,
    /// Horizontal front porch.
    pub h_front_porch: u32,
    /// Visible lines per frame.
    pub v_active: u32,
    /// Blanking lines per frame.
    pub v_blanking: u32,
    /// Vertical sync width.
    pub v_sync: u32,
    /// Vertical front porch.
    pub v_front_porch: u32,
}

impl VideoTiming {
    /// Looks a mode up by its exact catalog name.
    pub fn lookup(name: &str) -> Option<&'static Self> {
        VIDEO_TIMINGS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, timing)| timing)
    }

    /// Pixels per line including blanking.
    pub const fn h_total(&self) -> u32 {
        self.h_active + self.h_blanking
    }

    /// Lines per frame including blanking.
    pub const fn v_total(&self) -> u32 {
        self.v_active + self.v_blanking
    }
}

/// Supported video modes.
pub const VIDEO_TIMINGS: &[(&str, VideoTiming)] = &[
    (
        "1920x1080_60Hz",
        VideoTiming {
            pix_clk: 148.5e6,
            h_active: 1920,
            h_blanking: 280,
            h_sync: 44,
            h_front_porch: 148,
            v_active: 1080,
            v_blanking: 45,
            v_sync: 5,
            v_front_porch: 36,
        },
    ),
    (
        "1280x720_60Hz",
        VideoTiming {
            pix_clk: 74.25e6,
            h_active: 1280,
            h_blanking: 370,
            h_sync: 40,
            h_front_porch: 220,
            v_active: 720,
            v_blanking: 30,
            v_sync: 5,
            v_front_porch: 20,
        },
    ),
    (
        "640x480_75Hz",
        VideoTiming {
            pix_clk: 31.5e6,
            h_active: 640,
            h_blanking: 200,
            h_sync: 64,
            h_front_porch: 16,
            v_active: 480,
            v_blanking: 20,
            v_sync: 3,
            v_front_porch: 1,
        },
    ),
];

/// Crossbar port the framebuffer reads pixels through.
pub fn dram_port_request() -> PortRequest {
    PortRequest {
        mode: PortMode::Read,
        data_width: 32,
        clock_domain: "pix".to_string(),
        reverse: true,
    }
}

/// Framebuffer video output.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VideoOut {
    /// FPGA part; selects the PHY clocking primitives.
    pub device: String,
    /// Video output pads.
    pub pads: PadGroup,
    /// SDRAM read port.
    pub dram_port: Port,
    /// Catalog name of the mode.
    pub mode: String,
    /// Mode timing.
    pub timing: VideoTiming,
}
