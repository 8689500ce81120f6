//! Fabric-internal blocks: XADC and ICAP.
//!
//! Both are hard primitives inside the FPGA and need no pads, only a CSR bank.

use serde::Serialize;

/// 7-series XADC: die temperature and supply voltages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Xadc;

/// ICAP controller that triggers a reload of the bitstream from flash.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct IcapBitstream;
