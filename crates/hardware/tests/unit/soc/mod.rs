

/// Base platform seeding and the session baseline.
pub mod base;

/// Boot finalization and network constants.
pub mod constants;


/// Bus routing and crossbar ports.
pub mod interconnect;



/// Property tests over random attachment sequences.
pub mod properties;
