// Domain layer: the canonical codeplug model, diagnostics and ports.

pub mod diagnostics;
pub mod model;
pub mod ports;
