// Domain layer: records flowing through the conversion and the ports the core talks to.

pub mod model;
pub mod ports;
