// Domain layer: request/response models and ports to the outside world.

pub mod model;
pub mod ports;
