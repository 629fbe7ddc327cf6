// Domain layer: frame / settings models and ports (interfaces). Only std, serde and chrono.

pub mod model;
pub mod ports;
