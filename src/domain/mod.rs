// Domain layer: models and ports. Nothing here touches the runtime or the filesystem.

pub mod model;
pub mod ports;
