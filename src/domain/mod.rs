// Domain layer: records, typed statuses and ports. No HTTP or storage specifics here.

pub mod model;
pub mod ports;
pub mod pricing;
