pub(crate) mod builder;
pub(crate) mod model;
pub mod presets;
pub(crate) mod steps;
