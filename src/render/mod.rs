pub(crate) mod blur;
pub(crate) mod frame;
pub(crate) mod overlay;
pub(crate) mod painter;
