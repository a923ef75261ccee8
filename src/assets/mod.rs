pub(crate) mod bitmap_font;
pub(crate) mod color;
pub(crate) mod decode;
pub(crate) mod font;
pub(crate) mod sprite;
