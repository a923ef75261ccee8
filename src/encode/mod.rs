pub(crate) mod artifact;
pub(crate) mod quantize;
pub(crate) mod sink;
