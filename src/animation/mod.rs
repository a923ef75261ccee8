pub(crate) mod ease;
pub(crate) mod pulse;
pub(crate) mod timing;
