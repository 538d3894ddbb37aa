pub(crate) mod constants;
pub(crate) mod render;
pub(crate) mod sparkline;
