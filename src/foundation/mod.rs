pub(crate) mod error;
pub(crate) mod level;
