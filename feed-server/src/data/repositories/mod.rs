pub(crate) mod local;
#[cfg(test)]
pub(crate) mod memory;
pub(crate) mod postgres;
