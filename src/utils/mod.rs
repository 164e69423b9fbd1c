pub mod logging;
pub mod time;

#[cfg(test)]
pub(crate) mod log_capture;
