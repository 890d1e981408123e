pub mod args;
pub mod driver;
pub mod fingerprint;
