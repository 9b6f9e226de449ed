pub mod cmd;
pub mod kctl;
pub mod net;
pub mod pkg;
pub mod wait;
