pub mod cluster;
pub mod views;
