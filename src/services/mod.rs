pub mod playlist;
pub mod throttle;
