pub mod client;
pub mod pacer;
