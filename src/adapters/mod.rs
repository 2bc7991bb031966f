pub mod cache;
pub mod payment;
pub mod rest;
