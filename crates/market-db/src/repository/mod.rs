//! Repository implementations, one per collection.

pub mod cart;
pub mod media;
pub mod order;
pub mod otp;
pub mod payment;
pub mod product;
pub mod user;
