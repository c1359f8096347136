//! Database entities module

pub mod point_of_sale;
pub mod review;
pub mod user;
