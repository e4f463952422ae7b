#![allow(dead_code)]

pub mod builders;
pub mod fixtures;
pub mod test_app;
