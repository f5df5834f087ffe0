//! Wire and domain types shared by the order board client and its tooling.

pub mod domain;
pub mod error;
pub mod protocol;
