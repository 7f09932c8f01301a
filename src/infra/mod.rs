//! Collaborators around the pricing core: caching and calculation history.

pub mod cache;
pub mod history;
