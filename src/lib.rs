//! Reverse-markup pricing for Brazilian marketplace sellers.
//!
//! Given a unit cost and a target margin, [`domain`] finds the selling price
//! that leaves that margin after Shopee, Mercado Livre or Amazon fees.

pub mod app;
pub mod cli;
pub mod domain;
pub mod infra;
pub mod ui;
pub mod util;
