//! Common things for Bomboni library.

pub mod date_time;
