//! Internal part of Bomboni library.

mod string;

pub use string::*;
