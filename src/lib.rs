// Platter: turns food mentions from restaurant reviews into a rated menu.
//
// This is the library root. Each module corresponds to a stage or
// collaborator of the menu pipeline.

pub mod clustering;
pub mod config;
pub mod embedding;
pub mod error;
pub mod extraction;
pub mod menu;
pub mod normalize;
pub mod openai;
pub mod output;
pub mod storage;

pub use error::{PlatterError, Result};
