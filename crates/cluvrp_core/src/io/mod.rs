pub mod clusters;
pub mod discover;
pub mod instance;
pub mod options;
pub mod tour;
