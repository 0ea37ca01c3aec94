pub mod cli;
pub mod config;
pub mod editor;
pub mod errors;
pub mod export;
pub mod log;
pub mod normalize;
pub mod prompt;
pub mod provider;
pub mod session;
pub mod shell;
pub mod ux;
pub mod wire;
