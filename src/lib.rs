pub mod backend;
pub mod cli;
pub mod config;
pub mod controller;
pub mod draft;
pub mod gate;
pub mod intake;
pub mod model;
pub mod render;
pub mod samples;
pub mod shell;
pub mod util;
pub mod workflow;
