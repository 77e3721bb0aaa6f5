// Playground library - the session/diagnostics pipeline behind the code playground

pub mod app;
pub mod config;
pub mod config_io;
pub mod lint_diagnostics;
pub mod model;
pub mod primitives;
pub mod services;
