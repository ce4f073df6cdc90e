pub mod bootstrap;
pub mod clean;
pub mod info;
