pub mod activation;
pub mod bootstrap;
pub mod install;
pub mod profile;
