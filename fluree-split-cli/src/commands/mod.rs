pub mod config_cmd;
pub mod plan;
pub mod prefixes;
pub mod read;
pub mod run;
