pub mod chains;
pub mod config;
pub mod key;
pub mod run;
pub mod withdraw;
