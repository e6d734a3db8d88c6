pub mod convert;
pub mod init;
pub mod run;
pub mod search;
