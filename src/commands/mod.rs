pub mod add;
pub mod clone;
pub mod init;
pub mod passthrough;
