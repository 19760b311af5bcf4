pub mod init;
pub mod root;
pub mod slots;
pub mod tables;
