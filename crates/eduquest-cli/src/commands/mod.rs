pub mod init;
pub mod take;
pub mod teacher;
pub mod validate;
