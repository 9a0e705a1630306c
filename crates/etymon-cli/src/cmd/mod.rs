pub mod completions;
pub mod init;
pub mod origin;
pub mod relate;
pub mod show;
pub mod word;
