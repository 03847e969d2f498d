//! Target discovery -- locating the server binary and its files.

pub mod binary;

pub use binary::{
    default_binary_path, locate_binary, DEFAULT_CONFIG_PATH, SSHD_BINARY_KEY,
};
