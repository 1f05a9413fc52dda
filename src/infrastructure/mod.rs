//! Infrastructure layer for filesystem and environment interactions.
//!
//! Resolves where config, session and trace files live on the host.

pub mod paths;

pub use paths::{
    default_config_file, default_session_file, expand_tilde, get_config_dir, get_data_dir,
};
