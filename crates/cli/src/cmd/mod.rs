mod info;
mod run;
mod size;
mod version;

pub use info::cmd_info;
pub use run::cmd_run;
pub use size::cmd_size;
pub use version::cmd_version;
