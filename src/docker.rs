#![allow(clippy::module_name_repetitions)]
//! Docker integration: runtime discovery, image inspect/build, build context and the
//! `docker run` command handed back to the user.

pub mod build;
pub mod context;
pub mod images;
pub mod run;
pub mod runtime;

pub use build::{build_image, build_timeout_from_env};
pub use context::{build_docker_context, create_tar_archive, TarEntry};
pub use images::image_exists;
pub use run::{build_docker_run_args, generate_docker_run_command};
pub use runtime::container_runtime_path;
