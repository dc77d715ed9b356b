#![allow(clippy::module_name_repetitions)]
//! Docker image helpers.

use std::path::Path;

use tracing::debug;

use crate::util::exec::{ExecRequest, ExecService};

/// Return true if a docker image exists locally (without pulling). Any failure to ask
/// docker counts as "missing", which only means we build.
pub fn image_exists(runtime: &Path, image: &str) -> bool {
    let exists = ExecService::default()
        .run(
            ExecRequest::new(runtime)
                .args(["image", "inspect", image])
                .capture_output(true),
        )
        .map(|out| out.status.success())
        .unwrap_or(false);
    debug!(image = %image, exists, "docker image inspect");
    exists
}
