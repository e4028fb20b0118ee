//! External command invocation.
//!
//! Every engine call runs as an independent child process; per-process
//! session context (the `GISRC` environment variable, see
//! [`crate::session`]) is what keeps concurrent jobs from cross-talking.
//! There is deliberately no timeout: a job runs to completion or to
//! external-command failure, with no cancellation point.

use std::process::Output;

use tokio::process::Command;

use grassd_core::error::GrassError;

/// Render a command line for logs and error messages.
pub fn render(cmd: &Command) -> String {
    let std_cmd = cmd.as_std();
    let mut rendered = std_cmd.get_program().to_string_lossy().into_owned();
    for arg in std_cmd.get_args() {
        rendered.push(' ');
        rendered.push_str(&arg.to_string_lossy());
    }
    rendered
}

/// Run `cmd` to completion and return its captured output.
///
/// A non-zero exit becomes [`GrassError::EngineInvocation`] carrying the
/// rendered command line and the captured stderr text. Spawn failures
/// surface as [`GrassError::Io`].
pub async fn run_checked(cmd: &mut Command) -> Result<Output, GrassError> {
    let rendered = render(cmd);
    tracing::debug!(command = %rendered, "Running engine command");

    let output = cmd.output().await?;

    if !output.status.success() {
        return Err(GrassError::EngineInvocation {
            command: rendered,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    Ok(output)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
