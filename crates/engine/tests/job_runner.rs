//! End-to-end job runner tests against fake GRASS executables.
//!
//! The launcher, the import/export helpers, and the processing modules are
//! small shell scripts: the launcher creates the location directory, the
//! export helper touches its `output=` file, and every module answers
//! `--interface-description` with canned XML. This exercises the whole
//! workflow without a GRASS installation.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use grassd_core::config::GrassConfig;
use grassd_core::error::GrassError;
use grassd_engine::registry::ModuleRegistry;
use grassd_engine::runner::JobRunner;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

const LAUNCHER: &str = r#"#!/bin/sh
# mimic `grass70 -c <raster> -e <location>`: create the location directory
while [ "$#" -gt 0 ]; do
  if [ "$1" = "-e" ]; then
    shift
    mkdir -p "$1"
  fi
  shift
done
exit 0
"#;

const SLOPE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<task name="r.slope">
  <description>Generates a slope raster.</description>
  <parameter name="input" type="string" required="yes">
    <description>Input raster</description>
    <gisprompt age="old" element="cell" prompt="raster"/>
  </parameter>
  <parameter name="output" type="string" required="yes">
    <description>Output raster</description>
    <gisprompt age="new" element="cell" prompt="raster"/>
  </parameter>
  <parameter name="format" type="string" required="no">
    <description>Reporting format</description>
    <default>degrees</default>
  </parameter>
</task>
"#;

const BUFFER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<task name="v.buffer">
  <description>Buffers vector features.</description>
  <parameter name="input" type="string" required="yes">
    <description>Input vector</description>
    <gisprompt age="old" element="vector" prompt="vector"/>
  </parameter>
</task>
"#;

struct TestEngine {
    dbase: TempDir,
    modules: TempDir,
    _bin: TempDir,
    log: PathBuf,
    runner: JobRunner,
}

impl TestEngine {
    fn new() -> Self {
        let dbase = tempfile::tempdir().expect("dbase");
        let modules = tempfile::tempdir().expect("modules");
        let bin = tempfile::tempdir().expect("bin");
        let log = dbase.path().join("invocations.log");

        install_script(bin.path(), "grass70", LAUNCHER);
        install_script(
            modules.path(),
            "r.external",
            &format!("#!/bin/sh\necho \"r.external $@\" >> \"{}\"\nexit 0\n", log.display()),
        );
        install_script(
            modules.path(),
            "r.out.gdal",
            &format!(
                concat!(
                    "#!/bin/sh\n",
                    "echo \"r.out.gdal $@\" >> \"{}\"\n",
                    "for arg in \"$@\"; do\n",
                    "  case \"$arg\" in\n",
                    "    output=*) : > \"${{arg#output=}}\" ;;\n",
                    "  esac\n",
                    "done\n",
                    "exit 0\n",
                ),
                log.display()
            ),
        );
        install_module(modules.path(), "r.slope", SLOPE_XML, &log, 0, "");
        install_module(modules.path(), "v.buffer", BUFFER_XML, &log, 0, "");
        install_module(modules.path(), "r.broken", SLOPE_XML, &log, 1, "ERROR: boom");

        let config = GrassConfig::new(
            Some(bin.path().join("grass70")),
            Some(dbase.path().to_path_buf()),
            modules.path().to_path_buf(),
            None,
        )
        .expect("config");
        let config = Arc::new(config);
        let registry = ModuleRegistry::new(Arc::clone(&config));
        let runner = JobRunner::new(config, registry);

        Self {
            dbase,
            modules,
            _bin: bin,
            log,
            runner,
        }
    }

    /// Workspace directories currently present under the data-store root.
    fn workspaces(&self) -> Vec<PathBuf> {
        fs::read_dir(self.dbase.path())
            .expect("read dbase")
            .map(|e| e.expect("entry").path())
            .filter(|p| p.is_dir())
            .collect()
    }

    fn invocation_log(&self) -> String {
        fs::read_to_string(&self.log).unwrap_or_default()
    }

    fn sample_raster(&self) -> PathBuf {
        let path = self.modules.path().join("dem.tif");
        fs::write(&path, b"not a real raster").expect("raster");
        path
    }
}

/// Write an executable script into `dir`.
fn install_script(dir: &Path, name: &str, body: &str) {
    let path = dir.join(name);
    fs::write(&path, body).expect("write script");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod");
}

/// Install a fake module: answers `--interface-description` with `xml`,
/// logs any other invocation, and exits with `exit_code`.
fn install_module(dir: &Path, name: &str, xml: &str, log: &Path, exit_code: i32, stderr: &str) {
    let mut body = format!(
        "#!/bin/sh\nif [ \"$1\" = \"--interface-description\" ]; then\ncat <<'EOF'\n{xml}EOF\nexit 0\nfi\necho \"{name} $@\" >> \"{}\"\n",
        log.display()
    );
    if !stderr.is_empty() {
        body.push_str(&format!("echo \"{stderr}\" >&2\n"));
    }
    body.push_str(&format!("exit {exit_code}\n"));
    install_script(dir, name, &body);
}

fn params(pairs: &[(&str, serde_json::Value)]) -> serde_json::Map<String, serde_json::Value> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_input_fails_before_any_state_is_created() {
    let engine = TestEngine::new();

    let err = engine
        .runner
        .run(
            "r.slope",
            params(&[("input", serde_json::json!("/missing.tif"))]),
        )
        .await
        .expect_err("run should fail");

    match err {
        GrassError::InputNotFound { path } => assert_eq!(path, "/missing.tif"),
        other => panic!("expected InputNotFound, got {other:?}"),
    }
    assert!(engine.workspaces().is_empty(), "no workspace may be created");
    assert!(engine.invocation_log().is_empty(), "no job command may run");
}

#[tokio::test]
async fn absent_input_key_is_a_client_error() {
    let engine = TestEngine::new();

    let err = engine
        .runner
        .run("r.slope", params(&[]))
        .await
        .expect_err("run should fail");

    match err {
        GrassError::MissingParameter { name } => assert_eq!(name, "input"),
        other => panic!("expected MissingParameter, got {other:?}"),
    }
    assert!(engine.workspaces().is_empty());
}

#[tokio::test]
async fn vector_modules_are_rejected_before_the_workflow() {
    let engine = TestEngine::new();
    let raster = engine.sample_raster();

    let err = engine
        .runner
        .run(
            "v.buffer",
            params(&[("input", serde_json::json!(raster.to_string_lossy()))]),
        )
        .await
        .expect_err("run should fail");

    match err {
        GrassError::UnsupportedCategory { name, category } => {
            assert_eq!(name, "v.buffer");
            assert_eq!(category.as_str(), "vector");
        }
        other => panic!("expected UnsupportedCategory, got {other:?}"),
    }
    assert!(engine.workspaces().is_empty(), "no workspace may be created");
    assert!(
        engine.invocation_log().is_empty(),
        "no workflow command may run"
    );
}

#[tokio::test]
async fn unknown_module_fails_with_module_not_found() {
    let engine = TestEngine::new();

    let err = engine
        .runner
        .run("r.nosuch", params(&[]))
        .await
        .expect_err("run should fail");

    assert!(matches!(err, GrassError::ModuleNotFound { .. }));
}

#[tokio::test]
async fn raster_job_produces_an_exported_artifact() {
    let engine = TestEngine::new();
    let raster = engine.sample_raster();

    let output = engine
        .runner
        .run(
            "r.slope",
            params(&[
                ("input", serde_json::json!(raster.to_string_lossy())),
                ("format", serde_json::json!("degrees")),
            ]),
        )
        .await
        .expect("job should succeed");

    assert!(output.output.exists(), "exported artifact must exist");
    assert!(output.output.ends_with("result.tif"));

    // Exactly one workspace, with a bound session inside it.
    let workspaces = engine.workspaces();
    assert_eq!(workspaces.len(), 1);
    assert!(workspaces[0].join(".grassrc").exists());

    // The module saw the conventional layers and the pass-through parameter.
    let log = engine.invocation_log();
    assert!(log.contains("r.external input="));
    assert!(log.contains("r.slope input=in_raster output=out_raster format=degrees"));
    assert!(log.contains("r.out.gdal input=out_raster"));
    assert!(log.contains("format=GTiff"));
}

#[tokio::test]
async fn sequential_jobs_get_distinct_workspaces_and_outputs() {
    let engine = TestEngine::new();
    let raster = engine.sample_raster();
    let inputs = params(&[("input", serde_json::json!(raster.to_string_lossy()))]);

    let first = engine
        .runner
        .run("r.slope", inputs.clone())
        .await
        .expect("first job");
    let second = engine
        .runner
        .run("r.slope", inputs)
        .await
        .expect("second job");

    assert_ne!(first.output, second.output);
    assert_eq!(engine.workspaces().len(), 2);
}

#[tokio::test]
async fn failing_module_surfaces_stderr_and_leaves_the_workspace() {
    let engine = TestEngine::new();
    let raster = engine.sample_raster();

    let err = engine
        .runner
        .run(
            "r.broken",
            params(&[("input", serde_json::json!(raster.to_string_lossy()))]),
        )
        .await
        .expect_err("job should fail");

    match err {
        GrassError::EngineInvocation { command, stderr } => {
            assert!(command.contains("r.broken"));
            assert!(stderr.contains("boom"));
        }
        other => panic!("expected EngineInvocation, got {other:?}"),
    }

    // No rollback: the partially-built workspace stays behind.
    assert_eq!(engine.workspaces().len(), 1);
}
