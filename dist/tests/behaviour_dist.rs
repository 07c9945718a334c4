//! Behaviour-driven tests for distribution assembly and packaging.
//!
//! Each scenario runs the full pipeline against a temporary plugin project.
//! Cargo is replaced by a `StubExecutor` and the compiled module is written
//! into the project's output tree up front. Tests use the rstest-bdd v0.5.0
//! mutable world pattern.

mod support;

use plugin_dist::cli::Cli;
use plugin_dist::config::DistConfig;
use plugin_dist::pipeline::{PipelineContext, run_pipeline};
use plugin_dist::test_utils::{
    ExpectedCall, StubExecutor, exit_status, metadata_json, stdout_output, success_output,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::{Map, Value, json};
use std::process::Output;
use support::{TempProject, archive_entries, snapshot};

const METADATA_ARGS: &[&str] = &["metadata", "--no-deps", "--format-version", "1"];

// ---------------------------------------------------------------------------
// World
// ---------------------------------------------------------------------------

struct DistWorld {
    project: TempProject,
    manifest: Option<Map<String, Value>>,
    build_failure: Option<i32>,
    exit_code: Option<i32>,
    stderr: String,
    snapshots: Vec<Vec<(String, Vec<u8>)>>,
}

impl Default for DistWorld {
    fn default() -> Self {
        Self {
            project: TempProject::new(),
            manifest: Some(Map::new()),
            build_failure: None,
            exit_code: None,
            stderr: String::new(),
            snapshots: Vec::new(),
        }
    }
}

impl DistWorld {
    fn manifest_mut(&mut self) -> &mut Map<String, Value> {
        self.manifest.as_mut().expect("project has a manifest")
    }

    fn run(&mut self, args: &str) {
        let manifest_path = self.project.root().join("manifest.json");
        if let Some(manifest) = self.manifest.as_ref().filter(|_| !manifest_path.exists()) {
            let json = serde_json::to_vec_pretty(manifest).expect("manifest serialises");
            self.project.write("manifest.json", &json);
        }

        let root = self.project.root();
        let argv = ["plugin-dist", "-C", root.as_str()]
            .into_iter()
            .chain(args.split_whitespace());
        let cli = Cli::parse_args(argv);
        let config = DistConfig::new(root, "cargo".to_owned(), &cli);
        let plan = cli.build_plan();

        let build_args: Vec<&str> = std::iter::once("build")
            .chain(plan.cargo_args().iter().map(String::as_str))
            .collect();
        let executor = match self.build_failure {
            Some(code) => StubExecutor::new(vec![ExpectedCall::new(
                "cargo",
                &build_args,
                Ok(Output {
                    status: exit_status(code),
                    stdout: Vec::new(),
                    stderr: Vec::new(),
                }),
            )]),
            None => StubExecutor::new(vec![
                ExpectedCall::new("cargo", &build_args, Ok(success_output())),
                ExpectedCall::new(
                    "cargo",
                    METADATA_ARGS,
                    Ok(stdout_output(metadata_json(
                        "my-tool",
                        root,
                        &root.join("target"),
                    ))),
                ),
            ]),
        };

        let context = PipelineContext {
            config: &config,
            plan: &plan,
        };
        let mut stderr = Vec::new();
        let result = run_pipeline(&context, &executor, &mut stderr);
        self.stderr
            .push_str(&String::from_utf8(stderr).expect("stderr should be UTF-8"));

        match result {
            Ok(_) => {
                self.exit_code.get_or_insert(0);
            }
            Err(err) => {
                self.stderr.push_str(&format!("{err}\n"));
                self.exit_code = Some(err.exit_code());
            }
        }
    }
}

#[fixture]
fn world() -> DistWorld {
    DistWorld::default()
}

// ---------------------------------------------------------------------------
// Step definitions
// ---------------------------------------------------------------------------

#[given("a plugin project named \"{name}\" with entry \"{entry}\"")]
fn given_named_project(world: &mut DistWorld, name: String, entry: String) {
    let manifest = world.manifest_mut();
    manifest.insert("name".to_owned(), json!(name));
    manifest.insert("entry".to_owned(), json!(entry));
}

#[given("a plugin project without an entry")]
fn given_project_without_entry(world: &mut DistWorld) {
    world
        .manifest_mut()
        .insert("name".to_owned(), json!("Plain Plugin"));
}

#[given("a project without a manifest")]
fn given_project_without_manifest(world: &mut DistWorld) {
    world.manifest = None;
}

#[given("the manifest lists the additional file \"{path}\"")]
fn given_additional_file(world: &mut DistWorld, path: String) {
    let files = world
        .manifest_mut()
        .entry("additional_files")
        .or_insert_with(|| json!([]));
    files
        .as_array_mut()
        .expect("additional_files is an array")
        .push(json!(path));
}

#[given("the manifest declares the icon \"{path}\"")]
fn given_icon(world: &mut DistWorld, path: String) {
    world.manifest_mut().insert("icon".to_owned(), json!(path));
}

#[given("the project contains the file \"{path}\"")]
fn given_project_file(world: &mut DistWorld, path: String) {
    world
        .project
        .write(&path, format!("contents of {path}").as_bytes());
}

#[given("cargo produced \"{file}\" under \"{profile_dir}\"")]
fn given_compiled_module(world: &mut DistWorld, file: String, profile_dir: String) {
    world
        .project
        .write(&format!("target/{profile_dir}/{file}"), b"\0asm\x01\0\0\0");
}

#[given("cargo build fails with exit code {code}")]
fn given_build_failure(world: &mut DistWorld, code: i32) {
    world.build_failure = Some(code);
}

#[when("the dist build runs")]
fn when_dist_runs(world: &mut DistWorld) {
    world.run("");
}

#[when("the dist build runs with \"{args}\"")]
fn when_dist_runs_with(world: &mut DistWorld, args: String) {
    world.run(&args);
}

#[when("the dist build runs twice with \"{args}\"")]
fn when_dist_runs_twice(world: &mut DistWorld, args: String) {
    for _ in 0..2 {
        world.run(&args);
        let dist = world.project.dist_dir();
        world.snapshots.push(snapshot(&dist));
    }
}

#[then("the run succeeds")]
fn then_run_succeeds(world: &mut DistWorld) {
    assert_eq!(world.exit_code, Some(0), "stderr: {}", world.stderr);
}

#[then("the run fails with exit code {code}")]
fn then_run_fails(world: &mut DistWorld, code: i32) {
    assert_eq!(world.exit_code, Some(code), "stderr: {}", world.stderr);
}

#[then("the dist directory contains \"{path}\"")]
fn then_dist_contains(world: &mut DistWorld, path: String) {
    let target = world.project.dist_dir().join(&path);
    assert!(target.is_file(), "expected {target} to exist");
}

#[then("the dist directory does not contain \"{path}\"")]
fn then_dist_lacks(world: &mut DistWorld, path: String) {
    let target = world.project.dist_dir().join(&path);
    assert!(!target.exists(), "expected {target} to be absent");
}

#[then("the dist directory does not exist")]
fn then_dist_absent(world: &mut DistWorld) {
    assert!(!world.project.dist_dir().exists());
}

#[then("the archive \"{name}\" holds exactly \"{entries}\"")]
fn then_archive_holds(world: &mut DistWorld, name: String, entries: String) {
    let archive = world.project.dist_dir().join(&name);
    let expected: Vec<&str> = entries.split(", ").collect();
    assert_eq!(archive_entries(&archive), expected);
}

#[then("stderr contains \"{text}\"")]
fn then_stderr_contains(world: &mut DistWorld, text: String) {
    assert!(
        world.stderr.contains(&text),
        "expected stderr to contain {text:?}, got {:?}",
        world.stderr
    );
}

#[then("both runs leave the same dist directory")]
fn then_runs_match(world: &mut DistWorld) {
    let [first, second] = world.snapshots.as_slice() else {
        panic!("expected two snapshots, got {}", world.snapshots.len());
    };
    assert_eq!(first, second);
    assert!(first.iter().any(|(name, _)| name == "MyTool.abp"));
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[scenario(
    path = "tests/features/dist.feature",
    name = "Package a plugin with an entry name and an additional file"
)]
fn scenario_package_plugin(world: DistWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/dist.feature",
    name = "Module keeps its own filename without an entry"
)]
fn scenario_module_keeps_name(world: DistWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/dist.feature",
    name = "A missing icon only produces a warning"
)]
fn scenario_missing_icon(world: DistWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/dist.feature",
    name = "Rerunning the build produces the same distribution"
)]
fn scenario_rerun_idempotent(world: DistWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/dist.feature",
    name = "A missing target subdirectory falls back to the output root"
)]
fn scenario_target_fallback(world: DistWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/dist.feature",
    name = "The tool's flags are recognised after forwarded cargo flags"
)]
fn scenario_interleaved_flags(world: DistWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/dist.feature",
    name = "Modules from other profiles are ignored"
)]
fn scenario_other_profiles_ignored(world: DistWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/dist.feature",
    name = "A failing build mirrors cargo's exit code"
)]
fn scenario_build_failure(world: DistWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/dist.feature",
    name = "A project without a manifest is rejected"
)]
fn scenario_missing_manifest(world: DistWorld) {
    let _ = world;
}
