//! Execution engine for the dependency-check graph
//!
//! This module provides:
//! - Graph validation: unknown dependencies and cycles are rejected up front
//! - Single-flight evaluation: each check runs at most once per engine,
//!   however many dependents ask for it concurrently
//! - Dependency ordering: a check probes only after all its prerequisites passed
//! - Concurrent evaluation of every requested top-level check

use crate::domain::{CheckFields, CheckNode, CheckResult, CheckStatus, ReportEntry, RunReport};
use crate::error::{AppError, ConfigError, EngineError};
use crate::probe::ProbeRunner;
use crate::progress::Progress;
use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed future returned by [`Engine::resolve`]
pub type ResolveFuture<'a> = Pin<Box<dyn Future<Output = CheckResult> + Send + 'a>>;

/// Runs a validated set of checks.
///
/// Results are memoized inside the nodes, so an engine evaluates its checks once;
/// build a new engine for a fresh run.
pub struct Engine {
    nodes: BTreeMap<String, CheckNode>,
    runner: Arc<dyn ProbeRunner>,
    progress: Arc<Progress>,
}

impl Engine {
    /// Create an engine from already-built nodes
    pub fn new(
        nodes: impl IntoIterator<Item = CheckNode>,
        runner: Arc<dyn ProbeRunner>,
    ) -> Result<Self, ConfigError> {
        let mut by_name = BTreeMap::new();
        for node in nodes {
            let name = node.name.clone();
            if by_name.insert(name.clone(), node).is_some() {
                return Err(ConfigError::DuplicateCheck { name });
            }
        }
        let nodes = by_name;
        validate(&nodes)?;

        Ok(Self {
            nodes,
            runner,
            progress: Arc::new(Progress::disabled()),
        })
    }

    /// Create an engine from resolved configuration fields
    pub fn from_fields(
        fields: &BTreeMap<String, CheckFields>,
        runner: Arc<dyn ProbeRunner>,
    ) -> Result<Self, ConfigError> {
        let nodes = fields
            .iter()
            .map(|(name, f)| CheckNode::from_fields(name, f))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(nodes, runner)
    }

    /// Emit progress lines through `progress`
    pub fn with_progress(mut self, progress: Arc<Progress>) -> Self {
        self.progress = progress;
        self
    }

    pub fn node(&self, name: &str) -> Option<&CheckNode> {
        self.nodes.get(name)
    }

    /// Configured check names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    /// Evaluate every configured check
    pub async fn run_all(self: &Arc<Self>) -> Result<RunReport, EngineError> {
        let names = self.nodes.keys().cloned().collect();
        self.run_names(names).await
    }

    /// Evaluate the named checks and, through them, their prerequisites
    pub async fn run_selected<S: AsRef<str>>(
        self: &Arc<Self>,
        names: &[S],
    ) -> Result<RunReport, AppError> {
        let mut selected = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            if !self.nodes.contains_key(name) {
                return Err(ConfigError::UnknownCheck {
                    name: name.to_string(),
                }
                .into());
            }
            selected.push(name.to_string());
        }
        Ok(self.run_names(selected).await?)
    }

    async fn run_names(self: &Arc<Self>, names: Vec<String>) -> Result<RunReport, EngineError> {
        let handles: Vec<_> = names
            .into_iter()
            .map(|name| {
                let engine = Arc::clone(self);
                let task_name = name.clone();
                let handle = tokio::spawn(async move {
                    engine.resolve(&task_name).await;
                });
                (name, handle)
            })
            .collect();

        for (name, handle) in handles {
            handle.await.map_err(|e| EngineError::TaskFailed {
                name,
                message: e.to_string(),
            })?;
        }

        Ok(self.report())
    }

    /// Report over every check evaluated so far
    pub fn report(&self) -> RunReport {
        RunReport::new(
            self.nodes
                .values()
                .filter_map(|node| node.result().map(|r| ReportEntry::new(node, r.clone())))
                .collect(),
        )
    }

    /// Result of the named check, evaluating it first if nobody has yet.
    ///
    /// Concurrent callers for the same name share one evaluation.
    pub fn resolve<'a>(&'a self, name: &'a str) -> ResolveFuture<'a> {
        Box::pin(async move {
            let Some(node) = self.nodes.get(name) else {
                return CheckResult::failed(format!("Unknown check: {}", name));
            };
            if let Some(done) = node.result() {
                tracing::debug!(check = name, "using memoized result");
                return done.clone();
            }
            node.outcome()
                .get_or_init(|| self.evaluate(node))
                .await
                .clone()
        })
    }

    async fn evaluate(&self, node: &CheckNode) -> CheckResult {
        for dep in &node.depends {
            if !self.resolve(dep).await.success {
                self.emit(node, CheckStatus::NotFound);
                return CheckResult::failed_dependency(dep);
            }
        }

        self.progress.set_message(&format!("Checking {}", node.name));
        let output = match self.runner.run(&node.probe).await {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!(check = %node.name, error = %e, "probe could not run");
                self.emit(node, CheckStatus::NotFound);
                return CheckResult::failed(e.to_string());
            }
        };

        if !output.success {
            self.emit(node, CheckStatus::NotFound);
            return CheckResult::failed(output.stderr.trim());
        }

        let version = match node.extract_version(&output.stdout) {
            Ok(version) => version,
            Err(reason) => {
                self.emit(node, CheckStatus::NotFound);
                return CheckResult::failed(reason);
            }
        };

        if node.require.test(&version) {
            self.emit(node, CheckStatus::Ok(version));
            CheckResult::passed()
        } else {
            self.emit(node, CheckStatus::TooOld(version.clone()));
            CheckResult::too_old(version)
        }
    }

    fn emit(&self, node: &CheckNode, status: CheckStatus) {
        tracing::debug!(check = %node.name, %status, "check finished");
        self.progress
            .line(&format!("{} {}: {}", node.name, node.require, status));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Rejects unknown dependency names and cycles
fn validate(nodes: &BTreeMap<String, CheckNode>) -> Result<(), ConfigError> {
    for node in nodes.values() {
        if let Some(dep) = node.depends.iter().find(|d| !nodes.contains_key(*d)) {
            return Err(ConfigError::unknown_dependency(&node.name, dep));
        }
    }

    let mut marks = HashMap::new();
    let mut stack = Vec::new();
    for name in nodes.keys() {
        visit(name, nodes, &mut marks, &mut stack)?;
    }
    Ok(())
}

fn visit<'a>(
    name: &'a str,
    nodes: &'a BTreeMap<String, CheckNode>,
    marks: &mut HashMap<&'a str, Mark>,
    stack: &mut Vec<&'a str>,
) -> Result<(), ConfigError> {
    match marks.get(name) {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::Visiting) => {
            let start = stack.iter().position(|n| *n == name).unwrap_or(0);
            let mut path: Vec<String> = stack[start..].iter().map(|n| n.to_string()).collect();
            path.push(name.to_string());
            return Err(ConfigError::DependencyCycle { path });
        }
        None => {}
    }

    marks.insert(name, Mark::Visiting);
    stack.push(name);
    for dep in &nodes[name].depends {
        visit(dep, nodes, marks, stack)?;
    }
    stack.pop();
    marks.insert(name, Mark::Done);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TOO_OLD;
    use crate::error::ProbeError;
    use crate::probe::ProbeOutput;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Probe runner answering from a table and counting invocations
    #[derive(Default)]
    struct MockRunner {
        responses: HashMap<String, ProbeOutput>,
        calls: Mutex<Vec<String>>,
        delay: Option<Duration>,
    }

    impl MockRunner {
        fn new() -> Self {
            Self::default()
        }

        fn with(mut self, command: &str, output: ProbeOutput) -> Self {
            self.responses.insert(command.to_string(), output);
            self
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn count(&self, command: &str) -> usize {
            self.calls().iter().filter(|c| *c == command).count()
        }
    }

    #[async_trait]
    impl ProbeRunner for MockRunner {
        async fn run(&self, command: &str) -> Result<ProbeOutput, ProbeError> {
            self.calls.lock().unwrap().push(command.to_string());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.responses.get(command).cloned().ok_or_else(|| {
                ProbeError::spawn(
                    command,
                    std::io::Error::new(std::io::ErrorKind::NotFound, "no such command"),
                )
            })
        }
    }

    fn check(require: &str, probe: &str, depends: &str) -> CheckFields {
        CheckFields {
            require: Some(require.to_string()),
            get_version: Some(probe.to_string()),
            depends: vec![depends.to_string()],
            ..Default::default()
        }
    }

    fn config(entries: &[(&str, CheckFields)]) -> BTreeMap<String, CheckFields> {
        entries
            .iter()
            .map(|(name, f)| (name.to_string(), f.clone()))
            .collect()
    }

    fn engine(
        entries: &[(&str, CheckFields)],
        runner: &Arc<MockRunner>,
    ) -> Arc<Engine> {
        let runner: Arc<dyn ProbeRunner> = runner.clone();
        Arc::new(Engine::from_fields(&config(entries), runner).unwrap())
    }

    /// A -> B -> C, consumed by X and Y
    fn chain() -> Vec<(&'static str, CheckFields)> {
        vec![
            ("a", check(">=1", "probe-a", "b")),
            ("b", check(">=1", "probe-b", "c")),
            ("c", check(">=1", "probe-c", "")),
            ("x", check(">=1", "probe-x", "a")),
            ("y", check(">=1", "probe-y", "a")),
        ]
    }

    fn chain_runner(c_output: ProbeOutput) -> MockRunner {
        MockRunner::new()
            .with("probe-a", ProbeOutput::success("1.0"))
            .with("probe-b", ProbeOutput::success("1.0"))
            .with("probe-c", c_output)
            .with("probe-x", ProbeOutput::success("1.0"))
            .with("probe-y", ProbeOutput::success("1.0"))
    }

    #[tokio::test]
    async fn test_shared_dependency_probed_once() {
        let runner = Arc::new(chain_runner(ProbeOutput::success("1.0")));
        let engine = engine(&chain(), &runner);

        let report = engine.run_all().await.unwrap();

        assert!(report.is_success());
        assert_eq!(report.len(), 5);
        for probe in ["probe-a", "probe-b", "probe-c", "probe-x", "probe-y"] {
            assert_eq!(runner.count(probe), 1, "{}", probe);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_single_flight_under_parallel_demand() {
        let mut entries = vec![("base", check(">=1", "probe-base", ""))];
        let names: Vec<String> = (0..16).map(|i| format!("consumer{}", i)).collect();
        for name in &names {
            entries.push((name.as_str(), check(">=1", "probe-consumer", "base")));
        }
        let runner = Arc::new(
            MockRunner::new()
                .with("probe-base", ProbeOutput::success("2.0"))
                .with("probe-consumer", ProbeOutput::success("1.0"))
                .with_delay(Duration::from_millis(20)),
        );
        let engine = engine(&entries, &runner);

        let report = engine.run_all().await.unwrap();

        assert!(report.is_success());
        assert_eq!(runner.count("probe-base"), 1);
        assert_eq!(runner.count("probe-consumer"), 16);
    }

    #[tokio::test]
    async fn test_dependency_probed_before_dependent() {
        let runner = Arc::new(chain_runner(ProbeOutput::success("1.0")));
        let engine = engine(&chain(), &runner);

        engine.run_all().await.unwrap();

        let calls = runner.calls();
        let pos = |probe: &str| calls.iter().position(|c| c == probe).unwrap();
        assert!(pos("probe-c") < pos("probe-b"));
        assert!(pos("probe-b") < pos("probe-a"));
        assert!(pos("probe-a") < pos("probe-x"));
        assert!(pos("probe-a") < pos("probe-y"));
    }

    #[tokio::test]
    async fn test_failed_dependency_short_circuits() {
        let runner = Arc::new(chain_runner(ProbeOutput::failure(127, "c: not found\n")));
        let engine = engine(&chain(), &runner);

        let report = engine.run_all().await.unwrap();

        assert!(!report.is_success());
        assert_eq!(
            report.get("c").unwrap().failure.as_deref(),
            Some("c: not found")
        );
        assert_eq!(
            report.get("b").unwrap().failure.as_deref(),
            Some("Failed dependency: c")
        );
        assert_eq!(
            report.get("a").unwrap().failure.as_deref(),
            Some("Failed dependency: b")
        );
        assert_eq!(
            report.get("x").unwrap().failure.as_deref(),
            Some("Failed dependency: a")
        );
        assert_eq!(runner.count("probe-c"), 1);
        for probe in ["probe-a", "probe-b", "probe-x", "probe-y"] {
            assert_eq!(runner.count(probe), 0, "{}", probe);
        }
    }

    #[tokio::test]
    async fn test_independent_checks_complete_despite_failure() {
        let runner = Arc::new(
            MockRunner::new()
                .with("probe-ok", ProbeOutput::success("3.1"))
                .with("probe-bad", ProbeOutput::failure(1, "boom")),
        );
        let engine = engine(
            &[
                ("ok", check(">=3", "probe-ok", "")),
                ("bad", check(">=3", "probe-bad", "")),
            ],
            &runner,
        );

        let report = engine.run_all().await.unwrap();

        assert!(report.get("ok").unwrap().success);
        assert!(!report.get("bad").unwrap().success);
        assert!(!report.is_success());
    }

    #[tokio::test]
    async fn test_too_old_records_found_version() {
        let runner = Arc::new(MockRunner::new().with("probe", ProbeOutput::success("4.0.0\n")));
        let engine = engine(&[("awk", check(">=5", "probe", ""))], &runner);

        let report = engine.run_all().await.unwrap();

        let result = report.get("awk").unwrap();
        assert!(!result.success);
        assert_eq!(result.failure.as_deref(), Some(TOO_OLD));
        assert_eq!(result.found_version.as_ref().unwrap().to_string(), "4.0.0");
    }

    #[tokio::test]
    async fn test_non_zero_exit_ignores_pattern() {
        let runner = Arc::new(
            MockRunner::new().with("probe", ProbeOutput::failure(2, "  awk: command not found \n")),
        );
        let mut fields = check(">=5", "probe", "");
        fields.pattern = Some("GNU Awk (.*)".to_string());
        let engine = engine(&[("awk", fields)], &runner);

        let report = engine.run_all().await.unwrap();

        let result = report.get("awk").unwrap();
        assert_eq!(result.failure.as_deref(), Some("awk: command not found"));
        assert!(result.found_version.is_none());
    }

    #[tokio::test]
    async fn test_unparsable_output_fails_check() {
        let runner = Arc::new(MockRunner::new().with("probe", ProbeOutput::success("unknown")));
        let engine = engine(&[("tool", check(">=1", "probe", ""))], &runner);

        let report = engine.run_all().await.unwrap();

        let failure = report.get("tool").unwrap().failure.clone().unwrap();
        assert!(failure.contains("unable to parse version"));
    }

    #[tokio::test]
    async fn test_spawn_error_fails_check() {
        let runner = Arc::new(MockRunner::new());
        let engine = engine(&[("tool", check(">=1", "missing", ""))], &runner);

        let report = engine.run_all().await.unwrap();

        let failure = report.get("tool").unwrap().failure.clone().unwrap();
        assert!(failure.contains("failed to run 'missing'"));
    }

    #[tokio::test]
    async fn test_run_selected_evaluates_closure_only() {
        let runner = Arc::new(chain_runner(ProbeOutput::success("1.0")));
        let engine = engine(&chain(), &runner);

        let report = engine.run_selected(&["b"]).await.unwrap();

        let names: Vec<_> = report.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c"]);
        assert_eq!(runner.count("probe-a"), 0);
    }

    #[tokio::test]
    async fn test_run_selected_unknown_name() {
        let runner = Arc::new(chain_runner(ProbeOutput::success("1.0")));
        let engine = engine(&chain(), &runner);

        let err = engine.run_selected(&["nope"]).await.unwrap_err();

        assert!(matches!(
            err,
            AppError::Config(ConfigError::UnknownCheck { .. })
        ));
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_is_memoized() {
        let runner = Arc::new(MockRunner::new().with("probe", ProbeOutput::success("1.0")));
        let engine = engine(&[("tool", check(">=1", "probe", ""))], &runner);

        let first = engine.resolve("tool").await;
        let second = engine.resolve("tool").await;

        assert_eq!(first, second);
        assert_eq!(runner.count("probe"), 1);
        assert!(engine.node("tool").unwrap().result().is_some());
    }

    #[test]
    fn test_unknown_dependency_rejected() {
        let runner: Arc<dyn ProbeRunner> = Arc::new(MockRunner::new());
        let err = Engine::from_fields(
            &config(&[("numpy", check(">=1", "probe", "python3"))]),
            runner,
        )
        .err()
        .unwrap();
        assert!(matches!(
            err,
            ConfigError::UnknownDependency { ref dependency, .. } if dependency == "python3"
        ));
    }

    #[test]
    fn test_duplicate_node_names_rejected() {
        let runner: Arc<dyn ProbeRunner> = Arc::new(MockRunner::new());
        let first = CheckNode::from_fields("awk", &check(">=4", "awk --version", "")).unwrap();
        let second = CheckNode::from_fields("awk", &check(">=5", "gawk --version", "")).unwrap();

        let err = Engine::new([first, second], runner).err().unwrap();
        assert!(matches!(
            err,
            ConfigError::DuplicateCheck { ref name } if name == "awk"
        ));
    }

    #[test]
    fn test_cycle_rejected() {
        let runner: Arc<dyn ProbeRunner> = Arc::new(MockRunner::new());
        let err = Engine::from_fields(
            &config(&[
                ("a", check(">=1", "pa", "b")),
                ("b", check(">=1", "pb", "c")),
                ("c", check(">=1", "pc", "a")),
            ]),
            runner,
        )
        .err()
        .unwrap();
        match err {
            ConfigError::DependencyCycle { path } => {
                assert_eq!(path, vec!["a", "b", "c", "a"]);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_diamond_is_not_a_cycle() {
        let runner: Arc<dyn ProbeRunner> = Arc::new(MockRunner::new());
        let engine = Engine::from_fields(
            &config(&[
                ("top", check(">=1", "p", "left, right")),
                ("left", check(">=1", "p", "base")),
                ("right", check(">=1", "p", "base")),
                ("base", check(">=1", "p", "")),
            ]),
            runner,
        )
        .unwrap();
        assert_eq!(
            engine.names().collect::<Vec<_>>(),
            vec!["base", "left", "right", "top"]
        );
    }
}
