//! Routes a request to its analysis and wraps the outcome.

use crate::complexity::{select_engine, ComplexityAnalyzer};
use crate::config::RunnerConfig;
use crate::graph::ImportGraphBuilder;
use crate::protocol::{validate, AnalysisOutput, Operation, RawRequest, Request, Response};

/// Handles validated requests under one configuration.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    config: RunnerConfig,
}

impl Dispatcher {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    /// Validate `raw` and run it.
    ///
    /// A missing or unknown operation produces a failed response with no
    /// per-file results.
    pub fn handle(&self, raw: RawRequest) -> Response {
        match validate(raw, &self.config.default_workspace_root) {
            Ok(request) => Response::success(self.run(&request)),
            Err(e) => {
                tracing::warn!(error = %e, "rejected request");
                Response::failure(e)
            }
        }
    }

    /// Run a validated request.
    pub fn run(&self, request: &Request) -> AnalysisOutput {
        tracing::debug!(
            operation = %request.operation,
            files = request.file_paths.len(),
            root = %request.workspace_root.display(),
            "dispatching"
        );

        match request.operation {
            Operation::ImportGraph => AnalysisOutput::Imports(
                ImportGraphBuilder::new(&request.workspace_root).build(&request.file_paths),
            ),
            Operation::Complexity => {
                let mut analyzer =
                    ComplexityAnalyzer::new(select_engine(self.config.force_rough_complexity));
                tracing::debug!(engine = %analyzer.engine_kind(), "selected complexity engine");
                AnalysisOutput::Complexity(analyzer.analyze(&request.file_paths))
            }
        }
    }
}
