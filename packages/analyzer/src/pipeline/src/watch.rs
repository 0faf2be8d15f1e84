// Watch Session
//
// Repeated batches over successive program snapshots. A batch whose candidate files, and
// the ancestor files their cached heritage was read from, all hash the same as in the last
// completed batch is skipped outright.

use super::digest::FileDigests;
use super::run::Pipeline;
use crate::error::Result;
use crate::meta::AnalysisResult;
use ts::Program;

#[derive(Debug)]
pub enum BatchOutcome {
    /// No candidate or tracked ancestor file changed since the last completed batch.
    Unchanged,
    Analyzed(AnalysisResult),
}

impl BatchOutcome {
    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            BatchOutcome::Unchanged => None,
            BatchOutcome::Analyzed(result) => Some(result),
        }
    }
}

#[derive(Debug)]
pub struct WatchSession {
    pipeline: Pipeline,
    batches: usize,
}

impl WatchSession {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline,
            batches: 0,
        }
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn pipeline_mut(&mut self) -> &mut Pipeline {
        &mut self.pipeline
    }

    /// Number of batches that actually ran.
    pub fn batches(&self) -> usize {
        self.batches
    }

    /// Runs a batch unless nothing it depends on changed. The skip check hashes the
    /// candidate files plus the heritage dependency files recorded in the incremental cache,
    /// so an edited ancestor outside the candidate set still triggers a run.
    pub fn run_batch(&mut self, program: &dyn Program) -> Result<BatchOutcome> {
        let files = self.pipeline.candidate_files(program)?;
        let digests = FileDigests::from_program(program);
        let aggregate = self.aggregate(&digests, &files);
        if self.pipeline.incremental_cache().last_aggregate() == Some(aggregate.as_str()) {
            tracing::info!(files = files.len(), "batch unchanged, skipped");
            return Ok(BatchOutcome::Unchanged);
        }

        let result = self.pipeline.run(program)?;
        // The run may have recorded new ancestors.
        let aggregate = self.aggregate(&digests, &files);
        self.pipeline.incremental_cache().set_last_aggregate(aggregate);
        self.batches += 1;
        Ok(BatchOutcome::Analyzed(result))
    }

    fn aggregate(&mut self, digests: &FileDigests, files: &[String]) -> String {
        let dependencies = self.pipeline.incremental_cache().dependency_files();
        digests.aggregate(files.iter().chain(dependencies.iter()))
    }
}
