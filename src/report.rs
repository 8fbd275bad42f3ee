//! What a cleanup run did, stack by stack

use tracing::warn;

/// What happened to a stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// DeleteStack was accepted; `status` is the last status observed afterwards
    Deleted { status: String },
    /// Dry run: everything was listed, nothing was deleted
    Planned,
    /// The operator declined the prompt
    Skipped,
    /// DeleteStack itself was rejected
    DeleteFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackReport {
    pub name: String,
    pub disposition: Disposition,
    pub buckets_emptied: usize,
    pub objects_deleted: usize,
    pub tables_deleted: usize,
    pub namespaces_deleted: usize,
    pub warnings: Vec<String>,
}

impl StackReport {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            disposition: Disposition::Planned,
            buckets_emptied: 0,
            objects_deleted: 0,
            tables_deleted: 0,
            namespaces_deleted: 0,
            warnings: Vec::new(),
        }
    }

    pub fn skipped(name: impl Into<String>) -> Self {
        Self {
            disposition: Disposition::Skipped,
            ..Self::new(name)
        }
    }

    /// Log a best-effort failure and keep it for the summary
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!(stack = %self.name, "{}", message);
        self.warnings.push(message);
    }

    pub fn summary_line(&self) -> String {
        let outcome = match &self.disposition {
            Disposition::Deleted { status } => format!("delete requested ({})", status),
            Disposition::Planned => "dry run, nothing deleted".to_string(),
            Disposition::Skipped => "skipped".to_string(),
            Disposition::DeleteFailed => "stack delete failed".to_string(),
        };

        if self.disposition == Disposition::Skipped {
            return format!("{}: {}", self.name, outcome);
        }

        format!(
            "{}: {}; {} bucket(s) emptied, {} object(s), {} table(s), {} namespace(s) deleted, {} warning(s)",
            self.name,
            outcome,
            self.buckets_emptied,
            self.objects_deleted,
            self.tables_deleted,
            self.namespaces_deleted,
            self.warnings.len()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupReport {
    pub region: String,
    pub stacks: Vec<StackReport>,
    /// Warnings not tied to a single stack (e.g. ListStacks failing)
    pub warnings: Vec<String>,
}

impl CleanupReport {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            stacks: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!(region = %self.region, "{}", message);
        self.warnings.push(message);
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len() + self.stacks.iter().map(|s| s.warnings.len()).sum::<usize>()
    }

    /// Human-readable result, one line per stack
    pub fn summary_lines(&self) -> Vec<String> {
        if self.stacks.is_empty() {
            return vec![format!("No stacks found in {}", self.region)];
        }

        let mut lines: Vec<String> = self.stacks.iter().map(StackReport::summary_line).collect();
        let warnings = self.warning_count();
        if warnings > 0 {
            lines.push(format!(
                "Completed with {} warning(s); see log output for details",
                warnings
            ));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report_says_no_stacks() {
        let report = CleanupReport::new("us-west-2");
        assert_eq!(report.summary_lines(), vec!["No stacks found in us-west-2"]);
    }

    #[test]
    fn test_summary_counts_warnings() {
        let mut report = CleanupReport::new("us-west-2");
        report.warn("ListStacks failed: throttled");

        let mut stack = StackReport::new("smoke-lambda-1");
        stack.disposition = Disposition::Deleted {
            status: "DELETE_IN_PROGRESS".to_string(),
        };
        stack.buckets_emptied = 1;
        stack.objects_deleted = 12;
        stack.warn("Failed to delete table logs");
        report.stacks.push(stack);
        report.stacks.push(StackReport::skipped("smoke-lambda-2"));

        let lines = report.summary_lines();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("smoke-lambda-1: delete requested (DELETE_IN_PROGRESS)"));
        assert!(lines[0].contains("12 object(s)"));
        assert_eq!(lines[1], "smoke-lambda-2: skipped");
        assert!(lines[2].contains("2 warning(s)"));
    }
}
