use std::fmt;

/// Outcome of one batch run. Failures are kept as display strings so the
/// command can list them all at the end.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BatchReport {
    pub total: usize,
    pub processed: usize,
    pub errors: Vec<String>,
}

impl BatchReport {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    pub fn failed(&self) -> usize {
        self.errors.len()
    }

    pub fn record_success(&mut self) {
        self.processed += 1;
    }

    pub fn record_failure(&mut self, message: String) {
        self.errors.push(message);
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Process completed!")?;
        writeln!(f, "Successfully processed: {}", self.processed)?;
        write!(f, "Errors: {}", self.failed())?;

        if !self.errors.is_empty() {
            write!(f, "\nErrors encountered:")?;
            for e in &self.errors {
                write!(f, "\n  {e}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lists_every_error() {
        let mut report = BatchReport::new(3);
        report.record_success();
        report.record_failure("Error processing property 2: boom".into());
        report.record_failure("Error processing property 3: bang".into());

        let text = report.to_string();
        assert!(text.contains("Successfully processed: 1"));
        assert!(text.contains("Errors: 2"));
        assert!(text.contains("  Error processing property 2: boom"));
        assert!(text.contains("  Error processing property 3: bang"));
    }

    #[test]
    fn clean_run_has_no_error_section() {
        let mut report = BatchReport::new(1);
        report.record_success();
        assert_eq!(report.failed(), 0);
        assert!(!report.to_string().contains("Errors encountered"));
    }
}
