/// Ordered list of models to try for one completion.
///
/// Every attempt reuses the same prompt and sampling parameters. There is no
/// backoff between attempts; the next model is tried as soon as the previous
/// one fails, and the last failure is reported once the list is exhausted.
///
/// Only the constructors below build a policy, so the list is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    models: Vec<String>,
}

impl RetryPolicy {
    /// Try `primary` once, then `backup` once.
    pub fn with_fallback(primary: impl Into<String>, backup: impl Into<String>) -> Self {
        let primary = primary.into();
        let backup = backup.into();
        let mut models = vec![primary];
        if models[0] != backup {
            models.push(backup);
        }
        Self { models }
    }

    /// A single attempt with no fallback.
    pub fn single(model: impl Into<String>) -> Self {
        Self {
            models: vec![model.into()],
        }
    }

    pub fn max_attempts(&self) -> usize {
        self.models.len()
    }

    /// Models in the order they should be attempted.
    pub fn attempts(&self) -> impl Iterator<Item = &str> {
        self.models.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_policy_has_two_attempts() {
        let policy = RetryPolicy::with_fallback("qwen-2.5-coder-32b", "llama3-70b-8192");
        assert_eq!(policy.max_attempts(), 2);
        assert_eq!(
            policy.attempts().collect::<Vec<_>>(),
            vec!["qwen-2.5-coder-32b", "llama3-70b-8192"]
        );
    }

    #[test]
    fn test_identical_backup_collapses_to_single_attempt() {
        let policy = RetryPolicy::with_fallback("m", "m");
        assert_eq!(policy.max_attempts(), 1);
    }

    #[test]
    fn test_single_policy() {
        let policy = RetryPolicy::single("m");
        assert_eq!(policy.attempts().collect::<Vec<_>>(), vec!["m"]);
    }
}
