//! Test count records read from JUnit XML summaries.

use std::fmt;
use std::iter::Sum;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Final classification of an aggregated record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TestResult {
    /// No tests were run.
    #[serde(rename = "NO-TESTS")]
    NoTests,
    /// At least one test failed or errored.
    #[serde(rename = "failed")]
    Failed,
    /// Nothing failed but at least one test was skipped.
    #[serde(rename = "ignored")]
    Ignored,
    /// Every test passed.
    #[serde(rename = "passed")]
    Passed,
}

impl TestResult {
    /// The token written to the summary table.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoTests => "NO-TESTS",
            Self::Failed => "failed",
            Self::Ignored => "ignored",
            Self::Passed => "passed",
        }
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counts from one `<testsuite>` element, or the merge of several.
///
/// `passed` is always derived, so `passed + failures + errors + skipped == tests`
/// holds for every value of this type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TestCountRecord {
    timestamp: Option<DateTime<Utc>>,
    tests: u64,
    passed: u64,
    failures: u64,
    errors: u64,
    skipped: u64,
}

impl TestCountRecord {
    /// Build a record from raw attribute values.
    ///
    /// Returns `None` when `failures + errors + skipped` exceeds `tests`.
    #[must_use]
    pub fn new(
        timestamp: Option<DateTime<Utc>>,
        tests: u64,
        failures: u64,
        errors: u64,
        skipped: u64,
    ) -> Option<Self> {
        let passed = tests
            .checked_sub(failures)?
            .checked_sub(errors)?
            .checked_sub(skipped)?;
        Some(Self {
            timestamp,
            tests,
            passed,
            failures,
            errors,
            skipped,
        })
    }

    /// The identity element of [`merge`](Self::merge).
    #[must_use]
    pub fn zero() -> Self {
        Self::default()
    }

    /// Field-wise sum of both records; the earlier timestamp wins.
    ///
    /// On equal timestamps the receiver's value is kept. Counts saturate at
    /// `u64::MAX`; use [`checked_merge`](Self::checked_merge) to detect that.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            timestamp: self.earliest_timestamp(other),
            tests: self.tests.saturating_add(other.tests),
            passed: self.passed.saturating_add(other.passed),
            failures: self.failures.saturating_add(other.failures),
            errors: self.errors.saturating_add(other.errors),
            skipped: self.skipped.saturating_add(other.skipped),
        }
    }

    /// Like [`merge`](Self::merge), but `None` if a count overflows.
    #[must_use]
    pub fn checked_merge(&self, other: &Self) -> Option<Self> {
        Some(Self {
            timestamp: self.earliest_timestamp(other),
            tests: self.tests.checked_add(other.tests)?,
            passed: self.passed.checked_add(other.passed)?,
            failures: self.failures.checked_add(other.failures)?,
            errors: self.errors.checked_add(other.errors)?,
            skipped: self.skipped.checked_add(other.skipped)?,
        })
    }

    fn earliest_timestamp(&self, other: &Self) -> Option<DateTime<Utc>> {
        match (self.timestamp, other.timestamp) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Left fold of `records` starting from [`zero`](Self::zero).
    #[must_use]
    pub fn merge_all<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a Self>,
    {
        records
            .into_iter()
            .fold(Self::zero(), |acc, record| acc.merge(record))
    }

    /// Priority chain: no tests, then failed, then ignored, then passed.
    #[must_use]
    pub fn result(&self) -> TestResult {
        if self.tests == 0 {
            TestResult::NoTests
        } else if self.failures > 0 || self.errors > 0 {
            TestResult::Failed
        } else if self.skipped > 0 {
            TestResult::Ignored
        } else {
            TestResult::Passed
        }
    }

    #[must_use]
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    #[must_use]
    pub fn tests(&self) -> u64 {
        self.tests
    }

    #[must_use]
    pub fn passed(&self) -> u64 {
        self.passed
    }

    #[must_use]
    pub fn failures(&self) -> u64 {
        self.failures
    }

    #[must_use]
    pub fn errors(&self) -> u64 {
        self.errors
    }

    #[must_use]
    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}

impl Sum for TestCountRecord {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, record| acc.merge(&record))
    }
}

impl<'a> Sum<&'a TestCountRecord> for TestCountRecord {
    fn sum<I: Iterator<Item = &'a TestCountRecord>>(iter: I) -> Self {
        Self::merge_all(iter)
    }
}
