// Copyright 2022 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::collections::HashMap;

/// A single benchmark measurement, with times converted to milliseconds.
#[derive(Clone, Debug, PartialEq)]
pub struct BenchmarkRecord {
    pub test: String,
    pub library: String,
    pub mean_ms: f64,
    pub error_ms: f64,
}

/// Mean times and error margins for one library, in encounter order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Series {
    times: Vec<f64>,
    errors: Vec<f64>,
}

impl Series {
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn errors(&self) -> &[f64] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// Results grouped by library. The test axis holds each test identifier once,
/// in the order it was first seen. For a well-formed transcript the index of a
/// value within a `Series` is the index of its test within the axis.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AggregatedResults {
    axis: Vec<String>,
    libraries: Vec<String>,
    series: HashMap<String, Series>,
}

impl AggregatedResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, record: BenchmarkRecord) {
        if !self.axis.contains(&record.test) {
            self.axis.push(record.test);
        }

        if !self.series.contains_key(&record.library) {
            self.libraries.push(record.library.clone());
        }

        let series = self.series.entry(record.library).or_default();
        series.times.push(record.mean_ms);
        series.errors.push(record.error_ms);
    }

    /// test identifiers in first-seen order
    pub fn axis(&self) -> &[String] {
        &self.axis
    }

    /// library names in first-seen order
    pub fn libraries(&self) -> &[String] {
        &self.libraries
    }

    pub fn series(&self, library: &str) -> Option<&Series> {
        self.series.get(library)
    }

    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }

    /// total number of records across all libraries
    pub fn records(&self) -> usize {
        self.series.values().map(|s| s.len()).sum()
    }
}
