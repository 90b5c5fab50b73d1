// Copyright 2022 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::*;

use regex::Regex;

const NANOS_PER_MILLI: f64 = 1_000_000.0;

/// Why the parser stopped consuming lines.
#[derive(Clone, Debug, PartialEq)]
pub enum Termination {
    /// the start marker never appeared
    MarkerNotFound,
    /// every line after the marker matched the template
    EndOfInput,
    /// a line after the marker did not match; it and all later lines were
    /// left unread
    Mismatch { line: usize },
}

#[derive(Debug)]
pub struct ParseOutput {
    pub results: AggregatedResults,
    pub termination: Termination,
}

enum State {
    BeforeStart,
    Collecting,
}

/// Extracts benchmark records from a `cargo bench` transcript.
///
/// Lines before the start marker are ignored. Every line after it is stripped
/// of whitespace and thousands separators and must then match
/// `test<prefix>_<test>_<library>...bench:<mean>ns/iter(+/-<error>)`. The
/// first line that does not match ends the benchmark section. Matching is
/// case-insensitive; captured fields keep the case of the input.
pub struct BenchmarkLogParser {
    marker: String,
    template: Regex,
}

impl BenchmarkLogParser {
    pub fn new(marker: &str, prefix: &str) -> Result<Self, Error> {
        let template = Regex::new(&format!(
            r"(?i)^test{}_(.+?)_(.+?)\.\.\.bench:(.+?)ns/iter\(\+/-(.+?)\)$",
            regex::escape(prefix)
        ))?;

        Ok(Self {
            marker: marker.to_owned(),
            template,
        })
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// match a single benchmark line against the template
    pub fn parse_line(&self, line: &str) -> Option<BenchmarkRecord> {
        let line: String = line
            .chars()
            .filter(|c| !c.is_whitespace() && *c != ',')
            .collect();

        let captures = self.template.captures(&line)?;
        let mean: u64 = captures[3].parse().ok()?;
        let error: u64 = captures[4].parse().ok()?;

        Some(BenchmarkRecord {
            test: captures[1].to_owned(),
            library: captures[2].to_owned(),
            mean_ms: mean as f64 / NANOS_PER_MILLI,
            error_ms: error as f64 / NANOS_PER_MILLI,
        })
    }

    pub fn parse<'a, I>(&self, lines: I) -> ParseOutput
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut results = AggregatedResults::new();
        let mut state = State::BeforeStart;

        for (number, line) in lines.into_iter().enumerate() {
            match state {
                State::BeforeStart => {
                    if line.trim_end_matches(&['\r', '\n'][..]) == self.marker {
                        info!("found start marker at line {}", number + 1);
                        state = State::Collecting;
                    }
                }
                State::Collecting => match self.parse_line(line) {
                    Some(record) => {
                        debug!(
                            "{} on test {} ran in {} ms with error {} ms",
                            record.library, record.test, record.mean_ms, record.error_ms
                        );
                        results.record(record);
                    }
                    None => {
                        debug!("end of benchmark section at line {}", number + 1);
                        return ParseOutput {
                            results,
                            termination: Termination::Mismatch { line: number + 1 },
                        };
                    }
                },
            }
        }

        let termination = match state {
            State::BeforeStart => Termination::MarkerNotFound,
            State::Collecting => Termination::EndOfInput,
        };

        ParseOutput {
            results,
            termination,
        }
    }
}
