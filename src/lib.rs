// Copyright 2022 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#[macro_use]
extern crate rustcommon_logger;

mod chart;
mod config;
mod error;
mod parse;
mod results;

pub use crate::chart::{bar_span, ChartConfig, SeriesSpec};
pub use crate::config::{app, Config, SeriesConfig, NAME, VERSION};
pub use crate::error::Error;
pub use crate::parse::{BenchmarkLogParser, ParseOutput, Termination};
pub use crate::results::{AggregatedResults, BenchmarkRecord, Series};

use std::io::Read;

/// Read the whole transcript, from the configured file or stdin.
pub fn read_input(config: &Config) -> Result<String, Error> {
    let mut content = String::new();
    match config.input() {
        Some(file) => {
            std::fs::File::open(file)?.read_to_string(&mut content)?;
        }
        None => {
            std::io::stdin().read_to_string(&mut content)?;
        }
    }
    Ok(content)
}

/// Parse the transcript and render the chart described by `config`.
pub fn run(config: &Config, transcript: &str) -> Result<ParseOutput, Error> {
    let parser = BenchmarkLogParser::new(config.marker(), config.prefix())?;
    let output = parser.parse(transcript.lines());

    match output.termination {
        Termination::MarkerNotFound => {
            error!("start marker not found: {:?}", parser.marker());
        }
        Termination::EndOfInput => {
            debug!("benchmark section ran to end of input");
        }
        Termination::Mismatch { line } => {
            debug!("benchmark section ended at line {}", line);
        }
    }

    info!(
        "parsed {} results for {} tests across {} libraries",
        output.results.records(),
        output.results.axis().len(),
        output.results.libraries().len()
    );

    config.chart().render(&output.results, config.output())?;
    info!("chart written to {}", config.output());

    Ok(output)
}
