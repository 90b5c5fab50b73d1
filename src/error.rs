// Copyright 2022 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config: {0}")]
    Config(#[from] toml::de::Error),
    #[error("bad line template: {0}")]
    Template(#[from] regex::Error),
    #[error("no results for library: {0}")]
    MissingSeries(String),
    #[error("no benchmark results found")]
    NoResults,
    #[error("failed to render chart: {0}")]
    Render(String),
}
