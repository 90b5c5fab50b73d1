// Copyright 2022 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::*;

use clap::{App, Arg, ArgMatches};
use rustcommon_logger::Level;
use serde_derive::*;

use std::io::Read;
use std::process;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    general: General,
    #[serde(default)]
    chart: Chart,
    #[serde(default)]
    series: Vec<SeriesConfig>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct General {
    #[serde(default = "default_marker")]
    marker: String,
    #[serde(default = "default_prefix")]
    prefix: String,
    input: Option<String>,
    #[serde(default = "default_output")]
    output: String,
    #[serde(with = "LevelDef")]
    #[serde(default = "default_logging_level")]
    logging: Level,
}

impl Default for General {
    fn default() -> General {
        General {
            marker: default_marker(),
            prefix: default_prefix(),
            input: None,
            output: default_output(),
            logging: default_logging_level(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Chart {
    #[serde(default = "default_title")]
    title: String,
    #[serde(default = "default_width")]
    width: u32,
    height: Option<u32>,
}

impl Default for Chart {
    fn default() -> Chart {
        Chart {
            title: default_title(),
            width: default_width(),
            height: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeriesConfig {
    library: String,
    label: Option<String>,
}

impl SeriesConfig {
    /// parse `LIBRARY` or `LIBRARY=LABEL`
    pub fn parse(value: &str) -> SeriesConfig {
        let mut parts = value.splitn(2, '=');
        let library = parts.next().unwrap_or_default().to_owned();
        let label = parts.next().map(|l| l.to_owned());
        SeriesConfig { library, label }
    }

    pub fn spec(&self) -> SeriesSpec {
        SeriesSpec::new(
            &self.library,
            self.label.as_deref().unwrap_or(&self.library),
        )
    }
}

fn default_marker() -> String {
    "running 54 tests".to_owned()
}

fn default_prefix() -> String {
    "perft".to_owned()
}

fn default_output() -> String {
    "perft.png".to_owned()
}

fn default_title() -> String {
    "Times by move generator\n(Lower is better)".to_owned()
}

fn default_width() -> u32 {
    1280
}

fn default_logging_level() -> Level {
    Level::Info
}

#[derive(Clone, Deserialize, Debug)]
#[serde(rename_all = "lowercase")]
#[serde(remote = "Level")]
#[serde(deny_unknown_fields)]
enum LevelDef {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

pub fn app() -> App<'static, 'static> {
    App::new(NAME)
        .version(VERSION)
        .author("Brian Martin <bmartin@twitter.com>")
        .about("Chart move-generator benchmark results")
        .arg(
            Arg::with_name("config")
                .long("config")
                .value_name("FILE")
                .help("TOML config file")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("input")
                .long("input")
                .value_name("FILE")
                .help("Benchmark transcript to read instead of stdin")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("output")
                .long("output")
                .value_name("FILE")
                .help("Chart image to write, .svg or .png")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("marker")
                .long("marker")
                .value_name("LINE")
                .help("Line that starts the benchmark section")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("prefix")
                .long("prefix")
                .value_name("NAME")
                .help("Benchmark name prefix")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("series")
                .long("series")
                .value_name("LIBRARY[=LABEL]")
                .help("Library to plot, in order. Can be used more than once")
                .multiple(true)
                .number_of_values(1)
                .takes_value(true),
        )
        .arg(
            Arg::with_name("title")
                .long("title")
                .value_name("TEXT")
                .help("Chart title")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("width")
                .long("width")
                .value_name("Pixels")
                .help("Chart width")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("height")
                .long("height")
                .value_name("Pixels")
                .help("Chart height, derived from the number of tests if omitted")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Increase verbosity by one level. Can be used more than once")
                .multiple(true),
        )
}

impl Config {
    /// parse command line options and return `Config`
    pub fn new() -> Config {
        Self::from_matches(&app().get_matches())
    }

    pub fn from_matches(matches: &ArgMatches) -> Config {
        let mut config = if let Some(file) = matches.value_of("config") {
            Config::load_from_file(file).unwrap_or_else(|e| {
                println!("ERROR: failed to load config: {}: {}", file, e);
                process::exit(1);
            })
        } else {
            Default::default()
        };

        if let Some(input) = matches.value_of("input") {
            config.general.input = Some(input.to_owned());
        }

        if let Some(output) = matches.value_of("output") {
            config.general.output = output.to_owned();
        }

        if let Some(marker) = matches.value_of("marker") {
            config.general.marker = marker.to_owned();
        }

        if let Some(prefix) = matches.value_of("prefix") {
            config.general.prefix = prefix.to_owned();
        }

        if let Some(series) = matches.values_of("series") {
            config.series = series.map(SeriesConfig::parse).collect();
        }

        if let Some(title) = matches.value_of("title") {
            config.chart.title = title.to_owned();
        }

        if let Some(width) = parse_numeric_arg(matches, "width") {
            config.chart.width = width;
        }

        if let Some(height) = parse_numeric_arg(matches, "height") {
            config.chart.height = Some(height);
        }

        match matches.occurrences_of("verbose") {
            0 => {}
            1 => config.general.logging = Level::Debug,
            _ => config.general.logging = Level::Trace,
        }

        config
    }

    pub fn load_from_file(file: &str) -> Result<Config, Error> {
        let mut file = std::fs::File::open(file)?;
        let mut content = String::new();
        file.read_to_string(&mut content)?;
        Self::load_from_str(&content)
    }

    pub fn load_from_str(content: &str) -> Result<Config, Error> {
        Ok(toml::from_str(content)?)
    }

    pub fn marker(&self) -> &str {
        &self.general.marker
    }

    pub fn prefix(&self) -> &str {
        &self.general.prefix
    }

    /// the transcript file, `None` for stdin
    pub fn input(&self) -> Option<&str> {
        self.general.input.as_deref()
    }

    pub fn output(&self) -> &str {
        &self.general.output
    }

    pub fn logging(&self) -> Level {
        self.general.logging
    }

    pub fn series(&self) -> Vec<SeriesSpec> {
        self.series.iter().map(|s| s.spec()).collect()
    }

    pub fn chart(&self) -> ChartConfig {
        let mut chart = ChartConfig::new();
        chart
            .title(&self.chart.title)
            .size((self.chart.width, self.chart.height.unwrap_or(0)))
            .series(self.series());
        chart
    }

    pub fn print(&self) {
        info!("-----");
        info!(
            "Config: Input: {} Output: {}",
            self.input().unwrap_or("stdin"),
            self.output()
        );
        info!(
            "Config: Marker: {:?} Prefix: {}",
            self.marker(),
            self.prefix()
        );
        let series = self.series();
        if series.is_empty() {
            info!("Config: Series: all");
        }
        for spec in &series {
            info!("Config: Series: {} Label: {}", spec.library, spec.label);
        }
    }
}

/// a helper function to parse a numeric argument by name from `ArgMatches`
fn parse_numeric_arg(matches: &ArgMatches, key: &str) -> Option<u32> {
    matches.value_of(key).map(|f| {
        f.parse().unwrap_or_else(|_| {
            println!("ERROR: could not parse {}", key);
            process::exit(1);
        })
    })
}
