// Copyright 2022 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#[macro_use]
extern crate rustcommon_logger;

use rustcommon_logger::{LogBuilder, MultiLogBuilder, Stdout};

use perft_graph::*;

fn main() {
    let config = Config::new();

    // initialize logging
    let log = LogBuilder::new()
        .output(Box::new(Stdout::new()))
        .log_queue_depth(1024)
        .single_message_size(4096)
        .build()
        .expect("failed to initialize log");

    let mut log = MultiLogBuilder::new()
        .level_filter(config.logging().to_level_filter())
        .default(log)
        .build()
        .start();

    info!("{} {} initializing...", NAME, VERSION);
    config.print();

    let status = match read_input(&config) {
        Ok(transcript) => {
            info!("finished reading {} lines", transcript.lines().count());
            match run(&config, &transcript) {
                Ok(_) => 0,
                Err(e) => {
                    error!("{}", e);
                    1
                }
            }
        }
        Err(e) => {
            error!("failed to read input: {}", e);
            1
        }
    };

    let _ = log.flush();
    std::process::exit(status);
}
