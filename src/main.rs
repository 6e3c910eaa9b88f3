// Copyright 2026 by the fypsched developers
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use this file except in compliance with
// the License. You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied. See the License for the
// specific language governing permissions and limitations under the License.

use fypsched::io;
use fypsched::solver;
use log::{debug, error, info, warn};
use std::fs::File;

// Exit codes: 0 for a usable schedule, 2 when the solver finished without one,
// 1 for configuration or precheck failures that never reach the solver.
fn main() {
    std::process::exit(run());
}

fn run() -> i32 {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!(
        "This is the assessment session scheduler (fypsched), version {}",
        option_env!("CARGO_PKG_VERSION").unwrap_or("unknown")
    );
    let args = parse_cli_args();

    if args.get_one::<String>("OUTPUT").is_none() && !args.get_flag("print") {
        warn!("No OUTPUT file and no --print option given. The schedule will only be summarised on stdout.");
    }

    let inpath: &String = args.get_one("CONFIG").unwrap();
    debug!("Loading configuration {} ...", inpath);
    let cfg = match io::json::load_config(inpath) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Could not load configuration {}: {}", inpath, e);
            return 1;
        }
    };
    info!(
        "Found {} project(s), {} timeslot(s), {} lecturer(s) and {} student(s).",
        cfg.projects.len(),
        cfg.timeslots.len(),
        cfg.lecturers.len(),
        cfg.students.len()
    );

    let (errors, warnings) = solver::precheck::precheck(&cfg);
    for w in &warnings {
        warn!("precheck: {}", w);
    }
    if !errors.is_empty() {
        for e in &errors {
            error!("precheck: {}", e);
        }
        return 1;
    }

    let level: &String = args.get_one("level").unwrap();
    let result = match solver::solve(&cfg, level) {
        Ok(result) => result,
        Err(e @ solver::SolveError::BackendFault(_)) => {
            error!("{}", e);
            return 2;
        }
        Err(e) => {
            error!("{}", e);
            return 1;
        }
    };

    println!(
        "status={}  objective={}",
        result.status,
        result
            .objective_value
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    for d in &result.diagnostics {
        println!("  {}", d);
    }

    if args.get_flag("print") {
        print!("{}", io::format_schedule(&result, &cfg));
    }

    if let Some(outpath) = args.get_one::<String>("OUTPUT") {
        debug!("Opening output file {} ...", outpath);
        match File::create(outpath) {
            Err(e) => error!("Could not open output file {}: {}.", outpath, e),
            Ok(file) => match io::json::write_result(file, &result) {
                Ok(_) => debug!("Result written to {}.", outpath),
                Err(e) => error!("Could not write result to {}: {}.", outpath, e),
            },
        }
    }

    if result.status.is_feasible() {
        0
    } else {
        2
    }
}

/// Helper function to construct and execute parser for command line options
fn parse_cli_args() -> clap::ArgMatches {
    clap::command!()
        .arg(
            clap::Arg::new("level")
                .short('l')
                .long("level")
                .help(
                    "Constraint slice to solve: slice1 (rooms only), slice2 (adds panels \
                     and availability) or slice3 (adds the soft objectives). The aliases \
                     1, 2, 3 and full are accepted as well.",
                )
                .value_name("LEVEL")
                .default_value("slice3"),
        )
        .arg(
            clap::Arg::new("print")
                .short('p')
                .long("print")
                .help("Print the calculated schedule to stdout in a human readable format")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("CONFIG")
                .help("Sets the configuration file to use")
                .required(true)
                .index(1),
        )
        .arg(
            clap::Arg::new("OUTPUT")
                .help("Optional path for the JSON result document")
                .index(2),
        )
        .get_matches()
}
