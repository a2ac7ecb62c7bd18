use std::fs;
use std::io::Write;
use std::time::Duration;

use anyhow::{bail, Context, Error};
use clap::{App, Arg};
use env_logger::{fmt, Builder, Target};
use log::{error, info};
use log::{Level, LevelFilter, Record};

use car_checker::counterexample::format_trace;
use car_checker::{check_with_graph, Model, Outcome, Settings};

fn main() {
    let exit_code = match main_with_err() {
        Err(err) => {
            error!("{:#}", err);
            1
        }
        Ok(exit_code) => exit_code,
    };
    std::process::exit(exit_code);
}

fn init_logging() {
    let format = |buf: &mut fmt::Formatter, record: &Record| {
        if record.level() == Level::Info {
            writeln!(buf, "c {}", record.args())
        } else {
            writeln!(buf, "c {}: {}", record.level(), record.args())
        }
    };

    let mut builder = Builder::new();
    builder
        .target(Target::Stdout)
        .format(format)
        .filter(None, LevelFilter::Info);

    if let Ok(ref env_var) = std::env::var("CAR_LOG") {
        builder.parse_filters(env_var);
    }

    builder.init();
}

fn main_with_err() -> Result<i32, Error> {
    let matches = App::new("car")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Complementary approximate reachability safety model checker")
        .arg(Arg::from_usage("<INPUT> 'AIGER (.aag) circuit to check'"))
        .arg(Arg::from_usage(
            "[output-index] -b --bad=[N] 'Index of the output to check (default: all)'",
        ))
        .arg(Arg::from_usage(
            "[witness] -w --witness=[FILE] 'Write a counterexample witness to FILE'",
        ))
        .arg(Arg::from_usage("--partial 'Generalize discovered states to partial cubes'"))
        .arg(Arg::from_usage("--rotate 'Reorder assumptions using the last conflicting cube'"))
        .arg(Arg::from_usage("--propagation 'Push still-blocking cubes forward between iterations'"))
        .arg(Arg::from_usage("--muc 'Extract a minimal unsatisfiable core from each conflict'"))
        .arg(Arg::from_usage("--end 'Revisit known start states, newest first'"))
        .arg(Arg::from_usage(
            "[timeout] --timeout=[SECONDS] 'Abort with a timeout verdict after this many seconds'",
        ))
        .arg(Arg::from_usage(
            "[visualization] --visualization=[FILE] 'Write a GML dump of the explored states to FILE'",
        ))
        .get_matches();

    init_logging();
    info!("car {}", env!("CARGO_PKG_VERSION"));

    let input_path = matches.value_of("INPUT").expect("required argument");
    info!("loading '{}'", input_path);
    let model = car_aig::load_file(input_path)
        .with_context(|| format!("failed to load AIGER circuit '{}'", input_path))?;

    let settings = Settings {
        partial: matches.is_present("partial"),
        rotate: matches.is_present("rotate"),
        propagation: matches.is_present("propagation"),
        muc: matches.is_present("muc"),
        end: matches.is_present("end"),
        timelimit: matches
            .value_of("timeout")
            .map(|s| s.parse::<u64>())
            .transpose()
            .context("--timeout expects an integer number of seconds")?
            .map(Duration::from_secs),
        visualization: matches.is_present("visualization"),
    };

    let bad_indices: Vec<usize> = match matches.value_of("output-index") {
        Some(s) => {
            let index: usize = s.parse().context("--bad expects an integer output index")?;
            if index >= model.outputs().len() {
                bail!(
                    "output index {} out of range, circuit has {} output(s)",
                    index,
                    model.outputs().len()
                );
            }
            vec![index]
        }
        None => (0..model.outputs().len()).collect(),
    };

    for bad_index in bad_indices {
        info!("checking output {}", bad_index);
        let (outcome, graph) = check_with_graph(&model, bad_index, &settings)?;

        if let (Some(path), Some(graph)) = (matches.value_of("visualization"), graph.as_ref()) {
            fs::write(path, graph)
                .with_context(|| format!("failed to write visualization to '{}'", path))?;
        }

        match outcome {
            Outcome::Safe { invariant_level } => {
                println!(
                    "output {}: SAFE (invariant at frame {})",
                    bad_index, invariant_level
                );
            }
            Outcome::Unsafe { trace } => {
                println!("output {}: UNSAFE ({} cycle(s))", bad_index, trace.len());
                if let Some(path) = matches.value_of("witness") {
                    fs::write(path, format_trace(&trace))
                        .with_context(|| format!("failed to write witness to '{}'", path))?;
                }
            }
            Outcome::Timeout => {
                println!("output {}: TIMEOUT", bad_index);
                // The budget is spent; remaining outputs are not attempted.
                break;
            }
        }
    }

    Ok(0)
}
