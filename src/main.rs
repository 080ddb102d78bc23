#![allow(non_snake_case)]
use log::info;
use ndarray::Array1;
use std::env;
use std::process::ExitCode;
use strum::IntoEnumIterator;
use tabled::{builder::Builder, settings::Style};

use RustedCalc::Utils::config::CalcConfig;
use RustedCalc::Utils::logger::init_logger;
use RustedCalc::calculus::{ERROR_MARKER, differentiate_with, evaluate_with, integrate_with};
use RustedCalc::symbolic::tokenizer::Func;

fn usage() -> String {
    let functions: Vec<String> = Func::iter().map(|f| f.to_string()).collect();
    format!(
        "usage:\n  \
         RustedCalc eval <expr> [start end n] [--config file.toml]\n  \
         RustedCalc diff <expr> [start end n] [--config file.toml]\n  \
         RustedCalc int  <expr> [lower upper] [--config file.toml]\n\
         loose notation is accepted: 2x^2+3, 2sin(x), (x+1)(x-1)\n\
         functions: {}",
        functions.join(", ")
    )
}

fn parse_number(text: &str) -> Result<f64, String> {
    text.parse::<f64>()
        .map_err(|_| format!("'{}' is not a number", text))
}

/// `[start end n]`, defaulting to five points on `[0, 1]`
fn samples_from(args: &[String]) -> Result<Array1<f64>, String> {
    match args {
        [] => Ok(Array1::linspace(0.0, 1.0, 5)),
        [start, end, n] => {
            let n = n
                .parse::<usize>()
                .map_err(|_| format!("'{}' is not a number of points", n))?;
            Ok(Array1::linspace(parse_number(start)?, parse_number(end)?, n))
        }
        _ => Err("expected start, end and number of points".to_string()),
    }
}

fn bounds_from(args: &[String]) -> Result<(f64, f64), String> {
    match args {
        [] => Ok((0.0, 1.0)),
        [lower, upper] => Ok((parse_number(lower)?, parse_number(upper)?)),
        _ => Err("expected lower and upper bound".to_string()),
    }
}

fn values_table(variable: &str, header: &str, samples: &Array1<f64>, values: &Array1<f64>) -> String {
    let mut builder = Builder::default();
    builder.push_record([variable.to_string(), header.to_string()]);
    for (x, y) in samples.iter().zip(values.iter()) {
        builder.push_record([x.to_string(), y.to_string()]);
    }
    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.to_string()
}

fn run(args: Vec<String>) -> Result<(), String> {
    let mut args = args;
    let config = match args.iter().position(|arg| arg == "--config") {
        Some(i) => {
            let path = args
                .get(i + 1)
                .cloned()
                .ok_or_else(|| "--config needs a file name".to_string())?;
            args.drain(i..i + 2);
            CalcConfig::from_file(&path).map_err(|e| e.to_string())?
        }
        None => CalcConfig::default(),
    };
    init_logger(&config);
    info!("config: {:?}", config);

    let (command, expr, rest) = match args.as_slice() {
        [command, expr, rest @ ..] => (command.as_str(), expr.as_str(), rest),
        _ => return Err(usage()),
    };
    let variable = config.variable.as_str();
    match command {
        "eval" => {
            let samples = samples_from(rest)?;
            match evaluate_with(expr, &samples, &config) {
                Ok(values) => println!("{}", values_table(variable, expr, &samples, &values)),
                Err(_) => println!("{}", ERROR_MARKER),
            }
        }
        "diff" => {
            let samples = samples_from(rest)?;
            match differentiate_with(expr, &samples, &config) {
                Ok(derivative) => {
                    let header = format!("d/d{}", variable);
                    println!("{}", values_table(variable, &header, &samples, &derivative.values));
                    println!("d/d{} {} = {}", variable, expr, derivative.display);
                }
                Err(_) => println!("{}", ERROR_MARKER),
            }
        }
        "int" => {
            let (lower, upper) = bounds_from(rest)?;
            match integrate_with(expr, lower, upper, &config) {
                Ok(integral) => {
                    let mut builder = Builder::default();
                    builder.push_record(["antiderivative", "lower", "upper", "value"]);
                    builder.push_record([
                        integral.display.clone(),
                        lower.to_string(),
                        upper.to_string(),
                        integral.value.to_string(),
                    ]);
                    let mut table = builder.build();
                    table.with(Style::modern_rounded());
                    println!("{}", table);
                }
                Err(_) => println!("{}", ERROR_MARKER),
            }
        }
        _ => return Err(usage()),
    }
    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}
