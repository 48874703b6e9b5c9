//! Argument parsing shared by every binary.

use std::ffi::OsString;
use std::process;

use clap::error::ErrorKind;
use clap::Parser;

/// A parse that ends the program before the command runs.
#[derive(Debug)]
pub struct UsageExit {
    /// Process exit code: 0 for `--help`/`--version`, 1 otherwise.
    pub code: i32,
    /// Rendered message, including the usage line.
    pub text: String,
}

/// Parse `args` (program name first) into `C`.
pub fn try_args_from<C, I, T>(args: I) -> Result<C, UsageExit>
where
    C: Parser,
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    C::try_parse_from(args).map_err(|e| {
        let code = match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
            _ => 1,
        };
        UsageExit {
            code,
            text: e.render().to_string(),
        }
    })
}

/// Parse the process arguments, printing usage to stdout and exiting on
/// mismatch.
pub fn parse_args<C: Parser>() -> C {
    match try_args_from(std::env::args_os()) {
        Ok(cli) => cli,
        Err(exit) => {
            print!("{}", exit.text);
            process::exit(exit.code);
        }
    }
}

/// Value parser for a strictly positive count.
pub fn positive(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) | Err(_) => Err(format!("`{s}` must be a positive integer")),
        Ok(v) => Ok(v),
    }
}

/// Value parser for a probability in `[0.0, 1.0]`.
pub fn probability(s: &str) -> Result<f64, String> {
    let p: f64 = s
        .parse()
        .map_err(|_| format!("`{s}` is not a number"))?;
    if (0.0..=1.0).contains(&p) {
        Ok(p)
    } else {
        Err(format!("{p} must be in the range [0.0, 1.0]"))
    }
}
