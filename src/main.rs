use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use hashtape::config::MachineConfig;
use hashtape::console::{Console, Stream};
use hashtape::error::{Fault, Result};
use hashtape::machine::Machine;
use hashtape::metrics::RunStats;
use hashtape::opcode::disassemble;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Exit status for every fault and every rejected command line.
const FAILURE: u8 = 1;

#[derive(Parser)]
#[command(
    name = "hashtape",
    about = "Tape machine whose instructions are rewritten by a hash chain as they run"
)]
struct Cli {
    /// Program image to load onto the tape.
    program: PathBuf,

    /// Stop with an error after this many steps.
    #[arg(long)]
    max_steps: Option<u64>,

    /// Print run statistics to stderr when the machine stops.
    #[arg(long)]
    stats: bool,

    /// Print a static listing of the program instead of running it.
    #[arg(long)]
    disassemble: bool,
}

/// Logs go to stderr; stdout belongs to the program. `RUST_LOG` overrides
/// the default `warn` filter.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Status for a command line clap rejected. `None` for `--help` and
/// `--version`, which clap prints and exits 0 on its own.
fn usage_status(err: &clap::Error) -> Option<u8> {
    err.use_stderr().then_some(FAILURE)
}

fn run_status(result: &Result<()>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(_) => FAILURE,
    }
}

fn load_program(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|source| Fault::FileNotFound {
        path: path.to_path_buf(),
        source,
    })
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match usage_status(&e) {
            Some(status) => {
                let _ = e.print();
                return ExitCode::from(status);
            }
            None => e.exit(),
        },
    };
    init_logging();

    let mut console = Stream::stdio();
    let result = run(&cli, &mut console);
    if let Err(fault) = &result {
        eprintln!("{fault}");
    }
    ExitCode::from(run_status(&result))
}

fn run<C: Console>(cli: &Cli, console: &mut C) -> Result<()> {
    let program = load_program(&cli.program)?;

    if cli.disassemble {
        print!("{}", disassemble(&program));
        return Ok(());
    }

    let config = MachineConfig {
        step_limit: cli.max_steps,
        ..Default::default()
    };
    for &b in format!("Maximum tape size is: {}\n", config.tape_limit).as_bytes() {
        console.emit_byte(b)?;
    }
    let mut machine = Machine::new(&program, config);

    let result = machine.run(console);
    // Output produced before a fault still belongs on stdout.
    if let Err(e) = console.flush() {
        warn!("failed to flush stdout: {e}");
    }

    if cli.stats {
        eprintln!("{}", RunStats::collect(&machine));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    /// Writes a program to a fresh file under the system temp dir.
    fn program_file(name: &str, bytes: &[u8]) -> PathBuf {
        let path = std::env::temp_dir().join(format!("hashtape-{}-{name}", std::process::id()));
        std::fs::write(&path, bytes).unwrap();
        path
    }

    fn run_file(path: PathBuf) -> (Result<()>, String) {
        let cli = Cli::try_parse_from([Path::new("hashtape"), path.as_path()]).unwrap();
        let mut console = Stream::new(&b""[..], Vec::new());
        let result = run(&cli, &mut console);
        (result, String::from_utf8(console.into_output()).unwrap())
    }

    #[test]
    fn test_missing_argument_exits_one() {
        let err = Cli::try_parse_from(["hashtape"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert_eq!(usage_status(&err), Some(FAILURE));
    }

    #[test]
    fn test_unknown_flag_exits_one() {
        let err = Cli::try_parse_from(["hashtape", "prog", "--bogus"]).err().unwrap();
        assert_eq!(usage_status(&err), Some(FAILURE));
    }

    #[test]
    fn test_help_left_to_clap() {
        let err = Cli::try_parse_from(["hashtape", "--help"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        assert_eq!(usage_status(&err), None);
        assert_eq!(err.exit_code(), 0);
    }

    #[test]
    fn test_flags_parse() {
        let cli = Cli::try_parse_from(["hashtape", "prog", "--max-steps", "9", "--stats"]).unwrap();
        assert_eq!(cli.program, PathBuf::from("prog"));
        assert_eq!(cli.max_steps, Some(9));
        assert!(cli.stats);
        assert!(!cli.disassemble);
    }

    #[test]
    fn test_missing_file_exits_one() {
        let path = std::env::temp_dir().join("hashtape-does-not-exist.ht");
        let (result, out) = run_file(path);
        assert!(matches!(result, Err(Fault::FileNotFound { .. })));
        assert_eq!(run_status(&result), FAILURE);
        assert_eq!(out, "");
    }

    #[test]
    fn test_halt_exits_zero() {
        let path = program_file("halt.ht", b"wimpmodeH");
        let (result, out) = run_file(path.clone());
        let _ = std::fs::remove_file(path);
        assert_eq!(run_status(&result), 0);
        assert_eq!(out, "Maximum tape size is: 30000\nEXPORT GRADE ENABLED!\n\n");
    }

    #[test]
    fn test_oversized_jump_exits_one() {
        let path = program_file(
            "jump.ht",
            b"wimpmodeJab+111101000010010000000000000000000000000000000*b-1*",
        );
        let (result, out) = run_file(path.clone());
        let _ = std::fs::remove_file(path);
        assert!(matches!(result, Err(Fault::JumpOffsetTooLarge { .. })));
        assert_eq!(run_status(&result), FAILURE);
        assert!(out.starts_with("Maximum tape size is: 30000\n"));
    }
}
