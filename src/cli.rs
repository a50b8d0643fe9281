use std::path::PathBuf;

use crate::config::{BaudRate, Direction};
use crate::{Error, Result};

/// Parsed invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(TransferOptions),
    ShowHelp,
    ShowVersion,
}

/// Everything one transfer needs, exactly as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOptions {
    pub direction: Direction,
    pub device: String,
    pub baud: BaudRate,
    pub file: PathBuf,
    pub byte_count: u64,
    pub max_stalls: Option<u32>,
}

impl Command {
    /// Parse the argument list (without the program name).
    ///
    /// `-h`/`--help` and `-V`/`--version` win as soon as they appear and
    /// flags may sit anywhere among the positionals. The trailing byteCount
    /// may be omitted, which is the same as passing 0.
    pub fn parse(args: &[String]) -> Result<Command> {
        let mut positionals: Vec<&String> = Vec::new();
        let mut max_stalls = None;

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "-h" | "--help" => return Ok(Command::ShowHelp),
                "-V" | "--version" => return Ok(Command::ShowVersion),
                "--max-stalls" => {
                    let raw = take_value(arg, &mut iter)?;
                    max_stalls = Some(raw.parse().map_err(|_| {
                        Error::InvalidArgs(format!(
                            "invalid --max-stalls '{raw}', expected a positive integer"
                        ))
                    })?);
                }
                other if other.starts_with('-') && other.len() > 1 => {
                    return Err(Error::InvalidArgs(format!(
                        "unknown flag '{other}', try --help"
                    )));
                }
                _ => positionals.push(arg),
            }
        }

        if positionals.len() < 4 || positionals.len() > 5 {
            return Err(Error::InvalidArgs("wrong number of arguments".to_string()));
        }

        let direction: Direction = positionals[0].parse().map_err(Error::InvalidArgs)?;
        let baud: BaudRate = positionals[2].parse().map_err(Error::InvalidArgs)?;
        let byte_count: u64 = match positionals.get(4) {
            Some(raw) => raw.parse().map_err(|_| {
                Error::InvalidArgs(format!(
                    "invalid byteCount '{raw}', expected a non-negative integer"
                ))
            })?,
            None => 0,
        };

        Ok(Command::Run(TransferOptions {
            direction,
            device: positionals[1].clone(),
            baud,
            file: PathBuf::from(positionals[3]),
            byte_count,
            max_stalls,
        }))
    }

    pub fn help() -> String {
        let bauds = BaudRate::SUPPORTED.map(|b| b.to_string()).join(", ");
        format!(
            "ttypump - UART byte transfer exerciser\n\
             \n\
             USAGE:\n\
             \x20 ttypump <send|receive> <port> <baudrate> <file> [byteCount]\n\
             \x20 ttypump --help\n\
             \x20 ttypump --version\n\
             \n\
             ARGS:\n\
             \x20 <send|receive>  Push file bytes out the port, or pull port bytes into the file\n\
             \x20 <port>          Serial device path (e.g. /dev/ttyUSB0)\n\
             \x20 <baudrate>      One of: {bauds}\n\
             \x20 <file>          Binary file to read (send) or create (receive)\n\
             \x20 [byteCount]     Bytes to move; omitted or 0 with send means the whole file\n\
             \n\
             OPTIONS:\n\
             \x20 --max-stalls <number>  Give up after this many consecutive zero-progress retries\n\
             \x20 -h, --help      Show this help\n\
             \x20 -V, --version   Show version\n"
        )
    }

    pub fn print_help() {
        println!("{}", Self::help());
    }
}

fn take_value(flag: &str, iter: &mut std::slice::Iter<String>) -> Result<String> {
    iter.next()
        .cloned()
        .ok_or_else(|| Error::InvalidArgs(format!("expected a value after {flag}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_full_send_invocation() {
        let cmd =
            Command::parse(&args(&["send", "/dev/ttyUSB0", "115200", "firmware.bin", "4096"]))
                .unwrap();
        let expected = TransferOptions {
            direction: Direction::Send,
            device: "/dev/ttyUSB0".to_string(),
            baud: BaudRate::B115200,
            file: PathBuf::from("firmware.bin"),
            byte_count: 4096,
            max_stalls: None,
        };
        assert_eq!(cmd, Command::Run(expected));
    }

    #[test]
    fn flags_may_sit_anywhere_among_positionals() {
        let cmd = Command::parse(&args(&[
            "receive",
            "--max-stalls",
            "50",
            "/dev/ttyS1",
            "9600",
            "dump.bin",
            "512",
        ]))
        .unwrap();
        match cmd {
            Command::Run(opts) => {
                assert_eq!(opts.direction, Direction::Receive);
                assert_eq!(opts.max_stalls, Some(50));
                assert_eq!(opts.byte_count, 512);
            }
            other => panic!("expected a run command, got {other:?}"),
        }
    }

    #[test]
    fn help_and_version_win_over_everything_else() {
        assert_eq!(
            Command::parse(&args(&["send", "-h"])).unwrap(),
            Command::ShowHelp
        );
        assert_eq!(
            Command::parse(&args(&["--version"])).unwrap(),
            Command::ShowVersion
        );
    }

    #[test]
    fn omitted_byte_count_means_zero() {
        let cmd = Command::parse(&args(&["send", "/dev/ttyS0", "9600", "f.bin"])).unwrap();
        match cmd {
            Command::Run(opts) => assert_eq!(opts.byte_count, 0),
            other => panic!("expected a run command, got {other:?}"),
        }
    }

    #[test]
    fn wrong_arity_is_a_usage_error() {
        for list in [
            &[][..],
            &["send"][..],
            &["send", "/dev/ttyS0", "9600"][..],
            &["send", "/dev/ttyS0", "9600", "f.bin", "10", "extra"][..],
        ] {
            let err = Command::parse(&args(list)).unwrap_err();
            assert!(err.is_usage(), "args {list:?} should be a usage error");
            assert!(format!("{err}").contains("wrong number of arguments"));
        }
    }

    #[test]
    fn bad_values_name_the_offending_argument() {
        let err = Command::parse(&args(&["up", "/dev/ttyS0", "9600", "f.bin", "10"])).unwrap_err();
        assert!(format!("{err}").contains("invalid direction 'up'"));

        let err =
            Command::parse(&args(&["send", "/dev/ttyS0", "300", "f.bin", "10"])).unwrap_err();
        assert!(format!("{err}").contains("unsupported baudrate '300'"));

        let err =
            Command::parse(&args(&["send", "/dev/ttyS0", "9600", "f.bin", "ten"])).unwrap_err();
        assert!(format!("{err}").contains("invalid byteCount 'ten'"));

        let err = Command::parse(&args(&[
            "send", "/dev/ttyS0", "9600", "f.bin", "10", "--max-stalls",
        ]))
        .unwrap_err();
        assert!(format!("{err}").contains("expected a value after --max-stalls"));
    }

    #[test]
    fn unknown_flags_are_rejected() {
        let err = Command::parse(&args(&["--nope"])).unwrap_err();
        assert!(format!("{err}").contains("unknown flag '--nope'"));
    }

    #[test]
    fn help_text_lists_the_supported_bauds() {
        let help = Command::help();
        for baud in BaudRate::SUPPORTED {
            assert!(help.contains(&baud.to_string()), "missing {baud} in help");
        }
    }
}
