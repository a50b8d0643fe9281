use std::fmt;
use std::str::FromStr;

/// Which way bytes move, fixed for the lifetime of a run.
///
/// Decides both the loop that runs and how the file is opened: read-only for
/// send, write/create-truncate for receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Send,
    Receive,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Send => "send",
            Direction::Receive => "receive",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    /// Dispatch on the first character: `s...` sends, `r...` receives.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.bytes().next() {
            Some(b's') => Ok(Direction::Send),
            Some(b'r') => Ok(Direction::Receive),
            _ => Err(format!("invalid direction '{s}', expected send|receive")),
        }
    }
}

/// A baud rate from the fixed supported set.
///
/// Anything outside the set is rejected at parse time, before any device or
/// file is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaudRate {
    B1200,
    B2400,
    B4800,
    B9600,
    B19200,
    B38400,
    B57600,
    B115200,
}

impl BaudRate {
    /// The supported rates, in ascending order, as shown in the usage text.
    pub const SUPPORTED: [u32; 8] = [1200, 2400, 4800, 9600, 19200, 38400, 57600, 115200];

    pub fn as_u32(&self) -> u32 {
        match self {
            BaudRate::B1200 => 1200,
            BaudRate::B2400 => 2400,
            BaudRate::B4800 => 4800,
            BaudRate::B9600 => 9600,
            BaudRate::B19200 => 19200,
            BaudRate::B38400 => 38400,
            BaudRate::B57600 => 57600,
            BaudRate::B115200 => 115200,
        }
    }

    pub fn all() -> [BaudRate; 8] {
        [
            BaudRate::B1200,
            BaudRate::B2400,
            BaudRate::B4800,
            BaudRate::B9600,
            BaudRate::B19200,
            BaudRate::B38400,
            BaudRate::B57600,
            BaudRate::B115200,
        ]
    }
}

impl fmt::Display for BaudRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u32())
    }
}

impl FromStr for BaudRate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rate: u32 = s
            .parse()
            .map_err(|_| format!("unsupported baudrate '{s}'"))?;
        match rate {
            1200 => Ok(BaudRate::B1200),
            2400 => Ok(BaudRate::B2400),
            4800 => Ok(BaudRate::B4800),
            9600 => Ok(BaudRate::B9600),
            19200 => Ok(BaudRate::B19200),
            38400 => Ok(BaudRate::B38400),
            57600 => Ok(BaudRate::B57600),
            115200 => Ok(BaudRate::B115200),
            other => Err(format!("unsupported baudrate '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_dispatches_on_first_character() {
        assert_eq!("send".parse::<Direction>().unwrap(), Direction::Send);
        assert_eq!("s".parse::<Direction>().unwrap(), Direction::Send);
        assert_eq!("receive".parse::<Direction>().unwrap(), Direction::Receive);
        assert_eq!("rx".parse::<Direction>().unwrap(), Direction::Receive);
    }

    #[test]
    fn direction_rejects_other_tokens() {
        let err = "x".parse::<Direction>().unwrap_err();
        assert!(err.contains("invalid direction"));
        assert!("".parse::<Direction>().is_err());
        // Uppercase is not accepted, matching the strict lowercase dispatch.
        assert!("Send".parse::<Direction>().is_err());
    }

    #[test]
    fn baud_round_trips_the_supported_set() {
        for rate in BaudRate::SUPPORTED {
            let parsed = rate.to_string().parse::<BaudRate>().unwrap();
            assert_eq!(parsed.as_u32(), rate);
        }
        assert_eq!(BaudRate::all().len(), BaudRate::SUPPORTED.len());
    }

    #[test]
    fn baud_rejects_values_outside_the_set() {
        for raw in ["300", "600", "230400", "0", "garbage", "-9600"] {
            let err = raw.parse::<BaudRate>().unwrap_err();
            assert!(err.contains("unsupported baudrate"), "got: {err}");
        }
    }
}
