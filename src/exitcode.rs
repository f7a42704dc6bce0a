//! Standard exit codes (BSD sysexits.h compatible)

/// Successful termination
pub const OK: i32 = 0;

/// Command line usage error
pub const USAGE: i32 = 64;

/// Data format error (bad script line, duplicate name)
pub const DATAERR: i32 = 65;

/// Cannot open input (also: referenced family, member or spouse missing)
pub const NOINPUT: i32 = 66;

/// Internal software error
pub const SOFTWARE: i32 = 70;

/// Input/output error
pub const IOERR: i32 = 74;

/// Configuration error
pub const CONFIG: i32 = 78;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_codes_then_values_match_sysexits() {
        assert_eq!(USAGE, 64);
        assert_eq!(DATAERR, 65);
        assert_eq!(NOINPUT, 66);
        assert_eq!(SOFTWARE, 70);
        assert_eq!(IOERR, 74);
        assert_eq!(CONFIG, 78);
    }
}
