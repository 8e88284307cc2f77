//! Process exit codes, a subset of BSD `sysexits.h`.

pub const OK: i32 = 0;

/// Bad arguments, or `init` over an existing file without `--force`
pub const USAGE: i32 = 64;

/// Rejected input: blank fields, cycles, duplicate ids, malformed data file
pub const DATAERR: i32 = 65;

/// Referenced branch or parent id does not exist
pub const NOINPUT: i32 = 66;

/// Reading or writing the data file failed
pub const IOERR: i32 = 74;

/// Unreadable config file or bad `SANKALP_*` value
pub const CONFIG: i32 = 78;
