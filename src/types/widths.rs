// Data widths, in bytes, for the x86_64 target

pub const INT_WIDTH: usize = 4;
pub const LONG_WIDTH: usize = 8;
pub const SHORT_WIDTH: usize = 2;

pub const BOOL_WIDTH: usize = 1;
pub const CHAR_WIDTH: usize = 1;

/// Pointers, references and strings
pub const PTR_WIDTH: usize = 8;

pub const FLOAT_WIDTH: usize = 4;
pub const DOUBLE_WIDTH: usize = 8;

/// Requested by `short float`; not supported, so such floats use [`FLOAT_WIDTH`]
pub const HALF_WIDTH: usize = 2;
