//! ID prefixes. IDs have the shape `{prefix}-{8 hex chars}`, e.g. `cnt-a3f8b2c1`.

pub const PREFIX_USER: &str = "usr";
pub const PREFIX_CONTENT: &str = "cnt";
pub const PREFIX_MATCH: &str = "mtc";

pub const ALL_PREFIXES: &[&str] = &[PREFIX_USER, PREFIX_CONTENT, PREFIX_MATCH];
