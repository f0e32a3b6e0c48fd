/// Database layer for Atlas
///
/// The directory schema is owned externally (tables are created and migrated
/// outside this application), so this module only provides connection pooling.
/// Expected table layouts are documented on each model in `crate::models`.

pub mod pool;
