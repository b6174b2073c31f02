pub mod precompute;
pub mod structs;

pub use precompute::build_magic_tables;
pub use structs::{BishopMagicTables, MagicEntry, MagicTables, RookMagicTables};

use once_cell::sync::OnceCell;

/// Process-wide magic tables, built on first use from the fixed constants.
/// Read-only afterwards; freely aliased across readers.
pub fn tables() -> &'static MagicTables {
    static TABLES: OnceCell<MagicTables> = OnceCell::new();
    TABLES.get_or_init(build_magic_tables)
}
