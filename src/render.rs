/// Printable registration document
pub mod print;

/// CSV export for the administration console
pub mod csv;
