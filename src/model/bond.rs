use super::atom::AtomKey;

/// Donor/acceptor pair read from one line of a bond report.
///
/// Records are transient: the pipeline resolves both atoms against the structure index and
/// reduces the pair to a single distance right away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BondRecord {
    pub donor: AtomKey,
    pub acceptor: AtomKey,
    /// 1-based line number in the report the record came from.
    pub line_number: usize,
}
