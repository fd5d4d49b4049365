//! Unique-value statistics over flattened lines.

use std::collections::HashSet;
use std::fmt;

use turtle_flatten::FlatLine;

use crate::export::CSV_HEADER;

/// Unique-value count of one output column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnStats {
    pub column: &'static str,
    pub unique: usize,
}

impl ColumnStats {
    /// Bits needed to give every unique value its own code.
    pub fn bits_required(&self) -> u32 {
        if self.unique > 1 {
            usize::BITS - (self.unique - 1).leading_zeros()
        } else {
            1
        }
    }
}

/// Per-column statistics, in CSV column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueStats {
    pub lines: usize,
    pub columns: Vec<ColumnStats>,
}

impl UniqueStats {
    pub fn collect(lines: &[FlatLine]) -> Self {
        let mut seen: [HashSet<String>; 4] = Default::default();
        for line in lines {
            seen[0].insert(line.subject.clone());
            seen[1].insert(line.predicate_path());
            seen[2].insert(line.index_path());
            seen[3].insert(line.object.clone());
        }

        let columns = CSV_HEADER
            .into_iter()
            .zip(&seen)
            .map(|(column, values)| ColumnStats {
                column,
                unique: values.len(),
            })
            .collect();
        Self {
            lines: lines.len(),
            columns,
        }
    }
}

impl fmt::Display for UniqueStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<10} {:>12} {:>5}", "Column", "Unique", "Bits")?;
        for stats in &self.columns {
            writeln!(
                f,
                "{:<10} {:>12} {:>5}",
                stats.column,
                stats.unique,
                stats.bits_required()
            )?;
        }
        write!(f, "{} lines", self.lines)
    }
}
