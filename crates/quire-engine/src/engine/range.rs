//! Inclusive rectangular cell ranges.

use super::cell_ref::CellRef;

/// An inclusive rectangle between two corners, as written in `SUM(A1:B5)`.
///
/// Corners are stored as written; [`CellRange::normalized`] orders them per
/// axis, so `B3:A1` covers the same cells as `A1:B3`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRange {
    pub start: CellRef,
    pub end: CellRef,
}

impl CellRange {
    pub fn new(start: CellRef, end: CellRef) -> CellRange {
        CellRange { start, end }
    }

    /// Return the range with `start` as the top-left and `end` as the bottom-right corner.
    pub fn normalized(&self) -> CellRange {
        CellRange {
            start: CellRef::new(
                self.start.col.min(self.end.col),
                self.start.row.min(self.end.row),
            ),
            end: CellRef::new(
                self.start.col.max(self.end.col),
                self.start.row.max(self.end.row),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reversed_range_normalizes_per_axis() {
        let forward = CellRange::new(CellRef::new(0, 0), CellRef::new(1, 2));
        let reversed = CellRange::new(CellRef::new(1, 2), CellRef::new(0, 0));
        assert_eq!(forward.normalized(), reversed.normalized());
        assert_eq!(reversed.normalized(), forward);
    }

    #[test]
    fn test_mixed_corners_normalize() {
        // B1:A3 has the higher column first but the lower row first.
        let range = CellRange::new(CellRef::new(1, 0), CellRef::new(0, 2));
        let n = range.normalized();
        assert_eq!(n.start, CellRef::new(0, 0));
        assert_eq!(n.end, CellRef::new(1, 2));
    }

    #[test]
    fn test_normalize_extreme_rows_does_not_overflow() {
        let range = CellRange::new(CellRef::new(0, usize::MAX), CellRef::new(0, 0));
        assert_eq!(range.normalized().end.row, usize::MAX);
    }
}
