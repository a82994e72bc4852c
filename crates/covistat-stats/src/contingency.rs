/// A 2×2 contingency table of case counts.
///
/// Rows split the cases by whether they match the selected dependent value,
/// columns by whether they match the selected independent value:
///
/// ```text
///                    indep matches   indep does not
/// dep matches        [0][0]          [0][1]
/// dep does not       [1][0]          [1][1]
/// ```
///
/// # Examples
///
/// ```
/// use covistat_stats::contingency::ContingencyTable;
///
/// let table = ContingencyTable::new([[10, 5], [8, 12]]);
/// assert_eq!(table.total(), 35);
/// assert_eq!(table.row_totals(), [15, 20]);
/// assert_eq!(table.column_totals(), [18, 17]);
/// assert!(!table.has_zero_cell());
/// ```
///
/// The grand total of a table always fits in a `u64`, so its row, column and
/// grand totals never overflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ContingencyTable {
    cells: [[u64; 2]; 2],
}

impl ContingencyTable {
    /// Creates a table from its cells, indexed as `cells[row][column]`.
    ///
    /// # Panics
    ///
    /// Panics if the sum of the cells exceeds `u64::MAX`.
    #[must_use]
    pub const fn new(cells: [[u64; 2]; 2]) -> Self {
        match Self::try_new(cells) {
            Some(table) => table,
            None => panic!("contingency table total exceeds u64::MAX"),
        }
    }

    /// Creates a table from its cells, or `None` if their sum exceeds `u64::MAX`.
    #[must_use]
    pub const fn try_new(cells: [[u64; 2]; 2]) -> Option<Self> {
        let Some(top) = cells[0][0].checked_add(cells[0][1]) else {
            return None;
        };
        let Some(bottom) = cells[1][0].checked_add(cells[1][1]) else {
            return None;
        };
        if top.checked_add(bottom).is_none() {
            return None;
        }
        Some(Self { cells })
    }

    #[must_use]
    pub const fn cells(&self) -> [[u64; 2]; 2] {
        self.cells
    }

    /// Count of cases matching both the dependent and the independent value.
    #[must_use]
    pub const fn both_match(&self) -> u64 {
        self.cells[0][0]
    }

    /// Count of cases matching the dependent value but not the independent value.
    #[must_use]
    pub const fn dependent_only(&self) -> u64 {
        self.cells[0][1]
    }

    /// Count of cases matching the independent value but not the dependent value.
    #[must_use]
    pub const fn independent_only(&self) -> u64 {
        self.cells[1][0]
    }

    /// Count of cases matching neither value.
    #[must_use]
    pub const fn neither(&self) -> u64 {
        self.cells[1][1]
    }

    /// Adds `count` cases to the cell selected by the two match flags.
    ///
    /// Returns `None` if the grand total would overflow.
    #[must_use]
    pub fn checked_add(
        self,
        dependent_matches: bool,
        independent_matches: bool,
        count: u64,
    ) -> Option<Self> {
        let row = usize::from(!dependent_matches);
        let column = usize::from(!independent_matches);
        let mut cells = self.cells;
        cells[row][column] = cells[row][column].checked_add(count)?;
        Self::try_new(cells)
    }

    #[must_use]
    pub fn row_totals(&self) -> [u64; 2] {
        self.cells.map(|row| row[0] + row[1])
    }

    #[must_use]
    pub fn column_totals(&self) -> [u64; 2] {
        [
            self.cells[0][0] + self.cells[1][0],
            self.cells[0][1] + self.cells[1][1],
        ]
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.cells.iter().flatten().sum()
    }

    /// Returns `true` if any of the four cells is zero.
    #[must_use]
    pub fn has_zero_cell(&self) -> bool {
        self.cells.iter().flatten().any(|&cell| cell == 0)
    }

    /// Expected cell frequencies under independence of rows and columns.
    ///
    /// All expectations are zero for an empty table.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn expected(&self) -> [[f64; 2]; 2] {
        let total = self.total();
        if total == 0 {
            return [[0.0; 2]; 2];
        }
        let total = total as f64;
        let rows = self.row_totals();
        let columns = self.column_totals();
        [0, 1].map(|r| [0, 1].map(|c| rows[r] as f64 * columns[c] as f64 / total))
    }
}
