use mpi::Count;

/// Contiguous block of rows owned by one rank in static mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    pub start: usize,
    pub count: usize,
}

impl RowRange {
    pub fn end(&self) -> usize {
        self.start + self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Static partition: rows are split into blocks of `ceil(total_rows /
/// process_count)` and rank `r` owns rows `[r * block, min((r + 1) * block,
/// total_rows))`. Every rank derives the same ranges from the same public
/// inputs, so the blocks are disjoint, cover every row, and no sizes ever
/// need to be exchanged at runtime. Ranks past the end own zero rows.
pub fn row_range(identity: usize, process_count: usize, total_rows: usize) -> RowRange {
    if process_count == 0 {
        return RowRange { start: 0, count: 0 };
    }
    let block = (total_rows + process_count - 1) / process_count;
    let start = identity * block;
    if start >= total_rows {
        return RowRange {
            start: total_rows,
            count: 0,
        };
    }
    let end = (start + block).min(total_rows);
    RowRange {
        start,
        count: end - start,
    }
}

/// Per-rank element counts for the gather into the root image buffer:
/// `row count * width` for each rank, zero for ranks with no rows.
pub fn gather_counts(process_count: usize, total_rows: usize, width: usize) -> Vec<Count> {
    (0..process_count)
        .map(|identity| (row_range(identity, process_count, total_rows).count * width) as Count)
        .collect()
}

/// Element displacements matching `gather_counts`: exclusive prefix sums, so
/// each rank's block lands at `start_row * width` in the image buffer.
pub fn gather_displs(counts: &[Count]) -> Vec<Count> {
    let mut displs = Vec::with_capacity(counts.len());
    let mut offset: Count = 0;
    for &count in counts {
        displs.push(offset);
        offset += count;
    }
    displs
}
