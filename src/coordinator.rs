use crate::image::Image;
use crate::mandelbrot::{self, FractalConfig};
use crate::mpi_utils::*;
use crate::partition;
use mpi::traits::*;

/// Cursor over the unassigned rows plus the number of workers still active.
/// Pure bookkeeping, no I/O: every row index is handed out exactly once, the
/// cursor never rewinds, and the active count only decreases.
#[derive(Debug)]
pub struct WorkQueue {
    next_row: usize,
    total_rows: usize,
    active_workers: usize,
}

impl WorkQueue {
    pub fn new(total_rows: usize, worker_count: usize) -> Self {
        WorkQueue {
            next_row: 0,
            total_rows,
            active_workers: worker_count,
        }
    }

    /// Next unassigned row, or `None` once the cursor is exhausted.
    pub fn next_task(&mut self) -> Option<usize> {
        if self.next_row < self.total_rows {
            let row = self.next_row;
            self.next_row += 1;
            Some(row)
        } else {
            None
        }
    }

    /// Mark one worker as terminated.
    pub fn retire_worker(&mut self) {
        self.active_workers = self.active_workers.saturating_sub(1);
    }

    pub fn active_workers(&self) -> usize {
        self.active_workers
    }

    /// True once every worker has been retired; at that point every row has
    /// been assigned and returned.
    pub fn is_done(&self) -> bool {
        self.active_workers == 0
    }
}

/// Rank 0: owns the image, runs the scheduling strategy, reports timing.
pub struct Coordinator<C: Communicator> {
    world: C,
    worker_count: usize,
}

impl<C: Communicator> Coordinator<C> {
    /// Create a new coordinator
    pub fn new(world: C) -> Self {
        let size = world.size() as usize;
        let worker_count = if size > 1 { size - 1 } else { 0 };
        Coordinator {
            world,
            worker_count,
        }
    }

    /// Get the number of workers
    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Static scheduling: compute this rank's own row block, then gather
    /// every rank's block into the image at offsets recomputed from the same
    /// partition formula the other ranks used. No sizes are exchanged.
    pub fn run_static(&self, config: &FractalConfig) -> Result<Image, String> {
        let size = self.world.size() as usize;
        let range = partition::row_range(0, size, config.height);

        println!(
            "[Coordinator] Static mode: {} processes, computing rows [{}, {}) locally",
            size,
            range.start,
            range.end()
        );

        let t0 = mpi::time();
        let local = mandelbrot::compute_rows(config, range.start, range.count);
        let elapsed = mpi::time() - t0;

        let mut image = Image::new(config.width, config.height);
        let counts = partition::gather_counts(size, config.height, config.width);
        let displs = partition::gather_displs(&counts);
        gather_rows_into_root(&self.world, &local, &mut image.data, &counts, &displs)?;

        let max_seconds = reduce_max_time_root(&self.world, elapsed)?;
        println!(
            "[Coordinator] Static scheduling: max compute time = {:.6} s",
            max_seconds
        );

        Ok(image)
    }

    /// Dynamic scheduling: prime every worker with one row, then service
    /// results first-come-first-served, handing the replying worker its next
    /// row or a termination message until all workers are retired. Faster
    /// workers ask more often and therefore receive more rows.
    pub fn run_dynamic(&self, config: &FractalConfig) -> Result<Image, String> {
        if self.worker_count == 0 {
            return Err(format!(
                "Dynamic mode needs at least 2 processes (1 coordinator + 1 worker), current size: {}",
                self.world.size()
            ));
        }

        println!(
            "[Coordinator] Dynamic mode: dispatching {} rows to {} workers",
            config.height, self.worker_count
        );

        let mut image = Image::new(config.width, config.height);
        let mut queue = WorkQueue::new(config.height, self.worker_count);

        let t0 = mpi::time();

        // Priming: one row per worker. Workers that cannot be primed because
        // the rows ran out first are terminated immediately.
        for worker in 1..self.world.size() {
            match queue.next_task() {
                Some(row) => send_task(&self.world, worker, row)?,
                None => {
                    send_done(&self.world, worker)?;
                    queue.retire_worker();
                }
            }
        }

        // Servicing: record whichever result arrives first, then hand that
        // worker its next row or retire it.
        while !queue.is_done() {
            let (source, row, payload) = receive_row_result(&self.world, config.width)?;

            if row < 0 || image.set_row(row as usize, &payload).is_err() {
                // Unreachable under correct dispatch; discard rather than
                // corrupt a neighbouring row.
                eprintln!(
                    "[Coordinator] Discarding result from worker {}: row {} out of range",
                    source, row
                );
            }

            match queue.next_task() {
                Some(next) => send_task(&self.world, source, next)?,
                None => {
                    send_done(&self.world, source)?;
                    queue.retire_worker();
                }
            }
        }

        let elapsed = mpi::time() - t0;
        let max_seconds = reduce_max_time_root(&self.world, elapsed)?;
        println!(
            "[Coordinator] Dynamic scheduling: max compute time = {:.6} s",
            max_seconds
        );

        Ok(image)
    }
}
