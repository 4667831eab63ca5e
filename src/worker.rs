use crate::mandelbrot::{self, FractalConfig};
use crate::mpi_utils::*;
use crate::partition;
use mpi::traits::*;

/// Any rank other than 0: computes rows and ships them to the coordinator.
pub struct Worker<C: Communicator> {
    rank: i32,
    world: C,
}

impl<C: Communicator> Worker<C> {
    /// Create a new worker
    pub fn new(world: C) -> Self {
        let rank = world.rank();
        Worker { rank, world }
    }

    /// Get the worker's rank
    pub fn rank(&self) -> i32 {
        self.rank
    }

    /// Static scheduling: derive this rank's row block from the shared
    /// partition formula, compute it, and contribute it to the gather on
    /// rank 0. A rank with no rows still contributes an empty block.
    pub fn run_static(&self, config: &FractalConfig) -> Result<(), String> {
        let size = self.world.size() as usize;
        let range = partition::row_range(self.rank as usize, size, config.height);

        println!(
            "[Worker {}] Static mode: computing rows [{}, {})",
            self.rank,
            range.start,
            range.end()
        );

        let t0 = mpi::time();
        let local = mandelbrot::compute_rows(config, range.start, range.count);
        let elapsed = mpi::time() - t0;

        gather_rows_into(&self.world, 0, &local)?;
        reduce_max_time(&self.world, 0, elapsed)?;

        println!(
            "[Worker {}] Static mode complete ({} rows)",
            self.rank, range.count
        );
        Ok(())
    }

    /// Dynamic scheduling: request-reply loop against the coordinator, one
    /// row in flight at a time, until the termination message arrives.
    pub fn run_dynamic(&self, config: &FractalConfig) -> Result<(), String> {
        println!("[Worker {}] Waiting for row assignments...", self.rank);

        let t0 = mpi::time();
        let mut rows_computed = 0usize;
        while let Some(row) = receive_assignment(&self.world, 0)? {
            let payload = mandelbrot::compute_row(config, row);
            send_row_result(&self.world, 0, row, &payload)?;
            rows_computed += 1;
        }
        let elapsed = mpi::time() - t0;

        reduce_max_time(&self.world, 0, elapsed)?;

        println!("[Worker {}] Done, computed {} rows", self.rank, rows_computed);
        Ok(())
    }
}
