use mpi::collective::SystemOperation;
use mpi::datatype::PartitionMut;
use mpi::traits::*;
use mpi::Count;

// MPI message tags
pub const TAG_TASK: i32 = 1;
pub const TAG_RESULT: i32 = 2;
pub const TAG_DONE: i32 = 3;

/// Sentinel row index carried by termination messages.
pub const NO_MORE_WORK: i32 = -1;

/// Send a row assignment to a worker
pub fn send_task<C: Communicator>(world: &C, dest: i32, row: usize) -> Result<(), String> {
    let row = row as i32;
    world.process_at_rank(dest).send_with_tag(&row, TAG_TASK);
    Ok(())
}

/// Send a termination message to a worker
pub fn send_done<C: Communicator>(world: &C, dest: i32) -> Result<(), String> {
    world
        .process_at_rank(dest)
        .send_with_tag(&NO_MORE_WORK, TAG_DONE);
    Ok(())
}

/// Receive the next assignment from the coordinator. Returns `None` once the
/// coordinator signals that no rows remain.
pub fn receive_assignment<C: Communicator>(world: &C, source: i32) -> Result<Option<usize>, String> {
    let (row, status) = world.process_at_rank(source).receive::<i32>();
    if status.tag() == TAG_DONE || row == NO_MORE_WORK {
        Ok(None)
    } else {
        Ok(Some(row as usize))
    }
}

/// Send one computed row back to the coordinator: the index first, then the
/// payload, both on the result tag. FIFO delivery per sender pair keeps the
/// two messages adjacent on the receiving side.
pub fn send_row_result<C: Communicator>(
    world: &C,
    dest: i32,
    row: usize,
    payload: &[i32],
) -> Result<(), String> {
    let dest_process = world.process_at_rank(dest);
    let row = row as i32;
    dest_process.send_with_tag(&row, TAG_RESULT);
    dest_process.send_with_tag(payload, TAG_RESULT);
    Ok(())
}

/// Receive a completed row from whichever worker replies first: an
/// any-source receive for the index, then the payload from that sender.
pub fn receive_row_result<C: Communicator>(
    world: &C,
    width: usize,
) -> Result<(i32, i32, Vec<i32>), String> {
    let (row, status) = world.any_process().receive_with_tag::<i32>(TAG_RESULT);
    let source = status.source_rank();
    let mut payload = vec![0i32; width];
    world
        .process_at_rank(source)
        .receive_into_with_tag(&mut payload[..], TAG_RESULT);
    Ok((source, row, payload))
}

/// Root side of the all-to-one gather: every rank's row block lands in the
/// image buffer at the precomputed element displacements.
pub fn gather_rows_into_root<C: Communicator>(
    world: &C,
    local: &[i32],
    image: &mut [i32],
    counts: &[Count],
    displs: &[Count],
) -> Result<(), String> {
    let root_process = world.process_at_rank(0);
    let mut partition = PartitionMut::new(image, counts, displs);
    root_process.gather_varcount_into_root(local, &mut partition);
    Ok(())
}

/// Contributor side of the all-to-one gather. A rank with no rows sends an
/// empty buffer; that is a valid, zero-length contribution.
pub fn gather_rows_into<C: Communicator>(world: &C, root: i32, local: &[i32]) -> Result<(), String> {
    world.process_at_rank(root).gather_varcount_into(local);
    Ok(())
}

/// Max-reduce per-rank elapsed seconds onto the root (root side).
pub fn reduce_max_time_root<C: Communicator>(world: &C, seconds: f64) -> Result<f64, String> {
    let mut max_seconds = 0.0f64;
    world
        .process_at_rank(0)
        .reduce_into_root(&seconds, &mut max_seconds, SystemOperation::max());
    Ok(max_seconds)
}

/// Max-reduce per-rank elapsed seconds onto the root (contributor side).
pub fn reduce_max_time<C: Communicator>(world: &C, root: i32, seconds: f64) -> Result<(), String> {
    world
        .process_at_rank(root)
        .reduce_into(&seconds, SystemOperation::max());
    Ok(())
}
