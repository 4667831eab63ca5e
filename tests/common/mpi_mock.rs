use distributed_mandelbrot::coordinator::WorkQueue;
use distributed_mandelbrot::image::Image;
use distributed_mandelbrot::mandelbrot::{self, FractalConfig};
use distributed_mandelbrot::mpi_utils::{NO_MORE_WORK, TAG_DONE, TAG_RESULT, TAG_TASK};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Message queue for simulating MPI communication in tests: messages are
/// keyed by (from, to, tag) and delivered in FIFO order per key, matching
/// MPI's per-pair ordering guarantee.
#[derive(Clone)]
pub struct TestMessageQueue {
    messages: Arc<Mutex<HashMap<(i32, i32, i32), VecDeque<Vec<i32>>>>>,
}

impl TestMessageQueue {
    pub fn new() -> Self {
        TestMessageQueue {
            messages: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Send data from one rank to another
    pub fn send(&self, from: i32, to: i32, tag: i32, data: &[i32]) {
        let mut msgs = self.messages.lock().unwrap();
        msgs.entry((from, to, tag))
            .or_insert_with(VecDeque::new)
            .push_back(data.to_vec());
    }

    /// Receive data sent from one rank to another, if any is pending
    pub fn receive(&self, from: i32, to: i32, tag: i32) -> Option<Vec<i32>> {
        let mut msgs = self.messages.lock().unwrap();
        msgs.get_mut(&(from, to, tag)).and_then(|q| q.pop_front())
    }

    /// Any-source receive: take the pending message with this tag from the
    /// lowest-ranked sender, mirroring an MPI_ANY_SOURCE receive.
    pub fn receive_any(&self, to: i32, tag: i32) -> Option<(i32, Vec<i32>)> {
        let mut msgs = self.messages.lock().unwrap();
        let mut sources: Vec<i32> = Vec::new();
        for (&(from, msg_to, msg_tag), queue) in msgs.iter() {
            if msg_to == to && msg_tag == tag && !queue.is_empty() {
                sources.push(from);
            }
        }
        sources.sort_unstable();
        let from = *sources.first()?;
        let payload = msgs.get_mut(&(from, to, tag))?.pop_front()?;
        Some((from, payload))
    }
}

/// Test-specific protocol helpers. The mock folds each result's index and
/// payload into one message; the per-pair FIFO guarantee makes that
/// equivalent to the two adjacent sends the real channel uses.
pub mod test_channel {
    use super::*;

    pub fn send_task(queue: &TestMessageQueue, from: i32, to: i32, row: usize) {
        queue.send(from, to, TAG_TASK, &[row as i32]);
    }

    pub fn send_done(queue: &TestMessageQueue, from: i32, to: i32) {
        queue.send(from, to, TAG_DONE, &[NO_MORE_WORK]);
    }

    /// Worker-side receive: `Some(Some(row))` for a task, `Some(None)` for a
    /// termination message, `None` if nothing is pending.
    pub fn receive_assignment(
        queue: &TestMessageQueue,
        from: i32,
        to: i32,
    ) -> Option<Option<usize>> {
        if let Some(msg) = queue.receive(from, to, TAG_TASK) {
            return Some(Some(msg[0] as usize));
        }
        if queue.receive(from, to, TAG_DONE).is_some() {
            return Some(None);
        }
        None
    }

    pub fn send_row_result(
        queue: &TestMessageQueue,
        from: i32,
        to: i32,
        row: usize,
        payload: &[i32],
    ) {
        let mut msg = Vec::with_capacity(payload.len() + 1);
        msg.push(row as i32);
        msg.extend_from_slice(payload);
        queue.send(from, to, TAG_RESULT, &msg);
    }

    pub fn receive_row_result(queue: &TestMessageQueue, to: i32) -> Option<(i32, i32, Vec<i32>)> {
        let (from, msg) = queue.receive_any(to, TAG_RESULT)?;
        let row = *msg.first()?;
        Some((from, row, msg[1..].to_vec()))
    }
}

/// Process one pending assignment for a worker: compute the row and send the
/// result back. Returns `Ok(false)` once the worker is told to stop.
pub fn simulate_worker_step(
    queue: &TestMessageQueue,
    worker_rank: i32,
    coordinator_rank: i32,
    config: &FractalConfig,
) -> Result<bool, String> {
    match test_channel::receive_assignment(queue, coordinator_rank, worker_rank) {
        Some(Some(row)) => {
            let payload = mandelbrot::compute_row(config, row);
            test_channel::send_row_result(queue, worker_rank, coordinator_rank, row, &payload);
            Ok(true)
        }
        Some(None) => Ok(false),
        None => Err(format!("Worker {} had no pending assignment", worker_rank)),
    }
}

/// Message counters for protocol assertions.
pub struct DynamicRunStats {
    pub dispatched: Vec<usize>,
    pub done_messages: usize,
}

/// Drive a full dynamic run over the mock queue: the coordinator side runs
/// against `WorkQueue` exactly as in production, while workers are stepped
/// inline whenever they hold an assignment.
pub fn simulate_dynamic_run(
    world_size: i32,
    config: &FractalConfig,
) -> Result<(Image, DynamicRunStats), String> {
    assert!(world_size >= 2, "dynamic mode needs a coordinator and a worker");
    let queue = TestMessageQueue::new();
    let coordinator = 0;
    let worker_count = (world_size - 1) as usize;

    let mut image = Image::new(config.width, config.height);
    let mut work = WorkQueue::new(config.height, worker_count);
    let mut stats = DynamicRunStats {
        dispatched: Vec::new(),
        done_messages: 0,
    };
    let mut busy: VecDeque<i32> = VecDeque::new();

    // Priming
    for worker in 1..world_size {
        match work.next_task() {
            Some(row) => {
                test_channel::send_task(&queue, coordinator, worker, row);
                stats.dispatched.push(row);
                busy.push_back(worker);
            }
            None => {
                test_channel::send_done(&queue, coordinator, worker);
                stats.done_messages += 1;
                work.retire_worker();
            }
        }
    }

    // Servicing: step the longest-waiting busy worker, then handle its reply.
    while !work.is_done() {
        let worker = busy
            .pop_front()
            .ok_or("No busy worker left while workers remain active")?;
        simulate_worker_step(&queue, worker, coordinator, config)?;

        let (source, row, payload) = test_channel::receive_row_result(&queue, coordinator)
            .ok_or("Coordinator expected a result message")?;
        if row < 0 || image.set_row(row as usize, &payload).is_err() {
            return Err(format!("Out-of-range row {} from worker {}", row, source));
        }

        match work.next_task() {
            Some(next) => {
                test_channel::send_task(&queue, coordinator, source, next);
                stats.dispatched.push(next);
                busy.push_back(source);
            }
            None => {
                test_channel::send_done(&queue, coordinator, source);
                stats.done_messages += 1;
                work.retire_worker();
            }
        }
    }

    // Every worker drains exactly one termination message and stops.
    for worker in 1..world_size {
        let stepped = simulate_worker_step(&queue, worker, coordinator, config)?;
        assert!(!stepped, "worker {} should have been terminated", worker);
    }

    Ok((image, stats))
}
