use distributed_mandelbrot::coordinator::Coordinator;
use distributed_mandelbrot::mandelbrot::FractalConfig;
use distributed_mandelbrot::worker::Worker;
use mpi::traits::*;
use std::env;
use std::path::PathBuf;
use std::process;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Static,
    Dynamic,
}

fn print_usage(program: &str) {
    eprintln!(
        "Usage: {} <static|dynamic> <output.pgm> [width height max_iter]",
        program
    );
    eprintln!("  static:  rows pre-assigned per rank, gathered once at the end");
    eprintln!("  dynamic: rank 0 hands out rows on demand (needs >= 2 processes)");
}

fn parse_args(args: &[String]) -> Result<(Mode, PathBuf, FractalConfig), String> {
    if args.len() != 3 && args.len() != 6 {
        return Err(format!("expected 2 or 5 arguments, got {}", args.len() - 1));
    }

    let mode = match args[1].as_str() {
        "static" => Mode::Static,
        "dynamic" => Mode::Dynamic,
        other => return Err(format!("unknown mode '{}'", other)),
    };
    let output = PathBuf::from(&args[2]);

    let config = if args.len() == 6 {
        let width = args[3]
            .parse::<usize>()
            .map_err(|e| format!("invalid width '{}': {}", args[3], e))?;
        let height = args[4]
            .parse::<usize>()
            .map_err(|e| format!("invalid height '{}': {}", args[4], e))?;
        let max_iter = args[5]
            .parse::<i32>()
            .map_err(|e| format!("invalid max_iter '{}': {}", args[5], e))?;
        FractalConfig::with_dimensions(width, height, max_iter)
    } else {
        FractalConfig::default()
    };

    Ok((mode, output, config))
}

fn main() {
    let universe = mpi::initialize().expect("Failed to initialize MPI");
    let world = universe.world();

    let rank = world.rank();
    let size = world.size();

    // mpirun hands every rank the same argv, so each rank parses its own copy.
    let args: Vec<String> = env::args().collect();
    let (mode, output, config) = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(e) => {
            if rank == 0 {
                eprintln!("Error: {}", e);
                print_usage(&args[0]);
            }
            process::exit(1);
        }
    };

    if mode == Mode::Dynamic && size < 2 {
        if rank == 0 {
            eprintln!("Error: dynamic mode needs at least 2 processes (1 coordinator + 1 worker)");
        }
        process::exit(1);
    }

    if rank == 0 {
        println!("[Coordinator] Starting with {} workers", size - 1);
        println!(
            "[Coordinator] Image: {}x{}, max_iter {}",
            config.width, config.height, config.max_iter
        );
        println!("[Coordinator] Output: {:?}", output);

        let coordinator = Coordinator::new(world);
        let result = match mode {
            Mode::Static => coordinator.run_static(&config),
            Mode::Dynamic => coordinator.run_dynamic(&config),
        };

        let image = match result {
            Ok(image) => image,
            Err(e) => {
                eprintln!("[Coordinator] Error: {}", e);
                process::exit(1);
            }
        };

        // The image is already assembled; a failed write loses only the file.
        if let Err(e) = image.save_pgm(&output, config.max_iter) {
            eprintln!("[Coordinator] Failed to write {:?}: {}", output, e);
        } else {
            println!("[Coordinator] Wrote {:?}", output);
        }
    } else {
        let worker = Worker::new(world);
        let result = match mode {
            Mode::Static => worker.run_static(&config),
            Mode::Dynamic => worker.run_dynamic(&config),
        };
        if let Err(e) = result {
            eprintln!("[Worker {}] Error: {}", worker.rank(), e);
            process::exit(1);
        }
    }
}
