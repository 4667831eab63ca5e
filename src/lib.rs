pub mod coordinator;
pub mod image;
pub mod mandelbrot;
pub mod mpi_utils;
pub mod partition;
pub mod worker;

pub use coordinator::{Coordinator, WorkQueue};
pub use image::Image;
pub use mandelbrot::FractalConfig;
pub use worker::Worker;
