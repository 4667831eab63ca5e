/// Render parameters: image dimensions, iteration cap and the region of the
/// complex plane mapped onto the pixel grid.
#[derive(Debug, Clone)]
pub struct FractalConfig {
    pub width: usize,
    pub height: usize,
    pub max_iter: i32,
    pub re_min: f64,
    pub re_max: f64,
    pub im_min: f64,
    pub im_max: f64,
}

impl Default for FractalConfig {
    fn default() -> Self {
        FractalConfig {
            width: 640,
            height: 480,
            max_iter: 255,
            re_min: -2.0,
            re_max: 2.0,
            im_min: -2.0,
            im_max: 2.0,
        }
    }
}

impl FractalConfig {
    /// Config with custom dimensions over the default plane window.
    pub fn with_dimensions(width: usize, height: usize, max_iter: i32) -> Self {
        FractalConfig {
            width,
            height,
            max_iter,
            ..FractalConfig::default()
        }
    }

    /// Map a pixel position to its point in the complex plane.
    pub fn pixel_to_point(&self, col: usize, row: usize) -> (f64, f64) {
        let re = self.re_min + col as f64 * (self.re_max - self.re_min) / self.width as f64;
        let im = self.im_min + row as f64 * (self.im_max - self.im_min) / self.height as f64;
        (re, im)
    }
}

/// Escape-time iteration count for the point `c = c_re + i*c_im`.
///
/// z starts at zero and is squared-and-shifted until its magnitude squared
/// reaches 4 or the cap is hit. At least one iteration always runs, so the
/// result lies in `[1, max_iter]`. Pure and deterministic: the same input
/// yields the same count on every rank.
pub fn escape_time(c_re: f64, c_im: f64, max_iter: i32) -> i32 {
    let mut z_re = 0.0f64;
    let mut z_im = 0.0f64;
    let mut iter = 0;
    loop {
        let re2 = z_re * z_re;
        let im2 = z_im * z_im;
        z_im = 2.0 * z_re * z_im + c_im;
        z_re = re2 - im2 + c_re;
        iter += 1;
        if iter >= max_iter || re2 + im2 >= 4.0 {
            return iter;
        }
    }
}

/// Compute one full image row.
pub fn compute_row(config: &FractalConfig, row: usize) -> Vec<i32> {
    (0..config.width)
        .map(|col| {
            let (re, im) = config.pixel_to_point(col, row);
            escape_time(re, im, config.max_iter)
        })
        .collect()
}

/// Compute a contiguous block of rows into one row-major buffer. Used by the
/// static path for each rank's own range, and by tests as the ground truth.
pub fn compute_rows(config: &FractalConfig, start_row: usize, count: usize) -> Vec<i32> {
    let mut buf = Vec::with_capacity(count * config.width);
    for row in start_row..start_row + count {
        buf.extend_from_slice(&compute_row(config, row));
    }
    buf
}
