//! Summed-area tables: plain, squared and 45°-tilted.

use image::GrayImage;

/// Integral images of one grey image.
///
/// `sum`/`sqsum` are `(W+1)×(H+1)` with `S(X, Y) = Σ_{x<X, y<Y} I(x, y)`. The tilted table
/// holds `T(X, Y) = Σ_{y<Y, |x-X+1| ≤ Y-y-1} I(x, y)` for `X` in `[-(H+1), W+H+1]`; outside
/// that range it is zero.
#[derive(Debug, Clone)]
pub struct IntegralImages {
    width: usize,
    height: usize,
    sum: Vec<i64>,
    sqsum: Vec<i64>,
    tilted: Vec<i64>,
    tilted_stride: usize,
    tilted_offset: i64,
}

impl IntegralImages {
    pub fn new(image: &GrayImage) -> Self {
        let width = image.width() as usize;
        let height = image.height() as usize;
        let stride = width + 1;
        let pixel = |x: usize, y: usize| i64::from(image.get_pixel(x as u32, y as u32).0[0]);

        let mut sum = vec![0i64; stride * (height + 1)];
        let mut sqsum = vec![0i64; stride * (height + 1)];
        for y in 0..height {
            let mut row = 0i64;
            let mut row_sq = 0i64;
            for x in 0..width {
                let v = pixel(x, y);
                row += v;
                row_sq += v * v;
                let at = (y + 1) * stride + x + 1;
                sum[at] = sum[at - stride] + row;
                sqsum[at] = sqsum[at - stride] + row_sq;
            }
        }

        let tilted_offset = height as i64 + 1;
        let tilted_stride = width + 2 * height + 3;
        let mut tilted = vec![0i64; tilted_stride * (height + 1)];
        let t = |table: &[i64], x: i64, y: i64| -> i64 {
            let col = x + tilted_offset;
            if y < 0 || col < 0 || col >= tilted_stride as i64 {
                return 0;
            }
            table[y as usize * tilted_stride + col as usize]
        };
        let img = |x: i64, y: i64| -> i64 {
            if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
                0
            } else {
                pixel(x as usize, y as usize)
            }
        };
        for y in 1..=height as i64 {
            for col in 0..tilted_stride as i64 {
                let x = col - tilted_offset;
                let value = t(&tilted, x - 1, y - 1) + t(&tilted, x + 1, y - 1) - t(&tilted, x, y - 2)
                    + img(x - 1, y - 1)
                    + img(x - 1, y - 2);
                tilted[y as usize * tilted_stride + col as usize] = value;
            }
        }

        Self {
            width,
            height,
            sum,
            sqsum,
            tilted,
            tilted_stride,
            tilted_offset,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn at(table: &[i64], stride: usize, x: i32, y: i32) -> i64 {
        table[y as usize * stride + x as usize]
    }

    /// Pixel sum over the upright rectangle `(x, y, w, h)`; must lie inside the image.
    pub fn rect_sum(&self, x: i32, y: i32, w: i32, h: i32) -> i64 {
        let s = self.width + 1;
        Self::at(&self.sum, s, x + w, y + h) - Self::at(&self.sum, s, x + w, y)
            - Self::at(&self.sum, s, x, y + h)
            + Self::at(&self.sum, s, x, y)
    }

    /// Sum of squared pixels over the upright rectangle `(x, y, w, h)`.
    pub fn rect_sqsum(&self, x: i32, y: i32, w: i32, h: i32) -> i64 {
        let s = self.width + 1;
        Self::at(&self.sqsum, s, x + w, y + h) - Self::at(&self.sqsum, s, x + w, y)
            - Self::at(&self.sqsum, s, x, y + h)
            + Self::at(&self.sqsum, s, x, y)
    }

    pub fn tilted_at(&self, x: i64, y: i64) -> i64 {
        let col = x + self.tilted_offset;
        if y < 0 || y > self.height as i64 || col < 0 || col >= self.tilted_stride as i64 {
            return 0;
        }
        self.tilted[y as usize * self.tilted_stride + col as usize]
    }

    /// Pixel sum over the 45°-rotated rectangle anchored at `(x, y)` with sides `w` (down
    /// right) and `h` (down left).
    pub fn tilted_sum(&self, x: i32, y: i32, w: i32, h: i32) -> i64 {
        let (x, y, w, h) = (x as i64, y as i64, w as i64, h as i64);
        self.tilted_at(x, y) - self.tilted_at(x - h, y + h) - self.tilted_at(x + w, y + w)
            + self.tilted_at(x + w - h, y + w + h)
    }
}
