//! Area-averaging resampler for overlay assets.

use image::{ImageBuffer, Pixel};

/// For each destination index, the source indices it covers and their share of its area.
fn axis_weights(src: u32, dst: u32) -> Vec<Vec<(u32, f64)>> {
    let scale = f64::from(src) / f64::from(dst);
    (0..dst)
        .map(|d| {
            let start = f64::from(d) * scale;
            let end = start + scale;
            let first = start.floor() as u32;
            let last = (end.ceil() as u32).min(src);
            (first..last)
                .filter_map(|s| {
                    let overlap = end.min(f64::from(s + 1)) - start.max(f64::from(s));
                    (overlap > 1e-9).then_some((s, overlap / scale))
                })
                .collect()
        })
        .collect()
}

/// Resamples `image` to `width × height`, each output pixel being the area-weighted mean
/// of the source pixels it covers.
pub fn resize_area<P>(
    image: &ImageBuffer<P, Vec<u8>>,
    width: u32,
    height: u32,
) -> ImageBuffer<P, Vec<u8>>
where
    P: Pixel<Subpixel = u8>,
{
    let mut out = ImageBuffer::new(width, height);
    if width == 0 || height == 0 || image.width() == 0 || image.height() == 0 {
        return out;
    }

    let xs = axis_weights(image.width(), width);
    let ys = axis_weights(image.height(), height);
    let channels = usize::from(P::CHANNEL_COUNT);
    let mut acc = vec![0.0f64; channels];
    let mut values = vec![0u8; channels];

    for (oy, y_weights) in ys.iter().enumerate() {
        for (ox, x_weights) in xs.iter().enumerate() {
            acc.iter_mut().for_each(|a| *a = 0.0);
            for &(sy, wy) in y_weights {
                for &(sx, wx) in x_weights {
                    let w = wy * wx;
                    for (a, c) in acc.iter_mut().zip(image.get_pixel(sx, sy).channels()) {
                        *a += w * f64::from(*c);
                    }
                }
            }
            for (v, a) in values.iter_mut().zip(&acc) {
                *v = a.round().clamp(0.0, 255.0) as u8;
            }
            out.put_pixel(ox as u32, oy as u32, *P::from_slice(&values));
        }
    }
    out
}
