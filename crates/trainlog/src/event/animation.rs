//! Encoding of video tensors as animated GIF image summaries.

use super::proto::Image;
use crate::{LoggerError, Result};
use ndarray::{ArrayD, ArrayView5, Ix5};

/// Grid layout for a batch of `n` videos: `(rows, cols)`.
///
/// The batch is padded to the next power of two; rows is the largest power of
/// two not above its square root.
pub fn grid_shape(n: usize) -> (usize, usize) {
    let padded = n.max(1).next_power_of_two();
    let rows = 1usize << (padded.trailing_zeros() / 2);
    (rows, padded / rows)
}

/// Encode a `(N, T, C, H, W)` tensor with values in `[0, 1]` as a looping GIF.
pub fn encode_video(video: &ArrayD<f32>, fps: u32) -> Result<Image> {
    let view: ArrayView5<'_, f32> = video.view().into_dimensionality::<Ix5>().map_err(|_| {
        LoggerError::InvalidVideo(format!(
            "expected shape (N, T, C, H, W), got {:?}",
            video.shape()
        ))
    })?;
    let (n, t, c, h, w) = view.dim();

    if !matches!(c, 1 | 3 | 4) {
        return Err(LoggerError::InvalidVideo(format!(
            "expected 1, 3 or 4 channels, got {}",
            c
        )));
    }
    if n == 0 || t == 0 || h == 0 || w == 0 {
        return Err(LoggerError::InvalidVideo(format!(
            "empty video {:?}",
            video.shape()
        )));
    }
    if fps == 0 {
        return Err(LoggerError::InvalidVideo("fps must be positive".into()));
    }

    let (rows, cols) = grid_shape(n);
    let width = u16::try_from(cols * w)
        .map_err(|_| LoggerError::InvalidVideo("video grid too wide for GIF".into()))?;
    let height = u16::try_from(rows * h)
        .map_err(|_| LoggerError::InvalidVideo("video grid too tall for GIF".into()))?;
    let delay = (100 / fps).max(1) as u16;

    let mut encoded = Vec::new();
    {
        let mut encoder =
            gif::Encoder::new(&mut encoded, width, height, &[]).map_err(LoggerError::backend)?;
        encoder
            .set_repeat(gif::Repeat::Infinite)
            .map_err(LoggerError::backend)?;

        for frame_idx in 0..t {
            let pixels = tile_frame(&view, frame_idx, rows, cols);
            let mut frame = gif::Frame::from_rgb_speed(width, height, &pixels, 10);
            frame.delay = delay;
            encoder.write_frame(&frame).map_err(LoggerError::backend)?;
        }
    }

    Ok(Image {
        height: i32::from(height),
        width: i32::from(width),
        colorspace: 3,
        encoded_image_string: encoded,
    })
}

/// RGB pixels of one time step with the batch tiled row-major into the grid.
fn tile_frame(view: &ArrayView5<'_, f32>, frame_idx: usize, rows: usize, cols: usize) -> Vec<u8> {
    let (n, _, c, h, w) = view.dim();
    let mut pixels = vec![0u8; rows * h * cols * w * 3];

    for y in 0..rows * h {
        for x in 0..cols * w {
            let idx = (y / h) * cols + x / w;
            if idx >= n {
                continue;
            }
            let offset = (y * cols * w + x) * 3;
            for ch in 0..3 {
                // Gray is replicated, alpha dropped
                let src = if c == 1 { 0 } else { ch };
                pixels[offset + ch] = to_u8(view[[idx, frame_idx, src, y % h, x % w]]);
            }
        }
    }

    pixels
}

fn to_u8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}
