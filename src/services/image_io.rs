use pixel_grid::PixelBuffer;
use std::io::Cursor;
use std::path::Path;

use crate::error::AppError;

/// Decode a PNG of any color type and bit depth into RGBA8.
///
/// Palette and low-bit images are expanded and 16-bit samples stripped to 8
/// bits by the decoder; gray and RGB results get their missing channels here.
pub fn decode_png(bytes: &[u8]) -> Result<PixelBuffer, AppError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| AppError::PngDecode(e.to_string()))?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| AppError::PngDecode(e.to_string()))?;
    let (width, height) = (info.width as usize, info.height as usize);
    let samples = &buf[..info.buffer_size()];

    if info.bit_depth != png::BitDepth::Eight {
        return Err(AppError::PngDecode(format!(
            "unexpected bit depth {:?} after expansion",
            info.bit_depth
        )));
    }

    let rgba: Vec<u8> = match info.color_type {
        png::ColorType::Rgba => samples.to_vec(),
        png::ColorType::Rgb => samples
            .chunks_exact(3)
            .flat_map(|px| [px[0], px[1], px[2], 255])
            .collect(),
        png::ColorType::GrayscaleAlpha => samples
            .chunks_exact(2)
            .flat_map(|px| [px[0], px[0], px[0], px[1]])
            .collect(),
        png::ColorType::Grayscale => samples.iter().flat_map(|&g| [g, g, g, 255]).collect(),
        png::ColorType::Indexed => {
            return Err(AppError::PngDecode(
                "indexed color was not expanded".to_string(),
            ))
        }
    };

    Ok(PixelBuffer::from_raw(width, height, rgba)?)
}

/// Encode an RGBA8 buffer as PNG.
pub fn encode_png(buffer: &PixelBuffer) -> Result<Vec<u8>, AppError> {
    let too_large = || AppError::ImageTooLarge {
        width: buffer.width(),
        height: buffer.height(),
    };
    let width = u32::try_from(buffer.width()).map_err(|_| too_large())?;
    let height = u32::try_from(buffer.height()).map_err(|_| too_large())?;

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder
            .write_header()
            .map_err(|e| AppError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(buffer.as_bytes())
            .map_err(|e| AppError::PngEncode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}

/// Losslessly re-compress a PNG with oxipng. Returns the input unchanged if
/// optimisation fails.
pub fn optimize_png(png_bytes: Vec<u8>) -> Vec<u8> {
    match oxipng::optimize_from_memory(
        &png_bytes,
        &oxipng::Options {
            strip: oxipng::StripChunks::Safe,
            optimize_alpha: false,
            ..Default::default()
        },
    ) {
        Ok(optimized) => optimized,
        Err(e) => {
            tracing::warn!(%e, "PNG optimisation failed, keeping unoptimised output");
            png_bytes
        }
    }
}

pub fn load_png(path: &Path) -> Result<PixelBuffer, AppError> {
    let bytes = std::fs::read(path)?;
    let buffer = decode_png(&bytes)?;
    tracing::debug!(
        path = %path.display(),
        width = buffer.width(),
        height = buffer.height(),
        "Loaded image"
    );
    Ok(buffer)
}

/// Write `buffer` to `path` as PNG, returning the number of bytes written.
pub fn save_png(path: &Path, buffer: &PixelBuffer, optimize: bool) -> Result<usize, AppError> {
    let mut png_bytes = encode_png(buffer)?;
    if optimize {
        png_bytes = optimize_png(png_bytes);
    }
    std::fs::write(path, &png_bytes)?;
    Ok(png_bytes.len())
}
