//! Window icon loading.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use vessel_common::WindowError;
use winit::window::Icon;

/// Load a PNG file as a window icon.
pub fn load_icon(path: &Path) -> Result<Icon, WindowError> {
    let file = File::open(path)
        .map_err(|e| WindowError::Operation(format!("{}: {e}", path.display())))?;
    let (rgba, width, height) = decode_rgba(BufReader::new(file))?;
    Icon::from_rgba(rgba, width, height).map_err(|e| WindowError::Operation(e.to_string()))
}

/// Decode a PNG into 8-bit RGBA pixels.
fn decode_rgba<R: Read>(reader: R) -> Result<(Vec<u8>, u32, u32), WindowError> {
    let bad_png = |e: png::DecodingError| WindowError::Operation(format!("invalid icon: {e}"));

    let mut decoder = png::Decoder::new(reader);
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder.read_info().map_err(bad_png)?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).map_err(bad_png)?;
    buf.truncate(info.buffer_size());

    let rgba = match info.color_type {
        png::ColorType::Rgba => buf,
        png::ColorType::Rgb => buf
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        png::ColorType::GrayscaleAlpha => buf
            .chunks_exact(2)
            .flat_map(|p| [p[0], p[0], p[0], p[1]])
            .collect(),
        png::ColorType::Grayscale => buf.iter().flat_map(|&g| [g, g, g, 255]).collect(),
        png::ColorType::Indexed => {
            return Err(WindowError::Operation(
                "invalid icon: palette was not expanded".into(),
            ))
        }
    };
    Ok((rgba, info.width, info.height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encode(width: u32, height: u32, color: png::ColorType, data: &[u8]) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut encoder = png::Encoder::new(&mut buf, width, height);
            encoder.set_color(color);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(data).unwrap();
        }
        buf.into_inner()
    }

    #[test]
    fn rgba_passes_through() {
        let png = encode(1, 1, png::ColorType::Rgba, &[1, 2, 3, 4]);
        let (rgba, w, h) = decode_rgba(Cursor::new(png)).unwrap();
        assert_eq!((w, h), (1, 1));
        assert_eq!(rgba, vec![1, 2, 3, 4]);
    }

    #[test]
    fn rgb_gets_opaque_alpha() {
        let png = encode(2, 1, png::ColorType::Rgb, &[10, 20, 30, 40, 50, 60]);
        let (rgba, _, _) = decode_rgba(Cursor::new(png)).unwrap();
        assert_eq!(rgba, vec![10, 20, 30, 255, 40, 50, 60, 255]);
    }

    #[test]
    fn grayscale_is_expanded() {
        let png = encode(1, 1, png::ColorType::Grayscale, &[7]);
        let (rgba, _, _) = decode_rgba(Cursor::new(png)).unwrap();
        assert_eq!(rgba, vec![7, 7, 7, 255]);
    }

    #[test]
    fn garbage_is_rejected() {
        let err = decode_rgba(Cursor::new(b"not a png".to_vec())).unwrap_err();
        assert!(err.to_string().contains("invalid icon"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_icon(&dir.path().join("icon.png")).is_err());
    }
}
