//! Character picture attached to a survey submission.

use std::path::Path;

use image::{DynamicImage, ImageReader};
use tracing::{info, warn};

use crate::error::{Error, Result};

/// Decode the picture at `path`, sniffing the format from its contents
pub fn load_portrait(path: &Path) -> Result<DynamicImage> {
    let decode_error = |reason: String| {
        warn!(path = %path.display(), %reason, "Failed to load character image");
        Error::ImageDecode {
            path: path.display().to_string(),
            reason,
        }
    };

    let img = ImageReader::open(path)
        .map_err(|e| decode_error(e.to_string()))?
        .with_guessed_format()
        .map_err(|e| decode_error(e.to_string()))?
        .decode()
        .map_err(|e| decode_error(e.to_string()))?;

    info!(path = %path.display(), width = img.width(), height = img.height(), "Loaded character image");
    Ok(img)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use image::RgbImage;

    use super::*;

    #[test]
    fn test_loads_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fern.png");
        RgbImage::new(4, 3).save(&path).unwrap();

        let img = load_portrait(&path).unwrap();
        assert_eq!((img.width(), img.height()), (4, 3));
    }

    #[test]
    fn test_format_comes_from_contents_not_extension() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("fern.png");
        RgbImage::new(2, 2).save(&png).unwrap();
        let renamed = dir.path().join("fern.jpg");
        std::fs::rename(&png, &renamed).unwrap();

        assert!(load_portrait(&renamed).is_ok());
    }

    #[test]
    fn test_garbage_file_is_decode_error() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        writeln!(file, "definitely not a picture").unwrap();

        let err = load_portrait(file.path()).unwrap_err();
        assert!(matches!(err, Error::ImageDecode { ref path, .. } if path.ends_with(".png")));
    }

    #[test]
    fn test_missing_file_is_decode_error() {
        let err = load_portrait(Path::new("/nonexistent/fern.png")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/fern.png"));
    }
}
