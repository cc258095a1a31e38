//! File-backed display sinks.
//!
//! Each presented frame overwrites the output file, so the image on disk
//! always holds the latest progressive pass.

use anyhow::{Context, Result};
use glint_renderer::{DisplaySink, Frame};
use image::{ImageFormat, RgbImage};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes frames as PNG through `image`, whatever the file extension.
pub struct ImageSink {
    path: PathBuf,
}

impl ImageSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DisplaySink for ImageSink {
    type Error = anyhow::Error;

    fn present(&mut self, frame: &Frame) -> Result<()> {
        let image = RgbImage::from_raw(frame.width(), frame.height(), frame.to_rgb_bytes())
            .context("frame size does not match its pixel buffer")?;
        image
            .save_with_format(&self.path, ImageFormat::Png)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        log::debug!("Wrote {}", self.path.display());
        Ok(())
    }
}

/// Writes frames as plain-text PPM (P3).
pub struct PpmSink {
    path: PathBuf,
}

impl PpmSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DisplaySink for PpmSink {
    type Error = anyhow::Error;

    fn present(&mut self, frame: &Frame) -> Result<()> {
        write_ppm(frame, &self.path)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        log::debug!("Wrote {}", self.path.display());
        Ok(())
    }
}

fn write_ppm(frame: &Frame, path: &Path) -> std::io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", frame.width(), frame.height())?;
    writeln!(writer, "255")?;

    for [r, g, b] in frame.pixels() {
        writeln!(writer, "{} {} {}", r, g, b)?;
    }

    writer.flush()
}

/// Output sink chosen from the file extension.
pub enum FileSink {
    Image(ImageSink),
    Ppm(PpmSink),
}

impl FileSink {
    /// `.ppm` writes plain-text PPM; everything else goes through `image`.
    pub fn for_path(path: &Path) -> Self {
        let is_ppm = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("ppm"));
        if is_ppm {
            FileSink::Ppm(PpmSink::new(path))
        } else {
            FileSink::Image(ImageSink::new(path))
        }
    }
}

impl DisplaySink for FileSink {
    type Error = anyhow::Error;

    fn present(&mut self, frame: &Frame) -> Result<()> {
        match self {
            FileSink::Image(sink) => sink.present(frame),
            FileSink::Ppm(sink) => sink.present(frame),
        }
    }
}
