use crate::all::*;

// Decoded video frames in the packed 0RGB format the window buffer uses.
pub struct Video {
  pub frames: Vec<Vec<u32>>,
  pub width: usize,
  pub height: usize,
}

impl Video {
  pub fn load(paths: &[PathBuf]) -> Result<Video> {
    if paths.is_empty() {
      bail!("The frame list contains no frames.");
    }
    let mut frames = Vec::with_capacity(paths.len());
    let mut width = 0;
    let mut height = 0;
    for (i, path) in paths.iter().enumerate() {
      let image = image::open(path)
        .context(format!("Failed to read {}.", path.display()))?
        .to_rgb8();
      let (w, h) = (image.width() as usize, image.height() as usize);
      if i == 0 {
        width = w;
        height = h;
      }
      else if (w, h) != (width, height) {
        bail!("Size of frame {} ({}x{}) differs from the previous frames ({}x{}).",
          i + 1, w, h, width, height);
      }
      let mut data = Vec::with_capacity(w * h);
      for p in image.pixels() {
        data.push(pack_rgb(p[0], p[1], p[2]));
      }
      frames.push(data);
    }
    info!("Loaded {} frames of {}x{} pixels.", frames.len(), width, height);
    Ok(Video { frames, width, height })
  }
}
