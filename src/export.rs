use crate::all::*;

use serde::Serialize;

// Snapshot of the selected trajectory written to disk on demand.
#[derive(Serialize)]
pub struct SelectionExport {
  pub trajectory: usize,
  pub start_frame: usize,
  pub points: Vec<[f64; 2]>,
  pub partition: Vec<usize>,
  // Omitted when the trajectory was too short to filter.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub profile: Option<ProfileExport>,
}

#[derive(Serialize)]
pub struct ProfileExport {
  pub smooth_x: Vec<f64>,
  pub smooth_y: Vec<f64>,
  pub velocity_x: Vec<f64>,
  pub velocity_y: Vec<f64>,
  pub acceleration_x: Vec<f64>,
  pub acceleration_y: Vec<f64>,
}

impl ProfileExport {
  pub fn from_profile(profile: &MotionProfile) -> ProfileExport {
    ProfileExport {
      smooth_x: profile.smooth_x.clone(),
      smooth_y: profile.smooth_y.clone(),
      velocity_x: profile.velocity_x.clone(),
      velocity_y: profile.velocity_y.clone(),
      acceleration_x: profile.acceleration_x.clone(),
      acceleration_y: profile.acceleration_y.clone(),
    }
  }
}

pub fn write_selection(path: &Path, selection: &SelectionExport) -> Result<()> {
  let file = File::create(path)
    .context(format!("Failed to create {}.", path.display()))?;
  serde_json::to_writer_pretty(file, selection)
    .context(format!("Failed to write {}.", path.display()))?;
  Ok(())
}
