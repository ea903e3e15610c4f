use crate::all::*;

lazy_static! {
  pub static ref PARAMETER_SET: Mutex<ParameterSet> = Mutex::new(ParameterSet::default());
}

#[derive(Debug, Clone)]
#[derive(clap::Args)]
pub struct ParameterSet {
  // Trajectory index.
  #[clap(long, default_value = "2")]
  pub dilation_margin: i32,

  // Signal filtering.
  #[clap(long, default_value = "3")]
  pub smooth_window: usize,
  #[clap(long, default_value = "3.0")]
  pub smooth_sigma: f64,
  #[clap(long, default_value = "3")]
  pub derivative_window: usize,

  // Visualizations.
  #[clap(long)]
  pub hide_overlay: bool,
  #[clap(long)]
  pub hide_partitions: bool,
}

// Keep in sync with the clap defaults above.
impl Default for ParameterSet {
  fn default() -> ParameterSet {
    ParameterSet {
      dilation_margin: 2,
      smooth_window: 3,
      smooth_sigma: 3.,
      derivative_window: 3,
      hide_overlay: false,
      hide_partitions: false,
    }
  }
}
