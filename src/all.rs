// NOTE This kind of import-all file isn't a common Rust idiom.

pub use crate::{
  colors::*,
  event_loop::*,
  export::*,
  filters::*,
  input::*,
  parameters::*,
  trajectory::*,
  trajectory_index::*,
  types::*,
  util::*,
  video::*,
  viewer::*,
  visualize::*,
};

pub use {
  std::{
    fs::File,
    io::{BufRead, BufReader, Write},
    path::{Path, PathBuf},
    sync::{mpsc, Mutex},
    thread,
  },
  log::{debug, error, info, warn, LevelFilter},
  anyhow::{anyhow, bail, Context as AnyhowContext, Result},
};
