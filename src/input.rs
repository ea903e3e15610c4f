use crate::all::*;

pub struct Dataset {
  pub trajectories: Vec<Trajectory>,
  pub partitions: Vec<Partition>,
}

// Whitespace-separated tokens over a line-based reader. The .dat and .bmf
// formats put no meaning on line breaks.
struct Tokens<R> {
  reader: R,
  line: String,
  pos: usize,
}

impl<R: BufRead> Tokens<R> {
  fn new(reader: R) -> Tokens<R> {
    Tokens {
      reader,
      line: String::new(),
      pos: 0,
    }
  }

  // End of data is signaled by `Result::Ok(Option::None)`.
  fn next_token(&mut self) -> Result<Option<&str>> {
    loop {
      let rest = &self.line[self.pos..];
      let trimmed = rest.trim_start();
      self.pos += rest.len() - trimmed.len();
      if self.pos < self.line.len() {
        let start = self.pos;
        let end = self.line[start..].find(char::is_whitespace)
          .map(|i| start + i)
          .unwrap_or(self.line.len());
        self.pos = end;
        return Ok(Some(&self.line[start..end]));
      }
      self.line.clear();
      self.pos = 0;
      if self.reader.read_line(&mut self.line)? == 0 {
        return Ok(None);
      }
    }
  }

  fn expect<T>(&mut self, what: &str) -> Result<T>
  where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
  {
    match self.next_token()? {
      None => bail!("Unexpected end of file while reading {}.", what),
      Some(token) => token.parse()
        .map_err(|err| anyhow!("Failed to parse {} from {:?}: {}", what, token, err)),
    }
  }
}

// Mixing up the command line arguments is easier to explain than whatever
// the parsers would make of the wrong file.
fn require_extension(path: &Path, extension: &str) -> Result<()> {
  if path.extension().map_or(false, |e| e == extension) {
    return Ok(());
  }
  bail!("{} must be a .{} file.", path.display(), extension);
}

pub fn read_trajectories(path: &Path) -> Result<(usize, Vec<Trajectory>)> {
  require_extension(path, "dat")?;
  let file = File::open(path)
    .context(format!("Failed to open {}.", path.display()))?;
  parse_trajectories(BufReader::new(file))
    .context(format!("Failed to read trajectories from {}.", path.display()))
}

pub fn parse_trajectories<R: BufRead>(reader: R) -> Result<(usize, Vec<Trajectory>)> {
  let mut tokens = Tokens::new(reader);
  let video_length: usize = tokens.expect("video length")?;
  let amount: usize = tokens.expect("trajectory amount")?;

  let mut trajectories = Vec::with_capacity(amount);
  for i in 0..amount {
    // The label column is unused, same as in the extraction tools.
    let _label: i64 = tokens.expect("label")?;
    let size: usize = tokens.expect("trajectory size")?;
    if size == 0 {
      bail!("Trajectory {} is empty.", i);
    }
    let mut points = Vec::with_capacity(size);
    let mut start_frame = 0;
    for j in 0..size {
      let x: f64 = tokens.expect("x coordinate")?;
      let y: f64 = tokens.expect("y coordinate")?;
      let frame: usize = tokens.expect("frame number")?;
      if j == 0 {
        start_frame = frame;
      }
      else if frame != start_frame + j {
        bail!("Frame numbers of trajectory {} are not consecutive.", i);
      }
      points.push(Vector2d::new(x, y));
    }
    trajectories.push(Trajectory::new(points, start_frame));
  }
  Ok((video_length, trajectories))
}

pub fn read_partitions(path: &Path) -> Result<(usize, Vec<Partition>)> {
  require_extension(path, "dat")?;
  let file = File::open(path)
    .context(format!("Failed to open {}.", path.display()))?;
  parse_partitions(BufReader::new(file))
    .context(format!("Failed to read partitions from {}.", path.display()))
}

pub fn parse_partitions<R: BufRead>(reader: R) -> Result<(usize, Vec<Partition>)> {
  let mut tokens = Tokens::new(reader);
  let video_length: usize = tokens.expect("video length")?;
  let amount: usize = tokens.expect("partition amount")?;

  let mut partitions = Vec::with_capacity(amount);
  for _ in 0..amount {
    let size: usize = tokens.expect("partition size")?;
    let mut partition = Partition::with_capacity(size);
    for _ in 0..size {
      partition.push(tokens.expect("cut point")?);
    }
    partitions.push(partition);
  }
  Ok((video_length, partitions))
}

// Frame list in the .bmf format: a header with the frame count, then image
// file names relative to the directory of the list itself.
pub fn read_frame_list(path: &Path) -> Result<(usize, Vec<PathBuf>)> {
  require_extension(path, "bmf")?;
  let file = File::open(path)
    .context(format!("Failed to open {}.", path.display()))?;
  let root = path.parent().unwrap_or(Path::new(""));

  let mut tokens = Tokens::new(BufReader::new(file));
  let video_length: usize = tokens.expect("video length")?;
  let _format: usize = tokens.expect("format tag")?;
  if video_length == 0 {
    bail!("The frame list {} contains no frames.", path.display());
  }

  let mut paths = Vec::with_capacity(video_length);
  for _ in 0..video_length {
    let name: String = tokens.expect("frame name")?;
    paths.push(root.join(name));
  }
  Ok((video_length, paths))
}

// The trajectory and partition files describe the same video and the same
// set of trajectories. Check before trusting either.
pub fn load_dataset(
  trajectories_path: &Path,
  partition_path: &Path,
  video_length: usize,
) -> Result<Dataset> {
  let (traj_video_length, trajectories) = read_trajectories(trajectories_path)?;
  if traj_video_length != video_length {
    bail!("Trajectories are extracted from a video of another length ({} vs {}).",
      traj_video_length, video_length);
  }

  let (part_video_length, partitions) = read_partitions(partition_path)?;
  if part_video_length != video_length {
    bail!("Partitions were extracted from a video of another length ({} vs {}).",
      part_video_length, video_length);
  }
  if partitions.len() != trajectories.len() {
    bail!("There is no 1-to-1 correspondence between trajectories and their partitions ({} vs {}).",
      trajectories.len(), partitions.len());
  }

  for (i, (trajectory, partition)) in trajectories.iter().zip(&partitions).enumerate() {
    validate_partition(partition, trajectory.len())
      .context(format!("Bad partition for trajectory {}.", i))?;
  }
  Ok(Dataset { trajectories, partitions })
}

fn validate_partition(partition: &[usize], trajectory_len: usize) -> Result<()> {
  for (j, &cut) in partition.iter().enumerate() {
    if cut >= trajectory_len {
      bail!("Cut point {} is past the last sample {}.", cut, trajectory_len - 1);
    }
    if j > 0 && partition[j - 1] >= cut {
      bail!("Cut points are not strictly increasing.");
    }
  }
  Ok(())
}

pub fn write_trajectories<W: Write>(
  mut out: W,
  video_length: usize,
  trajectories: &[Trajectory],
) -> Result<()> {
  writeln!(out, "{}", video_length)?;
  writeln!(out, "{}", trajectories.len())?;
  for trajectory in trajectories {
    // The label column is always zero.
    writeln!(out, "0 {}", trajectory.len())?;
    for (j, p) in trajectory.points.iter().enumerate() {
      writeln!(out, "{} {} {}", p[0], p[1], trajectory.frame_of(j))?;
    }
  }
  Ok(())
}

pub fn write_partitions<W: Write>(
  mut out: W,
  video_length: usize,
  partitions: &[Partition],
) -> Result<()> {
  writeln!(out, "{}", video_length)?;
  writeln!(out, "{}", partitions.len())?;
  for partition in partitions {
    writeln!(out, "{}", partition.len())?;
    let cuts: Vec<String> = partition.iter().map(|c| c.to_string()).collect();
    writeln!(out, "{}", cuts.join(" "))?;
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  const TRAJECTORY_DAT: &str = "\
10 2
0 3
1.5 2.5 4
2.5 3.5 5
3.5 4.5 6
0 2
7 8 0
7.25 8.5 1
";

  #[test]
  fn test_parse_trajectories() {
    let (video_length, trajectories) = parse_trajectories(TRAJECTORY_DAT.as_bytes()).unwrap();
    assert_eq!(video_length, 10);
    assert_eq!(trajectories.len(), 2);
    assert_eq!(trajectories[0].len(), 3);
    assert_eq!(trajectories[0].start_frame, 4);
    assert_eq!(trajectories[0].points[1], Vector2d::new(2.5, 3.5));
    assert_eq!(trajectories[1].start_frame, 0);
    assert_eq!(trajectories[1].points[1], Vector2d::new(7.25, 8.5));
  }

  #[test]
  fn test_parse_trajectories_truncated() {
    let err = parse_trajectories("10 2\n0 3\n1 2 0\n".as_bytes()).unwrap_err();
    assert!(err.to_string().contains("Unexpected end of file"));
  }

  #[test]
  fn test_parse_trajectories_garbage() {
    let err = parse_trajectories("10 1\n0 1\n1.5 oops 0\n".as_bytes()).unwrap_err();
    assert!(err.to_string().contains("oops"));
  }

  #[test]
  fn test_parse_trajectories_non_consecutive_frames() {
    let err = parse_trajectories("10 1\n0 2\n1 2 0\n3 4 2\n".as_bytes()).unwrap_err();
    assert!(err.to_string().contains("not consecutive"));
  }

  #[test]
  fn test_parse_trajectories_empty_trajectory() {
    let err = parse_trajectories("10 1\n0 0\n".as_bytes()).unwrap_err();
    assert!(err.to_string().contains("empty"));
  }

  #[test]
  fn test_parse_partitions() {
    let input = "10 2\n3\n0 4 7\n0\n\n";
    let (video_length, partitions) = parse_partitions(input.as_bytes()).unwrap();
    assert_eq!(video_length, 10);
    assert_eq!(partitions, vec![vec![0, 4, 7], vec![]]);
  }

  #[test]
  fn test_validate_partition() {
    assert!(validate_partition(&[0, 4, 7], 8).is_ok());
    assert!(validate_partition(&[], 8).is_ok());
    assert!(validate_partition(&[0, 8], 8).is_err());
    assert!(validate_partition(&[4, 4], 8).is_err());
    assert!(validate_partition(&[4, 2], 8).is_err());
  }

  #[test]
  fn test_trajectories_round_trip() {
    let (video_length, trajectories) = parse_trajectories(TRAJECTORY_DAT.as_bytes()).unwrap();
    let mut written = vec![];
    write_trajectories(&mut written, video_length, &trajectories).unwrap();
    let (reread_length, reread) = parse_trajectories(written.as_slice()).unwrap();
    assert_eq!(reread_length, video_length);
    assert_eq!(reread.len(), trajectories.len());
    for (a, b) in trajectories.iter().zip(&reread) {
      assert_eq!(a.start_frame, b.start_frame);
      assert_eq!(a.points, b.points);
    }
  }

  #[test]
  fn test_partitions_round_trip() {
    let partitions = vec![vec![0, 2, 5], vec![], vec![1]];
    let mut written = vec![];
    write_partitions(&mut written, 7, &partitions).unwrap();
    let (video_length, reread) = parse_partitions(written.as_slice()).unwrap();
    assert_eq!(video_length, 7);
    assert_eq!(reread, partitions);
  }

  #[test]
  fn test_read_frame_list_resolves_relative_names() {
    // Exercised through the parser only; file access happens in Video::load.
    let input = "2 1\nframes/001.png frames/002.png\n";
    let mut tokens = Tokens::new(input.as_bytes());
    let video_length: usize = tokens.expect("video length").unwrap();
    let _format: usize = tokens.expect("format tag").unwrap();
    assert_eq!(video_length, 2);
    let name: String = tokens.expect("frame name").unwrap();
    assert_eq!(name, "frames/001.png");
  }

  #[test]
  fn test_require_extension() {
    // The check runs before any file access.
    assert!(read_trajectories(Path::new("tracks.txt")).unwrap_err()
      .to_string().contains(".dat"));
    assert!(read_partitions(Path::new("cuts")).unwrap_err()
      .to_string().contains(".dat"));
    assert!(read_frame_list(Path::new("frames.dat")).unwrap_err()
      .to_string().contains(".bmf"));
  }

  #[test]
  fn test_tokens_span_lines() {
    let mut tokens = Tokens::new("1 2\n\n  3\n".as_bytes());
    assert_eq!(tokens.next_token().unwrap(), Some("1"));
    assert_eq!(tokens.next_token().unwrap(), Some("2"));
    assert_eq!(tokens.next_token().unwrap(), Some("3"));
    assert_eq!(tokens.next_token().unwrap(), None);
  }
}
