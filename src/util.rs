pub fn format_log(
  buf: &mut env_logger::fmt::Formatter,
  record: &log::Record,
) -> std::io::Result<()> {
  use std::io::Write;
  let mut style = buf.style();
  use env_logger::fmt::Color::*;
  use log::Level::*;
  style.set_color(match record.level() {
    Error => Red,
    Warn => Rgb(200, 200, 200),
    Info => Green,
    Debug => Magenta,
    Trace => Blue,
  });

  let s = format!("{:30}{}",
    format!("{}:{}",
      record.file().unwrap_or("?"),
      record.line().unwrap_or(0),
    ),
    record.args()
  );
  writeln!(buf, "{}", style.value(s))
}

// Smallest and largest value over all the given series. NaNs are skipped.
pub fn series_extent(series: &[&[f64]]) -> Option<(f64, f64)> {
  let mut min = f64::INFINITY;
  let mut max = f64::NEG_INFINITY;
  for s in series {
    for &v in *s {
      if v < min { min = v }
      if v > max { max = v }
    }
  }
  if min > max { None } else { Some((min, max)) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_series_extent() {
    assert_eq!(series_extent(&[&[1., 5., -2.], &[3.]]), Some((-2., 5.)));
    assert_eq!(series_extent(&[&[7.]]), Some((7., 7.)));
    assert_eq!(series_extent(&[&[]]), None);
    assert_eq!(series_extent(&[]), None);
    assert_eq!(series_extent(&[&[f64::NAN, 2., f64::NAN]]), Some((2., 2.)));
  }
}
