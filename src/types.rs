// Eigen-like aliases.
pub type Vector2d = nalgebra::Vector2::<f64>;
pub type Pixel = nalgebra::Vector2::<i32>;

// Rounds half away from zero, like `lroundf`.
pub fn from_f64(p: &Vector2d) -> Pixel {
  Pixel::new(p[0].round() as i32, p[1].round() as i32)
}
