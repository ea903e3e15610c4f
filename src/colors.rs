use rand::Rng;
use rand_xoshiro::rand_core::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

// Packed 0RGB, the format softbuffer expects.
pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
  (r as u32) << 16 | (g as u32) << 8 | b as u32
}

// Color ramp for drawing trajectory footprints, blue through cyan and green
// to yellow, saturating at white. The scheme follows the dense trajectory
// tools of T. Brox.
pub fn trajectory_ramp() -> Vec<u32> {
  let mut ramp = Vec::with_capacity(1024);
  for i in 0..256 {
    ramp.push(pack_rgb(0, i as u8, 255));
  }
  for i in 0..256 {
    ramp.push(pack_rgb(0, 255, (255 - i) as u8));
  }
  for i in 0..256 {
    ramp.push(pack_rgb(i as u8, 255, 0));
  }
  for _ in 0..256 {
    ramp.push(pack_rgb(255, 255, 255));
  }
  ramp
}

// Spreads the ramp along the trajectory. Long trajectories saturate at the
// last ramp entry.
pub fn ramp_color(ramp: &[u32], point_index: usize) -> u32 {
  ramp[usize::min(point_index * 10, ramp.len() - 1)]
}

pub const SELECTION_PALETTE: [u32; 11] = [
  0x0000ff,
  0x00ff00,
  0x00ffff,
  0xff00ff,
  0xffff00,
  0xffffff,
  0x007d00,
  0x007d7d,
  0x7d007d,
  0x7d7d00,
  0x7d7d7d,
];

// Color for the n:th selection since the last refresh. Past the fixed palette
// the colors are drawn from a seeded RNG, so a given selection order always
// produces the same colors. Channels stay above the plot background.
pub fn selection_color(n: usize) -> u32 {
  if n < SELECTION_PALETTE.len() {
    return SELECTION_PALETTE[n];
  }
  let mut rng = Xoshiro256PlusPlus::seed_from_u64(n as u64);
  let r: u8 = rng.gen_range(64..=255);
  let g: u8 = rng.gen_range(64..=255);
  let b: u8 = rng.gen_range(64..=255);
  pack_rgb(r, g, b)
}
