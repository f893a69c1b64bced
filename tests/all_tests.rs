#![allow(bad_style)]

mod png;
mod roundtrip;

fn rand_bytes(count: usize) -> Vec<u8> {
  let mut buffer = vec![0; count];
  getrandom::getrandom(&mut buffer).unwrap();
  buffer
}

fn rand_pixels(count: usize) -> Vec<u32> {
  rand_bytes(count * 4).chunks_exact(4).map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]])).collect()
}
