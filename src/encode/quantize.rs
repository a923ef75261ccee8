//! Median-cut color reduction shared across all frames of an animation.

use std::collections::HashMap;

/// Largest palette a GIF color table can hold.
pub const MAX_COLORS: usize = 256;

type Color = [u8; 4];

/// One palette computed over every pixel of an animation.
///
/// Fully transparent pixels collapse to `[0, 0, 0, 0]` before counting. When the frames hold
/// at most `max_colors` distinct colors the palette is exact and mapping is the identity.
#[derive(Clone, Debug)]
pub struct SharedPalette {
    colors: Vec<Color>,
    lookup: HashMap<Color, u8>,
}

struct ColorBox {
    entries: Vec<(Color, u32)>,
}

impl ColorBox {
    fn range(&self, ch: usize) -> u8 {
        let (lo, hi) = self
            .entries
            .iter()
            .fold((u8::MAX, u8::MIN), |(lo, hi), (c, _)| (lo.min(c[ch]), hi.max(c[ch])));
        hi.saturating_sub(lo)
    }

    fn widest(&self) -> (usize, u8) {
        (0..4)
            .map(|ch| (ch, self.range(ch)))
            .max_by_key(|&(ch, r)| (r, std::cmp::Reverse(ch)))
            .unwrap_or((0, 0))
    }

    /// Split at the pixel-weighted median of the widest channel.
    fn split(mut self) -> (Self, Self) {
        let (ch, _) = self.widest();
        self.entries.sort_unstable_by_key(|(c, _)| (c[ch], *c));
        let total: u64 = self.entries.iter().map(|(_, n)| u64::from(*n)).sum();
        let mut acc = 0u64;
        let mut cut = 1;
        for (i, (_, n)) in self.entries.iter().enumerate() {
            acc += u64::from(*n);
            if acc * 2 >= total {
                cut = i + 1;
                break;
            }
        }
        let cut = cut.clamp(1, self.entries.len() - 1);
        let upper = self.entries.split_off(cut);
        (self, Self { entries: upper })
    }

    fn average(&self) -> Color {
        let mut sum = [0u64; 4];
        let mut weight = 0u64;
        for (c, n) in &self.entries {
            for (s, v) in sum.iter_mut().zip(c) {
                *s += u64::from(*v) * u64::from(*n);
            }
            weight += u64::from(*n);
        }
        let weight = weight.max(1);
        sum.map(|s| ((s + weight / 2) / weight) as u8)
    }
}

fn canonical(px: &[u8]) -> Color {
    if px[3] == 0 {
        return [0, 0, 0, 0];
    }
    [px[0], px[1], px[2], px[3]]
}

impl SharedPalette {
    /// Build a palette of at most `max_colors` (clamped to `1..=256`) from straight RGBA8 frames.
    pub fn build<'a>(frames: impl IntoIterator<Item = &'a [u8]>, max_colors: usize) -> Self {
        let max_colors = max_colors.clamp(1, MAX_COLORS);
        let mut histogram: HashMap<Color, u32> = HashMap::new();
        for frame in frames {
            for px in frame.chunks_exact(4) {
                let n = histogram.entry(canonical(px)).or_insert(0);
                *n = n.saturating_add(1);
            }
        }

        let mut boxes = vec![ColorBox {
            entries: histogram.into_iter().collect(),
        }];
        while boxes.len() < max_colors {
            let candidate = boxes
                .iter()
                .enumerate()
                .filter(|(_, b)| b.entries.len() > 1)
                .max_by_key(|(_, b)| {
                    let pixels: u64 = b.entries.iter().map(|(_, n)| u64::from(*n)).sum();
                    (b.widest().1, pixels)
                })
                .map(|(i, _)| i);
            let Some(i) = candidate else {
                break;
            };
            let (a, b) = boxes.swap_remove(i).split();
            boxes.push(a);
            boxes.push(b);
        }

        let mut colors = Vec::with_capacity(boxes.len());
        let mut lookup = HashMap::new();
        for (i, b) in boxes.iter().filter(|b| !b.entries.is_empty()).enumerate() {
            let color = if b.entries.len() == 1 {
                b.entries[0].0
            } else {
                b.average()
            };
            colors.push(color);
            for (c, _) in &b.entries {
                lookup.insert(*c, i as u8);
            }
        }
        Self { colors, lookup }
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Replace every pixel of a straight RGBA8 buffer with its palette color.
    ///
    /// Colors that were not part of the build input map to the nearest palette entry.
    pub fn apply(&self, rgba: &mut [u8]) {
        for px in rgba.chunks_exact_mut(4) {
            let c = canonical(px);
            let idx = match self.lookup.get(&c) {
                Some(i) => usize::from(*i),
                None => self.nearest(c),
            };
            if let Some(p) = self.colors.get(idx) {
                px.copy_from_slice(p);
            }
        }
    }

    fn nearest(&self, c: Color) -> usize {
        self.colors
            .iter()
            .enumerate()
            .min_by_key(|(_, p)| {
                p.iter()
                    .zip(c)
                    .map(|(a, b)| {
                        let d = i32::from(*a) - i32::from(b);
                        d * d
                    })
                    .sum::<i32>()
            })
            .map_or(0, |(i, _)| i)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/quantize.rs"]
mod tests;
