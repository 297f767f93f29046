//! Loop-seam crossfade for rendered frame sequences.

use rand::Rng;

use super::mapping::RenderedFrame;

/// Blend weight for the `i`-th of `count` tail frames: `(i + 1) / (count + 1)`.
///
/// Rises from just above 0 at the first blended frame to just below 1 at
/// the last frame before the loop point.
#[inline]
pub fn blend_weight(i: usize, count: usize) -> f64 {
    (i + 1) as f64 / (count + 1) as f64
}

/// Dissolve the last `count` frames toward the first `count` frames so the
/// sequence loops without a visible seam.
///
/// Tail frame `len - count + i` is rebuilt character by character against head
/// frame `i`: newlines are kept as they are, every other position takes the
/// head character with probability [`blend_weight`]`(i, count)`, one draw from
/// `rng` per position. If the head frame is shorter, the tail character is kept.
///
/// Returns the input unchanged when `count` is 0 or there are fewer than
/// `2 * count` frames.
pub fn apply_crossfade<R: Rng + ?Sized>(
    frames: &[RenderedFrame],
    count: usize,
    rng: &mut R,
) -> Vec<RenderedFrame> {
    let mut result = frames.to_vec();
    if count == 0 || count > frames.len() / 2 {
        return result;
    }

    let total = frames.len();
    for i in 0..count {
        let weight = blend_weight(i, count);
        let tail_index = total - count + i;
        let tail = frames[tail_index].as_str();
        let mut head = frames[i].as_str().chars();

        let mut blended = String::with_capacity(tail.len());
        for tail_ch in tail.chars() {
            let head_ch = head.next();
            if tail_ch == '\n' {
                blended.push('\n');
                continue;
            }
            let draw: f64 = rng.gen();
            match head_ch {
                Some(h) if draw < weight && h != '\n' => blended.push(h),
                _ => blended.push(tail_ch),
            }
        }

        result[tail_index] = RenderedFrame::from_text(blended);
    }

    log::debug!("Crossfaded {} of {} frames", count, total);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{RngCore, SeedableRng};

    /// Replays a fixed pattern: `true` draws 0.0 (take head), `false` draws
    /// just under 1.0 (keep tail).
    struct Scripted {
        picks: Vec<bool>,
        pos: usize,
    }

    impl RngCore for Scripted {
        fn next_u32(&mut self) -> u32 {
            self.next_u64() as u32
        }

        fn next_u64(&mut self) -> u64 {
            let take_head = self.picks[self.pos % self.picks.len()];
            self.pos += 1;
            if take_head {
                0
            } else {
                u64::MAX
            }
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0);
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    fn frames(texts: &[&str]) -> Vec<RenderedFrame> {
        texts.iter().map(|t| RenderedFrame::from_text(*t)).collect()
    }

    #[test]
    fn test_blend_weights() {
        assert_eq!(blend_weight(0, 1), 0.5);
        assert_eq!(blend_weight(0, 3), 0.25);
        assert_eq!(blend_weight(2, 3), 0.75);
    }

    #[test]
    fn test_zero_count_is_identity() {
        let input = frames(&["ab", "cd", "ef"]);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(apply_crossfade(&input, 0, &mut rng), input);
    }

    #[test]
    fn test_too_few_frames_is_identity() {
        let input = frames(&["ab", "cd", "ef"]);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(apply_crossfade(&input, 2, &mut rng), input);
    }

    #[test]
    fn test_huge_count_is_identity() {
        let input = frames(&["ab", "cd", "ef", "gh"]);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(apply_crossfade(&input, usize::MAX, &mut rng), input);
        assert_eq!(apply_crossfade(&input, usize::MAX / 2 + 1, &mut rng), input);
    }

    #[test]
    fn test_scripted_dissolve() {
        let input = frames(&["AA\nAA", "BB\nBB", "cc\ncc", "dd\ndd"]);
        // Tail frame 2 against head 0, then tail frame 3 against head 1.
        // Newlines consume no draw.
        let mut rng = Scripted {
            picks: vec![true, false, false, true, true, true, false, false],
            pos: 0,
        };
        let out = apply_crossfade(&input, 2, &mut rng);
        assert_eq!(out[0].as_str(), "AA\nAA");
        assert_eq!(out[1].as_str(), "BB\nBB");
        assert_eq!(out[2].as_str(), "Ac\ncA");
        assert_eq!(out[3].as_str(), "BB\ndd");
    }

    #[test]
    fn test_newlines_preserved() {
        let input = frames(&[
            "abc\ndef\nghi",
            "jkl\nmno\npqr",
            "###\n###\n###",
            "...\n...\n...",
            "@@@\n@@@\n@@@",
            "+++\n+++\n+++",
        ]);
        let mut rng = StdRng::seed_from_u64(42);
        let out = apply_crossfade(&input, 3, &mut rng);
        assert_eq!(out.len(), input.len());
        for (blended, original) in out.iter().zip(input.iter()) {
            let a: Vec<usize> = blended.as_str().match_indices('\n').map(|(i, _)| i).collect();
            let b: Vec<usize> = original.as_str().match_indices('\n').map(|(i, _)| i).collect();
            assert_eq!(a, b);
        }
        // Head frames are never touched
        assert_eq!(&out[..3], &input[..3]);
    }

    #[test]
    fn test_short_head_keeps_tail() {
        let input = frames(&["", "xy"]);
        let mut rng = Scripted {
            picks: vec![true],
            pos: 0,
        };
        let out = apply_crossfade(&input, 1, &mut rng);
        assert_eq!(out[1].as_str(), "xy");
    }
}
