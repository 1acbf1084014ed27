/// A linear scroll between two offsets.
///
/// The number of frames is capped by the distance so short scrolls don't stutter through
/// repeated offsets.
#[derive(Clone, Debug)]
pub(crate) struct ScrollAnimation {
    from: usize,
    to: usize,
    total_frames: usize,
}

impl ScrollAnimation {
    pub(crate) fn new(from: usize, to: usize, max_frames: usize) -> Self {
        let total_frames = max_frames.min(from.abs_diff(to));
        Self { from, to, total_frames }
    }

    pub(crate) fn total_frames(&self) -> usize {
        self.total_frames
    }

    pub(crate) fn destination(&self) -> usize {
        self.to
    }

    /// The offset at the given frame, where frame `total_frames` is the destination.
    pub(crate) fn offset_at(&self, frame: usize) -> usize {
        if self.total_frames == 0 {
            return self.to;
        }
        let frame = frame.min(self.total_frames);
        let delta = self.from.abs_diff(self.to) * frame / self.total_frames;
        match self.to >= self.from {
            true => self.from + delta,
            false => self.from - delta,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::forward_short(0, 24, 30, 24)]
    #[case::forward_long(0, 240, 30, 30)]
    #[case::backward(48, 24, 30, 24)]
    #[case::same_offset(24, 24, 30, 0)]
    fn frame_count(#[case] from: usize, #[case] to: usize, #[case] max_frames: usize, #[case] expected: usize) {
        let animation = ScrollAnimation::new(from, to, max_frames);
        assert_eq!(animation.total_frames(), expected);
    }

    #[rstest]
    #[case::start(0, 240, 0, 0)]
    #[case::halfway(0, 240, 15, 120)]
    #[case::end(0, 240, 30, 240)]
    #[case::past_the_end(0, 240, 100, 240)]
    #[case::backward_start(48, 24, 0, 48)]
    #[case::backward_one(48, 24, 1, 47)]
    #[case::backward_end(48, 24, 24, 24)]
    #[case::no_distance(24, 24, 0, 24)]
    fn interpolation(#[case] from: usize, #[case] to: usize, #[case] frame: usize, #[case] expected: usize) {
        let animation = ScrollAnimation::new(from, to, 30);
        assert_eq!(animation.offset_at(frame), expected);
    }

    #[test]
    fn offsets_are_monotonic() {
        let animation = ScrollAnimation::new(0, 240, 30);
        let offsets: Vec<_> = (0..=animation.total_frames()).map(|frame| animation.offset_at(frame)).collect();
        for window in offsets.windows(2) {
            assert!(window[1] > window[0], "offsets went backwards: {offsets:?}");
        }
    }
}
