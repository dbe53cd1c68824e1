use crate::deck::Slide;

/// A presentation.
///
/// This holds the slides along with the state of the view: the slide being displayed and whether
/// an export is currently running.
#[derive(Debug)]
pub(crate) struct Presentation {
    slides: &'static [Slide],
    current_slide_index: usize,
    exporting: bool,
}

impl Presentation {
    /// Construct a new presentation.
    ///
    /// The slice must not be empty.
    pub(crate) fn new(slides: &'static [Slide]) -> Self {
        assert!(!slides.is_empty(), "presentation has no slides");
        Self { slides, current_slide_index: 0, exporting: false }
    }

    /// Get the current slide.
    pub(crate) fn current_slide(&self) -> &'static Slide {
        &self.slides[self.current_slide_index]
    }

    /// Get the current slide index.
    pub(crate) fn current_slide_index(&self) -> usize {
        self.current_slide_index
    }

    pub(crate) fn total_slides(&self) -> usize {
        self.slides.len()
    }

    /// Jump to a specific slide.
    ///
    /// Indexes past the end are clamped to the last slide. Returns whether the current slide
    /// changed.
    pub(crate) fn go_to_slide(&mut self, slide_index: usize) -> bool {
        let slide_index = slide_index.min(self.last_index());
        if slide_index == self.current_slide_index {
            return false;
        }
        self.current_slide_index = slide_index;
        true
    }

    /// Jump forwards.
    pub(crate) fn jump_next(&mut self) -> bool {
        if !self.can_go_next() {
            return false;
        }
        self.go_to_slide(self.current_slide_index + 1)
    }

    /// Jump backwards.
    pub(crate) fn jump_previous(&mut self) -> bool {
        if !self.can_go_previous() {
            return false;
        }
        self.go_to_slide(self.current_slide_index - 1)
    }

    /// Jump to the first slide.
    pub(crate) fn jump_first_slide(&mut self) -> bool {
        self.go_to_slide(0)
    }

    /// Jump to the last slide.
    pub(crate) fn jump_last_slide(&mut self) -> bool {
        self.go_to_slide(self.last_index())
    }

    pub(crate) fn can_go_next(&self) -> bool {
        self.current_slide_index < self.last_index()
    }

    pub(crate) fn can_go_previous(&self) -> bool {
        self.current_slide_index > 0
    }

    /// Mark an export as running.
    ///
    /// Returns `false` if there was one running already.
    pub(crate) fn start_export(&mut self) -> bool {
        if self.exporting {
            return false;
        }
        self.exporting = true;
        true
    }

    /// Mark the running export as finished.
    pub(crate) fn finish_export(&mut self) {
        self.exporting = false;
    }

    pub(crate) fn is_exporting(&self) -> bool {
        self.exporting
    }

    fn last_index(&self) -> usize {
        self.slides.len() - 1
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::deck::SLIDES;
    use rstest::rstest;

    #[derive(Clone, Copy, Debug)]
    enum Jump {
        Next,
        Previous,
        First,
        Last,
        Specific(usize),
    }

    impl Jump {
        fn apply(&self, presentation: &mut Presentation) -> bool {
            use Jump::*;
            match self {
                Next => presentation.jump_next(),
                Previous => presentation.jump_previous(),
                First => presentation.jump_first_slide(),
                Last => presentation.jump_last_slide(),
                Specific(index) => presentation.go_to_slide(*index),
            }
        }
    }

    #[test]
    fn initial_state() {
        let presentation = Presentation::new(&SLIDES);
        assert_eq!(presentation.current_slide_index(), 0);
        assert!(!presentation.is_exporting());
        assert!(!presentation.can_go_previous());
        assert!(presentation.can_go_next());
    }

    #[rstest]
    #[case::previous_from_first(&[Jump::Previous], 0)]
    #[case::next_from_first(&[Jump::Next], 1)]
    #[case::next_next(&[Jump::Next, Jump::Next], 2)]
    #[case::next_previous(&[Jump::Next, Jump::Previous], 0)]
    #[case::last(&[Jump::Last], 4)]
    #[case::next_past_end(&[Jump::Last, Jump::Next, Jump::Next], 4)]
    #[case::last_first(&[Jump::Last, Jump::First], 0)]
    #[case::specific(&[Jump::Specific(3)], 3)]
    #[case::specific_out_of_bounds(&[Jump::Specific(42)], 4)]
    #[case::specific_then_previous(&[Jump::Specific(2), Jump::Previous, Jump::Previous, Jump::Previous], 0)]
    fn jumping(#[case] jumps: &[Jump], #[case] expected: usize) {
        let mut presentation = Presentation::new(&SLIDES);
        for jump in jumps {
            jump.apply(&mut presentation);
            assert!(presentation.current_slide_index() < presentation.total_slides());
        }
        assert_eq!(presentation.current_slide_index(), expected);
    }

    #[test]
    fn boundaries_are_noops() {
        let mut presentation = Presentation::new(&SLIDES);
        assert!(!presentation.jump_previous());
        assert_eq!(presentation.current_slide_index(), 0);

        presentation.jump_last_slide();
        assert!(!presentation.jump_next());
        assert!(!presentation.can_go_next());
        assert_eq!(presentation.current_slide_index(), 4);
    }

    #[test]
    fn walk_to_the_end() {
        let mut presentation = Presentation::new(&SLIDES);
        for _ in 0..SLIDES.len() - 1 {
            assert!(presentation.jump_next());
        }
        assert_eq!(presentation.current_slide_index(), SLIDES.len() - 1);
        assert!(!presentation.can_go_next());
        assert!(presentation.can_go_previous());
    }

    #[test]
    fn go_to_is_idempotent() {
        let mut presentation = Presentation::new(&SLIDES);
        assert!(presentation.go_to_slide(2));
        assert!(!presentation.go_to_slide(2));
        assert_eq!(presentation.current_slide_index(), 2);
        assert_eq!(presentation.current_slide().title, "Sharpening Critical Thinking Skills");
    }

    #[test]
    fn export_flag() {
        let mut presentation = Presentation::new(&SLIDES);
        assert!(presentation.start_export());
        assert!(!presentation.start_export());
        assert!(presentation.is_exporting());

        presentation.finish_export();
        assert!(!presentation.is_exporting());
        assert!(presentation.start_export());
    }

    #[test]
    fn navigation_while_exporting() {
        let mut presentation = Presentation::new(&SLIDES);
        presentation.start_export();
        assert!(presentation.jump_next());
        assert!(presentation.is_exporting());
    }
}
