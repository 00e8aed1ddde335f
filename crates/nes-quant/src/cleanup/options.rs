//! Cleanup pass selection.

/// Which cleanup passes run, and how many times the whole sequence repeats.
///
/// # Example
///
/// ```
/// use nes_quant::CleanupConfig;
///
/// let config = CleanupConfig::new().cull_dots(true).clean_lines(true);
/// assert!(config.any());
/// assert_eq!(config.passes, 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CleanupConfig {
    /// Repaint isolated single pixels.
    pub cull_dots: bool,
    /// Repaint isolated vertical two-pixel runs.
    pub cull_pipes: bool,
    /// Straighten single-step zig-zags between two rows.
    pub cull_zags: bool,
    /// Smooth line ends and diagonal steps with fixed templates.
    pub clean_lines: bool,
    /// How many times the enabled passes run, in order. Default: `1`
    pub passes: u32,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            cull_dots: false,
            cull_pipes: false,
            cull_zags: false,
            clean_lines: false,
            passes: 1,
        }
    }
}

impl CleanupConfig {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every pass enabled, one repetition.
    pub fn all() -> Self {
        Self {
            cull_dots: true,
            cull_pipes: true,
            cull_zags: true,
            clean_lines: true,
            passes: 1,
        }
    }

    #[inline]
    pub fn cull_dots(mut self, enabled: bool) -> Self {
        self.cull_dots = enabled;
        self
    }

    #[inline]
    pub fn cull_pipes(mut self, enabled: bool) -> Self {
        self.cull_pipes = enabled;
        self
    }

    #[inline]
    pub fn cull_zags(mut self, enabled: bool) -> Self {
        self.cull_zags = enabled;
        self
    }

    #[inline]
    pub fn clean_lines(mut self, enabled: bool) -> Self {
        self.clean_lines = enabled;
        self
    }

    #[inline]
    pub fn passes(mut self, passes: u32) -> Self {
        self.passes = passes;
        self
    }

    /// Whether any pass would touch the image.
    pub fn any(&self) -> bool {
        self.passes > 0 && (self.cull_dots || self.cull_pipes || self.cull_zags || self.clean_lines)
    }
}
