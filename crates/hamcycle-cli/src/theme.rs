use crossterm::style::Color;

/// Colors for the cycle and partition views
#[derive(Debug, Clone)]
pub struct Theme {
    /// Default text color
    pub fg: Color,
    /// Cell left out of the cycle
    pub excluded: Color,
    /// Summary line color
    pub info: Color,
    /// One color per block, reused cyclically
    pub blocks: Vec<Color>,
}

impl Theme {
    /// Dark theme, used unless another is picked
    pub fn dark() -> Self {
        Self {
            fg: Color::Rgb { r: 230, g: 230, b: 240 },
            excluded: Color::Rgb { r: 255, g: 90, b: 90 },
            info: Color::Rgb { r: 160, g: 165, b: 185 },
            blocks: vec![
                Color::Rgb { r: 80, g: 180, b: 255 },
                Color::Rgb { r: 90, g: 255, b: 130 },
                Color::Rgb { r: 255, g: 210, b: 100 },
                Color::Rgb { r: 220, g: 130, b: 255 },
                Color::Rgb { r: 255, g: 150, b: 90 },
                Color::Rgb { r: 100, g: 230, b: 220 },
            ],
        }
    }

    /// Light theme
    pub fn light() -> Self {
        Self {
            fg: Color::Rgb { r: 30, g: 30, b: 40 },
            excluded: Color::Rgb { r: 220, g: 50, b: 50 },
            info: Color::Rgb { r: 90, g: 90, b: 110 },
            blocks: vec![
                Color::Rgb { r: 30, g: 100, b: 200 },
                Color::Rgb { r: 40, g: 160, b: 60 },
                Color::Rgb { r: 200, g: 120, b: 20 },
                Color::Rgb { r: 140, g: 50, b: 180 },
                Color::Rgb { r: 190, g: 70, b: 40 },
                Color::Rgb { r: 20, g: 140, b: 140 },
            ],
        }
    }

    /// High contrast theme
    pub fn high_contrast() -> Self {
        Self {
            fg: Color::White,
            excluded: Color::Red,
            info: Color::Grey,
            blocks: vec![
                Color::Cyan,
                Color::Green,
                Color::Yellow,
                Color::Magenta,
                Color::Blue,
                Color::White,
            ],
        }
    }

    pub fn block_color(&self, block: usize) -> Color {
        if self.blocks.is_empty() {
            return self.fg;
        }
        self.blocks[block % self.blocks.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_colors_wrap_around() {
        let theme = Theme::light();
        let n = theme.blocks.len();
        assert!(n > 1);
        assert_eq!(theme.block_color(0), theme.block_color(n));
        assert_ne!(theme.block_color(0), theme.block_color(1));
    }

    #[test]
    fn test_empty_palette_falls_back_to_text_color() {
        let theme = Theme {
            blocks: Vec::new(),
            ..Theme::high_contrast()
        };
        assert_eq!(theme.block_color(3), theme.fg);
    }
}
