use std::collections::HashMap;

use once_cell::sync::Lazy;

const FONT_HEIGHT: usize = 5;
const FONT_WIDTH: usize = 5;
const FILL_CHAR: char = '█';
const OUTLINE_CHAR: char = '░';

type Glyph = [&'static str; FONT_HEIGHT];

static GLYPHS: Lazy<HashMap<char, Glyph>> = Lazy::new(|| {
    HashMap::from([
        ('X', ["1   1", " 1 1 ", "  1  ", " 1 1 ", "1   1"]),
        ('O', [" 111 ", "1   1", "1   1", "1   1", " 111 "]),
        ('T', ["11111", "  1  ", "  1  ", "  1  ", "  1  "]),
        ('I', ["11111", "  1  ", "  1  ", "  1  ", "11111"]),
        ('C', [" 1111", "1    ", "1    ", "1    ", " 1111"]),
        ('A', [" 111 ", "1   1", "11111", "1   1", "1   1"]),
        ('E', ["11111", "1    ", "1111 ", "1    ", "11111"]),
        (' ', ["     ", "     ", "     ", "     ", "     "]),
        ('?', [" 111 ", "1   1", "  11 ", "     ", "  1  "]),
    ])
});

/// Horizontal stretch applied to every glyph pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    /// One column per pixel.
    Narrow,
    /// Two columns per pixel; looks square in most terminal fonts.
    Wide,
}

impl Scale {
    fn factor(self) -> usize {
        match self {
            Scale::Narrow => 1,
            Scale::Wide => 2,
        }
    }
}

/// Rendering options for [`render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub scale: Scale,
    pub shadow: bool,
}

/// Candidate styles from largest to smallest.
pub const STYLES: [Style; 3] = [
    Style {
        scale: Scale::Wide,
        shadow: true,
    },
    Style {
        scale: Scale::Wide,
        shadow: false,
    },
    Style {
        scale: Scale::Narrow,
        shadow: false,
    },
];

/// Width and height in terminal cells of `text` rendered with `style`.
pub fn dimensions(text: &str, style: Style) -> (usize, usize) {
    let count = text.chars().count();
    if count == 0 {
        return (0, 0);
    }
    let factor = style.scale.factor();
    let shadow = usize::from(style.shadow);
    let width = count * FONT_WIDTH * factor + (count - 1) * factor + shadow * factor;
    (width, FONT_HEIGHT + shadow)
}

/// Largest style whose output fits in `width` × `height`.
pub fn fitting_style(text: &str, width: usize, height: usize) -> Option<Style> {
    STYLES.into_iter().find(|style| {
        let (needed_width, needed_height) = dimensions(text, *style);
        needed_width <= width && needed_height <= height
    })
}

/// Render `text` as block letters, one `String` per row.
///
/// Every row has the full width so centred rows stay aligned.
pub fn render(text: &str, style: Style) -> Vec<String> {
    let content: Vec<char> = text.chars().map(|c| c.to_ascii_uppercase()).collect();
    let (total_width, canvas_height) = dimensions(text, style);
    if content.is_empty() {
        return Vec::new();
    }

    let factor = style.scale.factor();
    let advance = (FONT_WIDTH + 1) * factor;
    let mut canvas = vec![vec![' '; total_width]; canvas_height];

    for (index, ch) in content.iter().enumerate() {
        let Some(glyph) = GLYPHS.get(ch).or_else(|| GLYPHS.get(&'?')) else {
            continue;
        };
        paint_glyph(&mut canvas, glyph, index * advance, style);
    }

    canvas
        .into_iter()
        .map(|row| row.into_iter().collect())
        .collect()
}

fn paint_glyph(canvas: &mut [Vec<char>], glyph: &Glyph, x_offset: usize, style: Style) {
    let factor = style.scale.factor();
    for (row_idx, row) in glyph.iter().enumerate() {
        for (col_idx, symbol) in row.chars().enumerate() {
            if symbol != '1' {
                continue;
            }
            let x = x_offset + col_idx * factor;
            for step in 0..factor {
                if style.shadow {
                    place(canvas, row_idx + 1, x + factor + step, OUTLINE_CHAR);
                }
                place(canvas, row_idx, x + step, FILL_CHAR);
            }
        }
    }
}

fn place(canvas: &mut [Vec<char>], y: usize, x: usize, ch: char) {
    if y >= canvas.len() || x >= canvas[y].len() {
        return;
    }
    let cell = &mut canvas[y][x];
    if *cell == ' ' || (*cell == OUTLINE_CHAR && ch == FILL_CHAR) {
        *cell = ch;
    }
}
